// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Room-Lite Engine
//!
//! Parametric model of a single rectangular room: four walls, a floor and a
//! ceiling, with windows and doors cut into the walls.
//!
//! - [`validation`] checks room dimensions against policy bounds.
//! - [`settings`] holds the default room, materials, camera and lighting.
//! - [`view`] turns camera preset names or positions into camera commands.
//! - [`RoomGroup`] owns a room's parts in an arena with parent/child links.
//! - [`RoomTransformEngine`] moves, rotates and scales rooms and cuts
//!   openings through a [`room_lite_geometry::SolidKernel`].
//!
//! ```no_run
//! use room_lite_engine::{
//!     OpeningConfig, OpeningKind, RoomDimensions, RoomGroup, RoomTransformEngine, Settings,
//! };
//!
//! let settings = Settings::default();
//! let dims = RoomDimensions::new(12.0, 16.0, 9.0);
//! let mut room = RoomGroup::build(&dims, &settings);
//! let engine = RoomTransformEngine::new(&settings);
//!
//! let (wall, _) = room.walls().next().unwrap();
//! let window = OpeningConfig::new(3.0, 4.0);
//! engine.cut_opening(&mut room, wall, &window, OpeningKind::Window).unwrap();
//! ```

pub mod engine;
pub mod error;
pub mod group;
pub mod jobs;
pub mod part;
pub mod settings;
pub mod types;
pub mod validation;
pub mod view;

pub use engine::{
    window_frame, EngineOptions, OpeningAssembly, OpeningConfig, OpeningCut, RoomTransformEngine,
    FRAME_THICKNESS,
};
pub use error::{Error, Result};
pub use group::RoomGroup;
pub use jobs::PendingOpening;
pub use part::{FrameSide, Material, OpeningKind, PartKey, PartKind, RoomPart, Transform};
pub use settings::{
    AmbientLight, CameraSettings, DirectionalLight, EngineSettings, LightingSettings,
    MaterialSettings, PresetTable, RoomSettings, Settings,
};
pub use types::{Point3D, RoomDimensions};
pub use validation::{validate, DimensionBounds, Range, ValidationReport};
pub use view::{
    CameraCommand, CameraConsumer, CameraPreset, CameraState, ViewController, ViewRequest,
};
