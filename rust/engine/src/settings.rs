// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Default room, material, camera and lighting settings.
//!
//! Settings are a plain value handed to [`crate::ViewController`],
//! [`crate::RoomTransformEngine`] and [`crate::RoomGroup::build`]; nothing in
//! the crate reads them from a global.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::part::Material;
use crate::types::{Point3D, RoomDimensions};
use crate::validation::DimensionBounds;

/// Complete configuration surface.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub room: RoomSettings,
    pub bounds: DimensionBounds,
    pub materials: MaterialSettings,
    pub camera: CameraSettings,
    pub lighting: LightingSettings,
    pub engine: EngineSettings,
}

/// Default room and the fixed thicknesses of its structural parts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RoomSettings {
    pub dimensions: RoomDimensions,
    /// Wall thickness in feet; the wall thickness axis is never scaled.
    pub wall_thickness: f64,
    /// Floor and ceiling slab thickness in feet.
    pub slab_thickness: f64,
}

impl Default for RoomSettings {
    fn default() -> Self {
        Self {
            dimensions: RoomDimensions::default(),
            wall_thickness: 0.2,
            slab_thickness: 0.1,
        }
    }
}

/// Materials per part kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MaterialSettings {
    pub wall: Material,
    pub floor: Material,
    pub ceiling: Material,
    pub window: Material,
    pub door: Material,
    pub frame: Material,
}

impl Default for MaterialSettings {
    fn default() -> Self {
        Self {
            wall: Material::new("wall", 0xf5f5f5),
            floor: Material::new("floor", 0x8b7355),
            ceiling: Material::new("ceiling", 0xffffff),
            window: Material::new("glass", 0x87ceeb).with_opacity(0.3),
            door: Material::new("door", 0x8b4513),
            frame: Material::new("frame", 0x4a4a4a),
        }
    }
}

/// Named camera positions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PresetTable {
    pub top: Point3D,
    pub front: Point3D,
    pub side: Point3D,
    pub isometric: Point3D,
}

impl Default for PresetTable {
    fn default() -> Self {
        Self {
            top: Point3D::new(0.0, 10.0, 0.0),
            front: Point3D::new(0.0, 0.0, 10.0),
            side: Point3D::new(10.0, 0.0, 0.0),
            isometric: Point3D::new(10.0, 10.0, 10.0),
        }
    }
}

/// Perspective camera defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraSettings {
    /// Vertical field of view in degrees.
    pub fov: f64,
    pub near: f64,
    pub far: f64,
    pub position: Point3D,
    pub presets: PresetTable,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
            position: Point3D::new(0.0, 5.0, 10.0),
            presets: PresetTable::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AmbientLight {
    pub color: u32,
    pub intensity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DirectionalLight {
    pub color: u32,
    pub intensity: f64,
    pub position: Point3D,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightingSettings {
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
}

impl Default for LightingSettings {
    fn default() -> Self {
        Self {
            ambient: AmbientLight {
                color: 0x404040,
                intensity: 0.5,
            },
            directional: DirectionalLight {
                color: 0xffffff,
                intensity: 1.0,
                position: Point3D::new(5.0, 10.0, 7.5),
            },
        }
    }
}

/// Engine behavior switches.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    /// Reject openings that are empty or larger than their wall, and
    /// subtractions that leave no wall behind. Off keeps the permissive
    /// behavior where the caller owns that check.
    pub check_opening_fit: bool,
}

impl Settings {
    /// Parse settings from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Settings(e.to_string()))
    }

    /// Defaults overlaid with environment variables.
    pub fn from_env() -> Self {
        Self::default().overlay_env(|key| std::env::var(key).ok())
    }

    /// Overlay values from a variable lookup.
    ///
    /// Recognized: `ROOM_WIDTH`, `ROOM_LENGTH`, `ROOM_HEIGHT`,
    /// `ROOM_WALL_THICKNESS`, `CAMERA_FOV`, `ROOM_CHECK_OPENING_FIT`.
    /// Unparseable values are ignored with a warning.
    pub fn overlay_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let number = |key: &str| -> Option<f64> {
            let raw = lookup(key)?;
            match raw.trim().parse::<f64>() {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!(key, value = %raw, "ignoring non-numeric setting");
                    None
                }
            }
        };

        if let Some(v) = number("ROOM_WIDTH") {
            self.room.dimensions.width = v;
        }
        if let Some(v) = number("ROOM_LENGTH") {
            self.room.dimensions.length = v;
        }
        if let Some(v) = number("ROOM_HEIGHT") {
            self.room.dimensions.height = v;
        }
        if let Some(v) = number("ROOM_WALL_THICKNESS") {
            self.room.wall_thickness = v;
        }
        if let Some(v) = number("CAMERA_FOV") {
            self.camera.fov = v;
        }
        if let Some(raw) = lookup("ROOM_CHECK_OPENING_FIT") {
            self.engine.check_opening_fit = matches!(raw.trim(), "1" | "true" | "yes" | "on");
        }

        self
    }
}
