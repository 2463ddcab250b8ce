// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for room operations.

use crate::part::{PartKey, PartKind};
use crate::validation::ValidationReport;

/// Result type alias for room operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while editing a room.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Requested dimensions fall outside the policy bounds.
    #[error("invalid room dimensions: {}", .0.errors.join("; "))]
    InvalidDimensions(ValidationReport),

    /// A camera preset name that is not one of top, front, side, isometric.
    #[error("unknown camera preset '{0}' (expected top, front, side or isometric)")]
    UnknownViewPreset(String),

    /// Door openings have no default placement.
    #[error("door openings require an explicit position")]
    MissingDoorPosition,

    /// Openings can only be cut into walls.
    #[error("cannot cut an opening into a {} part", .0.as_str())]
    NotAWall(PartKind),

    /// A referenced part was not found in the room arena.
    #[error("part not found: {0:?}")]
    PartNotFound(PartKey),

    /// The room does not have the expected set of structural parts.
    #[error("invalid room structure: {0}")]
    InvalidStructure(String),

    /// The opening is empty or larger than the host wall.
    #[error("opening {width}x{height} does not fit a wall of {wall_width}x{wall_height}")]
    OpeningOutOfBounds {
        width: f64,
        height: f64,
        wall_width: f64,
        wall_height: f64,
    },

    /// A size, position or wall scale that is NaN or infinite.
    #[error("non-finite {0}")]
    NonFiniteInput(&'static str),

    /// The solid kernel panicked while cutting an opening.
    #[error("solid kernel failed: {0}")]
    KernelPanic(String),

    /// The wall changed between computing an opening cut and applying it.
    #[error("opening was cut for an earlier version of the wall")]
    StaleOpening,

    /// Boolean subtraction removed the whole wall.
    #[error("opening subtraction left no wall geometry")]
    DegenerateResult,

    /// A background opening job was dropped before delivering a result.
    #[error("background opening job ended without a result")]
    JobCancelled,

    /// Settings could not be parsed.
    #[error("settings error: {0}")]
    Settings(String),

    #[error(transparent)]
    Geometry(#[from] room_lite_geometry::Error),
}
