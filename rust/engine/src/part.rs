// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room parts: the tagged objects a [`crate::RoomGroup`] owns.

use std::fmt;
use std::str::FromStr;

use nalgebra::{Matrix4, Rotation3, Vector3};
use room_lite_geometry::Mesh;
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use crate::error::Error;

new_key_type! {
    /// Key for a part stored in a room arena.
    pub struct PartKey;
}

/// Which edge of an opening a frame segment borders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameSide {
    Top,
    Bottom,
    Left,
    Right,
}

impl FrameSide {
    pub const ALL: [FrameSide; 4] = [
        FrameSide::Top,
        FrameSide::Bottom,
        FrameSide::Left,
        FrameSide::Right,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FrameSide::Top => "top",
            FrameSide::Bottom => "bottom",
            FrameSide::Left => "left",
            FrameSide::Right => "right",
        }
    }
}

/// What a part is. Closed set: every match over it is exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartKind {
    /// `is_length_wall` marks the pair of walls spanning the room's length.
    Wall { is_length_wall: bool },
    Floor,
    Ceiling,
    Window,
    Door,
    Frame(FrameSide),
}

impl PartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartKind::Wall { .. } => "wall",
            PartKind::Floor => "floor",
            PartKind::Ceiling => "ceiling",
            PartKind::Window => "window",
            PartKind::Door => "door",
            PartKind::Frame(_) => "frame",
        }
    }
}

impl fmt::Display for PartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two kinds of opening that can be cut into a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpeningKind {
    Window,
    Door,
}

impl OpeningKind {
    /// Depth of the cavity box. Windows cut deeper to leave a visible reveal.
    pub fn cut_depth(&self) -> f64 {
        match self {
            OpeningKind::Window => 0.3,
            OpeningKind::Door => 0.1,
        }
    }

    pub fn part_kind(&self) -> PartKind {
        match self {
            OpeningKind::Window => PartKind::Window,
            OpeningKind::Door => PartKind::Door,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.part_kind().as_str()
    }
}

impl FromStr for OpeningKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "window" => Ok(OpeningKind::Window),
            "door" => Ok(OpeningKind::Door),
            other => Err(Error::Settings(format!("unknown opening kind '{}'", other))),
        }
    }
}

/// Local transform: translation, Euler rotation (radians, XYZ), scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f64>,
    pub rotation: Vector3<f64>,
    pub scale: Vector3<f64>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: Vector3::zeros(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn from_position(position: Vector3<f64>) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Translation and rotation only. Children are placed in this frame.
    pub fn frame_matrix(&self) -> Matrix4<f64> {
        let rotation =
            Rotation3::from_euler_angles(self.rotation.x, self.rotation.y, self.rotation.z);
        Matrix4::new_translation(&self.position) * rotation.to_homogeneous()
    }

    /// Full local matrix applied to the part's own geometry.
    pub fn matrix(&self) -> Matrix4<f64> {
        self.frame_matrix() * Matrix4::new_nonuniform_scaling(&self.scale)
    }
}

/// Surface description handed to the renderer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Material {
    pub name: String,
    /// 0xRRGGBB
    pub color: u32,
    pub opacity: f32,
}

impl Material {
    pub fn new(name: impl Into<String>, color: u32) -> Self {
        Self {
            name: name.into(),
            color,
            opacity: 1.0,
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

/// A tagged object owned by a room.
///
/// `geometry` is expressed in the part's unscaled local frame; `transform`
/// places and sizes it. Parent/child links are maintained by the room.
#[derive(Debug, Clone)]
pub struct RoomPart {
    pub kind: PartKind,
    pub transform: Transform,
    pub geometry: Mesh,
    pub material: Material,
    pub(crate) parent: Option<PartKey>,
    pub(crate) children: Vec<PartKey>,
    /// Bumped whenever the room replaces this part's geometry.
    pub(crate) revision: u64,
}

impl RoomPart {
    pub fn new(kind: PartKind, geometry: Mesh, material: Material) -> Self {
        Self {
            kind,
            transform: Transform::default(),
            geometry,
            material,
            parent: None,
            children: Vec::new(),
            revision: 0,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn parent(&self) -> Option<PartKey> {
        self.parent
    }

    pub fn children(&self) -> &[PartKey] {
        &self.children
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// `Some(flag)` for walls, `None` for everything else.
    pub fn is_length_wall(&self) -> Option<bool> {
        match self.kind {
            PartKind::Wall { is_length_wall } => Some(is_length_wall),
            _ => None,
        }
    }

    /// Current sized extent of the part's geometry (geometry bounds times scale).
    pub fn sized_extent(&self) -> Vector3<f64> {
        self.geometry.extent().component_mul(&self.transform.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn opening_depths() {
        assert_relative_eq!(OpeningKind::Window.cut_depth(), 0.3);
        assert_relative_eq!(OpeningKind::Door.cut_depth(), 0.1);
        assert_eq!("door".parse::<OpeningKind>().unwrap(), OpeningKind::Door);
        assert!("skylight".parse::<OpeningKind>().is_err());
    }

    #[test]
    fn yaw_quarter_turn_maps_x_to_minus_z() {
        let transform = Transform {
            rotation: Vector3::new(0.0, FRAC_PI_2, 0.0),
            ..Transform::default()
        };
        let p = transform.matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn frame_matrix_ignores_scale() {
        let transform = Transform {
            position: Vector3::new(1.0, 0.0, 0.0),
            rotation: Vector3::zeros(),
            scale: Vector3::new(10.0, 8.0, 1.0),
        };
        let p = transform.frame_matrix().transform_point(&Point3::new(1.0, 1.0, 0.0));
        assert_relative_eq!(p.x, 2.0);
        assert_relative_eq!(p.y, 1.0);

        let q = transform.matrix().transform_point(&Point3::new(1.0, 1.0, 0.0));
        assert_relative_eq!(q.x, 11.0);
        assert_relative_eq!(q.y, 8.0);
    }
}
