// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena-based storage for the parts of one room.
//!
//! The [`RoomGroup`] is the single owner of every part. Parts live in a slot
//! map with stable, generational keys; the group keeps the ordered list of
//! top-level keys and each part keeps its own child keys. Openings are
//! children of the wall they were cut into, frame segments children of their
//! opening, so removing a wall removes everything cut into it.

use nalgebra::{Matrix4, Point3, Rotation3, Vector3};
use room_lite_geometry::Mesh;
use slotmap::SlotMap;

use crate::engine::{apply_layout, apply_scale, OpeningCut};
use crate::error::{Error, Result};
use crate::part::{PartKey, PartKind, RoomPart};
use crate::settings::Settings;
use crate::types::RoomDimensions;

/// One room: its parts plus its placement in the world.
#[derive(Debug, Clone)]
pub struct RoomGroup {
    parts: SlotMap<PartKey, RoomPart>,
    order: Vec<PartKey>,
    position: Vector3<f64>,
    yaw: f64,
}

impl Default for RoomGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomGroup {
    /// Creates an empty group at the origin.
    pub fn new() -> Self {
        Self {
            parts: SlotMap::with_key(),
            order: Vec::new(),
            position: Vector3::zeros(),
            yaw: 0.0,
        }
    }

    /// Builds a closed room: four walls, floor and ceiling, scaled and laid
    /// out for `dimensions`. Dimensions are not validated here.
    pub fn build(dimensions: &RoomDimensions, settings: &Settings) -> Self {
        let room = &settings.room;
        let materials = &settings.materials;
        let mut group = Self::new();

        let half_t = room.wall_thickness / 2.0;
        let wall_geometry =
            Mesh::cuboid(Point3::new(-0.5, 0.0, -half_t), Point3::new(0.5, 1.0, half_t));
        let slab_geometry =
            Mesh::centered_box(Point3::origin(), Vector3::new(1.0, room.slab_thickness, 1.0));

        // Width walls (back, front) then length walls (left, right)
        for is_length_wall in [false, false, true, true] {
            group.insert(RoomPart::new(
                PartKind::Wall { is_length_wall },
                wall_geometry.clone(),
                materials.wall.clone(),
            ));
        }
        group.insert(RoomPart::new(
            PartKind::Floor,
            slab_geometry.clone(),
            materials.floor.clone(),
        ));
        group.insert(RoomPart::new(
            PartKind::Ceiling,
            slab_geometry,
            materials.ceiling.clone(),
        ));

        apply_scale(&mut group, dimensions);
        apply_layout(&mut group, dimensions);

        tracing::debug!(
            width = dimensions.width,
            length = dimensions.length,
            height = dimensions.height,
            parts = group.len(),
            "room built"
        );
        group
    }

    // --- Placement ---

    /// World position of the room.
    pub fn position(&self) -> Vector3<f64> {
        self.position
    }

    /// Yaw around the vertical axis, in radians.
    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    pub(crate) fn set_position(&mut self, position: Vector3<f64>) {
        self.position = position;
    }

    pub(crate) fn set_yaw(&mut self, yaw: f64) {
        self.yaw = yaw;
    }

    /// Room-to-world matrix.
    pub fn matrix(&self) -> Matrix4<f64> {
        Matrix4::new_translation(&self.position)
            * Rotation3::from_axis_angle(&Vector3::y_axis(), self.yaw).to_homogeneous()
    }

    // --- Part storage ---

    /// Adds a top-level part.
    pub fn insert(&mut self, mut part: RoomPart) -> PartKey {
        part.parent = None;
        part.children.clear();
        let key = self.parts.insert(part);
        self.order.push(key);
        key
    }

    /// Adds `part` as a child of `parent`.
    pub fn insert_child(&mut self, parent: PartKey, mut part: RoomPart) -> Result<PartKey> {
        if !self.parts.contains_key(parent) {
            return Err(Error::PartNotFound(parent));
        }
        part.parent = Some(parent);
        part.children.clear();
        let key = self.parts.insert(part);
        self.parts[parent].children.push(key);
        Ok(key)
    }

    /// Returns the part for `key`, or `None` if not found.
    pub fn part(&self, key: PartKey) -> Option<&RoomPart> {
        self.parts.get(key)
    }

    pub fn part_mut(&mut self, key: PartKey) -> Option<&mut RoomPart> {
        self.parts.get_mut(key)
    }

    /// Like [`Self::part`] but with [`Error::PartNotFound`].
    pub fn get(&self, key: PartKey) -> Result<&RoomPart> {
        self.parts.get(key).ok_or(Error::PartNotFound(key))
    }

    pub(crate) fn parts_mut(&mut self) -> impl Iterator<Item = &mut RoomPart> + '_ {
        self.parts.values_mut()
    }

    /// Number of parts at any depth.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Top-level parts in insertion order.
    pub fn top_level(&self) -> &[PartKey] {
        &self.order
    }

    /// Direct children of `key` (empty for unknown keys).
    pub fn children(&self, key: PartKey) -> &[PartKey] {
        self.parts.get(key).map(|p| p.children.as_slice()).unwrap_or(&[])
    }

    /// `key` and everything below it, depth first.
    pub fn subtree(&self, key: PartKey) -> Vec<PartKey> {
        let mut out = Vec::new();
        let mut stack = vec![key];
        while let Some(k) = stack.pop() {
            if let Some(part) = self.parts.get(k) {
                out.push(k);
                stack.extend(part.children.iter().rev());
            }
        }
        out
    }

    /// Every part, depth first in top-level order.
    pub fn iter(&self) -> impl Iterator<Item = (PartKey, &RoomPart)> + '_ {
        self.order
            .iter()
            .flat_map(move |&root| self.subtree(root))
            .map(move |k| (k, &self.parts[k]))
    }

    /// Top-level walls in insertion order.
    pub fn walls(&self) -> impl Iterator<Item = (PartKey, &RoomPart)> + '_ {
        self.order
            .iter()
            .map(move |&k| (k, &self.parts[k]))
            .filter(|(_, p)| matches!(p.kind, PartKind::Wall { .. }))
    }

    /// All parts (any depth) whose kind satisfies `pred`.
    pub fn parts_of_kind<'a>(
        &'a self,
        pred: impl Fn(&PartKind) -> bool + 'a,
    ) -> impl Iterator<Item = (PartKey, &'a RoomPart)> + 'a {
        self.iter().filter(move |(_, p)| pred(&p.kind))
    }

    /// Removes a part and its whole subtree. Returns the removed root.
    pub fn remove_part(&mut self, key: PartKey) -> Result<RoomPart> {
        let parent = self.get(key)?.parent;
        match parent {
            Some(parent) => {
                if let Some(p) = self.parts.get_mut(parent) {
                    p.children.retain(|&k| k != key);
                }
            }
            None => self.order.retain(|&k| k != key),
        }

        let doomed = self.subtree(key);
        let mut root = None;
        for k in doomed {
            let removed = self.parts.remove(k);
            if k == key {
                root = removed;
            }
        }

        let mut root = root.ok_or(Error::PartNotFound(key))?;
        root.parent = None;
        root.children.clear();
        Ok(root)
    }

    // --- Openings ---

    /// Takes ownership of an opening produced by the engine: the wall's
    /// geometry is replaced by the subtracted mesh (its material and
    /// transform are kept), the opening becomes a child of the wall and its
    /// frame segments children of the opening. Returns the opening's key.
    ///
    /// A cut computed before the wall was rescaled, or before another
    /// opening replaced its geometry, is [`Error::StaleOpening`].
    pub fn apply_opening(&mut self, wall: PartKey, cut: OpeningCut) -> Result<PartKey> {
        let host = self.part_mut(wall).ok_or(Error::PartNotFound(wall))?;
        match host.kind {
            PartKind::Wall { .. } => {}
            kind @ (PartKind::Floor
            | PartKind::Ceiling
            | PartKind::Window
            | PartKind::Door
            | PartKind::Frame(_)) => return Err(Error::NotAWall(kind)),
        }
        if !cut.matches(host) {
            return Err(Error::StaleOpening);
        }
        host.geometry = cut.subtracted_wall;
        host.revision += 1;

        let opening = self.insert_child(wall, cut.opening.opening)?;
        for segment in cut.opening.frame {
            self.insert_child(opening, segment)?;
        }
        Ok(opening)
    }

    // --- World space ---

    /// Part-geometry-to-world matrix.
    ///
    /// Ancestors contribute their translation and rotation but not their
    /// scale, so child offsets stay in feet.
    pub fn world_matrix(&self, key: PartKey) -> Result<Matrix4<f64>> {
        let part = self.get(key)?;
        let mut matrix = part.transform.matrix();
        let mut parent = part.parent;
        while let Some(pk) = parent {
            let p = self.get(pk)?;
            matrix = p.transform.frame_matrix() * matrix;
            parent = p.parent;
        }
        Ok(self.matrix() * matrix)
    }

    /// Every part's geometry merged into one world-space mesh.
    pub fn flatten(&self) -> Result<Mesh> {
        let mut out = Mesh::new();
        for (key, part) in self.iter() {
            out.merge(&part.geometry.transformed(&self.world_matrix(key)?));
        }
        Ok(out)
    }

    /// Checks the room invariants: one floor, one ceiling, two length walls,
    /// two width walls at the top level, and openings/frames only under
    /// their proper hosts.
    pub fn check_structure(&self) -> Result<()> {
        let (mut floors, mut ceilings, mut length_walls, mut width_walls) = (0, 0, 0, 0);

        for &key in &self.order {
            match self.parts[key].kind {
                PartKind::Wall {
                    is_length_wall: true,
                } => length_walls += 1,
                PartKind::Wall {
                    is_length_wall: false,
                } => width_walls += 1,
                PartKind::Floor => floors += 1,
                PartKind::Ceiling => ceilings += 1,
                kind @ (PartKind::Window | PartKind::Door | PartKind::Frame(_)) => {
                    return Err(Error::InvalidStructure(format!(
                        "{} part at top level",
                        kind.as_str()
                    )))
                }
            }
        }

        if floors != 1 || ceilings != 1 || length_walls != 2 || width_walls != 2 {
            return Err(Error::InvalidStructure(format!(
                "expected 1 floor, 1 ceiling, 2 length walls and 2 width walls; \
                 found {}, {}, {}, {}",
                floors, ceilings, length_walls, width_walls
            )));
        }

        for (_, part) in self.parts.iter() {
            let parent_kind = part.parent.and_then(|p| self.parts.get(p)).map(|p| p.kind);
            let ok = match part.kind {
                PartKind::Wall { .. } | PartKind::Floor | PartKind::Ceiling => {
                    parent_kind.is_none()
                }
                PartKind::Window | PartKind::Door => {
                    matches!(parent_kind, Some(PartKind::Wall { .. }))
                }
                PartKind::Frame(_) => matches!(parent_kind, Some(PartKind::Window)),
            };
            if !ok {
                return Err(Error::InvalidStructure(format!(
                    "{} part attached to {}",
                    part.kind.as_str(),
                    parent_kind.map(|k| k.as_str()).unwrap_or("the room")
                )));
            }
        }

        Ok(())
    }
}
