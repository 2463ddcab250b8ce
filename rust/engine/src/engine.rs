// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room transforms and opening cuts.
//!
//! Transforms mutate a [`RoomGroup`] in place. Opening cuts are computed from
//! a single wall part and returned as an [`OpeningCut`]; handing that to
//! [`RoomGroup::apply_opening`] is what actually swaps the wall geometry and
//! attaches the new parts.
//!
//! Scale the room before cutting openings: structural scale never touches
//! openings, so a hole cut for the old wall size is not resized with it.

use std::any::Any;
use std::f64::consts::FRAC_PI_2;
use std::panic::{self, AssertUnwindSafe};

use nalgebra::{Matrix4, Point3, Vector3};
use room_lite_geometry::{CsgrsKernel, Mesh, SolidKernel};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::group::RoomGroup;
use crate::part::{FrameSide, Material, OpeningKind, PartKey, PartKind, RoomPart, Transform};
use crate::settings::{MaterialSettings, Settings};
use crate::types::{Point3D, RoomDimensions};
use crate::validation::DimensionBounds;

/// Width of each window frame segment, in feet.
pub const FRAME_THICKNESS: f64 = 0.05;

/// How far frame segments extend through the wall.
const FRAME_DEPTH: f64 = 0.1;

/// Thickness of the glass pane placed in a window opening.
const PANE_DEPTH: f64 = 0.02;

/// Size and placement of an opening.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct OpeningConfig {
    pub width: f64,
    pub height: f64,
    /// Center of the opening in the wall frame (origin at the wall's bottom
    /// center). Windows default to the wall's mid-height; doors require it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point3D>,
}

impl OpeningConfig {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            position: None,
        }
    }

    pub fn at(mut self, position: impl Into<Point3D>) -> Self {
        self.position = Some(position.into());
        self
    }
}

/// The opening part with its frame segments. Frames are attached under the
/// opening when the assembly is applied to a room.
#[derive(Debug, Clone)]
pub struct OpeningAssembly {
    pub opening: RoomPart,
    pub frame: Vec<RoomPart>,
}

/// Result of cutting an opening into a wall.
///
/// Only valid for the wall state it was computed from: the room refuses it
/// once the wall has been rescaled or had its geometry replaced.
#[derive(Debug, Clone)]
pub struct OpeningCut {
    /// Replacement wall geometry, in the wall's unscaled geometry frame.
    pub subtracted_wall: Mesh,
    pub opening: OpeningAssembly,
    pub(crate) wall_scale: Vector3<f64>,
    pub(crate) wall_revision: u64,
}

impl OpeningCut {
    /// Wall scale the cut was computed for.
    pub fn wall_scale(&self) -> Vector3<f64> {
        self.wall_scale
    }

    /// True if `wall` is still in the state this cut was computed from.
    pub fn matches(&self, wall: &RoomPart) -> bool {
        wall.transform.scale == self.wall_scale && wall.revision == self.wall_revision
    }
}

/// Engine behavior derived from [`Settings`].
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    pub bounds: DimensionBounds,
    pub materials: MaterialSettings,
    pub check_opening_fit: bool,
}

impl EngineOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            bounds: settings.bounds,
            materials: settings.materials.clone(),
            check_opening_fit: settings.engine.check_opening_fit,
        }
    }
}

/// Applies transforms and cuts openings.
///
/// Stateless apart from its options: every operation takes the group or
/// wall it works on, and callers serialize edits to a given room.
#[derive(Debug, Clone)]
pub struct RoomTransformEngine<K = CsgrsKernel> {
    kernel: K,
    options: EngineOptions,
}

impl RoomTransformEngine<CsgrsKernel> {
    pub fn new(settings: &Settings) -> Self {
        Self::with_kernel(CsgrsKernel::new(), EngineOptions::from_settings(settings))
    }
}

impl Default for RoomTransformEngine<CsgrsKernel> {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl<K: SolidKernel> RoomTransformEngine<K> {
    pub fn with_kernel(kernel: K, options: EngineOptions) -> Self {
        Self { kernel, options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Place the room at `position`. Last call wins.
    pub fn move_to(&self, group: &mut RoomGroup, position: impl Into<Point3D>) {
        let position = position.into();
        tracing::debug!(x = position.x, y = position.y, z = position.z, "room moved");
        group.set_position(position.to_vector());
    }

    /// Set the room's yaw to `degrees`. Absolute: replaces any earlier yaw.
    pub fn rotate(&self, group: &mut RoomGroup, degrees: f64) {
        tracing::debug!(degrees, "room rotated");
        group.set_yaw(degrees.to_radians());
    }

    /// Scale walls, floor and ceiling to `dimensions`. No validation.
    pub fn scale(&self, group: &mut RoomGroup, dimensions: &RoomDimensions) {
        tracing::debug!(
            width = dimensions.width,
            length = dimensions.length,
            height = dimensions.height,
            "room scaled"
        );
        apply_scale(group, dimensions);
    }

    /// Move walls onto the room edges and the slabs to floor/ceiling height.
    pub fn layout(&self, group: &mut RoomGroup, dimensions: &RoomDimensions) {
        apply_layout(group, dimensions);
    }

    /// Validate, then scale and lay out. The room is untouched when the
    /// dimensions are out of bounds.
    pub fn resize(&self, group: &mut RoomGroup, dimensions: &RoomDimensions) -> Result<()> {
        self.options.bounds.validate(dimensions).into_result()?;
        self.scale(group, dimensions);
        self.layout(group, dimensions);
        Ok(())
    }

    /// Cut an opening into `wall`.
    ///
    /// The wall is sized by its current scale, the cavity box subtracted, and
    /// the result mapped back into the wall's geometry frame. Nothing in the
    /// wall or any room is modified.
    pub fn add_opening(
        &self,
        wall: &RoomPart,
        config: &OpeningConfig,
        kind: OpeningKind,
    ) -> Result<OpeningCut> {
        match wall.kind {
            PartKind::Wall { .. } => {}
            other @ (PartKind::Floor
            | PartKind::Ceiling
            | PartKind::Window
            | PartKind::Door
            | PartKind::Frame(_)) => return Err(Error::NotAWall(other)),
        }

        check_finite(wall, config)?;

        let wall_height = wall.sized_extent().y;
        let center = match (config.position, kind) {
            (Some(position), _) => position.to_vector(),
            (None, OpeningKind::Window) => Vector3::new(0.0, wall_height / 2.0, 0.0),
            (None, OpeningKind::Door) => return Err(Error::MissingDoorPosition),
        };

        let _span = tracing::debug_span!(
            "add_opening",
            kind = kind.as_str(),
            width = config.width,
            height = config.height
        )
        .entered();

        if self.options.check_opening_fit {
            check_fit(wall, config, &center)?;
        }

        let cavity = Mesh::centered_box(
            Point3::from(center),
            Vector3::new(config.width, config.height, kind.cut_depth()),
        );

        let sizing = Matrix4::new_nonuniform_scaling(&wall.transform.scale);
        let subtracted_wall = panic::catch_unwind(AssertUnwindSafe(|| {
            let wall_solid = self.kernel.from_mesh(&wall.geometry, &sizing)?;
            let cavity_solid = self.kernel.from_mesh(&cavity, &Matrix4::identity())?;
            let remaining = self.kernel.subtract(&wall_solid, &cavity_solid);
            self.kernel.to_mesh(&remaining, &sizing)
        }))
        .map_err(|payload| Error::KernelPanic(panic_message(payload.as_ref())))??;

        if subtracted_wall.is_empty() {
            if self.options.check_opening_fit {
                return Err(Error::DegenerateResult);
            }
            tracing::warn!("opening subtraction left the wall empty");
        }

        let opening = self.opening_part(config, kind, center);
        let frame = match kind {
            OpeningKind::Window => {
                window_frame(config.width, config.height, &self.options.materials.frame)
            }
            // Doors are solid panels
            OpeningKind::Door => Vec::new(),
        };

        tracing::debug!(
            triangles = subtracted_wall.triangle_count(),
            frame_segments = frame.len(),
            "opening cut"
        );

        Ok(OpeningCut {
            subtracted_wall,
            opening: OpeningAssembly { opening, frame },
            wall_scale: wall.transform.scale,
            wall_revision: wall.revision,
        })
    }

    /// [`Self::add_opening`] followed by [`RoomGroup::apply_opening`].
    pub fn cut_opening(
        &self,
        group: &mut RoomGroup,
        wall: PartKey,
        config: &OpeningConfig,
        kind: OpeningKind,
    ) -> Result<PartKey> {
        let cut = self.add_opening(group.get(wall)?, config, kind)?;
        group.apply_opening(wall, cut)
    }

    fn opening_part(
        &self,
        config: &OpeningConfig,
        kind: OpeningKind,
        center: Vector3<f64>,
    ) -> RoomPart {
        let (depth, material) = match kind {
            OpeningKind::Window => (PANE_DEPTH, &self.options.materials.window),
            OpeningKind::Door => (kind.cut_depth(), &self.options.materials.door),
        };
        let geometry = Mesh::centered_box(
            Point3::origin(),
            Vector3::new(config.width, config.height, depth),
        );
        RoomPart::new(kind.part_kind(), geometry, material.clone())
            .with_transform(Transform::from_position(center))
    }
}

/// Four frame segments around a `width` x `height` opening, positioned
/// relative to the opening center. Top/bottom span `width + 2 * FRAME_THICKNESS`,
/// left/right span `height + 2 * FRAME_THICKNESS`.
pub fn window_frame(width: f64, height: f64, material: &Material) -> Vec<RoomPart> {
    let t = FRAME_THICKNESS;
    FrameSide::ALL
        .into_iter()
        .map(|side| {
            let horizontal = Vector3::new(width + 2.0 * t, t, FRAME_DEPTH);
            let vertical = Vector3::new(t, height + 2.0 * t, FRAME_DEPTH);
            let (size, offset) = match side {
                FrameSide::Top => (horizontal, Vector3::new(0.0, height / 2.0, 0.0)),
                FrameSide::Bottom => (horizontal, Vector3::new(0.0, -height / 2.0, 0.0)),
                FrameSide::Left => (vertical, Vector3::new(-width / 2.0, 0.0, 0.0)),
                FrameSide::Right => (vertical, Vector3::new(width / 2.0, 0.0, 0.0)),
            };
            RoomPart::new(
                PartKind::Frame(side),
                Mesh::centered_box(Point3::origin(), size),
                material.clone(),
            )
            .with_transform(Transform::from_position(offset))
        })
        .collect()
}

/// NaN or infinite sizes poison the kernel's plane math.
fn check_finite(wall: &RoomPart, config: &OpeningConfig) -> Result<()> {
    if !wall.transform.scale.iter().all(|c| c.is_finite()) {
        return Err(Error::NonFiniteInput("wall scale"));
    }
    if !(config.width.is_finite() && config.height.is_finite()) {
        return Err(Error::NonFiniteInput("opening size"));
    }
    match config.position {
        Some(p) if !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()) => {
            Err(Error::NonFiniteInput("opening position"))
        }
        _ => Ok(()),
    }
}

/// Text of a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Opening rectangle must be non-empty and inside the wall face.
fn check_fit(wall: &RoomPart, config: &OpeningConfig, center: &Vector3<f64>) -> Result<()> {
    let (min, max) = wall.geometry.bounds();
    let scale = &wall.transform.scale;
    let (x0, x1) = (min.x as f64 * scale.x, max.x as f64 * scale.x);
    let (y0, y1) = (min.y as f64 * scale.y, max.y as f64 * scale.y);
    const EPS: f64 = 1e-6;

    let fits = config.width > 0.0
        && config.height > 0.0
        && center.x - config.width / 2.0 >= x0 - EPS
        && center.x + config.width / 2.0 <= x1 + EPS
        && center.y - config.height / 2.0 >= y0 - EPS
        && center.y + config.height / 2.0 <= y1 + EPS;

    if fits {
        Ok(())
    } else {
        Err(Error::OpeningOutOfBounds {
            width: config.width,
            height: config.height,
            wall_width: x1 - x0,
            wall_height: y1 - y0,
        })
    }
}

/// Per-kind structural scale. Openings and frames keep their absolute size.
pub(crate) fn apply_scale(group: &mut RoomGroup, dimensions: &RoomDimensions) {
    for part in group.parts_mut() {
        match part.kind {
            PartKind::Wall { is_length_wall } => {
                let span = if is_length_wall {
                    dimensions.length
                } else {
                    dimensions.width
                };
                part.transform.scale = Vector3::new(span, dimensions.height, 1.0);
            }
            PartKind::Floor | PartKind::Ceiling => {
                part.transform.scale.x = dimensions.width;
                part.transform.scale.z = dimensions.length;
            }
            PartKind::Window | PartKind::Door | PartKind::Frame(_) => {}
        }
    }
}

/// Width walls sit at `z = ∓length/2`, length walls at `x = ∓width/2` turned
/// a quarter around Y; slabs sit just below the floor line and just above the
/// ceiling line.
pub(crate) fn apply_layout(group: &mut RoomGroup, dimensions: &RoomDimensions) {
    let (mut width_walls, mut length_walls) = (0usize, 0usize);
    let side = |n: usize| if n % 2 == 0 { -1.0 } else { 1.0 };

    for part in group.parts_mut() {
        let slab_half = part.sized_extent().y / 2.0;
        match part.kind {
            PartKind::Wall {
                is_length_wall: false,
            } => {
                let z = side(width_walls) * dimensions.length / 2.0;
                part.transform.position = Vector3::new(0.0, 0.0, z);
                part.transform.rotation = Vector3::zeros();
                width_walls += 1;
            }
            PartKind::Wall {
                is_length_wall: true,
            } => {
                let x = side(length_walls) * dimensions.width / 2.0;
                part.transform.position = Vector3::new(x, 0.0, 0.0);
                part.transform.rotation = Vector3::new(0.0, FRAC_PI_2, 0.0);
                length_walls += 1;
            }
            PartKind::Floor => {
                part.transform.position = Vector3::new(0.0, -slab_half, 0.0);
            }
            PartKind::Ceiling => {
                part.transform.position = Vector3::new(0.0, dimensions.height + slab_half, 0.0);
            }
            PartKind::Window | PartKind::Door | PartKind::Frame(_) => {}
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Kernel whose boolean step always panics.
    #[derive(Debug, Clone, Copy)]
    pub(crate) struct PanickingKernel;

    impl SolidKernel for PanickingKernel {
        type Solid = ();

        fn from_mesh(&self, _: &Mesh, _: &Matrix4<f64>) -> room_lite_geometry::Result<()> {
            Ok(())
        }

        fn subtract(&self, _: &(), _: &()) {
            panic!("subtract hit a degenerate plane");
        }

        fn to_mesh(&self, _: &(), _: &Matrix4<f64>) -> room_lite_geometry::Result<Mesh> {
            Ok(Mesh::new())
        }
    }

    fn room(width: f64, length: f64, height: f64) -> RoomGroup {
        RoomGroup::build(&RoomDimensions::new(width, length, height), &Settings::default())
    }

    fn first_width_wall(group: &RoomGroup) -> PartKey {
        group
            .walls()
            .find(|(_, p)| p.is_length_wall() == Some(false))
            .map(|(k, _)| k)
            .unwrap()
    }

    #[test]
    fn scale_sets_wall_axes_by_orientation() {
        let engine = RoomTransformEngine::default();
        let mut group = room(12.0, 16.0, 9.0);
        engine.scale(&mut group, &RoomDimensions::new(10.0, 20.0, 8.0));

        for (_, wall) in group.walls() {
            let s = wall.transform.scale;
            match wall.is_length_wall() {
                Some(true) => assert_relative_eq!(s.x, 20.0),
                Some(false) => assert_relative_eq!(s.x, 10.0),
                None => unreachable!(),
            }
            assert_relative_eq!(s.y, 8.0);
            assert_relative_eq!(s.z, 1.0);
        }
    }

    #[test]
    fn scale_sets_slab_horizontal_axes_only() {
        let engine = RoomTransformEngine::default();
        let mut group = room(12.0, 16.0, 9.0);
        engine.scale(&mut group, &RoomDimensions::new(10.0, 20.0, 8.0));

        for (_, slab) in group.parts_of_kind(|k| matches!(k, PartKind::Floor | PartKind::Ceiling)) {
            assert_relative_eq!(slab.transform.scale.x, 10.0);
            assert_relative_eq!(slab.transform.scale.y, 1.0);
            assert_relative_eq!(slab.transform.scale.z, 20.0);
        }
    }

    #[test]
    fn scale_leaves_openings_alone() {
        let engine = RoomTransformEngine::default();
        let mut group = room(12.0, 16.0, 9.0);
        let wall = first_width_wall(&group);
        let window = engine
            .cut_opening(&mut group, wall, &OpeningConfig::new(2.0, 3.0), OpeningKind::Window)
            .unwrap();

        engine.scale(&mut group, &RoomDimensions::new(30.0, 40.0, 15.0));

        let opening = group.part(window).unwrap();
        assert_eq!(opening.transform.scale, Vector3::new(1.0, 1.0, 1.0));
        for &segment in group.children(window) {
            assert_eq!(group.part(segment).unwrap().transform.scale, Vector3::new(1.0, 1.0, 1.0));
        }
    }

    #[test]
    fn rotate_is_absolute() {
        let engine = RoomTransformEngine::default();
        let mut group = room(12.0, 16.0, 9.0);
        engine.rotate(&mut group, 45.0);
        engine.rotate(&mut group, 90.0);
        assert_relative_eq!(group.yaw(), FRAC_PI_2);
    }

    #[test]
    fn move_is_last_call_wins() {
        let engine = RoomTransformEngine::default();
        let mut group = room(12.0, 16.0, 9.0);
        engine.move_to(&mut group, [1.0, 2.0, 3.0]);
        engine.move_to(&mut group, [-4.0, 0.0, 7.5]);
        assert_eq!(group.position(), Vector3::new(-4.0, 0.0, 7.5));
    }

    #[test]
    fn resize_rejects_out_of_bounds_without_mutating() {
        let engine = RoomTransformEngine::default();
        let mut group = room(12.0, 16.0, 9.0);
        let before: Vec<_> = group.walls().map(|(_, w)| w.transform).collect();

        let err = engine
            .resize(&mut group, &RoomDimensions::new(4.0, 16.0, 9.0))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions(_)));

        let after: Vec<_> = group.walls().map(|(_, w)| w.transform).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn resize_relays_out_walls() {
        let engine = RoomTransformEngine::default();
        let mut group = room(12.0, 16.0, 9.0);
        engine
            .resize(&mut group, &RoomDimensions::new(20.0, 30.0, 10.0))
            .unwrap();

        for (_, wall) in group.walls() {
            let p = wall.transform.position;
            match wall.is_length_wall() {
                Some(true) => assert_relative_eq!(p.x.abs(), 10.0),
                Some(false) => assert_relative_eq!(p.z.abs(), 15.0),
                None => unreachable!(),
            }
        }
    }

    #[test]
    fn door_without_position_is_usage_error() {
        let engine = RoomTransformEngine::default();
        let group = room(12.0, 16.0, 9.0);
        let wall = group.get(first_width_wall(&group)).unwrap();
        let result = engine.add_opening(wall, &OpeningConfig::new(1.0, 2.0), OpeningKind::Door);
        assert!(matches!(result, Err(Error::MissingDoorPosition)));
    }

    #[test]
    fn openings_only_cut_walls() {
        let engine = RoomTransformEngine::default();
        let group = room(12.0, 16.0, 9.0);
        let (_, floor) = group.parts_of_kind(|k| *k == PartKind::Floor).next().unwrap();
        let result = engine.add_opening(floor, &OpeningConfig::new(1.0, 1.0), OpeningKind::Window);
        assert!(matches!(result, Err(Error::NotAWall(PartKind::Floor))));
    }

    #[test]
    fn window_defaults_to_mid_height() {
        let engine = RoomTransformEngine::default();
        let group = room(12.0, 16.0, 9.0);
        let wall = group.get(first_width_wall(&group)).unwrap();
        let cut = engine
            .add_opening(wall, &OpeningConfig::new(2.0, 4.0), OpeningKind::Window)
            .unwrap();
        let p = cut.opening.opening.transform.position;
        assert_relative_eq!(p.x, 0.0);
        assert_relative_eq!(p.y, 4.5);
        assert_eq!(cut.opening.frame.len(), 4);
    }

    #[test]
    fn door_has_no_frame() {
        let engine = RoomTransformEngine::default();
        let group = room(12.0, 16.0, 9.0);
        let wall = group.get(first_width_wall(&group)).unwrap();
        let cut = engine
            .add_opening(wall, &OpeningConfig::new(3.0, 7.0).at([2.0, 3.5, 0.0]), OpeningKind::Door)
            .unwrap();
        assert!(cut.opening.frame.is_empty());
        assert_eq!(cut.opening.opening.kind, PartKind::Door);
        assert_eq!(cut.opening.opening.transform.position, Vector3::new(2.0, 3.5, 0.0));
    }

    #[test]
    fn frame_spans_follow_opening_size() {
        let material = Material::new("frame", 0);
        for (w, h) in [(1.0, 1.0), (3.0, 2.0)] {
            let frame = window_frame(w, h, &material);
            assert_eq!(frame.len(), 4);
            for segment in &frame {
                let extent = segment.geometry.extent();
                let offset = segment.transform.position;
                match segment.kind {
                    PartKind::Frame(FrameSide::Top) | PartKind::Frame(FrameSide::Bottom) => {
                        assert_relative_eq!(extent.x, w + 0.1, epsilon = 1e-6);
                        assert_relative_eq!(extent.y, 0.05, epsilon = 1e-6);
                        assert_relative_eq!(offset.y.abs(), h / 2.0);
                    }
                    PartKind::Frame(FrameSide::Left) | PartKind::Frame(FrameSide::Right) => {
                        assert_relative_eq!(extent.y, h + 0.1, epsilon = 1e-6);
                        assert_relative_eq!(extent.x, 0.05, epsilon = 1e-6);
                        assert_relative_eq!(offset.x.abs(), w / 2.0);
                    }
                    other => panic!("unexpected part in frame: {:?}", other),
                }
            }
        }
    }

    #[test]
    fn fit_check_is_opt_in() {
        let group = room(12.0, 16.0, 9.0);
        let wall = group.get(first_width_wall(&group)).unwrap();
        let oversized = OpeningConfig::new(20.0, 4.0);

        let permissive = RoomTransformEngine::default();
        assert!(permissive.add_opening(wall, &oversized, OpeningKind::Window).is_ok());

        let mut settings = Settings::default();
        settings.engine.check_opening_fit = true;
        let strict = RoomTransformEngine::new(&settings);
        assert!(matches!(
            strict.add_opening(wall, &oversized, OpeningKind::Window),
            Err(Error::OpeningOutOfBounds { .. })
        ));
        assert!(matches!(
            strict.add_opening(wall, &OpeningConfig::new(0.0, 4.0), OpeningKind::Window),
            Err(Error::OpeningOutOfBounds { .. })
        ));
        assert!(strict
            .add_opening(wall, &OpeningConfig::new(2.0, 4.0), OpeningKind::Window)
            .is_ok());
    }

    #[test]
    fn non_finite_openings_are_rejected_without_fit_check() {
        let group = room(12.0, 16.0, 9.0);
        let wall = group.get(first_width_wall(&group)).unwrap();
        let engine = RoomTransformEngine::default();
        assert!(!engine.options().check_opening_fit);

        let cases = [
            (OpeningConfig::new(f64::NAN, 4.0), "opening size"),
            (OpeningConfig::new(2.0, f64::INFINITY), "opening size"),
            (OpeningConfig::new(f64::NEG_INFINITY, f64::NAN), "opening size"),
            (OpeningConfig::new(2.0, 4.0).at([f64::NAN, 4.0, 0.0]), "opening position"),
            (OpeningConfig::new(2.0, 4.0).at([0.0, f64::INFINITY, 0.0]), "opening position"),
        ];
        for (config, what) in cases {
            for kind in [OpeningKind::Window, OpeningKind::Door] {
                match engine.add_opening(wall, &config, kind) {
                    Err(Error::NonFiniteInput(field)) => assert_eq!(field, what),
                    other => panic!("expected NonFiniteInput, got {:?}", other.map(|_| ())),
                }
            }
        }
    }

    #[test]
    fn non_finite_wall_scale_is_rejected() {
        let mut group = room(12.0, 16.0, 9.0);
        let key = first_width_wall(&group);
        group.part_mut(key).unwrap().transform.scale.x = f64::NAN;
        let wall = group.get(key).unwrap();

        let mut settings = Settings::default();
        for check in [false, true] {
            settings.engine.check_opening_fit = check;
            let engine = RoomTransformEngine::new(&settings);
            assert!(matches!(
                engine.add_opening(wall, &OpeningConfig::new(2.0, 4.0), OpeningKind::Window),
                Err(Error::NonFiniteInput("wall scale"))
            ));
        }
    }

    #[test]
    fn kernel_panic_becomes_error() {
        let group = room(12.0, 16.0, 9.0);
        let wall = group.get(first_width_wall(&group)).unwrap();
        let engine = RoomTransformEngine::with_kernel(PanickingKernel, EngineOptions::default());

        match engine.add_opening(wall, &OpeningConfig::new(2.0, 4.0), OpeningKind::Window) {
            Err(Error::KernelPanic(message)) => {
                assert_eq!(message, "subtract hit a degenerate plane");
            }
            other => panic!("expected KernelPanic, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn cut_records_wall_state() {
        let mut group = room(12.0, 16.0, 9.0);
        let key = first_width_wall(&group);
        let engine = RoomTransformEngine::default();
        let config = OpeningConfig::new(2.0, 3.0);

        let cut = engine
            .add_opening(group.get(key).unwrap(), &config, OpeningKind::Window)
            .unwrap();
        assert_eq!(cut.wall_scale(), Vector3::new(12.0, 9.0, 1.0));
        assert!(cut.matches(group.get(key).unwrap()));

        engine.scale(&mut group, &RoomDimensions::new(10.0, 16.0, 9.0));
        assert!(!cut.matches(group.get(key).unwrap()));
    }

    #[test]
    fn second_cut_from_same_base_is_stale() {
        let mut group = room(12.0, 16.0, 9.0);
        let key = first_width_wall(&group);
        let engine = RoomTransformEngine::default();
        let wall = group.get(key).unwrap();

        let config = OpeningConfig::new(2.0, 3.0);
        let left = engine
            .add_opening(wall, &config.at([-3.0, 4.5, 0.0]), OpeningKind::Window)
            .unwrap();
        let right = engine
            .add_opening(wall, &config.at([3.0, 4.5, 0.0]), OpeningKind::Window)
            .unwrap();

        group.apply_opening(key, left).unwrap();
        assert_eq!(group.get(key).unwrap().revision(), 1);
        let after_left = group.get(key).unwrap().geometry.clone();

        // Applying the second would silently drop the first hole
        assert!(matches!(group.apply_opening(key, right), Err(Error::StaleOpening)));
        assert_eq!(group.get(key).unwrap().geometry, after_left);
        assert_eq!(group.children(key).len(), 1);
    }
}
