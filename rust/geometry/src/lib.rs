// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room-Lite Geometry
//!
//! Scene primitives for the room engine: triangle meshes, box construction,
//! polygon triangulation and CSG solids backed by csgrs, with nalgebra for
//! transformations.

pub mod csg;
pub mod error;
pub mod mesh;
pub mod triangulation;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point2, Point3, Vector3};

pub use csg::{subtract_mesh, CsgrsKernel, SolidKernel};
pub use error::{Error, Result};
pub use mesh::Mesh;
pub use triangulation::{calculate_polygon_normal, project_to_2d, triangulate_polygon};
