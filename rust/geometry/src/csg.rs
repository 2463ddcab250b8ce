// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CSG (Constructive Solid Geometry) Operations
//!
//! The room engine only needs three capabilities from a boolean library:
//! turn a mesh into a solid, subtract one solid from another, and turn the
//! result back into a mesh. [`SolidKernel`] is that seam; [`CsgrsKernel`]
//! implements it on top of csgrs.

use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::triangulation::{calculate_polygon_normal, project_to_2d, triangulate_polygon};
use nalgebra::{Matrix4, Point3};

/// Boolean solid operations used for cutting openings.
///
/// `from_mesh` maps the mesh through `transform` into the kernel's working
/// frame; `to_mesh` applies the inverse of its `transform` on the way out, so
/// passing the same matrix to both round-trips a mesh back into its own frame.
pub trait SolidKernel: Send + Sync {
    type Solid;

    fn from_mesh(&self, mesh: &Mesh, transform: &Matrix4<f64>) -> Result<Self::Solid>;

    fn subtract(&self, base: &Self::Solid, cutter: &Self::Solid) -> Self::Solid;

    fn to_mesh(&self, solid: &Self::Solid, transform: &Matrix4<f64>) -> Result<Mesh>;
}

/// Solid representation used by [`CsgrsKernel`]
pub type CsgSolid = csgrs::mesh::Mesh<()>;

/// BSP-tree CSG backed by csgrs
#[derive(Debug, Clone, Copy, Default)]
pub struct CsgrsKernel;

impl CsgrsKernel {
    pub fn new() -> Self {
        Self
    }
}

impl SolidKernel for CsgrsKernel {
    type Solid = CsgSolid;

    fn from_mesh(&self, mesh: &Mesh, transform: &Matrix4<f64>) -> Result<CsgSolid> {
        use csgrs::mesh::{polygon::Polygon, vertex::Vertex};

        let mut polygons = Vec::with_capacity(mesh.triangle_count());

        for [a, b, c] in mesh.triangles() {
            let v0 = transform.transform_point(&a);
            let v1 = transform.transform_point(&b);
            let v2 = transform.transform_point(&c);

            // Zero-area triangles would poison the BSP with NaN planes
            let face_normal = match (v1 - v0).cross(&(v2 - v0)).try_normalize(1e-10) {
                Some(n) => n,
                None => continue,
            };

            let vertices = vec![
                Vertex::new(v0, face_normal),
                Vertex::new(v1, face_normal),
                Vertex::new(v2, face_normal),
            ];
            polygons.push(Polygon::new(vertices, None));
        }

        Ok(CsgSolid::from_polygons(&polygons, None))
    }

    fn subtract(&self, base: &CsgSolid, cutter: &CsgSolid) -> CsgSolid {
        use csgrs::traits::CSG;

        if cutter.polygons.is_empty() {
            return base.clone();
        }
        base.difference(cutter)
    }

    fn to_mesh(&self, solid: &CsgSolid, transform: &Matrix4<f64>) -> Result<Mesh> {
        let inverse = transform.try_inverse().ok_or_else(|| {
            Error::InvalidSolid("output transform is not invertible".to_string())
        })?;

        let mut mesh = Mesh::new();
        let mut skipped = 0usize;

        for polygon in &solid.polygons {
            let vertices = &polygon.vertices;
            if vertices.len() < 3 {
                skipped += 1;
                continue;
            }

            let points: Vec<Point3<f64>> = vertices.iter().map(|v| v.pos).collect();

            // Trust the polygon's own normal unless it is unusable
            let normal = match vertices[0].normal.try_normalize(1e-10) {
                Some(n) if n.iter().all(|c| c.is_finite()) => n,
                _ => calculate_polygon_normal(&points),
            };

            let indices = if points.len() == 3 {
                vec![0, 1, 2]
            } else {
                let (points_2d, _, _, _) = project_to_2d(&points, &normal);
                match triangulate_polygon(&points_2d) {
                    Ok(idx) => idx,
                    Err(_) => {
                        skipped += 1;
                        continue;
                    }
                }
            };

            let base = mesh.vertex_count() as u32;
            for p in &points {
                mesh.add_vertex(*p, normal);
            }

            for tri in indices.chunks_exact(3) {
                let (i0, i1, i2) = (tri[0], tri[1], tri[2]);
                let winding = (points[i1] - points[i0]).cross(&(points[i2] - points[i0]));
                // Keep every triangle facing the same way as its polygon
                if winding.dot(&normal) < 0.0 {
                    mesh.add_triangle(base + i0 as u32, base + i2 as u32, base + i1 as u32);
                } else {
                    mesh.add_triangle(base + i0 as u32, base + i1 as u32, base + i2 as u32);
                }
            }
        }

        if skipped > 0 {
            tracing::warn!(skipped, "dropped degenerate polygons from CSG result");
        }

        Ok(mesh.transformed(&inverse))
    }
}

/// Subtract `cutter` from `host`, both given in the same frame.
pub fn subtract_mesh<K: SolidKernel>(kernel: &K, host: &Mesh, cutter: &Mesh) -> Result<Mesh> {
    if host.is_empty() {
        return Err(Error::EmptyMesh("host mesh has no vertices".to_string()));
    }
    let identity = Matrix4::identity();
    let host_solid = kernel.from_mesh(host, &identity)?;
    let cutter_solid = kernel.from_mesh(cutter, &identity)?;
    kernel.to_mesh(&kernel.subtract(&host_solid, &cutter_solid), &identity)
}
