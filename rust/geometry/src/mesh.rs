// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data structures

use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

/// Triangle mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f32>,
    /// Vertex normals (nx, ny, nz)
    pub normals: Vec<f32>,
    /// Triangle indices (i0, i1, i2)
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Create a mesh with capacity
    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count * 3),
            normals: Vec::with_capacity(vertex_count * 3),
            indices: Vec::with_capacity(index_count),
        }
    }

    /// Axis-aligned box between `min` and `max`.
    ///
    /// Every face gets its own four vertices so normals stay flat; winding is
    /// counter-clockwise seen from outside.
    pub fn cuboid(min: Point3<f64>, max: Point3<f64>) -> Self {
        let mut mesh = Mesh::with_capacity(24, 36);

        // Corner i takes max on x, y, z for bits 0, 1, 2
        let corners: [Point3<f64>; 8] = std::array::from_fn(|i| {
            Point3::new(
                if i & 1 != 0 { max.x } else { min.x },
                if i & 2 != 0 { max.y } else { min.y },
                if i & 4 != 0 { max.z } else { min.z },
            )
        });

        // (normal, quad corners in CCW order seen along -normal)
        let faces = [
            (Vector3::new(0.0, 0.0, -1.0), [0, 2, 3, 1]),
            (Vector3::new(0.0, 0.0, 1.0), [4, 5, 7, 6]),
            (Vector3::new(-1.0, 0.0, 0.0), [0, 4, 6, 2]),
            (Vector3::new(1.0, 0.0, 0.0), [1, 3, 7, 5]),
            (Vector3::new(0.0, -1.0, 0.0), [0, 1, 5, 4]),
            (Vector3::new(0.0, 1.0, 0.0), [2, 6, 7, 3]),
        ];

        for (normal, quad) in faces {
            let base = mesh.vertex_count() as u32;
            for i in quad {
                mesh.add_vertex(corners[i], normal);
            }
            mesh.add_triangle(base, base + 1, base + 2);
            mesh.add_triangle(base, base + 2, base + 3);
        }

        mesh
    }

    /// Box of the given extents centered on `center`.
    pub fn centered_box(center: Point3<f64>, size: Vector3<f64>) -> Self {
        let half = size * 0.5;
        Self::cuboid(center - half, center + half)
    }

    /// Add a vertex with normal
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>, normal: Vector3<f64>) {
        self.positions.push(position.x as f32);
        self.positions.push(position.y as f32);
        self.positions.push(position.z as f32);

        self.normals.push(normal.x as f32);
        self.normals.push(normal.y as f32);
        self.normals.push(normal.z as f32);
    }

    /// Add a triangle
    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Merge another mesh into this one
    #[inline]
    pub fn merge(&mut self, other: &Mesh) {
        if other.is_empty() {
            return;
        }

        let vertex_offset = (self.positions.len() / 3) as u32;

        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.indices
            .extend(other.indices.iter().map(|&i| i + vertex_offset));
    }

    /// Vertex position in f64
    #[inline]
    pub fn position(&self, index: usize) -> Point3<f64> {
        Point3::new(
            self.positions[index * 3] as f64,
            self.positions[index * 3 + 1] as f64,
            self.positions[index * 3 + 2] as f64,
        )
    }

    /// Iterate over triangles as vertex position triples
    pub fn triangles(&self) -> impl Iterator<Item = [Point3<f64>; 3]> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            [
                self.position(tri[0] as usize),
                self.position(tri[1] as usize),
                self.position(tri[2] as usize),
            ]
        })
    }

    /// Return a copy with every vertex run through `matrix`.
    ///
    /// Normals use the inverse transpose so non-uniform scale keeps them
    /// perpendicular to their faces.
    pub fn transformed(&self, matrix: &Matrix4<f64>) -> Mesh {
        let linear: Matrix3<f64> = matrix.fixed_view::<3, 3>(0, 0).into_owned();
        let normal_matrix = linear
            .try_inverse()
            .map(|inv| inv.transpose())
            .unwrap_or(linear);

        let mut out = Mesh::with_capacity(self.vertex_count(), self.indices.len());
        for (p, n) in self
            .positions
            .chunks_exact(3)
            .zip(self.normals.chunks_exact(3))
        {
            let position =
                matrix.transform_point(&Point3::new(p[0] as f64, p[1] as f64, p[2] as f64));
            let normal = normal_matrix * Vector3::new(n[0] as f64, n[1] as f64, n[2] as f64);
            let normal = normal.try_normalize(1e-12).unwrap_or(normal);
            out.add_vertex(position, normal);
        }
        out.indices.extend_from_slice(&self.indices);
        out
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Calculate bounds (min, max)
    #[inline]
    pub fn bounds(&self) -> (Point3<f32>, Point3<f32>) {
        if self.is_empty() {
            return (Point3::origin(), Point3::origin());
        }

        let mut min = Point3::new(f32::MAX, f32::MAX, f32::MAX);
        let mut max = Point3::new(f32::MIN, f32::MIN, f32::MIN);

        self.positions.chunks_exact(3).for_each(|chunk| {
            min.x = min.x.min(chunk[0]);
            min.y = min.y.min(chunk[1]);
            min.z = min.z.min(chunk[2]);
            max.x = max.x.max(chunk[0]);
            max.y = max.y.max(chunk[1]);
            max.z = max.z.max(chunk[2]);
        });

        (min, max)
    }

    /// Size of the bounding box along each axis
    pub fn extent(&self) -> Vector3<f64> {
        let (min, max) = self.bounds();
        Vector3::new(
            (max.x - min.x) as f64,
            (max.y - min.y) as f64,
            (max.z - min.z) as f64,
        )
    }

    /// Enclosed volume via the divergence theorem.
    ///
    /// Only meaningful for closed, consistently wound meshes. Positive for
    /// outward-facing winding.
    pub fn signed_volume(&self) -> f64 {
        self.triangles()
            .map(|[a, b, c]| a.coords.dot(&b.coords.cross(&c.coords)) / 6.0)
            .sum()
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
