//! Sphere mesh generation
//!
//! Builds the UV sphere shared by every body. Rings run from the north pole
//! (+Y) to the south pole, and `u` wraps once around the Y axis, so an
//! equirectangular texture maps onto it directly. Triangles wind
//! counter-clockwise when seen from outside.

use orrery_core::SphereGeometry;
use std::f32::consts::{PI, TAU};

use crate::pipeline::Vertex;

/// CPU-side mesh data, ready for upload
#[derive(Clone, Debug)]
pub struct SphereMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl SphereMesh {
    /// Generate the mesh for `geometry`
    ///
    /// Segment counts below the minimum (3 around, 2 pole to pole) are raised.
    pub fn new(geometry: &SphereGeometry) -> Self {
        let width = geometry.width_segments.max(3);
        let height = geometry.height_segments.max(2);
        let radius = geometry.radius;

        let mut vertices = Vec::with_capacity(((width + 1) * (height + 1)) as usize);
        for iy in 0..=height {
            let v = iy as f32 / height as f32;
            let (sin_phi, cos_phi) = (v * PI).sin_cos();

            for ix in 0..=width {
                let u = ix as f32 / width as f32;
                let (sin_theta, cos_theta) = (u * TAU).sin_cos();

                let normal = [-cos_theta * sin_phi, cos_phi, sin_theta * sin_phi];
                let position = normal.map(|c| c * radius);
                vertices.push(Vertex::new(position, normal, [u, v]));
            }
        }

        let row = width + 1;
        let mut indices = Vec::with_capacity((width * height * 6) as usize);
        for iy in 0..height {
            for ix in 0..width {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;

                // Pole rows collapse to a single triangle per segment
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self { vertices, indices }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_counts() {
        let mesh = SphereMesh::new(&SphereGeometry::default());
        // (32 + 1) * (32 + 1) vertices, two triangles per quad minus one per pole segment
        assert_eq!(mesh.vertex_count(), 33 * 33);
        assert_eq!(mesh.triangle_count(), 32 * 32 * 2 - 2 * 32);
    }

    #[test]
    fn test_vertices_on_sphere() {
        let mesh = SphereMesh::new(&SphereGeometry { radius: 2.5, width_segments: 8, height_segments: 6 });
        for v in &mesh.vertices {
            let p = Vec3::from(v.position);
            assert!((p.length() - 2.5).abs() < 1e-4);
            let n = Vec3::from(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-4);
            assert!((p.normalize() - n).length() < 1e-4);
        }
    }

    #[test]
    fn test_indices_in_range() {
        let mesh = SphereMesh::new(&SphereGeometry::new(12, 9));
        let max = mesh.vertex_count() as u32;
        assert!(mesh.indices.iter().all(|&i| i < max));
        assert_eq!(mesh.index_count() % 3, 0);
    }

    #[test]
    fn test_triangles_face_outward() {
        let mesh = SphereMesh::new(&SphereGeometry::new(16, 12));
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from(mesh.vertices[i as usize].position));
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0, "inward triangle {:?}", tri);
        }
    }

    #[test]
    fn test_uv_range() {
        let mesh = SphereMesh::new(&SphereGeometry::new(8, 8));
        for v in &mesh.vertices {
            assert!((0.0..=1.0).contains(&v.uv[0]));
            assert!((0.0..=1.0).contains(&v.uv[1]));
        }
        // North pole at v = 0
        assert_eq!(mesh.vertices[0].uv[1], 0.0);
        assert!((mesh.vertices[0].position[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_segments_raised() {
        let mesh = SphereMesh::new(&SphereGeometry::new(0, 0));
        assert_eq!(mesh.vertex_count(), 4 * 3);
        assert!(mesh.triangle_count() > 0);
    }
}
