// mesh.rs - unit box and floor disc geometry
//
// Every frame surface is the same unit cube scaled by its model matrix, so one
// box mesh serves borders, artworks and controls.

use bytemuck::{Pod, Zeroable};
use std::f32::consts::TAU;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    fn push_quad(&mut self, corners: [[f32; 3]; 4], normal: [f32; 3]) {
        let base = self.vertices.len() as u32;
        // corners: bottom-left, bottom-right, top-right, top-left as seen from outside
        let uvs = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
        for (position, uv) in corners.into_iter().zip(uvs) {
            self.vertices.push(Vertex { position, normal, uv });
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

/// Axis-aligned cube from -0.5 to 0.5 with per-face normals. The +z face
/// carries the full texture the right way up.
pub fn build_unit_box() -> Mesh {
    let h = 0.5;
    let mut mesh = Mesh::default();

    // +z (front)
    mesh.push_quad([[-h, -h, h], [h, -h, h], [h, h, h], [-h, h, h]], [0.0, 0.0, 1.0]);
    // -z (back)
    mesh.push_quad([[h, -h, -h], [-h, -h, -h], [-h, h, -h], [h, h, -h]], [0.0, 0.0, -1.0]);
    // +x
    mesh.push_quad([[h, -h, h], [h, -h, -h], [h, h, -h], [h, h, h]], [1.0, 0.0, 0.0]);
    // -x
    mesh.push_quad([[-h, -h, -h], [-h, -h, h], [-h, h, h], [-h, h, -h]], [-1.0, 0.0, 0.0]);
    // +y
    mesh.push_quad([[-h, h, h], [h, h, h], [h, h, -h], [-h, h, -h]], [0.0, 1.0, 0.0]);
    // -y
    mesh.push_quad([[-h, -h, -h], [h, -h, -h], [h, -h, h], [-h, -h, h]], [0.0, -1.0, 0.0]);

    mesh
}

/// Flat disc in the xz plane facing +y.
pub fn build_disc(radius: f32, segments: usize) -> Mesh {
    let segments = segments.max(3);
    let mut mesh = Mesh::default();
    let up = [0.0, 1.0, 0.0];

    mesh.vertices.push(Vertex {
        position: [0.0, 0.0, 0.0],
        normal: up,
        uv: [0.5, 0.5],
    });
    for i in 0..=segments {
        let a = TAU * i as f32 / segments as f32;
        let (s, c) = a.sin_cos();
        mesh.vertices.push(Vertex {
            position: [radius * c, 0.0, radius * s],
            normal: up,
            uv: [0.5 + 0.5 * c, 0.5 + 0.5 * s],
        });
    }
    for i in 1..=segments as u32 {
        // counter-clockwise seen from above
        mesh.indices.extend_from_slice(&[0, i + 1, i]);
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn winding_normal(mesh: &Mesh, tri: &[u32]) -> Vec3 {
        let p = |i: u32| Vec3::from(mesh.vertices[i as usize].position);
        (p(tri[1]) - p(tri[0])).cross(p(tri[2]) - p(tri[0])).normalize()
    }

    #[test]
    fn box_has_six_outward_faces() {
        let mesh = build_unit_box();
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        for tri in mesh.indices.chunks(3) {
            let n = Vec3::from(mesh.vertices[tri[0] as usize].normal);
            assert!((winding_normal(&mesh, tri) - n).length() < 1e-5);
        }
    }

    #[test]
    fn box_fits_the_unit_cube() {
        let mesh = build_unit_box();
        for v in &mesh.vertices {
            assert!(v.position.iter().all(|c| c.abs() == 0.5));
        }
    }

    #[test]
    fn front_face_texture_is_upright() {
        let mesh = build_unit_box();
        let top_left = mesh.vertices[3];
        assert_eq!(top_left.position, [-0.5, 0.5, 0.5]);
        assert_eq!(top_left.uv, [0.0, 0.0]);
    }

    #[test]
    fn disc_faces_up() {
        let mesh = build_disc(40.0, 64);
        assert_eq!(mesh.vertices.len(), 66);
        assert_eq!(mesh.indices.len(), 64 * 3);
        for tri in mesh.indices.chunks(3) {
            assert!(winding_normal(&mesh, tri).y > 0.99);
        }
    }
}
