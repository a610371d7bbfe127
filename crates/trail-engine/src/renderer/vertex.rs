use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// One ribbon vertex as laid out in the vertex buffer.
/// 5 floats = 20 bytes stride: x, y, z, u, v.
///
/// `u` is 0 on the low edge and 1 on the high edge. `v` runs along the ribbon
/// for the current frame only, so it is not stable while the trail grows.
/// Both vertices of a pair take `v = low_index / (count - 1)`, which puts the
/// oldest pair at 0 and the newest at `(count - 2) / (count - 1)`, never 1.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RibbonVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl RibbonVertex {
    /// Number of floats per vertex.
    pub const FLOATS: usize = 5;
    /// Stride in bytes.
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4; // 20

    pub fn new(position: Vec3, uv: Vec2) -> Self {
        Self {
            position: position.to_array(),
            uv: uv.to_array(),
        }
    }

    /// Low-edge vertex (`u = 0`).
    pub fn low(position: Vec3, v: f32) -> Self {
        Self::new(position, Vec2::new(0.0, v))
    }

    /// High-edge vertex (`u = 1`).
    pub fn high(position: Vec3, v: f32) -> Self {
        Self::new(position, Vec2::new(1.0, v))
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn u(&self) -> f32 {
        self.uv[0]
    }

    pub fn v(&self) -> f32 {
        self.uv[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ribbon_vertex_is_5_floats() {
        assert_eq!(std::mem::size_of::<RibbonVertex>(), RibbonVertex::STRIDE_BYTES);
        assert_eq!(RibbonVertex::FLOATS, 5);
    }

    #[test]
    fn edge_constructors_set_u() {
        let low = RibbonVertex::low(Vec3::new(1.0, 2.0, 3.0), 0.25);
        let high = RibbonVertex::high(Vec3::ZERO, 0.25);
        assert_eq!(low.u(), 0.0);
        assert_eq!(high.u(), 1.0);
        assert_eq!(low.v(), high.v());
        assert_eq!(low.position(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn casts_to_flat_floats() {
        let verts = [RibbonVertex::high(Vec3::new(1.0, 2.0, 3.0), 0.5)];
        let floats: &[f32] = bytemuck::cast_slice(&verts);
        assert_eq!(floats, &[1.0, 2.0, 3.0, 1.0, 0.5]);
    }
}
