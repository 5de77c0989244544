use bytemuck::{Pod, Zeroable};
use glam::{Mat2, Vec2};

/// Uniform block shared by the camera (global) and each mesh.
///
/// Layout matches the WGSL `Uniforms` struct: `vec2 offset`, `vec2` padding,
/// column-major `mat2x2 transform`; 32 bytes.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Uniforms {
    pub offset: [f32; 2],
    pub _pad: [f32; 2],
    pub transform: [[f32; 2]; 2],
}

impl Uniforms {
    pub const SIZE: usize = std::mem::size_of::<Uniforms>();

    pub fn new(offset: Vec2, transform: Mat2) -> Self {
        Self {
            offset: offset.to_array(),
            _pad: [0.0; 2],
            transform: transform.to_cols_array_2d(),
        }
    }

    pub fn offset(&self) -> Vec2 {
        Vec2::from_array(self.offset)
    }

    pub fn transform(&self) -> Mat2 {
        Mat2::from_cols_array_2d(&self.transform)
    }

    pub fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset.to_array();
    }

    pub fn set_transform(&mut self, transform: Mat2) {
        self.transform = transform.to_cols_array_2d();
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

impl Default for Uniforms {
    fn default() -> Self {
        Self::new(Vec2::ZERO, Mat2::IDENTITY)
    }
}
