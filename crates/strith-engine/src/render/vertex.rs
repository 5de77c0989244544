use bytemuck::{Pod, Zeroable};

/// One 2D vertex as uploaded to the GPU.
///
/// Colour defaults to opaque white and the texture coordinate to the origin, so
/// untextured and uncoloured meshes both render with the fallback white texture.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
    pub tex_coord: [f32; 2],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x4, // color
        2 => Float32x2  // tex_coord
    ];

    pub const STRIDE: usize = std::mem::size_of::<Vertex>();

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self {
            position: [x, y],
            color: [1.0, 1.0, 1.0, 1.0],
            tex_coord: [0.0, 0.0],
        }
    }

    #[inline]
    pub const fn with_color(mut self, r: f32, g: f32, b: f32, a: f32) -> Self {
        self.color = [r, g, b, a];
        self
    }

    #[inline]
    pub const fn with_tex_coord(mut self, u: f32, v: f32) -> Self {
        self.tex_coord = [u, v];
        self
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: Self::STRIDE as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Two triangles covering `[-scale, scale]²`, with texture coordinates flipped so
/// image row 0 lands at the top.
pub fn quad_vertices(scale: f32) -> [Vertex; 6] {
    [
        Vertex::new(-scale, -scale).with_tex_coord(0.0, 1.0),
        Vertex::new(scale, -scale).with_tex_coord(1.0, 1.0),
        Vertex::new(-scale, scale).with_tex_coord(0.0, 0.0),
        Vertex::new(scale, scale).with_tex_coord(1.0, 0.0),
        Vertex::new(scale, -scale).with_tex_coord(1.0, 1.0),
        Vertex::new(-scale, scale).with_tex_coord(0.0, 0.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_matches_attribute_layout() {
        // 2 + 4 + 2 floats, tightly packed.
        assert_eq!(Vertex::STRIDE, 32);
        let layout = Vertex::layout();
        assert_eq!(layout.attributes[1].offset, 8);
        assert_eq!(layout.attributes[2].offset, 24);
    }

    #[test]
    fn defaults_are_white_and_untextured() {
        let v = Vertex::new(0.25, -0.5);
        assert_eq!(v.color, [1.0; 4]);
        assert_eq!(v.tex_coord, [0.0, 0.0]);
    }

    #[test]
    fn quad_spans_the_requested_scale() {
        let q = quad_vertices(0.75);
        for v in q {
            assert_eq!(v.position[0].abs(), 0.75);
            assert_eq!(v.position[1].abs(), 0.75);
        }
        // Bottom-left samples the bottom of the image.
        assert_eq!(q[0].tex_coord, [0.0, 1.0]);
    }
}
