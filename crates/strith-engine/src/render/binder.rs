use crate::gpu::{GpuDevice, RenderEncoder, TextureIndex};

/// An extra resource binding run during a mesh's pre-render step.
///
/// Meshes hold a list of binders instead of being subclassed per resource kind, so
/// several textures (or other per-mesh resources) compose on the same mesh.
pub trait Binder<D: GpuDevice> {
    fn bind(&self, encoder: &mut D::Encoder);
}

/// Binds a texture to a fragment texture slot.
pub struct TextureBinder<D: GpuDevice> {
    texture: D::Texture,
    index: TextureIndex,
}

impl<D: GpuDevice> TextureBinder<D> {
    pub fn new(texture: D::Texture, index: TextureIndex) -> Self {
        Self { texture, index }
    }

    pub fn texture(&self) -> &D::Texture {
        &self.texture
    }

    pub fn index(&self) -> TextureIndex {
        self.index
    }
}

impl<D: GpuDevice> Binder<D> for TextureBinder<D> {
    fn bind(&self, encoder: &mut D::Encoder) {
        encoder.set_fragment_texture(&self.texture, self.index);
    }
}
