use glam::{Mat2, Vec2};
use thiserror::Error;

use crate::gpu::{BackendError, BufferIndex, GpuDevice, RenderEncoder, TextureIndex, Topology};
use crate::logging::Log;

use super::binder::{Binder, TextureBinder};
use super::renderable::Renderable;
use super::uniforms::Uniforms;
use super::vertex::{quad_vertices, Vertex};

/// Default half-extent for [`Mesh::quad`] in clip units.
pub const DEFAULT_QUAD_SCALE: f32 = 0.5;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    #[error("mesh has no vertices")]
    Empty,
    #[error("{0} vertices exceed the drawable vertex range")]
    TooManyVertices(usize),
    #[error("failed to create vertex buffer object")]
    VertexBuffer(#[source] BackendError),
    #[error("unable to load texture")]
    Texture(#[source] BackendError),
}

/// A 2D mesh: an immutable GPU vertex buffer plus per-mesh uniforms.
///
/// `pre_render` binds the vertex buffer and pushes the uniforms, then runs the attached
/// binders in insertion order. `render` draws the full vertex range once.
pub struct Mesh<D: GpuDevice> {
    vertices: Vec<Vertex>,
    vertex_count: u32,
    vertex_buffer: D::Buffer,
    uniforms: Uniforms,
    topology: Topology,
    binders: Vec<Box<dyn Binder<D>>>,
}

impl<D: GpuDevice> Mesh<D> {
    /// Uploads `vertices` into a new vertex buffer.
    pub fn new(
        device: &D,
        log: &Log,
        topology: Topology,
        vertices: impl Into<Vec<Vertex>>,
    ) -> Result<Self, MeshError> {
        let vertices = vertices.into();
        if vertices.is_empty() {
            log.mesh_error(MeshError::Empty);
            return Err(MeshError::Empty);
        }
        let vertex_count = drawable_count(vertices.len()).inspect_err(|e| log.mesh_error(e))?;

        let vertex_buffer = device
            .make_vertex_buffer("strith mesh vbo", bytemuck::cast_slice(&vertices))
            .map_err(|e| {
                log.mesh_error(format!("Failed to create vertex buffer object: {e}"));
                MeshError::VertexBuffer(e)
            })?;

        Ok(Self {
            vertices,
            vertex_count,
            vertex_buffer,
            uniforms: Uniforms::default(),
            topology,
            binders: Vec::new(),
        })
    }

    /// Like [`Mesh::new`], sampling `texture_name` at `texture_index`.
    ///
    /// The texture is decoded before the vertex buffer is allocated; if it fails no
    /// GPU memory is committed for the mesh.
    pub fn textured(
        device: &D,
        log: &Log,
        texture_name: &str,
        texture_index: TextureIndex,
        topology: Topology,
        vertices: impl Into<Vec<Vertex>>,
    ) -> Result<Self, MeshError> {
        let binder = load_texture_binder(device, log, texture_name, texture_index)?;
        Ok(Self::new(device, log, topology, vertices)?.with_binder(binder))
    }

    /// Two-triangle quad covering `[-scale, scale]²`.
    pub fn quad(device: &D, log: &Log, scale: f32) -> Result<Self, MeshError> {
        Self::new(device, log, Topology::Triangle, quad_vertices(scale))
    }

    pub fn textured_quad(
        device: &D,
        log: &Log,
        texture_name: &str,
        texture_index: TextureIndex,
        scale: f32,
    ) -> Result<Self, MeshError> {
        Self::textured(
            device,
            log,
            texture_name,
            texture_index,
            Topology::Triangle,
            quad_vertices(scale),
        )
    }

    /// Appends a binder run after the built-in bindings.
    pub fn with_binder(mut self, binder: impl Binder<D> + 'static) -> Self {
        self.binders.push(Box::new(binder));
        self
    }

    /// Loads another texture and binds it at `index`.
    pub fn with_texture(
        self,
        device: &D,
        log: &Log,
        texture_name: &str,
        index: TextureIndex,
    ) -> Result<Self, MeshError> {
        let binder = load_texture_binder(device, log, texture_name, index)?;
        Ok(self.with_binder(binder))
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn vertex_buffer(&self) -> &D::Buffer {
        &self.vertex_buffer
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn binder_count(&self) -> usize {
        self.binders.len()
    }

    pub fn uniforms(&self) -> &Uniforms {
        &self.uniforms
    }

    pub fn set_offset(&mut self, offset: Vec2) {
        self.uniforms.set_offset(offset);
    }

    pub fn set_transform(&mut self, transform: Mat2) {
        self.uniforms.set_transform(transform);
    }
}

impl<D: GpuDevice> Renderable<D> for Mesh<D> {
    fn pre_render(&self, encoder: &mut D::Encoder) {
        encoder.set_vertex_buffer(&self.vertex_buffer, BufferIndex::VertexData);
        encoder.set_uniform_bytes(self.uniforms.as_bytes(), BufferIndex::MeshUniforms);
        for binder in &self.binders {
            binder.bind(encoder);
        }
    }

    fn render(&self, encoder: &mut D::Encoder) {
        encoder.draw(self.topology, 0..self.vertex_count());
    }
}

/// Draw ranges are `u32`; longer vertex lists cannot be drawn in one call.
fn drawable_count(len: usize) -> Result<u32, MeshError> {
    u32::try_from(len).map_err(|_| MeshError::TooManyVertices(len))
}

fn load_texture_binder<D: GpuDevice>(
    device: &D,
    log: &Log,
    texture_name: &str,
    index: TextureIndex,
) -> Result<TextureBinder<D>, MeshError> {
    match device.load_texture(texture_name) {
        Ok(texture) => Ok(TextureBinder::new(texture, index)),
        Err(e) => {
            log.mesh_error(format!("Unable to load texture. Error info: {e}"));
            Err(MeshError::Texture(e))
        }
    }
}
