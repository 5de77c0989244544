//! `gpu` traits implemented on wgpu.
//!
//! Mapping:
//! - library: one WGSL shader module; functions are its `@vertex` / `@fragment` entry points
//! - pipeline state: one render pipeline per [`Topology`], sharing a layout of
//!   `[global uniforms, mesh uniforms, color texture, detail texture]`
//! - command buffer: a `wgpu::CommandEncoder`; render encoder: a single render pass
//! - uniform pushes: copied into a per-frame arena and bound with a dynamic offset

use std::cell::RefCell;
use std::num::NonZeroU64;
use std::ops::Range;
use std::rc::Rc;

use wgpu::util::DeviceExt;

use crate::gpu::{
    BackendError, BackendResult, BufferIndex, CommandBuffer, CommandQueue, GpuDevice,
    PipelineDescriptor, RenderEncoder, ShaderSource, TextureIndex, Topology,
};
use crate::render::{Uniforms, Vertex};

use super::arena::{uniform_stride, UniformArena};
use super::texture::{TextureBinding, TextureLoader, WgpuTexture};

/// Bind group index of the first texture slot.
const TEXTURE_GROUP_BASE: u32 = 2;

struct DeviceShared {
    device: wgpu::Device,
    queue: wgpu::Queue,
    uniform_layout: wgpu::BindGroupLayout,
    textures: TextureBinding,
    neutral: WgpuTexture,
    arena: RefCell<UniformArena>,
    loader: TextureLoader,
}

/// wgpu-backed [`GpuDevice`]. Clones share the same device, queue and uniform arena.
#[derive(Clone)]
pub struct WgpuDevice {
    shared: Rc<DeviceShared>,
}

impl WgpuDevice {
    pub(crate) fn new(
        device: wgpu::Device,
        queue: wgpu::Queue,
        loader: TextureLoader,
        uniform_slots: u32,
    ) -> Self {
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("strith uniforms bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(Uniforms::SIZE as u64),
                },
                count: None,
            }],
        });

        let textures = TextureBinding::new(&device);
        let neutral = textures.neutral(&device, &queue);

        let stride = uniform_stride(device.limits().min_uniform_buffer_offset_alignment);
        let arena = UniformArena::new(&device, &uniform_layout, stride, uniform_slots);

        Self {
            shared: Rc::new(DeviceShared {
                device,
                queue,
                uniform_layout,
                textures,
                neutral,
                arena: RefCell::new(arena),
                loader,
            }),
        }
    }

    pub fn raw(&self) -> &wgpu::Device {
        &self.shared.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.shared.queue
    }

    pub fn texture_loader(&self) -> &TextureLoader {
        &self.shared.loader
    }

    /// Runs `f` inside a wgpu error scope and reports the first captured error.
    fn scoped<T>(&self, filter: wgpu::ErrorFilter, f: impl FnOnce() -> T) -> (T, Option<wgpu::Error>) {
        let scope = self.shared.device.push_error_scope(filter);
        let value = f();
        let err = pollster::block_on(scope.pop());
        (value, err)
    }
}

impl std::fmt::Debug for WgpuDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WgpuDevice").finish_non_exhaustive()
    }
}

/// Shader stage an entry point was declared for.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Compute,
}

/// Compiled shader module plus its entry points.
pub struct WgpuLibrary {
    module: Rc<wgpu::ShaderModule>,
    entry_points: Vec<(ShaderStage, String)>,
}

/// One entry point of a [`WgpuLibrary`].
#[derive(Clone)]
pub struct WgpuFunction {
    module: Rc<wgpu::ShaderModule>,
    name: String,
    stage: ShaderStage,
}

impl WgpuFunction {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }
}

/// Render pipeline variants, one per topology.
pub struct WgpuPipeline {
    label: String,
    variants: Rc<Vec<wgpu::RenderPipeline>>,
}

impl WgpuPipeline {
    pub fn label(&self) -> &str {
        &self.label
    }
}

pub struct WgpuBuffer {
    buffer: wgpu::Buffer,
    len: u64,
}

impl WgpuBuffer {
    /// Size in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Render target plus how to load it. Swapchain images are presented on commit.
pub struct WgpuDrawable {
    pub(crate) surface_texture: Option<wgpu::SurfaceTexture>,
    pub(crate) view: wgpu::TextureView,
    pub(crate) clear: wgpu::Color,
}

impl GpuDevice for WgpuDevice {
    type Queue = WgpuQueue;
    type Library = WgpuLibrary;
    type Function = WgpuFunction;
    type Pipeline = WgpuPipeline;
    type Buffer = WgpuBuffer;
    type Texture = WgpuTexture;
    type Encoder = WgpuEncoder;
    type Drawable = WgpuDrawable;

    fn make_command_queue(&self) -> BackendResult<Self::Queue> {
        Ok(WgpuQueue {
            shared: self.shared.clone(),
        })
    }

    fn make_library(&self, source: &ShaderSource) -> BackendResult<Self::Library> {
        let ShaderSource::Wgsl(src) = source;

        let entry_points = scan_entry_points(src);
        if entry_points.is_empty() {
            return Err(BackendError::Library("no entry points declared".into()));
        }

        let (module, err) = self.scoped(wgpu::ErrorFilter::Validation, || {
            self.shared.device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("strith shader library"),
                source: wgpu::ShaderSource::Wgsl(src.clone()),
            })
        });
        if let Some(e) = err {
            return Err(BackendError::Library(e.to_string()));
        }

        Ok(WgpuLibrary {
            module: Rc::new(module),
            entry_points,
        })
    }

    fn make_function(&self, library: &Self::Library, name: &str) -> BackendResult<Self::Function> {
        let (stage, _) = library
            .entry_points
            .iter()
            .find(|(_, n)| n == name)
            .ok_or_else(|| BackendError::FunctionNotFound(name.to_string()))?;

        Ok(WgpuFunction {
            module: library.module.clone(),
            name: name.to_string(),
            stage: *stage,
        })
    }

    fn make_pipeline_state(
        &self,
        descriptor: &PipelineDescriptor<Self::Function>,
    ) -> BackendResult<Self::Pipeline> {
        let vertex = expect_stage(descriptor.vertex_function.as_ref(), ShaderStage::Vertex)?;
        let fragment = expect_stage(descriptor.fragment_function.as_ref(), ShaderStage::Fragment)?;

        let shared = &self.shared;
        let layout = shared.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("strith pipeline layout"),
            bind_group_layouts: &[
                &shared.uniform_layout,
                &shared.uniform_layout,
                shared.textures.layout(),
                shared.textures.layout(),
            ],
            immediate_size: 0,
        });

        let (variants, err) = self.scoped(wgpu::ErrorFilter::Validation, || {
            Topology::ALL
                .iter()
                .map(|&topology| {
                    shared.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                        label: Some(descriptor.label.as_str()),
                        layout: Some(&layout),
                        vertex: wgpu::VertexState {
                            module: &vertex.module,
                            entry_point: Some(vertex.name.as_str()),
                            compilation_options: Default::default(),
                            buffers: &[Vertex::layout()],
                        },
                        fragment: Some(wgpu::FragmentState {
                            module: &fragment.module,
                            entry_point: Some(fragment.name.as_str()),
                            compilation_options: Default::default(),
                            targets: &[Some(wgpu::ColorTargetState {
                                format: descriptor.color_format,
                                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                                write_mask: wgpu::ColorWrites::ALL,
                            })],
                        }),
                        primitive: wgpu::PrimitiveState {
                            topology: primitive_topology(topology),
                            strip_index_format: None,
                            front_face: wgpu::FrontFace::Ccw,
                            cull_mode: None,
                            polygon_mode: wgpu::PolygonMode::Fill,
                            unclipped_depth: false,
                            conservative: false,
                        },
                        depth_stencil: None,
                        multisample: wgpu::MultisampleState::default(),
                        multiview_mask: None,
                        cache: None,
                    })
                })
                .collect::<Vec<_>>()
        });
        if let Some(e) = err {
            return Err(BackendError::PipelineCompilation(e.to_string()));
        }

        Ok(WgpuPipeline {
            label: descriptor.label.clone(),
            variants: Rc::new(variants),
        })
    }

    fn make_vertex_buffer(&self, label: &str, contents: &[u8]) -> BackendResult<Self::Buffer> {
        if contents.is_empty() {
            return Err(BackendError::BufferAllocation("zero-sized buffer".into()));
        }

        let len = contents.len() as u64;
        let max = self.shared.device.limits().max_buffer_size;
        if len > max {
            return Err(BackendError::BufferAllocation(format!(
                "{len} bytes exceeds the device limit of {max}"
            )));
        }

        let ((buffer, invalid), oom) = self.scoped(wgpu::ErrorFilter::OutOfMemory, || {
            self.scoped(wgpu::ErrorFilter::Validation, || {
                self.shared.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(label),
                    contents,
                    usage: wgpu::BufferUsages::VERTEX,
                })
            })
        });
        if let Some(e) = invalid.or(oom) {
            return Err(BackendError::BufferAllocation(e.to_string()));
        }

        Ok(WgpuBuffer { buffer, len })
    }

    fn load_texture(&self, name: &str) -> BackendResult<Self::Texture> {
        let image = self.shared.loader.load_rgba(name)?;
        let shared = &self.shared;

        let (width, height) = image.dimensions();
        let max = shared.device.limits().max_texture_dimension_2d;
        if width > max || height > max {
            return Err(BackendError::Texture {
                name: name.to_string(),
                reason: format!("{width}x{height} exceeds the device limit of {max}"),
            });
        }

        let (texture, err) = self.scoped(wgpu::ErrorFilter::Validation, || {
            shared.textures.upload(&shared.device, &shared.queue, name, &image)
        });
        match err {
            Some(e) => Err(BackendError::Texture {
                name: name.to_string(),
                reason: e.to_string(),
            }),
            None => Ok(texture),
        }
    }
}

pub struct WgpuQueue {
    shared: Rc<DeviceShared>,
}

impl CommandQueue<WgpuDevice> for WgpuQueue {
    type CommandBuffer = WgpuCommandBuffer;

    fn make_command_buffer(&self) -> Option<Self::CommandBuffer> {
        let shared = &self.shared;
        shared.arena.borrow_mut().begin_frame();

        let encoder = shared
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("strith frame encoder"),
            });

        Some(WgpuCommandBuffer {
            shared: shared.clone(),
            encoder,
            presenting: None,
        })
    }
}

pub struct WgpuCommandBuffer {
    shared: Rc<DeviceShared>,
    encoder: wgpu::CommandEncoder,
    presenting: Option<wgpu::SurfaceTexture>,
}

impl CommandBuffer<WgpuDevice> for WgpuCommandBuffer {
    fn make_render_encoder(&mut self, drawable: &WgpuDrawable) -> Option<WgpuEncoder> {
        let pass = self
            .encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("strith render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &drawable.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(drawable.clear),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            })
            .forget_lifetime();

        Some(WgpuEncoder {
            shared: self.shared.clone(),
            pass,
            pipeline: None,
            topology: Topology::default(),
            textured: [false; TextureIndex::COUNT as usize],
            uniforms: [false; 2],
        })
    }

    fn end_encoding(&mut self, encoder: WgpuEncoder) {
        // Dropping the pass ends it; the command encoder is usable again afterwards.
        drop(encoder);
    }

    fn present(&mut self, drawable: WgpuDrawable) {
        self.presenting = drawable.surface_texture;
    }

    fn commit(self) {
        self.shared.queue.submit(std::iter::once(self.encoder.finish()));
        if let Some(surface_texture) = self.presenting {
            surface_texture.present();
        }
    }
}

/// One render pass.
///
/// Texture slots a mesh does not bind read the neutral white texture; binding a new
/// vertex buffer resets slots the previous mesh changed. Draws are skipped while either
/// uniform group lacks a block pushed in this pass.
pub struct WgpuEncoder {
    shared: Rc<DeviceShared>,
    pass: wgpu::RenderPass<'static>,
    pipeline: Option<Rc<Vec<wgpu::RenderPipeline>>>,
    topology: Topology,
    textured: [bool; TextureIndex::COUNT as usize],
    uniforms: [bool; 2],
}

impl WgpuEncoder {
    fn bind_neutral(&mut self, slot: u32) {
        self.pass.set_bind_group(
            TEXTURE_GROUP_BASE + slot,
            self.shared.neutral.bind_group(),
            &[],
        );
    }
}

impl RenderEncoder<WgpuDevice> for WgpuEncoder {
    fn set_label(&mut self, label: &str) {
        self.pass.insert_debug_marker(label);
    }

    fn set_pipeline(&mut self, pipeline: &WgpuPipeline) {
        self.topology = Topology::default();
        self.pass
            .set_pipeline(&pipeline.variants[topology_index(self.topology)]);
        self.pipeline = Some(pipeline.variants.clone());

        for slot in 0..TextureIndex::COUNT {
            self.bind_neutral(slot);
        }
        self.textured = [false; TextureIndex::COUNT as usize];
    }

    fn set_vertex_buffer(&mut self, buffer: &WgpuBuffer, index: BufferIndex) {
        if index != BufferIndex::VertexData {
            log::warn!("vertex buffer bound at non-vertex slot {index:?}; ignored");
            return;
        }

        for slot in 0..TextureIndex::COUNT {
            if self.textured[slot as usize] {
                self.bind_neutral(slot);
                self.textured[slot as usize] = false;
            }
        }

        self.pass.set_vertex_buffer(index.slot(), buffer.buffer.slice(..));
    }

    fn set_uniform_bytes(&mut self, bytes: &[u8], index: BufferIndex) {
        let group = match index {
            BufferIndex::GlobalUniforms => 0,
            BufferIndex::MeshUniforms => 1,
            BufferIndex::VertexData => {
                log::warn!("uniform bytes pushed at the vertex data slot; ignored");
                return;
            }
        };

        let shared = &self.shared;
        let mut arena = shared.arena.borrow_mut();
        match arena.push(&shared.device, &shared.uniform_layout, &shared.queue, bytes) {
            Some(offset) => {
                self.pass.set_bind_group(group, arena.bind_group(), &[offset]);
                self.uniforms[group as usize] = true;
            }
            None => {
                log::warn!("no uniform slot for {index:?}; draws skipped until the next push");
                self.uniforms[group as usize] = false;
            }
        }
    }

    fn set_fragment_texture(&mut self, texture: &WgpuTexture, index: TextureIndex) {
        if !index.is_valid() {
            log::warn!("texture `{}` bound at unknown slot {}; ignored", texture.name(), index.0);
            return;
        }
        self.pass
            .set_bind_group(TEXTURE_GROUP_BASE + index.0, texture.bind_group(), &[]);
        self.textured[index.0 as usize] = true;
    }

    fn draw(&mut self, topology: Topology, vertices: Range<u32>) {
        let Some(variants) = self.pipeline.as_ref() else {
            log::warn!("draw without a pipeline; ignored");
            return;
        };
        if self.uniforms.contains(&false) {
            log::debug!("draw without uniforms bound; ignored");
            return;
        }
        if topology != self.topology {
            self.pass.set_pipeline(&variants[topology_index(topology)]);
            self.topology = topology;
        }
        self.pass.draw(vertices, 0..1);
    }
}

fn expect_stage(function: Option<&WgpuFunction>, stage: ShaderStage) -> BackendResult<&WgpuFunction> {
    let function = function.ok_or_else(|| {
        BackendError::PipelineCompilation(format!("{stage:?} function missing from descriptor"))
    })?;
    if function.stage != stage {
        return Err(BackendError::PipelineCompilation(format!(
            "`{}` is a {:?} entry point, expected {stage:?}",
            function.name, function.stage
        )));
    }
    Ok(function)
}

fn topology_index(topology: Topology) -> usize {
    match topology {
        Topology::Point => 0,
        Topology::Line => 1,
        Topology::LineStrip => 2,
        Topology::Triangle => 3,
        Topology::TriangleStrip => 4,
    }
}

fn primitive_topology(topology: Topology) -> wgpu::PrimitiveTopology {
    match topology {
        Topology::Point => wgpu::PrimitiveTopology::PointList,
        Topology::Line => wgpu::PrimitiveTopology::LineList,
        Topology::LineStrip => wgpu::PrimitiveTopology::LineStrip,
        Topology::Triangle => wgpu::PrimitiveTopology::TriangleList,
        Topology::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
    }
}

/// Entry points declared in WGSL source, in declaration order.
pub(crate) fn scan_entry_points(src: &str) -> Vec<(ShaderStage, String)> {
    let mut out = Vec::new();
    let mut pending = None;
    let mut expect_name = false;

    let code = src.lines().map(|line| line.split("//").next().unwrap_or(""));
    for token in code.flat_map(|line| line.split(|c: char| c.is_whitespace() || c == '(')) {
        if token.is_empty() {
            continue;
        }
        if expect_name {
            if let Some(stage) = pending.take() {
                out.push((stage, token.to_string()));
            }
            expect_name = false;
            continue;
        }
        match token {
            "@vertex" => pending = Some(ShaderStage::Vertex),
            "@fragment" => pending = Some(ShaderStage::Fragment),
            "@compute" => pending = Some(ShaderStage::Compute),
            "fn" => expect_name = pending.is_some(),
            _ => {}
        }
    }
    out
}
