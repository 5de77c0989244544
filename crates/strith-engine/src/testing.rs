//! Recording backend used by unit tests.
//!
//! Implements the `gpu` traits without touching a GPU. Every device step and every
//! encoder call is appended to a shared log, and any step can be made to fail.

use std::cell::RefCell;
use std::collections::HashSet;
use std::ops::Range;
use std::rc::Rc;

use crate::gpu::{
    BackendError, BackendResult, BufferIndex, CommandBuffer, CommandQueue, GpuDevice,
    PipelineDescriptor, RenderEncoder, RenderView, ShaderSource, TextureIndex, Topology,
};

/// Device-level operations, in the order they were requested.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    MakeQueue,
    MakeLibrary,
    MakeFunction(String),
    MakePipeline(String),
    MakeVertexBuffer(String),
    LoadTexture(String),
}

/// Frame-level operations, in the order they were recorded.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    MakeCommandBuffer,
    MakeEncoder,
    SetLabel(String),
    SetPipeline(String),
    SetVertexBuffer { buffer: usize, index: BufferIndex },
    SetUniformBytes { index: BufferIndex, bytes: Vec<u8> },
    SetFragmentTexture { texture: String, index: TextureIndex },
    Draw { topology: Topology, vertices: Range<u32> },
    EndEncoding,
    Present,
    Commit,
}

/// Operations that can be forced to fail.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Fail {
    Queue,
    Library,
    Function(String),
    Pipeline,
    VertexBuffer,
    CommandBuffer,
    Encoder,
}

#[derive(Debug, Default)]
struct Recorder {
    steps: Vec<Step>,
    calls: Vec<Call>,
    failures: HashSet<Fail>,
    textures: HashSet<String>,
    buffers: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingDevice {
    state: Rc<RefCell<Recorder>>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `name` loadable through `load_texture`.
    pub fn with_texture(self, name: &str) -> Self {
        self.state.borrow_mut().textures.insert(name.to_string());
        self
    }

    pub fn fail(&self, what: Fail) {
        self.state.borrow_mut().failures.insert(what);
    }

    pub fn heal(&self, what: &Fail) {
        self.state.borrow_mut().failures.remove(what);
    }

    pub fn steps(&self) -> Vec<Step> {
        self.state.borrow().steps.clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Contents of the buffer with the given id, as uploaded.
    pub fn buffer_contents(&self, id: usize) -> Vec<u8> {
        self.state.borrow().buffers[id].clone()
    }

    pub fn buffer_count(&self) -> usize {
        self.state.borrow().buffers.len()
    }

    fn fails(&self, what: &Fail) -> bool {
        self.state.borrow().failures.contains(what)
    }

    fn step(&self, step: Step) {
        self.state.borrow_mut().steps.push(step);
    }

    fn call(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedBuffer {
    pub id: usize,
    pub len: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedTexture {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPipeline {
    pub label: String,
    pub vertex: String,
    pub fragment: String,
}

#[derive(Debug)]
pub struct RecordedDrawable;

pub struct RecordingQueue {
    device: RecordingDevice,
}

pub struct RecordingCommandBuffer {
    device: RecordingDevice,
}

pub struct RecordingEncoder {
    device: RecordingDevice,
}

impl GpuDevice for RecordingDevice {
    type Queue = RecordingQueue;
    type Library = String;
    type Function = String;
    type Pipeline = RecordedPipeline;
    type Buffer = RecordedBuffer;
    type Texture = RecordedTexture;
    type Encoder = RecordingEncoder;
    type Drawable = RecordedDrawable;

    fn make_command_queue(&self) -> BackendResult<Self::Queue> {
        self.step(Step::MakeQueue);
        if self.fails(&Fail::Queue) {
            return Err(BackendError::QueueCreation("forced".into()));
        }
        Ok(RecordingQueue { device: self.clone() })
    }

    fn make_library(&self, source: &ShaderSource) -> BackendResult<Self::Library> {
        self.step(Step::MakeLibrary);
        if self.fails(&Fail::Library) {
            return Err(BackendError::Library("forced".into()));
        }
        Ok(source.as_str().to_string())
    }

    fn make_function(&self, _library: &Self::Library, name: &str) -> BackendResult<Self::Function> {
        self.step(Step::MakeFunction(name.to_string()));
        if self.fails(&Fail::Function(name.to_string())) {
            return Err(BackendError::FunctionNotFound(name.to_string()));
        }
        Ok(name.to_string())
    }

    fn make_pipeline_state(
        &self,
        descriptor: &PipelineDescriptor<Self::Function>,
    ) -> BackendResult<Self::Pipeline> {
        self.step(Step::MakePipeline(descriptor.label.clone()));
        if self.fails(&Fail::Pipeline) {
            return Err(BackendError::PipelineCompilation("forced".into()));
        }
        let (Some(vertex), Some(fragment)) =
            (descriptor.vertex_function.clone(), descriptor.fragment_function.clone())
        else {
            return Err(BackendError::PipelineCompilation("missing shader function".into()));
        };
        Ok(RecordedPipeline {
            label: descriptor.label.clone(),
            vertex,
            fragment,
        })
    }

    fn make_vertex_buffer(&self, label: &str, contents: &[u8]) -> BackendResult<Self::Buffer> {
        self.step(Step::MakeVertexBuffer(label.to_string()));
        if self.fails(&Fail::VertexBuffer) {
            return Err(BackendError::BufferAllocation("forced".into()));
        }
        let mut state = self.state.borrow_mut();
        state.buffers.push(contents.to_vec());
        Ok(RecordedBuffer {
            id: state.buffers.len() - 1,
            len: contents.len(),
        })
    }

    fn load_texture(&self, name: &str) -> BackendResult<Self::Texture> {
        self.step(Step::LoadTexture(name.to_string()));
        if !self.state.borrow().textures.contains(name) {
            return Err(BackendError::Texture {
                name: name.to_string(),
                reason: "no such asset".into(),
            });
        }
        Ok(RecordedTexture { name: name.to_string() })
    }
}

impl CommandQueue<RecordingDevice> for RecordingQueue {
    type CommandBuffer = RecordingCommandBuffer;

    fn make_command_buffer(&self) -> Option<Self::CommandBuffer> {
        if self.device.fails(&Fail::CommandBuffer) {
            return None;
        }
        self.device.call(Call::MakeCommandBuffer);
        Some(RecordingCommandBuffer { device: self.device.clone() })
    }
}

impl CommandBuffer<RecordingDevice> for RecordingCommandBuffer {
    fn make_render_encoder(&mut self, _drawable: &RecordedDrawable) -> Option<RecordingEncoder> {
        if self.device.fails(&Fail::Encoder) {
            return None;
        }
        self.device.call(Call::MakeEncoder);
        Some(RecordingEncoder { device: self.device.clone() })
    }

    fn end_encoding(&mut self, _encoder: RecordingEncoder) {
        self.device.call(Call::EndEncoding);
    }

    fn present(&mut self, _drawable: RecordedDrawable) {
        self.device.call(Call::Present);
    }

    fn commit(self) {
        self.device.call(Call::Commit);
    }
}

impl RenderEncoder<RecordingDevice> for RecordingEncoder {
    fn set_label(&mut self, label: &str) {
        self.device.call(Call::SetLabel(label.to_string()));
    }

    fn set_pipeline(&mut self, pipeline: &RecordedPipeline) {
        self.device.call(Call::SetPipeline(pipeline.label.clone()));
    }

    fn set_vertex_buffer(&mut self, buffer: &RecordedBuffer, index: BufferIndex) {
        self.device.call(Call::SetVertexBuffer { buffer: buffer.id, index });
    }

    fn set_uniform_bytes(&mut self, bytes: &[u8], index: BufferIndex) {
        self.device.call(Call::SetUniformBytes { index, bytes: bytes.to_vec() });
    }

    fn set_fragment_texture(&mut self, texture: &RecordedTexture, index: TextureIndex) {
        self.device.call(Call::SetFragmentTexture {
            texture: texture.name.clone(),
            index,
        });
    }

    fn draw(&mut self, topology: Topology, vertices: Range<u32>) {
        self.device.call(Call::Draw { topology, vertices });
    }
}

/// Host view over a [`RecordingDevice`].
pub struct RecordingView {
    pub device: Option<RecordingDevice>,
    pub format: wgpu::TextureFormat,
    pub size: (u32, u32),
    pub drawable_available: bool,
}

impl RecordingView {
    pub fn new(device: RecordingDevice) -> Self {
        Self {
            device: Some(device),
            format: wgpu::TextureFormat::Bgra8UnormSrgb,
            size: (800, 600),
            drawable_available: true,
        }
    }

    pub fn headless() -> Self {
        Self {
            device: None,
            ..Self::new(RecordingDevice::new())
        }
    }
}

impl RenderView for RecordingView {
    type Device = RecordingDevice;

    fn device(&self) -> Option<&RecordingDevice> {
        self.device.as_ref()
    }

    fn color_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    fn drawable_size(&self) -> (u32, u32) {
        self.size
    }

    fn current_drawable(&mut self) -> Option<RecordedDrawable> {
        self.drawable_available.then_some(RecordedDrawable)
    }
}
