use std::borrow::Cow;

/// Buffer binding slots shared with the shader.
#[repr(u32)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferIndex {
    /// Per-vertex data (vertex buffer slot 0).
    VertexData = 0,
    /// Camera-wide uniform block (bind group 0).
    GlobalUniforms = 1,
    /// Per-mesh uniform block (bind group 1).
    MeshUniforms = 2,
}

impl BufferIndex {
    #[inline]
    pub const fn slot(self) -> u32 {
        self as u32
    }
}

/// Fragment texture slot.
///
/// Slot `n` maps to bind group `2 + n` in the wgpu backend.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TextureIndex(pub u32);

impl TextureIndex {
    pub const COLOR: TextureIndex = TextureIndex(0);
    pub const DETAIL: TextureIndex = TextureIndex(1);

    /// Number of texture slots the shader declares.
    pub const COUNT: u32 = 2;

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 < Self::COUNT
    }
}

/// Primitive assembly for a draw call.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum Topology {
    Point,
    Line,
    LineStrip,
    #[default]
    Triangle,
    TriangleStrip,
}

impl Topology {
    pub const ALL: [Topology; 5] = [
        Topology::Point,
        Topology::Line,
        Topology::LineStrip,
        Topology::Triangle,
        Topology::TriangleStrip,
    ];
}

/// Source the shader library is built from.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderSource {
    Wgsl(Cow<'static, str>),
}

impl ShaderSource {
    /// The mesh shader shipped with the engine.
    pub fn builtin() -> Self {
        ShaderSource::Wgsl(Cow::Borrowed(include_str!("../device/shaders/mesh2d.wgsl")))
    }

    pub fn as_str(&self) -> &str {
        match self {
            ShaderSource::Wgsl(src) => src,
        }
    }
}

impl Default for ShaderSource {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Everything needed to compile a pipeline state, generic over the backend's shader
/// function handle.
#[derive(Debug, Clone)]
pub struct PipelineDescriptor<F> {
    pub label: String,
    pub color_format: wgpu::TextureFormat,
    pub vertex_function: Option<F>,
    pub fragment_function: Option<F>,
}

impl<F> PipelineDescriptor<F> {
    pub fn new(label: impl Into<String>, color_format: wgpu::TextureFormat) -> Self {
        Self {
            label: label.into(),
            color_format,
            vertex_function: None,
            fragment_function: None,
        }
    }
}
