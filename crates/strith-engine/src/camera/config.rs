use crate::gpu::ShaderSource;

/// Camera construction parameters.
#[derive(Debug, Clone)]
pub struct CameraConfig {
    /// Shader library source.
    pub shader: ShaderSource,

    /// Vertex entry point looked up in the library.
    pub vertex_function: String,

    /// Fragment entry point looked up in the library.
    pub fragment_function: String,

    /// Debug label applied to each frame's render encoder.
    pub encoder_label: String,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            shader: ShaderSource::builtin(),
            vertex_function: "vs_main".to_string(),
            fragment_function: "fs_main".to_string(),
            encoder_label: "Primary render encoder".to_string(),
        }
    }
}
