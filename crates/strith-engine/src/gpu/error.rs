use thiserror::Error;

/// Failure creating a GPU object.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    #[error("device was undefined")]
    DeviceUnavailable,
    #[error("command queue could not be created: {0}")]
    QueueCreation(String),
    #[error("shader library could not be loaded: {0}")]
    Library(String),
    #[error("shader function `{0}` not found in library")]
    FunctionNotFound(String),
    #[error("render pipeline state could not be compiled: {0}")]
    PipelineCompilation(String),
    #[error("buffer allocation failed: {0}")]
    BufferAllocation(String),
    #[error("texture `{name}` could not be loaded: {reason}")]
    Texture { name: String, reason: String },
}

pub type BackendResult<T> = Result<T, BackendError>;
