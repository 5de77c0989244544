use thiserror::Error;

/// Why a frame was skipped. The camera stays usable; the next frame retries.
#[derive(Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameError {
    #[error("Failed to create command buffer")]
    CommandBuffer,
    #[error("Render pass descriptor was null")]
    RenderTarget,
    #[error("Failed to create render command encoder")]
    Encoder,
}

/// Result of one `render` call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    Presented,
    Dropped(FrameError),
}

impl FrameOutcome {
    #[inline]
    pub fn is_presented(self) -> bool {
        self == FrameOutcome::Presented
    }
}
