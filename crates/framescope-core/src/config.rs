use std::time::Duration;

/// Default read timeout for live capture, so the stop signal is observed on a
/// quiet interface.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(250);
pub const DEFAULT_READ_BUFFER_SIZE: usize = 65536;
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Capture settings shared by the sources and the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureConfig {
    /// Read timeout of the live channel; `None` blocks until a frame arrives.
    pub read_timeout: Option<Duration>,
    pub read_buffer_size: usize,
    /// Decoded frames buffered between the capture and renderer threads.
    pub channel_capacity: usize,
    pub promiscuous: bool,
    /// Stop after this many frames were handed to the renderer.
    pub max_frames: Option<u64>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            read_timeout: Some(DEFAULT_READ_TIMEOUT),
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            promiscuous: true,
            max_frames: None,
        }
    }
}
