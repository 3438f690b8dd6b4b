use bytes::Bytes;

/// A rendered image produced by the preview host.
///
/// The byte encoding is owned by the rendering collaborator; this layer
/// only carries it. Width and height are pixels and must be positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFrame {
    pub bytes: Bytes,
    pub width: u32,
    pub height: u32,
}

impl RenderedFrame {
    pub fn new(bytes: impl Into<Bytes>, width: u32, height: u32) -> Self {
        Self {
            bytes: bytes.into(),
            width,
            height,
        }
    }
}

/// What the build tool needs to launch the preview host process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewHostConfig {
    /// Path of the executable used to run the host (may contain spaces
    /// and other characters unsafe for a command argument).
    pub java_executable: String,
    /// Classpath for the host process itself.
    pub host_classpath: String,
}

/// Requested render dimensions plus an optional scale factor.
///
/// `scale == None` means the host's default scale.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameConfig {
    pub width: u32,
    pub height: u32,
    pub scale: Option<f64>,
}

/// An instruction to render one preview.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRequest {
    /// Fully-qualified name of the preview function.
    pub fq_name: String,
    pub config: FrameConfig,
}
