// Ports - Interface definitions (contracts)

use std::path::Path;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for container probing
pub trait ProbePort: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Probe a file's container metadata
    ///
    /// Input that is not a media container must be reported as
    /// [`DomainError::MalformedContainer`]; every other failure as
    /// [`DomainError::ProbeFailed`].
    fn probe(&self, path: &Path) -> Result<MediaProbe, DomainError>;
}

/// Port for opening decodable streams
pub trait DecoderPort: Send + Sync {
    /// Open the best video stream of `path`
    fn open_input(&self, path: &Path) -> Result<MediaStream, DomainError>;
}

/// Strategy supplying the two frame extraction capabilities
///
/// No default behavior exists: a caller processing videos must pass a
/// concrete strategy, or get [`UnsupportedFrameExtractor`] which fails with
/// [`DomainError::NotImplemented`].
pub trait FrameExtractor: Send + Sync {
    /// Strategy name for logs
    fn name(&self) -> &'static str;

    /// Resize or crop the stream according to the strategy's policy
    fn adjust_stream_dimensions(
        &self,
        stream: MediaStream,
        config: &FilterConfig,
    ) -> Result<MediaStream, DomainError>;

    /// Decode the stream and write its frames into `output_dir`
    fn convert_stream_to_frames(
        &self,
        stream: &MediaStream,
        output_dir: &Path,
    ) -> Result<FrameReport, DomainError>;
}

/// Frame extractor used when no strategy was supplied
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedFrameExtractor;

impl FrameExtractor for UnsupportedFrameExtractor {
    fn name(&self) -> &'static str {
        "unsupported"
    }

    fn adjust_stream_dimensions(
        &self,
        _stream: MediaStream,
        _config: &FilterConfig,
    ) -> Result<MediaStream, DomainError> {
        Err(DomainError::NotImplemented {
            operation: "adjust_stream_dimensions",
        })
    }

    fn convert_stream_to_frames(
        &self,
        _stream: &MediaStream,
        _output_dir: &Path,
    ) -> Result<FrameReport, DomainError> {
        Err(DomainError::NotImplemented {
            operation: "convert_stream_to_frames",
        })
    }
}
