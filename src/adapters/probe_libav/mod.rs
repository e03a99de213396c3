// Probe LibAV adapter - Container probing and stream opening using libav

use std::path::Path;

use ffmpeg_next::codec::context::Context as CodecContext;
use ffmpeg_next::format::stream::Stream;
use ffmpeg_next::media::Type;
use tracing::{debug, trace};

use crate::adapters::reject_empty_file;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::{is_malformed_diagnostic, is_text_demuxer};
use crate::ports::*;

/// LibAV-based media probing adapter
pub struct LibavProbeAdapter;

impl LibavProbeAdapter {
    /// Create new LibAV probing adapter
    pub fn new() -> Result<Self, DomainError> {
        ffmpeg_next::init()
            .map_err(|e| DomainError::Config(format!("FFmpeg initialization failed: {}", e)))?;
        // Diagnostics are reported through tracing, keep libav itself quiet
        ffmpeg_next::util::log::set_level(ffmpeg_next::util::log::Level::Fatal);
        Ok(Self)
    }

    /// Classify an error from opening the container
    fn open_error(path: &Path, error: ffmpeg_next::Error) -> DomainError {
        let diagnostic = error.to_string();
        let malformed = matches!(
            error,
            ffmpeg_next::Error::InvalidData | ffmpeg_next::Error::Eof
        ) || is_malformed_diagnostic(&diagnostic);

        if malformed {
            DomainError::MalformedContainer {
                path: path.to_path_buf(),
                diagnostic,
            }
        } else {
            DomainError::ProbeFailed {
                path: path.to_path_buf(),
                diagnostic,
            }
        }
    }

    fn open(path: &Path) -> Result<ffmpeg_next::format::context::Input, DomainError> {
        reject_empty_file(path)?;
        let input = ffmpeg_next::format::input(&path).map_err(|e| Self::open_error(path, e))?;

        let format = input.format().name().to_string();
        if is_text_demuxer(&format) {
            return Err(DomainError::MalformedContainer {
                path: path.to_path_buf(),
                diagnostic: format!("plain text read by the {} demuxer", format),
            });
        }
        Ok(input)
    }

    fn codec_type(medium: Type) -> CodecType {
        match medium {
            Type::Video => CodecType::Video,
            Type::Audio => CodecType::Audio,
            Type::Subtitle => CodecType::Subtitle,
            Type::Data => CodecType::Data,
            Type::Attachment => CodecType::Attachment,
            Type::Unknown => CodecType::Other("unknown".to_string()),
        }
    }

    /// Frame dimensions of a video stream, read through a decoder context
    fn video_dimensions(stream: &Stream) -> Option<(u32, u32)> {
        let context = CodecContext::from_parameters(stream.parameters()).ok()?;
        let decoder = context.decoder().video().ok()?;
        match (decoder.width(), decoder.height()) {
            (0, _) | (_, 0) => None,
            (width, height) => Some((width, height)),
        }
    }

    fn describe(stream: &Stream) -> StreamDescriptor {
        let parameters = stream.parameters();
        let codec_type = Self::codec_type(parameters.medium());
        let mut descriptor = StreamDescriptor::other(stream.index(), codec_type)
            .with_codec_name(parameters.id().name());

        if descriptor.codec_type.is_video() {
            if let Some((width, height)) = Self::video_dimensions(stream) {
                descriptor.width = Some(width);
                descriptor.height = Some(height);
            }
        }

        descriptor
    }
}

impl ProbePort for LibavProbeAdapter {
    fn name(&self) -> &'static str {
        "libav"
    }

    fn probe(&self, path: &Path) -> Result<MediaProbe, DomainError> {
        let input = Self::open(path)?;
        let streams: Vec<StreamDescriptor> = input.streams().map(|s| Self::describe(&s)).collect();
        trace!(path = %path.display(), streams = streams.len(), "Probed container");
        Ok(MediaProbe::new(streams))
    }
}

impl DecoderPort for LibavProbeAdapter {
    fn open_input(&self, path: &Path) -> Result<MediaStream, DomainError> {
        let input = Self::open(path).map_err(|e| match e {
            DomainError::MalformedContainer { path, diagnostic } => DomainError::DecodeFailed {
                path,
                reason: diagnostic,
            },
            other => other,
        })?;

        let stream = input
            .streams()
            .best(Type::Video)
            .ok_or_else(|| DomainError::NoVideoStream {
                path: path.to_path_buf(),
                reason: "container has no video stream".to_string(),
            })?;

        let (width, height) =
            Self::video_dimensions(&stream).ok_or_else(|| DomainError::NoVideoStream {
                path: path.to_path_buf(),
                reason: format!("video stream {} has no decodable dimensions", stream.index()),
            })?;

        debug!(
            path = %path.display(),
            stream = stream.index(),
            width,
            height,
            "Opened video stream"
        );
        Ok(MediaStream::new(path, stream.index(), width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_text_payload_is_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("invalid.mp4");
        fs::write(&path, b"this is not a media file").unwrap();

        let adapter = LibavProbeAdapter::new().unwrap();
        let error = adapter.probe(&path).unwrap_err();
        assert!(error.is_malformed_container(), "unexpected error: {}", error);
    }

    #[test]
    fn test_text_file_is_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("c.txt");
        fs::write(&path, b"plain notes, not a video\n").unwrap();

        let adapter = LibavProbeAdapter::new().unwrap();
        let error = adapter.probe(&path).unwrap_err();
        assert!(error.is_malformed_container(), "unexpected error: {}", error);
    }

    #[test]
    fn test_empty_file_is_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.mkv");
        fs::write(&path, b"").unwrap();

        let adapter = LibavProbeAdapter::new().unwrap();
        assert!(adapter.probe(&path).unwrap_err().is_malformed_container());
    }

    #[test]
    fn test_missing_file_is_probe_failure() {
        let temp_dir = TempDir::new().unwrap();
        let adapter = LibavProbeAdapter::new().unwrap();

        let error = adapter
            .probe(&temp_dir.path().join("does_not_exist.mp4"))
            .unwrap_err();
        assert!(matches!(error, DomainError::ProbeFailed { .. }), "{}", error);
    }

    #[test]
    fn test_open_input_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let adapter = LibavProbeAdapter::new().unwrap();
        assert!(adapter
            .open_input(&temp_dir.path().join("does_not_exist.mp4"))
            .is_err());
    }

    #[test]
    fn test_codec_type_mapping() {
        assert_eq!(LibavProbeAdapter::codec_type(Type::Video), CodecType::Video);
        assert_eq!(LibavProbeAdapter::codec_type(Type::Attachment), CodecType::Attachment);
        assert_eq!(
            LibavProbeAdapter::codec_type(Type::Unknown),
            CodecType::Other("unknown".to_string())
        );
    }
}
