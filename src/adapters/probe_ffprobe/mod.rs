//! FFprobe adapter for media file probing
//!
//! Runs the `ffprobe` executable with JSON output and maps its streams onto
//! [`MediaProbe`]. Useful where libav is linked without the demuxers a file
//! needs but a full ffmpeg install is on the `PATH`.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;
use tracing::trace;

use crate::adapters::reject_empty_file;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::{is_malformed_diagnostic, is_text_demuxer};
use crate::ports::*;

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    format_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    index: usize,
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

/// FFprobe-based probe adapter
pub struct FfprobeAdapter {
    binary: PathBuf,
}

impl FfprobeAdapter {
    /// Use `ffprobe` from the `PATH`
    pub fn new() -> Self {
        Self::with_binary("ffprobe")
    }

    /// Use a specific ffprobe executable
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Parse `ffprobe -print_format json -show_format -show_streams` output
    pub fn parse_output(path: &Path, stdout: &[u8]) -> Result<MediaProbe, DomainError> {
        let output: FfprobeOutput =
            serde_json::from_slice(stdout).map_err(|e| DomainError::ProbeFailed {
                path: path.to_path_buf(),
                diagnostic: format!("Unreadable ffprobe output: {}", e),
            })?;

        if let Some(format_name) = output.format.as_ref().and_then(|f| f.format_name.as_deref()) {
            if is_text_demuxer(format_name) {
                return Err(DomainError::MalformedContainer {
                    path: path.to_path_buf(),
                    diagnostic: format!("plain text read by the {} demuxer", format_name),
                });
            }
        }

        let streams = output
            .streams
            .into_iter()
            .map(|s| StreamDescriptor {
                index: s.index,
                codec_type: s
                    .codec_type
                    .as_deref()
                    .map(CodecType::parse)
                    .unwrap_or_else(|| CodecType::Other("unknown".to_string())),
                codec_name: s.codec_name,
                width: s.width.filter(|w| *w > 0),
                height: s.height.filter(|h| *h > 0),
            })
            .collect();

        Ok(MediaProbe::new(streams))
    }
}

impl Default for FfprobeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProbePort for FfprobeAdapter {
    fn name(&self) -> &'static str {
        "ffprobe"
    }

    fn probe(&self, path: &Path) -> Result<MediaProbe, DomainError> {
        reject_empty_file(path)?;

        let output = Command::new(&self.binary)
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .output()
            .map_err(|e| DomainError::ProbeFailed {
                path: path.to_path_buf(),
                diagnostic: format!("Failed to run {}: {}", self.binary.display(), e),
            })?;

        if !output.status.success() {
            let diagnostic = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(if is_malformed_diagnostic(&diagnostic) {
                DomainError::MalformedContainer {
                    path: path.to_path_buf(),
                    diagnostic,
                }
            } else {
                DomainError::ProbeFailed {
                    path: path.to_path_buf(),
                    diagnostic,
                }
            });
        }

        trace!(path = %path.display(), "ffprobe succeeded");
        Self::parse_output(path, &output.stdout)
    }
}
