// Domain models - Core types and data structures

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Media type of a single stream inside a container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecType {
    Video,
    Audio,
    Subtitle,
    Data,
    Attachment,
    Other(String),
}

impl CodecType {
    /// Parse a codec type tag as reported by probers ("video", "audio", ...)
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "video" => CodecType::Video,
            "audio" => CodecType::Audio,
            "subtitle" => CodecType::Subtitle,
            "data" => CodecType::Data,
            "attachment" => CodecType::Attachment,
            other => CodecType::Other(other.to_string()),
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, CodecType::Video)
    }
}

impl fmt::Display for CodecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecType::Video => write!(f, "video"),
            CodecType::Audio => write!(f, "audio"),
            CodecType::Subtitle => write!(f, "subtitle"),
            CodecType::Data => write!(f, "data"),
            CodecType::Attachment => write!(f, "attachment"),
            CodecType::Other(tag) => write!(f, "{}", tag),
        }
    }
}

/// One stream as seen by a probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    pub index: usize,
    pub codec_type: CodecType,
    pub codec_name: Option<String>,
    /// Only meaningful for video streams
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl StreamDescriptor {
    /// Create a video stream descriptor
    pub fn video(index: usize, width: u32, height: u32) -> Self {
        Self {
            index,
            codec_type: CodecType::Video,
            codec_name: None,
            width: Some(width),
            height: Some(height),
        }
    }

    /// Create a stream descriptor without dimensions
    pub fn other(index: usize, codec_type: CodecType) -> Self {
        Self {
            index,
            codec_type,
            codec_name: None,
            width: None,
            height: None,
        }
    }

    pub fn with_codec_name(mut self, codec_name: impl Into<String>) -> Self {
        self.codec_name = Some(codec_name.into());
        self
    }

    /// Width and height, when both are known
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match (self.width, self.height) {
            (Some(width), Some(height)) => Some((width, height)),
            _ => None,
        }
    }
}

/// Result of probing one file's container metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaProbe {
    pub streams: Vec<StreamDescriptor>,
}

impl MediaProbe {
    pub fn new(streams: Vec<StreamDescriptor>) -> Self {
        Self { streams }
    }

    /// True if any stream carries video
    pub fn has_video_stream(&self) -> bool {
        self.streams.iter().any(|s| s.codec_type.is_video())
    }

    /// First video stream in container order
    pub fn primary_video_stream(&self) -> Option<&StreamDescriptor> {
        self.streams.iter().find(|s| s.codec_type.is_video())
    }

    /// Number of streams of each kind: (video, audio, other)
    pub fn stream_counts(&self) -> (usize, usize, usize) {
        self.streams.iter().fold((0, 0, 0), |(v, a, o), s| match s.codec_type {
            CodecType::Video => (v + 1, a, o),
            CodecType::Audio => (v, a + 1, o),
            _ => (v, a, o + 1),
        })
    }
}

/// Frame orientation of a video stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
    Square,
}

impl Orientation {
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        if width > height {
            Orientation::Horizontal
        } else if width < height {
            Orientation::Vertical
        } else {
            Orientation::Square
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Orientation::Horizontal)
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Horizontal => write!(f, "horizontal"),
            Orientation::Vertical => write!(f, "vertical"),
            Orientation::Square => write!(f, "square"),
        }
    }
}

/// Options recognized by the video set filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Directory scanned for candidate files
    pub input_path: PathBuf,
    /// Root directory for per-file outputs
    pub output_path: PathBuf,
    /// Drop videos that are not horizontal
    pub ignore_vertical: bool,
}

/// Directory scanned when no input path is configured
pub const DEFAULT_INPUT_DIR: &str = "raw-videos";

/// Directory written to when no output path is configured
pub const DEFAULT_OUTPUT_DIR: &str = "output";

impl FilterConfig {
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            ignore_vertical: true,
        }
    }

    /// Defaults rooted at `base`: `base/raw-videos` and `base/output`
    pub fn rooted_at(base: &Path) -> Self {
        Self::new(base.join(DEFAULT_INPUT_DIR), base.join(DEFAULT_OUTPUT_DIR))
    }

    /// Defaults rooted next to the running executable
    pub fn program_defaults() -> Result<Self, DomainError> {
        let exe = std::env::current_exe()?;
        let base = exe.parent().ok_or_else(|| {
            DomainError::Config(format!(
                "Executable path has no parent directory: {}",
                exe.display()
            ))
        })?;
        Ok(Self::rooted_at(base))
    }

    pub fn with_ignore_vertical(mut self, ignore_vertical: bool) -> Self {
        self.ignore_vertical = ignore_vertical;
        self
    }
}

/// Candidate files that passed classification, in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilteredSet {
    files: Vec<PathBuf>,
}

impl FilteredSet {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.iter().any(|f| f == path)
    }
}

impl<'a> IntoIterator for &'a FilteredSet {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

/// Input file to output directory mapping, one entry per filtered file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputMapping {
    entries: BTreeMap<PathBuf, PathBuf>,
}

impl OutputMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry; returns false if the input was already mapped
    pub fn insert(&mut self, input: PathBuf, output_dir: PathBuf) -> bool {
        if self.entries.contains_key(&input) {
            return false;
        }
        self.entries.insert(input, output_dir);
        true
    }

    pub fn get(&self, input: &Path) -> Option<&Path> {
        self.entries.get(input).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.entries
            .iter()
            .map(|(input, output)| (input.as_path(), output.as_path()))
    }

    pub fn output_dirs(&self) -> impl Iterator<Item = &Path> {
        self.entries.values().map(PathBuf::as_path)
    }
}

/// Rectangle in source pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Target frame size for extracted frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Result<Self, DomainError> {
        if width == 0 || height == 0 {
            return Err(DomainError::Config(format!(
                "Frame size must be non-zero, got {}x{}",
                width, height
            )));
        }
        Ok(Self { width, height })
    }
}

impl fmt::Display for FrameSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A decodable video stream: the source plus the geometry to apply when decoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaStream {
    pub source: PathBuf,
    pub stream_index: usize,
    pub width: u32,
    pub height: u32,
    pub crop: Option<CropRect>,
    pub target: Option<FrameSize>,
}

impl MediaStream {
    pub fn new(source: impl Into<PathBuf>, stream_index: usize, width: u32, height: u32) -> Self {
        Self {
            source: source.into(),
            stream_index,
            width,
            height,
            crop: None,
            target: None,
        }
    }

    /// Size of the frames this stream yields after crop and resize
    pub fn output_size(&self) -> (u32, u32) {
        match (self.target, self.crop) {
            (Some(target), _) => (target.width, target.height),
            (None, Some(crop)) => (crop.width, crop.height),
            (None, None) => (self.width, self.height),
        }
    }
}

/// Outcome of converting one stream to frames
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    pub source: PathBuf,
    pub output_dir: PathBuf,
    pub frames_written: u64,
}

/// Outcome of a processing run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingReport {
    pub reports: Vec<FrameReport>,
}

impl ProcessingReport {
    pub fn total_frames(&self) -> u64 {
        self.reports.iter().map(|r| r.frames_written).sum()
    }
}
