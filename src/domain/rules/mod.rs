// Domain rules - Classification and output layout policies

use std::collections::HashSet;
use std::path::Path;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Diagnostic libav emits when the input is not a container it can parse
pub const MALFORMED_INPUT_DIAGNOSTIC: &str = "Invalid data found when processing input";

/// Check whether a prober diagnostic means "not a media file"
pub fn is_malformed_diagnostic(diagnostic: &str) -> bool {
    diagnostic.contains(MALFORMED_INPUT_DIAGNOSTIC)
}

/// Demuxers that render plain text as a synthetic video stream
pub const TEXT_DEMUXERS: [&str; 1] = ["tty"];

/// Check a demuxer name (or ffprobe's comma separated list) against [`TEXT_DEMUXERS`]
pub fn is_text_demuxer(format_name: &str) -> bool {
    format_name
        .split(',')
        .any(|name| TEXT_DEMUXERS.contains(&name.trim()))
}

/// Rules deciding whether a probed file belongs in the filtered set
pub struct VideoClassifier;

impl VideoClassifier {
    /// A file is a video if any of its streams carries video
    pub fn is_video(probe: &MediaProbe) -> bool {
        probe.has_video_stream()
    }

    /// Orientation of the first video stream
    ///
    /// Fails with [`DomainError::NoVideoStream`] when the probe has no video
    /// stream or the stream reports no dimensions.
    pub fn orientation(path: &Path, probe: &MediaProbe) -> Result<Orientation, DomainError> {
        let stream = probe
            .primary_video_stream()
            .ok_or_else(|| DomainError::NoVideoStream {
                path: path.to_path_buf(),
                reason: "container has no video stream".to_string(),
            })?;

        let (width, height) = stream.dimensions().ok_or_else(|| DomainError::NoVideoStream {
            path: path.to_path_buf(),
            reason: format!("video stream {} reports no dimensions", stream.index),
        })?;

        Ok(Orientation::from_dimensions(width, height))
    }

    /// Horizontal means strictly wider than tall
    pub fn is_horizontal(path: &Path, probe: &MediaProbe) -> Result<bool, DomainError> {
        Ok(Self::orientation(path, probe)?.is_horizontal())
    }
}

/// Naming policy for per-file output directories
///
/// The directory name is the file stem with leading and trailing dots
/// trimmed. A stem that trims to nothing falls back to the whole file name
/// with dots replaced by underscores. Names already taken by an earlier file
/// get a `-2`, `-3`, ... suffix.
pub struct OutputDirNamer;

impl OutputDirNamer {
    /// Base directory name for a single input path
    pub fn base_name(path: &Path) -> String {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let trimmed = stem.trim_matches('.');
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }

        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().replace('.', "_"))
            .unwrap_or_default();
        if file_name.trim_matches('_').is_empty() {
            "unnamed".to_string()
        } else {
            file_name
        }
    }

    /// Assign an output directory under `output_root` to every input, in order
    pub fn assign<'a, I>(inputs: I, output_root: &Path) -> OutputMapping
    where
        I: IntoIterator<Item = &'a std::path::PathBuf>,
    {
        let mut mapping = OutputMapping::new();
        let mut taken: HashSet<String> = HashSet::new();

        for input in inputs {
            if mapping.get(input).is_some() {
                continue;
            }
            let base = Self::base_name(input);
            let mut name = base.clone();
            let mut suffix = 2;
            while taken.contains(&name) {
                name = format!("{}-{}", base, suffix);
                suffix += 1;
            }
            taken.insert(name.clone());
            mapping.insert(input.clone(), output_root.join(name));
        }

        mapping
    }
}

/// Largest crop centered in a `width` x `height` frame with the aspect ratio of `target`
pub fn center_crop(width: u32, height: u32, target: FrameSize) -> CropRect {
    let (w, h) = (width as u64, height as u64);
    let (tw, th) = (target.width as u64, target.height as u64);

    if w * th > h * tw {
        // Source is wider than the target: keep full height
        let crop_width = ((h * tw) / th).clamp(1, w);
        CropRect {
            x: ((w - crop_width) / 2) as u32,
            y: 0,
            width: crop_width as u32,
            height,
        }
    } else {
        let crop_height = ((w * th) / tw).clamp(1, h.max(1));
        CropRect {
            x: 0,
            y: (h.saturating_sub(crop_height) / 2) as u32,
            width,
            height: crop_height as u32,
        }
    }
}

#[cfg(test)]
mod tests;
