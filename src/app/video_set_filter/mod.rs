// Video set filter - Discovers horizontal videos and drives frame extraction

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::{OutputDirNamer, VideoClassifier};
use crate::ports::*;

/// Filters an input directory to its video files and maps each to an output directory
///
/// Call [`setup`](Self::setup) (or [`start`](Self::start)) before
/// [`process_videos`](Self::process_videos).
pub struct VideoSetFilter {
    config: FilterConfig,
    probe_port: Arc<dyn ProbePort>,
    decoder_port: Arc<dyn DecoderPort>,
    extractor: Arc<dyn FrameExtractor>,
    input_paths: Option<FilteredSet>,
    output_paths: Option<OutputMapping>,
}

impl VideoSetFilter {
    /// Create a filter with injected ports and no frame extraction strategy
    pub fn new(
        config: FilterConfig,
        probe_port: Arc<dyn ProbePort>,
        decoder_port: Arc<dyn DecoderPort>,
    ) -> Self {
        Self {
            config,
            probe_port,
            decoder_port,
            extractor: Arc::new(UnsupportedFrameExtractor),
            input_paths: None,
            output_paths: None,
        }
    }

    /// Supply the frame extraction strategy used by [`process_videos`](Self::process_videos)
    pub fn with_extractor(mut self, extractor: Arc<dyn FrameExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Files kept by the last [`setup`](Self::setup)
    pub fn filtered_set(&self) -> Option<&FilteredSet> {
        self.input_paths.as_ref()
    }

    /// Output directories computed by the last [`setup`](Self::setup)
    pub fn output_mapping(&self) -> Option<&OutputMapping> {
        self.output_paths.as_ref()
    }

    /// True if the file contains at least one video stream
    ///
    /// Files the prober cannot parse as a container classify as `false`.
    /// Any other probe failure is logged and returned.
    pub fn classify_as_video(&self, path: &Path) -> Result<bool, DomainError> {
        let probe = self.probe_port.probe(path);
        Self::video_from_probe(path, probe.as_ref())
    }

    /// True if the first video stream is strictly wider than tall
    ///
    /// Probes the file again; fails with [`DomainError::NoVideoStream`] when
    /// there is no video stream to measure.
    pub fn classify_as_horizontal(&self, path: &Path) -> Result<bool, DomainError> {
        let probe = self.probe_port.probe(path)?;
        VideoClassifier::is_horizontal(path, &probe)
    }

    fn video_from_probe(
        path: &Path,
        probe: Result<&MediaProbe, &DomainError>,
    ) -> Result<bool, DomainError> {
        match probe {
            Ok(probe) => Ok(VideoClassifier::is_video(probe)),
            Err(DomainError::MalformedContainer { diagnostic, .. }) => {
                debug!(path = %path.display(), %diagnostic, "Not a media container");
                Ok(false)
            }
            Err(DomainError::ProbeFailed { diagnostic, .. }) => {
                error!(path = %path.display(), %diagnostic, "Probe failed");
                Err(DomainError::ProbeFailed {
                    path: path.to_path_buf(),
                    diagnostic: diagnostic.clone(),
                })
            }
            Err(other) => {
                error!(path = %path.display(), error = %other, "Probe failed");
                Err(DomainError::ProbeFailed {
                    path: path.to_path_buf(),
                    diagnostic: other.to_string(),
                })
            }
        }
    }

    /// List the direct entries of the input directory, sorted by file name
    fn list_candidates(&self) -> Result<Vec<PathBuf>, DomainError> {
        let input = &self.config.input_path;
        if !input.is_dir() {
            return Err(DomainError::InputDirectory {
                path: input.clone(),
                reason: "not a directory or does not exist".to_string(),
            });
        }

        let mut candidates = Vec::new();
        for entry in WalkDir::new(input)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| DomainError::InputDirectory {
                path: input.clone(),
                reason: e.to_string(),
            })?;
            if entry.path().is_dir() {
                debug!(path = %entry.path().display(), "Skipping directory");
                continue;
            }
            candidates.push(entry.into_path());
        }

        Ok(candidates)
    }

    /// Discover the video files in the input directory
    ///
    /// Non-recursive. When `ignore_vertical` is set, only horizontal videos
    /// are kept. Each file is probed at most once per call.
    pub fn discover_inputs(&self) -> Result<FilteredSet, DomainError> {
        let candidates = self.list_candidates()?;
        info!(
            input = %self.config.input_path.display(),
            candidates = candidates.len(),
            backend = self.probe_port.name(),
            "Discovering input videos"
        );

        let mut kept = Vec::new();

        for path in candidates {
            // One probe serves both classifications
            let probe = self.probe_port.probe(&path);

            if !Self::video_from_probe(&path, probe.as_ref())? {
                debug!(path = %path.display(), "Not a video");
                continue;
            }

            if self.config.ignore_vertical {
                let horizontal = match &probe {
                    Ok(probe) => VideoClassifier::is_horizontal(&path, probe)?,
                    Err(_) => false,
                };
                if !horizontal {
                    debug!(path = %path.display(), "Skipping non-horizontal video");
                    continue;
                }
            }

            kept.push(path);
        }

        info!(kept = kept.len(), "Discovery finished");
        Ok(FilteredSet::new(kept))
    }

    /// Map every filtered file to its own directory under the output path
    ///
    /// Pure path computation: nothing is created on disk.
    pub fn compute_output_mapping(&self, filtered_set: &FilteredSet) -> OutputMapping {
        OutputDirNamer::assign(filtered_set, &self.config.output_path)
    }

    /// Discover inputs and compute their output directories
    pub fn setup(&mut self) -> Result<(), DomainError> {
        let input_paths = self.discover_inputs()?;
        let output_paths = self.compute_output_mapping(&input_paths);
        self.input_paths = Some(input_paths);
        self.output_paths = Some(output_paths);
        Ok(())
    }

    /// Run the frame extraction strategy over every discovered file, in order
    ///
    /// Stops at the first failure; later files are not touched.
    pub fn process_videos(&self) -> Result<ProcessingReport, DomainError> {
        let (input_paths, output_paths) = match (&self.input_paths, &self.output_paths) {
            (Some(input_paths), Some(output_paths)) => (input_paths, output_paths),
            _ => return Err(DomainError::NotSetUp),
        };

        info!(
            files = input_paths.len(),
            strategy = self.extractor.name(),
            "Processing videos"
        );

        let mut report = ProcessingReport::default();
        for path in input_paths {
            let output_dir = output_paths.get(path).ok_or(DomainError::NotSetUp)?;
            info!(path = %path.display(), output = %output_dir.display(), "Processing video");

            let stream = self.decoder_port.open_input(path)?;
            let stream = self
                .extractor
                .adjust_stream_dimensions(stream, &self.config)?;
            let frame_report = self.extractor.convert_stream_to_frames(&stream, output_dir)?;

            if frame_report.frames_written == 0 {
                warn!(path = %path.display(), "No frames written");
            }
            report.reports.push(frame_report);
        }

        info!(
            files = report.reports.len(),
            frames = report.total_frames(),
            "Processing finished"
        );
        Ok(report)
    }

    /// Set up and process in one call
    pub fn start(&mut self) -> Result<ProcessingReport, DomainError> {
        self.setup()?;
        self.process_videos()
    }
}
