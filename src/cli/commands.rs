//! Command implementations

use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::app::container::{AppContainer, DefaultAppContainer};
use crate::app::VideoSetFilter;
use crate::cli::args::{ClassifyArgs, DiscoverArgs, OutputFormat, ProcessArgs};
use crate::domain::model::{FilteredSet, OutputMapping, ProcessingReport};

/// Result of a discovery pass as printed by `discover --format json|yaml`
#[derive(Debug, Serialize)]
pub struct DiscoverReport {
    pub files: Vec<PathBuf>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping: Option<BTreeMap<PathBuf, PathBuf>>,
}

impl DiscoverReport {
    pub fn new(filtered_set: &FilteredSet, mapping: Option<&OutputMapping>) -> Self {
        Self {
            files: filtered_set.files().to_vec(),
            count: filtered_set.len(),
            mapping: mapping.map(|m| {
                m.iter()
                    .map(|(input, output)| (input.to_path_buf(), output.to_path_buf()))
                    .collect()
            }),
        }
    }

    /// Render in the requested format
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        Ok(match format {
            OutputFormat::Text => {
                let mut text = String::new();
                for file in &self.files {
                    match self.mapping.as_ref().and_then(|m| m.get(file)) {
                        Some(output) => {
                            text.push_str(&format!("{} -> {}\n", file.display(), output.display()))
                        }
                        None => text.push_str(&format!("{}\n", file.display())),
                    }
                }
                text.push_str(&format!("count: {}\n", self.count));
                text
            }
            OutputFormat::Json => {
                let mut json = serde_json::to_string_pretty(self)
                    .context("Failed to serialize discovery report as JSON")?;
                json.push('\n');
                json
            }
            OutputFormat::Yaml => serde_yaml::to_string(self)
                .context("Failed to serialize discovery report as YAML")?,
        })
    }
}

/// Execute the discover command
pub fn discover(
    container: &DefaultAppContainer,
    args: &DiscoverArgs,
    out: &mut impl Write,
) -> Result<()> {
    let filter = container.video_set_filter();
    info!(input = %filter.config().input_path.display(), "Starting discovery");

    let filtered_set = filter
        .discover_inputs()
        .context("Failed to discover input videos")?;
    let mapping = args
        .mapping
        .then(|| filter.compute_output_mapping(&filtered_set));

    let report = DiscoverReport::new(&filtered_set, mapping.as_ref());
    out.write_all(report.render(args.format)?.as_bytes())?;
    Ok(())
}

/// Execute the classify command
pub fn classify(
    container: &DefaultAppContainer,
    args: &ClassifyArgs,
    out: &mut impl Write,
) -> Result<()> {
    let filter = container.video_set_filter();
    let is_video = filter
        .classify_as_video(&args.file)
        .with_context(|| format!("Failed to classify {}", args.file.display()))?;
    writeln!(out, "video: {}", is_video)?;

    if is_video {
        let horizontal = filter
            .classify_as_horizontal(&args.file)
            .with_context(|| format!("Failed to measure {}", args.file.display()))?;
        writeln!(out, "horizontal: {}", horizontal)?;
    }
    Ok(())
}

/// Execute the process command
pub fn process(
    container: &DefaultAppContainer,
    args: &ProcessArgs,
    out: &mut impl Write,
) -> Result<()> {
    let mut filter: VideoSetFilter = container
        .video_set_filter_with(args.strategy)
        .context("Failed to create frame extractor")?;
    info!(strategy = %args.strategy, "Starting processing");

    let report = filter.start().context("Processing failed")?;
    write_processing_report(&report, out)
}

fn write_processing_report(report: &ProcessingReport, out: &mut impl Write) -> Result<()> {
    for entry in &report.reports {
        writeln!(
            out,
            "{} -> {} ({} frames)",
            entry.source.display(),
            entry.output_dir.display(),
            entry.frames_written
        )?;
    }
    writeln!(
        out,
        "processed {} videos, {} frames",
        report.reports.len(),
        report.total_frames()
    )?;
    Ok(())
}
