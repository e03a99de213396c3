use std::sync::Arc;

use tracing::debug;

use crate::adapters::{FfprobeAdapter, FrameSettings, LibavFrameExtractor, LibavProbeAdapter};
use crate::app::VideoSetFilter;
use crate::config_initialization::{ExtractionStrategy, ProbeBackend, Settings};
use crate::domain::errors::DomainError;
use crate::ports::{DecoderPort, FrameExtractor, ProbePort, UnsupportedFrameExtractor};

pub trait AppContainer {
    fn probe_port(&self) -> Arc<dyn ProbePort>;
    fn decoder_port(&self) -> Arc<dyn DecoderPort>;
    fn video_set_filter(&self) -> VideoSetFilter;
}

/// Wires adapters to the filter according to resolved settings
pub struct DefaultAppContainer {
    settings: Settings,
    probe_port: Arc<dyn ProbePort>,
    decoder_port: Arc<dyn DecoderPort>,
}

impl DefaultAppContainer {
    pub fn new(settings: Settings) -> Result<Self, DomainError> {
        let libav = Arc::new(LibavProbeAdapter::new()?);
        let probe_port: Arc<dyn ProbePort> = match settings.probe_backend {
            ProbeBackend::Libav => Arc::clone(&libav) as Arc<dyn ProbePort>,
            ProbeBackend::Ffprobe => Arc::new(FfprobeAdapter::new()),
        };
        debug!(backend = probe_port.name(), "Selected probe backend");

        Ok(Self {
            settings,
            probe_port,
            decoder_port: libav,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Build the extraction strategy for `strategy`
    pub fn frame_extractor(
        &self,
        strategy: ExtractionStrategy,
        frames: FrameSettings,
    ) -> Result<Arc<dyn FrameExtractor>, DomainError> {
        let extractor: Arc<dyn FrameExtractor> = match strategy {
            ExtractionStrategy::Libav => Arc::new(LibavFrameExtractor::new(frames)?),
            ExtractionStrategy::Unsupported => Arc::new(UnsupportedFrameExtractor),
        };
        Ok(extractor)
    }

    /// A filter that extracts frames with `strategy`
    pub fn video_set_filter_with(
        &self,
        strategy: ExtractionStrategy,
    ) -> Result<VideoSetFilter, DomainError> {
        let extractor = self.frame_extractor(strategy, self.settings.frames.clone())?;
        debug!(strategy = extractor.name(), "Selected frame extractor");
        Ok(self.video_set_filter().with_extractor(extractor))
    }
}

impl AppContainer for DefaultAppContainer {
    fn probe_port(&self) -> Arc<dyn ProbePort> {
        Arc::clone(&self.probe_port)
    }

    fn decoder_port(&self) -> Arc<dyn DecoderPort> {
        Arc::clone(&self.decoder_port)
    }

    /// A filter with the default extractor, which does not extract frames
    fn video_set_filter(&self) -> VideoSetFilter {
        VideoSetFilter::new(
            self.settings.filter.clone(),
            self.probe_port(),
            self.decoder_port(),
        )
    }
}
