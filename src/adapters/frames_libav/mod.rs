//! Frame extraction strategy using libav decoding
//!
//! Center-crops every sampled frame to the target aspect ratio, resizes it
//! to the target size and writes it as `frame_NNNNNN.png` in the output
//! directory.

use std::fs;
use std::path::{Path, PathBuf};

use ffmpeg_next::codec::context::Context as CodecContext;
use ffmpeg_next::format::Pixel;
use ffmpeg_next::frame::Video as VideoFrame;
use ffmpeg_next::software::scaling::{Context as ScalingContext, Flags as ScalingFlags};
use image::imageops::{self, FilterType};
use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::center_crop;
use crate::ports::*;

/// Output geometry and sampling of extracted frames
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSettings {
    pub size: FrameSize,
    /// Keep one decoded frame out of every `every_nth`
    pub every_nth: u64,
    /// Stop after this many frames per video
    pub max_frames: Option<u64>,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            size: FrameSize {
                width: 512,
                height: 512,
            },
            every_nth: 1,
            max_frames: None,
        }
    }
}

impl FrameSettings {
    pub fn validate(&self) -> Result<(), DomainError> {
        FrameSize::new(self.size.width, self.size.height)?;
        if self.every_nth == 0 {
            return Err(DomainError::Config(
                "every_nth must be at least 1".to_string(),
            ));
        }
        if self.max_frames == Some(0) {
            return Err(DomainError::Config(
                "max_frames must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}

/// Frame extractor decoding with libav and writing PNG files
pub struct LibavFrameExtractor {
    settings: FrameSettings,
}

impl LibavFrameExtractor {
    pub fn new(settings: FrameSettings) -> Result<Self, DomainError> {
        settings.validate()?;
        ffmpeg_next::init()
            .map_err(|e| DomainError::Config(format!("FFmpeg initialization failed: {}", e)))?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &FrameSettings {
        &self.settings
    }
}

/// Receives decoded RGB frames and writes the sampled ones to disk
struct FrameSink<'a> {
    output_dir: &'a Path,
    crop: CropRect,
    target: FrameSize,
    every_nth: u64,
    max_frames: Option<u64>,
    decoded: u64,
    written: u64,
}

impl FrameSink<'_> {
    fn is_full(&self) -> bool {
        self.max_frames.map_or(false, |max| self.written >= max)
    }

    /// Count a decoded frame; true if it should be written
    fn sample(&mut self) -> bool {
        let keep = self.decoded % self.every_nth == 0;
        self.decoded += 1;
        keep
    }

    fn write(&mut self, image: &RgbImage) -> Result<(), DomainError> {
        let CropRect { x, y, width, height } = self.crop;
        let cropped = imageops::crop_imm(image, x, y, width, height).to_image();
        let frame = if (width, height) == (self.target.width, self.target.height) {
            cropped
        } else {
            imageops::resize(&cropped, self.target.width, self.target.height, FilterType::Lanczos3)
        };

        let path = self.output_dir.join(format!("frame_{:06}.png", self.written));
        frame.save(&path).map_err(|e| DomainError::FrameWrite {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        self.written += 1;
        Ok(())
    }
}

/// Decoder plus the RGB conversion feeding a [`FrameSink`]
struct DecodeState {
    decoder: ffmpeg_next::codec::decoder::Video,
    scaler: ScalingContext,
    decoded_frame: VideoFrame,
    rgb_frame: VideoFrame,
    width: u32,
    height: u32,
}

impl DecodeState {
    /// Pull every frame the decoder has ready into the sink
    fn drain(&mut self, source: &Path, sink: &mut FrameSink<'_>) -> Result<(), DomainError> {
        while !sink.is_full() && self.decoder.receive_frame(&mut self.decoded_frame).is_ok() {
            if !sink.sample() {
                continue;
            }
            self.scaler
                .run(&self.decoded_frame, &mut self.rgb_frame)
                .map_err(|e| decode_error(source, "failed to convert frame", e))?;
            let image = frame_to_image(&self.rgb_frame, self.width, self.height)
                .ok_or_else(|| decode_error(source, "failed to copy frame", "short frame buffer"))?;
            sink.write(&image)?;
        }
        Ok(())
    }
}

/// Copy an RGB24 frame into a tightly packed image, dropping row padding
fn frame_to_image(frame: &VideoFrame, width: u32, height: u32) -> Option<RgbImage> {
    let stride = frame.stride(0);
    let row_bytes = width as usize * 3;
    let data = frame.data(0);

    let buffer = if stride == row_bytes {
        data.get(..row_bytes * height as usize)?.to_vec()
    } else {
        let mut buffer = Vec::with_capacity(row_bytes * height as usize);
        for row in 0..height as usize {
            let start = row * stride;
            buffer.extend_from_slice(data.get(start..start + row_bytes)?);
        }
        buffer
    };

    RgbImage::from_raw(width, height, buffer)
}

fn decode_error(path: &Path, what: &str, error: impl std::fmt::Display) -> DomainError {
    DomainError::DecodeFailed {
        path: path.to_path_buf(),
        reason: format!("{}: {}", what, error),
    }
}

impl FrameExtractor for LibavFrameExtractor {
    fn name(&self) -> &'static str {
        "libav"
    }

    fn adjust_stream_dimensions(
        &self,
        mut stream: MediaStream,
        _config: &FilterConfig,
    ) -> Result<MediaStream, DomainError> {
        if stream.width == 0 || stream.height == 0 {
            return Err(DomainError::NoVideoStream {
                path: stream.source.clone(),
                reason: format!("stream has empty frame size {}x{}", stream.width, stream.height),
            });
        }

        let crop = center_crop(stream.width, stream.height, self.settings.size);
        debug!(
            path = %stream.source.display(),
            ?crop,
            target = %self.settings.size,
            "Adjusted stream dimensions"
        );
        stream.crop = Some(crop);
        stream.target = Some(self.settings.size);
        Ok(stream)
    }

    fn convert_stream_to_frames(
        &self,
        stream: &MediaStream,
        output_dir: &Path,
    ) -> Result<FrameReport, DomainError> {
        let source = stream.source.as_path();
        fs::create_dir_all(output_dir).map_err(|e| DomainError::FrameWrite {
            path: output_dir.to_path_buf(),
            reason: format!("cannot create output directory: {}", e),
        })?;

        let mut input = ffmpeg_next::format::input(&source)
            .map_err(|e| decode_error(source, "failed to open input", e))?;

        let parameters = input
            .stream(stream.stream_index)
            .ok_or_else(|| DomainError::NoVideoStream {
                path: source.to_path_buf(),
                reason: format!("stream {} not found", stream.stream_index),
            })?
            .parameters();
        let decoder = CodecContext::from_parameters(parameters)
            .and_then(|context| context.decoder().video())
            .map_err(|e| decode_error(source, "failed to create video decoder", e))?;

        let (width, height) = (decoder.width(), decoder.height());
        if width == 0 || height == 0 {
            return Err(decode_error(source, "decoder reports no frame size", "0x0"));
        }
        let crop = stream.crop.unwrap_or(CropRect { x: 0, y: 0, width, height });
        if crop.x + crop.width > width || crop.y + crop.height > height {
            return Err(decode_error(
                source,
                "crop outside decoded frame",
                format!("{:?} in {}x{}", crop, width, height),
            ));
        }
        let target = stream.target.unwrap_or(FrameSize {
            width: crop.width,
            height: crop.height,
        });

        let scaler = ScalingContext::get(
            decoder.format(),
            width,
            height,
            Pixel::RGB24,
            width,
            height,
            ScalingFlags::BILINEAR,
        )
        .map_err(|e| decode_error(source, "failed to create scaler", e))?;

        let mut sink = FrameSink {
            output_dir,
            crop,
            target,
            every_nth: self.settings.every_nth,
            max_frames: self.settings.max_frames,
            decoded: 0,
            written: 0,
        };
        let mut state = DecodeState {
            decoder,
            scaler,
            decoded_frame: VideoFrame::empty(),
            rgb_frame: VideoFrame::empty(),
            width,
            height,
        };

        for (packet_stream, packet) in input.packets() {
            if sink.is_full() {
                break;
            }
            if packet_stream.index() != stream.stream_index {
                continue;
            }
            state
                .decoder
                .send_packet(&packet)
                .map_err(|e| decode_error(source, "failed to decode packet", e))?;
            state.drain(source, &mut sink)?;
        }

        if !sink.is_full() {
            state
                .decoder
                .send_eof()
                .map_err(|e| decode_error(source, "failed to flush decoder", e))?;
            state.drain(source, &mut sink)?;
        }

        info!(
            path = %source.display(),
            output = %output_dir.display(),
            decoded = sink.decoded,
            written = sink.written,
            "Extracted frames"
        );

        Ok(FrameReport {
            source: PathBuf::from(source),
            output_dir: output_dir.to_path_buf(),
            frames_written: sink.written,
        })
    }
}
