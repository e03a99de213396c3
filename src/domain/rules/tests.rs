// Unit tests for classification and layout rules

use super::*;
use std::path::{Path, PathBuf};

fn probe_with(streams: Vec<StreamDescriptor>) -> MediaProbe {
    MediaProbe::new(streams)
}

#[test]
fn test_malformed_diagnostic_detection() {
    assert!(is_malformed_diagnostic(
        "c.txt: Invalid data found when processing input\n"
    ));
    assert!(!is_malformed_diagnostic("missing.mp4: No such file or directory"));
}

#[test]
fn test_text_demuxer_detection() {
    assert!(is_text_demuxer("tty"));
    assert!(!is_text_demuxer("mov,mp4,m4a,3gp,3g2,mj2"));
    assert!(!is_text_demuxer("matroska,webm"));
    assert!(!is_text_demuxer(""));
}

#[test]
fn test_is_video_requires_video_stream() {
    assert!(!VideoClassifier::is_video(&probe_with(vec![])));
    assert!(!VideoClassifier::is_video(&probe_with(vec![
        StreamDescriptor::other(0, CodecType::Audio),
        StreamDescriptor::other(1, CodecType::Subtitle),
    ])));
    assert!(VideoClassifier::is_video(&probe_with(vec![
        StreamDescriptor::other(0, CodecType::Audio),
        StreamDescriptor::video(1, 10, 10),
    ])));
}

#[test]
fn test_horizontal_uses_first_video_stream() {
    let path = Path::new("a.mp4");
    let probe = probe_with(vec![
        StreamDescriptor::other(0, CodecType::Audio),
        StreamDescriptor::video(1, 360, 640),
        StreamDescriptor::video(2, 640, 360),
    ]);
    assert!(!VideoClassifier::is_horizontal(path, &probe).unwrap());
}

#[test]
fn test_horizontal_is_strict() {
    let path = Path::new("a.mp4");
    let wide = probe_with(vec![StreamDescriptor::video(0, 641, 640)]);
    let square = probe_with(vec![StreamDescriptor::video(0, 640, 640)]);
    let tall = probe_with(vec![StreamDescriptor::video(0, 640, 641)]);

    assert!(VideoClassifier::is_horizontal(path, &wide).unwrap());
    assert!(!VideoClassifier::is_horizontal(path, &square).unwrap());
    assert!(!VideoClassifier::is_horizontal(path, &tall).unwrap());
    assert_eq!(
        VideoClassifier::orientation(path, &square).unwrap(),
        Orientation::Square
    );
}

#[test]
fn test_horizontal_without_video_stream_is_checked_error() {
    let path = Path::new("song.m4a");
    let probe = probe_with(vec![StreamDescriptor::other(0, CodecType::Audio)]);
    match VideoClassifier::is_horizontal(path, &probe) {
        Err(DomainError::NoVideoStream { path, .. }) => assert_eq!(path, PathBuf::from("song.m4a")),
        other => panic!("expected NoVideoStream, got {:?}", other),
    }

    let no_dims = probe_with(vec![StreamDescriptor::other(0, CodecType::Video)]);
    assert!(matches!(
        VideoClassifier::is_horizontal(path, &no_dims),
        Err(DomainError::NoVideoStream { .. })
    ));
}

#[test]
fn test_output_dir_base_name() {
    assert_eq!(OutputDirNamer::base_name(Path::new("raw-videos/a.mp4")), "a");
    assert_eq!(
        OutputDirNamer::base_name(Path::new("/abs/deep/raw/clip.v2.mov")),
        "clip.v2"
    );
    assert_eq!(OutputDirNamer::base_name(Path::new("raw/.hidden.mp4")), "hidden");
    assert_eq!(OutputDirNamer::base_name(Path::new("raw/noext")), "noext");
    assert_eq!(OutputDirNamer::base_name(Path::new("raw/...")), "unnamed");
}

#[test]
fn test_output_mapping_one_entry_per_input() {
    let inputs = vec![
        PathBuf::from("raw/a.mp4"),
        PathBuf::from("raw/b.mp4"),
        PathBuf::from("raw/c.mkv"),
    ];
    let mapping = OutputDirNamer::assign(&inputs, Path::new("out"));

    assert_eq!(mapping.len(), inputs.len());
    for input in &inputs {
        assert!(mapping.get(input).is_some());
    }
    assert_eq!(mapping.get(Path::new("raw/a.mp4")), Some(Path::new("out/a")));
    assert_eq!(mapping.get(Path::new("raw/c.mkv")), Some(Path::new("out/c")));
}

#[test]
fn test_output_mapping_disambiguates_shared_stems() {
    let inputs = vec![
        PathBuf::from("raw/a.mkv"),
        PathBuf::from("raw/a.mp4"),
        PathBuf::from("raw/a.webm"),
    ];
    let mapping = OutputDirNamer::assign(&inputs, Path::new("out"));

    assert_eq!(mapping.get(Path::new("raw/a.mkv")), Some(Path::new("out/a")));
    assert_eq!(mapping.get(Path::new("raw/a.mp4")), Some(Path::new("out/a-2")));
    assert_eq!(mapping.get(Path::new("raw/a.webm")), Some(Path::new("out/a-3")));

    let distinct: std::collections::HashSet<_> = mapping.output_dirs().collect();
    assert_eq!(distinct.len(), 3);
}

#[test]
fn test_output_mapping_is_deterministic() {
    let inputs = vec![PathBuf::from("raw/x.mp4"), PathBuf::from("raw/x.mov")];
    let first = OutputDirNamer::assign(&inputs, Path::new("out"));
    let second = OutputDirNamer::assign(&inputs, Path::new("out"));
    assert_eq!(first, second);
}

#[test]
fn test_output_mapping_empty_set() {
    let inputs: Vec<PathBuf> = Vec::new();
    assert!(OutputDirNamer::assign(&inputs, Path::new("out")).is_empty());
}

#[test]
fn test_center_crop_wide_source() {
    let target = FrameSize::new(512, 512).unwrap();
    let crop = center_crop(1920, 1080, target);
    assert_eq!(crop, CropRect { x: 420, y: 0, width: 1080, height: 1080 });
}

#[test]
fn test_center_crop_tall_source() {
    let target = FrameSize::new(512, 512).unwrap();
    let crop = center_crop(360, 640, target);
    assert_eq!(crop, CropRect { x: 0, y: 140, width: 360, height: 360 });
}

#[test]
fn test_center_crop_matching_aspect_is_identity() {
    let target = FrameSize::new(640, 360).unwrap();
    let crop = center_crop(1280, 720, target);
    assert_eq!(crop, CropRect { x: 0, y: 0, width: 1280, height: 720 });
}

#[test]
fn test_center_crop_fits_inside_source() {
    let targets = [(512, 512), (1024, 256), (256, 1024), (3, 2)];
    let sources = [(1920, 1080), (1080, 1920), (7, 5), (1, 1)];
    for (tw, th) in targets {
        let target = FrameSize::new(tw, th).unwrap();
        for (w, h) in sources {
            let crop = center_crop(w, h, target);
            assert!(crop.width >= 1 && crop.height >= 1);
            assert!(crop.x + crop.width <= w, "{:?} for {}x{}", crop, w, h);
            assert!(crop.y + crop.height <= h, "{:?} for {}x{}", crop, w, h);
        }
    }
}
