//! End-to-end: files on disk through a batch into an archive.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use squish_core::{
    BatchCoordinator, BatchReport, Config, ExportPackager, FileSelector, Format, OutputFormat,
    OutputWriter,
};
use std::io::{Cursor, Read};
use std::path::Path;

fn write_image(path: &Path, image: &DynamicImage, format: ImageFormat) {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, format).unwrap();
    std::fs::write(path, buffer.into_inner()).unwrap();
}

fn noisy(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        let v = x.wrapping_mul(2654435761) ^ y.wrapping_mul(40503);
        Rgb([v as u8, (v >> 8) as u8, (v >> 16) as u8])
    }))
}

#[tokio::test]
async fn test_directory_to_archive() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    write_image(
        &input.path().join("a_logo.png"),
        &DynamicImage::ImageRgba8(RgbaImage::from_fn(120, 80, |x, _| {
            Rgba([200, 40, 40, if x < 60 { 0 } else { 255 }])
        })),
        ImageFormat::Png,
    );
    write_image(&input.path().join("b_photo.jpg"), &noisy(300, 200), ImageFormat::Jpeg);
    write_image(
        &input.path().join("c_icon.bmp"),
        &DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, Rgb([0, 128, 255]))),
        ImageFormat::Bmp,
    );
    std::fs::write(input.path().join("d_broken.gif"), b"GIF89a but nothing else").unwrap();
    std::fs::write(input.path().join("notes.txt"), b"not an image").unwrap();

    let mut config = Config::default();
    config.compression.resize_filter = "triangle".to_string();

    let files = FileSelector::new(false)
        .select(&[input.path().to_path_buf(), input.path().join("notes.txt")])
        .unwrap();
    assert_eq!(files.len(), 5);

    let mut batch = BatchCoordinator::new(&config);
    batch.select(files).unwrap();
    let state = batch.run_to_completion().await;

    assert_eq!(state.total_expected(), 4);
    assert_eq!(state.completed_count(), 4);
    assert_eq!(state.failures().len(), 1);
    assert_eq!(state.failures()[0].name, "d_broken.gif");
    assert!(state.is_export_ready());

    let outcomes = state.outcomes();
    let names: Vec<String> = outcomes.iter().map(|o| o.download_name()).collect();
    assert_eq!(names, vec!["a_logo.jpeg", "b_photo.jpeg", "c_icon.bmp"]);
    assert_eq!(outcomes[0].encode_result.format, Format::Jpeg);
    assert_eq!(outcomes[2].encode_result.quality_used, None);

    let packager = ExportPackager::new(&config.export);
    let path = packager
        .write_to_dir(output.path(), state.outcomes())
        .unwrap();
    assert_eq!(path.file_name().unwrap(), "compressed_images.zip");

    let mut archive = zip::ZipArchive::new(std::fs::File::open(&path).unwrap()).unwrap();
    assert_eq!(archive.len(), 3);
    for (i, outcome) in outcomes.iter().enumerate() {
        let mut entry = archive.by_index(i).unwrap();
        assert_eq!(entry.name(), outcome.download_name());
        let mut data = Vec::new();
        entry.read_to_end(&mut data).unwrap();
        assert_eq!(data, outcome.encode_result.bytes);
    }

    let report = BatchReport::from_state(state, true);
    let mut writer = OutputWriter::new(Vec::new(), OutputFormat::Json, false);
    writer.write_report(&report).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&writer.into_inner()).unwrap();
    assert_eq!(value["summary"]["succeeded"], 3);
    assert_eq!(value["summary"]["failed"], 1);
    assert!(value["images"][1]["compressed_preview"]
        .as_str()
        .unwrap()
        .starts_with("data:image/jpeg;base64,"));
}
