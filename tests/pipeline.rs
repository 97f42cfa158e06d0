use assert_fs::prelude::*;
use assert_fs::TempDir;
use image::{ImageFormat, Rgb, RgbImage};
use squish::{
    BatchCompressor, CompressionConfig, CompressionError, OutputFormat, Pipeline,
};
use std::fs;

// Checkerboard content so lossy encoders have something real to compress.
fn test_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        if (x / 8 + y / 8) % 2 == 0 {
            Rgb([245, 245, 245])
        } else {
            Rgb([30, 60, 90])
        }
    })
}

fn config(max_width: u32, max_height: u32) -> CompressionConfig {
    CompressionConfig {
        max_width,
        max_height,
        ..Default::default()
    }
}

#[test]
fn oversized_image_is_downscaled_to_fit() {
    let temp = TempDir::new().unwrap();
    let input = temp.child("large.jpg");
    test_image(400, 300).save(input.path()).unwrap();
    let output = temp.child("small.jpg");

    let pipeline = Pipeline::new(config(128, 128)).unwrap();
    let result = pipeline.compress(input.path(), output.path()).unwrap();

    // ratio = min(128/400, 128/300) = 0.32
    assert_eq!(result.original_dimensions, "400x300");
    assert_eq!(result.new_dimensions, "128x96");
    assert_eq!(image::image_dimensions(output.path()).unwrap(), (128, 96));
}

#[test]
fn image_within_bounds_passes_through_unresized() {
    let temp = TempDir::new().unwrap();
    let input = temp.child("photo.png");
    test_image(800, 600).save(input.path()).unwrap();
    let output = temp.child("out.png");

    let pipeline = Pipeline::new(config(1280, 1280)).unwrap();
    let result = pipeline.compress(input.path(), output.path()).unwrap();

    assert_eq!(result.new_dimensions, "800x600");
    assert_eq!(image::image_dimensions(output.path()).unwrap(), (800, 600));

    // No explicit format: the source format is kept.
    let bytes = fs::read(output.path()).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
}

#[test]
fn small_image_is_never_upscaled() {
    let temp = TempDir::new().unwrap();
    let input = temp.child("tiny.png");
    test_image(48, 32).save(input.path()).unwrap();
    let output = temp.child("out.png");

    let pipeline = Pipeline::new(config(1280, 1280)).unwrap();
    let result = pipeline.compress(input.path(), output.path()).unwrap();

    assert_eq!(result.original_dimensions, "48x32");
    assert_eq!(result.new_dimensions, "48x32");
}

#[test]
fn explicit_webp_overrides_the_source_format() {
    let temp = TempDir::new().unwrap();
    let input = temp.child("image.bmp");
    test_image(64, 64).save(input.path()).unwrap();
    let output = temp.child("image.webp");

    let pipeline = Pipeline::new(CompressionConfig {
        format: Some(OutputFormat::WebP),
        ..Default::default()
    })
    .unwrap();
    pipeline.compress(input.path(), output.path()).unwrap();

    let bytes = fs::read(output.path()).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::WebP);
    assert!(image::load_from_memory(&bytes).is_ok());
}

#[test]
fn format_is_inferred_from_the_input_extension() {
    let temp = TempDir::new().unwrap();
    let input = temp.child("photo.png");
    test_image(32, 32).save(input.path()).unwrap();

    // The output extension plays no part in format resolution.
    let output = temp.child("artifact.bin");

    let pipeline = Pipeline::new(config(1280, 1280)).unwrap();
    pipeline.compress(input.path(), output.path()).unwrap();

    let bytes = fs::read(output.path()).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
}

#[test]
fn unknown_input_extension_defaults_to_jpeg() {
    let temp = TempDir::new().unwrap();
    let input = temp.child("upload.dat");
    test_image(32, 32).save_with_format(input.path(), ImageFormat::Png).unwrap();
    let output = temp.child("out");

    let pipeline = Pipeline::new(config(1280, 1280)).unwrap();
    pipeline.compress(input.path(), output.path()).unwrap();

    let bytes = fs::read(output.path()).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
}

#[test]
fn rgba_input_encodes_to_jpeg_without_alpha() {
    let temp = TempDir::new().unwrap();
    let input = temp.child("overlay.png");
    image::RgbaImage::from_pixel(40, 40, image::Rgba([200, 100, 50, 128]))
        .save(input.path())
        .unwrap();
    let output = temp.child("flat.jpeg");

    let pipeline = Pipeline::new(CompressionConfig {
        format: Some(OutputFormat::Jpeg),
        ..Default::default()
    })
    .unwrap();
    pipeline.compress(input.path(), output.path()).unwrap();

    let decoded = image::open(output.path()).unwrap();
    assert!(!decoded.color().has_alpha());
}

#[test]
fn grayscale_input_stays_decodable() {
    let temp = TempDir::new().unwrap();
    let input = temp.child("gray.png");
    image::GrayImage::from_fn(50, 50, |x, _| image::Luma([(x * 5) as u8]))
        .save(input.path())
        .unwrap();
    let output = temp.child("gray_out.png");

    let pipeline = Pipeline::new(config(1280, 1280)).unwrap();
    pipeline.compress(input.path(), output.path()).unwrap();

    let decoded = image::open(output.path()).unwrap();
    assert_eq!(image::image_dimensions(output.path()).unwrap(), (50, 50));
    assert!(!decoded.color().has_alpha());
}

#[test]
fn non_ascii_paths_are_supported() {
    let temp = TempDir::new().unwrap();
    let input = temp.child("фото-压缩.png");
    test_image(64, 48).save(input.path()).unwrap();
    let output = temp.child("фото-压缩-klein.png");

    let pipeline = Pipeline::new(config(1280, 1280)).unwrap();
    let result = pipeline.compress(input.path(), output.path()).unwrap();

    assert_eq!(result.new_dimensions, "64x48");
    assert!(output.path().exists());
}

#[test]
fn output_parent_directories_are_created() {
    let temp = TempDir::new().unwrap();
    let input = temp.child("in.png");
    test_image(32, 32).save(input.path()).unwrap();
    let output = temp.child("compressed/nested/out.png");

    let pipeline = Pipeline::new(config(1280, 1280)).unwrap();
    pipeline.compress(input.path(), output.path()).unwrap();

    assert!(output.path().exists());
}

#[test]
fn result_reports_sizes_from_disk() {
    let temp = TempDir::new().unwrap();
    let input = temp.child("in.png");
    test_image(120, 90).save(input.path()).unwrap();
    let output = temp.child("out.jpeg");

    let pipeline = Pipeline::new(CompressionConfig {
        format: Some(OutputFormat::Jpeg),
        quality: 60,
        ..Default::default()
    })
    .unwrap();
    let result = pipeline.compress(input.path(), output.path()).unwrap();

    assert_eq!(result.original_size, fs::metadata(input.path()).unwrap().len());
    assert_eq!(result.compressed_size, fs::metadata(output.path()).unwrap().len());
    assert_eq!(
        result.reduction_percent,
        squish::reduction_percent(result.original_size, result.compressed_size)
    );
    // The input is left in place.
    assert!(input.path().exists());
}

#[test]
fn corrupted_input_is_a_decode_error() {
    let temp = TempDir::new().unwrap();
    let input = temp.child("broken.jpg");
    input.write_binary(b"this is not an image").unwrap();
    let output = temp.child("out.jpg");

    let pipeline = Pipeline::new(config(1280, 1280)).unwrap();
    let err = pipeline.compress(input.path(), output.path()).unwrap_err();

    assert!(matches!(err, CompressionError::Decode(_)));
}

#[test]
fn zero_byte_input_is_a_decode_error() {
    let temp = TempDir::new().unwrap();
    let input = temp.child("empty.png");
    input.touch().unwrap();
    let output = temp.child("out.png");

    let pipeline = Pipeline::new(config(1280, 1280)).unwrap();
    let err = pipeline.compress(input.path(), output.path()).unwrap_err();

    assert!(matches!(err, CompressionError::Decode(_)));
}

#[test]
fn missing_input_is_a_decode_error() {
    let temp = TempDir::new().unwrap();
    let pipeline = Pipeline::new(config(1280, 1280)).unwrap();

    let err = pipeline
        .compress(&temp.path().join("absent.jpg"), &temp.path().join("out.jpg"))
        .unwrap_err();

    assert!(matches!(err, CompressionError::Decode(_)));
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let bad_bounds = CompressionConfig {
        max_width: 0,
        ..Default::default()
    };
    assert!(matches!(
        Pipeline::new(bad_bounds),
        Err(CompressionError::InvalidParameter(_))
    ));

    let bad_quality = CompressionConfig {
        quality: 150,
        ..Default::default()
    };
    assert!(matches!(
        Pipeline::new(bad_quality),
        Err(CompressionError::InvalidParameter(_))
    ));
}

#[test]
fn batch_compresses_all_files_and_collects_failures() {
    let temp = TempDir::new().unwrap();
    let staged = temp.child("uploads");
    staged.create_dir_all().unwrap();

    for name in ["a.png", "b.jpg", "c.bmp"] {
        test_image(200, 150).save(staged.child(name).path()).unwrap();
    }
    staged.child("broken.jpg").write_binary(b"garbage").unwrap();
    // Not an allowed extension; skipped during collection.
    staged.child("notes.txt").write_str("hello").unwrap();

    let output = temp.child("compressed");
    let compressor = BatchCompressor::new(config(128, 128), 0).unwrap();
    let summary = compressor
        .compress_directory(staged.path(), output.path(), false)
        .unwrap();

    assert_eq!(summary.processed, 3);
    assert_eq!(summary.failures.len(), 1);
    assert!(summary.failures[0].0.ends_with("broken.jpg"));
    assert!(summary.total_original_bytes > 0);

    let artifacts: Vec<_> = fs::read_dir(output.path()).unwrap().collect();
    assert_eq!(artifacts.len(), 3);
}

#[test]
fn batch_rejects_matching_input_and_output_dirs() {
    let temp = TempDir::new().unwrap();
    let dir = temp.child("both");
    dir.create_dir_all().unwrap();

    let compressor = BatchCompressor::new(config(128, 128), 0).unwrap();
    let err = compressor
        .compress_directory(dir.path(), dir.path(), false)
        .unwrap_err();

    assert!(matches!(err, CompressionError::InvalidParameter(_)));
}
