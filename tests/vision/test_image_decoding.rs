// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Frame decoding tests across the upload and stream encodings

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hand_detect_node::vision::{
    decode_base64_image, decode_data_uri, decode_image_bytes, ImageError,
};
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba};
use std::io::Cursor;

fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, format).unwrap();
    buffer.into_inner()
}

fn rgba_png(width: u32, height: u32) -> Vec<u8> {
    let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_pixel(width, height, Rgba([10, 200, 30, 128]));
    encode(DynamicImage::ImageRgba8(img), ImageFormat::Png)
}

#[test]
fn test_every_decode_yields_rgb() {
    let (image, info) = decode_image_bytes(&rgba_png(20, 10), 1024 * 1024).unwrap();

    assert!(matches!(image, DynamicImage::ImageRgb8(_)));
    assert_eq!((info.width, info.height), (20, 10));
    assert_eq!(image.to_rgb8().get_pixel(5, 5).0, [10, 200, 30]);
}

#[test]
fn test_grayscale_is_promoted_to_rgb() {
    let gray = DynamicImage::new_luma8(8, 8);
    let (image, _) = decode_image_bytes(&encode(gray, ImageFormat::Png), 1024).unwrap();
    assert!(matches!(image, DynamicImage::ImageRgb8(_)));
}

#[test]
fn test_data_uri_ignores_media_type() {
    let body = STANDARD.encode(rgba_png(4, 4));

    // Prefix content is never inspected, only the first comma matters
    for prefix in ["data:image/png;base64", "data:image/jpeg;base64", "anything"] {
        let frame = format!("{},{}", prefix, body);
        let (image, _) = decode_data_uri(&frame, 1024 * 1024).unwrap();
        assert_eq!(image.width(), 4);
    }
}

#[test]
fn test_base64_with_surrounding_whitespace() {
    let body = format!("  {}\n", STANDARD.encode(rgba_png(3, 3)));
    assert!(decode_base64_image(&body, 1024 * 1024).is_ok());
}

#[test]
fn test_decode_failures_are_distinguishable() {
    assert!(matches!(
        decode_data_uri("no comma here", 1024),
        Err(ImageError::MissingMediaTypePrefix)
    ));
    assert!(matches!(
        decode_data_uri("data:,", 1024),
        Err(ImageError::EmptyData)
    ));
    assert!(matches!(
        decode_data_uri("data:,@@@@", 1024),
        Err(ImageError::InvalidBase64(_))
    ));
    assert!(matches!(
        decode_image_bytes(b"GIF89a but not really", 1024),
        Err(ImageError::DecodeFailed(_))
    ));
}

#[test]
fn test_size_limit_applies_to_decoded_bytes() {
    let png = rgba_png(64, 64);
    let limit = png.len() - 1;

    assert!(matches!(
        decode_image_bytes(&png, limit),
        Err(ImageError::TooLarge(_, _))
    ));

    let frame = format!("data:image/png;base64,{}", STANDARD.encode(&png));
    assert!(matches!(
        decode_data_uri(&frame, limit),
        Err(ImageError::TooLarge(_, _))
    ));
}

#[test]
fn test_only_padded_single_line_base64_is_accepted() {
    // "ABCD" is "QUJDRA==" in standard base64
    assert!(matches!(
        decode_data_uri("data:,QUJDRA", 1024),
        Err(ImageError::InvalidBase64(_))
    ));
    assert!(matches!(
        decode_data_uri("data:,QUJD\nRA==", 1024),
        Err(ImageError::InvalidBase64(_))
    ));
    // Padded input gets past base64 and fails as an image instead
    assert!(matches!(
        decode_data_uri("data:,QUJDRA==", 1024),
        Err(ImageError::UnsupportedFormat)
    ));
}
