//! Image encoding: `DynamicImage` → opaque RGB → PNG bytes.
//!
//! Output is always 3-channel 8-bit RGB. pdfium hands back RGBA; any
//! transparency is composited over white before the alpha channel is dropped.

use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;
use tracing::debug;

/// Flatten any colour type to 8-bit RGB, compositing alpha over white.
pub fn flatten_to_rgb(img: DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.into_rgb8();
    }

    let rgba = img.into_rgba8();
    let (width, height) = rgba.dimensions();
    RgbImage::from_fn(width, height, |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let a = u16::from(a);
        let over_white = |c: u8| ((u16::from(c) * a + 255 * (255 - a) + 127) / 255) as u8;
        image::Rgb([over_white(r), over_white(g), over_white(b)])
    })
}

/// Encode an RGB page as PNG with the encoder's default compression.
pub fn encode_png(img: RgbImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(img).write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    debug!("Encoded page → {} bytes PNG", buf.len());
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ColorType, Luma, Rgb, Rgba, RgbaImage};

    #[test]
    fn transparent_pixels_become_white() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 0])));
        let rgb = flatten_to_rgb(img);
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn opaque_pixels_are_unchanged() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([200, 0, 0, 255])));
        assert_eq!(flatten_to_rgb(img).get_pixel(0, 0), &Rgb([200, 0, 0]));
    }

    #[test]
    fn half_transparent_black_is_mid_grey() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 128])));
        let Rgb([r, g, b]) = *flatten_to_rgb(img).get_pixel(0, 0);
        assert_eq!((r, g, b), (127, 127, 127));
    }

    #[test]
    fn greyscale_is_expanded_to_rgb() {
        let img = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(3, 1, Luma([90])));
        let rgb = flatten_to_rgb(img);
        assert_eq!(rgb.dimensions(), (3, 1));
        assert_eq!(rgb.get_pixel(2, 0), &Rgb([90, 90, 90]));
    }

    #[test]
    fn encoded_png_decodes_as_rgb() {
        let img = flatten_to_rgb(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            10,
            4,
            Rgba([255, 0, 0, 64]),
        )));
        let bytes = encode_png(img).expect("encode should succeed");
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();
        assert_eq!(decoded.color(), ColorType::Rgb8);
        assert_eq!((decoded.width(), decoded.height()), (10, 4));
    }
}
