//! Alpha flattening onto an opaque white background.

use image::{DynamicImage, RgbImage};

/// Composite an image over opaque white and drop the alpha channel.
///
/// Images without alpha are returned as-is.
pub fn flatten_onto_white(image: DynamicImage) -> DynamicImage {
    if !image.color().has_alpha() {
        return image;
    }

    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut out = RgbImage::new(width, height);
    for (src, dst) in rgba.pixels().zip(out.pixels_mut()) {
        let [r, g, b, a] = src.0;
        let blend = |c: u8| -> u8 {
            let a = a as u32;
            ((c as u32 * a + 255 * (255 - a) + 127) / 255) as u8
        };
        dst.0 = [blend(r), blend(g), blend(b)];
    }
    DynamicImage::ImageRgb8(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_transparent_becomes_white() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0])));
        let flat = flatten_onto_white(img);
        assert!(!flat.color().has_alpha());
        assert!(flat.to_rgb8().pixels().all(|p| p.0 == [255, 255, 255]));
    }

    #[test]
    fn test_opaque_pixels_unchanged() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([10, 200, 30, 255])));
        let flat = flatten_onto_white(img);
        assert!(flat.to_rgb8().pixels().all(|p| p.0 == [10, 200, 30]));
    }

    #[test]
    fn test_half_transparent_blends() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 128])));
        let flat = flatten_onto_white(img).to_rgb8();
        // 255 * 127 / 255 = 127
        assert_eq!(flat.get_pixel(0, 0).0, [127, 127, 127]);
    }

    #[test]
    fn test_rgb_passthrough() {
        let img = DynamicImage::new_rgb8(3, 3);
        let flat = flatten_onto_white(img);
        assert!(flat.to_rgb8().pixels().all(|p| p.0 == [0, 0, 0]));
    }
}
