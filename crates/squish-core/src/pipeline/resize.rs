//! Bounded resizing that preserves aspect ratio.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

/// Compute output dimensions whose longest edge is at most `max_dimension`.
///
/// Inputs that already fit are returned unchanged. Otherwise both sides are
/// scaled by `max_dimension / max(width, height)` and rounded, never below 1.
pub fn fit_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    if width <= max_dimension && height <= max_dimension {
        return (width, height);
    }

    let scale = max_dimension as f64 / width.max(height) as f64;
    let scaled = |side: u32| ((side as f64 * scale).round() as u32).clamp(1, max_dimension);
    (scaled(width), scaled(height))
}

/// Resize an image so that it fits inside `max_dimension`.
///
/// Returns the input untouched when no scaling is needed.
pub fn resize_to_fit(image: DynamicImage, max_dimension: u32, filter: FilterType) -> DynamicImage {
    let (width, height) = image.dimensions();
    let (new_width, new_height) = fit_dimensions(width, height, max_dimension);
    if (new_width, new_height) == (width, height) {
        return image;
    }

    tracing::trace!(
        "Resizing {}x{} -> {}x{}",
        width,
        height,
        new_width,
        new_height
    );
    image.resize_exact(new_width, new_height, filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landscape_scaled_to_max() {
        assert_eq!(fit_dimensions(3000, 2000, 1920), (1920, 1280));
    }

    #[test]
    fn test_portrait_scaled_to_max() {
        assert_eq!(fit_dimensions(2000, 3000, 1920), (1280, 1920));
    }

    #[test]
    fn test_small_image_unchanged() {
        assert_eq!(fit_dimensions(800, 600, 1920), (800, 600));
        assert_eq!(fit_dimensions(1920, 1920, 1920), (1920, 1920));
    }

    #[test]
    fn test_one_side_over_limit() {
        assert_eq!(fit_dimensions(1921, 10, 1920), (1920, 10));
    }

    #[test]
    fn test_extreme_aspect_never_zero() {
        let (w, h) = fit_dimensions(100_000, 1, 1000);
        assert_eq!(w, 1000);
        assert_eq!(h, 1);
    }

    #[test]
    fn test_bounds_and_aspect_ratio_hold_across_inputs() {
        let sizes = [1u32, 7, 99, 640, 1080, 1919, 1920, 1921, 2500, 4032, 12_000];
        for &max in &[16u32, 256, 1000, 1920] {
            for &w in &sizes {
                for &h in &sizes {
                    let (ow, oh) = fit_dimensions(w, h, max);
                    assert!(ow <= max && oh <= max, "{w}x{h} max {max} -> {ow}x{oh}");
                    if w <= max && h <= max {
                        assert_eq!((ow, oh), (w, h));
                        continue;
                    }
                    // Rounding each side moves it by at most half a pixel.
                    let expected = w as f64 / h as f64;
                    let lo = (ow as f64 - 0.5).max(0.5) / (oh as f64 + 0.5);
                    let hi = (ow as f64 + 0.5) / (oh as f64 - 0.5).max(0.5);
                    let long_edge_exact = ow == max || oh == max;
                    assert!(long_edge_exact, "{w}x{h} max {max} -> {ow}x{oh}");
                    if ow > 1 && oh > 1 {
                        assert!(
                            expected >= lo - 1e-9 && expected <= hi + 1e-9,
                            "{w}x{h} max {max} -> {ow}x{oh}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_resize_to_fit_scales_image() {
        let img = DynamicImage::new_rgb8(300, 200);
        let resized = resize_to_fit(img, 150, FilterType::Triangle);
        assert_eq!(resized.dimensions(), (150, 100));
    }

    #[test]
    fn test_resize_to_fit_keeps_small_image() {
        let img = DynamicImage::new_rgba8(64, 32);
        let resized = resize_to_fit(img, 150, FilterType::Triangle);
        assert_eq!(resized.dimensions(), (64, 32));
    }
}
