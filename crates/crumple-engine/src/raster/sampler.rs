use image::RgbaImage;

use crate::coords::space::shader_to_edit;
use crate::coords::{ColorRgba, Vec2};

/// Bilinear sample of `image` at shader-space `uv`.
///
/// Texel centers sit at half-integer positions and lookups clamp to the edge
/// texel, so `uv` anywhere in the closed unit square is well defined. The image's
/// row 0 is its top row; shader `v = 1` is the top of the image.
pub fn sample_bilinear(image: &RgbaImage, uv: Vec2) -> ColorRgba {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return ColorRgba::black();
    }

    let edit = shader_to_edit(uv);
    let fx = edit.x * w as f32 - 0.5;
    let fy = edit.y * h as f32 - 0.5;

    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = fx - x0;
    let ty = fy - y0;

    let texel = |x: f32, y: f32| -> ColorRgba {
        let xi = (x as i64).clamp(0, w as i64 - 1) as u32;
        let yi = (y as i64).clamp(0, h as i64 - 1) as u32;
        ColorRgba::from_rgba8(image.get_pixel(xi, yi).0)
    };

    let top = texel(x0, y0).lerp(texel(x0 + 1.0, y0), tx);
    let bottom = texel(x0, y0 + 1.0).lerp(texel(x0 + 1.0, y0 + 1.0), tx);
    top.lerp(bottom, ty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn two_by_one() -> RgbaImage {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([200, 100, 50, 255]));
        img
    }

    #[test]
    fn texel_centers_are_exact() {
        let img = two_by_one();
        assert_eq!(sample_bilinear(&img, Vec2::new(0.25, 0.5)).to_rgba8(), [0, 0, 0, 255]);
        assert_eq!(sample_bilinear(&img, Vec2::new(0.75, 0.5)).to_rgba8(), [200, 100, 50, 255]);
    }

    #[test]
    fn midpoint_blends_neighbours() {
        let img = two_by_one();
        assert_eq!(sample_bilinear(&img, Vec2::new(0.5, 0.5)).to_rgba8(), [100, 50, 25, 255]);
    }

    #[test]
    fn edges_clamp_to_border_texel() {
        let img = two_by_one();
        assert_eq!(sample_bilinear(&img, Vec2::new(0.0, 0.0)).to_rgba8(), [0, 0, 0, 255]);
        assert_eq!(sample_bilinear(&img, Vec2::new(1.0, 1.0)).to_rgba8(), [200, 100, 50, 255]);
    }

    #[test]
    fn shader_top_reads_image_top_row() {
        let mut img = RgbaImage::new(1, 2);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(0, 1, Rgba([0, 0, 255, 255]));
        assert_eq!(sample_bilinear(&img, Vec2::new(0.5, 0.75)).to_rgba8(), [255, 0, 0, 255]);
        assert_eq!(sample_bilinear(&img, Vec2::new(0.5, 0.25)).to_rgba8(), [0, 0, 255, 255]);
    }
}
