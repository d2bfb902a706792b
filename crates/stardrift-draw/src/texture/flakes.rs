use image::{Rgba, RgbaImage};
use rand::Rng;

use super::{Texture, TextureOptions};

const FLAT_NORMAL: Rgba<u8> = Rgba([127, 127, 255, 255]);
const FLAKE_COUNT: usize = 4000;

/// Tangent-space normal map of small randomly tilted discs, the "metallic
/// paint" look of the sphere.
pub struct FlakesTexture;

impl FlakesTexture {
    pub const DEFAULT_SIZE: u32 = 512;

    pub fn generate(width: u32, height: u32, rng: &mut impl Rng) -> RgbaImage {
        let mut canvas = RgbaImage::from_pixel(width, height, FLAT_NORMAL);

        if width == 0 || height == 0 {
            return canvas;
        }

        for _ in 0..FLAKE_COUNT {
            let x = rng.gen::<f32>() * width as f32;
            let y = rng.gen::<f32>() * height as f32;
            let r = rng.gen::<f32>() * 3.0 + 3.0;

            let nx = rng.gen::<f32>() * 2.0 - 1.0;
            let ny = rng.gen::<f32>() * 2.0 - 1.0;
            let nz = 1.5f32;
            let len = (nx * nx + ny * ny + nz * nz).sqrt();

            let color = Rgba([
                encode(nx / len * 127.0 + 127.0),
                encode(ny / len * 127.0 + 127.0),
                encode(nz / len * 255.0),
                255,
            ]);

            fill_disc(&mut canvas, x, y, r, color);
        }

        canvas
    }

    /// The generated map wrapped as a repeating normal texture.
    pub fn texture(rng: &mut impl Rng, repeat_x: f32, repeat_y: f32) -> Texture {
        let image = Self::generate(Self::DEFAULT_SIZE, Self::DEFAULT_SIZE, rng);
        Texture::from_image(
            image,
            false,
            TextureOptions::default()
                .wrap_repeat()
                .repeat(repeat_x, repeat_y),
        )
    }
}

#[inline]
fn encode(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

fn fill_disc(canvas: &mut RgbaImage, cx: f32, cy: f32, r: f32, color: Rgba<u8>) {
    let (width, height) = canvas.dimensions();

    let min_x = (cx - r).floor().max(0.0) as u32;
    let min_y = (cy - r).floor().max(0.0) as u32;
    let max_x = ((cx + r).ceil() as u32).min(width);
    let max_y = ((cy + r).ceil() as u32).min(height);

    let r2 = r * r;
    for y in min_y..max_y {
        for x in min_x..max_x {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            if dx * dx + dy * dy <= r2 {
                canvas.put_pixel(x, y, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn flakes_cover_a_flat_background() {
        let mut rng = StdRng::seed_from_u64(3);
        let image = FlakesTexture::generate(512, 512, &mut rng);

        assert_eq!(image.dimensions(), (512, 512));

        let flat = image.pixels().filter(|p| **p == FLAT_NORMAL).count();
        assert!(flat > 0, "some background should survive");
        assert!(flat < 512 * 512, "flakes should be drawn");
    }

    #[test]
    fn flake_normals_point_outwards() {
        let mut rng = StdRng::seed_from_u64(11);
        let image = FlakesTexture::generate(64, 64, &mut rng);

        // nz / len >= 1.5 / sqrt(1 + 1 + 2.25)
        assert!(image.pixels().all(|p| p[2] >= 185));
    }

    #[test]
    fn disc_is_clipped_to_canvas() {
        let mut canvas = RgbaImage::from_pixel(4, 4, FLAT_NORMAL);
        let red = Rgba([255, 0, 0, 255]);
        fill_disc(&mut canvas, 0.0, 0.0, 2.0, red);

        assert_eq!(*canvas.get_pixel(0, 0), red);
        assert_eq!(*canvas.get_pixel(3, 3), FLAT_NORMAL);
    }

    #[test]
    fn empty_canvas_is_fine() {
        let image = FlakesTexture::generate(0, 0, &mut StdRng::seed_from_u64(0));
        assert_eq!(image.dimensions(), (0, 0));
    }
}
