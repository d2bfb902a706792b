use std::path::{Path, PathBuf};

use super::{loader::AssetError, mip_size, Texture, TextureData, TextureOptions};
use crate::math::Size;

const RGB9E5_MANTISSA_BITS: i32 = 9;
const RGB9E5_EXP_BIAS: i32 = 15;
const RGB9E5_MAX_EXP: i32 = 31;

/// Largest value representable in rgb9e5.
const RGB9E5_MAX: f32 = ((1 << RGB9E5_MANTISSA_BITS) - 1) as f32
    / (1 << RGB9E5_MANTISSA_BITS) as f32
    * (1u32 << (RGB9E5_MAX_EXP - RGB9E5_EXP_BIAS)) as f32;

pub fn pack_rgb9e5(rgb: [f32; 3]) -> u32 {
    let [r, g, b] = rgb.map(|c| if c.is_nan() { 0.0 } else { c.clamp(0.0, RGB9E5_MAX) });
    let max = r.max(g).max(b);

    let mut exp_shared =
        max.log2().floor().max((-RGB9E5_EXP_BIAS - 1) as f32) as i32 + 1 + RGB9E5_EXP_BIAS;
    let mut denom = 2f32.powi(exp_shared - RGB9E5_EXP_BIAS - RGB9E5_MANTISSA_BITS);

    let max_mantissa = (max / denom + 0.5).floor() as i32;
    if max_mantissa == 1 << RGB9E5_MANTISSA_BITS {
        denom *= 2.0;
        exp_shared += 1;
    }

    let mantissa = |c: f32| ((c / denom + 0.5).floor() as u32).min(511);

    mantissa(r) | (mantissa(g) << 9) | (mantissa(b) << 18) | ((exp_shared as u32) << 27)
}

pub fn unpack_rgb9e5(packed: u32) -> [f32; 3] {
    let exp = (packed >> 27) as i32 - RGB9E5_EXP_BIAS - RGB9E5_MANTISSA_BITS;
    let scale = 2f32.powi(exp);
    [
        (packed & 0x1ff) as f32 * scale,
        ((packed >> 9) & 0x1ff) as f32 * scale,
        ((packed >> 18) & 0x1ff) as f32 * scale,
    ]
}

/// Equirectangular radiance map with a prefiltered mip chain.
#[derive(Debug, Clone)]
pub struct HdrEnvironment {
    pub size: Size<u32>,
    /// Linear RGB texels per mip level, level 0 full size.
    pub levels: Vec<Vec<[f32; 3]>>,
}

impl HdrEnvironment {
    /// Reads a Radiance `.hdr` (or any float image `image` understands).
    /// Levels wider than `max_dimension` are dropped.
    pub fn load(path: impl AsRef<Path>, max_dimension: u32) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let image = super::loader::open_image(path)?;

        let rgb = image.into_rgb32f();
        let size = Size::new(rgb.width(), rgb.height());
        let texels = rgb.pixels().map(|p| p.0).collect();

        log::info!(
            "Loaded environment {} ({}x{})",
            path.display(),
            size.width,
            size.height
        );

        Ok(Self::from_texels(size, texels).limit(max_dimension))
    }

    /// Loads and packs on a worker thread. A failed load logs a warning and
    /// delivers the procedural fallback instead, so the receiver always gets
    /// a texture ready for upload.
    pub fn load_async(path: PathBuf, max_dimension: u32) -> flume::Receiver<Texture> {
        let (tx, rx) = flume::bounded(1);

        let spawned = std::thread::Builder::new()
            .name("hdr-loader".into())
            .spawn(move || {
                let environment = Self::load(&path, max_dimension).unwrap_or_else(|err| {
                    log::warn!("{err}; using procedural environment");
                    Self::procedural()
                });

                if tx.send(environment.into_texture()).is_err() {
                    log::trace!("environment receiver dropped before load finished");
                }
            });

        if let Err(err) = spawned {
            log::error!("unable to spawn hdr loader: {err}");
        }

        rx
    }

    /// Soft studio-like gradient with a bright overhead panel.
    pub fn procedural() -> Self {
        let size = Size::new(256, 128);
        let mut texels = Vec::with_capacity((size.width * size.height) as usize);

        for y in 0..size.height {
            let v = (y as f32 + 0.5) / size.height as f32;
            let elevation = 0.5 - v;

            for x in 0..size.width {
                let u = (x as f32 + 0.5) / size.width as f32;

                let sky = [0.55, 0.62, 0.75].map(|c| c * (0.6 + elevation.max(0.0) * 1.6));
                let ground = [0.12, 0.11, 0.10].map(|c| c * (1.0 + elevation.min(0.0)));
                let mut texel = if elevation >= 0.0 { sky } else { ground };

                let panel = (elevation > 0.3) && ((u * 4.0).fract() - 0.5).abs() < 0.2;
                if panel {
                    texel = [6.0, 6.0, 5.6];
                }

                texels.push(texel);
            }
        }

        Self::from_texels(size, texels)
    }

    pub fn from_texels(size: Size<u32>, texels: Vec<[f32; 3]>) -> Self {
        let mut levels = vec![texels];
        let mut level = 0;

        loop {
            let current = mip_size(size, level);
            if current.width == 1 && current.height == 1 {
                break;
            }
            let next = mip_size(size, level + 1);

            let Some(src) = levels.last() else {
                break;
            };
            let mut dst = Vec::with_capacity((next.width * next.height) as usize);

            for y in 0..next.height {
                for x in 0..next.width {
                    let mut sum = [0.0f32; 3];
                    for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                        let sx = (x * 2 + dx).min(current.width - 1);
                        let sy = (y * 2 + dy).min(current.height - 1);
                        let texel = src[(sy * current.width + sx) as usize];
                        for (total, value) in sum.iter_mut().zip(texel) {
                            *total += value;
                        }
                    }
                    dst.push(sum.map(|total| total * 0.25));
                }
            }

            levels.push(dst);
            level += 1;
        }

        Self { size, levels }
    }

    fn limit(mut self, max_dimension: u32) -> Self {
        let max_dimension = max_dimension.max(1);
        let mut dropped = 0;

        while self.levels.len() > 1 && self.size.width.max(self.size.height) > max_dimension {
            self.levels.remove(0);
            self.size = mip_size(self.size, 1);
            dropped += 1;
        }

        if dropped > 0 {
            log::info!(
                "Environment downscaled by {dropped} levels to {}x{}",
                self.size.width,
                self.size.height
            );
        }

        self
    }

    pub fn max_lod(&self) -> f32 {
        self.levels.len().saturating_sub(1) as f32
    }

    pub fn into_texture(self) -> Texture {
        let levels = self
            .levels
            .iter()
            .map(|level| {
                level
                    .iter()
                    .flat_map(|texel| pack_rgb9e5(*texel).to_le_bytes())
                    .collect()
            })
            .collect();

        Texture {
            data: TextureData::Rgb9e5 {
                size: self.size,
                levels,
            },
            options: TextureOptions::default()
                .address_mode_u(wgpu::AddressMode::Repeat)
                .address_mode_v(wgpu::AddressMode::ClampToEdge),
        }
    }
}
