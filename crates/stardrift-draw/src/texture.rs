mod flakes;
mod hdr;
mod loader;

pub use flakes::FlakesTexture;
pub use hdr::{pack_rgb9e5, unpack_rgb9e5, HdrEnvironment};
pub use loader::{AssetError, TextureLoader};

use crate::math::{Size, Vec2};

slotmap::new_key_type! {
    pub struct TextureId;
}

pub type TextureAddressMode = wgpu::AddressMode;
pub type TextureFilterMode = wgpu::FilterMode;

#[derive(Debug, Clone)]
pub struct TextureOptions {
    pub address_mode_u: TextureAddressMode,
    pub address_mode_v: TextureAddressMode,
    pub mag_filter: TextureFilterMode,
    pub min_filter: TextureFilterMode,
    pub mipmap_filter: TextureFilterMode,
    /// UV multiplier applied by materials sampling this texture.
    pub repeat: Vec2,
}

impl Default for TextureOptions {
    fn default() -> Self {
        Self {
            address_mode_u: TextureAddressMode::ClampToEdge,
            address_mode_v: TextureAddressMode::ClampToEdge,
            mag_filter: TextureFilterMode::Linear,
            min_filter: TextureFilterMode::Linear,
            mipmap_filter: TextureFilterMode::Linear,
            repeat: Vec2::ONE,
        }
    }
}

impl TextureOptions {
    pub fn mag_filter(mut self, mode: TextureFilterMode) -> Self {
        self.mag_filter = mode;
        self
    }

    pub fn min_filter(mut self, mode: TextureFilterMode) -> Self {
        self.min_filter = mode;
        self
    }

    pub fn address_mode_u(mut self, mode: TextureAddressMode) -> Self {
        self.address_mode_u = mode;
        self
    }

    pub fn address_mode_v(mut self, mode: TextureAddressMode) -> Self {
        self.address_mode_v = mode;
        self
    }

    pub fn wrap_repeat(self) -> Self {
        self.address_mode_u(TextureAddressMode::Repeat)
            .address_mode_v(TextureAddressMode::Repeat)
    }

    pub fn repeat(mut self, x: f32, y: f32) -> Self {
        self.repeat = Vec2::new(x, y);
        self
    }
}

#[derive(Debug, Clone)]
pub enum TextureData {
    /// 8-bit RGBA, `levels[0]` full size.
    Rgba8 {
        size: Size<u32>,
        levels: Vec<Vec<u8>>,
        srgb: bool,
    },
    /// Shared-exponent HDR texels, `levels[0]` full size.
    Rgb9e5 {
        size: Size<u32>,
        levels: Vec<Vec<u8>>,
    },
}

impl TextureData {
    pub fn size(&self) -> Size<u32> {
        match self {
            Self::Rgba8 { size, .. } | Self::Rgb9e5 { size, .. } => *size,
        }
    }

    pub fn levels(&self) -> &[Vec<u8>] {
        match self {
            Self::Rgba8 { levels, .. } | Self::Rgb9e5 { levels, .. } => levels,
        }
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        match self {
            Self::Rgba8 { srgb: true, .. } => wgpu::TextureFormat::Rgba8UnormSrgb,
            Self::Rgba8 { srgb: false, .. } => wgpu::TextureFormat::Rgba8Unorm,
            Self::Rgb9e5 { .. } => wgpu::TextureFormat::Rgb9e5Ufloat,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Texture {
    pub data: TextureData,
    pub options: TextureOptions,
}

impl Texture {
    /// Wraps an 8-bit image and builds its mip chain.
    pub fn from_image(image: image::RgbaImage, srgb: bool, options: TextureOptions) -> Self {
        let size = Size::new(image.width(), image.height());
        let levels = rgba8_mip_chain(size, image.into_raw());
        Self {
            data: TextureData::Rgba8 {
                size,
                levels,
                srgb,
            },
            options,
        }
    }

    pub fn solid(rgba: [u8; 4], srgb: bool) -> Self {
        Self {
            data: TextureData::Rgba8 {
                size: Size::new(1, 1),
                levels: vec![rgba.to_vec()],
                srgb,
            },
            options: TextureOptions::default(),
        }
    }

    pub fn size(&self) -> Size<u32> {
        self.data.size()
    }

    pub fn mip_level_count(&self) -> u32 {
        self.data.levels().len() as u32
    }
}

pub(crate) fn mip_size(size: Size<u32>, level: usize) -> Size<u32> {
    Size::new((size.width >> level).max(1), (size.height >> level).max(1))
}

/// Box-filtered mip chain down to 1x1.
fn rgba8_mip_chain(size: Size<u32>, base: Vec<u8>) -> Vec<Vec<u8>> {
    let mut levels = vec![base];
    let mut current = size;

    while current.width > 1 || current.height > 1 {
        let next = Size::new((current.width / 2).max(1), (current.height / 2).max(1));
        let Some(src) = levels.last() else {
            break;
        };
        let mut dst = Vec::with_capacity((next.width * next.height * 4) as usize);

        for y in 0..next.height {
            for x in 0..next.width {
                let mut sum = [0u32; 4];
                for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                    let sx = (x * 2 + dx).min(current.width - 1);
                    let sy = (y * 2 + dy).min(current.height - 1);
                    let offset = ((sy * current.width + sx) * 4) as usize;
                    for (channel, total) in sum.iter_mut().enumerate() {
                        *total += src[offset + channel] as u32;
                    }
                }
                dst.extend(sum.map(|total| ((total + 2) / 4) as u8));
            }
        }

        levels.push(dst);
        current = next;
    }

    levels
}
