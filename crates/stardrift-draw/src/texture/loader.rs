use std::path::{Path, PathBuf};

use image::{DynamicImage, Rgba, RgbaImage};
use thiserror::Error;

use super::{Texture, TextureOptions};

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("asset `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("asset `{path}`: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("asset `{path}`: unsupported format ({reason})")]
    UnsupportedFormat { path: PathBuf, reason: String },
}

pub(crate) fn open_image(path: &Path) -> Result<DynamicImage, AssetError> {
    let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let format = image::ImageFormat::from_path(path)
        .or_else(|_| image::guess_format(&bytes))
        .map_err(|err| AssetError::UnsupportedFormat {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

    image::load_from_memory_with_format(&bytes, format).map_err(|source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads 8-bit textures relative to an asset directory.
#[derive(Debug, Clone)]
pub struct TextureLoader {
    base: PathBuf,
}

impl TextureLoader {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.base.join(relative)
    }

    pub fn load(
        &self,
        relative: impl AsRef<Path>,
        srgb: bool,
        options: TextureOptions,
    ) -> Result<Texture, AssetError> {
        let path = self.resolve(relative);
        let image = open_image(&path)?.into_rgba8();

        log::info!(
            "Loaded texture {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );

        Ok(Texture::from_image(image, srgb, options))
    }

    /// Like [`TextureLoader::load`], falling back to `fallback` with a warning.
    pub fn load_or_else(
        &self,
        relative: impl AsRef<Path>,
        srgb: bool,
        options: TextureOptions,
        fallback: impl FnOnce() -> Texture,
    ) -> Texture {
        match self.load(relative, srgb, options) {
            Ok(texture) => texture,
            Err(err) => {
                log::warn!("{err}; using fallback texture");
                fallback()
            }
        }
    }

    /// White disc fading out towards the rim, usable as a sprite alpha map.
    pub fn disc_alpha_map(size: u32) -> Texture {
        let size = size.max(2);
        let center = size as f32 / 2.0;

        let image = RgbaImage::from_fn(size, size, |x, y| {
            let dx = (x as f32 + 0.5 - center) / center;
            let dy = (y as f32 + 0.5 - center) / center;
            let falloff = (1.0 - (dx * dx + dy * dy).sqrt()).clamp(0.0, 1.0);
            let value = ((falloff * 2.0).min(1.0) * 255.0).round() as u8;
            Rgba([value, value, value, 255])
        });

        Texture::from_image(image, false, TextureOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_texture_falls_back() {
        let loader = TextureLoader::new("does/not/exist");
        let texture = loader.load_or_else("alphaMap.png", false, TextureOptions::default(), || {
            Texture::solid([1, 2, 3, 4], false)
        });
        assert_eq!(texture.data.levels()[0], vec![1, 2, 3, 4]);
    }

    #[test]
    fn missing_texture_reports_path() {
        let loader = TextureLoader::new("assets");
        let err = loader
            .load("nope.png", false, TextureOptions::default())
            .unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
        assert!(err.to_string().contains("nope.png"));
    }

    #[test]
    fn decodes_png_bytes() {
        let dir = std::env::temp_dir().join(format!("stardrift-loader-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let image = RgbaImage::from_pixel(4, 2, Rgba([10, 20, 30, 255]));
        image.save(dir.join("tiny.png")).unwrap();

        let texture = TextureLoader::new(&dir)
            .load("tiny.png", true, TextureOptions::default())
            .unwrap();
        assert_eq!(texture.size().width, 4);
        assert_eq!(texture.size().height, 2);
        assert_eq!(texture.data.format(), wgpu::TextureFormat::Rgba8UnormSrgb);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let dir = std::env::temp_dir().join(format!("stardrift-garbage-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("broken.png"), b"definitely not a png").unwrap();

        let err = TextureLoader::new(&dir)
            .load("broken.png", false, TextureOptions::default())
            .unwrap_err();
        assert!(matches!(err, AssetError::Decode { .. }));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn disc_is_opaque_in_the_middle() {
        let texture = TextureLoader::disc_alpha_map(16);
        let level = &texture.data.levels()[0];

        let center = ((8 * 16 + 8) * 4) as usize;
        assert_eq!(level[center], 255);
        assert_eq!(level[0], 0);
    }
}
