use std::ops::Deref;

use super::error::GpuSurfaceCreateError;
use super::GpuContext;

#[derive(Debug, Clone)]
pub struct GpuSurfaceSpecification {
    pub width: u32,
    pub height: u32,
}

/// A configured window surface the scene is presented to.
#[derive(Debug)]
pub struct RenderTarget<'a> {
    pub surface: wgpu::Surface<'a>,
    pub config: wgpu::SurfaceConfiguration,
}

impl<'a> Deref for RenderTarget<'a> {
    type Target = wgpu::Surface<'a>;

    fn deref(&self) -> &Self::Target {
        &self.surface
    }
}

impl<'a> RenderTarget<'a> {
    pub(super) fn new(surface: wgpu::Surface<'a>, config: wgpu::SurfaceConfiguration) -> Self {
        Self { surface, config }
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn width(&self) -> u32 {
        self.config.width
    }

    pub fn height(&self) -> u32 {
        self.config.height
    }

    pub fn reconfigure(&self, gpu: &GpuContext) {
        self.surface.configure(&gpu.device, &self.config);
    }

    pub fn resize(&mut self, gpu: &GpuContext, new_width: u32, new_height: u32) {
        let new_width = new_width.max(1);
        let new_height = new_height.max(1);

        if self.config.width == new_width && self.config.height == new_height {
            return;
        }

        self.config.width = new_width;
        self.config.height = new_height;

        self.surface.configure(&gpu.device, &self.config);

        log::trace!(
            "Surface target resize: width = {} height = {}",
            self.config.width,
            self.config.height
        );
    }
}

/// Prefers an alpha mode that lets the transparent clear color through.
pub(crate) fn pick_alpha_mode(modes: &[wgpu::CompositeAlphaMode]) -> wgpu::CompositeAlphaMode {
    [
        wgpu::CompositeAlphaMode::PreMultiplied,
        wgpu::CompositeAlphaMode::PostMultiplied,
    ]
    .into_iter()
    .find(|mode| modes.contains(mode))
    .or_else(|| modes.first().copied())
    .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

pub(crate) fn pick_format(formats: &[wgpu::TextureFormat]) -> wgpu::TextureFormat {
    formats
        .iter()
        .find(|f| f.is_srgb())
        .or_else(|| formats.first())
        .copied()
        .unwrap_or(wgpu::TextureFormat::Rgba8UnormSrgb)
}

impl GpuContext {
    pub fn create_surface<'surface>(
        &self,
        screen: impl Into<wgpu::SurfaceTarget<'surface>>,
        specs: &GpuSurfaceSpecification,
    ) -> Result<RenderTarget<'surface>, GpuSurfaceCreateError> {
        let width = specs.width.max(1);
        let height = specs.height.max(1);

        let surface = self
            .instance
            .create_surface(screen)
            .map_err(GpuSurfaceCreateError)?;

        let capabilities = surface.get_capabilities(&self.adapter);

        let format = pick_format(&capabilities.formats);
        let alpha_mode = pick_alpha_mode(&capabilities.alpha_modes);

        log::info!("Surface format = {format:?} alpha = {alpha_mode:?}");

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: capabilities
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&self.device, &surface_config);

        Ok(RenderTarget::new(surface, surface_config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_srgb_format() {
        let formats = [
            wgpu::TextureFormat::Bgra8Unorm,
            wgpu::TextureFormat::Bgra8UnormSrgb,
        ];
        assert_eq!(pick_format(&formats), wgpu::TextureFormat::Bgra8UnormSrgb);
        assert_eq!(
            pick_format(&[wgpu::TextureFormat::Rgba8Unorm]),
            wgpu::TextureFormat::Rgba8Unorm
        );
    }

    #[test]
    fn prefers_premultiplied_alpha() {
        let modes = [
            wgpu::CompositeAlphaMode::Opaque,
            wgpu::CompositeAlphaMode::PreMultiplied,
        ];
        assert_eq!(
            pick_alpha_mode(&modes),
            wgpu::CompositeAlphaMode::PreMultiplied
        );
        assert_eq!(
            pick_alpha_mode(&[wgpu::CompositeAlphaMode::Opaque]),
            wgpu::CompositeAlphaMode::Opaque
        );
        assert_eq!(pick_alpha_mode(&[]), wgpu::CompositeAlphaMode::Auto);
    }
}
