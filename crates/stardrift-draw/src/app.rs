use derive_more::derive::{Deref, DerefMut};
use std::sync::Arc;
pub use winit;
use winit::application::ApplicationHandler;
use winit::event::{KeyEvent, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::PhysicalKey;

pub use winit::dpi::{LogicalSize, PhysicalSize};
pub use winit::event::{ElementState, MouseButton};
pub use winit::keyboard::KeyCode;
pub use winit::window::{Window, WindowAttributes};

use crate::{
    camera::PerspectiveCamera,
    gpu::{
        surface::{GpuSurfaceSpecification, RenderTarget},
        CommandEncoder,
    },
    math::{Size, Vec2},
    overlay::{OverlayList, OverlayRenderer},
    renderer::{SceneRenderer, SceneRendererSpecs},
    scene::Scene,
    Color, GpuContext,
};

/// Pixels one wheel "line" stands for when the platform reports pixel deltas.
const PIXELS_PER_LINE: f32 = 100.0;

/// Renderers shared by every frame, dereferences to the scene renderer.
#[derive(Deref, DerefMut)]
pub struct DrawingContext {
    #[deref]
    #[deref_mut]
    scene: SceneRenderer,
    overlay: OverlayRenderer,
}

impl DrawingContext {
    fn resize(&mut self, physical: PhysicalSize<u32>, scale_factor: f64) {
        self.scene.resize(physical.width, physical.height);

        let logical = physical.to_logical::<f32>(scale_factor);
        self.overlay.resize(Size::new(logical.width, logical.height));
    }
}

/// One frame in flight: the surface view and the encoder recording into it.
pub struct Frame<'a> {
    cx: &'a mut DrawingContext,
    encoder: &'a mut CommandEncoder,
    view: &'a wgpu::TextureView,
}

impl Frame<'_> {
    /// Clears the target and draws the scene.
    pub fn draw_scene(&mut self, scene: &Scene, camera: &PerspectiveCamera, elapsed: f32) {
        self.cx
            .scene
            .render(scene, camera, self.encoder, self.view, elapsed);
    }

    /// Draws 2D shapes over what is already in the target.
    pub fn draw_overlay(&mut self, list: &OverlayList) {
        self.cx.overlay.render(list, self.encoder, self.view);
    }

    pub fn context(&mut self) -> &mut DrawingContext {
        self.cx
    }
}

pub trait AppHandle: 'static {
    fn init(&mut self) -> WindowAttributes;
    /// Requested MSAA sample count.
    fn sample_count(&self) -> u32 {
        4
    }
    fn clear_color(&self) -> Color {
        Color::TRANSPARENT
    }
    fn on_create_window(&mut self, _window: &Window) {}
    /// New physical size and the scale factor that maps it to logical pixels.
    fn on_resize(&mut self, _size: PhysicalSize<u32>, _scale_factor: f64, _window: &Window) {}
    /// Cursor position in logical pixels.
    fn on_cursor_moved(&mut self, _position: Vec2, _window: &Window) {}
    fn on_mouse_input(&mut self, _button: MouseButton, _state: ElementState, _window: &Window) {}
    /// Positive when scrolling away from the user, in lines.
    fn on_mouse_wheel(&mut self, _lines: f32, _window: &Window) {}
    fn on_keydown(&mut self, _keycode: KeyCode) {}
    fn on_keyup(&mut self, _keycode: KeyCode) {}
    fn update(&mut self, window: &Window);
    fn render(&mut self, frame: &mut Frame<'_>, window: &Window);
}

struct App<'a> {
    surface: Option<RenderTarget<'static>>,
    window: Option<Arc<Window>>,
    gpu: Arc<GpuContext>,
    cx: Option<DrawingContext>,
    app_handle: &'a mut dyn AppHandle,
}

impl<'a> App<'a> {
    async fn new(user_app: &'a mut dyn AppHandle) -> anyhow::Result<Self> {
        let gpu = Arc::new(GpuContext::new().await?);

        Ok(Self {
            surface: None,
            window: None,
            gpu,
            cx: None,
            app_handle: user_app,
        })
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attributes = self.app_handle.init();
        let window = Arc::new(event_loop.create_window(window_attributes)?);

        self.app_handle.on_create_window(&window);

        let size = window.inner_size();
        let surface = self.gpu.create_surface(
            window.clone(),
            &GpuSurfaceSpecification {
                width: size.width,
                height: size.height,
            },
        )?;

        let scene = SceneRenderer::new(
            self.gpu.clone(),
            &SceneRendererSpecs {
                width: surface.width(),
                height: surface.height(),
                format: surface.format(),
                sample_count: self.app_handle.sample_count(),
                clear_color: self.app_handle.clear_color(),
            },
        );

        let logical = size.to_logical::<f32>(window.scale_factor());
        let overlay = OverlayRenderer::new(
            self.gpu.clone(),
            surface.format(),
            Size::new(logical.width, logical.height),
        );

        log::info!(
            "Window created {}x{} ({:?}, msaa x{})",
            size.width,
            size.height,
            surface.format(),
            scene.sample_count()
        );

        self.app_handle
            .on_resize(size, window.scale_factor(), &window);
        self.surface = Some(surface);
        self.cx = Some(DrawingContext { scene, overlay });
        self.window = Some(window);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(surface), Some(cx)) =
            (&self.window, &mut self.surface, &mut self.cx)
        else {
            return;
        };

        let surface_texture = match surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                surface.reconfigure(&self.gpu);
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Surface out of memory, exiting");
                event_loop.exit();
                return;
            }
            Err(err) => {
                log::warn!("Skipping frame: {err}");
                return;
            }
        };

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.gpu.create_command_encoder(Some("stardrift frame encoder"));

        let mut frame = Frame {
            cx,
            encoder: &mut encoder,
            view: &view,
        };
        self.app_handle.render(&mut frame, window);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        window.pre_present_notify();
        surface_texture.present();
    }
}

pub async fn launch(handle: &mut dyn AppHandle) -> anyhow::Result<()> {
    let mut app = App::new(handle).await?;
    let event_loop = EventLoop::new()?;
    event_loop.run_app(&mut app)?;
    Ok(())
}

impl ApplicationHandler for App<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.create_window(event_loop) {
            log::error!("Failed to create window: {err:#}");
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            self.app_handle.update(window);
            window.request_redraw()
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            event_loop.exit();
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Window closed");
                self.cx = None;
                self.surface = None;
                self.window = None;
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(keycode),
                        state,
                        repeat: false,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => self.app_handle.on_keydown(keycode),
                ElementState::Released => self.app_handle.on_keyup(keycode),
            },
            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f32>(window.scale_factor());
                self.app_handle
                    .on_cursor_moved(Vec2::new(logical.x, logical.y), &window);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.app_handle.on_mouse_input(button, state, &window);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
                };
                self.app_handle.on_mouse_wheel(lines, &window);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            WindowEvent::Resized(size) => {
                if let Some(surface) = &mut self.surface {
                    surface.resize(&self.gpu, size.width, size.height);
                }
                if let Some(cx) = &mut self.cx {
                    cx.resize(size, window.scale_factor());
                }
                self.app_handle
                    .on_resize(size, window.scale_factor(), &window);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let size = window.inner_size();
                if let Some(cx) = &mut self.cx {
                    cx.resize(size, scale_factor);
                }
                self.app_handle.on_resize(size, scale_factor, &window);
            }
            _ => {}
        }
    }
}
