use std::io::Write;

use pollster::FutureExt;
use rand::{rngs::StdRng, SeedableRng};
use stardrift_draw::{
    app::{
        self, AppHandle, ElementState, Frame, KeyCode, LogicalSize, MouseButton, PhysicalSize,
        WindowAttributes,
    },
    Clock, OrbitButton, OrbitControls, OverlayList, Size, Vec2,
};

mod config;
mod panel;
mod tick;
mod world;

use config::SceneConfig;
use panel::{ColorPanel, PanelResponse};
use world::World;

struct Stardrift {
    config: SceneConfig,
    world: World,
    controls: OrbitControls,
    panel: Option<ColorPanel>,
    overlay: OverlayList,
    clock: Clock,
    rng: StdRng,

    cursor: Vec2,
    /// Physical pixels.
    viewport: Size<u32>,
    /// Logical pixels, the space cursor positions arrive in.
    logical: Size<f32>,
}

impl Stardrift {
    fn new(config: SceneConfig) -> anyhow::Result<Self> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let world = World::new(&config, &mut rng)?;

        Ok(Self {
            world,
            controls: OrbitControls::new(),
            panel: None,
            overlay: OverlayList::new(),
            clock: Clock::new(),
            rng,
            cursor: Vec2::ZERO,
            viewport: config.window,
            logical: config.window.to_f32(),
            config,
        })
    }

    fn logical_viewport(&self) -> Size<u32> {
        Size::new(self.logical.width as u32, self.logical.height as u32)
    }

    fn apply_panel(&mut self, response: PanelResponse) -> bool {
        if let Some(color) = response.changed {
            self.world.set_sphere_color(color);
        }
        response.captured
    }

    fn panel_response(&mut self, f: impl FnOnce(&mut ColorPanel) -> PanelResponse) -> bool {
        let response = self.panel.as_mut().map(f).unwrap_or_default();
        self.apply_panel(response)
    }

    fn resize_viewport(&mut self, physical: Size<u32>, scale_factor: f64) {
        self.viewport = Size::new(physical.width.max(1), physical.height.max(1));
        self.world
            .camera
            .set_aspect(self.viewport.width, self.viewport.height);

        let scale = scale_factor.max(f64::EPSILON) as f32;
        self.logical = Size::new(
            physical.width as f32 / scale,
            physical.height as f32 / scale,
        );

        if let Some(panel) = &mut self.panel {
            panel.resize(self.logical);
        }
    }

    /// Panel first, the orbit controls only see what it leaves alone.
    fn route_cursor(&mut self, position: Vec2) {
        self.cursor = position;

        if !self.panel_response(|panel| panel.pointer_moved(position)) {
            let viewport = self.logical_viewport();
            self.controls.pointer_moved(position, viewport);
        }
    }

    fn route_button(&mut self, button: MouseButton, state: ElementState) {
        let cursor = self.cursor;

        match state {
            ElementState::Pressed => {
                let orbit_button = match button {
                    MouseButton::Left => OrbitButton::Primary,
                    MouseButton::Right => OrbitButton::Secondary,
                    _ => return,
                };

                if !self.panel_response(|panel| panel.pointer_down(cursor)) {
                    self.controls.pointer_down(orbit_button);
                }
            }
            ElementState::Released => {
                self.panel_response(|panel| panel.pointer_up());
                self.controls.pointer_up();
            }
        }
    }

    fn route_wheel(&mut self, lines: f32) {
        let over_panel = self
            .panel
            .as_ref()
            .is_some_and(|panel| panel.hit(self.cursor));

        if !over_panel {
            self.controls.wheel(lines);
        }
    }
}

impl AppHandle for Stardrift {
    fn init(&mut self) -> WindowAttributes {
        WindowAttributes::default()
            .with_inner_size(LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ))
            .with_title("stardrift")
            .with_transparent(true)
    }

    fn sample_count(&self) -> u32 {
        self.config.sample_count
    }

    fn on_resize(&mut self, size: PhysicalSize<u32>, scale_factor: f64, _window: &app::Window) {
        self.resize_viewport(Size::new(size.width, size.height), scale_factor);
    }

    fn on_cursor_moved(&mut self, position: Vec2, _window: &app::Window) {
        self.route_cursor(position);
    }

    fn on_mouse_input(&mut self, button: MouseButton, state: ElementState, _window: &app::Window) {
        self.route_button(button, state);
    }

    fn on_mouse_wheel(&mut self, lines: f32, _window: &app::Window) {
        self.route_wheel(lines);
    }

    fn on_keydown(&mut self, keycode: KeyCode) {
        if keycode == KeyCode::KeyH {
            if let Some(panel) = &mut self.panel {
                panel.toggle();
                let state = if panel.is_visible() { "shown" } else { "hidden" };
                log::info!("Control panel {state}");
            }
        }
    }

    fn update(&mut self, _window: &app::Window) {
        if self.world.poll_environment(&mut self.rng) {
            if let Some(color) = self.world.sphere_color() {
                let mut panel = ColorPanel::new(color, self.logical);
                panel.set_visible(self.config.show_panel);
                self.panel = Some(panel);
            }
        }

        let ratio = tick::mouse_ratio(self.cursor.x, self.logical.width);
        let rotation = tick::group_rotation_y(self.clock.elapsed(), ratio);
        self.world.set_group_rotation(rotation);

        self.controls.update(&mut self.world.camera, self.viewport);

        if let (Some(panel), Some(color)) = (&mut self.panel, self.world.sphere_color()) {
            panel.listen(color);
        }
    }

    fn render(&mut self, frame: &mut Frame<'_>, _window: &app::Window) {
        frame.draw_scene(&self.world.scene, &self.world.camera, self.clock.elapsed());

        self.overlay.clear();
        if let Some(panel) = &self.panel {
            panel.draw(&mut self.overlay);
        }
        frame.draw_overlay(&self.overlay);
    }
}

fn main() -> anyhow::Result<()> {
    init_stdout_logger();

    let config = config::parse();
    log::info!("Starting stardrift with {config:?}");

    let mut app = Stardrift::new(config)?;
    app::launch(&mut app).block_on()
}

fn init_stdout_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format(|buf, record| {
            use env_logger::fmt::style::{AnsiColor, Style};

            let dimmed = Style::new().fg_color(Some(AnsiColor::BrightBlack.into()));

            write!(buf, "{dimmed}[{dimmed:#}")?;
            write!(
                buf,
                "{dimmed}{}{dimmed:#} ",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%:z")
            )?;

            let level_style = buf.default_level_style(record.level());
            write!(buf, "{level_style}{:<5}{level_style:#}", record.level())?;

            if let Some(path) = record.module_path() {
                write!(buf, "  {dimmed}{path}{dimmed:#}")?;
            }

            write!(buf, "{dimmed}]{dimmed:#}")?;
            writeln!(buf, " {}", record.args())
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stardrift() -> Stardrift {
        let config = SceneConfig {
            assets: "does/not/exist".into(),
            seed: Some(7),
            ..Default::default()
        };
        let mut app = Stardrift::new(config).unwrap();
        app.panel = Some(ColorPanel::new(world::SPHERE_COLOR, app.logical));
        app
    }

    fn drag(app: &mut Stardrift, from: Vec2, to: Vec2) {
        app.route_cursor(from);
        app.route_button(MouseButton::Left, ElementState::Pressed);
        app.route_cursor(to);
        app.route_button(MouseButton::Left, ElementState::Released);
    }

    fn settle(app: &mut Stardrift) -> bool {
        let viewport = app.viewport;
        app.controls.update(&mut app.world.camera, viewport)
    }

    #[test]
    fn drag_inside_panel_leaves_camera_alone() {
        let mut app = stardrift();
        let before = app.world.camera.position;

        drag(&mut app, Vec2::new(1100.0, 80.0), Vec2::new(1150.0, 120.0));

        assert!(!settle(&mut app));
        assert_eq!(app.world.camera.position, before);
    }

    #[test]
    fn drag_inside_picker_recolors_the_sphere() {
        let mut app = stardrift();
        // update() is not driven here, so the loader result is never polled
        let mut rng = StdRng::seed_from_u64(1);
        app.world.add_sphere(
            stardrift_draw::HdrEnvironment::procedural().into_texture(),
            &mut rng,
        );

        drag(&mut app, Vec2::new(1100.0, 80.0), Vec2::new(1060.0, 130.0));

        let color = app.world.sphere_color().unwrap();
        assert_ne!(color, world::SPHERE_COLOR);
    }

    #[test]
    fn drag_outside_panel_rotates_camera() {
        let mut app = stardrift();
        let before = app.world.camera.position;

        drag(&mut app, Vec2::new(200.0, 400.0), Vec2::new(260.0, 400.0));

        assert!(settle(&mut app));
        assert_ne!(app.world.camera.position, before);
    }

    #[test]
    fn wheel_over_panel_does_not_zoom() {
        let mut app = stardrift();
        let before = app.world.camera.position;

        app.route_cursor(Vec2::new(1100.0, 50.0));
        app.route_wheel(3.0);
        assert!(!settle(&mut app));
        assert_eq!(app.world.camera.position, before);

        app.route_cursor(Vec2::new(200.0, 400.0));
        app.route_wheel(3.0);
        assert!(settle(&mut app));
        assert!(app.world.camera.position.length() < before.length());
    }

    #[test]
    fn hidden_panel_lets_wheel_through() {
        let mut app = stardrift();
        app.on_keydown(KeyCode::KeyH);

        app.route_cursor(Vec2::new(1100.0, 50.0));
        app.route_wheel(1.0);
        assert!(settle(&mut app));
    }

    #[test]
    fn scale_factor_changes_update_logical_size() {
        let mut app = stardrift();
        app.resize_viewport(Size::new(2560, 1440), 2.0);
        assert_eq!(app.viewport, Size::new(2560, 1440));
        assert_eq!(app.logical, Size::new(1280.0, 720.0));

        app.resize_viewport(Size::new(2560, 1440), 1.0);
        assert_eq!(app.logical, Size::new(2560.0, 1440.0));
        assert!(app.panel.as_ref().unwrap().hit(Vec2::new(2400.0, 50.0)));
        assert!(!app.panel.as_ref().unwrap().hit(Vec2::new(1100.0, 50.0)));
    }
}
