use stardrift_draw::{Color, Hsv, OverlayList, Rect, Size, Vec2};

const PANEL_WIDTH: f32 = 245.0;
const PANEL_MARGIN: f32 = 15.0;
const PADDING: f32 = 6.0;
const SWATCH_HEIGHT: f32 = 20.0;
const PICKER_HEIGHT: f32 = 100.0;
const HUE_WIDTH: f32 = 15.0;

const BACKGROUND: Color = Color::from_rgb(0x1a1a1a);
const BORDER: Color = Color::from_rgb(0x2c2c2c);

const HUE_STOPS: [f32; 7] = [0.0, 60.0, 120.0, 180.0, 240.0, 300.0, 360.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragTarget {
    Saturation,
    Hue,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PanelLayout {
    panel: Rect,
    swatch: Rect,
    saturation: Rect,
    hue: Rect,
}

impl PanelLayout {
    /// Anchored to the top right corner of a `viewport` in logical pixels.
    fn new(viewport: Size<f32>) -> Self {
        let height = PADDING * 3.0 + SWATCH_HEIGHT + PICKER_HEIGHT;
        let x = (viewport.width - PANEL_WIDTH - PANEL_MARGIN).max(0.0);
        let panel = Rect::xywh(x, 0.0, PANEL_WIDTH, height);

        let inner = panel.inset(PADDING);
        let swatch = Rect::xywh(inner.x(), inner.y(), inner.width(), SWATCH_HEIGHT);

        let picker_y = swatch.max().y + PADDING;
        let saturation = Rect::xywh(
            inner.x(),
            picker_y,
            inner.width() - HUE_WIDTH - PADDING,
            PICKER_HEIGHT,
        );
        let hue = Rect::xywh(
            saturation.max().x + PADDING,
            picker_y,
            HUE_WIDTH,
            PICKER_HEIGHT,
        );

        Self {
            panel,
            swatch,
            saturation,
            hue,
        }
    }
}

/// What a pointer event did to the panel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanelResponse {
    /// The panel consumed the event, the orbit controls must not see it.
    pub captured: bool,
    /// The picked color changed to this value.
    pub changed: Option<Color>,
}

/// A single color control: swatch, saturation/value square and hue strip.
#[derive(Debug, Clone)]
pub struct ColorPanel {
    visible: bool,
    color: Color,
    hsv: Hsv,
    layout: PanelLayout,
    drag: Option<DragTarget>,
}

impl ColorPanel {
    pub fn new(color: Color, viewport: Size<f32>) -> Self {
        Self {
            visible: true,
            color,
            hsv: color.into(),
            layout: PanelLayout::new(viewport),
            drag: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if !visible {
            self.drag = None;
        }
    }

    pub fn toggle(&mut self) {
        self.set_visible(!self.visible);
    }

    pub fn resize(&mut self, viewport: Size<f32>) {
        self.layout = PanelLayout::new(viewport);
    }

    /// Re-reads the bound value. Ignored mid-drag so the drag owns the color.
    pub fn listen(&mut self, color: Color) {
        if self.drag.is_some() || color == self.color {
            return;
        }

        self.color = color;
        let hsv = Hsv::from(color);
        // keep the hue marker where it was for grays
        self.hsv = if hsv.s == 0.0 {
            Hsv::new(self.hsv.h, hsv.s, hsv.v)
        } else {
            hsv
        };
    }

    /// Whether `position` lands on the visible panel.
    pub fn hit(&self, position: Vec2) -> bool {
        self.visible && self.layout.panel.contains(position)
    }

    pub fn pointer_down(&mut self, position: Vec2) -> PanelResponse {
        if !self.hit(position) {
            return PanelResponse::default();
        }

        self.drag = if self.layout.saturation.contains(position) {
            Some(DragTarget::Saturation)
        } else if self.layout.hue.contains(position) {
            Some(DragTarget::Hue)
        } else {
            None
        };

        PanelResponse {
            captured: true,
            changed: self.apply(position),
        }
    }

    pub fn pointer_moved(&mut self, position: Vec2) -> PanelResponse {
        if self.drag.is_none() {
            return PanelResponse::default();
        }

        PanelResponse {
            captured: true,
            changed: self.apply(position),
        }
    }

    pub fn pointer_up(&mut self) -> PanelResponse {
        PanelResponse {
            captured: self.drag.take().is_some(),
            changed: None,
        }
    }

    fn apply(&mut self, position: Vec2) -> Option<Color> {
        let hsv = match self.drag? {
            DragTarget::Saturation => {
                let p = self.layout.saturation.normalized_point(position);
                Hsv::new(self.hsv.h, p.x, 1.0 - p.y)
            }
            DragTarget::Hue => {
                let p = self.layout.hue.normalized_point(position);
                // stop short of 360 so the bottom edge stays red instead of wrapping the marker
                Hsv::new((p.y * 360.0).min(359.9), self.hsv.s, self.hsv.v)
            }
        };

        self.hsv = hsv;
        let color = Color::from(hsv);
        if color == self.color {
            return None;
        }

        self.color = color;
        log::debug!("panel color -> {}", color.to_style());
        Some(color)
    }

    pub fn draw(&self, list: &mut OverlayList) {
        if !self.visible {
            return;
        }

        let layout = &self.layout;
        list.rect(layout.panel, BACKGROUND);
        list.outline(layout.panel, 1.0, BORDER);

        list.rect(layout.swatch, self.color);
        list.outline(layout.swatch, 1.0, BORDER);

        let square = layout.saturation;
        list.horizontal_gradient(square, Color::WHITE, self.hsv.pure_hue());
        list.vertical_gradient(square, Color::TRANSPARENT, Color::BLACK);
        list.outline(square, 1.0, BORDER);

        let strip = layout.hue;
        let segment = strip.height() / (HUE_STOPS.len() - 1) as f32;
        for (i, pair) in HUE_STOPS.windows(2).enumerate() {
            let top: Color = Hsv::new(pair[0], 1.0, 1.0).into();
            let bottom: Color = Hsv::new(pair[1], 1.0, 1.0).into();
            let rect = Rect::xywh(strip.x(), strip.y() + segment * i as f32, strip.width(), segment);
            list.vertical_gradient(rect, top, bottom);
        }
        list.outline(strip, 1.0, BORDER);

        let marker = Vec2::new(
            square.x() + self.hsv.s * square.width(),
            square.y() + (1.0 - self.hsv.v) * square.height(),
        );
        let marker_color = if self.hsv.v > 0.5 {
            Color::BLACK
        } else {
            Color::WHITE
        };
        list.outline(Rect::xywh(marker.x - 4.0, marker.y - 4.0, 8.0, 8.0), 1.5, marker_color);

        let hue_y = strip.y() + self.hsv.h / 360.0 * strip.height();
        list.outline(
            Rect::xywh(strip.x() - 2.0, hue_y - 2.0, strip.width() + 4.0, 4.0),
            1.0,
            Color::WHITE,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> ColorPanel {
        ColorPanel::new(Color::from_rgb(0x0bcee9), Size::new(1280.0, 720.0))
    }

    #[test]
    fn anchored_top_right() {
        let panel = panel();
        let rect = panel.layout.panel;
        assert_eq!(rect.max().x, 1280.0 - PANEL_MARGIN);
        assert_eq!(rect.y(), 0.0);
        assert!(rect.contains(panel.layout.hue.origin));
        assert!(rect.contains(panel.layout.saturation.origin));
    }

    #[test]
    fn clicks_outside_are_not_captured() {
        let mut panel = panel();
        let response = panel.pointer_down(Vec2::new(10.0, 10.0));
        assert_eq!(response, PanelResponse::default());

        panel.set_visible(false);
        let inside = panel.layout.saturation.origin + Vec2::splat(5.0);
        assert!(!panel.pointer_down(inside).captured);
    }

    #[test]
    fn hit_follows_visibility() {
        let mut panel = panel();
        let inside = Vec2::new(1100.0, 50.0);
        assert!(panel.hit(inside));
        assert!(!panel.hit(Vec2::new(100.0, 50.0)));

        panel.toggle();
        assert!(!panel.hit(inside));
    }

    #[test]
    fn dragging_the_square_sets_saturation_and_value() {
        let mut panel = panel();
        let square = panel.layout.saturation;

        // top right corner: full saturation, full value
        let response = panel.pointer_down(Vec2::new(square.max().x - 0.01, square.y()));
        assert!(response.captured);
        let color = response.changed.unwrap();
        assert!((Hsv::from(color).s - 1.0).abs() < 0.01);
        assert_eq!(Hsv::from(color).v, 1.0);

        // dragging past the bottom clamps to black
        let response = panel.pointer_moved(Vec2::new(square.x(), square.max().y + 50.0));
        assert_eq!(response.changed, Some(Color::BLACK));

        assert!(panel.pointer_up().captured);
        assert!(!panel.pointer_moved(Vec2::ZERO).captured);
    }

    #[test]
    fn hue_strip_keeps_saturation_and_value() {
        let mut panel = ColorPanel::new(Color::RED, Size::new(800.0, 600.0));
        let strip = panel.layout.hue;

        let response = panel.pointer_down(Vec2::new(strip.x() + 1.0, strip.y() + strip.height() / 3.0));
        let hsv = Hsv::from(response.changed.unwrap());
        assert!((hsv.h - 120.0).abs() < 1.0);
        assert_eq!(hsv.s, 1.0);
        assert_eq!(hsv.v, 1.0);
    }

    #[test]
    fn listen_follows_the_bound_color_unless_dragging() {
        let mut panel = panel();
        panel.listen(Color::RED);
        assert_eq!(panel.color, Color::RED);

        let square = panel.layout.saturation;
        panel.pointer_down(square.origin + Vec2::splat(10.0));
        let picked = panel.color;
        panel.listen(Color::BLUE);
        assert_eq!(panel.color, picked);
    }

    #[test]
    fn hidden_panel_draws_nothing() {
        let mut panel = panel();
        let mut list = OverlayList::new();
        panel.draw(&mut list);
        assert!(!list.is_empty());

        panel.toggle();
        list.clear();
        panel.draw(&mut list);
        assert!(list.is_empty());
    }
}
