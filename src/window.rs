use egui::{Context, Pos2, Vec2, ViewportCommand};
use log::debug;

/// Position and size of the launch window, in points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowFrame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl WindowFrame {
    /// Largest frame with the given aspect ratio that fits the screen, centered.
    ///
    /// Height fills the screen first; if the resulting width overflows, width
    /// fills the screen instead.
    pub fn fit(screen: Vec2, aspect_ratio: f32) -> Self {
        let mut width = screen.y * aspect_ratio;
        let mut height = screen.y;

        if width > screen.x {
            width = screen.x;
            height = width / aspect_ratio;
        }

        Self {
            x: (screen.x - width) / 2.0,
            y: (screen.y - height) / 2.0,
            width,
            height,
        }
    }

    pub fn position(&self) -> Pos2 {
        Pos2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Client area left once the title bar and borders (`chrome`) are taken
    /// out of the frame.
    pub fn inner_size(&self, chrome: Vec2) -> Vec2 {
        (self.size() - chrome).max(Vec2::ZERO)
    }
}

/// Size of the window decorations, zero until the platform reports both rects.
fn decoration_size(ctx: &Context) -> Vec2 {
    ctx.input(|i| {
        let viewport = i.viewport();
        match (viewport.outer_rect, viewport.inner_rect) {
            (Some(outer), Some(inner)) => (outer.size() - inner.size()).max(Vec2::ZERO),
            _ => Vec2::ZERO,
        }
    })
}

/// Applies the launch frame once, as soon as the monitor size is known.
pub struct LaunchSizer {
    aspect_ratio: f32,
    applied: bool,
}

impl LaunchSizer {
    pub fn new(aspect_ratio: f32) -> Self {
        Self {
            aspect_ratio,
            applied: false,
        }
    }

    /// Call every frame; does nothing after the first successful run.
    pub fn apply(&mut self, ctx: &Context) {
        if self.applied {
            return;
        }

        // Monitor size is only reported after the window has been shown.
        let Some(screen) = ctx.input(|i| i.viewport().monitor_size) else {
            return;
        };
        if screen.x <= 0.0 || screen.y <= 0.0 {
            return;
        }

        // The whole frame, decorations included, is fitted to the screen
        let frame = WindowFrame::fit(screen, self.aspect_ratio);
        let chrome = decoration_size(ctx);
        debug!("Launch window frame {:?} on screen {:?}, chrome {:?}", frame, screen, chrome);
        ctx.send_viewport_cmd(ViewportCommand::InnerSize(frame.inner_size(chrome)));
        ctx.send_viewport_cmd(ViewportCommand::OuterPosition(frame.position()));
        self.applied = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDESCREEN: f32 = 16.0 / 9.0;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn wide_screen_is_limited_by_height() {
        let frame = WindowFrame::fit(Vec2::new(2560.0, 1080.0), WIDESCREEN);
        assert!(approx(frame.height, 1080.0));
        assert!(approx(frame.width, 1920.0));
        assert!(approx(frame.x, 320.0));
        assert!(approx(frame.y, 0.0));
    }

    #[test]
    fn narrow_screen_is_limited_by_width() {
        let frame = WindowFrame::fit(Vec2::new(1440.0, 900.0), WIDESCREEN);
        assert!(approx(frame.width, 1440.0));
        assert!(approx(frame.height, 810.0));
        assert!(approx(frame.x, 0.0));
        assert!(approx(frame.y, 45.0));
    }

    #[test]
    fn exact_sixteen_by_nine_fills_screen() {
        let frame = WindowFrame::fit(Vec2::new(1920.0, 1080.0), WIDESCREEN);
        assert!(approx(frame.width, 1920.0));
        assert!(approx(frame.height, 1080.0));
        assert!(approx(frame.x, 0.0) && approx(frame.y, 0.0));
    }

    #[test]
    fn inner_size_leaves_room_for_decorations() {
        let frame = WindowFrame::fit(Vec2::new(1920.0, 1080.0), WIDESCREEN);
        let inner = frame.inner_size(Vec2::new(2.0, 30.0));
        assert!(approx(inner.x, 1918.0));
        assert!(approx(inner.y, 1050.0));

        assert_eq!(frame.inner_size(Vec2::ZERO), frame.size());
        assert_eq!(frame.inner_size(Vec2::splat(5000.0)), Vec2::ZERO);
    }
}
