use egui::{Color32, Vec2};

/// Aspect ratio of the launch window and of each video surface.
pub const WIDESCREEN: f32 = 16.0 / 9.0;

/// Short skip step in seconds.
pub const SHORT_SKIP: f64 = 15.0;
/// Long skip step in seconds.
pub const LONG_SKIP: f64 = 300.0;

/// Look and feel of the dual player window.
#[derive(Clone, Debug)]
pub struct ShellConfig {
    pub short_skip: f64,
    pub long_skip: f64,
    pub aspect_ratio: f32,
    pub surface_size: Vec2,
    pub surface_border: f32,
    pub surface_spacing: f32,
    pub initial_window: Vec2,
    pub min_window: Vec2,
    pub background: Color32,
    pub button_fill: Color32,
    pub toggle_fill: Color32,
    pub outline: Color32,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            short_skip: SHORT_SKIP,
            long_skip: LONG_SKIP,
            aspect_ratio: WIDESCREEN,
            surface_size: Vec2::new(640.0, 360.0),
            surface_border: 4.0,
            surface_spacing: 20.0,
            initial_window: Vec2::new(1400.0, 788.0),
            min_window: Vec2::new(720.0, 480.0),
            background: Color32::from_rgb(255, 191, 204),
            button_fill: Color32::from_rgba_unmultiplied(0, 0, 255, 77),
            toggle_fill: Color32::from_rgba_unmultiplied(255, 0, 0, 77),
            outline: Color32::WHITE,
        }
    }
}
