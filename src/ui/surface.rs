use egui::{pos2, Color32, Rect, Sense, Stroke, Ui, Vec2};

use super::controls::SurfaceControls;
use crate::config::ShellConfig;
use crate::player::FfmpegSession;

/// Largest size with the video's aspect ratio that fits inside `area`.
pub fn fit_size(video_size: (u32, u32), area: Vec2) -> Vec2 {
    if video_size.0 == 0 || video_size.1 == 0 {
        return area;
    }
    let aspect = video_size.0 as f32 / video_size.1 as f32;
    let area_aspect = area.x / area.y;

    if aspect > area_aspect {
        Vec2::new(area.x, area.x / aspect)
    } else {
        Vec2::new(area.y * aspect, area.y)
    }
}

/// One bordered 16:9 video region with its control strip underneath.
pub struct VideoSurface;

impl VideoSurface {
    /// Draws the surface and returns the screen rect of the video region.
    pub fn show(ui: &mut Ui, session: Option<&mut FfmpegSession>, config: &ShellConfig) -> Rect {
        ui.vertical(|ui| {
            let (rect, _response) = ui.allocate_exact_size(config.surface_size, Sense::hover());
            let painter = ui.painter();
            painter.rect_filled(rect, 0.0, Color32::BLACK);

            if let Some(player) = session.as_deref().and_then(FfmpegSession::player) {
                if let Some(video_size) = player.video_size() {
                    let image_rect =
                        Rect::from_center_size(rect.center(), fit_size(video_size, rect.size()));
                    painter.image(
                        player.texture().id(),
                        image_rect,
                        Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                        Color32::WHITE,
                    );
                }
            }

            painter.rect_stroke(
                rect.expand(config.surface_border / 2.0),
                0.0,
                Stroke::new(config.surface_border, config.outline),
            );

            if let Some(session) = session {
                ui.add_space(config.surface_border);
                ui.set_max_width(config.surface_size.x);
                SurfaceControls::show(ui, session);
            }

            rect
        })
        .inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_video_letterboxes() {
        let size = fit_size((1920, 800), Vec2::new(640.0, 360.0));
        assert_eq!(size.x, 640.0);
        assert!((size.y - 266.666).abs() < 0.01);
    }

    #[test]
    fn tall_video_pillarboxes() {
        let size = fit_size((1080, 1920), Vec2::new(640.0, 360.0));
        assert_eq!(size.y, 360.0);
        assert!((size.x - 202.5).abs() < 0.01);
    }

    #[test]
    fn degenerate_video_fills_area() {
        assert_eq!(fit_size((0, 0), Vec2::new(640.0, 360.0)), Vec2::new(640.0, 360.0));
    }
}
