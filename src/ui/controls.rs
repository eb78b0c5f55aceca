use crate::media::MediaSession;
use crate::player::FfmpegSession;
use egui::{Slider, Ui};

/// Small per-surface control strip: drives one session only.
pub struct SurfaceControls;

impl SurfaceControls {
    pub fn show(ui: &mut Ui, session: &mut FfmpegSession) {
        ui.horizontal(|ui| {
            let play_pause_text = if session.is_playing() { "⏸" } else { "▶" };

            if ui.small_button(play_pause_text).clicked() {
                if session.is_playing() {
                    session.pause();
                } else {
                    session.play();
                }
            }

            let duration = session.duration();
            let session_position = session.position();

            ui.label(format_time(session_position));

            // Keep the dragged position across frames until the drag ends
            let slider_id = ui.id().with("seek_slider");
            let mut position = ui.memory(|mem| {
                mem.data
                    .get_temp::<f64>(slider_id)
                    .unwrap_or(session_position)
            });

            ui.spacing_mut().slider_width = 320.0;
            let slider_response = ui.add_enabled(
                duration > 0.0,
                Slider::new(&mut position, 0.0..=duration.max(0.0))
                    .show_value(false)
                    .trailing_fill(true),
            );

            if slider_response.dragged() {
                ui.memory_mut(|mem| mem.data.insert_temp(slider_id, position));
            } else if !session.is_seeking() {
                ui.memory_mut(|mem| mem.data.insert_temp(slider_id, session_position));
            }

            if slider_response.drag_stopped() || slider_response.clicked() {
                session.seek(position);
            }

            ui.label(format_time(duration));

            ui.separator();

            ui.label("🔊");
            ui.spacing_mut().slider_width = 60.0;
            let mut volume = session.volume();
            if ui
                .add(Slider::new(&mut volume, 0.0..=1.0).show_value(false))
                .changed()
            {
                session.set_volume(volume);
            }
        });
    }
}

/// Format seconds as `mm:ss`, or `hh:mm:ss` past the hour.
pub fn format_time(seconds: f64) -> String {
    let total_seconds = seconds.max(0.0) as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(75.9), "01:15");
    }

    #[test]
    fn formats_hours() {
        assert_eq!(format_time(3600.0 + 5.0 * 60.0 + 7.0), "01:05:07");
    }

    #[test]
    fn negative_time_reads_as_zero() {
        assert_eq!(format_time(-4.0), "00:00");
    }
}
