pub mod controls;
pub mod surface;
pub mod transport;

use egui::Ui;
use std::path::PathBuf;

use crate::media::{AUDIO_EXTENSIONS, MOVIE_EXTENSIONS};

/// Native single-file chooser limited to movie and audio files.
/// Returns `None` when the user cancels.
pub fn pick_media_file() -> Option<PathBuf> {
    let all: Vec<&str> = MOVIE_EXTENSIONS
        .iter()
        .chain(AUDIO_EXTENSIONS)
        .copied()
        .collect();

    rfd::FileDialog::new()
        .set_title("Select Media")
        .add_filter("Movies and audio", all.as_slice())
        .add_filter("Movies", MOVIE_EXTENSIONS)
        .add_filter("Audio", AUDIO_EXTENSIONS)
        .pick_file()
}

/// Lay out a row horizontally centered in the available width.
///
/// The row's width is only known after it is drawn, so the previous frame's
/// width is used for padding.
pub fn centered_row<R>(ui: &mut Ui, id_salt: &str, add_contents: impl FnOnce(&mut Ui) -> R) -> R {
    let id = ui.id().with(id_salt);
    let last_width = ui.memory(|mem| mem.data.get_temp::<f32>(id)).unwrap_or(0.0);
    let padding = ((ui.available_width() - last_width) / 2.0).max(0.0);

    ui.horizontal(|ui| {
        ui.add_space(padding);
        let start = ui.cursor().min.x;
        let inner = add_contents(ui);
        let width = ui.min_rect().max.x - start;

        if (width - last_width).abs() > 0.5 {
            ui.memory_mut(|mem| mem.data.insert_temp(id, width));
            ui.ctx().request_repaint();
        }
        inner
    })
    .inner
}
