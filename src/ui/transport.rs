use egui::{vec2, Button, Color32, RichText, Stroke, Ui};

use crate::config::ShellConfig;
use crate::coordinator::TransportCommand;
use crate::layout::LayoutMode;
use crate::media::Slot;

/// A user gesture from the shell's control rows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShellAction {
    SelectSource(Slot),
    Transport(TransportCommand),
    ToggleLayout,
}

/// What the transport row needs to know to render itself.
#[derive(Clone, Copy, Debug)]
pub struct TransportView {
    pub both_loaded: bool,
    pub playing: bool,
    pub layout: LayoutMode,
}

const ROUND_BUTTON: f32 = 50.0;

/// Shared transport row bookended by the two load buttons, plus the
/// layout toggle underneath.
pub struct TransportBar;

impl TransportBar {
    pub fn show(ui: &mut Ui, view: TransportView, config: &ShellConfig) -> Option<ShellAction> {
        let mut action = None;

        super::centered_row(ui, "transport_row", |ui| {
            ui.spacing_mut().item_spacing.x = config.surface_spacing;

            if load_button(ui, view.layout.load_label(Slot::Left), config).clicked() {
                action = Some(ShellAction::SelectSource(Slot::Left));
            }

            let skips = [
                ("⏪", -config.long_skip, "Back 5 minutes"),
                ("↺15", -config.short_skip, "Back 15 seconds"),
            ];
            for (icon, delta, hint) in skips {
                if round_button(ui, icon, view.both_loaded, config)
                    .on_hover_text(hint)
                    .clicked()
                {
                    action = Some(ShellAction::Transport(TransportCommand::Skip(delta)));
                }
            }

            let play_pause = if view.playing { "⏸" } else { "▶" };
            if round_button(ui, play_pause, view.both_loaded, config).clicked() {
                action = Some(ShellAction::Transport(TransportCommand::TogglePlayPause));
            }

            let skips = [
                ("15↻", config.short_skip, "Forward 15 seconds"),
                ("⏩", config.long_skip, "Forward 5 minutes"),
            ];
            for (icon, delta, hint) in skips {
                if round_button(ui, icon, view.both_loaded, config)
                    .on_hover_text(hint)
                    .clicked()
                {
                    action = Some(ShellAction::Transport(TransportCommand::Skip(delta)));
                }
            }

            if load_button(ui, view.layout.load_label(Slot::Right), config).clicked() {
                action = Some(ShellAction::SelectSource(Slot::Right));
            }
        });

        ui.add_space(config.surface_spacing);

        super::centered_row(ui, "layout_row", |ui| {
            let toggle = Button::new(RichText::new(view.layout.toggle_label()).color(Color32::WHITE))
                .fill(config.toggle_fill)
                .stroke(Stroke::new(2.0, config.outline))
                .rounding(0.0)
                .min_size(vec2(0.0, 36.0));
            if ui.add(toggle).clicked() {
                action = Some(ShellAction::ToggleLayout);
            }
        });

        action
    }
}

fn load_button(ui: &mut Ui, label: String, config: &ShellConfig) -> egui::Response {
    let button = Button::new(RichText::new(label).color(Color32::WHITE))
        .fill(config.button_fill)
        .stroke(Stroke::new(2.0, config.outline))
        .rounding(0.0)
        .min_size(vec2(0.0, 36.0));
    ui.add(button)
}

/// Disabled buttons are drawn faded by egui.
fn round_button(ui: &mut Ui, icon: &str, enabled: bool, config: &ShellConfig) -> egui::Response {
    let button = Button::new(RichText::new(icon).size(20.0).color(Color32::WHITE))
        .fill(config.button_fill)
        .stroke(Stroke::new(2.0, config.outline))
        .rounding(ROUND_BUTTON / 2.0)
        .min_size(vec2(ROUND_BUTTON, ROUND_BUTTON));
    ui.add_enabled(enabled, button)
}
