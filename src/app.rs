use dual_video::ui::{centered_row, pick_media_file};
use dual_video::{
    FfmpegBackend, LaunchSizer, LayoutMode, MediaSession, PlaybackCoordinator, ShellAction,
    ShellConfig, Slot, TransportBar, TransportView, VideoSurface,
};
use egui::{CentralPanel, Frame, Pos2, Rect, ScrollArea};
use log::debug;
use std::path::PathBuf;

pub struct DualPlayerApp {
    coordinator: PlaybackCoordinator<FfmpegBackend>,
    layout: LayoutMode,
    sizer: LaunchSizer,
    config: ShellConfig,
    surface_rects: [Option<Rect>; 2],
}

impl DualPlayerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: ShellConfig) -> Self {
        Self {
            coordinator: PlaybackCoordinator::new(FfmpegBackend::new(cc.egui_ctx.clone())),
            layout: LayoutMode::default(),
            sizer: LaunchSizer::new(config.aspect_ratio),
            config,
            surface_rects: [None, None],
        }
    }

    fn handle(&mut self, action: ShellAction) {
        debug!("Shell action {:?}", action);
        match action {
            ShellAction::SelectSource(slot) => {
                if let Some(path) = pick_media_file() {
                    self.coordinator.load_source(slot, &path);
                }
            }
            ShellAction::Transport(command) => self.coordinator.apply(command),
            ShellAction::ToggleLayout => self.layout.toggle(),
        }
    }

    fn show_surfaces(&mut self, ui: &mut egui::Ui) {
        let spacing = self.config.surface_spacing;
        match self.layout {
            LayoutMode::Horizontal => {
                centered_row(ui, "surfaces", |ui| {
                    ui.spacing_mut().item_spacing.x = spacing;
                    for slot in Slot::ALL {
                        self.show_surface(ui, slot);
                    }
                });
            }
            LayoutMode::Vertical => {
                for slot in Slot::ALL {
                    centered_row(ui, &format!("surface_{slot:?}"), |ui| {
                        self.show_surface(ui, slot);
                    });
                    ui.add_space(spacing);
                }
            }
        }
    }

    fn show_surface(&mut self, ui: &mut egui::Ui, slot: Slot) {
        let rect = ui
            .push_id(slot, |ui| {
                VideoSurface::show(ui, self.coordinator.session_mut(slot), &self.config)
            })
            .inner;
        self.surface_rects[slot.index()] = Some(rect);
    }

    /// Slot under the pointer, else the first empty slot, else left.
    fn drop_target(&self, pointer: Option<Pos2>) -> Slot {
        let hovered = pointer.and_then(|pos| {
            Slot::ALL
                .into_iter()
                .find(|slot| self.surface_rects[slot.index()].is_some_and(|r| r.contains(pos)))
        });
        hovered
            .or_else(|| Slot::ALL.into_iter().find(|slot| !self.coordinator.is_loaded(*slot)))
            .unwrap_or(Slot::Left)
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let (dropped, pointer): (Option<PathBuf>, Option<Pos2>) = ctx.input(|i| {
            let path = i
                .raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .find(|path| dual_video::media::is_media_file(path));
            (path, i.pointer.latest_pos())
        });

        if let Some(path) = dropped {
            let slot = self.drop_target(pointer);
            self.coordinator.load_source(slot, &path);
        }
    }
}

impl eframe::App for DualPlayerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.sizer.apply(ctx);

        for slot in Slot::ALL {
            if let Some(session) = self.coordinator.session_mut(slot) {
                session.update(ctx);
            }
        }

        let mut action = None;

        CentralPanel::default()
            .frame(Frame::default().fill(self.config.background))
            .show(ctx, |ui| {
                ScrollArea::vertical().show(ui, |ui| {
                    ui.add_space(self.config.surface_spacing * 2.0);
                    self.show_surfaces(ui);
                    ui.add_space(self.config.surface_spacing);

                    let view = TransportView {
                        both_loaded: self.coordinator.both_loaded(),
                        playing: self.coordinator.is_playing(),
                        layout: self.layout,
                    };
                    action = TransportBar::show(ui, view, &self.config);
                    ui.add_space(self.config.surface_spacing);
                });
            });

        if let Some(action) = action {
            self.handle(action);
        }

        self.handle_dropped_files(ctx);

        let any_playing = Slot::ALL.into_iter().any(|slot| {
            self.coordinator
                .session(slot)
                .is_some_and(|session| session.is_playing())
        });
        if any_playing {
            ctx.request_repaint();
        }
    }
}
