pub mod config;
pub mod coordinator;
pub mod layout;
pub mod media;
pub mod player;
pub mod ui;
pub mod window;

pub use config::ShellConfig;
pub use coordinator::{PlaybackCoordinator, TransportCommand};
pub use layout::LayoutMode;
pub use media::{MediaBackend, MediaSession, Slot};
pub use player::{FfmpegBackend, FfmpegSession, VideoPlayer};
pub use ui::controls::SurfaceControls;
pub use ui::surface::VideoSurface;
pub use ui::transport::{ShellAction, TransportBar, TransportView};
pub use window::{LaunchSizer, WindowFrame};
