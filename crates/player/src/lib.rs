//! OM Player - upgrades native audio, video and iframe elements into
//! managed players with custom controls and optional ad breaks.
//!
//! This crate holds the orchestration layer:
//! - Candidate validation and wrapping
//! - Playback delegation between media and ads
//! - Responsive iframe sizing
//! - Unique id assignment and the player registry
//! - Page-level bulk initialization

pub mod collaborators;
pub mod config;
pub mod controls;
pub mod host;
pub mod player;
pub mod registry;
pub mod responsive;
pub mod uid;
pub mod validate;

pub use collaborators::{Collaborators, DefaultCollaborators};
pub use config::PlayerConfig;
pub use controls::{ChromeControls, ControlsBuilder};
pub use host::PlayerHost;
pub use player::{
    ActiveElement, ActiveSource, InitOutcome, Player, PlayerRef, PlayerState, PlayerTarget,
    PlayerWeak,
};
pub use registry::PlayerRegistry;
pub use validate::ValidationError;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
