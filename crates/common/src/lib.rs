//! Common utilities and types shared by the player crates.

pub mod error;
pub mod geometry;

pub use error::{PlayerError, PlayerResult};
pub use geometry::Size;
