//! Playback collaborators for the media player.
//!
//! This crate provides:
//! - The `MediaAdapter` contract and the shared handle the ads layer binds to
//! - `HtmlMediaAdapter` for native audio and video elements
//! - `IframeMediaAdapter` for embedded players
//! - The `AdsController` contract and `AdBreak`, a pre-roll/mid-roll controller

pub mod adapter;
pub mod ads;
pub mod html_media;
pub mod iframe;

pub use adapter::{shared, MediaAdapter, MediaError, MediaFile, MediaKind, SharedMedia};
pub use ads::{AdBreak, AdBreakState, AdsController};
pub use html_media::{CanPlayType, HtmlMediaAdapter, MediaNetworkState, MediaReadyState};
pub use iframe::IframeMediaAdapter;
