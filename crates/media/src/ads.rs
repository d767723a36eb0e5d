//! Ad break controller.

use crate::adapter::{MediaError, SharedMedia};
use std::fmt;
use url::Url;

/// Controls an ad break bound to one media adapter.
///
/// While an ads controller exists it receives every play/pause issued to
/// the player, whether or not the break has started.
pub trait AdsController: Send + Sync + fmt::Debug {
    fn play(&mut self) -> Result<(), MediaError>;

    fn pause(&mut self) -> Result<(), MediaError>;

    /// The creative finished. Hands playback back to the media.
    fn complete(&mut self) -> Result<(), MediaError>;

    /// Tear down the break and the media it is bound to.
    fn destroy(&mut self);

    /// Whether ad playback has begun and currently owns the transport.
    fn started(&self) -> bool;

    fn url(&self) -> &str;
}

/// Lifecycle of an ad break.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdBreakState {
    /// Created, creative not yet playing.
    Pending,
    Playing,
    Paused,
    /// Break finished; transport is back with the media.
    Completed,
    Destroyed,
}

/// A pre-roll break. The first `play()` begins the ad and holds the media
/// paused; `complete()` hands playback back.
#[derive(Debug)]
pub struct AdBreak {
    media: SharedMedia,
    url: Url,
    state: AdBreakState,
}

impl AdBreak {
    pub fn new(media: SharedMedia, url: &str) -> Result<Self, MediaError> {
        let url = Url::parse(url).map_err(|e| MediaError::InvalidAdUrl(format!("{url}: {e}")))?;
        Ok(Self {
            media,
            url,
            state: AdBreakState::Pending,
        })
    }

    pub fn state(&self) -> AdBreakState {
        self.state
    }

    pub fn media(&self) -> &SharedMedia {
        &self.media
    }

    fn begin(&mut self) {
        if self.state != AdBreakState::Pending {
            return;
        }
        if let Err(e) = self.media.write().pause() {
            tracing::debug!("media pause on ad start: {}", e);
        }
        tracing::debug!("ad break started: {}", self.url);
        self.state = AdBreakState::Playing;
    }
}

impl AdsController for AdBreak {
    fn play(&mut self) -> Result<(), MediaError> {
        match self.state {
            AdBreakState::Pending => {
                self.begin();
                Ok(())
            }
            AdBreakState::Paused => {
                self.state = AdBreakState::Playing;
                Ok(())
            }
            AdBreakState::Playing => Ok(()),
            AdBreakState::Completed => self.media.write().play(),
            AdBreakState::Destroyed => Err(MediaError::Destroyed),
        }
    }

    fn pause(&mut self) -> Result<(), MediaError> {
        match self.state {
            AdBreakState::Playing => {
                self.state = AdBreakState::Paused;
                Ok(())
            }
            AdBreakState::Paused => Ok(()),
            AdBreakState::Pending | AdBreakState::Completed => self.media.write().pause(),
            AdBreakState::Destroyed => Err(MediaError::Destroyed),
        }
    }

    fn complete(&mut self) -> Result<(), MediaError> {
        if !matches!(self.state, AdBreakState::Playing | AdBreakState::Paused) {
            return Ok(());
        }
        tracing::debug!("ad break completed: {}", self.url);
        self.state = AdBreakState::Completed;
        self.media.write().play()
    }

    fn destroy(&mut self) {
        if self.state == AdBreakState::Destroyed {
            return;
        }
        self.media.write().destroy();
        self.state = AdBreakState::Destroyed;
    }

    fn started(&self) -> bool {
        matches!(self.state, AdBreakState::Playing | AdBreakState::Paused)
    }

    fn url(&self) -> &str {
        self.url.as_str()
    }
}
