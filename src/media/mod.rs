//! Media module - playback elements and the synchronized deck
//!
//! This module contains the media backend that the controller drives.
//! It is organized into submodules by responsibility:
//!
//! - `element`: the `MediaElement` trait and its rodio-backed implementation
//! - `deck`: the three-element deck (primary + backing + vocal) with
//!   mode switching and drift correction, plus the event ticker

mod element;
mod deck;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use rodio::OutputStream;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

pub use element::{MediaElement, RodioElement};
pub use deck::MediaDeck;

/// Default full-vocal gain, matching a freshly loaded element.
pub const DEFAULT_VOCAL_VOLUME: f32 = 1.0;

/// Fixed gain factor applied to the vocal track in guide mode.
pub const GUIDE_VOLUME_FACTOR: f32 = 0.5;

/// Secondary positions further than this from the primary get snapped.
pub const DRIFT_THRESHOLD: Duration = Duration::from_millis(50);

/// Cadence of `TimeUpdate` events, the effective rate browsers deliver
/// `timeupdate` at.
pub const TIMEUPDATE_INTERVAL: Duration = Duration::from_millis(250);

/// Open the default audio output and build a deck of three rodio
/// elements on it.
///
/// The returned `OutputStream` is not `Send` and must stay alive on the
/// caller's task for as long as audio should play; only the deck (which
/// holds stream handles) travels between tasks.
pub fn open_output() -> Result<(OutputStream, MediaDeck)> {
    let (stream, handle) = OutputStream::try_default().context("no audio output device")?;
    let deck = MediaDeck::new(
        Box::new(RodioElement::new(handle.clone())),
        Box::new(RodioElement::new(handle.clone())),
        Box::new(RodioElement::new(handle)),
    );
    Ok((stream, deck))
}

/// Events emitted by the deck ticker and consumed by the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaEvent {
    /// The primary element advanced while playing.
    TimeUpdate { position: Duration },
    /// The primary element ran out of audio.
    Ended,
}

/// Spawn the ticker task that watches the deck's primary element and
/// emits [`MediaEvent`]s. The task exits when the receiver is dropped.
pub fn spawn_event_ticker(
    deck: Arc<Mutex<Option<MediaDeck>>>,
    tx: UnboundedSender<MediaEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TIMEUPDATE_INTERVAL);
        // Ended must fire exactly once per loaded song.
        let mut was_ended = false;

        loop {
            interval.tick().await;

            let event = {
                let guard = deck.lock().await;
                let Some(deck) = guard.as_ref() else { continue };
                if !deck.is_loaded() {
                    was_ended = false;
                    continue;
                }

                let ended = deck.has_ended();
                if ended && !was_ended {
                    was_ended = true;
                    Some(MediaEvent::Ended)
                } else if !ended && deck.is_playing() {
                    was_ended = false;
                    Some(MediaEvent::TimeUpdate {
                        position: deck.position(),
                    })
                } else {
                    was_ended = ended;
                    None
                }
            };

            if let Some(event) = event {
                if tx.send(event).is_err() {
                    tracing::debug!("Media event receiver dropped, ticker shutting down");
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use anyhow::{anyhow, Result};

    /// Scriptable element for deck and controller tests.
    pub(crate) struct FakeElement {
        pub src: Option<String>,
        pub pos: Duration,
        pub dur: Option<Duration>,
        pub muted: bool,
        pub volume: f32,
        pub paused: bool,
        pub ended: bool,
        pub reject_play: bool,
    }

    impl FakeElement {
        pub(crate) fn new() -> Self {
            Self {
                src: None,
                pos: Duration::ZERO,
                dur: Some(Duration::from_secs(180)),
                muted: false,
                volume: DEFAULT_VOCAL_VOLUME,
                paused: true,
                ended: false,
                reject_play: false,
            }
        }
    }

    impl MediaElement for FakeElement {
        fn load(&mut self, src: &str) -> Result<()> {
            if src.contains("missing") {
                return Err(anyhow!("No such file or directory: {src}"));
            }
            self.src = Some(src.to_string());
            self.pos = Duration::ZERO;
            self.paused = true;
            self.ended = false;
            Ok(())
        }

        fn play(&mut self) -> Result<()> {
            if self.reject_play {
                return Err(anyhow!("playback rejected"));
            }
            if self.src.is_none() {
                return Err(anyhow!("no source loaded"));
            }
            self.paused = false;
            Ok(())
        }

        fn pause(&mut self) {
            self.paused = true;
        }

        fn position(&self) -> Duration {
            self.pos
        }

        fn set_position(&mut self, position: Duration) {
            self.pos = position;
        }

        fn duration(&self) -> Option<Duration> {
            self.dur
        }

        fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        fn set_volume(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
        }

        fn is_muted(&self) -> bool {
            self.muted
        }

        fn volume(&self) -> f32 {
            self.volume
        }

        fn is_paused(&self) -> bool {
            self.paused
        }

        fn has_ended(&self) -> bool {
            self.ended
        }
    }

    /// A deck over three fake elements, for tests that drive sync logic.
    pub(crate) fn fake_deck() -> MediaDeck {
        MediaDeck::new(
            Box::new(FakeElement::new()),
            Box::new(FakeElement::new()),
            Box::new(FakeElement::new()),
        )
    }
}
