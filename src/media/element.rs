//! The media element abstraction and its rodio implementation

use std::fs::File;
use std::io::BufReader;
use std::time::Duration;

use anyhow::{Context, Result};
use rodio::{Decoder, OutputStreamHandle, Sink, Source};

/// A single playable media source with an independent clock.
///
/// Mirrors the control surface the deck needs from each track: loading a
/// source, transport control, a readable/settable position, and the
/// muted/volume pair that mode switching drives. Position assignment and
/// mute/volume changes never fail; only starting playback can be
/// rejected.
pub trait MediaElement: Send {
    fn load(&mut self, src: &str) -> Result<()>;
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self);
    fn position(&self) -> Duration;
    fn set_position(&mut self, position: Duration);
    fn duration(&self) -> Option<Duration>;
    fn set_muted(&mut self, muted: bool);
    fn set_volume(&mut self, volume: f32);
    fn is_muted(&self) -> bool;
    fn volume(&self) -> f32;
    fn is_paused(&self) -> bool;
    fn has_ended(&self) -> bool;
}

/// A [`MediaElement`] backed by a rodio [`Sink`].
///
/// Each element owns its own sink so the three tracks of a song decode
/// and advance independently; the deck is what keeps them aligned. The
/// `OutputStream` the handle points at is kept alive by `main`.
pub struct RodioElement {
    handle: OutputStreamHandle,
    sink: Option<Sink>,
    src: Option<String>,
    duration: Option<Duration>,
    muted: bool,
    volume: f32,
    started: bool,
}

impl RodioElement {
    pub fn new(handle: OutputStreamHandle) -> Self {
        Self {
            handle,
            sink: None,
            src: None,
            duration: None,
            muted: false,
            volume: super::DEFAULT_VOCAL_VOLUME,
            started: false,
        }
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    fn apply_volume(&self) {
        if let Some(sink) = &self.sink {
            sink.set_volume(self.effective_volume());
        }
    }
}

impl MediaElement for RodioElement {
    fn load(&mut self, src: &str) -> Result<()> {
        // Replacing a sink without stopping it would detach it and let
        // the old audio keep playing.
        if let Some(old) = self.sink.take() {
            old.stop();
        }

        let file = File::open(src).with_context(|| format!("failed to open {src}"))?;
        let source =
            Decoder::new(BufReader::new(file)).with_context(|| format!("failed to decode {src}"))?;
        self.duration = source.total_duration();

        let sink = Sink::try_new(&self.handle).context("failed to create audio sink")?;
        // Elements load paused at position zero; play_sync starts them.
        sink.pause();
        sink.set_volume(self.effective_volume());
        sink.append(source);

        self.sink = Some(sink);
        self.src = Some(src.to_string());
        self.started = false;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        let sink = self
            .sink
            .as_ref()
            .context("play attempted with no source loaded")?;
        sink.play();
        self.started = true;
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn position(&self) -> Duration {
        self.sink.as_ref().map(Sink::get_pos).unwrap_or_default()
    }

    fn set_position(&mut self, position: Duration) {
        let Some(sink) = &self.sink else { return };
        if let Err(e) = sink.try_seek(position) {
            // Some decoders cannot seek; the element stays where it was.
            tracing::warn!(src = ?self.src, error = ?e, "Seek not applied");
        }
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.apply_volume();
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.apply_volume();
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn is_paused(&self) -> bool {
        self.sink.as_ref().map(Sink::is_paused).unwrap_or(true)
    }

    fn has_ended(&self) -> bool {
        self.started && self.sink.as_ref().map(Sink::empty).unwrap_or(false)
    }
}
