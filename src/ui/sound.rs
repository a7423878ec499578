/// Sound: procedural 8-bit style tracks played through rodio.
///
/// All tracks are generated as in-memory WAV buffers at init time.
/// The theme loops on its own sink until stopped; effects are
/// fire-and-forget on detached sinks.
///
/// Compile without the "sound" feature to disable audio entirely
/// (only the silent sink is available then).

use crate::sim::event::GameEvent;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Track {
    /// Background loop while a match runs.
    Theme,
    Pickup,
    Crash,
    Victory,
}

/// Audio output used by the binary. The core never calls this.
pub trait AudioSink {
    fn play_track(&mut self, track: Track);
    /// Stop the looping theme. Effects already playing run out.
    fn stop(&mut self);
}

/// Sink that plays nothing. Used when sound is disabled or unavailable.
pub struct Silent;

impl AudioSink for Silent {
    fn play_track(&mut self, _track: Track) {}
    fn stop(&mut self) {}
}

/// What the audio should do in response to a game event.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cue {
    Play(Track),
    Stop,
}

pub fn cue_for(event: &GameEvent) -> Option<Cue> {
    match event {
        GameEvent::MatchStarted => Some(Cue::Play(Track::Theme)),
        GameEvent::TokenPicked { .. } => Some(Cue::Play(Track::Pickup)),
        GameEvent::Crashed { .. } => Some(Cue::Play(Track::Crash)),
        GameEvent::ScoreCapReached { .. } => Some(Cue::Play(Track::Victory)),
        GameEvent::MatchEnded(_) => Some(Cue::Stop),
        _ => None,
    }
}

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
    use tracing::{debug, warn};

    use super::{AudioSink, Track};

    pub(super) const SAMPLE_RATE: u32 = 22050;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        music: Option<Sink>,
        theme: Arc<Vec<u8>>,
        pickup: Arc<Vec<u8>>,
        crash: Arc<Vec<u8>>,
        victory: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        /// None when no output device can be opened.
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("no audio output: {e}");
                    return None;
                }
            };

            Some(SoundEngine {
                _stream: stream,
                handle,
                music: None,
                theme: Arc::new(make_wav(&gen_theme())),
                pickup: Arc::new(make_wav(&gen_pickup())),
                crash: Arc::new(make_wav(&gen_crash())),
                victory: Arc::new(make_wav(&gen_victory())),
            })
        }

        fn buffer(&self, track: Track) -> &Arc<Vec<u8>> {
            match track {
                Track::Theme => &self.theme,
                Track::Pickup => &self.pickup,
                Track::Crash => &self.crash,
                Track::Victory => &self.victory,
            }
        }

        fn decode(buf: &Arc<Vec<u8>>) -> Option<Decoder<Cursor<Vec<u8>>>> {
            Decoder::new(Cursor::new(buf.as_ref().clone())).ok()
        }
    }

    impl AudioSink for SoundEngine {
        fn play_track(&mut self, track: Track) {
            debug!(?track, "play");
            let Some(src) = Self::decode(self.buffer(track)) else { return };
            let Ok(sink) = Sink::try_new(&self.handle) else { return };
            if track == Track::Theme {
                sink.append(src.repeat_infinite());
                // Replacing the old sink drops it, which stops it.
                self.music = Some(sink);
            } else {
                sink.append(src);
                sink.detach(); // fire-and-forget
            }
        }

        fn stop(&mut self) {
            if let Some(sink) = self.music.take() {
                sink.stop();
            }
        }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators — all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    fn tone(samples: &mut Vec<f32>, freq: f32, dur: f32, volume: f32) {
        let n = (SAMPLE_RATE as f32 * dur) as usize;
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - (i as f32 / n as f32).powf(0.5);
            // Square-ish wave (sine + 3rd harmonic) for retro feel
            let wave = (t * freq * 2.0 * std::f32::consts::PI).sin() * 0.7
                + (t * freq * 3.0 * 2.0 * std::f32::consts::PI).sin() * 0.3;
            samples.push(wave * env * volume);
        }
    }

    /// Theme: a minor arpeggio bass line, two bars.
    pub(super) fn gen_theme() -> Vec<f32> {
        let bar = [220.0_f32, 261.6, 329.6, 261.6, 196.0, 246.9, 293.7, 246.9];
        let mut samples = Vec::new();
        for _ in 0..2 {
            for &freq in &bar {
                tone(&mut samples, freq, 0.14, 0.15);
            }
        }
        samples
    }

    /// Pickup: quick ascending arpeggio C6→E6→G6
    pub(super) fn gen_pickup() -> Vec<f32> {
        let mut samples = Vec::new();
        for &freq in &[1047.0_f32, 1319.0, 1568.0] {
            tone(&mut samples, freq, 0.045, 0.25);
        }
        samples
    }

    /// Crash: noise burst over a falling tone
    pub(super) fn gen_crash() -> Vec<f32> {
        let duration = 0.45;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut rng: u32 = 12345;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 400.0 - t * 300.0;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let tone = (ti * freq * 2.0 * std::f32::consts::PI).sin();
                // Simple LCG noise
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                let env = (1.0 - t).powf(0.8);
                (tone * 0.5 + noise * 0.5) * env * 0.3
            })
            .collect()
    }

    /// Victory: ascending fanfare with a held top note
    pub(super) fn gen_victory() -> Vec<f32> {
        let mut samples = Vec::new();
        for &freq in &[523.0_f32, 659.0, 784.0] {
            tone(&mut samples, freq, 0.1, 0.3);
        }
        tone(&mut samples, 1047.0, 0.35, 0.3);
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder — wraps f32 samples into a valid WAV buffer
    // ════════════════════════════════════════════════════════════

    pub(super) fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2;
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
        buf.extend_from_slice(&1u16.to_le_bytes());  // PCM
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }
}

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

/// Open the audio device when sound is compiled in and enabled.
pub fn open(enabled: bool) -> Box<dyn AudioSink> {
    #[cfg(feature = "sound")]
    {
        if enabled {
            if let Some(engine) = SoundEngine::new() {
                return Box::new(engine);
            }
        }
    }
    #[cfg(not(feature = "sound"))]
    let _ = enabled;
    Box::new(Silent)
}
