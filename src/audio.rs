//! Fire-and-forget sound cues
//!
//! The simulation raises events; the session maps them to `SoundEffect`s
//! and hands them to an `AudioSink`. Sinks may fail (no device, backend
//! gone) and that must never reach the game loop.

use thiserror::Error;

use crate::sim::{GameEvent, WeaponKind};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Weapon selected
    Switch(WeaponKind),
    /// Discrete weapon shot
    Shoot(WeaponKind),
    /// Ray beam switched on
    RayHum,
    /// Any explosion
    Explosion,
    /// Enemy destroyed
    EnemyDeath,
    /// Player took damage
    PlayerHurt,
    /// Power-up collected
    PowerUp,
    /// Boss arrives
    BossRoar,
    /// Wave cleared, shop open
    WaveClear,
    /// Game over
    GameOver,
    /// New high score
    HighScore,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// How the pitch moves from start to end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sweep {
    Linear,
    Exponential,
}

/// Oscillator parameters for a procedurally generated cue.
/// Gain fades linearly from `gain` to silence over the duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub wave: Waveform,
    pub sweep: Sweep,
    pub start_hz: f32,
    pub end_hz: f32,
    pub duration_ms: u32,
    pub gain: f32,
}

impl SoundEffect {
    /// Cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::WeaponFired(WeaponKind::Ray) => Some(SoundEffect::RayHum),
            GameEvent::WeaponFired(kind) => Some(SoundEffect::Shoot(*kind)),
            GameEvent::Explosion { .. } => Some(SoundEffect::Explosion),
            GameEvent::EnemyKilled { .. } => Some(SoundEffect::EnemyDeath),
            GameEvent::PlayerHit { .. } => Some(SoundEffect::PlayerHurt),
            GameEvent::PowerUpCollected(_) => Some(SoundEffect::PowerUp),
            GameEvent::BossSpawned { .. } => Some(SoundEffect::BossRoar),
            GameEvent::ShopOpened { .. } => Some(SoundEffect::WaveClear),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::WeaponSwitched(kind) => Some(SoundEffect::Switch(*kind)),
            GameEvent::BossDefeated { .. }
            | GameEvent::LevelStarted { .. }
            | GameEvent::PauseToggled { .. } => None,
        }
    }

    pub fn tone(self) -> Tone {
        use Sweep::{Exponential, Linear};
        use Waveform::{Sawtooth, Sine, Square, Triangle};

        let (wave, sweep, start_hz, end_hz, duration_ms, gain) = match self {
            SoundEffect::Switch(WeaponKind::BrickGun) => (Square, Exponential, 440.0, 880.0, 100, 0.05),
            SoundEffect::Switch(WeaponKind::Bomb) => (Sine, Linear, 100.0, 40.0, 200, 0.1),
            SoundEffect::Switch(WeaponKind::Ray) => (Sawtooth, Exponential, 200.0, 1200.0, 300, 0.03),
            SoundEffect::Switch(_) => (Square, Linear, 300.0, 600.0, 50, 0.05),
            SoundEffect::Shoot(WeaponKind::Bomb) => (Sine, Linear, 220.0, 110.0, 120, 0.1),
            SoundEffect::Shoot(WeaponKind::Shotgun) => (Square, Linear, 330.0, 160.0, 90, 0.06),
            SoundEffect::Shoot(WeaponKind::Minigun) => (Square, Linear, 900.0, 700.0, 30, 0.03),
            SoundEffect::Shoot(WeaponKind::PlasmaCube) => (Sine, Exponential, 180.0, 520.0, 200, 0.08),
            SoundEffect::Shoot(_) => (Square, Linear, 600.0, 400.0, 60, 0.05),
            SoundEffect::RayHum => (Sawtooth, Linear, 120.0, 140.0, 250, 0.03),
            SoundEffect::Explosion => (Sawtooth, Exponential, 90.0, 30.0, 300, 0.15),
            SoundEffect::EnemyDeath => (Triangle, Linear, 440.0, 220.0, 120, 0.08),
            SoundEffect::PlayerHurt => (Square, Linear, 200.0, 150.0, 100, 0.08),
            SoundEffect::PowerUp => (Triangle, Exponential, 523.0, 1047.0, 180, 0.08),
            SoundEffect::BossRoar => (Sawtooth, Linear, 60.0, 45.0, 900, 0.2),
            SoundEffect::WaveClear => (Triangle, Exponential, 659.0, 988.0, 400, 0.1),
            SoundEffect::GameOver => (Sine, Exponential, 392.0, 98.0, 1200, 0.15),
            SoundEffect::HighScore => (Triangle, Exponential, 784.0, 1568.0, 600, 0.1),
        };
        Tone {
            wave,
            sweep,
            start_hz,
            end_hz,
            duration_ms,
            gain,
        }
    }
}

/// Why a cue could not be played
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio device available")]
    Unavailable,
    #[error("audio backend error: {0}")]
    Backend(String),
}

/// Output for sound cues. Implementations must not block.
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError>;
}

/// Discards every cue
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect, _volume: f32) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Writes cues to the debug log (headless runs)
#[derive(Debug, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError> {
        let tone = effect.tone();
        log::debug!(
            "sfx {:?}: {:?} {:.0}->{:.0} Hz for {} ms at {:.2}",
            effect,
            tone.wave,
            tone.start_hz,
            tone.end_hz,
            tone.duration_ms,
            volume
        );
        Ok(())
    }
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Box<dyn AudioSink>,
    volume: f32,
    muted: bool,
    /// Set after the first failure so the log is not flooded
    failed: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(Box::new(NullAudio))
    }
}

impl AudioManager {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            volume: 0.8,
            muted: false,
            failed: false,
        }
    }

    /// Set volume (0.0 - 1.0)
    pub fn set_volume(&mut self, vol: f32) {
        self.volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Play a sound effect. Failures are swallowed.
    pub fn play(&mut self, effect: SoundEffect) {
        if self.muted || self.volume <= 0.0 {
            return;
        }
        if let Err(e) = self.sink.play(effect, self.volume) {
            if !self.failed {
                log::warn!("Audio failed ({}) - further errors suppressed", e);
                self.failed = true;
            }
        }
    }

    /// Play the cue for every event that has one
    pub fn play_events(&mut self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }
}

impl std::fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioManager")
            .field("volume", &self.volume)
            .field("muted", &self.muted)
            .field("failed", &self.failed)
            .finish_non_exhaustive()
    }
}
