//! A running game session
//!
//! Owns the simulation plus its two schedules: the fixed-step frame loop and
//! the one-second wave countdown. Both are cancelled together by
//! `teardown`, after which the session ignores further frames.

use crate::audio::{AudioManager, AudioSink, SoundEffect};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::highscores::{HighScoreStore, HighScores};
use crate::settings::Settings;
use crate::sim::wave::{announce, countdown_second, next_level};
use crate::sim::{
    GameEvent, GameState, GlobalUpgrade, PurchaseOutcome, Snapshot, TickInput, WeaponKind,
    buy_global, buy_weapon, tick,
};
use crate::tuning::Tuning;

/// Longest real frame the session will simulate
const MAX_FRAME_DT: f32 = 0.1;

/// Accumulates real time and reports how many periods came due
#[derive(Debug, Clone)]
struct Schedule {
    period: f32,
    elapsed: f32,
    active: bool,
}

impl Schedule {
    fn every(period: f32) -> Self {
        Self {
            period,
            elapsed: 0.0,
            active: true,
        }
    }

    /// Add `dt` and return the number of due firings, at most `limit`.
    /// Time beyond the limit is dropped.
    fn advance(&mut self, dt: f32, limit: u32) -> u32 {
        if !self.active {
            return 0;
        }
        self.elapsed += dt;
        let mut due = 0;
        while self.elapsed >= self.period && due < limit {
            self.elapsed -= self.period;
            due += 1;
        }
        if due == limit {
            self.elapsed = self.elapsed.min(self.period);
        }
        due
    }

    fn cancel(&mut self) {
        self.active = false;
        self.elapsed = 0.0;
    }
}

pub struct Session {
    state: GameState,
    frame: Schedule,
    countdown: Schedule,
    audio: AudioManager,
    high_scores: HighScores,
    store: Option<HighScoreStore>,
    /// Date recorded with any high score this session sets
    date_label: String,
}

impl Session {
    pub fn new(seed: u64, tuning: Tuning, settings: &Settings) -> Self {
        let state = GameState::with_particle_cap(seed, tuning, settings.max_particles());
        let mut audio = AudioManager::default();
        audio.set_muted(!settings.sound);
        log::info!(
            "Session started (seed {}, quality {}, particle cap {})",
            seed,
            settings.quality.as_str(),
            settings.max_particles()
        );
        Self {
            state,
            frame: Schedule::every(SIM_DT),
            countdown: Schedule::every(1.0),
            audio,
            high_scores: HighScores::new(),
            store: None,
            date_label: String::from("today"),
        }
    }

    /// Route sound cues to `sink`, keeping the mute state
    pub fn with_audio(mut self, sink: Box<dyn AudioSink>) -> Self {
        let muted = self.audio.is_muted();
        self.audio = AudioManager::new(sink);
        self.audio.set_muted(muted);
        self
    }

    /// Read the leaderboard from `store` now and write it back on new records
    pub fn with_store(mut self, store: HighScoreStore) -> Self {
        self.high_scores = store.load();
        self.store = Some(store);
        self
    }

    pub fn with_date_label(mut self, date: impl Into<String>) -> Self {
        self.date_label = date.into();
        self
    }

    /// Advance by one display frame of `real_dt` seconds.
    ///
    /// Runs up to `MAX_SUBSTEPS` fixed ticks, then the countdown if the game
    /// is live. Returns every event raised during the frame.
    pub fn frame(&mut self, real_dt: f32, input: &TickInput) -> Vec<GameEvent> {
        if !self.is_active() {
            return Vec::new();
        }
        let dt = real_dt.clamp(0.0, MAX_FRAME_DT);

        let steps = self.frame.advance(dt, MAX_SUBSTEPS);
        for _ in 0..steps {
            tick(&mut self.state, input);
        }

        // Suspended (not just skipped) while paused or shopping
        if self.state.wave.is_live() {
            let seconds = self.countdown.advance(dt, u32::MAX);
            for _ in 0..seconds {
                if let Some(transition) = countdown_second(&mut self.state.wave, &self.state.tuning)
                {
                    announce(&mut self.state, transition);
                }
            }
        }

        let events = self.state.drain_events();
        self.audio.play_events(&events);

        for event in &events {
            if let GameEvent::GameOver { score } = event {
                self.submit_score(*score);
            }
        }
        events
    }

    fn submit_score(&mut self, score: u64) {
        let Some(rank) = self.high_scores.add_score(score, self.date_label.clone()) else {
            return;
        };
        log::info!("New high score {} (rank {})", score, rank);
        self.audio.play(SoundEffect::HighScore);

        if let Some(store) = &self.store {
            if let Err(e) = store.save(&self.high_scores) {
                log::warn!("Failed to save high scores to {}: {}", store.path().display(), e);
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::capture(&self.state)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for scripted scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn buy_global(&mut self, upgrade: GlobalUpgrade) -> PurchaseOutcome {
        buy_global(&mut self.state, upgrade)
    }

    pub fn buy_weapon(&mut self, kind: WeaponKind) -> PurchaseOutcome {
        buy_weapon(&mut self.state, kind)
    }

    /// Leave the shop and start the next wave
    pub fn confirm_shop(&mut self) -> bool {
        let started = next_level(&mut self.state);
        if started {
            self.countdown.elapsed = 0.0;
        }
        started
    }

    /// Start a fresh run after game over
    pub fn restart(&mut self) {
        if !self.is_active() {
            return;
        }
        self.state.reset();
        self.frame.elapsed = 0.0;
        self.countdown.elapsed = 0.0;
        log::info!("Session restarted (seed {})", self.state.seed);
    }

    /// Cancel both schedules together
    pub fn teardown(&mut self) {
        if self.is_active() {
            self.frame.cancel();
            self.countdown.cancel();
            log::info!("Session torn down at score {}", self.state.score);
        }
    }

    pub fn is_active(&self) -> bool {
        self.frame.active && self.countdown.active
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("level", &self.state.wave.level)
            .field("score", &self.state.score)
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}
