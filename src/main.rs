//! Cube Siege headless entry point
//!
//! Runs an idle-mode session for a number of simulated seconds, shopping
//! between waves, and records the result on the leaderboard.
//!
//! Usage: `cube-siege [seconds] [seed]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::Path;
    use std::time::{SystemTime, UNIX_EPOCH};

    use cube_siege::audio::LogAudio;
    use cube_siege::consts::SIM_DT;
    use cube_siege::highscores::format_date;
    use cube_siege::sim::{GameEvent, GlobalUpgrade, PurchaseOutcome, TickInput, WeaponKind};
    use cube_siege::{HighScoreStore, Session, Settings, Tuning};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seconds: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(180);
    let now_secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(now_secs);

    log::info!("Cube Siege (headless) starting: {}s, seed {}", seconds, seed);

    let settings = Settings::load(Path::new("settings.json"));
    let tuning = Tuning::load(Path::new("tuning.json"));
    let store = HighScoreStore::new("highscores.json");

    let mut session = Session::new(seed, tuning, &settings)
        .with_audio(Box::new(LogAudio))
        .with_store(store)
        .with_date_label(format_date(now_secs));

    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let frames = (seconds as f32 / SIM_DT) as u64;
    let mut kills = 0u32;
    let mut final_score = None;

    for _ in 0..frames {
        for event in session.frame(SIM_DT, &input) {
            match event {
                GameEvent::EnemyKilled { .. } => kills += 1,
                GameEvent::GameOver { score } => final_score = Some(score),
                _ => {}
            }
        }
        if final_score.is_some() {
            break;
        }
        if session.state().wave.is_shop_open() {
            shop_round(&mut session);
            session.confirm_shop();
        }
    }

    let state = session.state();
    log::info!(
        "Run finished: level {}, score {}, {} kills, {:.0} health left",
        state.wave.level,
        final_score.unwrap_or(state.score),
        kills,
        state.player.health
    );
    if let Some(best) = session.high_scores().top_score() {
        log::info!("Best score on record: {}", best);
    }
    session.teardown();

    /// Spend score round-robin until nothing is affordable
    fn shop_round(session: &mut Session) {
        const PRIORITY: [GlobalUpgrade; 4] = [
            GlobalUpgrade::Health,
            GlobalUpgrade::Damage,
            GlobalUpgrade::Shield,
            GlobalUpgrade::FireRate,
        ];
        loop {
            let mut bought = false;
            for upgrade in PRIORITY {
                bought |= matches!(session.buy_global(upgrade), PurchaseOutcome::Bought { .. });
            }
            bought |= matches!(
                session.buy_weapon(WeaponKind::BrickGun),
                PurchaseOutcome::Bought { .. }
            );
            if !bought {
                break;
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
