//! Headless frame loop for the tank.
//!
//! Steps every fish once per tick of a tokio interval and hands the frame to
//! a sink. Steps continue the random stream the school was drawn from. Movement is per frame, so a different `fps` changes how fast fish
//! cross the tank in wall-clock time.

use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tank_core::bubbles::BubbleField;
use tank_core::{Fish, Personality, PersonalityProfile, StopFlag, TankConfig};
use tank_shared::{FishRecord, RenderFrame, TankSettings};
use tokio::time::{Instant, MissedTickBehavior};

const MAX_BUBBLES: usize = 16;

#[derive(Debug, Clone)]
pub struct SwimOptions {
    pub fps: f64,
    /// Stop after this many frames; run until stopped when `None`.
    pub frames: Option<u64>,
    pub seed: Option<u64>,
}

impl Default for SwimOptions {
    fn default() -> Self {
        Self {
            fps: 60.0,
            frames: None,
            seed: None,
        }
    }
}

/// A fish in the loop, tagged with the id frames are reported under
pub struct Swimmer {
    pub id: String,
    pub fish: Fish,
}

/// One swimmer per roster entry, at random starting spots.
pub fn school_from_roster<R: Rng + ?Sized>(
    records: &[FishRecord],
    profile: &PersonalityProfile,
    config: &TankConfig,
    rng: &mut R,
) -> Vec<Swimmer> {
    records
        .iter()
        .map(|record| Swimmer {
            id: record.id.clone(),
            fish: Fish::new(
                Personality::from_key(&record.personality),
                None,
                profile,
                config,
                &mut *rng,
            ),
        })
        .collect()
}

/// Step every swimmer once and collect the frame.
pub fn step_school<R: Rng + ?Sized>(
    school: &mut [Swimmer],
    profile: &PersonalityProfile,
    config: &TankConfig,
    rng: &mut R,
) -> Vec<RenderFrame> {
    school
        .iter_mut()
        .map(|swimmer| {
            let state = swimmer.fish.step(profile, config, &mut *rng);
            RenderFrame::from_state(swimmer.id.as_str(), &state)
        })
        .collect()
}

pub fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Run the loop until `stop` is raised or the frame limit is reached.
/// Returns the number of frames handed to `sink`.
///
/// `rng` should be the stream `school` was drawn from, so re-targets never
/// replay spawn draws.
pub async fn swim<F>(
    mut school: Vec<Swimmer>,
    settings: &TankSettings,
    options: &SwimOptions,
    mut rng: StdRng,
    stop: StopFlag,
    mut sink: F,
) -> Result<u64>
where
    F: FnMut(u64, &[RenderFrame]) -> Result<()>,
{
    if !(options.fps > 0.0 && options.fps.is_finite()) {
        bail!("fps must be a positive number, got {}", options.fps);
    }
    let period = match Duration::try_from_secs_f64(1.0 / options.fps) {
        Ok(period) if !period.is_zero() => period,
        _ => bail!("fps {} is out of range", options.fps),
    };

    let config = settings.tank_config();
    let profile = settings.profile();
    // Bubbles roll on wall-clock time; a separate stream keeps seeded fish reproducible.
    let mut bubble_rng = rng_for(options.seed.map(|seed| seed.wrapping_add(1)));
    let mut bubbles: BubbleField<MAX_BUBBLES> =
        BubbleField::new(settings.bubble_config()?, 0.0);

    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let started = Instant::now();

    log::info!(
        "Swimming {} fish at {} fps{}",
        school.len(),
        options.fps,
        options
            .frames
            .map(|n| format!(" for {} frames", n))
            .unwrap_or_default()
    );

    let mut emitted = 0;
    loop {
        if stop.is_stopped() {
            log::info!("Stopped after {} frames", emitted);
            break;
        }
        if options.frames.is_some_and(|limit| emitted >= limit) {
            break;
        }

        ticker.tick().await;
        let now_ms = started.elapsed().as_secs_f64() * 1000.0;

        let frames = step_school(&mut school, &profile, &config, &mut rng);

        for bubble in bubbles.expire(now_ms) {
            log::debug!("Bubble {} popped", bubble.id);
        }
        if let Some(bubble) = bubbles.tick(now_ms, &mut bubble_rng) {
            log::debug!(
                "Bubble {} rising at {:.1}% ({:.1}px, {:.1}s)",
                bubble.id,
                bubble.left,
                bubble.size,
                bubble.rise_secs
            );
        }

        sink(emitted, &frames)?;
        emitted += 1;
    }

    Ok(emitted)
}
