//! Per-frame swimming behavior.
//!
//! Each fish seeks a random point inside the seek rectangle. Once it gets
//! within the arrival threshold it picks a new point and a new speed. The
//! stored position is always clamped to the tank; the wobble only ever
//! reaches the rendered position.

use rand::Rng;

use crate::{sin, Facing, Fish, RenderState, SpeedRange, TankConfig, Vector2D};

/// Advance `fish` by one frame and report where to draw it.
///
/// On an arrival frame the fish holds still while it re-targets, so its
/// facing and tilt are left neutral for that frame.
pub fn step<R: Rng + ?Sized>(
    fish: &mut Fish,
    range: SpeedRange,
    config: &TankConfig,
    rng: &mut R,
) -> RenderState {
    let delta = fish.target - fish.position;
    let distance = delta.magnitude();

    let movement = if distance < config.arrival_threshold {
        retarget(fish, range, config, rng);
        Vector2D::zero()
    } else {
        let direction = delta.normalize();
        Vector2D::new(
            direction.x * fish.speed * config.horizontal_damping,
            direction.y * fish.speed * config.vertical_damping,
        )
    };

    fish.wobble_phase += config.wobble_increment;
    let wobble_offset = sin(fish.wobble_phase) * config.wobble_amplitude;

    fish.position = config.clamp.clamp(fish.position + movement);

    if movement.x > 0.0 {
        fish.facing = Facing::Right;
    } else if movement.x < 0.0 {
        fish.facing = Facing::Left;
    }

    RenderState {
        position: Vector2D::new(fish.position.x, fish.position.y + wobble_offset),
        facing: fish.facing,
        tilt: movement.y * config.tilt_factor,
    }
}

/// Pick a fresh target inside the seek rectangle and re-roll the speed.
pub fn retarget<R: Rng + ?Sized>(
    fish: &mut Fish,
    range: SpeedRange,
    config: &TankConfig,
    rng: &mut R,
) {
    fish.target = config.seek.sample(rng);
    fish.speed = range.sample(rng);
}
