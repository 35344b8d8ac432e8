#![cfg_attr(not(feature = "std"), no_std)]

use rand::Rng;

pub mod behavior;
pub mod bubbles;
mod personality;
#[cfg(feature = "std")]
mod stop;

pub use personality::{Personality, PersonalityProfile, SpeedRange};
#[cfg(feature = "std")]
pub use stop::StopFlag;

pub(crate) fn sqrt(value: f32) -> f32 {
    #[cfg(feature = "std")]
    {
        value.sqrt()
    }
    #[cfg(not(feature = "std"))]
    {
        libm::sqrtf(value)
    }
}

pub(crate) fn sin(value: f32) -> f32 {
    #[cfg(feature = "std")]
    {
        value.sin()
    }
    #[cfg(not(feature = "std"))]
    {
        libm::sinf(value)
    }
}

pub(crate) fn floor(value: f64) -> f64 {
    #[cfg(feature = "std")]
    {
        value.floor()
    }
    #[cfg(not(feature = "std"))]
    {
        libm::floor(value)
    }
}

/// Uniform draw over `[lo, hi)`, collapsing to `lo` for an empty range.
pub(crate) fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi <= lo {
        lo
    } else {
        lo + rng.gen::<f32>() * (hi - lo)
    }
}

/// A 2D vector in percent-of-tank units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2D {
    pub x: f32,
    pub y: f32,
}

impl Vector2D {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn magnitude(&self) -> f32 {
        sqrt(self.x * self.x + self.y * self.y)
    }

    /// Unit vector in the same direction, or zero when the vector has no length.
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 && mag.is_finite() {
            Self {
                x: self.x / mag,
                y: self.y / mag,
            }
        } else {
            Self::zero()
        }
    }

    pub fn distance(&self, other: &Vector2D) -> f32 {
        (*other - *self).magnitude()
    }
}

impl core::ops::Add for Vector2D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl core::ops::Sub for Vector2D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl core::ops::Mul<f32> for Vector2D {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self::new(self.x * scalar, self.y * scalar)
    }
}

impl core::ops::AddAssign for Vector2D {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

/// Axis-aligned rectangle, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vector2D,
    pub max: Vector2D,
}

impl Rect {
    pub const fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min: Vector2D::new(min_x, min_y),
            max: Vector2D::new(max_x, max_y),
        }
    }

    pub fn contains(&self, point: Vector2D) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    pub fn clamp(&self, point: Vector2D) -> Vector2D {
        Vector2D::new(
            point.x.max(self.min.x).min(self.max.x),
            point.y.max(self.min.y).min(self.max.y),
        )
    }

    /// Uniformly random point inside the rectangle.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vector2D {
        Vector2D::new(
            uniform(rng, self.min.x, self.max.x),
            uniform(rng, self.min.y, self.max.y),
        )
    }
}

/// Which way the fish image points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Horizontal scale the renderer applies to mirror the image.
    pub fn scale_x(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// What the renderer needs to place one fish for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderState {
    /// Clamped position with the wobble offset added to `y`.
    pub position: Vector2D,
    pub facing: Facing,
    /// Rotation in degrees, derived from the vertical step.
    pub tilt: f32,
}

/// Fixed tuning of the swimming behavior
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankConfig {
    /// Region new targets are drawn from.
    pub seek: Rect,
    /// Hard bounds the stored position never leaves.
    pub clamp: Rect,
    /// Region random starting positions are drawn from.
    pub spawn: Rect,
    pub arrival_threshold: f32,
    pub wobble_increment: f32,
    pub wobble_amplitude: f32,
    pub horizontal_damping: f32,
    pub vertical_damping: f32,
    /// Degrees of tilt per unit of vertical step.
    pub tilt_factor: f32,
}

impl Default for TankConfig {
    fn default() -> Self {
        Self {
            seek: Rect::new(5.0, 10.0, 80.0, 65.0),
            clamp: Rect::new(2.0, 5.0, 88.0, 70.0),
            spawn: Rect::new(5.0, 10.0, 75.0, 60.0),
            arrival_threshold: 3.0,
            wobble_increment: 0.1,
            wobble_amplitude: 0.3,
            horizontal_damping: 0.5,
            vertical_damping: 0.3,
            tilt_factor: 5.0,
        }
    }
}

/// A single fish swimming in the tank
#[derive(Debug, Clone, PartialEq)]
pub struct Fish {
    pub position: Vector2D,
    pub target: Vector2D,
    pub speed: f32,
    pub facing: Facing,
    pub wobble_phase: f32,
    pub personality: Personality,
}

impl Fish {
    /// Create a fish at `initial`, or at a random spot when no position is
    /// declared, with a freshly rolled speed and target.
    pub fn new<R: Rng + ?Sized>(
        personality: Personality,
        initial: Option<Vector2D>,
        profile: &PersonalityProfile,
        config: &TankConfig,
        rng: &mut R,
    ) -> Self {
        let position = initial.unwrap_or_else(|| config.spawn.sample(&mut *rng));
        let speed = profile.range(personality).sample(rng);
        let target = config.seek.sample(rng);
        Self::with_state(personality, position, target, speed)
    }

    pub fn with_state(
        personality: Personality,
        position: Vector2D,
        target: Vector2D,
        speed: f32,
    ) -> Self {
        Self {
            position,
            target,
            speed,
            facing: Facing::Right,
            wobble_phase: 0.0,
            personality,
        }
    }

    /// Advance one frame using this fish's personality range.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        profile: &PersonalityProfile,
        config: &TankConfig,
        rng: &mut R,
    ) -> RenderState {
        let range = profile.range(self.personality);
        behavior::step(self, range, config, rng)
    }
}

/// A fixed-capacity tank for embedded (no_std) environments
pub struct Tank<const N: usize> {
    pub fish: heapless::Vec<Fish, N>,
    pub config: TankConfig,
    pub profile: PersonalityProfile,
}

impl<const N: usize> Tank<N> {
    pub fn new(config: TankConfig, profile: PersonalityProfile) -> Self {
        Self {
            fish: heapless::Vec::new(),
            config,
            profile,
        }
    }

    /// Returns the fish back when the tank is full.
    pub fn add_fish(&mut self, fish: Fish) -> Result<(), Fish> {
        self.fish.push(fish)
    }

    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) -> heapless::Vec<RenderState, N> {
        let mut frames = heapless::Vec::new();
        for fish in self.fish.iter_mut() {
            // Capacity matches `fish`, so the push cannot fail.
            let _ = frames.push(fish.step(&self.profile, &self.config, rng));
        }
        frames
    }
}

/// A growable tank for std environments
#[cfg(feature = "std")]
pub struct TankStd {
    pub fish: Vec<Fish>,
    pub config: TankConfig,
    pub profile: PersonalityProfile,
}

#[cfg(feature = "std")]
impl TankStd {
    pub fn new(config: TankConfig, profile: PersonalityProfile) -> Self {
        Self {
            fish: Vec::new(),
            config,
            profile,
        }
    }

    /// Spawn one fish per personality at random positions.
    pub fn populate<R: Rng + ?Sized>(&mut self, personalities: &[Personality], rng: &mut R) {
        for &personality in personalities {
            let fish = Fish::new(personality, None, &self.profile, &self.config, rng);
            self.fish.push(fish);
        }
    }

    pub fn add_fish(&mut self, fish: Fish) {
        self.fish.push(fish);
    }

    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<RenderState> {
        self.fish
            .iter_mut()
            .map(|fish| fish.step(&self.profile, &self.config, &mut *rng))
            .collect()
    }
}
