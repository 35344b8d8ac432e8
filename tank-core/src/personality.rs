use rand::Rng;

use crate::uniform;

/// Swimming temperament declared on each fish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Personality {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl Personality {
    /// Resolve a personality key. Unknown keys swim at medium speed.
    pub fn from_key(key: &str) -> Self {
        let key = key.trim();
        if key.eq_ignore_ascii_case("slow") {
            Personality::Slow
        } else if key.eq_ignore_ascii_case("fast") {
            Personality::Fast
        } else {
            Personality::Medium
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Personality::Slow => "slow",
            Personality::Medium => "medium",
            Personality::Fast => "fast",
        }
    }
}

impl core::fmt::Display for Personality {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive `[min, max]` range of per-frame speeds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedRange {
    pub min: f32,
    pub max: f32,
}

impl SpeedRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, speed: f32) -> bool {
        speed >= self.min && speed <= self.max
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        uniform(rng, self.min, self.max)
    }
}

/// Speed range for each personality
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersonalityProfile {
    pub slow: SpeedRange,
    pub medium: SpeedRange,
    pub fast: SpeedRange,
}

impl PersonalityProfile {
    pub fn range(&self, personality: Personality) -> SpeedRange {
        match personality {
            Personality::Slow => self.slow,
            Personality::Medium => self.medium,
            Personality::Fast => self.fast,
        }
    }

    /// Range for a raw personality key, falling back to medium.
    pub fn range_for_key(&self, key: &str) -> SpeedRange {
        self.range(Personality::from_key(key))
    }
}

impl Default for PersonalityProfile {
    fn default() -> Self {
        Self {
            slow: SpeedRange::new(0.3, 0.6),
            medium: SpeedRange::new(0.6, 1.2),
            fast: SpeedRange::new(1.2, 2.0),
        }
    }
}
