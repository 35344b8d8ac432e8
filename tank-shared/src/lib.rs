use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tank_core::bubbles::BubbleConfig;
use tank_core::{PersonalityProfile, Rect, RenderState, SpeedRange, TankConfig};

fn default_personality() -> String {
    "medium".to_string()
}

/// A fish living in the tank roster
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FishRecord {
    pub id: String,
    pub name: String,
    pub image_url: String,
    /// Stored as entered; unknown values swim at medium speed.
    #[serde(default = "default_personality")]
    pub personality: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when adding a fish
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewFish {
    pub name: String,
    pub image_url: String,
    #[serde(default = "default_personality")]
    pub personality: String,
    #[serde(default)]
    pub description: String,
}

impl NewFish {
    pub fn new(name: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image_url: image_url.into(),
            personality: default_personality(),
            description: String::new(),
        }
    }

    pub fn into_record(self, id: String, created_at: DateTime<Utc>) -> FishRecord {
        FishRecord {
            id,
            name: self.name,
            image_url: self.image_url,
            personality: self.personality,
            description: self.description,
            created_at,
        }
    }
}

/// Partial edit of a fish; only `Some` fields are applied
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FishUpdate {
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub personality: Option<String>,
    pub description: Option<String>,
}

impl FishUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.image_url.is_none()
            && self.personality.is_none()
            && self.description.is_none()
    }

    pub fn apply(self, record: &mut FishRecord) {
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(image_url) = self.image_url {
            record.image_url = image_url;
        }
        if let Some(personality) = self.personality {
            record.personality = personality;
        }
        if let Some(description) = self.description {
            record.description = description;
        }
    }
}

/// One fish's placement for one frame, in the shape hosts consume
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderFrame {
    pub id: String,
    /// Percent of tank width.
    pub left: f32,
    /// Percent of tank height, wobble included.
    pub top: f32,
    pub scale_x: f32,
    /// Degrees.
    pub tilt: f32,
}

impl RenderFrame {
    pub fn from_state(id: impl Into<String>, state: &RenderState) -> Self {
        Self {
            id: id.into(),
            left: state.position.x,
            top: state.position.y,
            scale_x: state.facing.scale_x(),
            tilt: state.tilt,
        }
    }

    /// CSS transform for the fish image.
    pub fn transform(&self) -> String {
        format!("scaleX({}) rotate({}deg)", self.scale_x, self.tilt)
    }
}

/// `[min, max]` pair as it appears in settings files
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }
}

/// Axis-aligned bounds as they appear in settings files
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Bounds {
    pub x: Range,
    pub y: Range,
}

impl Bounds {
    fn from_rect(rect: Rect) -> Self {
        Self {
            x: Range::new(rect.min.x, rect.max.x),
            y: Range::new(rect.min.y, rect.max.y),
        }
    }

    fn to_rect(self) -> Rect {
        Rect::new(self.x.min, self.y.min, self.x.max, self.y.max)
    }
}

/// Shortest bubble interval a settings file may ask for.
pub const MIN_BUBBLE_INTERVAL_MS: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("bubble interval must be a finite number of at least 1 ms, got {0}")]
    BubbleInterval(f64),
    #[error("bubble lifetime must be a finite, non-negative number of ms, got {0}")]
    BubbleLifetime(f64),
}

/// Tank tuning, loadable from JSON. Missing fields keep their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TankSettings {
    pub slow: Range,
    pub medium: Range,
    pub fast: Range,
    pub seek: Bounds,
    pub clamp: Bounds,
    pub spawn: Bounds,
    pub arrival_threshold: f32,
    pub wobble_increment: f32,
    pub wobble_amplitude: f32,
    pub horizontal_damping: f32,
    pub vertical_damping: f32,
    pub tilt_factor: f32,
    pub bubble_interval_ms: f64,
    pub bubble_probability: f32,
    pub bubble_lifetime_ms: f64,
}

impl Default for TankSettings {
    fn default() -> Self {
        let config = TankConfig::default();
        let profile = PersonalityProfile::default();
        let bubbles = BubbleConfig::default();
        Self {
            slow: Range::new(profile.slow.min, profile.slow.max),
            medium: Range::new(profile.medium.min, profile.medium.max),
            fast: Range::new(profile.fast.min, profile.fast.max),
            seek: Bounds::from_rect(config.seek),
            clamp: Bounds::from_rect(config.clamp),
            spawn: Bounds::from_rect(config.spawn),
            arrival_threshold: config.arrival_threshold,
            wobble_increment: config.wobble_increment,
            wobble_amplitude: config.wobble_amplitude,
            horizontal_damping: config.horizontal_damping,
            vertical_damping: config.vertical_damping,
            tilt_factor: config.tilt_factor,
            bubble_interval_ms: bubbles.interval_ms,
            bubble_probability: bubbles.spawn_probability,
            bubble_lifetime_ms: bubbles.lifetime_ms,
        }
    }
}

impl TankSettings {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn tank_config(&self) -> TankConfig {
        TankConfig {
            seek: self.seek.to_rect(),
            clamp: self.clamp.to_rect(),
            spawn: self.spawn.to_rect(),
            arrival_threshold: self.arrival_threshold,
            wobble_increment: self.wobble_increment,
            wobble_amplitude: self.wobble_amplitude,
            horizontal_damping: self.horizontal_damping,
            vertical_damping: self.vertical_damping,
            tilt_factor: self.tilt_factor,
        }
    }

    pub fn profile(&self) -> PersonalityProfile {
        PersonalityProfile {
            slow: SpeedRange::new(self.slow.min, self.slow.max),
            medium: SpeedRange::new(self.medium.min, self.medium.max),
            fast: SpeedRange::new(self.fast.min, self.fast.max),
        }
    }

    pub fn bubble_config(&self) -> Result<BubbleConfig, SettingsError> {
        let interval = self.bubble_interval_ms;
        if !interval.is_finite() || interval < MIN_BUBBLE_INTERVAL_MS {
            return Err(SettingsError::BubbleInterval(interval));
        }
        let lifetime = self.bubble_lifetime_ms;
        if !lifetime.is_finite() || lifetime < 0.0 {
            return Err(SettingsError::BubbleLifetime(lifetime));
        }
        Ok(BubbleConfig {
            interval_ms: interval,
            spawn_probability: self.bubble_probability,
            lifetime_ms: lifetime,
            ..BubbleConfig::default()
        })
    }
}
