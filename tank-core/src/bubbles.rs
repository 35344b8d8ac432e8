//! Decorative bubbles rising through the tank.
//!
//! Bubbles never interact with fish. Every interval the field rolls once
//! against the spawn probability; each bubble lives for a fixed lifetime
//! before the host should remove it.

use rand::Rng;

use crate::{floor, uniform};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BubbleConfig {
    pub interval_ms: f64,
    pub spawn_probability: f32,
    pub lifetime_ms: f64,
    /// Horizontal placement range, in percent of the tank width.
    pub left: (f32, f32),
    /// Diameter range in pixels.
    pub size: (f32, f32),
    /// Duration range of the rise animation in seconds.
    pub rise_secs: (f32, f32),
}

impl Default for BubbleConfig {
    fn default() -> Self {
        Self {
            interval_ms: 2000.0,
            spawn_probability: 0.3,
            lifetime_ms: 6000.0,
            left: (5.0, 95.0),
            size: (4.0, 12.0),
            rise_secs: (3.0, 6.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bubble {
    pub id: u32,
    pub left: f32,
    pub size: f32,
    pub rise_secs: f32,
    pub born_ms: f64,
}

/// Fixed-capacity set of live bubbles plus the spawn timer
pub struct BubbleField<const N: usize> {
    pub config: BubbleConfig,
    bubbles: heapless::Vec<Bubble, N>,
    next_tick_ms: f64,
    next_id: u32,
}

impl<const N: usize> BubbleField<N> {
    pub fn new(config: BubbleConfig, start_ms: f64) -> Self {
        Self {
            config,
            bubbles: heapless::Vec::new(),
            next_tick_ms: start_ms + config.interval_ms,
            next_id: 0,
        }
    }

    pub fn live(&self) -> &[Bubble] {
        &self.bubbles
    }

    /// Roll for a new bubble if an interval has elapsed since the last roll.
    ///
    /// Missed intervals are not replayed: a host that stalls for ten seconds
    /// gets one roll, not five. A bubble rolled while the field is full is
    /// dropped.
    pub fn tick<R: Rng + ?Sized>(&mut self, now_ms: f64, rng: &mut R) -> Option<Bubble> {
        if now_ms < self.next_tick_ms {
            return None;
        }

        let interval = self.config.interval_ms;
        if interval > 0.0 && interval.is_finite() {
            let missed = floor((now_ms - self.next_tick_ms) / interval) + 1.0;
            self.next_tick_ms += missed * interval;
            if self.next_tick_ms <= now_ms {
                // Interval below the clock's resolution at this time.
                self.next_tick_ms = now_ms + interval;
            }
        } else {
            self.next_tick_ms = now_ms;
        }

        if rng.gen::<f32>() >= self.config.spawn_probability {
            return None;
        }

        let bubble = Bubble {
            id: self.next_id,
            left: uniform(rng, self.config.left.0, self.config.left.1),
            size: uniform(rng, self.config.size.0, self.config.size.1),
            rise_secs: uniform(rng, self.config.rise_secs.0, self.config.rise_secs.1),
            born_ms: now_ms,
        };
        self.next_id = self.next_id.wrapping_add(1);

        self.bubbles.push(bubble).ok()?;
        Some(bubble)
    }

    /// Remove and return every bubble that has outlived its lifetime.
    pub fn expire(&mut self, now_ms: f64) -> heapless::Vec<Bubble, N> {
        let lifetime = self.config.lifetime_ms;
        let mut expired = heapless::Vec::new();
        let mut index = 0;
        while index < self.bubbles.len() {
            if now_ms - self.bubbles[index].born_ms >= lifetime {
                let _ = expired.push(self.bubbles.swap_remove(index));
            } else {
                index += 1;
            }
        }
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn always() -> BubbleConfig {
        BubbleConfig {
            spawn_probability: 1.0,
            ..BubbleConfig::default()
        }
    }

    #[test]
    fn test_no_roll_before_interval() {
        let mut rng = StdRng::seed_from_u64(41);
        let mut field: BubbleField<8> = BubbleField::new(always(), 0.0);

        assert!(field.tick(0.0, &mut rng).is_none());
        assert!(field.tick(1999.0, &mut rng).is_none());
        assert!(field.tick(2000.0, &mut rng).is_some());
        assert!(field.tick(2500.0, &mut rng).is_none());
        assert!(field.tick(4000.0, &mut rng).is_some());
    }

    #[test]
    fn test_missed_intervals_roll_once() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut field: BubbleField<8> = BubbleField::new(always(), 0.0);

        assert!(field.tick(10_500.0, &mut rng).is_some());
        assert!(field.tick(11_000.0, &mut rng).is_none());
        assert!(field.tick(12_000.0, &mut rng).is_some());
    }

    #[test]
    fn test_catch_up_is_constant_time() {
        let mut rng = StdRng::seed_from_u64(48);
        let config = BubbleConfig {
            interval_ms: 1e-300,
            ..always()
        };
        let mut field: BubbleField<8> = BubbleField::new(config, 0.0);

        assert!(field.tick(1.0, &mut rng).is_some());
        assert!(field.tick(1e12, &mut rng).is_some());
    }

    #[test]
    fn test_catch_up_lands_on_interval_grid() {
        let mut rng = StdRng::seed_from_u64(49);
        let mut field: BubbleField<8> = BubbleField::new(always(), 0.0);

        assert!(field.tick(1e9 + 500.0, &mut rng).is_some());
        assert!(field.tick(1e9 + 1999.0, &mut rng).is_none());
        assert!(field.tick(1e9 + 2000.0, &mut rng).is_some());
    }

    #[test]
    fn test_zero_probability_never_spawns() {
        let mut rng = StdRng::seed_from_u64(43);
        let config = BubbleConfig {
            spawn_probability: 0.0,
            ..BubbleConfig::default()
        };
        let mut field: BubbleField<8> = BubbleField::new(config, 0.0);

        for n in 1..100 {
            assert!(field.tick(n as f64 * 2000.0, &mut rng).is_none());
        }
    }

    #[test]
    fn test_spawn_rate_near_probability() {
        let mut rng = StdRng::seed_from_u64(44);
        let mut field: BubbleField<4> = BubbleField::new(BubbleConfig::default(), 0.0);

        let mut spawned = 0;
        for n in 1..=10_000 {
            let now = n as f64 * 2000.0;
            field.expire(now);
            if field.tick(now, &mut rng).is_some() {
                spawned += 1;
            }
        }
        assert!((2_500..3_500).contains(&spawned), "spawned {}", spawned);
    }

    #[test]
    fn test_bubble_attributes_in_range() {
        let mut rng = StdRng::seed_from_u64(45);
        let mut field: BubbleField<64> = BubbleField::new(always(), 0.0);

        for n in 1..=50 {
            let bubble = field.tick(n as f64 * 2000.0, &mut rng).unwrap();
            assert!(bubble.left >= 5.0 && bubble.left <= 95.0);
            assert!(bubble.size >= 4.0 && bubble.size <= 12.0);
            assert!(bubble.rise_secs >= 3.0 && bubble.rise_secs <= 6.0);
            assert_eq!(bubble.id, n - 1);
        }
    }

    #[test]
    fn test_expire_after_lifetime() {
        let mut rng = StdRng::seed_from_u64(46);
        let mut field: BubbleField<8> = BubbleField::new(always(), 0.0);

        let first = field.tick(2000.0, &mut rng).unwrap();
        let second = field.tick(4000.0, &mut rng).unwrap();

        assert!(field.expire(7999.0).is_empty());
        let expired = field.expire(8000.0);
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].id, first.id);
        assert_eq!(field.live().len(), 1);
        assert_eq!(field.live()[0].id, second.id);
    }

    #[test]
    fn test_full_field_drops_bubble() {
        let mut rng = StdRng::seed_from_u64(47);
        let mut field: BubbleField<1> = BubbleField::new(always(), 0.0);

        assert!(field.tick(2000.0, &mut rng).is_some());
        assert!(field.tick(4000.0, &mut rng).is_none());
        assert_eq!(field.live().len(), 1);
    }
}
