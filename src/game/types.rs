use serde::{Deserialize, Serialize};

// ── Newtypes ────────────────────────────────────────────────────────

/// Monotonic game clock reading in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash, Serialize, Deserialize)]
pub struct Millis(pub u64);

impl Millis {
    pub const ZERO: Self = Self(0);

    pub fn plus(self, ms: u64) -> Self {
        Self(self.0.saturating_add(ms))
    }

    /// Milliseconds elapsed since `earlier`, zero if `earlier` is in the future.
    pub fn since(self, earlier: Millis) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// True while `now` has not reached this deadline.
    pub fn is_pending(self, now: Millis) -> bool {
        now < self
    }
}

/// Ability meter. Always clamped to [0, max].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Meter(pub u8);

impl Meter {
    pub fn add_clamped(self, delta: u8, max: u8) -> Self {
        Self(self.0.saturating_add(delta).min(max))
    }

    pub fn is_full(self, max: u8) -> bool {
        self.0 >= max
    }
}

// ── Enums ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Horizontal sign of a ball leaving this side's paddle.
    pub fn away_sign(self) -> f32 {
        match self {
            Self::Left => 1.0,
            Self::Right => -1.0,
        }
    }

    /// Player tag used in logs and the rally record.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Left => "P1",
            Self::Right => "P2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ControlEffect {
    /// No movement at all until the deadline.
    Freeze { until: Millis },
    /// Movement scaled by `ratio` until the deadline.
    Slow { until: Millis, ratio: f32 },
}

/// Active control effects on a paddle or the ball.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlState {
    pub frozen_until: Millis,
    pub slowed_until: Millis,
    pub slow_ratio: f32,
}

impl ControlState {
    pub fn is_frozen(&self, now: Millis) -> bool {
        self.frozen_until.is_pending(now)
    }

    pub fn is_slowed(&self, now: Millis) -> bool {
        self.slowed_until.is_pending(now)
    }

    /// Movement multiplier for this tick: 0 while frozen, the slow ratio while slowed.
    pub fn speed_factor(&self, now: Millis) -> f32 {
        if self.is_frozen(now) {
            0.0
        } else if self.is_slowed(now) {
            self.slow_ratio
        } else {
            1.0
        }
    }

    /// Longer deadline wins.
    pub fn apply(&mut self, effect: ControlEffect) {
        match effect {
            ControlEffect::Freeze { until } => {
                if until > self.frozen_until {
                    self.frozen_until = until;
                }
            }
            ControlEffect::Slow { until, ratio } => {
                if until > self.slowed_until {
                    self.slowed_until = until;
                    self.slow_ratio = ratio;
                }
            }
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meter_never_exceeds_max() {
        let m = Meter(7).add_clamped(2, 8);
        assert_eq!(m, Meter(8));
        assert!(m.is_full(8));
        assert_eq!(Meter(250).add_clamped(10, 8), Meter(8));
    }

    #[test]
    fn test_control_longer_deadline_wins() {
        let mut c = ControlState::default();
        c.apply(ControlEffect::Freeze { until: Millis(2000) });
        c.apply(ControlEffect::Freeze { until: Millis(750) });
        assert_eq!(c.frozen_until, Millis(2000));
        assert_eq!(c.speed_factor(Millis(1999)), 0.0);

        c.apply(ControlEffect::Slow { until: Millis(18000), ratio: 0.5 });
        assert_eq!(c.speed_factor(Millis(2000)), 0.5);
        assert_eq!(c.speed_factor(Millis(18000)), 1.0);
    }

    #[test]
    fn test_side_helpers() {
        assert_eq!(Side::Left.opponent(), Side::Right);
        assert_eq!(Side::Right.away_sign(), -1.0);
        assert_eq!(Side::Right.tag(), "P2");
        assert_eq!(Millis(100).since(Millis(250)), 0);
    }
}
