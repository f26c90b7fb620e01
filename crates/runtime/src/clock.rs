use foundation::math::Rotation;
use foundation::time::Timestamp;

/// Spin source for the globe.
///
/// The spin angle is a pure function of the current time, so any tick can be
/// reproduced exactly from the clock and a timestamp.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AnimationClock {
    pub start: Timestamp,
    /// Degrees per millisecond.
    pub speed: f64,
    /// Fixed secondary tilt in degrees.
    pub tilt: f64,
}

impl AnimationClock {
    pub fn new(start: Timestamp, speed: f64, tilt: f64) -> Self {
        Self { start, speed, tilt }
    }

    pub fn spin_at(&self, now: Timestamp) -> f64 {
        self.speed * now.since(self.start)
    }

    pub fn rotation_at(&self, now: Timestamp) -> Rotation {
        Rotation::new(self.spin_at(now), self.tilt)
    }
}

#[cfg(test)]
mod tests {
    use super::AnimationClock;
    use foundation::math::Rotation;
    use foundation::time::Timestamp;

    #[test]
    fn spin_is_speed_times_elapsed() {
        let clock = AnimationClock::new(Timestamp::ZERO, -0.01, -15.0);
        assert_eq!(clock.spin_at(Timestamp(1000.0)), -10.0);
        assert_eq!(clock.rotation_at(Timestamp(1000.0)), Rotation::new(-10.0, -15.0));
        assert_eq!(clock.spin_at(Timestamp::ZERO), 0.0);
    }

    #[test]
    fn spin_follows_the_sign_of_speed() {
        let clock = AnimationClock::new(Timestamp(250.0), -0.01, -15.0);
        let mut previous = clock.spin_at(Timestamp(250.0));
        for step in 1..=100 {
            let now = Timestamp(250.0 + 16.7 * step as f64);
            let spin = clock.spin_at(now);
            assert!(spin < previous);
            previous = spin;
        }
    }

    #[test]
    fn repeated_queries_do_not_drift() {
        let clock = AnimationClock::new(Timestamp(100.0), -0.01, -15.0);
        let late = Timestamp(100.0 + 3_600_000.0);
        for _ in 0..1000 {
            clock.spin_at(Timestamp(12345.0));
        }
        assert_eq!(clock.spin_at(late), -0.01 * 3_600_000.0);
    }
}
