use std::time::Duration;

/// Capped exponential backoff for event-channel reconnects.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconnectPolicy {
    pub initial_delay: Duration,
    pub multiplier: f64,
    pub max_delay: Duration,
    /// `None` keeps retrying while the session is active.
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(3),
            multiplier: 2.0,
            max_delay: Duration::from_secs(30),
            max_attempts: Some(10),
        }
    }
}

impl ReconnectPolicy {
    /// Fixed delay, unbounded attempts.
    pub fn fixed(delay: Duration) -> Self {
        Self { initial_delay: delay, multiplier: 1.0, max_delay: delay, max_attempts: None }
    }

    /// Delay before reconnect `attempt` (1-based), or `None` once the
    /// attempt budget is spent.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 {
            return Some(Duration::ZERO);
        }
        if let Some(max) = self.max_attempts {
            if attempt > max {
                return None;
            }
        }
        let factor = self.multiplier.max(1.0).powi(attempt.saturating_sub(1).min(64) as i32);
        let secs = self.initial_delay.as_secs_f64() * factor;
        let capped = secs.min(self.max_delay.as_secs_f64());
        Some(Duration::from_secs_f64(capped.max(0.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule() {
        let p = ReconnectPolicy::default();
        let secs: Vec<u64> = (1..=6).map(|n| p.delay_for(n).unwrap().as_secs()).collect();
        assert_eq!(secs, vec![3, 6, 12, 24, 30, 30]);
    }

    #[test]
    fn test_exhaustion() {
        let p = ReconnectPolicy { max_attempts: Some(3), ..Default::default() };
        assert!(p.delay_for(3).is_some());
        assert!(p.delay_for(4).is_none());
    }

    #[test]
    fn test_unbounded_fixed() {
        let p = ReconnectPolicy::fixed(Duration::from_secs(3));
        assert_eq!(p.delay_for(1), Some(Duration::from_secs(3)));
        assert_eq!(p.delay_for(10_000), Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_huge_attempt_does_not_overflow() {
        let p = ReconnectPolicy { max_attempts: None, ..Default::default() };
        assert_eq!(p.delay_for(u32::MAX), Some(Duration::from_secs(30)));
    }
}
