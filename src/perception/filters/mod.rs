//! Filtering of proximity samples

/// Debounces proximity readings into a confirmed breach.
///
/// A sample below the threshold bumps the counter, anything else resets
/// it. A breach is confirmed once the counter exceeds the bound, so a
/// single noisy reading never tags anyone.
#[derive(Debug, Clone)]
pub struct ProximityBreachCounter {
    threshold_cm: f64,
    bound: u32,
    count: u32,
}

impl ProximityBreachCounter {
    /// Create a new counter
    pub fn new(threshold_cm: f64, bound: u32) -> Self {
        ProximityBreachCounter {
            threshold_cm,
            bound,
            count: 0,
        }
    }

    /// Feed a sample; returns `true` when it confirms a breach
    pub fn observe(&mut self, distance_cm: f64) -> bool {
        self.count = if distance_cm < self.threshold_cm {
            self.count + 1
        } else {
            0
        };
        self.count > self.bound
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_close_samples_confirm_a_breach() {
        let mut counter = ProximityBreachCounter::new(10.0, 3);
        let results: Vec<bool> = [9.0, 8.0, 7.0, 6.0].iter().map(|d| counter.observe(*d)).collect();
        assert_eq!(results, vec![false, false, false, true]);
    }

    #[test]
    fn a_far_sample_resets_the_count() {
        let mut counter = ProximityBreachCounter::new(10.0, 3);
        for distance in [9.0, 8.0, 7.0, 12.0] {
            assert!(!counter.observe(distance));
        }
        assert_eq!(counter.count(), 0);
        for distance in [9.0, 8.0, 7.0] {
            assert!(!counter.observe(distance));
        }
    }

    #[test]
    fn threshold_itself_is_not_close() {
        let mut counter = ProximityBreachCounter::new(10.0, 0);
        assert!(!counter.observe(10.0));
        assert!(counter.observe(9.99));
    }
}
