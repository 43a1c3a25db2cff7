use rand::Rng;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::sleep;

pub const MIN_GAP_MS: u64 = 500;
pub const MAX_GAP_MS: u64 = 1500;

/// Global politeness gate: a random pause between consecutive dispatches.
///
/// The pause is taken while holding the lock, so callers on separate workers are
/// serialized through the same gap. The first dispatch goes out immediately.
pub struct Pacer {
    gap_ms: Option<(u64, u64)>,
    started: Mutex<bool>,
}

impl Pacer {
    pub fn polite() -> Self {
        Self { gap_ms: Some((MIN_GAP_MS, MAX_GAP_MS)), started: Mutex::new(false) }
    }

    /// No pauses. Only meant for tests against local mocks.
    pub fn disabled() -> Self {
        Self { gap_ms: None, started: Mutex::new(false) }
    }

    pub async fn wait(&self) {
        let Some((lo, hi)) = self.gap_ms else { return };
        let mut started = self.started.lock().await;
        if *started {
            sleep(jitter(lo, hi)).await;
        } else {
            *started = true;
        }
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Self::polite()
    }
}

fn jitter(lo: u64, hi: u64) -> Duration {
    Duration::from_millis(rand::thread_rng().gen_range(lo..=hi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_jitter_in_range() {
        for _ in 0..100 {
            let d = jitter(MIN_GAP_MS, MAX_GAP_MS);
            assert!(d >= Duration::from_millis(500) && d <= Duration::from_millis(1500));
        }
    }

    #[tokio::test]
    async fn test_first_wait_is_immediate() {
        let pacer = Pacer::polite();
        let start = Instant::now();
        pacer.wait().await;
        assert!(start.elapsed() < Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_second_wait_pauses() {
        let pacer = Pacer::polite();
        pacer.wait().await;
        let start = Instant::now();
        pacer.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(500));
    }
}
