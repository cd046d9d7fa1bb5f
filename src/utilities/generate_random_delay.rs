use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::{sleep, Duration};

/// Picks a delay in `min_delay..=max_delay` milliseconds.
pub fn random_delay(min_delay: u64, max_delay: u64) -> Duration {
    if max_delay <= min_delay {
        return Duration::from_millis(min_delay);
    }

    let mut rng = StdRng::from_entropy();
    Duration::from_millis(rng.gen_range(min_delay..=max_delay))
}

pub async fn generate_random_delay(min_delay: u64, max_delay: u64) {
    let delay = random_delay(min_delay, max_delay);

    if !delay.is_zero() {
        println!("Delay: {} milliseconds", delay.as_millis());
        sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_stays_in_range() {
        for _ in 0..100 {
            let delay = random_delay(10, 20);
            assert!(delay >= Duration::from_millis(10));
            assert!(delay <= Duration::from_millis(20));
        }
    }

    #[test]
    fn empty_range_is_the_lower_bound() {
        assert_eq!(random_delay(0, 0), Duration::ZERO);
        assert_eq!(random_delay(30, 5), Duration::from_millis(30));
    }

    #[tokio::test]
    async fn zero_delay_returns_immediately() {
        generate_random_delay(0, 0).await;
    }
}
