/// Decides whether a progress update is worth a notification
///
/// Publishes when `progress` is a multiple of `max_progress / steps` or is
/// the final value. When `max_progress < steps` the interval is zero and
/// every update is published.
///
/// # Example
///
/// ```
/// use gallery_harvest::progress::should_publish;
///
/// // 47 items in 20 steps: every second item, plus the last one
/// assert!(should_publish(4, 47, 20));
/// assert!(!should_publish(5, 47, 20));
/// assert!(should_publish(47, 47, 20));
/// ```
pub fn should_publish(progress: u64, max_progress: u64, steps: u64) -> bool {
    if progress == max_progress {
        return true;
    }

    let interval = max_progress / steps.max(1);
    interval == 0 || progress % interval == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publishes_every_interval_and_final() {
        let published: Vec<u64> = (0..=47).filter(|&p| should_publish(p, 47, 20)).collect();

        let mut expected: Vec<u64> = (0..=46).step_by(2).collect();
        expected.push(47);
        assert_eq!(published, expected);
    }

    #[test]
    fn test_small_batches_always_publish() {
        assert!((0..=7).all(|p| should_publish(p, 7, 20)));
        assert!(should_publish(0, 0, 20));
    }

    #[test]
    fn test_event_count_is_bounded() {
        for max in [20u64, 100, 1000, 12345] {
            let count = (0..=max).filter(|&p| should_publish(p, max, 20)).count();
            assert!(count <= 22, "max {} published {} events", max, count);
        }
    }

    #[test]
    fn test_zero_steps_treated_as_one() {
        assert!(should_publish(10, 10, 0));
        assert!(should_publish(0, 10, 0));
        assert!(!should_publish(3, 10, 0));
    }
}
