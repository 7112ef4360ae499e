// Drift model - Numeric primitives shared by every generator
use rand::Rng;

/// Clamp `value` into `[min, max]`. Total: never panics, even for inverted bounds.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

/// First-order exponential smoothing step from `current` toward `target`.
///
/// `speed` is in (0, 1]; a larger speed converges faster. This only exists to
/// keep consecutive samples free of visual jumps, it is not a physical model.
pub fn drift(current: f64, target: f64, speed: f64) -> f64 {
    current + (target - current) * speed
}

/// Uniform sample in `[min, max)` drawn from the injected random source.
pub fn random_in_range<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    rng.random::<f64>() * (max - min) + min
}

/// Round to a fixed number of decimal places (reported sample precision).
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(120.0, 0.0, 100.0), 100.0);
        assert_eq!(clamp(-3.0, 0.0, 100.0), 0.0);
        assert_eq!(clamp(42.0, 0.0, 100.0), 42.0);
    }

    #[test]
    fn test_drift_moves_fractionally_toward_target() {
        assert_eq!(drift(0.0, 100.0, 0.1), 10.0);
        assert_eq!(drift(50.0, 50.0, 0.3), 50.0);
        assert_eq!(drift(10.0, 20.0, 1.0), 20.0);
    }

    #[test]
    fn test_drift_converges() {
        let mut value = 0.0;
        for _ in 0..200 {
            value = drift(value, 30.0, 0.2);
        }
        assert!((value - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_random_in_range_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let v = random_in_range(&mut rng, -5.0, 8.0);
            assert!((-5.0..8.0).contains(&v));
        }
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(84.99, 1), 85.0);
        assert_eq!(round_to(71.94, 1), 71.9);
        assert_eq!(round_to(12.5, 0), 13.0);
    }
}
