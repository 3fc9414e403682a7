//! Steering toward the input target

use glam::Vec2;

use super::state::Speed;

/// Accelerate toward `target` at one unit/s², then cap speed at `velocity.max`.
///
/// A target exactly on `position` applies no acceleration; the cap is still
/// enforced.
pub fn steer(velocity: &mut Speed, position: Vec2, target: Vec2, dt: f32) {
    let delta = target - position;
    if delta != Vec2::ZERO {
        velocity.value += delta.normalize() * dt;
    }
    velocity.value = velocity.value.clamp_length_max(velocity.max);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_accelerates_toward_target() {
        let mut vel = Speed {
            value: Vec2::ZERO,
            max: 1.0,
        };
        steer(&mut vel, Vec2::ZERO, Vec2::new(3.0, 4.0), 0.5);
        assert!((vel.value - Vec2::new(0.3, 0.4)).length() < 1e-6);
    }

    #[test]
    fn test_zero_delta_applies_nothing() {
        let mut vel = Speed {
            value: Vec2::new(0.2, 0.0),
            max: 1.0,
        };
        steer(&mut vel, Vec2::ONE, Vec2::ONE, 0.5);
        assert_eq!(vel.value, Vec2::new(0.2, 0.0));
        assert!(vel.value.is_finite());
    }

    #[test]
    fn test_clamp_preserves_direction() {
        let mut vel = Speed {
            value: Vec2::new(3.0, 4.0),
            max: 1.0,
        };
        steer(&mut vel, Vec2::ZERO, Vec2::new(3.0, 4.0), 0.1);
        assert!((vel.value.length() - 1.0).abs() < 1e-5);
        assert!((vel.value.normalize() - Vec2::new(0.6, 0.8)).length() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_speed_never_exceeds_max(
            targets in proptest::collection::vec((-5.0f32..5.0, -5.0f32..5.0), 1..50),
            dt in 0.0f32..1.0,
        ) {
            let mut vel = Speed { value: Vec2::ZERO, max: 1.0 };
            for (x, y) in targets {
                steer(&mut vel, Vec2::ZERO, Vec2::new(x, y), dt);
                prop_assert!(vel.value.length() <= 1.0 + 1e-5);
            }
        }
    }
}
