//! Bounded movement with wall clamping

use glam::Vec2;

use super::state::{Bounds, Speed};

/// Integrate `position` by `velocity` and keep the circle inside `bounds`.
///
/// Each axis is clamped on its own; hitting a wall zeroes that axis of the
/// velocity, so a corner hit stops both.
pub fn advance(velocity: &mut Speed, position: &mut Vec2, size: f32, dt: f32, bounds: &Bounds) {
    *position += velocity.value * dt;

    let (lo, hi) = bounds.inset(size);
    for axis in 0..2 {
        if position[axis] > hi[axis] {
            position[axis] = hi[axis];
            velocity.value[axis] = 0.0;
        } else if position[axis] < lo[axis] {
            position[axis] = lo[axis];
            velocity.value[axis] = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn speed(x: f32, y: f32) -> Speed {
        Speed {
            value: Vec2::new(x, y),
            max: 1.0,
        }
    }

    #[test]
    fn test_free_motion() {
        let bounds = Bounds::default();
        let mut vel = speed(0.5, -0.25);
        let mut pos = Vec2::ZERO;
        advance(&mut vel, &mut pos, 0.05, 0.1, &bounds);
        assert!((pos - Vec2::new(0.05, -0.025)).length() < 1e-6);
        assert_eq!(vel.value, Vec2::new(0.5, -0.25));
    }

    #[test]
    fn test_wall_hit_zeroes_axis() {
        let bounds = Bounds::default();
        let mut vel = speed(1.0, 0.2);
        let mut pos = Vec2::new(0.94, 0.0);
        advance(&mut vel, &mut pos, 0.05, 0.1, &bounds);
        let (_, hi) = bounds.inset(0.05);
        assert_eq!(pos.x, hi.x);
        assert!((pos.x - 0.95).abs() < 1e-6);
        assert_eq!(vel.value.x, 0.0);
        // Other axis untouched
        assert_eq!(vel.value.y, 0.2);
    }

    #[test]
    fn test_corner_hit_zeroes_both() {
        let bounds = Bounds::default();
        let mut vel = speed(-1.0, -1.0);
        let mut pos = Vec2::new(-0.94, -0.94);
        advance(&mut vel, &mut pos, 0.05, 0.1, &bounds);
        let (lo, _) = bounds.inset(0.05);
        assert_eq!(pos, lo);
        assert_eq!(vel.value, Vec2::ZERO);
    }

    proptest! {
        #[test]
        fn prop_stays_inside_walls(
            px in -0.95f32..0.95,
            py in -0.95f32..0.95,
            vx in -50.0f32..50.0,
            vy in -50.0f32..50.0,
            dt in 0.0f32..0.5,
        ) {
            let bounds = Bounds::default();
            let mut vel = speed(vx, vy);
            let mut pos = Vec2::new(px, py);
            let start = vel.value;
            advance(&mut vel, &mut pos, 0.05, dt, &bounds);

            let tol = 1e-6;
            prop_assert!(pos.x >= -0.95 - tol && pos.x <= 0.95 + tol);
            prop_assert!(pos.y >= -0.95 - tol && pos.y <= 0.95 + tol);
            // An axis either kept its velocity or was stopped by a wall
            prop_assert!(vel.value.x == start.x || vel.value.x == 0.0);
            prop_assert!(vel.value.y == start.y || vel.value.y == 0.0);
        }
    }
}
