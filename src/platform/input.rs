//! Steering input

use glam::Vec2;

/// Source of the point players steer toward
pub trait InputProvider {
    /// World-space target, sampled once per player per frame
    fn current_target_point(&mut self) -> Vec2;
}

/// Always the same point
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedTarget(pub Vec2);

impl InputProvider for FixedTarget {
    fn current_target_point(&mut self) -> Vec2 {
        self.0
    }
}

/// Target circling the origin, advancing a fixed angle per sample.
/// Stands in for a mouse in headless runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitTarget {
    pub radius: f32,
    /// Radians per sample
    pub step: f32,
    angle: f32,
}

impl OrbitTarget {
    pub fn new(radius: f32, step: f32) -> Self {
        Self {
            radius,
            step,
            angle: 0.0,
        }
    }
}

impl InputProvider for OrbitTarget {
    fn current_target_point(&mut self) -> Vec2 {
        let point = Vec2::from_angle(self.angle) * self.radius;
        self.angle = (self.angle + self.step) % std::f32::consts::TAU;
        point
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orbit_stays_on_circle() {
        let mut orbit = OrbitTarget::new(0.5, 0.3);
        for _ in 0..50 {
            let p = orbit.current_target_point();
            assert!((p.length() - 0.5).abs() < 1e-5);
        }
    }
}
