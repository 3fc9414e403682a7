//! Frame clock

/// Monotonic frame time source. The world samples it once per tick.
pub trait Clock {
    /// Seconds since session start
    fn now(&self) -> f32;
    /// Seconds covered by the current frame
    fn delta_time(&self) -> f32;
}

/// Clock that moves only when told to, by a fixed step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedStepClock {
    now: f32,
    dt: f32,
}

impl FixedStepClock {
    pub fn new(dt: f32) -> Self {
        Self { now: 0.0, dt }
    }

    /// Move to the next frame
    pub fn advance(&mut self) {
        self.now += self.dt;
    }
}

impl Default for FixedStepClock {
    fn default() -> Self {
        Self::new(crate::consts::SIM_DT)
    }
}

impl Clock for FixedStepClock {
    fn now(&self) -> f32 {
        self.now
    }

    fn delta_time(&self) -> f32 {
        self.dt
    }
}
