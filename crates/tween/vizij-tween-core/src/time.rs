//! Frame delta providers for [`crate::Engine::tick`].

/// Supplies the delta time of each frame, in seconds.
pub trait TimeSource {
    fn delta_time(&mut self) -> f32;
}

/// Constant step, the usual choice for tests and fixed-rate hosts.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FixedTimeSource {
    pub step: f32,
}

impl FixedTimeSource {
    pub const fn new(step: f32) -> Self {
        Self { step }
    }

    /// Step for a fixed frame rate.
    pub fn from_fps(fps: f32) -> Self {
        Self::new(if fps > 0.0 { 1.0 / fps } else { 0.0 })
    }
}

impl TimeSource for FixedTimeSource {
    #[inline]
    fn delta_time(&mut self) -> f32 {
        self.step
    }
}

impl<F: FnMut() -> f32> TimeSource for F {
    #[inline]
    fn delta_time(&mut self) -> f32 {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_report_steps() {
        let mut fixed = FixedTimeSource::from_fps(50.0);
        assert_eq!(fixed.delta_time(), 0.02);
        let mut frames = [0.1f32, 0.2].into_iter();
        let mut scripted = move || frames.next().unwrap_or(0.0);
        assert_eq!(scripted.delta_time(), 0.1);
        assert_eq!(scripted.delta_time(), 0.2);
        assert_eq!(scripted.delta_time(), 0.0);
    }
}
