use bytemuck::{Pod, Zeroable};

/// Uniform state for one pass, uploaded to that pass's buffer before its
/// draw. Layout matches the std140 `PassParams` block in `compile.rs`.
///
/// Each pass owns an independent instance; the driver advances both by the
/// same per-frame delta, so the two `time` counters stay numerically equal
/// for the lifetime of the run.
#[repr(C, align(16))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PassUniforms {
    pub resolution: [f32; 2],
    pub time: f32,
    pub time_delta: f32,
}

unsafe impl Zeroable for PassUniforms {}
unsafe impl Pod for PassUniforms {}

impl PassUniforms {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            resolution: [width as f32, height as f32],
            time: 0.0,
            time_delta: 0.0,
        }
    }

    pub fn set_resolution(&mut self, width: f32, height: f32) {
        self.resolution = [width, height];
    }

    /// Accumulates one frame's delta onto the running time.
    pub fn advance(&mut self, delta: f32) {
        self.time += delta;
        self.time_delta = delta;
    }

    /// Pins the counter to a fixed timestamp (still mode).
    pub fn set_time(&mut self, time: f32) {
        self.time = time;
        self.time_delta = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_the_std140_block() {
        assert_eq!(std::mem::size_of::<PassUniforms>(), 16);
        assert_eq!(std::mem::align_of::<PassUniforms>(), 16);
    }

    #[test]
    fn counters_advanced_by_the_same_deltas_stay_equal() {
        let mut noise = PassUniforms::new(1600, 1200);
        let mut composite = PassUniforms::new(1600, 1200);
        let mut last = 0.0f32;
        for delta in [0.016, 0.017, 0.0, 0.25, 0.016] {
            noise.advance(delta);
            composite.advance(delta);
            assert_eq!(noise.time, composite.time);
            assert!(noise.time >= last, "time went backwards");
            last = noise.time;
        }
    }

    #[test]
    fn pinning_resets_the_delta() {
        let mut uniforms = PassUniforms::new(8, 8);
        uniforms.advance(0.5);
        uniforms.set_time(42.0);
        assert_eq!(uniforms.time, 42.0);
        assert_eq!(uniforms.time_delta, 0.0);
    }
}
