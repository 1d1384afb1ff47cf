//! Small shared settings types mutated by input each frame.

/// Exposure change per second while Q/E is held.
pub const EXPOSURE_STEP: f32 = 1.0;

/// Bloom toggle and tone-mapping exposure, consumed by the composite pass.
#[derive(Debug, Clone, Copy)]
pub struct BloomSettings {
    pub enabled: bool,
    pub exposure: f32,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            exposure: 1.0,
        }
    }
}

impl BloomSettings {
    /// Adjust exposure by held input. Exposure floors at zero and never
    /// goes negative.
    pub fn adjust_exposure(&mut self, up: bool, down: bool, dt: f32) {
        if up {
            self.exposure += EXPOSURE_STEP * dt;
        }
        if down {
            self.exposure = (self.exposure - EXPOSURE_STEP * dt).max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposure_floors_at_zero() {
        let mut bloom = BloomSettings::default();
        for _ in 0..100 {
            bloom.adjust_exposure(false, true, 0.1);
            assert!(bloom.exposure >= 0.0);
        }
        assert_eq!(bloom.exposure, 0.0);
        bloom.adjust_exposure(true, false, 0.5);
        assert!(bloom.exposure > 0.0);
    }
}
