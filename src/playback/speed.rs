use crate::config::SpeedProfile;

pub const STANDARD_SPEEDS: [f32; 4] = [1.0, 1.25, 1.5, 2.0];
pub const EXTENDED_SPEEDS: [f32; 5] = [0.75, 1.0, 1.25, 1.5, 2.0];
pub const DEFAULT_SPEED: f32 = 1.0;

pub fn presets(profile: SpeedProfile) -> &'static [f32] {
    match profile {
        SpeedProfile::Standard => &STANDARD_SPEEDS,
        SpeedProfile::Extended => &EXTENDED_SPEEDS,
    }
}

/// Position within a fixed preset list. Always points at a valid preset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedSelector {
    presets: &'static [f32],
    idx: usize,
}

impl SpeedSelector {
    pub fn new(profile: SpeedProfile) -> Self {
        let presets = presets(profile);
        Self {
            presets,
            idx: default_idx(presets),
        }
    }

    pub fn current(&self) -> f32 {
        self.presets[self.idx]
    }

    pub fn presets(&self) -> &'static [f32] {
        self.presets
    }

    pub fn cycle(&mut self) -> f32 {
        self.idx = (self.idx + 1) % self.presets.len();
        self.current()
    }

    /// Jump straight to a preset. Values outside the list are ignored.
    pub fn select(&mut self, speed: f32) -> bool {
        match self.presets.iter().position(|preset| *preset == speed) {
            Some(idx) => {
                self.idx = idx;
                true
            }
            None => false,
        }
    }

    pub fn reset(&mut self) {
        self.idx = default_idx(self.presets);
    }
}

fn default_idx(presets: &[f32]) -> usize {
    presets
        .iter()
        .position(|speed| *speed == DEFAULT_SPEED)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_profile_cycles_and_wraps() {
        let mut speed = SpeedSelector::new(SpeedProfile::Standard);
        assert_eq!(speed.current(), 1.0);
        assert_eq!(speed.cycle(), 1.25);
        assert_eq!(speed.cycle(), 1.5);
        assert_eq!(speed.cycle(), 2.0);
        assert_eq!(speed.cycle(), 1.0);
    }

    #[test]
    fn extended_profile_starts_at_normal_speed_and_wraps_to_slow() {
        let mut speed = SpeedSelector::new(SpeedProfile::Extended);
        assert_eq!(speed.current(), 1.0);
        speed.cycle();
        speed.cycle();
        speed.cycle();
        assert_eq!(speed.cycle(), 0.75);
    }

    #[test]
    fn select_ignores_unknown_speeds() {
        let mut speed = SpeedSelector::new(SpeedProfile::Standard);
        assert!(!speed.select(0.75));
        assert_eq!(speed.current(), 1.0);
        assert!(speed.select(1.5));
        assert_eq!(speed.current(), 1.5);
        speed.reset();
        assert_eq!(speed.current(), 1.0);
    }
}
