//! Capability tiers and animation duration presets
//!
//! Pure mappings from declared host capability to timing values. The tier is
//! always supplied by configuration; nothing in this crate probes the host.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Declared capability of the host terminal
///
/// `Low` suits constrained hosts (slow links, remote sessions) and shortens
/// motion; `High` allows slightly fuller motion on fast local terminals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityTier {
    Low,
    #[default]
    Standard,
    High,
}

/// Semantic duration buckets for animated transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationClass {
    /// Sub-perceptual feedback (cursor blinks, highlights)
    Micro,
    /// Small movements (single-line scrolls, focus changes)
    Short,
    /// Typical transitions (page scrolls, panel switches)
    Medium,
    /// Large transitions (full-screen changes)
    Long,
}

/// Preset duration for an animation class on a given tier
///
/// Reduced motion maps every class to zero, i.e. instant.
#[inline]
pub fn duration_for(class: DurationClass, tier: CapabilityTier, reduced_motion: bool) -> Duration {
    if reduced_motion {
        return Duration::ZERO;
    }
    let base_ms: u64 = match class {
        DurationClass::Micro => 50,
        DurationClass::Short => 120,
        DurationClass::Medium => 200,
        DurationClass::Long => 320,
    };
    let ms = match tier {
        CapabilityTier::Low => base_ms / 2,
        CapabilityTier::Standard => base_ms,
        CapabilityTier::High => base_ms + base_ms / 4,
    };
    Duration::from_millis(ms)
}

/// Tick interval for a target frame rate
#[inline]
pub fn frame_interval(fps: u16) -> Duration {
    if fps == 0 {
        Duration::from_millis(16) // ~60fps fallback
    } else {
        Duration::from_millis(1000 / fps as u64)
    }
}

/// Preset target frame rate per capability tier
#[inline]
pub fn fps_for(tier: CapabilityTier) -> u16 {
    match tier {
        CapabilityTier::Low => 30,
        CapabilityTier::Standard | CapabilityTier::High => 60,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_motion_is_instant() {
        for class in [
            DurationClass::Micro,
            DurationClass::Short,
            DurationClass::Medium,
            DurationClass::Long,
        ] {
            for tier in [
                CapabilityTier::Low,
                CapabilityTier::Standard,
                CapabilityTier::High,
            ] {
                assert_eq!(duration_for(class, tier, true), Duration::ZERO);
            }
        }
    }

    #[test]
    fn test_tier_ordering() {
        for class in [
            DurationClass::Micro,
            DurationClass::Short,
            DurationClass::Medium,
            DurationClass::Long,
        ] {
            let low = duration_for(class, CapabilityTier::Low, false);
            let standard = duration_for(class, CapabilityTier::Standard, false);
            let high = duration_for(class, CapabilityTier::High, false);
            assert!(low < standard, "{:?}: low should be shortest", class);
            assert!(standard < high, "{:?}: high should be longest", class);
        }
    }

    #[test]
    fn test_frame_interval_fallback() {
        assert_eq!(frame_interval(0), Duration::from_millis(16));
        assert_eq!(frame_interval(60), Duration::from_millis(16));
        assert_eq!(frame_interval(30), Duration::from_millis(33));
    }

    #[test]
    fn test_fps_for_tier() {
        assert_eq!(fps_for(CapabilityTier::Low), 30);
        assert_eq!(fps_for(CapabilityTier::Standard), 60);
        assert_eq!(fps_for(CapabilityTier::High), 60);
    }
}
