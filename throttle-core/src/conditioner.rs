//! Signal conditioning: dead zone, clamp and linear rescale.
//!
//! The throttle potentiometer only sweeps part of the 12-bit ADC range, and
//! the resting position is noisy. The transform pins everything at or below
//! [`DEADZONE_MIN`] to zero, everything at or above [`ADC_MAX`] to full scale,
//! and maps the span in between linearly onto `0..=REPORT_MAX`.

/// Raw readings at or below this value report zero.
pub const DEADZONE_MIN: u16 = 1230;

/// Raw readings at or above this value report full scale.
pub const ADC_MAX: u16 = 2100;

/// Largest value carried in a report (the host sees `0..=REPORT_MAX`).
pub const REPORT_MAX: u16 = 32767;

const SPAN: u32 = (ADC_MAX - DEADZONE_MIN) as u32;

/// The intermediate values of one conditioning pass.
///
/// Only used for diagnostics; [`condition`] is what the device reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Conditioned {
    pub raw: u16,
    pub clamped: u16,
    pub scaled: u16,
}

impl Conditioned {
    /// Run the full transform, keeping every stage.
    #[must_use]
    pub fn from_raw(raw: u16) -> Self {
        let clamped = clamp(raw);
        Self {
            raw,
            clamped,
            scaled: scale(clamped),
        }
    }
}

/// Apply the dead zone and upper clamp.
#[inline]
#[must_use]
pub fn clamp(raw: u16) -> u16 {
    raw.clamp(DEADZONE_MIN, ADC_MAX)
}

/// Rescale a clamped reading onto `0..=REPORT_MAX`.
///
/// The product is computed in `u32` and truncated toward zero. Inputs outside
/// `DEADZONE_MIN..=ADC_MAX` are clamped first, so this never overflows.
#[inline]
#[must_use]
pub fn scale(clamped: u16) -> u16 {
    let offset = u32::from(clamp(clamped) - DEADZONE_MIN);
    // offset <= SPAN, so the quotient is <= REPORT_MAX and fits in u16.
    (offset * u32::from(REPORT_MAX) / SPAN) as u16
}

/// Map a raw ADC sample to the reported axis value.
///
/// Stateless and deterministic; monotonic non-decreasing over the whole
/// `u16` domain.
///
/// ```
/// use throttle_core::condition;
///
/// assert_eq!(condition(0), 0);
/// assert_eq!(condition(1230), 0);
/// assert_eq!(condition(1665), 16383);
/// assert_eq!(condition(2100), 32767);
/// assert_eq!(condition(4095), 32767);
/// ```
#[inline]
#[must_use]
pub fn condition(raw: u16) -> u16 {
    scale(clamp(raw))
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn test_below_deadzone_is_zero() {
        for raw in 0..=DEADZONE_MIN {
            assert_eq!(condition(raw), 0, "raw {raw}");
        }
    }

    #[test]
    fn test_above_max_is_full_scale() {
        for raw in ADC_MAX..=4095 {
            assert_eq!(condition(raw), REPORT_MAX, "raw {raw}");
        }
        assert_eq!(condition(u16::MAX), REPORT_MAX);
    }

    #[test]
    fn test_midpoint_truncates() {
        // 435 * 32767 / 870 = 16383.5
        assert_eq!(condition(1665), 16383);
    }

    #[test]
    fn test_one_step_above_deadzone() {
        // 1 * 32767 / 870 = 37.66
        assert_eq!(condition(DEADZONE_MIN + 1), 37);
    }

    #[test]
    fn test_one_step_below_max() {
        // 869 * 32767 / 870 = 32729.3
        assert_eq!(condition(ADC_MAX - 1), 32729);
    }

    #[test]
    fn test_monotonic_over_full_adc_range() {
        let mut previous = condition(0);
        for raw in 1..=4095u16 {
            let current = condition(raw);
            assert!(current >= previous, "raw {raw}: {current} < {previous}");
            previous = current;
        }
    }

    #[test]
    fn test_deterministic() {
        for raw in [0, 1230, 1500, 1665, 2099, 2100, 4095] {
            assert_eq!(condition(raw), condition(raw));
        }
    }

    #[test]
    fn test_clamp_stages() {
        assert_eq!(clamp(12), DEADZONE_MIN);
        assert_eq!(clamp(1800), 1800);
        assert_eq!(clamp(3000), ADC_MAX);
    }

    #[test]
    fn test_scale_clamps_out_of_range_input() {
        assert_eq!(scale(0), 0);
        assert_eq!(scale(u16::MAX), REPORT_MAX);
    }

    #[test]
    fn test_conditioned_keeps_stages() {
        let c = Conditioned::from_raw(3000);
        assert_eq!(
            c,
            Conditioned {
                raw: 3000,
                clamped: ADC_MAX,
                scaled: REPORT_MAX,
            }
        );
    }
}
