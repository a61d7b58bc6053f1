mod magnitude;
mod time_unit;

pub use magnitude::{BinaryBytes, DecimalBytes, MagnitudeUnit, MagnitudeUnitPicker, UnitLadder};
pub use time_unit::{scale, TimeUnit};

use crate::utils::NumberFormat;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

/// Progress observed at one render tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub current: i64,
    pub start: i64,
}

impl ProgressSnapshot {
    pub const fn new(current: i64, start: i64) -> Self {
        Self { current, start }
    }

    /// Progress made since `start`. May be negative.
    pub const fn delta(&self) -> i64 {
        self.current.wrapping_sub(self.start)
    }
}

/// Renders speeds such as `3.42MB/s`, picking the magnitude unit from the
/// rate itself.
#[derive(Clone)]
pub struct SpeedFormatter {
    time_unit: Option<TimeUnit>,
    number_format: NumberFormat,
    picker: Arc<dyn MagnitudeUnitPicker>,
}

impl SpeedFormatter {
    /// Seconds, the default number format and the binary byte ladder.
    pub fn new() -> Self {
        Self {
            time_unit: None,
            number_format: NumberFormat::default(),
            picker: Arc::new(BinaryBytes),
        }
    }

    pub fn with_time_unit(mut self, unit: impl Into<Option<TimeUnit>>) -> Self {
        self.time_unit = unit.into();
        self
    }

    pub fn with_number_format(mut self, format: NumberFormat) -> Result<Self> {
        format.validate()?;
        self.number_format = format;
        Ok(self)
    }

    pub fn with_picker<P: MagnitudeUnitPicker + 'static>(self, picker: P) -> Self {
        self.with_shared_picker(Arc::new(picker))
    }

    pub fn with_shared_picker(mut self, picker: Arc<dyn MagnitudeUnitPicker>) -> Self {
        self.picker = picker;
        self
    }

    pub fn time_unit(&self) -> Option<TimeUnit> {
        self.time_unit
    }

    pub fn number_format(&self) -> &NumberFormat {
        &self.number_format
    }

    /// Formats the speed of `progress` over `elapsed`.
    ///
    /// Only whole seconds of `elapsed` are observed. With zero elapsed
    /// seconds the number is replaced by `?`, e.g. `?B/s`.
    pub fn format(&self, progress: ProgressSnapshot, elapsed: Duration) -> String {
        let elapsed_seconds = elapsed.as_secs() as f64;
        let (elapsed_in_unit, suffix) = scale(elapsed_seconds, self.time_unit);

        if elapsed_seconds == 0.0 {
            let unit = self.picker.unit(0);
            return format!("?{}{}", unit.label, suffix);
        }

        let raw_rate = progress.delta() as f64 / elapsed_in_unit;
        // `as` truncates toward zero and saturates
        let unit = self.picker.unit(raw_rate as i64);
        trace!(
            "Rate {} selected unit {} (divisor {})",
            raw_rate,
            unit.label,
            unit.divisor
        );

        let scaled = raw_rate / unit.divisor as f64;
        format!(
            "{}{}{}",
            self.number_format.format(scaled),
            unit.label,
            suffix
        )
    }
}

impl Default for SpeedFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SpeedFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeedFormatter")
            .field("time_unit", &self.time_unit)
            .field("number_format", &self.number_format)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::magnitude::MockMagnitudeUnitPicker;
    use super::*;
    use mockall::predicate::eq;
    use proptest::prelude::*;

    fn two_digits() -> SpeedFormatter {
        SpeedFormatter::new()
            .with_number_format(NumberFormat::fixed(2))
            .unwrap()
    }

    #[test]
    fn test_kilobytes_per_second() {
        let speed = two_digits().format(
            ProgressSnapshot::new(2_097_152, 0),
            Duration::from_secs(10),
        );
        assert_eq!(speed, "204.80KB/s");
    }

    #[test]
    fn test_bytes_per_minute() {
        let formatter = two_digits().with_time_unit(TimeUnit::Minutes);
        let speed = formatter.format(ProgressSnapshot::new(1024, 0), Duration::from_secs(120));
        assert_eq!(speed, "512.00B/min");

        let default_format = SpeedFormatter::new().with_time_unit(TimeUnit::Minutes);
        let speed = default_format.format(ProgressSnapshot::new(1024, 0), Duration::from_secs(120));
        assert_eq!(speed, "512B/min");
        assert!(speed.ends_with("/min"));
    }

    #[test]
    fn test_hours_and_days() {
        let hourly = two_digits().with_time_unit(TimeUnit::Hours);
        let speed = hourly.format(
            ProgressSnapshot::new(3 * 1024 * 1024 * 1024, 0),
            Duration::from_secs(3600),
        );
        assert_eq!(speed, "3.00GB/h");

        let daily = two_digits().with_time_unit(TimeUnit::Days);
        let speed = daily.format(
            ProgressSnapshot::new(1024 * 1024, 0),
            Duration::from_secs(43_200),
        );
        assert_eq!(speed, "2.00MB/d");
    }

    #[test]
    fn test_start_offset() {
        let speed = two_digits().format(
            ProgressSnapshot::new(10_240 + 500, 500),
            Duration::from_secs(5),
        );
        assert_eq!(speed, "2.00KB/s");
    }

    #[test]
    fn test_zero_elapsed_is_unknown() {
        let formatter = SpeedFormatter::new();
        assert_eq!(
            formatter.format(ProgressSnapshot::new(0, 0), Duration::ZERO),
            "?B/s"
        );
        assert_eq!(
            formatter.format(ProgressSnapshot::new(1 << 40, 0), Duration::from_millis(999)),
            "?B/s"
        );

        let hourly = SpeedFormatter::new().with_time_unit(TimeUnit::Hours);
        assert_eq!(
            hourly.format(ProgressSnapshot::new(-7, 0), Duration::ZERO),
            "?B/h"
        );
    }

    #[test]
    fn test_sub_second_precision_discarded() {
        let formatter = two_digits();
        let speed = formatter.format(ProgressSnapshot::new(2048, 0), Duration::from_millis(1999));
        assert_eq!(speed, "2.00KB/s");
    }

    #[test]
    fn test_negative_rate_stays_in_bytes() {
        let speed = two_digits().format(
            ProgressSnapshot::new(0, 4 * 1024 * 1024),
            Duration::from_secs(2),
        );
        assert_eq!(speed, "-2097152.00B/s");
    }

    #[test]
    fn test_zero_progress() {
        let speed = two_digits().format(ProgressSnapshot::new(5, 5), Duration::from_secs(3));
        assert_eq!(speed, "0.00B/s");
    }

    #[test]
    fn test_alternative_pickers() {
        let decimal = two_digits().with_picker(DecimalBytes);
        assert_eq!(
            decimal.format(ProgressSnapshot::new(3_000_000, 0), Duration::from_secs(1)),
            "3.00MB/s"
        );

        let items = SpeedFormatter::new().with_picker(UnitLadder::counts());
        assert_eq!(
            items.format(ProgressSnapshot::new(45_000, 0), Duration::from_secs(10)),
            "4.5K/s"
        );
    }

    #[test]
    fn test_picker_receives_truncated_rate() {
        let mut picker = MockMagnitudeUnitPicker::new();
        // 10 / 3 = 3.33.. truncates to 3
        picker
            .expect_unit()
            .with(eq(3))
            .times(1)
            .return_const(MagnitudeUnit::new(" items", 1));

        let formatter = two_digits().with_picker(picker);
        let speed = formatter.format(ProgressSnapshot::new(10, 0), Duration::from_secs(3));
        assert_eq!(speed, "3.33 items/s");
    }

    #[test]
    fn test_zero_elapsed_asks_for_zero_rate_unit() {
        let mut picker = MockMagnitudeUnitPicker::new();
        picker
            .expect_unit()
            .with(eq(0))
            .times(1)
            .return_const(MagnitudeUnit::new("ops", 1));

        let formatter = SpeedFormatter::new()
            .with_time_unit(TimeUnit::Minutes)
            .with_picker(picker);
        assert_eq!(
            formatter.format(ProgressSnapshot::new(99, 0), Duration::ZERO),
            "?ops/min"
        );
    }

    #[test]
    fn test_invalid_number_format_rejected() {
        let result = SpeedFormatter::new().with_number_format(NumberFormat {
            min_fraction_digits: 3,
            max_fraction_digits: 1,
            ..NumberFormat::default()
        });
        assert!(result.is_err());
    }

    proptest! {
        #[test]
        fn prop_zero_elapsed_prefixed(current in any::<i64>(), start in any::<i64>(), millis in 0u64..1000) {
            let speed = SpeedFormatter::new()
                .format(ProgressSnapshot::new(current, start), Duration::from_millis(millis));
            prop_assert!(speed.starts_with('?'));
        }

        #[test]
        fn prop_format_is_idempotent(current in any::<i64>(), start in any::<i64>(), secs in 0u64..1_000_000) {
            let formatter = SpeedFormatter::new().with_time_unit(TimeUnit::Minutes);
            let snapshot = ProgressSnapshot::new(current, start);
            let elapsed = Duration::from_secs(secs);
            prop_assert_eq!(formatter.format(snapshot, elapsed), formatter.format(snapshot, elapsed));
        }
    }
}
