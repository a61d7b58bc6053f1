//! `indicatif` integration: exposes a [`SpeedFormatter`] as the `{speed}`
//! template key of a progress bar.

use crate::speed::{ProgressSnapshot, SpeedFormatter};
use crate::{Result, SpeedFormatError};
use indicatif::{ProgressState, ProgressStyle};
use std::fmt;
use std::time::Duration;

/// Template key the formatter is registered under.
pub const SPEED_KEY: &str = "speed";

/// Bar template showing byte counts alongside the dynamic speed.
pub const DEFAULT_TEMPLATE: &str =
    "[{elapsed_precise}] {bar:40.cyan/blue} {bytes}/{total_bytes} {speed} ({eta})";

/// Renders the speed of a progress bar that started counting at `start`.
#[derive(Debug, Clone)]
pub struct SpeedKey {
    formatter: SpeedFormatter,
    start: u64,
}

impl SpeedKey {
    pub fn new(formatter: SpeedFormatter, start: u64) -> Self {
        Self { formatter, start }
    }

    pub fn render(&self, position: u64, elapsed: Duration) -> String {
        let snapshot = ProgressSnapshot::new(saturating_i64(position), saturating_i64(self.start));
        self.formatter.format(snapshot, elapsed)
    }

    fn write(&self, state: &ProgressState, w: &mut dyn fmt::Write) {
        let _ = w.write_str(&self.render(state.pos(), state.elapsed()));
    }
}

fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Builds a style from `template` with `{speed}` bound to `formatter`.
pub fn speed_style(template: &str, formatter: SpeedFormatter, start: u64) -> Result<ProgressStyle> {
    let key = SpeedKey::new(formatter, start);
    let style = ProgressStyle::with_template(template)
        .map_err(|e| SpeedFormatError::TemplateError(e.to_string()))?
        .progress_chars("=>-")
        .with_key(SPEED_KEY, move |state: &ProgressState, w: &mut dyn fmt::Write| {
            key.write(state, w)
        });
    Ok(style)
}
