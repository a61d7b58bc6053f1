use crate::{Result, SpeedFormatError};
use std::borrow::Cow;
use tracing::debug;

const KIB: u64 = 1024;
const KB: u64 = 1000;

/// A display unit and the amount one of it stands for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MagnitudeUnit {
    pub label: Cow<'static, str>,

    /// Always positive
    pub divisor: u64,
}

impl MagnitudeUnit {
    pub const fn new(label: &'static str, divisor: u64) -> Self {
        Self {
            label: Cow::Borrowed(label),
            divisor,
        }
    }
}

/// Picks the display unit for a raw rate.
///
/// Implementations must be pure: the same rate always maps to the same unit.
#[cfg_attr(test, mockall::automock)]
pub trait MagnitudeUnitPicker: Send + Sync {
    fn unit(&self, raw_rate: i64) -> MagnitudeUnit;
}

/// Byte ladder with base 1024: B, KB, MB, GB, TB.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryBytes;

/// Byte ladder with base 1000: B, KB, MB, GB, TB.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalBytes;

const BINARY_LADDER: [MagnitudeUnit; 5] = [
    MagnitudeUnit::new("B", 1),
    MagnitudeUnit::new("KB", KIB),
    MagnitudeUnit::new("MB", KIB * KIB),
    MagnitudeUnit::new("GB", KIB * KIB * KIB),
    MagnitudeUnit::new("TB", KIB * KIB * KIB * KIB),
];

const DECIMAL_LADDER: [MagnitudeUnit; 5] = [
    MagnitudeUnit::new("B", 1),
    MagnitudeUnit::new("KB", KB),
    MagnitudeUnit::new("MB", KB * KB),
    MagnitudeUnit::new("GB", KB * KB * KB),
    MagnitudeUnit::new("TB", KB * KB * KB * KB),
];

/// Scans an ascending ladder from the top and returns the first step whose
/// threshold the rate meets. Zero, negative and sub-threshold rates get the
/// lowest step. `ladder` must be non-empty.
fn lookup(ladder: &[MagnitudeUnit], raw_rate: i64) -> MagnitudeUnit {
    if raw_rate > 0 {
        let rate = raw_rate as u64;
        if let Some(step) = ladder.iter().rev().find(|step| rate >= step.divisor) {
            return step.clone();
        }
    }
    ladder[0].clone()
}

impl MagnitudeUnitPicker for BinaryBytes {
    fn unit(&self, raw_rate: i64) -> MagnitudeUnit {
        lookup(&BINARY_LADDER, raw_rate)
    }
}

impl MagnitudeUnitPicker for DecimalBytes {
    fn unit(&self, raw_rate: i64) -> MagnitudeUnit {
        lookup(&DECIMAL_LADDER, raw_rate)
    }
}

/// A caller-defined ladder of `(threshold, label)` steps.
///
/// Each step's threshold doubles as its divisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitLadder {
    steps: Vec<MagnitudeUnit>,
}

impl UnitLadder {
    pub fn new<I, L>(steps: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u64, L)>,
        L: Into<Cow<'static, str>>,
    {
        let steps: Vec<MagnitudeUnit> = steps
            .into_iter()
            .map(|(divisor, label)| MagnitudeUnit {
                label: label.into(),
                divisor,
            })
            .collect();

        if steps.is_empty() {
            return Err(SpeedFormatError::InvalidLadder(
                "at least one step is required".to_string(),
            ));
        }

        if let Some(step) = steps.iter().find(|step| step.divisor == 0) {
            return Err(SpeedFormatError::InvalidLadder(format!(
                "step {:?} has a zero threshold",
                step.label
            )));
        }

        if let Some(pair) = steps.windows(2).find(|pair| pair[0].divisor >= pair[1].divisor) {
            return Err(SpeedFormatError::InvalidLadder(format!(
                "thresholds must be strictly ascending ({} then {})",
                pair[0].divisor, pair[1].divisor
            )));
        }

        debug!("Built unit ladder with {} steps", steps.len());
        Ok(Self { steps })
    }

    /// Plain counts: no suffix, then K, M, G, T at powers of 1000.
    pub fn counts() -> Self {
        Self {
            steps: vec![
                MagnitudeUnit::new("", 1),
                MagnitudeUnit::new("K", KB),
                MagnitudeUnit::new("M", KB * KB),
                MagnitudeUnit::new("G", KB * KB * KB),
                MagnitudeUnit::new("T", KB * KB * KB * KB),
            ],
        }
    }

    pub fn steps(&self) -> &[MagnitudeUnit] {
        &self.steps
    }
}

impl MagnitudeUnitPicker for UnitLadder {
    fn unit(&self, raw_rate: i64) -> MagnitudeUnit {
        lookup(&self.steps, raw_rate)
    }
}
