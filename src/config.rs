use crate::speed::{BinaryBytes, DecimalBytes, MagnitudeUnitPicker, SpeedFormatter, TimeUnit, UnitLadder};
use crate::utils::NumberFormat;
use crate::{Result, SpeedFormatError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Built-in magnitude ladders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitScale {
    /// B, KB, MB, GB, TB at powers of 1024
    #[default]
    Binary,

    /// B, KB, MB, GB, TB at powers of 1000
    Decimal,

    /// Unlabelled counts, then K, M, G, T
    Counts,
}

impl UnitScale {
    pub fn picker(self) -> Arc<dyn MagnitudeUnitPicker> {
        match self {
            UnitScale::Binary => Arc::new(BinaryBytes),
            UnitScale::Decimal => Arc::new(DecimalBytes),
            UnitScale::Counts => Arc::new(UnitLadder::counts()),
        }
    }
}

impl FromStr for UnitScale {
    type Err = SpeedFormatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "binary" | "iec" => Ok(UnitScale::Binary),
            "decimal" | "si" => Ok(UnitScale::Decimal),
            "counts" | "items" => Ok(UnitScale::Counts),
            _ => Err(SpeedFormatError::UnknownUnitScale(s.to_string())),
        }
    }
}

impl fmt::Display for UnitScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitScale::Binary => write!(f, "binary"),
            UnitScale::Decimal => write!(f, "decimal"),
            UnitScale::Counts => write!(f, "counts"),
        }
    }
}

/// Serializable description of a [`SpeedFormatter`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    pub time_unit: Option<TimeUnit>,
    pub scale: UnitScale,
    pub number_format: NumberFormat,
}

impl SpeedConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading speed config from {:?}", path);
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Validates the configuration and builds the formatter it describes.
    pub fn build(&self) -> Result<SpeedFormatter> {
        let formatter = SpeedFormatter::new()
            .with_time_unit(self.time_unit)
            .with_shared_picker(self.scale.picker())
            .with_number_format(self.number_format.clone())?;

        debug!(
            "Built speed formatter: unit={}, scale={}",
            self.time_unit.unwrap_or_default(),
            self.scale
        );
        Ok(formatter)
    }
}
