pub mod config;
pub mod progress;
pub mod speed;
pub mod utils;

pub use config::{SpeedConfig, UnitScale};
pub use progress::{speed_style, SpeedKey};
pub use speed::{
    BinaryBytes, DecimalBytes, MagnitudeUnit, MagnitudeUnitPicker, ProgressSnapshot,
    SpeedFormatter, TimeUnit, UnitLadder,
};
pub use utils::NumberFormat;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpeedFormatError {
    #[error("Unknown time unit: {0}")]
    UnknownTimeUnit(String),

    #[error("Unknown unit scale: {0}")]
    UnknownUnitScale(String),

    #[error("Invalid number format: {0}")]
    InvalidNumberFormat(String),

    #[error("Invalid unit ladder: {0}")]
    InvalidLadder(String),

    #[error("Config error: {0}")]
    ConfigError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Progress template error: {0}")]
    TemplateError(String),
}

pub type Result<T> = std::result::Result<T, SpeedFormatError>;
