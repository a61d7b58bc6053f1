use crate::{Result, SpeedFormatError};
use serde::{Deserialize, Serialize};

/// Largest number of fraction digits a [`NumberFormat`] may render.
pub const MAX_FRACTION_DIGITS: usize = 15;

/// Decimal formatting policy for the number part of a speed.
///
/// The default keeps up to three fraction digits and groups the integer
/// part in threes (`1,234.568`). Rounding is half-to-even on the exact
/// binary value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberFormat {
    pub min_fraction_digits: usize,
    pub max_fraction_digits: usize,

    /// Digits per group in the integer part, 0 disables grouping
    pub grouping_size: usize,
    pub grouping_separator: char,
    pub decimal_separator: char,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            min_fraction_digits: 0,
            max_fraction_digits: 3,
            grouping_size: 3,
            grouping_separator: ',',
            decimal_separator: '.',
        }
    }
}

impl NumberFormat {
    /// Exactly `digits` fraction digits and no grouping.
    pub fn fixed(digits: usize) -> Self {
        Self {
            min_fraction_digits: digits,
            max_fraction_digits: digits,
            grouping_size: 0,
            ..Self::default()
        }
    }

    pub fn with_grouping(mut self, size: usize, separator: char) -> Self {
        self.grouping_size = size;
        self.grouping_separator = separator;
        self
    }

    pub fn with_decimal_separator(mut self, separator: char) -> Self {
        self.decimal_separator = separator;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_fraction_digits > MAX_FRACTION_DIGITS {
            return Err(SpeedFormatError::InvalidNumberFormat(format!(
                "max_fraction_digits {} exceeds {}",
                self.max_fraction_digits, MAX_FRACTION_DIGITS
            )));
        }
        if self.min_fraction_digits > self.max_fraction_digits {
            return Err(SpeedFormatError::InvalidNumberFormat(format!(
                "min_fraction_digits {} is greater than max_fraction_digits {}",
                self.min_fraction_digits, self.max_fraction_digits
            )));
        }
        if self.grouping_size > 0 && self.grouping_separator == self.decimal_separator {
            return Err(SpeedFormatError::InvalidNumberFormat(format!(
                "grouping and decimal separators are both '{}'",
                self.decimal_separator
            )));
        }
        Ok(())
    }

    pub fn format(&self, value: f64) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }
        if value.is_infinite() {
            return if value > 0.0 { "∞" } else { "-∞" }.to_string();
        }

        let max = self.max_fraction_digits.min(MAX_FRACTION_DIGITS);
        let min = self.min_fraction_digits.min(max);

        let rendered = format!("{:.*}", max, value.abs());
        let (int_part, all_fraction) = rendered.split_once('.').unwrap_or((rendered.as_str(), ""));

        // Digits past `min` are dropped when they are trailing zeros
        let mut fraction = all_fraction.trim_end_matches('0');
        if fraction.len() < min {
            fraction = &all_fraction[..min];
        }

        let mut out = String::with_capacity(rendered.len() + rendered.len() / 3 + 1);
        if value.is_sign_negative() {
            out.push('-');
        }
        push_grouped(&mut out, int_part, self.grouping_size, self.grouping_separator);
        if !fraction.is_empty() {
            out.push(self.decimal_separator);
            out.push_str(fraction);
        }
        out
    }
}

fn push_grouped(out: &mut String, digits: &str, size: usize, separator: char) {
    let len = digits.len();
    for (i, digit) in digits.chars().enumerate() {
        if size > 0 && i > 0 && (len - i) % size == 0 {
            out.push(separator);
        }
        out.push(digit);
    }
}
