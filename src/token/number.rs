use super::{GlslFloat, GlslInt};
use once_cell::sync::Lazy;
use regex::Regex;

static INT_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]+)([uU])?$").unwrap());

impl GlslInt {
    pub fn new(digits: &str, unsigned: bool) -> Self {
        Self {
            digits: digits.to_string(),
            unsigned,
        }
    }

    pub fn digits(&self) -> &str {
        &self.digits
    }

    pub fn is_unsigned(&self) -> bool {
        self.unsigned
    }

    pub fn value(&self) -> u64 {
        self.digits.parse().unwrap_or(0)
    }

    pub fn format(&self) -> String {
        if self.unsigned {
            format!("{}u", self.value())
        } else {
            self.value().to_string()
        }
    }
}

impl GlslFloat {
    /// Construct from the integer and fractional digit halves; either half may
    /// be `"0"` to represent the truncated forms `.5` and `5.`.
    pub fn new(integer: &str, fraction: &str) -> Self {
        Self {
            integer: integer.to_string(),
            fraction: fraction.to_string(),
        }
    }

    /// Minimal formatted output: `5.0` becomes `5.` and `0.5` becomes `.5`.
    pub fn format(&self) -> String {
        let integer = self.integer.trim_start_matches('0');
        let fraction = self.fraction.trim_end_matches('0');
        if integer.is_empty() && fraction.is_empty() {
            return "0.".to_string();
        }
        format!("{}.{}", integer, fraction)
    }
}

/// Try to interpret an integer literal, with an optional unsigned suffix.
pub fn interpret_int(source: &str) -> Option<GlslInt> {
    let captures = INT_PATTERN.captures(source)?;
    Some(GlslInt::new(
        captures.get(1).unwrap().as_str(),
        captures.get(2).is_some(),
    ))
}
