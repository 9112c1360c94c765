//! Lenient decoders for the SISKEUDES payload.
//!
//! The provider sends amounts as strings (`"1500000.00"`), sometimes as plain
//! numbers, and uses `""` or `null` for "no value". Text fields may be `null`.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDecimal {
    Text(String),
    Integer(i64),
    Float(f64),
}

/// Decode a decimal given as string or number; blank and `null` become zero
pub fn decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawDecimal>::deserialize(deserializer)?;
    match raw {
        None => Ok(Decimal::ZERO),
        Some(RawDecimal::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(Decimal::ZERO);
            }
            Decimal::from_str(trimmed)
                .or_else(|_| Decimal::from_scientific(trimmed))
                .map_err(|e| serde::de::Error::custom(format!("invalid decimal '{}': {}", s, e)))
        }
        Some(RawDecimal::Integer(i)) => Ok(Decimal::from(i)),
        Some(RawDecimal::Float(f)) => Decimal::try_from(f)
            .map_err(|e| serde::de::Error::custom(format!("invalid decimal {}: {}", f, e))),
    }
}

/// Decode an optional string, mapping `null` to the empty string
pub fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
