//! Lenient field decoders for the provider's JSON.
//!
//! The provider is loosely typed: numbers arrive as strings, strings as
//! numbers, and missing values as `null`, `""` or an absent key. These
//! helpers fold all of that into the strict shapes of `types`.

use serde::{de::Error as _, Deserialize, Deserializer};

use crate::models::types::{ArrivalState, DirectionId};

/// A scalar the provider may send as either text or a number.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Loose {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl Loose {
    pub(crate) fn into_text(self) -> String {
        match self {
            Loose::Text(s) => s,
            Loose::Integer(i) => i.to_string(),
            Loose::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                (f as i64).to_string()
            }
            Loose::Float(f) => f.to_string(),
        }
    }

    fn into_number(self) -> Option<f64> {
        match self {
            Loose::Text(s) => s.trim().parse().ok(),
            Loose::Integer(i) => Some(i as f64),
            Loose::Float(f) => Some(f),
        }
    }
}

/// Survey-grid coordinate. Absent, blank, unparsable, non-finite and zero
/// values all mean "no location".
pub(crate) fn coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Loose>::deserialize(deserializer)?
        .and_then(Loose::into_number)
        .filter(|v| v.is_finite() && *v != 0.0))
}

pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Loose>::deserialize(deserializer)?
        .map(Loose::into_text)
        .unwrap_or_default())
}

/// Like [`text`], but blank values become `None`.
pub(crate) fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Loose>::deserialize(deserializer)?
        .map(Loose::into_text)
        .filter(|s| !s.trim().is_empty()))
}

pub(crate) fn optional_sequence<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Loose>::deserialize(deserializer)?
        .and_then(Loose::into_number)
        .filter(|v| *v >= 0.0 && v.fract() == 0.0 && *v <= u32::MAX as f64)
        .map(|v| v as u32))
}

pub(crate) fn arrival_state<'de, D>(deserializer: D) -> Result<ArrivalState, D::Error>
where
    D: Deserializer<'de>,
{
    text(deserializer).map(ArrivalState::from)
}

pub(crate) fn direction<'de, D>(deserializer: D) -> Result<DirectionId, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Loose::deserialize(deserializer)?.into_text();
    DirectionId::from_flag(raw.trim())
        .ok_or_else(|| D::Error::custom(format!("unknown direction flag {raw:?}")))
}
