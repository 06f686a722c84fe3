//! Rider-facing wording for arrival states.

use starbus_transit::{ArrivalRecord, ArrivalState};
use strum::{AsRefStr, Display};

pub const NO_ARRIVALS_MESSAGE: &str = "예정정보가 없습니다.";
pub const UNKNOWN_STATE_LABEL: &str = "정보 없음";

/// Visual emphasis for an arrival row
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum ArrivalTone {
    Arriving,
    Approaching,
    InGarage,
    Scheduled,
    Unknown,
}

impl ArrivalTone {
    pub fn of(state: &ArrivalState) -> Self {
        match state {
            ArrivalState::Imminent => Self::Arriving,
            ArrivalState::NextImminent => Self::Approaching,
            ArrivalState::NotYetDispatched => Self::InGarage,
            ArrivalState::Eta(_) => Self::Scheduled,
            ArrivalState::Unknown => Self::Unknown,
        }
    }
}

/// Matches whole tokens, so "전전" is never read as "전".
pub fn label(state: &ArrivalState) -> String {
    match state {
        ArrivalState::Imminent => "곧 도착".to_string(),
        ArrivalState::NextImminent => "곧 도착 예정".to_string(),
        ArrivalState::NotYetDispatched => "차고지 대기".to_string(),
        ArrivalState::Eta(eta) => format!("{eta} 후 도착"),
        ArrivalState::Unknown => UNKNOWN_STATE_LABEL.to_string(),
    }
}

/// One line per record, or the empty-state message.
pub fn render(records: &[ArrivalRecord]) -> Vec<String> {
    if records.is_empty() {
        return vec![NO_ARRIVALS_MESSAGE.to_string()];
    }

    records
        .iter()
        .map(|record| match &record.route_note {
            Some(note) => format!("{} ({note})  {}", record.route_no, label(&record.state)),
            None => format!("{}  {}", record.route_no, label(&record.state)),
        })
        .collect()
}
