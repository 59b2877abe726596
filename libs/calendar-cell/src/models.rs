use chrono::NaiveDate;
use serde::Serialize;

/// Capacity at or above which a day renders as "open" rather than "limited".
pub const OPEN_CAPACITY_THRESHOLD: u32 = 4;

/// The six mutually exclusive presentation states of a calendar cell,
/// in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayState {
    /// Not part of the viewed month; muted, no slot indicator.
    OutsideMonth,
    /// Strictly before today.
    Past,
    /// In range but the doctor never works this weekday.
    NotAvailable,
    /// A slot exists with zero capacity.
    FullyBooked,
    /// 0 < capacity < threshold.
    Limited,
    /// capacity >= threshold.
    Open,
}

impl DayState {
    pub fn is_selectable(self) -> bool {
        matches!(self, DayState::Limited | DayState::Open)
    }

    /// Text label for states that carry one; the rest render styling only.
    pub fn label(self) -> &'static str {
        match self {
            DayState::Past => "Past",
            DayState::NotAvailable => "N/A",
            _ => "",
        }
    }
}

/// One rendered cell. `is_today` and `is_selected` are overlay rings,
/// independent of `state`, and never affect interactivity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub state: DayState,
    pub is_today: bool,
    pub is_selected: bool,
    pub capacity: Option<u32>,
}
