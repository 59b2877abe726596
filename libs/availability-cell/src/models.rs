use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shared_models::DayOfWeek;

/// One recurring availability record as the backend sends it: a weekday
/// name, an opaque time-window label, and a bookable-appointment capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRecord {
    pub day: String,
    pub time: String,
    pub max_appointments: Option<u32>,
}

impl AvailabilityRecord {
    /// A `null` capacity on the wire means "unspecified" and ingests as 0
    /// (fully booked). This is distinct from the record being absent
    /// entirely, which means the doctor never works that weekday.
    pub fn capacity(&self) -> u32 {
        self.max_appointments.unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorProfile {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub availabilities: Vec<AvailabilityRecord>,
}

/// The weekly schedule entry for one weekday. At most one time window per
/// weekday exists; the data model cannot express a split day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdaySlot {
    pub time: String,
    pub max_appointments: u32,
}

/// A weekly entry expanded onto a concrete calendar date inside the
/// booking window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateSlot {
    pub time: String,
    pub max_appointments: u32,
    /// 0 = Sunday, carried for downstream consumers.
    pub day_of_week: u32,
}

/// Both derived maps, swapped in atomically after a fetch. A date is present
/// in `date_slots` only if the doctor has a weekly record for its weekday;
/// absence is the "doctor never works this day" signal and must not be
/// conflated with a zero-capacity entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AvailabilitySnapshot {
    pub weekday_availability: HashMap<DayOfWeek, WeekdaySlot>,
    pub date_slots: BTreeMap<NaiveDate, DateSlot>,
}
