use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use availability_cell::models::WeekdaySlot;
use shared_models::{AppError, DayOfWeek};

/// State of the appointment booking form. The date arrives from the
/// calendar's selection; the time label is re-derived from the weekly map.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BookingForm {
    pub doctor_id: String,
    pub appointment_date: Option<NaiveDate>,
    pub appointment_time: Option<String>,
    pub note: Option<String>,
}

impl BookingForm {
    pub fn new(doctor_id: impl Into<String>) -> Self {
        Self {
            doctor_id: doctor_id.into(),
            ..Default::default()
        }
    }

    /// Record a selected date and auto-fill the time label from the weekly
    /// map (never the per-date map). The schedule model carries at most one
    /// time window per weekday, so a matching entry fills the field
    /// directly; with no entry the time is left for explicit resolution.
    pub fn apply_selection(
        &mut self,
        date: NaiveDate,
        weekday_availability: &HashMap<DayOfWeek, WeekdaySlot>,
    ) {
        self.appointment_date = Some(date);
        self.appointment_time = weekday_availability
            .get(&DayOfWeek::from_date(date))
            .map(|slot| slot.time.clone());
    }

    /// Defense in depth behind the calendar's non-interactive cells: an
    /// incomplete form never reaches the wire.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.doctor_id.is_empty() {
            return Err(AppError::Validation("Doctor is required".to_string()));
        }
        if self.appointment_date.is_none() {
            return Err(AppError::Validation(
                "Please select an appointment date".to_string(),
            ));
        }
        if self.appointment_time.is_none() {
            return Err(AppError::Validation(
                "Please select an appointment time".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentConfirmation {
    pub id: Uuid,
    pub doctor_id: String,
    pub date: NaiveDate,
    pub time: String,
    #[serde(default)]
    pub status: Option<String>,
}
