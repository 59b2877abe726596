use std::sync::Arc;

use anyhow::Result;
use serde_json::json;
use tracing::debug;

use api_client::ApiClient;

use crate::models::{AppointmentConfirmation, BookingForm};

pub struct BookingService {
    client: Arc<ApiClient>,
}

impl BookingService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Submit a validated booking form.
    pub async fn book(
        &self,
        form: &BookingForm,
        auth_token: Option<&str>,
    ) -> Result<AppointmentConfirmation> {
        form.validate()?;

        // validate() guarantees both fields are present.
        let date = form.appointment_date.unwrap_or_default();
        let time = form.appointment_time.clone().unwrap_or_default();

        debug!(
            "Booking appointment with doctor {} on {} at {}",
            form.doctor_id, date, time
        );

        let body = json!({
            "doctorId": form.doctor_id,
            "date": date.format("%Y-%m-%d").to_string(),
            "time": time,
            "note": form.note,
        });

        let confirmation: AppointmentConfirmation =
            self.client.post("/appointments", auth_token, body).await?;

        debug!("Appointment confirmed with ID: {}", confirmation.id);
        Ok(confirmation)
    }
}
