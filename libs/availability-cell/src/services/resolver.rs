use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{Local, Months, NaiveDate};
use tracing::{debug, warn};

use api_client::ApiClient;
use shared_models::DayOfWeek;

use crate::models::{
    AvailabilityRecord, AvailabilitySnapshot, DateSlot, DoctorProfile, WeekdaySlot,
};

/// The booking calendar covers [today, today + this many calendar months],
/// inclusive on both ends.
pub const BOOKING_WINDOW_MONTHS: u32 = 2;

/// Build the weekday map from the raw records. Duplicate weekdays are
/// last-write-wins, unrecognized day names are skipped, and a null capacity
/// still produces an entry (with capacity 0).
pub fn build_weekday_map(records: &[AvailabilityRecord]) -> HashMap<DayOfWeek, WeekdaySlot> {
    let mut map = HashMap::new();

    for record in records {
        let weekday = match record.day.parse::<DayOfWeek>() {
            Ok(weekday) => weekday,
            Err(err) => {
                warn!("Skipping availability record: {}", err);
                continue;
            }
        };

        map.insert(
            weekday,
            WeekdaySlot {
                time: record.time.clone(),
                max_appointments: record.capacity(),
            },
        );
    }

    map
}

/// Expand the weekly map across the booking window. A date gets an entry
/// only when the weekly map has a record for its weekday; all other dates
/// stay absent so the calendar can tell "never works this day" from
/// "fully booked today".
pub fn expand_date_slots(
    weekday_map: &HashMap<DayOfWeek, WeekdaySlot>,
    today: NaiveDate,
) -> BTreeMap<NaiveDate, DateSlot> {
    let end = today + Months::new(BOOKING_WINDOW_MONTHS);
    let mut slots = BTreeMap::new();

    let mut date = today;
    while date <= end {
        let weekday = DayOfWeek::from_date(date);
        if let Some(entry) = weekday_map.get(&weekday) {
            slots.insert(
                date,
                DateSlot {
                    time: entry.time.clone(),
                    max_appointments: entry.max_appointments,
                    day_of_week: weekday.number(),
                },
            );
        }

        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    slots
}

#[derive(Debug, Clone, Default)]
struct ResolverState {
    doctor_id: Option<String>,
    snapshot: AvailabilitySnapshot,
    is_loading: bool,
    error_message: Option<String>,
}

/// Fetches a doctor's weekly availability and derives the per-date slot map
/// the booking calendar renders from. One fetch per doctor id; a response
/// that lost the race to a newer `load` call is discarded so the maps never
/// reflect a stale doctor.
pub struct AvailabilityResolver {
    client: Arc<ApiClient>,
    state: Mutex<ResolverState>,
    generation: AtomicU64,
}

impl AvailabilityResolver {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            state: Mutex::new(ResolverState::default()),
            generation: AtomicU64::new(0),
        }
    }

    fn state(&self) -> MutexGuard<'_, ResolverState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch availability for `doctor_id` and recompute both maps, using the
    /// current local date as the window start.
    pub async fn load(&self, doctor_id: &str, auth_token: Option<&str>) {
        self.load_as_of(doctor_id, auth_token, Local::now().date_naive())
            .await;
    }

    /// Same as [`load`](Self::load) with an explicit "today", so callers and
    /// tests can pin the window.
    pub async fn load_as_of(&self, doctor_id: &str, auth_token: Option<&str>, today: NaiveDate) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Loading availability for doctor: {}", doctor_id);

        {
            let mut state = self.state();
            state.doctor_id = Some(doctor_id.to_string());
            state.is_loading = true;
            state.error_message = None;
            // Consumers must never see a partially populated snapshot.
            state.snapshot = AvailabilitySnapshot::default();
        }

        let path = format!("/doctors/{}", doctor_id);
        let result = self.client.get::<DoctorProfile>(&path, auth_token).await;

        let mut state = self.state();
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(
                "Discarding stale availability response for doctor: {}",
                doctor_id
            );
            return;
        }

        state.is_loading = false;
        match result {
            Ok(profile) => {
                let weekday_availability = build_weekday_map(&profile.availabilities);
                let date_slots = expand_date_slots(&weekday_availability, today);
                debug!(
                    "Derived {} weekday entries, {} date slots for doctor: {}",
                    weekday_availability.len(),
                    date_slots.len(),
                    doctor_id
                );
                state.snapshot = AvailabilitySnapshot {
                    weekday_availability,
                    date_slots,
                };
            }
            Err(err) => {
                warn!("Failed to load availability for {}: {}", doctor_id, err);
                state.error_message = Some(err.to_string());
            }
        }
    }

    /// Manual recovery path: re-run the whole flow for the current doctor.
    pub async fn reload(&self, auth_token: Option<&str>) {
        let doctor_id = self.state().doctor_id.clone();
        if let Some(doctor_id) = doctor_id {
            self.load(&doctor_id, auth_token).await;
        }
    }

    pub fn snapshot(&self) -> AvailabilitySnapshot {
        self.state().snapshot.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading
    }

    pub fn error_message(&self) -> Option<String> {
        self.state().error_message.clone()
    }
}
