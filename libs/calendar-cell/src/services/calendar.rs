use std::collections::BTreeMap;

use chrono::{Datelike, Days, Months, NaiveDate};
use tracing::debug;

use availability_cell::models::DateSlot;
use availability_cell::services::BOOKING_WINDOW_MONTHS;
use shared_models::DayOfWeek;

use crate::models::{DayCell, DayState, OPEN_CAPACITY_THRESHOLD};

const GRID_WEEKS: u32 = 6;
const DAYS_PER_WEEK: u32 = 7;

fn first_of_month(date: NaiveDate) -> NaiveDate {
    // Day 1 exists in every month.
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap()
}

fn in_month(date: NaiveDate, month: NaiveDate) -> bool {
    date.year() == month.year() && date.month() == month.month()
}

/// Classify one cell. Total and order-independent: the same inputs always
/// produce the same one of the six states. `viewed_month` may be any date
/// inside the viewed month.
pub fn classify_day(
    date: NaiveDate,
    today: NaiveDate,
    viewed_month: NaiveDate,
    date_slots: &BTreeMap<NaiveDate, DateSlot>,
) -> DayState {
    if !in_month(date, viewed_month) {
        return DayState::OutsideMonth;
    }
    if date < today {
        return DayState::Past;
    }
    match date_slots.get(&date) {
        None => DayState::NotAvailable,
        Some(slot) if slot.max_appointments == 0 => DayState::FullyBooked,
        Some(slot) if slot.max_appointments < OPEN_CAPACITY_THRESHOLD => DayState::Limited,
        Some(_) => DayState::Open,
    }
}

/// View model for the two-month booking calendar: the viewed month, the
/// user's selection, bounded navigation, and a loading gate that makes
/// every cell non-interactive while a fetch is outstanding.
#[derive(Debug, Clone)]
pub struct CalendarView {
    today: NaiveDate,
    viewed_month: NaiveDate,
    selected: Option<NaiveDate>,
    is_loading: bool,
    date_slots: BTreeMap<NaiveDate, DateSlot>,
}

impl CalendarView {
    pub fn new(today: NaiveDate, date_slots: BTreeMap<NaiveDate, DateSlot>) -> Self {
        Self {
            today,
            viewed_month: first_of_month(today),
            selected: None,
            is_loading: false,
            date_slots,
        }
    }

    /// Swap in a freshly derived slot map (e.g. after a resolver reload).
    pub fn set_date_slots(&mut self, date_slots: BTreeMap<NaiveDate, DateSlot>) {
        self.date_slots = date_slots;
    }

    pub fn set_loading(&mut self, is_loading: bool) {
        self.is_loading = is_loading;
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// First day of the month currently on screen.
    pub fn viewed_month(&self) -> NaiveDate {
        self.viewed_month
    }

    pub fn selected(&self) -> Option<NaiveDate> {
        self.selected
    }

    /// Last bookable date: today + the booking window.
    pub fn window_end(&self) -> NaiveDate {
        self.today + Months::new(BOOKING_WINDOW_MONTHS)
    }

    pub fn can_go_next(&self) -> bool {
        self.viewed_month + Months::new(1) <= self.window_end()
    }

    pub fn can_go_prev(&self) -> bool {
        self.viewed_month > first_of_month(self.today)
    }

    /// Move forward one month; a no-op at the window boundary.
    pub fn next_month(&mut self) {
        if self.can_go_next() {
            self.viewed_month = self.viewed_month + Months::new(1);
        }
    }

    /// Move back one month; a no-op at the current month.
    pub fn prev_month(&mut self) {
        if self.can_go_prev() {
            self.viewed_month = self.viewed_month - Months::new(1);
        }
    }

    pub fn cell(&self, date: NaiveDate) -> DayCell {
        let state = classify_day(date, self.today, self.viewed_month, &self.date_slots);
        DayCell {
            date,
            state,
            is_today: date == self.today,
            // The selection ring only shows inside the viewed month.
            is_selected: self.selected == Some(date) && in_month(date, self.viewed_month),
            capacity: self.date_slots.get(&date).map(|s| s.max_appointments),
        }
    }

    /// The full Sunday-first 6x7 grid for the viewed month, including the
    /// leading and trailing out-of-month days.
    pub fn cells(&self) -> Vec<DayCell> {
        let lead_days = DayOfWeek::from_date(self.viewed_month).number();
        let grid_start = self.viewed_month - Days::new(lead_days as u64);

        (0..GRID_WEEKS * DAYS_PER_WEEK)
            .map(|offset| self.cell(grid_start + Days::new(offset as u64)))
            .collect()
    }

    /// Handle a click on `date`. Only selectable cells (and only while not
    /// loading) record a selection and emit the `YYYY-MM-DD` string the
    /// booking form consumes; every other click is ignored.
    pub fn click(&mut self, date: NaiveDate) -> Option<String> {
        if self.is_loading {
            return None;
        }

        let state = classify_day(date, self.today, self.viewed_month, &self.date_slots);
        if !state.is_selectable() {
            debug!("Ignoring click on non-selectable day {} ({:?})", date, state);
            return None;
        }

        self.selected = Some(date);
        Some(date.format("%Y-%m-%d").to_string())
    }
}
