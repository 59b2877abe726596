use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};

use availability_cell::models::{AvailabilityRecord, DateSlot};
use availability_cell::services::{build_weekday_map, expand_date_slots};
use calendar_cell::models::{DayState, OPEN_CAPACITY_THRESHOLD};
use calendar_cell::services::{classify_day, CalendarView};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// A Wednesday; today + 2 months = 2025-08-04.
fn today() -> NaiveDate {
    date(2025, 6, 4)
}

fn record(day: &str, time: &str, max_appointments: Option<u32>) -> AvailabilityRecord {
    AvailabilityRecord {
        day: day.to_string(),
        time: time.to_string(),
        max_appointments,
    }
}

fn slots_for(records: &[AvailabilityRecord]) -> BTreeMap<NaiveDate, DateSlot> {
    expand_date_slots(&build_weekday_map(records), today())
}

#[test]
fn test_outside_month_wins_over_everything() {
    let slots = slots_for(&[record("MONDAY", "10:00", Some(5))]);

    // A past Monday from May, viewed from June: outside-month, not past.
    let state = classify_day(date(2025, 5, 26), today(), today(), &slots);
    assert_eq!(state, DayState::OutsideMonth);
    assert!(!state.is_selectable());
}

#[test]
fn test_past_wins_over_slot_presence() {
    let slots = slots_for(&[record("MONDAY", "10:00", Some(5))]);

    // 2025-06-02 is a Monday before today; capacity is irrelevant.
    let state = classify_day(date(2025, 6, 2), today(), today(), &slots);
    assert_eq!(state, DayState::Past);
    assert_eq!(state.label(), "Past");
    assert!(!state.is_selectable());
}

#[test]
fn test_absent_weekday_is_not_available() {
    let slots = slots_for(&[record("MONDAY", "10:00", Some(5))]);

    // 2025-06-05 is a Thursday; the doctor never works Thursdays.
    let state = classify_day(date(2025, 6, 5), today(), today(), &slots);
    assert_eq!(state, DayState::NotAvailable);
    assert_eq!(state.label(), "N/A");
    assert!(!state.is_selectable());
}

#[test]
fn test_capacity_bands() {
    let slots = slots_for(&[
        record("MONDAY", "10:00", Some(0)),
        record("TUESDAY", "14:00", Some(2)),
        record("WEDNESDAY", "09:00", Some(OPEN_CAPACITY_THRESHOLD)),
    ]);

    // 2025-06-09 Monday, 2025-06-10 Tuesday, 2025-06-11 Wednesday.
    assert_eq!(
        classify_day(date(2025, 6, 9), today(), today(), &slots),
        DayState::FullyBooked
    );
    assert_eq!(
        classify_day(date(2025, 6, 10), today(), today(), &slots),
        DayState::Limited
    );
    assert_eq!(
        classify_day(date(2025, 6, 11), today(), today(), &slots),
        DayState::Open
    );

    assert!(!DayState::FullyBooked.is_selectable());
    assert!(DayState::Limited.is_selectable());
    assert!(DayState::Open.is_selectable());
}

#[test]
fn test_classification_is_deterministic() {
    let slots = slots_for(&[record("MONDAY", "10:00", Some(5))]);
    let inputs = [
        date(2025, 5, 26),
        date(2025, 6, 2),
        date(2025, 6, 5),
        date(2025, 6, 9),
    ];

    for day in inputs {
        let first = classify_day(day, today(), today(), &slots);
        let second = classify_day(day, today(), today(), &slots);
        assert_eq!(first, second);
    }
}

#[test]
fn test_all_mondays_open_when_capacity_is_five() {
    let slots = slots_for(&[record("MONDAY", "10:00-12:00", Some(5))]);
    let view = CalendarView::new(today(), slots.clone());

    for (day, _) in &slots {
        if *day >= today() && day.month() == 6 {
            assert_eq!(day.weekday(), Weekday::Mon);
            assert_eq!(view.cell(*day).state, DayState::Open);
        }
    }
}

#[test]
fn test_fully_booked_friday_click_is_ignored() {
    let slots = slots_for(&[record("FRIDAY", "09:00", Some(0))]);
    let mut view = CalendarView::new(today(), slots);

    // 2025-06-06 is a Friday.
    let friday = date(2025, 6, 6);
    assert_eq!(view.cell(friday).state, DayState::FullyBooked);

    assert_eq!(view.click(friday), None);
    assert_eq!(view.selected(), None);
}

#[test]
fn test_limited_tuesday_click_emits_iso_date() {
    let slots = slots_for(&[record("TUESDAY", "14:00", Some(2))]);
    let mut view = CalendarView::new(today(), slots);

    // 2025-06-10 is a Tuesday.
    let tuesday = date(2025, 6, 10);
    assert_eq!(view.cell(tuesday).state, DayState::Limited);

    assert_eq!(view.click(tuesday), Some("2025-06-10".to_string()));
    assert_eq!(view.selected(), Some(tuesday));
    assert!(view.cell(tuesday).is_selected);
}

#[test]
fn test_click_is_ignored_while_loading() {
    let slots = slots_for(&[record("TUESDAY", "14:00", Some(2))]);
    let mut view = CalendarView::new(today(), slots);
    view.set_loading(true);

    assert_eq!(view.click(date(2025, 6, 10)), None);
    assert_eq!(view.selected(), None);

    view.set_loading(false);
    assert!(view.click(date(2025, 6, 10)).is_some());
}

#[test]
fn test_today_ring_is_an_overlay() {
    // Today has no slot, so it classifies NotAvailable, yet keeps its ring.
    let slots = slots_for(&[record("MONDAY", "10:00", Some(5))]);
    let view = CalendarView::new(today(), slots);

    let cell = view.cell(today());
    assert_eq!(cell.state, DayState::NotAvailable);
    assert!(cell.is_today);
}

#[test]
fn test_selection_ring_hidden_outside_viewed_month() {
    let slots = slots_for(&[record("MONDAY", "10:00", Some(5))]);
    let mut view = CalendarView::new(today(), slots);

    // Select a July Monday, then navigate there and back.
    view.next_month();
    let july_monday = date(2025, 7, 7);
    assert!(view.click(july_monday).is_some());
    assert!(view.cell(july_monday).is_selected);

    view.prev_month();
    // From June's view the selected July date is out of month: no ring.
    let cell = view.cell(july_monday);
    assert_eq!(cell.state, DayState::OutsideMonth);
    assert!(!cell.is_selected);
}

#[test]
fn test_navigation_bounds() {
    let mut view = CalendarView::new(today(), BTreeMap::new());

    // Can't move before the month containing today.
    assert!(!view.can_go_prev());
    view.prev_month();
    assert_eq!(view.viewed_month(), date(2025, 6, 1));

    // Forward: June -> July -> August, then the boundary.
    assert!(view.can_go_next());
    view.next_month();
    assert_eq!(view.viewed_month(), date(2025, 7, 1));
    assert!(view.can_go_next());
    view.next_month();
    assert_eq!(view.viewed_month(), date(2025, 8, 1));

    // September 1st is past today + 2 months (2025-08-04): disabled, no-op.
    assert!(!view.can_go_next());
    view.next_month();
    assert_eq!(view.viewed_month(), date(2025, 8, 1));

    // And back again to June.
    assert!(view.can_go_prev());
    view.prev_month();
    view.prev_month();
    assert_eq!(view.viewed_month(), date(2025, 6, 1));
    assert!(!view.can_go_prev());
}

#[test]
fn test_grid_is_sunday_first_six_weeks() {
    let view = CalendarView::new(today(), BTreeMap::new());
    let cells = view.cells();

    assert_eq!(cells.len(), 42);
    assert_eq!(cells[0].date.weekday(), Weekday::Sun);
    // June 2025 starts on a Sunday, so the grid begins on June 1st.
    assert_eq!(cells[0].date, date(2025, 6, 1));

    // Every day of the viewed month appears exactly once.
    let in_month = cells
        .iter()
        .filter(|c| c.date.month() == 6 && c.date.year() == 2025)
        .count();
    assert_eq!(in_month, 30);
    assert!(cells
        .iter()
        .all(|c| (c.state == DayState::OutsideMonth) == (c.date.month() != 6)));

    // Trailing cells spill into July and classify as outside-month.
    assert_eq!(cells[41].date.month(), 7);
    assert_eq!(cells[41].state, DayState::OutsideMonth);
}

#[test]
fn test_boundary_date_is_bookable_one_day_beyond_is_not() {
    let slots = slots_for(&[record("MONDAY", "10:00", Some(5))]);
    let mut view = CalendarView::new(today(), slots);
    view.next_month();
    view.next_month();
    assert_eq!(view.viewed_month(), date(2025, 8, 1));

    // 2025-08-04 is exactly today + 2 months and a Monday: included.
    let boundary = date(2025, 8, 4);
    assert_eq!(view.cell(boundary).state, DayState::Open);
    assert!(view.click(boundary).is_some());

    // The next Monday is beyond the window: absent, hence N/A.
    let beyond = date(2025, 8, 11);
    assert_eq!(view.cell(beyond).state, DayState::NotAvailable);
    assert_eq!(view.click(beyond), None);
}
