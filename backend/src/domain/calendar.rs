//! Month calendar layout for community events.
//!
//! The grid is Monday-first: cell 0 of the first row is Monday. Days are laid
//! out in week rows of exactly 7 cells with outside-month placeholders before
//! day 1 and after the last day. No month/weekday combination needs more than
//! 6 rows.

use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use shared::{CalendarCell, CalendarMonth, CommunityEvent};
use tracing::info;

use crate::db::{Store, StoreError};
use crate::domain::dates;

/// Structural upper bound on week rows for any month.
const MAX_WEEK_ROWS: usize = 6;

/// Service producing month views with the events stored for that month.
#[derive(Clone)]
pub struct CalendarService {
    db_path: PathBuf,
}

impl CalendarService {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Load the month's events from the store and lay out the grid.
    ///
    /// `today` is caller-supplied (the engine never reads a clock); pass
    /// `None` to suppress the today flag entirely. An out-of-range month
    /// yields an empty grid.
    pub async fn month_view(
        &self,
        year: i32,
        month: u32,
        today: Option<(i32, u32, u32)>,
    ) -> Result<CalendarMonth, StoreError> {
        info!("building calendar view for {}/{}", month, year);
        let Some((start, end)) = dates::month_bounds(year, month) else {
            return Ok(CalendarMonth {
                year,
                month,
                weeks: Vec::new(),
            });
        };

        let store = Store::open(&self.db_path).await?;
        let events = store.events_between(&start, &end).await;
        store.close().await;

        Ok(layout_month(year, month, events?, today))
    }
}

/// Lay out a month as week rows, attaching each event to its day cell.
///
/// Events are sorted by date then title before grouping, so multiple events
/// on one day appear in a deterministic order. Grouping goes through a fixed
/// day-indexed array rather than a map, so no ordering is inherited from a
/// container.
pub fn layout_month(
    year: i32,
    month: u32,
    events: Vec<CommunityEvent>,
    today: Option<(i32, u32, u32)>,
) -> CalendarMonth {
    let total_days = dates::days_in_month(year, month);
    if total_days == 0 {
        return CalendarMonth {
            year,
            month,
            weeks: Vec::new(),
        };
    }
    let offset = first_weekday_offset(year, month);

    let mut sorted = events;
    sorted.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.title.cmp(&b.title)));
    let mut by_day: [Vec<CommunityEvent>; 32] = std::array::from_fn(|_| Vec::new());
    for event in sorted {
        if let Some(day) = event.date.day_of_month() {
            if (1..=total_days).contains(&day) {
                by_day[day as usize].push(event);
            }
        }
    }

    let mut weeks = Vec::new();
    let mut day = 1u32;
    for row in 0..MAX_WEEK_ROWS {
        let mut cells = Vec::with_capacity(7);
        for col in 0..7 {
            if (row == 0 && col < offset as usize) || day > total_days {
                cells.push(CalendarCell::outside());
            } else {
                let is_today =
                    matches!(today, Some((ty, tm, td)) if ty == year && tm == month && td == day);
                cells.push(CalendarCell {
                    day: Some(day),
                    is_today,
                    events: std::mem::take(&mut by_day[day as usize]),
                });
                day += 1;
            }
        }
        weeks.push(cells);
        if day > total_days {
            break;
        }
    }

    CalendarMonth { year, month, weeks }
}

/// Weekday of day 1 of the month, Monday-first and 0-indexed.
fn first_weekday_offset(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.weekday().num_days_from_monday())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::CanonicalDate;

    fn event(date: &str, title: &str) -> CommunityEvent {
        CommunityEvent {
            date: CanonicalDate::from_shape(date).unwrap(),
            title: title.to_string(),
            description: format!("{} details", title),
        }
    }

    fn in_month_days(grid: &CalendarMonth) -> Vec<u32> {
        grid.weeks
            .iter()
            .flatten()
            .filter_map(|c| c.day)
            .collect()
    }

    #[test]
    fn structural_invariants_hold_across_months() {
        for (year, month) in [
            (2024, 1),
            (2024, 2),
            (2024, 3),
            (2025, 2),
            (2025, 3),
            (2025, 6),
            (2025, 9),
            (2023, 12),
        ] {
            let grid = layout_month(year, month, Vec::new(), None);
            assert!(grid.weeks.len() <= MAX_WEEK_ROWS, "{}/{}", month, year);
            for row in &grid.weeks {
                assert_eq!(row.len(), 7, "{}/{}", month, year);
            }
            let days = in_month_days(&grid);
            let expected: Vec<u32> = (1..=dates::days_in_month(year, month)).collect();
            assert_eq!(days, expected, "{}/{}", month, year);
        }
    }

    #[test]
    fn march_2024_starts_on_friday() {
        let grid = layout_month(2024, 3, Vec::new(), None);
        let first_row = &grid.weeks[0];
        // Monday-first: Friday is column 4.
        assert_eq!(first_row[3].day, None);
        assert_eq!(first_row[4].day, Some(1));
        assert_eq!(grid.weeks.len(), 5);
    }

    #[test]
    fn september_2025_starts_with_no_padding() {
        // 2025-09-01 is a Monday.
        let grid = layout_month(2025, 9, Vec::new(), None);
        assert_eq!(grid.weeks[0][0].day, Some(1));
        assert_eq!(grid.weeks.len(), 5);
    }

    #[test]
    fn six_row_months_stop_at_the_bound() {
        // March 2025 starts on a Saturday: 5 leading placeholders + 31 days.
        let grid = layout_month(2025, 3, Vec::new(), None);
        assert_eq!(grid.weeks.len(), 6);
        let last_row = grid.weeks.last().unwrap();
        assert_eq!(last_row[0].day, Some(31));
        assert!(last_row[1..].iter().all(|c| c.day.is_none()));
    }

    #[test]
    fn trailing_placeholders_carry_nothing() {
        let grid = layout_month(2024, 3, Vec::new(), None);
        for cell in grid.weeks.iter().flatten().filter(|c| c.day.is_none()) {
            assert!(!cell.is_today);
            assert!(cell.events.is_empty());
        }
    }

    #[test]
    fn exactly_one_today_cell() {
        let grid = layout_month(2024, 3, Vec::new(), Some((2024, 3, 15)));
        let today_cells: Vec<&CalendarCell> = grid
            .weeks
            .iter()
            .flatten()
            .filter(|c| c.is_today)
            .collect();
        assert_eq!(today_cells.len(), 1);
        assert_eq!(today_cells[0].day, Some(15));
    }

    #[test]
    fn today_in_another_month_flags_nothing() {
        let grid = layout_month(2024, 3, Vec::new(), Some((2024, 4, 15)));
        assert!(grid.weeks.iter().flatten().all(|c| !c.is_today));
    }

    #[test]
    fn events_attach_to_their_day_sorted_by_title() {
        let events = vec![
            event("2024-03-10", "Zumba"),
            event("2024-03-10", "Assembly"),
            event("2024-03-02", "Cleanup"),
        ];
        let grid = layout_month(2024, 3, events, None);

        let day_10 = grid
            .weeks
            .iter()
            .flatten()
            .find(|c| c.day == Some(10))
            .unwrap();
        let titles: Vec<&str> = day_10.events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Assembly", "Zumba"]);

        let day_2 = grid
            .weeks
            .iter()
            .flatten()
            .find(|c| c.day == Some(2))
            .unwrap();
        assert_eq!(day_2.events.len(), 1);
    }

    #[test]
    fn grouping_is_by_day_of_month_only() {
        // The store query bounds events to the month; layout groups purely by
        // the day extracted from the canonical date.
        let events = vec![event("2024-03-31", "Kept"), event("2024-03-29", "Also kept")];
        let grid = layout_month(2024, 3, events, None);
        let total_events: usize = grid.weeks.iter().flatten().map(|c| c.events.len()).sum();
        assert_eq!(total_events, 2);
    }

    #[test]
    fn day_numbers_beyond_the_month_are_dropped() {
        // A day-31 event handed to a 29-day month has no cell to land in.
        let events = vec![event("2024-02-31", "Orphan")];
        let grid = layout_month(2024, 2, events, None);
        let total_events: usize = grid.weeks.iter().flatten().map(|c| c.events.len()).sum();
        assert_eq!(total_events, 0);
    }

    #[test]
    fn leap_february_fills_29_days() {
        let grid = layout_month(2024, 2, Vec::new(), None);
        assert_eq!(in_month_days(&grid).len(), 29);
        let grid = layout_month(2025, 2, Vec::new(), None);
        assert_eq!(in_month_days(&grid).len(), 28);
    }

    #[test]
    fn invalid_month_yields_empty_grid() {
        let grid = layout_month(2024, 13, Vec::new(), None);
        assert!(grid.weeks.is_empty());
        let grid = layout_month(2024, 0, Vec::new(), None);
        assert!(grid.weeks.is_empty());
    }

    mod month_view {
        use super::*;
        use crate::db::testutil::*;

        #[tokio::test]
        async fn month_view_loads_only_that_months_events() {
            let (db, pool) = blank_snapshot().await;
            insert_event(&pool, "2024-03-10", "Assembly", "Annual meeting").await;
            insert_event(&pool, "2024-03-10", "Zumba", "Clubhouse").await;
            insert_event(&pool, "2024-04-02", "Other month", "Excluded").await;
            pool.close().await;
            let service = CalendarService::new(&db.path);

            let grid = service.month_view(2024, 3, Some((2024, 3, 15))).await.unwrap();
            let total_events: usize = grid.weeks.iter().flatten().map(|c| c.events.len()).sum();
            assert_eq!(total_events, 2);

            let day_10 = grid
                .weeks
                .iter()
                .flatten()
                .find(|c| c.day == Some(10))
                .unwrap();
            assert_eq!(day_10.events[0].title, "Assembly");
            assert_eq!(day_10.events[1].title, "Zumba");
        }

        #[tokio::test]
        async fn month_view_rejects_out_of_range_month_with_empty_grid() {
            let (db, pool) = blank_snapshot().await;
            pool.close().await;
            let service = CalendarService::new(&db.path);
            let grid = service.month_view(2024, 13, None).await.unwrap();
            assert!(grid.weeks.is_empty());
        }
    }
}
