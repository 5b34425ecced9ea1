//! Daily schedule decisions: catch-up detection and next-run computation.

use chrono::{NaiveDateTime, NaiveTime};

/// Whether a catch-up backup should fire immediately.
///
/// Due iff there has never been a successful backup, or today's scheduled
/// moment has already passed and no backup completed since before it.
pub fn is_catch_up_due(
    now: NaiveDateTime,
    last_success: Option<NaiveDateTime>,
    daily_time: NaiveTime,
) -> bool {
    let scheduled_today = now.date().and_time(daily_time);
    match last_success {
        None => true,
        Some(last) => last < scheduled_today && now > scheduled_today,
    }
}

/// The next moment the daily backup should run: today at `daily_time` if
/// that is still ahead, otherwise tomorrow at `daily_time`.
pub fn next_occurrence(now: NaiveDateTime, daily_time: NaiveTime) -> NaiveDateTime {
    let scheduled_today = now.date().and_time(daily_time);
    if now < scheduled_today {
        scheduled_today
    } else {
        now.date()
            .succ_opt()
            .map(|tomorrow| tomorrow.and_time(daily_time))
            .unwrap_or(scheduled_today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn noon() -> NaiveTime {
        NaiveTime::from_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn test_not_due_before_todays_slot() {
        // Yesterday's backup exists and today's slot hasn't passed yet
        assert!(!is_catch_up_due(at(6, 10, 0), Some(at(5, 12, 5)), noon()));
    }

    #[test]
    fn test_due_after_missed_slot() {
        assert!(is_catch_up_due(at(6, 13, 0), Some(at(5, 12, 5)), noon()));
    }

    #[test]
    fn test_not_due_when_already_backed_up_today() {
        assert!(!is_catch_up_due(at(6, 13, 0), Some(at(6, 12, 30)), noon()));
    }

    #[test]
    fn test_due_when_never_backed_up() {
        assert!(is_catch_up_due(at(6, 10, 0), None, noon()));
    }

    #[test]
    fn test_not_due_exactly_at_slot() {
        // The daily timer will fire normally; no catch-up at the boundary
        assert!(!is_catch_up_due(at(6, 12, 0), Some(at(5, 12, 0)), noon()));
    }

    #[test]
    fn test_next_occurrence_today_when_slot_ahead() {
        assert_eq!(next_occurrence(at(6, 9, 0), noon()), at(6, 12, 0));
    }

    #[test]
    fn test_next_occurrence_tomorrow_when_slot_passed() {
        assert_eq!(next_occurrence(at(6, 12, 0), noon()), at(7, 12, 0));
        assert_eq!(next_occurrence(at(6, 18, 30), noon()), at(7, 12, 0));
    }
}
