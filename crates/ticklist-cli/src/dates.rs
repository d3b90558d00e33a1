use chrono::{DateTime, Utc};

/// Calendar-day distance rendered the way the list shows it: "Today",
/// "Yesterday", "N days ago" within a week, otherwise the date itself.
pub fn relative_day(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    match (now.date_naive() - then.date_naive()).num_days() {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        days @ 2..=6 => format!("{days} days ago"),
        _ => then.format("%Y-%m-%d").to_string(),
    }
}

/// "Created …" plus "Completed …" for finished items.
pub fn describe_dates(
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> String {
    let mut out = format!("Created {}", relative_day(created_at, now));
    if let Some(done) = completed_at {
        out.push_str(&format!(" · Completed {}", relative_day(done, now)));
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn counts_calendar_days_not_hours() {
        let now = at(10, 1);
        assert_eq!(relative_day(at(10, 0), now), "Today");
        assert_eq!(relative_day(at(9, 23), now), "Yesterday");
        assert_eq!(relative_day(at(5, 12), now), "5 days ago");
    }

    #[test]
    fn older_or_future_dates_are_absolute() {
        let now = at(10, 12);
        assert_eq!(relative_day(at(3, 12), now), "2024-03-03");
        assert_eq!(relative_day(at(11, 12), now), "2024-03-11");
    }

    #[test]
    fn completion_date_only_for_finished_items() {
        let now = at(10, 12);
        assert_eq!(describe_dates(at(8, 9), None, now), "Created 2 days ago");
        assert_eq!(
            describe_dates(at(8, 9), Some(at(10, 8)), now),
            "Created 2 days ago · Completed Today"
        );
    }
}
