//! Display strings for event lists and timeline labels

use chrono::{Datelike, NaiveDateTime, Timelike};
use contracts::{Event, EventTime};

/// `Y/M/D HH:MM` with unpadded month and day
pub fn format_date_time(t: &NaiveDateTime) -> String {
    format!(
        "{}/{}/{} {:02}:{:02}",
        t.year(),
        t.month(),
        t.day(),
        t.hour(),
        t.minute()
    )
}

/// `Y/M/D HH:MM:SS`
pub fn format_full_timestamp(t: &NaiveDateTime) -> String {
    format!("{}:{:02}", format_date_time(t), t.second())
}

/// `Y/M/D HH:MM~HH:MM` on one day, full dates on both ends otherwise
pub fn format_time_range(start: &NaiveDateTime, end: &NaiveDateTime) -> String {
    if start.date() == end.date() {
        format!(
            "{}/{}/{} {:02}:{:02}~{:02}:{:02}",
            start.year(),
            start.month(),
            start.day(),
            start.hour(),
            start.minute(),
            end.hour(),
            end.minute()
        )
    } else {
        format!("{}~{}", format_date_time(start), format_date_time(end))
    }
}

/// `MM:SS`; non-finite or negative input reads as zero
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Event list timestamp label
pub fn format_event_time(event: &Event, default_clip_duration_s: f64) -> String {
    match event.display_time(default_clip_duration_s) {
        Some(EventTime::Triggered(t)) => format_full_timestamp(&t),
        Some(EventTime::Range { start, end }) => format_time_range(&start, &end),
        None => "N/A".to_string(),
    }
}

/// `(lat, lon)` with the given precision
pub fn format_gps((lat, lon): (f64, f64), decimals: usize) -> String {
    format!("{lat:.decimals$}, {lon:.decimals$}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use contracts::Clip;

    fn t(d: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, d)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_formats() {
        assert_eq!(format_full_timestamp(&t(9, 8, 5, 3)), "2024/3/9 08:05:03");
        assert_eq!(format_time_range(&t(9, 8, 0, 0), &t(9, 8, 11, 0)), "2024/3/9 08:00~08:11");
        assert_eq!(
            format_time_range(&t(9, 23, 59, 0), &t(10, 0, 1, 0)),
            "2024/3/9 23:59~2024/3/10 00:01"
        );
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "00:00");
        assert_eq!(format_duration(61.9), "01:01");
        assert_eq!(format_duration(f64::NAN), "00:00");
        assert_eq!(format_duration(3600.0), "60:00");
    }

    #[test]
    fn test_event_time_label() {
        let evt = Event {
            id: "x".into(),
            name: "x".into(),
            clips: vec![Clip::new(t(9, 8, 0, 0)), Clip::new(t(9, 8, 1, 0))],
            metadata: None,
            thumbnail: None,
            read: false,
        };
        assert_eq!(format_event_time(&evt, 60.0), "2024/3/9 08:00~08:02");
    }

    #[test]
    fn test_format_gps() {
        assert_eq!(format_gps((25.04781, 121.51702), 4), "25.0478, 121.5170");
    }
}
