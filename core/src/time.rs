use anyhow::{anyhow, Result};
use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};

/// Parses a due date relative to `today`. Blank input or `none` clears it.
///
/// Accepted forms: `today`/`tod`, `tomorrow`/`tom`, `eow`, `eom`, `+Nd`,
/// `+Nw`, `+Nm`, weekdays (`fri`, `2:fri`) and `YYYY-MM-DD`.
pub fn parse_due_date_from(input: &str, today: NaiveDate) -> Result<Option<NaiveDate>> {
    let input = input.trim().to_lowercase();

    // 1. Reserved keywords
    match input.as_str() {
        "" | "none" | "-" => return Ok(None),
        "today" | "tod" => return Ok(Some(today)),
        "tomorrow" | "tom" => return Ok(Some(today + Duration::days(1))),
        "eow" => {
            // End of week (Sunday)
            let days_to_sunday = 6 - today.weekday().num_days_from_monday() as i64;
            return Ok(Some(today + Duration::days(days_to_sunday)));
        }
        "eom" => {
            let first = today
                .with_day(1)
                .ok_or_else(|| anyhow!("Invalid date: {}", today))?;
            let next_month = first
                .checked_add_months(Months::new(1))
                .ok_or_else(|| anyhow!("Date out of range"))?;
            return Ok(Some(next_month - Duration::days(1)));
        }
        _ => {}
    }

    // 2. Relative format (+Nd, +Nw, +Nm)
    if let Some(rest) = input.strip_prefix('+') {
        let mut chars = rest.chars();
        let unit = chars.next_back();
        let count: u32 = chars
            .as_str()
            .parse()
            .map_err(|_| anyhow!("Invalid relative format: {}", input))?;

        let target = match unit {
            Some('d') => today.checked_add_signed(Duration::days(count as i64)),
            Some('w') => today.checked_add_signed(Duration::weeks(count as i64)),
            // clamps to the month's last day (Jan 31 + 1m -> Feb 28/29)
            Some('m') => today.checked_add_months(Months::new(count)),
            _ => return Err(anyhow!("Unknown unit in relative date: {}", input)),
        };
        return target
            .map(Some)
            .ok_or_else(|| anyhow!("Date out of range: {}", input));
    }

    // 3. Weekday format (fri, 2:fri)
    if let Some((count, day_str)) = parse_weekday_token(&input) {
        if let Ok(target_weekday) = parse_weekday_str(day_str) {
            let mut days_needed = target_weekday.num_days_from_monday() as i64
                - today.weekday().num_days_from_monday() as i64;
            if days_needed <= 0 {
                days_needed += 7;
            }
            // count = 1 is the next one, 2 the one after that
            let target = (count.max(1) - 1)
                .checked_mul(7)
                .and_then(|extra| days_needed.checked_add(extra))
                .and_then(Duration::try_days)
                .and_then(|delta| today.checked_add_signed(delta));
            return target
                .map(Some)
                .ok_or_else(|| anyhow!("Date out of range: {}", input));
        }
    }

    // 4. Fallback to ISO date
    NaiveDate::parse_from_str(&input, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| anyhow!("Could not parse date: {}", input))
}

fn parse_weekday_token(input: &str) -> Option<(i64, &str)> {
    match input.split_once(':') {
        Some((count, day)) => count.parse::<i64>().ok().map(|c| (c, day)),
        // Just "fri" means 1:fri
        None => Some((1, input)),
    }
}

fn parse_weekday_str(s: &str) -> Result<Weekday> {
    match s {
        "mon" | "monday" => Ok(Weekday::Mon),
        "tue" | "tuesday" => Ok(Weekday::Tue),
        "wed" | "wednesday" => Ok(Weekday::Wed),
        "thu" | "thursday" => Ok(Weekday::Thu),
        "fri" | "friday" => Ok(Weekday::Fri),
        "sat" | "saturday" => Ok(Weekday::Sat),
        "sun" | "sunday" => Ok(Weekday::Sun),
        _ => Err(anyhow!("Invalid weekday")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-05-15 is a Wednesday
    fn wednesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_parse_weekday_token() {
        assert_eq!(parse_weekday_token("fri"), Some((1, "fri")));
        assert_eq!(parse_weekday_token("2:fri"), Some((2, "fri")));
        assert_eq!(parse_weekday_token("10:mon"), Some((10, "mon")));
        assert_eq!(parse_weekday_token("x:mon"), None);
    }

    #[test]
    fn keywords() {
        let today = wednesday();
        assert_eq!(parse_due_date_from("today", today).unwrap(), Some(today));
        assert_eq!(parse_due_date_from("Tom", today).unwrap(), date(2024, 5, 16));
        assert_eq!(parse_due_date_from("eow", today).unwrap(), date(2024, 5, 19));
        assert_eq!(parse_due_date_from("eom", today).unwrap(), date(2024, 5, 31));
        assert_eq!(parse_due_date_from("", today).unwrap(), None);
        assert_eq!(parse_due_date_from("none", today).unwrap(), None);
    }

    #[test]
    fn relative_offsets() {
        let today = wednesday();
        assert_eq!(parse_due_date_from("+3d", today).unwrap(), date(2024, 5, 18));
        assert_eq!(parse_due_date_from("+2w", today).unwrap(), date(2024, 5, 29));
        assert_eq!(parse_due_date_from("+1m", today).unwrap(), date(2024, 6, 15));

        let jan31 = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(parse_due_date_from("+1m", jan31).unwrap(), date(2024, 2, 29));
        assert!(parse_due_date_from("+d", today).is_err());
        assert!(parse_due_date_from("+3y", today).is_err());
        assert!(parse_due_date_from("+", today).is_err());
    }

    #[test]
    fn multibyte_unit_is_rejected() {
        let today = wednesday();
        assert!(parse_due_date_from("+3é", today).is_err());
        assert!(parse_due_date_from("+é", today).is_err());
    }

    #[test]
    fn weekdays() {
        let today = wednesday();
        assert_eq!(parse_due_date_from("fri", today).unwrap(), date(2024, 5, 17));
        assert_eq!(parse_due_date_from("2:fri", today).unwrap(), date(2024, 5, 24));
        // same weekday means next week
        assert_eq!(parse_due_date_from("wed", today).unwrap(), date(2024, 5, 22));
    }

    #[test]
    fn far_weekday_is_out_of_range() {
        let today = wednesday();
        let err = parse_due_date_from("100000000:fri", today).unwrap_err();
        assert!(err.to_string().contains("out of range"));
        assert!(parse_due_date_from("9223372036854775807:fri", today).is_err());
    }

    #[test]
    fn iso_dates_and_garbage() {
        let today = wednesday();
        assert_eq!(parse_due_date_from("2025-01-02", today).unwrap(), date(2025, 1, 2));
        assert!(parse_due_date_from("someday", today).is_err());
        assert!(parse_due_date_from("2025-13-40", today).is_err());
    }
}
