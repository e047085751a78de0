use chrono::{DateTime, Datelike, Days, Local, NaiveDate, TimeDelta, Utc, Weekday};
use chrono_tz::{OffsetComponents, Tz};

use crate::error::{GenError, Result};

/// Parse an English weekday name (`"Friday"`, `" monday "`, `"tue"`) or an index
/// where 0 is Monday and 6 is Sunday.
pub fn parse_weekday(day: &str) -> Result<Weekday> {
    let trimmed = day.trim();
    if let Ok(index) = trimmed.parse::<u8>() {
        return Weekday::try_from(index).map_err(|_| GenError::UnknownWeekday(day.to_string()));
    }
    trimmed
        .to_ascii_lowercase()
        .parse::<Weekday>()
        .map_err(|_| GenError::UnknownWeekday(day.to_string()))
}

/// The first date on or after `today` that falls on `day`, pushed `weeks_out` weeks later.
pub fn date_by_weekday(day: Weekday, weeks_out: u32, today: NaiveDate) -> Result<NaiveDate> {
    let ahead = (7 + day.num_days_from_monday() - today.weekday().num_days_from_monday()) % 7;
    let days = u64::from(ahead) + 7 * u64::from(weeks_out);
    today
        .checked_add_days(Days::new(days))
        .ok_or(GenError::OutOfRange)
}

/// [`date_by_weekday`] counted from the local date.
pub fn next_weekday(day: Weekday, weeks_out: u32) -> Result<NaiveDate> {
    date_by_weekday(day, weeks_out, Local::now().date_naive())
}

/// Whether daylight saving time is in effect in `timezone` at `at`.
///
/// `timezone` is an IANA name; an empty name means UTC.
pub fn is_dst(timezone: &str, at: DateTime<Utc>) -> Result<bool> {
    let name = timezone.trim();
    let tz: Tz = if name.is_empty() {
        Tz::UTC
    } else {
        name.parse()
            .map_err(|_| GenError::UnknownTimezone(timezone.to_string()))?
    };
    Ok(at.with_timezone(&tz).offset().dst_offset() != TimeDelta::zero())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn parses_names_and_indices() {
        assert_eq!(parse_weekday(" Friday "), Ok(Weekday::Fri));
        assert_eq!(parse_weekday("SUNDAY"), Ok(Weekday::Sun));
        assert_eq!(parse_weekday("0"), Ok(Weekday::Mon));
        assert_eq!(parse_weekday("6"), Ok(Weekday::Sun));
        assert!(matches!(
            parse_weekday("7"),
            Err(GenError::UnknownWeekday(_))
        ));
        assert!(matches!(
            parse_weekday("someday"),
            Err(GenError::UnknownWeekday(_))
        ));
    }

    #[test]
    fn same_weekday_is_today() {
        // 2024-05-15 is a Wednesday
        let today = date(2024, 5, 15);
        assert_eq!(date_by_weekday(Weekday::Wed, 0, today), Ok(today));
    }

    #[test]
    fn earlier_weekday_wraps_to_next_week() {
        let today = date(2024, 5, 15);
        assert_eq!(
            date_by_weekday(Weekday::Mon, 0, today),
            Ok(date(2024, 5, 20))
        );
        assert_eq!(
            date_by_weekday(Weekday::Fri, 0, today),
            Ok(date(2024, 5, 17))
        );
    }

    #[test]
    fn weeks_out_adds_whole_weeks() {
        let today = date(2024, 5, 15);
        assert_eq!(
            date_by_weekday(Weekday::Fri, 2, today),
            Ok(date(2024, 5, 31))
        );
    }

    #[test]
    fn dst_follows_the_zone_calendar() {
        let summer = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
        let winter = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();

        assert_eq!(is_dst("America/New_York", summer), Ok(true));
        assert_eq!(is_dst("America/New_York", winter), Ok(false));
        assert_eq!(is_dst("", summer), Ok(false));
        assert_eq!(is_dst("Asia/Tokyo", summer), Ok(false));
    }

    #[test]
    fn unknown_zone_is_an_error() {
        let now = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
        assert!(matches!(
            is_dst("Mars/Olympus_Mons", now),
            Err(GenError::UnknownTimezone(_))
        ));
    }
}
