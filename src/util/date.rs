use std::cell::RefCell;

use chrono::Datelike;
pub use time::Date;
use time::{macros::format_description, Month, UtcOffset};

use super::basic::SError;

pub type StaticDateFormat<'a> =
    &'static [time::format_description::BorrowedFormatItem<'a>];
pub type DynDateFormat = time::format_description::OwnedFormatItem;

pub const STANDARD_DATE_FORMAT: StaticDateFormat =
    format_description!("[year]-[month]-[day]");

pub fn parse_standard_date(date_str: &str) -> Result<Date, time::error::Parse> {
    Date::parse(date_str, STANDARD_DATE_FORMAT)
}

pub fn parse_dyn_date_format(fmt: &str) -> Result<DynDateFormat, SError> {
    // The documentation recommends version 2
    const VERSION: usize = 2;
    time::format_description::parse_owned::<VERSION>(fmt)
        .map_err(|e| format!("{}", e))
}

fn date_naive_to_date(dn: &chrono::NaiveDate) -> Date {
    Date::from_calendar_date(
        dn.year(),
        Month::December.nth_next(dn.month() as u8),
        dn.day() as u8,
    )
    .unwrap()
}

pub fn parse_month(m: &str) -> Result<Month, ()> {
    let m_lower = m.to_lowercase();
    let trimmed = m_lower.trim();
    if trimmed.starts_with("jan") {
        Ok(Month::January)
    } else if trimmed.starts_with("feb") {
        Ok(Month::February)
    } else if trimmed.starts_with("mar") {
        Ok(Month::March)
    } else if trimmed.starts_with("apr") {
        Ok(Month::April)
    } else if trimmed.starts_with("may") {
        Ok(Month::May)
    } else if trimmed.starts_with("jun") {
        Ok(Month::June)
    } else if trimmed.starts_with("jul") {
        Ok(Month::July)
    } else if trimmed.starts_with("aug") {
        Ok(Month::August)
    } else if trimmed.starts_with("sep") {
        Ok(Month::September)
    } else if trimmed.starts_with("oct") {
        Ok(Month::October)
    } else if trimmed.starts_with("nov") {
        Ok(Month::November)
    } else if trimmed.starts_with("dec") {
        Ok(Month::December)
    } else {
        Err(())
    }
}

/// Parses dates like "August 15, 2020" or "Aug 5, 2020".
pub fn parse_long_date(date_str: &str) -> Result<Date, SError> {
    let err = || format!("Unable to parse date \"{date_str}\"");
    let (month_day, year) = date_str.trim().split_once(',').ok_or_else(err)?;
    let (month, day) = month_day.trim().split_once(' ').ok_or_else(err)?;
    let month = parse_month(month).map_err(|_| err())?;
    let day: u8 = day.trim().parse().map_err(|_| err())?;
    let year: i32 = year.trim().parse().map_err(|_| err())?;
    Date::from_calendar_date(year, month, day).map_err(|e| format!("{}: {e}", err()))
}

thread_local! {
    static TODAYS_DATE_FOR_TEST_TL: RefCell<Date> = RefCell::new(Date::MIN);
}

pub fn set_todays_date_for_test(d: Date) {
    TODAYS_DATE_FOR_TEST_TL.with_borrow_mut(|d_| *d_ = d);
}

pub fn today_local() -> Date {
    let test_date: Date = TODAYS_DATE_FOR_TEST_TL.with_borrow(|d| *d);
    if test_date != Date::MIN {
        return test_date;
    }
    let now = chrono::offset::Local::now();
    date_naive_to_date(&now.date_naive())
}

// Using UtcOffset::current_local_offset is unsafe on Linux, and will return an
// error unless some "unsafe" feature is enabled, so go through chrono instead.
pub fn local_utc_offset() -> Result<UtcOffset, time::error::ComponentRange> {
    let now = chrono::offset::Local::now();
    let offset = now.offset();
    UtcOffset::from_whole_seconds(-1 * offset.utc_minus_local())
}

// Used by both unit and integration tests
pub mod pub_testlib {
    use time::{Date, Month};

    pub fn ymd(year: i32, month: u8, day: u8) -> Date {
        Date::from_calendar_date(year, Month::December.nth_next(month), day)
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use time::{Date, Month};

    use super::{
        date_naive_to_date, parse_long_date, parse_standard_date,
        pub_testlib::ymd,
    };

    #[test]
    fn test_parse() {
        let d = parse_standard_date("2020-08-15");
        assert_eq!(
            d.unwrap(),
            Date::from_calendar_date(2020, Month::August, 15).unwrap()
        );

        let d = parse_standard_date("2020-08-41");
        assert!(d.is_err());
    }

    #[test]
    fn test_parse_long_date() {
        assert_eq!(parse_long_date("August 15, 2020").unwrap(), ymd(2020, 8, 15));
        assert_eq!(parse_long_date(" Aug 5, 2020 ").unwrap(), ymd(2020, 8, 5));
        assert_eq!(parse_long_date("december 31,2019").unwrap(), ymd(2019, 12, 31));

        assert!(parse_long_date("August 15 2020").is_err());
        assert!(parse_long_date("Smarch 15, 2020").is_err());
        assert!(parse_long_date("February 30, 2020").is_err());
    }

    #[test]
    fn test_date_naive_to_date() {
        let naive_date = NaiveDate::from_ymd_opt(2020, 8, 15).unwrap();
        assert_eq!(date_naive_to_date(&naive_date), ymd(2020, 8, 15));
    }
}
