//! Statement file naming conventions.
//!
//! Each analyzer declares a `time` format description, where the bracketed
//! components are filled from the statement date and everything else is
//! taken literally as glob syntax. For example
//! `TD_Holdings_*_[year][month][day].csv` renders to
//! `TD_Holdings_*_20200815.csv` for 2020-08-15.

use time::Date;

use crate::util::date::parse_dyn_date_format;

use super::error::DiscoveryError;

/// Renders a file name glob format for the given statement date.
/// Nothing but the date goes into the result.
pub fn render_glob_pattern(glob_format: &str, date: Date) -> Result<String, DiscoveryError> {
    let invalid = |reason: String| DiscoveryError::InvalidFormat {
        format: glob_format.to_string(),
        reason,
    };
    let fmt = parse_dyn_date_format(glob_format).map_err(invalid)?;
    date.format(&fmt).map_err(|e| invalid(e.to_string()))
}

#[cfg(test)]
mod tests {
    use crate::util::date::pub_testlib::ymd;

    use super::render_glob_pattern;

    #[test]
    fn test_render_numeric_date() {
        assert_eq!(
            render_glob_pattern("TD_Holdings_*_[year][month][day].csv", ymd(2020, 8, 15))
                .unwrap(),
            "TD_Holdings_*_20200815.csv"
        );
        assert_eq!(
            render_glob_pattern("TD_Holdings_*_[year][month][day].csv", ymd(2021, 1, 5))
                .unwrap(),
            "TD_Holdings_*_20210105.csv"
        );
    }

    #[test]
    fn test_render_long_date() {
        let fmt = "Holdings * [month repr:long] [day padding:none], [year].csv";
        assert_eq!(
            render_glob_pattern(fmt, ymd(2020, 8, 15)).unwrap(),
            "Holdings * August 15, 2020.csv"
        );
        assert_eq!(
            render_glob_pattern(fmt, ymd(2020, 7, 5)).unwrap(),
            "Holdings * July 5, 2020.csv"
        );
    }

    #[test]
    fn test_render_is_deterministic() {
        let fmt = "x_[year][month][day]_*.csv";
        let d = ymd(2020, 8, 15);
        assert_eq!(
            render_glob_pattern(fmt, d).unwrap(),
            render_glob_pattern(fmt, d).unwrap()
        );
    }

    #[test]
    fn test_bad_format() {
        assert!(render_glob_pattern("Holdings_[yearr].csv", ymd(2020, 8, 15)).is_err());
        // Time components can't come from a calendar date.
        assert!(render_glob_pattern("Holdings_[hour].csv", ymd(2020, 8, 15)).is_err());
    }
}
