use time::Date;

use crate::{
    statement::Institution,
    util::date::{parse_standard_date, today_local},
};

pub type Error = String;

/// The statement date to load, as YYYY-MM-DD. Defaults to today.
pub fn parse_statement_date(date: &Option<String>) -> Result<Date, Error> {
    match date {
        Some(d) => parse_standard_date(d.trim())
            .map_err(|e| format!("Invalid date \"{d}\" (expected YYYY-MM-DD): {e}")),
        None => Ok(today_local()),
    }
}

/// Institutions in the order given, without repeats. None given means all
/// of them.
pub fn select_institutions(given: &[Institution]) -> Vec<Institution> {
    if given.is_empty() {
        return Institution::ALL.to_vec();
    }
    let mut selected = Vec::with_capacity(given.len());
    for inst in given {
        if !selected.contains(inst) {
            selected.push(*inst);
        }
    }
    selected
}

#[cfg(test)]
mod tests {
    use crate::{
        statement::Institution,
        util::date::{pub_testlib::ymd, set_todays_date_for_test},
    };

    use super::{parse_statement_date, select_institutions};

    #[test]
    fn test_parse_statement_date() {
        assert_eq!(
            parse_statement_date(&Some("2020-08-15".to_string())).unwrap(),
            ymd(2020, 8, 15)
        );
        assert!(parse_statement_date(&Some("08/15/2020".to_string()))
            .unwrap_err()
            .starts_with("Invalid date \"08/15/2020\""));

        set_todays_date_for_test(ymd(2021, 3, 1));
        assert_eq!(parse_statement_date(&None).unwrap(), ymd(2021, 3, 1));
    }

    #[test]
    fn test_select_institutions() {
        assert_eq!(select_institutions(&[]), vec![Institution::Rbc, Institution::Td]);
        assert_eq!(
            select_institutions(&[Institution::Td, Institution::Td, Institution::Rbc]),
            vec![Institution::Td, Institution::Rbc]
        );
    }
}
