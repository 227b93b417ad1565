use std::path::Path;

use itertools::Itertools;
use rust_decimal::Decimal;

use crate::statement::{Currency, Entry, Institution};

pub type Error = String;

/// Output-agnostic table of strings, ready for any of the writers.
#[derive(Default, Debug, PartialEq, Eq)]
pub struct RenderTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub footer: Vec<String>,
    pub notes: Vec<String>,
    pub errors: Vec<String>,
}

/// One parsed statement, with what the writers need to label it.
pub struct RenderedEntry<'a> {
    pub institution: Institution,
    pub path: &'a Path,
    pub entry: &'a Entry,
}

impl RenderedEntry<'_> {
    pub fn title(&self) -> String {
        let file_name = self
            .path
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string());
        if self.entry.account_name.is_empty() {
            format!("{} account {} ({file_name})", self.institution, self.entry.account_num)
        } else {
            format!(
                "{} account {} {} ({file_name})",
                self.institution, self.entry.account_num, self.entry.account_name
            )
        }
    }
}

pub trait EntryWriter {
    fn print_entry(&mut self, rendered: &RenderedEntry) -> Result<(), Error>;

    fn finish(self: Box<Self>) -> Result<(), Error> {
        Ok(())
    }
}

fn opt_dec_str(d: &Option<Decimal>) -> String {
    d.map(|d| d.to_string()).unwrap_or_default()
}

pub fn render_holdings_table(entry: &Entry) -> RenderTable {
    let header = ["Symbol", "Description", "Quantity", "Currency", "Price", "Book Value", "Market Value"]
        .iter()
        .map(|h| h.to_string())
        .collect();

    let rows = entry
        .holdings
        .iter()
        .map(|h| {
            vec![
                h.symbol.clone(),
                h.description.clone(),
                h.quantity.to_string(),
                h.currency.to_string(),
                opt_dec_str(&h.price),
                opt_dec_str(&h.book_value),
                h.market_value.to_string(),
            ]
        })
        .collect();

    let mut notes = Vec::new();
    if entry.ignored_rows > 0 {
        notes.push(format!("{} row(s) ignored", entry.ignored_rows));
    }

    RenderTable {
        header,
        rows,
        footer: Vec::new(),
        notes,
        errors: match entry.investment_discrepancies() {
            Ok(discrepancies) => discrepancies.iter().map(|d| d.to_string()).collect(),
            Err(e) => vec![e.to_string()],
        },
    }
}

/// Cash, investments and total per currency, as stated. The footer carries
/// the USD exchange rate when there is one.
pub fn render_balances_table(entry: &Entry) -> RenderTable {
    let header = ["Currency", "Cash", "Investments", "Total"]
        .iter()
        .map(|h| h.to_string())
        .collect();

    let currencies: Vec<&Currency> = entry
        .cash
        .currencies()
        .chain(entry.stated_investments.currencies())
        .chain(entry.stated_totals.currencies())
        .sorted()
        .dedup()
        .collect();

    let amount_str = |d: Option<&Decimal>| d.map(|d| d.to_string()).unwrap_or_default();
    let rows = currencies
        .into_iter()
        .map(|c| {
            vec![
                c.to_string(),
                amount_str(entry.cash.get(c)),
                amount_str(entry.stated_investments.get(c)),
                amount_str(entry.stated_totals.get(c)),
            ]
        })
        .collect();

    let footer = if entry.usrate.is_zero() {
        Vec::new()
    } else {
        vec!["USD rate".to_string(), entry.usrate.to_string()]
    };

    RenderTable { header, rows, footer, ..RenderTable::default() }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use rust_decimal_macros::dec;

    use crate::{
        gezdec,
        statement::{
            model::{CurrencyAmounts, Entry, Holding},
            Currency, Institution,
        },
    };

    use super::{render_balances_table, render_holdings_table, RenderedEntry};

    fn entry() -> Entry {
        Entry {
            account_name: "Margin".to_string(),
            account_num: "RBC03".to_string(),
            usrate: gezdec!(1.3259),
            cash: CurrencyAmounts::sum([
                (Currency::usd(), dec!(91.70)),
                (Currency::cad(), dec!(0.00)),
            ])
            .unwrap(),
            stated_totals: CurrencyAmounts::sum([(Currency::usd(), dec!(1156.70))]).unwrap(),
            stated_investments: CurrencyAmounts::sum([(Currency::usd(), dec!(1065.00))]).unwrap(),
            holdings: vec![Holding {
                symbol: "MSFT".to_string(),
                description: "MICROSOFT CORP".to_string(),
                quantity: dec!(5),
                currency: Currency::usd(),
                price: Some(dec!(213.02)),
                book_value: None,
                market_value: dec!(1065.10),
                row_num: 12,
            }],
            ignored_rows: 2,
        }
    }

    #[test]
    fn test_holdings_table() {
        let t = render_holdings_table(&entry());
        assert_eq!(t.header.len(), 7);
        assert_eq!(
            t.rows,
            vec![vec!["MSFT", "MICROSOFT CORP", "5", "USD", "213.02", "", "1065.10"]]
        );
        assert_eq!(t.notes, vec!["2 row(s) ignored"]);
        assert_eq!(
            t.errors,
            vec!["USD investments stated as 1065.00 but holdings add up to 1065.10"]
        );
    }

    #[test]
    fn test_balances_table() {
        let t = render_balances_table(&entry());
        assert_eq!(
            t.rows,
            vec![
                vec!["CAD", "0.00", "", ""],
                vec!["USD", "91.70", "1065.00", "1156.70"],
            ]
        );
        assert_eq!(t.footer, vec!["USD rate", "1.3259"]);

        let mut e = entry();
        e.usrate = Default::default();
        e.cash = CurrencyAmounts::default();
        assert!(render_balances_table(&e).footer.is_empty());
    }

    #[test]
    fn test_title() {
        let e = entry();
        let r = RenderedEntry {
            institution: Institution::Rbc,
            path: Path::new("stmts/Holdings RBC03 August 15, 2020.csv"),
            entry: &e,
        };
        assert_eq!(r.title(), "RBC account RBC03 Margin (Holdings RBC03 August 15, 2020.csv)");
    }
}
