//! TD Direct Investing holdings export.
//!
//! Plain comma separated (no quoting unless needed), usually with a UTF-8
//! byte order mark. A key/value preamble is followed by the positions table:
//!
//! ```text
//! Account Number,TD01
//! Account Type,Direct Investing
//! As of Date,2020-08-15
//! Cash,CAD,96.00
//! Investments,CAD,4904.00
//! Total Value,CAD,5000.00
//!
//! Symbol,Market,Description,Quantity,Average Cost,Price,Book Cost,Market Value
//! TD,CA,TORONTO-DOMINION BANK,40,55.00,58.60,2200.00,2344.00
//! ,,Total,,,,4600.00,4904.00
//! ```
//!
//! TD does not state an exchange rate, and each position's currency comes
//! from its market.

use std::path::Path;

use crate::{
    statement::{
        error::StatementError,
        institution::Institution,
        model::{Currency, Entry, Holding},
        normalize::{BalanceKind, EntryBuilder},
    },
    util::{date::parse_standard_date, decimal::parse_opt_large_decimal},
};

use super::{
    malformed,
    sheet::{read_rows, Row, RowReader, SheetParseError},
    unsupported, Analyzer,
};

const FIRST_KEY: &str = "Account Number";

struct HoldingCol();
impl HoldingCol {
    const SYMBOL: &'static str = "Symbol";
    const MARKET: &'static str = "Market";
    const DESCRIPTION: &'static str = "Description";
    const QUANTITY: &'static str = "Quantity";
    const AVERAGE_COST: &'static str = "Average Cost";
    const PRICE: &'static str = "Price";
    const BOOK_COST: &'static str = "Book Cost";
    const MARKET_VALUE: &'static str = "Market Value";

    fn all() -> [&'static str; 8] {
        [
            HoldingCol::SYMBOL,
            HoldingCol::MARKET,
            HoldingCol::DESCRIPTION,
            HoldingCol::QUANTITY,
            HoldingCol::AVERAGE_COST,
            HoldingCol::PRICE,
            HoldingCol::BOOK_COST,
            HoldingCol::MARKET_VALUE,
        ]
    }
}

/// Trailing subtotal rows have no symbol. Trades not yet settled are
/// listed with a '*' after the symbol.
fn is_ignorable_symbol(symbol: &str) -> bool {
    symbol.is_empty() || symbol.ends_with('*')
}

fn market_currency(market: &str) -> Option<Currency> {
    match market.to_uppercase().as_str() {
        "CA" => Some(Currency::cad()),
        "US" => Some(Currency::usd()),
        _ => None,
    }
}

enum PreambleLine {
    Handled,
    Unrecognized,
}

pub struct TdAnalyzer {}

impl TdAnalyzer {
    fn parse_preamble_row(
        &self,
        row: &Row,
        builder: &mut EntryBuilder,
    ) -> Result<PreambleLine, SheetParseError> {
        let balance_kind = match row.cell(0) {
            "Account Number" => {
                builder.set_account_num(row.cell(1));
                return Ok(PreambleLine::Handled);
            }
            "Account Type" => {
                builder.set_account_name(row.cell(1));
                return Ok(PreambleLine::Handled);
            }
            "As of Date" => {
                parse_standard_date(row.cell(1))
                    .map_err(|e| row.err(format!("As of Date \"{}\": {e}", row.cell(1))))?;
                return Ok(PreambleLine::Handled);
            }
            "Cash" => BalanceKind::Cash,
            "Investments" => BalanceKind::Investments,
            "Total Value" => BalanceKind::Total,
            _ => return Ok(PreambleLine::Unrecognized),
        };

        if row.cell(1).is_empty() {
            return Err(row.err(format!("{} has no currency", row.cell(0))));
        }
        let amount = parse_opt_large_decimal(row.cell(2))
            .map_err(|e| row.err(format!("{}: {e}", row.cell(0))))?;
        builder
            .add_balance(balance_kind, &Currency::new(row.cell(1)), amount)
            .map_err(|e| row.err(format!("{}: {e}", row.cell(0))))?;
        Ok(PreambleLine::Handled)
    }

    fn parse_holding_row(
        &self,
        reader: &RowReader,
        row: &Row,
        builder: &mut EntryBuilder,
    ) -> Result<(), SheetParseError> {
        let symbol = reader.get_str(HoldingCol::SYMBOL)?;
        if is_ignorable_symbol(&symbol) {
            builder.ignore_row(
                row.row_num,
                &format!("{symbol} {}", reader.get_str(HoldingCol::DESCRIPTION)?),
            );
            return Ok(());
        }

        let market = reader.get_str(HoldingCol::MARKET)?;
        let currency = market_currency(&market)
            .ok_or_else(|| row.err(format!("Unknown market \"{market}\" for {symbol}")))?;

        builder.add_holding(Holding {
            symbol,
            description: reader.get_str(HoldingCol::DESCRIPTION)?,
            quantity: reader.get_dec(HoldingCol::QUANTITY)?,
            currency,
            price: reader.get_opt_dec(HoldingCol::PRICE)?,
            book_value: reader.get_opt_dec(HoldingCol::BOOK_COST)?,
            market_value: reader.get_dec(HoldingCol::MARKET_VALUE)?,
            row_num: row.row_num,
        });
        Ok(())
    }
}

impl Analyzer for TdAnalyzer {
    const INSTITUTION: Institution = Institution::Td;
    const FILE_NAME_GLOB_FORMAT: &'static str = "TD_Holdings_*_[year][month][day].csv";

    fn new() -> Self {
        TdAnalyzer {}
    }

    fn parse_text(&mut self, path: &Path, text: &str) -> Result<Entry, StatementError> {
        let rows = read_rows(text, b',').map_err(|e| unsupported(path, e))?;

        match rows.iter().find(|r| !r.is_blank()) {
            Some(first) if first.cell(0) == FIRST_KEY => (),
            _ => {
                return Err(unsupported(path, format!("First line is not \"{FIRST_KEY}\"")))
            }
        }

        let mut builder = EntryBuilder::new();
        let mut holdings_reader: Option<RowReader> = None;

        for row in rows.iter().filter(|r| !r.is_blank()) {
            if let Some(reader) = holdings_reader.as_mut() {
                reader.set_row(row);
                self.parse_holding_row(reader, row, &mut builder)
                    .map_err(|e| malformed(path, e))?;
                continue;
            }

            if row.cell(0) == HoldingCol::SYMBOL {
                holdings_reader = Some(
                    RowReader::new(row, &HoldingCol::all()).map_err(|e| unsupported(path, e))?,
                );
                continue;
            }

            let line = self
                .parse_preamble_row(row, &mut builder)
                .map_err(|e| malformed(path, e))?;
            if let PreambleLine::Unrecognized = line {
                return Err(unsupported(
                    path,
                    row.err(format!("Unrecognized line \"{}\"", row.cell(0))),
                ));
            }
        }

        if holdings_reader.is_none() {
            if !builder.has_account_num() {
                return Err(malformed(path, "No account number found"));
            }
            return Err(unsupported(path, "No holdings table found"));
        }

        builder.finish(path)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use rust_decimal_macros::dec;

    use crate::{
        gezdec,
        statement::{analyzer::Analyzer, error::StatementError, model::Currency},
        util::rw::DescribedReader,
    };

    use super::{is_ignorable_symbol, market_currency, TdAnalyzer};

    const HEADER: &str =
        "Symbol,Market,Description,Quantity,Average Cost,Price,Book Cost,Market Value\n";

    fn parse(text: &str) -> Result<crate::statement::model::Entry, StatementError> {
        TdAnalyzer::new().parse_text(Path::new("td.csv"), text)
    }

    fn statement(preamble_extra: &str, holdings: &str) -> String {
        format!(
            "Account Number,TD01\nAccount Type,Direct Investing\nAs of Date,2020-08-15\n\
             {preamble_extra}\n{HEADER}{holdings}"
        )
    }

    #[test]
    fn test_is_ignorable_symbol() {
        assert!(is_ignorable_symbol(""));
        assert!(is_ignorable_symbol("SHOP*"));
        assert!(!is_ignorable_symbol("TD"));
    }

    #[test]
    fn test_market_currency() {
        assert_eq!(market_currency("CA"), Some(Currency::cad()));
        assert_eq!(market_currency("us"), Some(Currency::usd()));
        assert_eq!(market_currency("UK"), None);
    }

    #[test]
    fn test_parse() {
        let text = statement(
            "Cash,CAD,50.00\nCash,CAD,46.00\nInvestments,CAD,4904.00\nTotal Value,CAD,5000.00\n",
            "TD,CA,TORONTO-DOMINION BANK,40,55.00,58.60,2200.00,2344.00\n\
             XIU,CA,ISHARES S&P/TSX 60 INDEX ETF,100,24.00,25.60,2400.00,2560.00\n\
             ,,Total,,,,4600.00,4904.00\n",
        );
        let e = parse(&text).unwrap();
        assert_eq!(e.account_num, "TD01");
        assert_eq!(e.account_name, "Direct Investing");
        assert_eq!(e.usrate, gezdec!(0));
        assert_eq!(e.cash.len(), 1);
        assert_eq!(e.cash.get(&Currency::cad()).unwrap().to_string(), "96.00");
        assert_eq!(e.stated_totals.get(&Currency::cad()).unwrap().to_string(), "5000.00");
        assert_eq!(e.holdings.len(), 2);
        assert_eq!(e.holdings[1].symbol, "XIU");
        assert_eq!(e.holdings[1].quantity, dec!(100));
        assert_eq!(e.holdings[1].price, Some(dec!(25.60)));
        assert_eq!(e.ignored_rows, 1);
        assert_eq!(e.investment_discrepancies().unwrap(), vec![]);
    }

    #[test]
    fn test_parse_with_bom_and_us_holding() {
        let text = format!(
            "\u{feff}{}",
            statement(
                "Cash,CAD,10.00\nCash,USD,5.00\nInvestments,USD,120.00\n",
                "VTI,US,VANGUARD TOTAL STOCK MARKET ETF,1,100.00,120.00,100.00,120.00\n\
                 SHOP*,CA,SHOPIFY INC,1,,,,1400.00\n",
            )
        );
        let e = TdAnalyzer::new()
            .parse_reader(&DescribedReader::from_string("td.csv".to_string(), text))
            .unwrap();
        assert_eq!(e.holdings.len(), 1);
        assert_eq!(e.holdings[0].currency, Currency::usd());
        assert_eq!(e.cash.len(), 2);
        assert_eq!(e.ignored_rows, 1);
    }

    #[test]
    fn test_unsupported() {
        assert!(matches!(
            parse("Symbol,Market\n"),
            Err(StatementError::UnsupportedFormat { .. })
        ));

        let text = statement("Cash,CAD,1.00\nMargin Power,CAD,5.00\n", "");
        match parse(&text) {
            Err(StatementError::UnsupportedFormat { reason, .. }) => {
                assert_eq!(reason, "Row 5: Unrecognized line \"Margin Power\"")
            }
            other => panic!("Unexpected {other:?}"),
        }

        let text = statement("Cash,CAD,1.00\n", "").replace(",Market Value", "");
        assert!(matches!(parse(&text), Err(StatementError::UnsupportedFormat { .. })));

        let text = "Account Number,TD01\nCash,CAD,1.00\n";
        assert!(matches!(parse(text), Err(StatementError::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_malformed() {
        let text = statement("Cash,CAD,1.00\n", "").replace("Account Number,TD01", "Account Number,");
        match parse(&text) {
            Err(StatementError::MalformedStatement { reason, .. }) => {
                assert_eq!(reason, "No account number found")
            }
            other => panic!("Unexpected {other:?}"),
        }

        let text = statement("", "");
        assert!(matches!(parse(&text), Err(StatementError::MalformedStatement { .. })));

        let text = statement("Cash,CAD,abc\n", "");
        assert!(matches!(parse(&text), Err(StatementError::MalformedStatement { .. })));

        let text = statement("Cash,CAD,1.00\n", "BP,UK,BP PLC,1,1,1,1,1\n");
        assert!(matches!(parse(&text), Err(StatementError::MalformedStatement { .. })));

        let text = statement("Cash,CAD,1.00\n", "").replace("2020-08-15", "Aug 15");
        assert!(matches!(parse(&text), Err(StatementError::MalformedStatement { .. })));

        let max = "79228162514264337593543950335";
        let text = statement(&format!("Cash,CAD,{max}\nCash,CAD,{max}\n"), "");
        match parse(&text) {
            Err(StatementError::MalformedStatement { reason, .. }) => {
                assert_eq!(reason, "Row 5: Cash: CAD amount out of range")
            }
            other => panic!("Unexpected {other:?}"),
        }
    }
}
