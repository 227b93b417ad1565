//! RBC Direct Investing "Account Holdings" export.
//!
//! ```text
//! "Account Holdings Export","RBC Direct Investing"
//! "Account","RBC01","RSP"
//! "As Of","August 15, 2020"
//! "Exchange Rate","USD","1.3259"
//! ""
//! "Balances","Currency","Cash","Investments","Total"
//! "","CAD","68.45","3531.55","3600.00"
//! "","USD","85.90","2614.10","2700.00"
//! ""
//! "Product","Symbol","Name","Quantity","Last Price","Currency","Total Book Cost","Total Market Value"
//! "Equities","XIC","ISHARES CORE S&P/TSX CAPPED COMPOSITE ETF","40","28.50","CAD","1000.00","1140.00"
//! ```
//!
//! The exchange rate line only appears for accounts with USD content.
//! Balance rows leave a cell blank for amounts not stated in that row.

use std::path::Path;

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

use crate::{
    statement::{
        error::StatementError,
        institution::Institution,
        model::{Currency, Entry, Holding},
        normalize::{BalanceKind, EntryBuilder},
    },
    util::{
        date::parse_long_date,
        decimal::{parse_large_decimal, GreaterEqualZeroDecimal},
    },
};

use super::{
    malformed,
    sheet::{read_rows, Row, RowReader, SheetParseError},
    unsupported, Analyzer,
};

const TITLE_MARKER: &str = "Account Holdings Export";

const BALANCES_MARKER: &str = "Balances";
const BALANCE_COLS: [&str; 5] = ["Balances", "Currency", "Cash", "Investments", "Total"];

struct HoldingCol();
impl HoldingCol {
    const PRODUCT: &'static str = "Product";
    const SYMBOL: &'static str = "Symbol";
    const NAME: &'static str = "Name";
    const QUANTITY: &'static str = "Quantity";
    const LAST_PRICE: &'static str = "Last Price";
    const CURRENCY: &'static str = "Currency";
    const BOOK_COST: &'static str = "Total Book Cost";
    const MARKET_VALUE: &'static str = "Total Market Value";

    fn all() -> [&'static str; 8] {
        [
            HoldingCol::PRODUCT,
            HoldingCol::SYMBOL,
            HoldingCol::NAME,
            HoldingCol::QUANTITY,
            HoldingCol::LAST_PRICE,
            HoldingCol::CURRENCY,
            HoldingCol::BOOK_COST,
            HoldingCol::MARKET_VALUE,
        ]
    }
}

lazy_static! {
    // RBC lists pending settlements and subtotals inline with real balances
    // and positions, labelled in the first column.
    static ref IGNORABLE_LABEL_RE: Regex =
        RegexBuilder::new(r"^\s*(pending|total)")
            .case_insensitive(true)
            .build()
            .unwrap();
}

fn is_ignorable_label(label: &str) -> bool {
    IGNORABLE_LABEL_RE.is_match(label)
}

enum State {
    Preamble,
    Balances,
    LookingForHoldingsHeader,
    Holdings,
}

pub struct RbcAnalyzer {}

impl RbcAnalyzer {
    fn parse_preamble_row(
        &self,
        row: &Row,
        builder: &mut EntryBuilder,
    ) -> Result<(), SheetParseError> {
        match row.cell(0) {
            "Account" => {
                builder.set_account_num(row.cell(1));
                builder.set_account_name(row.cell(2));
            }
            "As Of" => {
                // Only checked. The statement date is whatever the caller
                // searched for.
                parse_long_date(row.cell(1)).map_err(|e| row.err(e))?;
            }
            "Exchange Rate" => {
                if Currency::new(row.cell(1)) != Currency::usd() {
                    return Err(row.err(format!(
                        "Unexpected exchange rate currency \"{}\"",
                        row.cell(1)
                    )));
                }
                let rate = parse_large_decimal(row.cell(2))
                    .and_then(|d| GreaterEqualZeroDecimal::try_from(d))
                    .map_err(|e| row.err(format!("Exchange rate: {e}")))?;
                builder.set_usrate(rate);
            }
            other => {
                return Err(row.err(format!("Unrecognized line \"{other}\"")));
            }
        }
        Ok(())
    }

    fn parse_balance_row(
        &self,
        row: &Row,
        builder: &mut EntryBuilder,
    ) -> Result<(), SheetParseError> {
        let label = row.cell(0);
        if is_ignorable_label(label) {
            builder.ignore_row(row.row_num, &format!("{label} balance"));
            return Ok(());
        }

        let mut reader = RowReader::with_columns(&BALANCE_COLS);
        reader.set_row(row);
        let currency_str = reader.get_str("Currency")?;
        if currency_str.is_empty() {
            return Err(row.err("Balance row has no currency".to_string()));
        }
        let currency = Currency::new(&currency_str);
        for (kind, col) in [
            (BalanceKind::Cash, "Cash"),
            (BalanceKind::Investments, "Investments"),
            (BalanceKind::Total, "Total"),
        ] {
            builder
                .add_balance(kind, &currency, reader.get_opt_dec(col)?)
                .map_err(|e| row.err(format!("{col}: {e}")))?;
        }
        Ok(())
    }

    fn parse_holding_row(
        &self,
        reader: &RowReader,
        row: &Row,
        builder: &mut EntryBuilder,
    ) -> Result<(), SheetParseError> {
        let product = reader.get_str(HoldingCol::PRODUCT)?;
        let symbol = reader.get_str(HoldingCol::SYMBOL)?;
        if is_ignorable_label(&product) || symbol.is_empty() {
            builder.ignore_row(
                row.row_num,
                &format!("{product} {symbol} {}", reader.get_str(HoldingCol::NAME)?),
            );
            return Ok(());
        }

        let currency_str = reader.get_str(HoldingCol::CURRENCY)?;
        if currency_str.is_empty() {
            return Err(row.err(format!("Holding {symbol} has no currency")));
        }

        builder.add_holding(Holding {
            description: reader.get_str(HoldingCol::NAME)?,
            quantity: reader.get_dec(HoldingCol::QUANTITY)?,
            currency: Currency::new(&currency_str),
            price: reader.get_opt_dec(HoldingCol::LAST_PRICE)?,
            book_value: reader.get_opt_dec(HoldingCol::BOOK_COST)?,
            market_value: reader.get_dec(HoldingCol::MARKET_VALUE)?,
            row_num: row.row_num,
            symbol,
        });
        Ok(())
    }
}

impl Analyzer for RbcAnalyzer {
    const INSTITUTION: Institution = Institution::Rbc;
    const FILE_NAME_GLOB_FORMAT: &'static str =
        "Holdings * [month repr:long] [day padding:none], [year].csv";

    fn new() -> Self {
        RbcAnalyzer {}
    }

    fn parse_text(&mut self, path: &Path, text: &str) -> Result<Entry, StatementError> {
        let rows = read_rows(text, b',').map_err(|e| unsupported(path, e))?;
        let mut rows_iter = rows.iter();

        match rows_iter.find(|r| !r.is_blank()) {
            Some(first) if first.cell(0) == TITLE_MARKER => (),
            _ => {
                return Err(unsupported(
                    path,
                    format!("First line is not \"{TITLE_MARKER}\""),
                ))
            }
        }

        let mut builder = EntryBuilder::new();
        let mut state = State::Preamble;
        let mut holdings_reader: Option<RowReader> = None;

        for row in rows_iter {
            match state {
                State::Preamble => {
                    if row.is_blank() {
                        continue;
                    }
                    if row.cell(0) == BALANCES_MARKER {
                        RowReader::new(row, &BALANCE_COLS).map_err(|e| unsupported(path, e))?;
                        state = State::Balances;
                        continue;
                    }
                    self.parse_preamble_row(row, &mut builder).map_err(|e| {
                        if row.cell(0) == "Exchange Rate" || row.cell(0) == "As Of" {
                            malformed(path, e)
                        } else {
                            unsupported(path, e)
                        }
                    })?;
                }
                State::Balances => {
                    if row.is_blank() {
                        state = State::LookingForHoldingsHeader;
                        continue;
                    }
                    // Some exports have no spacer line before the holdings.
                    if row.cell(0) == HoldingCol::PRODUCT {
                        holdings_reader = Some(
                            RowReader::new(row, &HoldingCol::all())
                                .map_err(|e| unsupported(path, e))?,
                        );
                        state = State::Holdings;
                        continue;
                    }
                    self.parse_balance_row(row, &mut builder)
                        .map_err(|e| malformed(path, e))?;
                }
                State::LookingForHoldingsHeader => {
                    if row.is_blank() {
                        continue;
                    }
                    holdings_reader = Some(
                        RowReader::new(row, &HoldingCol::all())
                            .map_err(|e| unsupported(path, e))?,
                    );
                    state = State::Holdings;
                }
                State::Holdings => {
                    if row.is_blank() {
                        continue;
                    }
                    let Some(reader) = holdings_reader.as_mut() else {
                        return Err(unsupported(path, "No holdings header"));
                    };
                    reader.set_row(row);
                    self.parse_holding_row(reader, row, &mut builder)
                        .map_err(|e| malformed(path, e))?;
                }
            }
        }

        match state {
            State::Holdings => (),
            State::Preamble if !builder.has_account_num() => {
                return Err(malformed(path, "No account number found"));
            }
            State::Preamble => {
                return Err(malformed(path, "No balances table found"));
            }
            _ => return Err(unsupported(path, "No holdings table found")),
        }

        builder.finish(path)
    }
}
