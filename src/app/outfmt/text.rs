use std::io::Write;

use tabled::settings::{object::Rows, Alignment, Style};

use crate::util::rw::WriteHandle;

use super::model::{
    render_balances_table, render_holdings_table, EntryWriter, Error, RenderTable, RenderedEntry,
};

/// Writes each entry as a pair of ascii tables (holdings, then balances).
pub struct TextWriter {
    w: WriteHandle,
}

impl TextWriter {
    pub fn new(w: WriteHandle) -> TextWriter {
        TextWriter { w }
    }

    fn print_render_table(&mut self, title: &str, table_model: &RenderTable) -> Result<(), Error> {
        let map_write_err = |e| format!("{e}");

        for err in &table_model.errors {
            writeln!(self.w, "[!] {}", err).map_err(map_write_err)?;
        }
        writeln!(self.w, "{}", title).map_err(map_write_err)?;

        if table_model.rows.is_empty() {
            writeln!(self.w, "  (none)").map_err(map_write_err)?;
        } else {
            let mut table_bldr = tabled::builder::Builder::default();
            table_bldr.push_record(
                table_model
                    .header
                    .iter()
                    .map(|h| h.to_uppercase())
                    .collect::<Vec<String>>(),
            );
            for row in &table_model.rows {
                table_bldr.push_record(row);
            }

            let mut table = table_bldr.build();
            table.with(Style::ascii());
            table.modify(Rows::first(), Alignment::center());
            writeln!(self.w, "{table}").map_err(map_write_err)?;
        }

        if !table_model.footer.is_empty() {
            writeln!(self.w, "{}", table_model.footer.join(": ")).map_err(map_write_err)?;
        }
        for note in &table_model.notes {
            writeln!(self.w, "{note}").map_err(map_write_err)?;
        }
        Ok(())
    }
}

impl EntryWriter for TextWriter {
    fn print_entry(&mut self, rendered: &RenderedEntry) -> Result<(), Error> {
        writeln!(self.w, "{}", rendered.title()).map_err(|e| format!("{e}"))?;
        self.print_render_table("Holdings", &render_holdings_table(rendered.entry))?;
        self.print_render_table("Balances", &render_balances_table(rendered.entry))?;
        writeln!(self.w).map_err(|e| format!("{e}"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use rust_decimal_macros::dec;

    use crate::{
        app::outfmt::model::{EntryWriter, RenderedEntry},
        statement::{
            model::{CurrencyAmounts, Entry, Holding},
            Currency, Institution,
        },
        util::rw::WriteHandle,
    };

    use super::TextWriter;

    #[test]
    fn test_print_entry() {
        let entry = Entry {
            account_name: "Direct Investing".to_string(),
            account_num: "TD01".to_string(),
            usrate: Default::default(),
            cash: CurrencyAmounts::sum([(Currency::cad(), dec!(96.00))]).unwrap(),
            stated_totals: CurrencyAmounts::new(),
            stated_investments: CurrencyAmounts::sum([(Currency::cad(), dec!(2344.00))]).unwrap(),
            holdings: vec![Holding {
                symbol: "TD".to_string(),
                description: "TORONTO-DOMINION BANK".to_string(),
                quantity: dec!(40),
                currency: Currency::cad(),
                price: Some(dec!(58.60)),
                book_value: Some(dec!(2200.00)),
                market_value: dec!(2344.00),
                row_num: 8,
            }],
            ignored_rows: 0,
        };

        let (handle, buff) = WriteHandle::string_buff_write_handle();
        let mut w = TextWriter::new(handle);
        w.print_entry(&RenderedEntry {
            institution: Institution::Td,
            path: Path::new("TD_Holdings_TD01_20200815.csv"),
            entry: &entry,
        })
        .unwrap();

        let out = buff.borrow().as_str().to_string();
        assert!(out.starts_with(
            "TD account TD01 Direct Investing (TD_Holdings_TD01_20200815.csv)\nHoldings\n"
        ));
        assert!(out.contains("| TD     | TORONTO-DOMINION BANK |"));
        assert!(out.contains("MARKET VALUE"));
        assert!(out.contains("| CAD      | 96.00 | 2344.00     |"));
        // No rate line without foreign content
        assert!(!out.contains("USD rate"));
        assert!(!out.contains("[!]"));
    }
}
