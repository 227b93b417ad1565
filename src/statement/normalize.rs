//! Rules every analyzer applies when building an Entry.
//!
//! - Amounts are grouped by currency: a currency seen twice is summed, never
//!   overwritten.
//! - Blank cells mean "not stated" and add nothing. A printed zero is stated,
//!   and is kept.
//! - Ignorable rows are noted (logged and counted) but contribute nothing to
//!   holdings or to any amount.
//! - An account number and at least one currency balance are required.
//! - A sum that overflows a Decimal makes the statement malformed.

use std::path::Path;

use rust_decimal::Decimal;
use tracing::debug;

use crate::util::decimal::GreaterEqualZeroDecimal;

use super::{
    error::StatementError,
    model::{AmountOutOfRange, Currency, CurrencyAmounts, Entry, Holding},
};

/// Which per-currency amount of the account a balance value belongs to.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum BalanceKind {
    Cash,
    Investments,
    Total,
}

#[derive(Default)]
pub struct EntryBuilder {
    account_num: Option<String>,
    account_name: Option<String>,
    usrate: GreaterEqualZeroDecimal,
    cash: CurrencyAmounts,
    stated_totals: CurrencyAmounts,
    stated_investments: CurrencyAmounts,
    holdings: Vec<Holding>,
    ignored_rows: usize,
}

impl EntryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_account_num(&mut self, num: &str) {
        let num = num.trim();
        if !num.is_empty() {
            self.account_num = Some(num.to_string());
        }
    }

    pub fn set_account_name(&mut self, name: &str) {
        self.account_name = Some(name.trim().to_string());
    }

    pub fn has_account_num(&self) -> bool {
        self.account_num.is_some()
    }

    pub fn set_usrate(&mut self, rate: GreaterEqualZeroDecimal) {
        self.usrate = rate;
    }

    /// Adds a stated balance. None (a blank cell) is not a statement of
    /// anything, so the currency is not introduced.
    pub fn add_balance(
        &mut self,
        kind: BalanceKind,
        currency: &Currency,
        amount: Option<Decimal>,
    ) -> Result<(), AmountOutOfRange> {
        let Some(amount) = amount else {
            return Ok(());
        };
        let amounts = match kind {
            BalanceKind::Cash => &mut self.cash,
            BalanceKind::Investments => &mut self.stated_investments,
            BalanceKind::Total => &mut self.stated_totals,
        };
        amounts.add(currency.clone(), amount)
    }

    pub fn add_holding(&mut self, holding: Holding) {
        self.holdings.push(holding);
    }

    /// Records a row that was parsed, but that the institution's rules say
    /// to leave out.
    pub fn ignore_row(&mut self, row_num: usize, what: &str) {
        debug!("Ignoring row {row_num}: {what}");
        self.ignored_rows += 1;
    }

    pub fn finish(self, path: &Path) -> Result<Entry, StatementError> {
        let malformed = |reason: &str| StatementError::MalformedStatement {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };

        let account_num = self.account_num.ok_or_else(|| malformed("No account number found"))?;
        if self.cash.is_empty()
            && self.stated_totals.is_empty()
            && self.stated_investments.is_empty()
        {
            return Err(malformed(&format!(
                "No currency balances found for account {account_num}"
            )));
        }

        let entry = Entry {
            account_name: self.account_name.unwrap_or_default(),
            account_num,
            usrate: self.usrate,
            cash: self.cash,
            stated_totals: self.stated_totals,
            stated_investments: self.stated_investments,
            holdings: self.holdings,
            ignored_rows: self.ignored_rows,
        };
        entry
            .computed_investments()
            .map_err(|e| malformed(&format!("Holdings market value: {e}")))?;
        Ok(entry)
    }
}
