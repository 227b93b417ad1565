use itertools::Itertools;
use rust_decimal::Decimal;

use crate::util::decimal::GreaterEqualZeroDecimal;

use super::{AmountOutOfRange, Currency, CurrencyAmounts};

/// One position line of a statement, in the same shape for every
/// institution.
#[derive(PartialEq, Eq, Clone, Debug, serde::Serialize)]
pub struct Holding {
    pub symbol: String,
    pub description: String,
    pub quantity: Decimal,
    pub currency: Currency,
    pub price: Option<Decimal>,
    pub book_value: Option<Decimal>,
    pub market_value: Decimal,
    /// 1-based line in the source file.
    #[serde(skip)]
    pub row_num: usize,
}

/// The normalized form of one statement file: a single account, as of the
/// statement date.
///
/// The serialized field names are relied on by consumers, so they are kept
/// as-is.
#[derive(PartialEq, Eq, Clone, Debug, serde::Serialize)]
pub struct Entry {
    #[serde(rename = "accountName")]
    pub account_name: String,
    #[serde(rename = "accountNum")]
    pub account_num: String,
    /// USD to CAD. Zero when the statement has no foreign content.
    pub usrate: GreaterEqualZeroDecimal,
    pub cash: CurrencyAmounts,
    pub stated_totals: CurrencyAmounts,
    pub stated_investments: CurrencyAmounts,
    pub holdings: Vec<Holding>,

    /// Rows that were parsed but left out by the institution's ignorable
    /// row rule.
    #[serde(skip)]
    pub ignored_rows: usize,
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct InvestmentDiscrepancy {
    pub currency: Currency,
    pub stated: Option<Decimal>,
    pub computed: Option<Decimal>,
}

impl std::fmt::Display for InvestmentDiscrepancy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fmt_opt = |d: &Option<Decimal>| match d {
            Some(d) => d.to_string(),
            None => "(none)".to_string(),
        };
        write!(
            f,
            "{} investments stated as {} but holdings add up to {}",
            self.currency,
            fmt_opt(&self.stated),
            fmt_opt(&self.computed)
        )
    }
}

impl Entry {
    /// Market value of the holdings, summed per currency.
    pub fn computed_investments(&self) -> Result<CurrencyAmounts, AmountOutOfRange> {
        CurrencyAmounts::sum(self.holdings.iter().map(|h| (h.currency.clone(), h.market_value)))
    }

    /// Currencies where the statement's own investment total disagrees with
    /// the holdings it lists. Only compares the statement with itself.
    pub fn investment_discrepancies(
        &self,
    ) -> Result<Vec<InvestmentDiscrepancy>, AmountOutOfRange> {
        let computed = self.computed_investments()?;
        let discrepancies = self
            .stated_investments
            .currencies()
            .chain(computed.currencies())
            .sorted()
            .dedup()
            .filter_map(|c| {
                let stated = self.stated_investments.get(c).copied();
                let comp = computed.get(c).copied();
                let same = match (stated, comp) {
                    (Some(s), Some(cd)) => s == cd,
                    (Some(s), None) => s.is_zero(),
                    (None, Some(cd)) => cd.is_zero(),
                    (None, None) => true,
                };
                if same {
                    None
                } else {
                    Some(InvestmentDiscrepancy {
                        currency: c.clone(),
                        stated,
                        computed: comp,
                    })
                }
            })
            .collect();
        Ok(discrepancies)
    }
}
