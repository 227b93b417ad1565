use std::{collections::BTreeMap, fmt::Display};

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Clone, Debug)]
enum CurrImpl {
    Static(&'static str),
    Dyn(String),
}

#[derive(Clone, Debug)]
pub struct Currency(CurrImpl);

impl Currency {
    pub fn new(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "" => Currency::default(),
            "CAD" => Currency::cad(),
            "USD" => Currency::usd(),
            other => Currency(CurrImpl::Dyn(other.to_string())),
        }
    }

    pub fn cad() -> Self {
        Currency(CurrImpl::Static("CAD"))
    }

    pub fn usd() -> Self {
        Currency(CurrImpl::Static("USD"))
    }

    pub fn as_str(&self) -> &str {
        match &self.0 {
            CurrImpl::Static(s) => s,
            CurrImpl::Dyn(s) => s.as_str(),
        }
    }
}

// Statements are in Canadian dollars unless they say otherwise.
impl Default for Currency {
    fn default() -> Self {
        Currency::cad()
    }
}

impl PartialEq for Currency {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Currency {}

impl std::hash::Hash for Currency {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_str().hash(state)
    }
}

impl PartialOrd for Currency {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Currency {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_str().cmp(other.as_str())
    }
}

// Auto-implements to_string()
impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl serde::Serialize for Currency {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Per-currency amounts, as found on a statement (cash, totals, ...).
///
/// Only currencies the statement actually states are present. Adding to an
/// existing currency sums into it, and the decimal keeps the scale it was
/// printed with, so "68.45" displays as "68.45".
#[derive(PartialEq, Eq, Clone, Debug, Default, serde::Serialize)]
#[serde(transparent)]
pub struct CurrencyAmounts(BTreeMap<Currency, Decimal>);

impl CurrencyAmounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sums `amount` into `currency`. On overflow the amounts are left as
    /// they were.
    pub fn add(&mut self, currency: Currency, amount: Decimal) -> Result<(), AmountOutOfRange> {
        let sum = match self.0.get(&currency) {
            Some(existing) => existing.checked_add(amount),
            None => Some(amount),
        };
        match sum {
            Some(sum) => {
                self.0.insert(currency, sum);
                Ok(())
            }
            None => Err(AmountOutOfRange { currency }),
        }
    }

    pub fn sum<I>(iter: I) -> Result<Self, AmountOutOfRange>
    where
        I: IntoIterator<Item = (Currency, Decimal)>,
    {
        let mut amounts = CurrencyAmounts::new();
        for (c, d) in iter {
            amounts.add(c, d)?;
        }
        Ok(amounts)
    }

    pub fn get(&self, currency: &Currency) -> Option<&Decimal> {
        self.0.get(currency)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn currencies(&self) -> impl Iterator<Item = &Currency> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Currency, &Decimal)> {
        self.0.iter()
    }

    /// The amounts rendered as they would be printed, eg. {"CAD": "68.45"}.
    pub fn to_str_map(&self) -> BTreeMap<String, String> {
        self.0
            .iter()
            .map(|(c, d)| (c.to_string(), d.to_string()))
            .collect()
    }
}

#[derive(Error, PartialEq, Eq, Clone, Debug)]
#[error("{currency} amount out of range")]
pub struct AmountOutOfRange {
    pub currency: Currency,
}
