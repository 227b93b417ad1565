use std::{fmt::Display, marker::PhantomData, ops::Deref};

use rust_decimal::Decimal;

use super::basic::SError;

use self::constraint::GreaterEqualZero;

pub trait DecConstraint {
    fn is_ok(d: &Decimal) -> bool;
}

pub mod constraint {
    use rust_decimal::Decimal;

    use super::DecConstraint;

    #[derive(PartialEq, Eq, Clone, Copy, Debug)]
    pub struct GreaterEqualZero(());
    impl DecConstraint for GreaterEqualZero {
        fn is_ok(d: &Decimal) -> bool {
            d.is_sign_positive() || d.is_zero()
        }
    }
}

// A constrained instance of Decimal. This can only be created through ::try_from,
// which will enforce the DecConstraint.
//
// PhantomData here is size zero, and is simply to make the compiler happy.
// Otherwise, it will complain that the generic parameter is unused (even though
// we are using it in the impl).
pub struct ConstrainedDecimal<CONSTRAINT>(Decimal, PhantomData<CONSTRAINT>);

impl<CONSTRAINT: DecConstraint> TryFrom<Decimal> for ConstrainedDecimal<CONSTRAINT> {
    type Error = SError;

    fn try_from(d: Decimal) -> Result<Self, Self::Error> {
        if CONSTRAINT::is_ok(&d) {
            Ok(Self(d, PhantomData))
        } else {
            Err(format!(
                "{} does not match constraints of {}",
                d,
                std::any::type_name::<CONSTRAINT>()
            ))
        }
    }
}

impl<CONSTRAINT: DecConstraint> Deref for ConstrainedDecimal<CONSTRAINT> {
    type Target = Decimal;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<CONSTRAINT: DecConstraint> Display for ConstrainedDecimal<CONSTRAINT> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl<CONSTRAINT: DecConstraint> std::fmt::Debug for ConstrainedDecimal<CONSTRAINT> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.0, f)
    }
}

impl<CONSTRAINT: DecConstraint> PartialEq for ConstrainedDecimal<CONSTRAINT> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<CONSTRAINT: DecConstraint> Eq for ConstrainedDecimal<CONSTRAINT> {}

impl<CONSTRAINT: DecConstraint> Clone for ConstrainedDecimal<CONSTRAINT> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<CONSTRAINT: DecConstraint> Copy for ConstrainedDecimal<CONSTRAINT> {}

// Serializes exactly like the inner Decimal (as a string).
impl<CONSTRAINT: DecConstraint> serde::Serialize for ConstrainedDecimal<CONSTRAINT> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde::Serialize::serialize(&self.0, serializer)
    }
}

impl ConstrainedDecimal<GreaterEqualZero> {
    pub fn zero() -> Self {
        Self(Decimal::ZERO, PhantomData)
    }
}

impl Default for ConstrainedDecimal<GreaterEqualZero> {
    fn default() -> Self {
        Self::zero()
    }
}

pub type GreaterEqualZeroDecimal = ConstrainedDecimal<constraint::GreaterEqualZero>;

#[macro_export]
macro_rules! gezdec {
    ($arg:literal) => {{
        use rust_decimal_macros::dec;
        $crate::util::decimal::GreaterEqualZeroDecimal::try_from(dec!($arg)).unwrap()
    }};
}


/// Parses a number as printed on a statement, like "1,234.50", "$12.00"
/// or "(12.00)" (negative). The printed scale is kept, so "85.90" stays
/// "85.90" when displayed again.
pub fn parse_large_decimal(s: &str) -> Result<Decimal, SError> {
    let trimmed = s.trim();
    let (negate, body) = match trimmed.strip_prefix('(') {
        Some(rest) => match rest.strip_suffix(')') {
            Some(inner) => (true, inner),
            None => return Err(format!("Unbalanced parentheses in \"{s}\"")),
        },
        None => (false, trimmed),
    };
    let cleaned: String = body.chars().filter(|c| *c != ',' && *c != '$').collect();
    if cleaned.is_empty() {
        return Err(format!("No number in \"{s}\""));
    }
    let d = Decimal::from_str_exact(&cleaned)
        .map_err(|e| format!("Unable to parse number \"{s}\": {e}"))?;
    Ok(if negate { -d } else { d })
}

/// Like parse_large_decimal, but a blank cell yields None rather than
/// an error. Statements leave cells blank for values they do not state.
pub fn parse_opt_large_decimal(s: &str) -> Result<Option<Decimal>, SError> {
    if s.trim().is_empty() {
        Ok(None)
    } else {
        parse_large_decimal(s).map(Some)
    }
}
