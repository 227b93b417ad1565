use std::{fmt::Display, str::FromStr};

use super::error::RegistryError;

/// The brokerages we have analyzers for. Adding one means adding a variant
/// here, an analyzer module, and a registration call.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord, clap::ValueEnum)]
pub enum Institution {
    /// RBC Direct Investing
    Rbc,
    /// TD Direct Investing
    Td,
}

impl Institution {
    pub const ALL: [Institution; 2] = [Institution::Rbc, Institution::Td];

    /// Short symbolic key, as used in registry lookups.
    pub fn key(&self) -> &'static str {
        match self {
            Institution::Rbc => "RBC",
            Institution::Td => "TD",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Institution::Rbc => "RBC Direct Investing",
            Institution::Td => "TD Direct Investing",
        }
    }
}

impl Display for Institution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for Institution {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Institution::ALL
            .into_iter()
            .find(|i| i.key() == upper)
            .ok_or_else(|| RegistryError::UnknownAnalyzer(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::Institution;
    use crate::statement::error::RegistryError;

    #[test]
    fn test_keys() {
        assert_eq!(Institution::Rbc.key(), "RBC");
        assert_eq!(Institution::Td.to_string(), "TD");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("RBC".parse::<Institution>().unwrap(), Institution::Rbc);
        assert_eq!(" td ".parse::<Institution>().unwrap(), Institution::Td);
        assert_eq!(
            "BMO".parse::<Institution>().unwrap_err(),
            RegistryError::UnknownAnalyzer("BMO".to_string())
        );
    }
}
