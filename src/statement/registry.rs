//! Which analyzer handles which institution.
//!
//! The registry holds analyzer *types*, not instances. Callers get a fresh
//! analyzer from `AnalyzerType::construct` for each batch of files.

use std::any::TypeId;

use lazy_static::lazy_static;
use tracing::trace;

use super::{
    analyzer::{rbc::RbcAnalyzer, td::TdAnalyzer, Analyzer, DynAnalyzer},
    error::RegistryError,
    institution::Institution,
};

/// Describes an analyzer type, and knows how to make one.
#[derive(Clone, Copy)]
pub struct AnalyzerType {
    pub institution: Institution,
    pub file_name_glob_format: &'static str,
    type_id: TypeId,
    type_name: &'static str,
    constructor: fn() -> Box<dyn DynAnalyzer>,
}

impl AnalyzerType {
    pub fn of<A: Analyzer>() -> AnalyzerType {
        fn construct<A: Analyzer>() -> Box<dyn DynAnalyzer> {
            Box::new(A::new())
        }

        AnalyzerType {
            institution: A::INSTITUTION,
            file_name_glob_format: A::FILE_NAME_GLOB_FORMAT,
            type_id: TypeId::of::<A>(),
            type_name: std::any::type_name::<A>(),
            constructor: construct::<A>,
        }
    }

    pub fn construct(&self) -> Box<dyn DynAnalyzer> {
        (self.constructor)()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<A: Analyzer>(&self) -> bool {
        self.type_id == TypeId::of::<A>()
    }
}

impl std::fmt::Debug for AnalyzerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyzerType")
            .field("institution", &self.institution)
            .field("file_name_glob_format", &self.file_name_glob_format)
            .field("type_name", &self.type_name)
            .finish()
    }
}

#[derive(Default, Debug)]
pub struct Registry {
    // In registration order. There are only ever a handful.
    entries: Vec<(Institution, AnalyzerType)>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    /// Registering the same type under the same institution again does
    /// nothing. A different type under an already registered institution
    /// is refused, and the first registration stays in place. An analyzer
    /// can only be registered under its own institution.
    pub fn register(
        &mut self,
        institution: Institution,
        analyzer_type: AnalyzerType,
    ) -> Result<(), RegistryError> {
        if analyzer_type.institution != institution {
            return Err(RegistryError::InstitutionMismatch {
                key: institution.key().to_string(),
                analyzer: analyzer_type.type_name,
                analyzes: analyzer_type.institution.key().to_string(),
            });
        }
        if let Some((_, existing)) = self.entries.iter().find(|(i, _)| *i == institution) {
            if existing.type_id == analyzer_type.type_id {
                return Ok(());
            }
            return Err(RegistryError::DuplicateRegistration {
                key: institution.key().to_string(),
                existing: existing.type_name,
                attempted: analyzer_type.type_name,
            });
        }
        trace!(
            "Registered {} for {}",
            analyzer_type.type_name,
            institution.key()
        );
        self.entries.push((institution, analyzer_type));
        Ok(())
    }

    pub fn lookup(&self, institution: Institution) -> Result<&AnalyzerType, RegistryError> {
        self.entries
            .iter()
            .find(|(i, _)| *i == institution)
            .map(|(_, t)| t)
            .ok_or_else(|| RegistryError::UnknownAnalyzer(institution.key().to_string()))
    }

    /// Looks up by symbolic key ("RBC", "TD"), case-insensitively.
    pub fn lookup_key(&self, key: &str) -> Result<&AnalyzerType, RegistryError> {
        self.lookup(key.parse::<Institution>()?)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Institution, &AnalyzerType)> {
        self.entries.iter().map(|(i, t)| (*i, t))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn register_builtin_analyzers(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register(Institution::Rbc, AnalyzerType::of::<RbcAnalyzer>())?;
    registry.register(Institution::Td, AnalyzerType::of::<TdAnalyzer>())?;
    Ok(())
}

lazy_static! {
    static ref GLOBAL_REGISTRY: Registry = {
        let mut registry = Registry::new();
        // The built-in set is fixed, so a conflict here is a programming
        // error.
        register_builtin_analyzers(&mut registry).unwrap();
        registry
    };
}

/// The process-wide registry, with the built-in analyzers. Read-only.
pub fn global() -> &'static Registry {
    &GLOBAL_REGISTRY
}
