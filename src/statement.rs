pub mod analyzer;
pub mod discovery;
pub mod error;
pub mod filename;
pub mod institution;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod registry;

pub use analyzer::{Analyzer, DynAnalyzer};
pub use error::{DiscoveryError, LoadError, RegistryError, StatementError};
pub use institution::Institution;
pub use loader::{load_all, load_institution, LoadedStatement};
pub use model::{Currency, CurrencyAmounts, Entry, Holding};
pub use registry::{AnalyzerType, Registry};
