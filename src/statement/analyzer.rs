use std::path::Path;

use tracing::{info, warn};

use crate::util::rw::DescribedReader;

use super::{error::StatementError, institution::Institution, model::Entry};

pub mod sheet;

// Individual institutions
pub mod rbc;
pub mod td;

/// Turns one institution's statement export into an Entry.
///
/// Implementations differ only in layout: columns, delimiter, which rows are
/// ignorable, and whether there are multiple currencies. Every one of them
/// honors the same rules (see `statement::normalize`).
///
/// An instance handles one file at a time. Use separate instances to parse
/// in parallel.
pub trait Analyzer: Send + 'static {
    const INSTITUTION: Institution;

    /// `time` format description for the names of this institution's export
    /// files. Bracketed components come from the statement date; the rest
    /// is literal glob syntax.
    const FILE_NAME_GLOB_FORMAT: &'static str;

    fn new() -> Self;

    /// Parses already-read statement text. `path` is only used to describe
    /// errors.
    fn parse_text(&mut self, path: &Path, text: &str) -> Result<Entry, StatementError>;

    /// Reads and parses the statement at `path`. Nothing is written anywhere,
    /// and the returned Entry is not retained.
    fn parse(&mut self, path: &Path) -> Result<Entry, StatementError> {
        self.parse_reader(&DescribedReader::from_file_path(path.to_path_buf()))
    }

    fn parse_reader(&mut self, reader: &DescribedReader) -> Result<Entry, StatementError> {
        let path = reader.path();
        let text = reader
            .read_to_string()
            .map_err(|e| StatementError::Io { path: path.clone(), source: e })?;
        let entry = self.parse_text(&path, &text)?;

        let discrepancies =
            entry.investment_discrepancies().map_err(|e| malformed(&path, e))?;
        for d in discrepancies {
            warn!("{}: account {}: {}", reader.desc(), entry.account_num, d);
        }
        info!(
            "{}: parsed {} account {} ({} holdings, {} ignored rows)",
            reader.desc(),
            Self::INSTITUTION,
            entry.account_num,
            entry.holdings.len(),
            entry.ignored_rows
        );
        Ok(entry)
    }
}

/// The object-safe face of an Analyzer, so the registry can hand out
/// instances of whichever type is registered.
pub trait DynAnalyzer: Send {
    fn institution(&self) -> Institution;
    fn file_name_glob_format(&self) -> &'static str;
    fn parse(&mut self, path: &Path) -> Result<Entry, StatementError>;
    fn parse_reader(&mut self, reader: &DescribedReader) -> Result<Entry, StatementError>;
}

impl<A: Analyzer> DynAnalyzer for A {
    fn institution(&self) -> Institution {
        A::INSTITUTION
    }

    fn file_name_glob_format(&self) -> &'static str {
        A::FILE_NAME_GLOB_FORMAT
    }

    fn parse(&mut self, path: &Path) -> Result<Entry, StatementError> {
        Analyzer::parse(self, path)
    }

    fn parse_reader(&mut self, reader: &DescribedReader) -> Result<Entry, StatementError> {
        Analyzer::parse_reader(self, reader)
    }
}

/// Maps a row level parse failure to the error for the whole file.
pub(crate) fn unsupported(path: &Path, reason: impl ToString) -> StatementError {
    StatementError::UnsupportedFormat {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

pub(crate) fn malformed(path: &Path, reason: impl ToString) -> StatementError {
    StatementError::MalformedStatement {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
