//! Loads every statement for a date from a directory.
//!
//! A statement that fails to parse is recorded with its error, and loading
//! moves on to the next file. Only problems that prevent finding the files
//! at all (no such analyzer, unreadable directory) fail the whole call.

use std::path::{Path, PathBuf};

use time::Date;
use tracing::{debug, error};

use super::{
    discovery::find_statement_files,
    error::{LoadError, StatementError},
    institution::Institution,
    model::Entry,
    registry::{global, AnalyzerType, Registry},
};

#[derive(Debug)]
pub struct LoadedStatement {
    pub institution: Institution,
    pub path: PathBuf,
    pub result: Result<Entry, StatementError>,
}

impl LoadedStatement {
    pub fn entry(&self) -> Option<&Entry> {
        self.result.as_ref().ok()
    }
}

fn load_with(
    analyzer_type: &AnalyzerType,
    dir: &Path,
    date: Date,
) -> Result<Vec<LoadedStatement>, LoadError> {
    let paths = find_statement_files(dir, date, analyzer_type.file_name_glob_format)?;
    if paths.is_empty() {
        debug!("No {} statements in {} for {date}", analyzer_type.institution, dir.display());
        return Ok(Vec::new());
    }

    let mut analyzer = analyzer_type.construct();
    let loaded = paths
        .into_iter()
        .map(|path| {
            let result = analyzer.parse(&path);
            if let Err(e) = &result {
                error!("{e}");
            }
            LoadedStatement { institution: analyzer_type.institution, path, result }
        })
        .collect();
    Ok(loaded)
}

/// Parses the `institution` statements in `dir` for `date`, using the
/// analyzers in `registry`. Files are parsed in sorted path order.
pub fn load_institution_from(
    registry: &Registry,
    dir: &Path,
    date: Date,
    institution: Institution,
) -> Result<Vec<LoadedStatement>, LoadError> {
    load_with(registry.lookup(institution)?, dir, date)
}

/// Like `load_institution_from`, for every registered institution, in
/// registration order.
pub fn load_all_from(
    registry: &Registry,
    dir: &Path,
    date: Date,
) -> Result<Vec<LoadedStatement>, LoadError> {
    let mut loaded = Vec::new();
    for (_, analyzer_type) in registry.iter() {
        loaded.append(&mut load_with(analyzer_type, dir, date)?);
    }
    Ok(loaded)
}

pub fn load_institution(
    dir: &Path,
    date: Date,
    institution: Institution,
) -> Result<Vec<LoadedStatement>, LoadError> {
    load_institution_from(global(), dir, date, institution)
}

pub fn load_all(dir: &Path, date: Date) -> Result<Vec<LoadedStatement>, LoadError> {
    load_all_from(global(), dir, date)
}

/// Separates the parsed entries from the per-file errors, keeping the
/// order of each.
pub fn split_results(
    loaded: Vec<LoadedStatement>,
) -> (Vec<(Institution, Entry)>, Vec<StatementError>) {
    let mut entries = Vec::new();
    let mut errors = Vec::new();
    for l in loaded {
        match l.result {
            Ok(e) => entries.push((l.institution, e)),
            Err(e) => errors.push(e),
        }
    }
    (entries, errors)
}

/// Just the entries. Errors have already been logged by the loader.
pub fn entries(loaded: Vec<LoadedStatement>) -> Vec<Entry> {
    loaded.into_iter().filter_map(|l| l.result.ok()).collect()
}
