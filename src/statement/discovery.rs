use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use time::Date;
use tracing::debug;

use super::{error::DiscoveryError, filename::render_glob_pattern};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Checks a bare file name (no directory part) against a rendered pattern.
pub fn file_name_matches(pattern: &Pattern, file_name: &str) -> bool {
    pattern.matches_with(file_name, MATCH_OPTIONS)
}

/// Lists the files directly in `dir` whose names match `glob_format`
/// rendered for `date`, sorted by path.
///
/// Subdirectories are not searched. No match just means there is no
/// statement for that date, so it yields an empty list.
pub fn find_statement_files(
    dir: &Path,
    date: Date,
    glob_format: &str,
) -> Result<Vec<PathBuf>, DiscoveryError> {
    let rendered = render_glob_pattern(glob_format, date)?;
    let pattern = Pattern::new(&rendered).map_err(|e| DiscoveryError::InvalidPattern {
        pattern: rendered.clone(),
        source: e,
    })?;

    let io_err = |e: std::io::Error| DiscoveryError::Io { dir: dir.to_path_buf(), source: e };

    let mut paths = Vec::new();
    for dir_entry in std::fs::read_dir(dir).map_err(io_err)? {
        let dir_entry = dir_entry.map_err(io_err)?;
        let file_name = dir_entry.file_name();
        // Exports always have plain names; anything else can't be ours.
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if !file_name_matches(&pattern, name) {
            continue;
        }
        // Follows symlinks. A link that can't be resolved is kept, so that
        // parsing reports it for that file alone.
        let path = dir_entry.path();
        match std::fs::metadata(&path) {
            Ok(meta) if !meta.is_file() => continue,
            Ok(_) => (),
            Err(e) => debug!("Unable to stat {}: {e}", path.display()),
        }
        paths.push(path);
    }
    paths.sort();

    debug!(
        "Found {} file(s) matching \"{}\" in {}",
        paths.len(),
        rendered,
        dir.display()
    );
    Ok(paths)
}
