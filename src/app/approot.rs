use std::path::PathBuf;

use time::Date;

use crate::{
    statement::{
        loader::load_institution_from, registry::Registry, Institution, LoadedStatement,
    },
    util::rw::WriteHandle,
    verboseln, write_errln,
};

use super::outfmt::{
    json::JsonWriter,
    model::{EntryWriter, RenderedEntry},
    text::TextWriter,
};

pub type Error = String;

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

pub struct Options {
    pub dir: PathBuf,
    pub date: Date,
    pub institutions: Vec<Institution>,
    pub format: OutputFormat,
    /// Treat any statement that fails to parse as an error for the whole
    /// run, and print nothing.
    pub fail_fast: bool,
}

#[derive(Default, Debug, PartialEq, Eq)]
pub struct AppRunSummary {
    pub entries: usize,
    pub failed_files: usize,
}

/// Discovers and parses all statements selected by `options`. Only a
/// registry or directory problem is an Err here. Per-file parse errors are
/// in the returned statements.
pub fn run_stmtload_app_to_loaded(
    registry: &Registry,
    options: &Options,
) -> Result<Vec<LoadedStatement>, Error> {
    let mut all_loaded = Vec::new();
    for inst in &options.institutions {
        let mut loaded = load_institution_from(registry, &options.dir, options.date, *inst)
            .map_err(|e| e.to_string())?;
        verboseln!(
            "Found {} {} statement(s) for {} in {}",
            loaded.len(),
            inst.display_name(),
            options.date,
            options.dir.display()
        );
        all_loaded.append(&mut loaded);
    }
    Ok(all_loaded)
}

/// Returned Err is for exit code determination only.
/// All errors are written to err_printer.
pub fn run_stmtload_app_to_writer(
    writer: &mut dyn EntryWriter,
    registry: &Registry,
    options: &Options,
    mut err_printer: WriteHandle,
) -> Result<AppRunSummary, ()> {
    let loaded = match run_stmtload_app_to_loaded(registry, options) {
        Ok(l) => l,
        Err(e) => {
            write_errln!(err_printer, "{}", e);
            return Err(());
        }
    };

    let mut summary = AppRunSummary::default();
    for l in &loaded {
        if let Err(e) = &l.result {
            write_errln!(err_printer, "[!] {}", e);
            summary.failed_files += 1;
        }
    }
    if options.fail_fast && summary.failed_files > 0 {
        return Err(());
    }

    for l in &loaded {
        if let Ok(entry) = &l.result {
            let rendered = RenderedEntry { institution: l.institution, path: &l.path, entry };
            if let Err(e) = writer.print_entry(&rendered) {
                write_errln!(err_printer, "Rendering {}: {}", l.path.display(), e);
                return Err(());
            }
            summary.entries += 1;
        }
    }

    if loaded.is_empty() {
        write_errln!(
            err_printer,
            "No statements found for {} in {}",
            options.date,
            options.dir.display()
        );
    }

    Ok(summary)
}

pub fn run_stmtload_app_to_console(
    registry: &Registry,
    options: Options,
    mut err_printer: WriteHandle,
) -> Result<AppRunSummary, ()> {
    let out = WriteHandle::stdout_write_handle();
    let mut writer: Box<dyn EntryWriter> = match options.format {
        OutputFormat::Text => Box::new(TextWriter::new(out)),
        OutputFormat::Json => Box::new(JsonWriter::new(out, true)),
    };

    let summary =
        run_stmtload_app_to_writer(writer.as_mut(), registry, &options, err_printer.clone())?;

    if let Err(e) = writer.finish() {
        write_errln!(err_printer, "{}", e);
        return Err(());
    }
    Ok(summary)
}
