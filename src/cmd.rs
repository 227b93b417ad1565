use std::path::PathBuf;

use clap::Parser;

use crate::{
    app::{
        approot::{run_stmtload_app_to_console, Options, OutputFormat},
        input_parse::{parse_statement_date, select_institutions},
    },
    statement::{registry, Institution},
    util::rw::WriteHandle,
};

const ABOUT: &str = "Brokerage statement loader";

fn get_long_about() -> String {
    let mut naming = String::new();
    for (inst, analyzer_type) in registry::global().iter() {
        naming += &format!("  {:<4} {}\n", inst.key(), analyzer_type.file_name_glob_format);
    }
    format!(
        "\
Loads the holdings export files of each brokerage for a statement date, and
prints the accounts, holdings and balances found in them.

Only files directly in the directory, named after the institution's export
convention for the date, are read. Bracketed parts are the date:
{naming}
Set TRACE (eg. TRACE=debug) to see what was found and which rows were ignored."
    )
}

#[derive(Parser, Debug)]
#[command(version = crate::app::STMTLOAD_APP_VERSION,
          about = ABOUT, long_about = get_long_about())]
pub struct Args {
    /// Directory containing the statement exports
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Statement date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub date: Option<String>,

    /// Only load statements for this institution. May be provided multiple
    /// times. Defaults to all of them.
    #[arg(short, long, value_enum)]
    pub institution: Vec<Institution>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Exit with an error, without printing any entries, if any statement
    /// fails to parse
    #[arg(long, default_value_t = false)]
    pub fail_fast: bool,

    /// Print verbose output
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

pub fn run() -> Result<(), ()> {
    let args = Args::parse();

    crate::log::set_verbose(args.verbose);
    if args.verbose {
        crate::tracing::enable_trace_env("stmtload=info");
    }
    crate::tracing::setup_tracing();

    let mut err_printer = WriteHandle::stderr_write_handle();

    let date = parse_statement_date(&args.date).map_err(|e| {
        crate::write_errln!(err_printer, "{e}");
    })?;

    let options = Options {
        dir: args.dir,
        date,
        institutions: select_institutions(&args.institution),
        format: args.format,
        fail_fast: args.fail_fast,
    };

    run_stmtload_app_to_console(registry::global(), options, err_printer).map(|_| ())
}
