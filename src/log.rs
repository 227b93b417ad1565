use std::sync::atomic::{AtomicBool, Ordering};

// User-facing progress output for the CLI. Diagnostics go through tracing
// instead (see crate::tracing).
static VERBOSE: AtomicBool = AtomicBool::new(false);

pub fn set_verbose(verb: bool) {
    VERBOSE.store(verb, Ordering::Relaxed);
}

pub fn get_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

// tt - TokenTree
// ($($arg:tt)*) Variable number of tts
#[macro_export]
macro_rules! verbose {
    ($($arg:tt)*) => {{
        if $crate::log::get_verbose() {
            eprint!($($arg)*);
        }
    }};
}

#[macro_export]
macro_rules! verboseln {
    ($($arg:tt)*) => {{
        if $crate::log::get_verbose() {
            eprintln!($($arg)*);
        }
    }};
}

/// writeln! for error printers, where a failure to write the error has
/// nowhere better to go and is dropped.
#[macro_export]
macro_rules! write_errln {
    ($w:expr, $($arg:tt)*) => {{
        use std::io::Write as _;
        let _ = writeln!($w, $($arg)*);
    }};
}
