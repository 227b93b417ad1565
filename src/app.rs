pub mod approot;
pub mod input_parse;
pub mod outfmt;

// Version is of the format 0.YY.MM[.i], or 0.year.month.optional_minor_increment,
// so it's obvious when the set of supported export layouts was last updated.
pub const STMTLOAD_APP_VERSION: &str = "0.26.10";
