mod currency;
mod entry;

pub use currency::*;
pub use entry::*;
