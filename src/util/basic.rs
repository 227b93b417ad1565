// Simple error type for helpers where the message is all the caller needs.
pub type SError = String;
