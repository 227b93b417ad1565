use std::io::Write;

use crate::util::rw::WriteHandle;

use super::model::{EntryWriter, Error, RenderedEntry};

/// Collects entries, and writes them as a single JSON array on finish.
pub struct JsonWriter {
    w: WriteHandle,
    pretty: bool,
    entries: Vec<serde_json::Value>,
}

impl JsonWriter {
    pub fn new(w: WriteHandle, pretty: bool) -> JsonWriter {
        JsonWriter { w, pretty, entries: Vec::new() }
    }
}

impl EntryWriter for JsonWriter {
    fn print_entry(&mut self, rendered: &RenderedEntry) -> Result<(), Error> {
        let value = serde_json::to_value(rendered.entry)
            .map_err(|e| format!("Unable to serialize account {}: {e}", rendered.entry.account_num))?;
        self.entries.push(value);
        Ok(())
    }

    fn finish(mut self: Box<Self>) -> Result<(), Error> {
        let entries = serde_json::Value::Array(std::mem::take(&mut self.entries));
        let text = if self.pretty {
            serde_json::to_string_pretty(&entries)
        } else {
            serde_json::to_string(&entries)
        }
        .map_err(|e| format!("{e}"))?;
        writeln!(self.w, "{text}").map_err(|e| format!("{e}"))
    }
}
