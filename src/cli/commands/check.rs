//! Check command - load an index and report what it contains.

use serde::Serialize;

use super::{open_table, print_json};
use crate::cli::SourceArgs;
use crate::config::Settings;
use crate::io::{EntityType, Envelope, ExitCode, OutputFormat};
use crate::{IndexTable, log_event};

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Summary {
    pub entries: usize,
    pub occurrences: usize,
    /// Largest number of occurrences behind a single key
    pub max_occurrences: usize,
    /// Entries whose display label is shared with another entry
    pub shared_labels: usize,
}

impl Summary {
    pub fn of(table: &IndexTable) -> Self {
        let max_occurrences = table
            .entries()
            .iter()
            .map(|e| e.occurrences().len())
            .max()
            .unwrap_or(0);

        let shared_labels = table
            .entries()
            .iter()
            .filter(|e| table.find_by_label(e.display_label()).nth(1).is_some())
            .count();

        Self {
            entries: table.len(),
            occurrences: table.occurrence_count(),
            max_occurrences,
            shared_labels,
        }
    }
}

/// Run the check command.
pub fn run(json: bool, args: &SourceArgs, settings: &Settings) -> ExitCode {
    let format = OutputFormat::from_json_flag(json || settings.output.json);
    let table = match open_table(args, settings, format) {
        Ok(table) => table,
        Err(code) => return code,
    };

    let summary = Summary::of(&table);
    log_event!("cli", "checked", "{} entries", summary.entries);

    if format.is_json() {
        let envelope = Envelope::success(summary)
            .with_entity_type(EntityType::Summary)
            .with_message("Index is well-formed");
        print_json(&envelope);
    } else {
        println!("Index is well-formed");
        println!("  entries:          {}", summary.entries);
        println!("  occurrences:      {}", summary.occurrences);
        println!("  max per key:      {}", summary.max_occurrences);
        println!("  shared labels:    {}", summary.shared_labels);
    }

    ExitCode::Success
}
