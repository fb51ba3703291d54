//! Lookup command - exact key (or display label) lookup.

use console::style;
use serde::Serialize;

use super::{open_table, print_json};
use crate::cli::SourceArgs;
use crate::config::Settings;
use crate::io::{EntityType, Envelope, ExitCode, OutputFormat};
use crate::{IndexEntry, IndexTable, Occurrence};

/// JSON view of an entry with resolved links.
#[derive(Debug, Serialize)]
pub struct EntryView<'a> {
    pub key: &'a str,
    pub display_label: &'a str,
    pub occurrences: Vec<OccurrenceView<'a>>,
}

#[derive(Debug, Serialize)]
pub struct OccurrenceView<'a> {
    pub location: &'a str,
    pub url: String,
    pub qualified_name: &'a str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub parent_frame: bool,
}

impl<'a> EntryView<'a> {
    pub fn new(entry: &'a IndexEntry, base_url: Option<&str>) -> Self {
        Self {
            key: entry.key(),
            display_label: entry.display_label(),
            occurrences: entry
                .occurrences()
                .iter()
                .map(|occ| OccurrenceView::new(occ, base_url))
                .collect(),
        }
    }
}

impl<'a> OccurrenceView<'a> {
    fn new(occ: &'a Occurrence, base_url: Option<&str>) -> Self {
        Self {
            location: occ.location.as_str(),
            url: occ.location.resolve(base_url),
            qualified_name: &occ.qualified_name,
            parent_frame: occ.parent_frame,
        }
    }
}

/// Entries matching `query`, by key or by display label.
pub fn matching_entries<'a>(table: &'a IndexTable, query: &str, by_label: bool) -> Vec<&'a IndexEntry> {
    if by_label {
        table.find_by_label(query).collect()
    } else {
        table.entry(query).into_iter().collect()
    }
}

/// Run the lookup command.
pub fn run(key: &str, by_label: bool, json: bool, args: &SourceArgs, settings: &Settings) -> ExitCode {
    let format = OutputFormat::from_json_flag(json || settings.output.json);
    let table = match open_table(args, settings, format) {
        Ok(table) => table,
        Err(code) => return code,
    };

    let entries = matching_entries(&table, key, by_label);
    let what = if by_label { "label" } else { "key" };
    let base_url = settings.output.base_url.as_deref();

    if entries.is_empty() {
        tracing::debug!(target: "cli", "no entry for {what} '{key}'");
        if format.is_json() {
            let envelope: Envelope<()> = Envelope::not_found(format!("No entry for {what} '{key}'"))
                .with_entity_type(EntityType::Entry)
                .with_query(key)
                .with_hint(format!("Use symdex keys --prefix {key} to list similar keys"));
            print_json(&envelope);
        } else {
            eprintln!("Not found: {what} '{key}'");
        }
        return ExitCode::NotFound;
    }

    if format.is_json() {
        let views: Vec<_> = entries.iter().map(|entry| EntryView::new(entry, base_url)).collect();
        let count = views.len();
        let envelope = Envelope::success(views)
            .with_entity_type(EntityType::Entry)
            .with_count(count)
            .with_query(key)
            .with_message(format!("Found {count} entr{}", if count == 1 { "y" } else { "ies" }));
        print_json(&envelope);
    } else {
        for entry in entries {
            print_entry(entry, base_url);
        }
    }

    ExitCode::Success
}

fn print_entry(entry: &IndexEntry, base_url: Option<&str>) {
    let count = entry.occurrences().len();
    println!(
        "{}  {}  {} occurrence{}",
        style(entry.display_label()).bold(),
        style(format!("[{}]", entry.key())).dim(),
        count,
        if count == 1 { "" } else { "s" }
    );
    for occ in entry.occurrences() {
        println!("  {}", style(&occ.qualified_name).cyan());
        println!("      {}", occ.location.resolve(base_url));
    }
}
