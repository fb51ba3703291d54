//! Keys command - list keys in authored order.

use super::{open_table, print_json};
use crate::cli::SourceArgs;
use crate::config::Settings;
use crate::io::{EntityType, Envelope, ExitCode, OutputFormat};
use crate::IndexTable;

/// Keys starting with `prefix`, in table order, at most `limit` of them.
///
/// Returns the selected keys and whether more matched than were returned.
pub fn select_keys<'a>(table: &'a IndexTable, prefix: Option<&str>, limit: Option<usize>) -> (Vec<&'a str>, bool) {
    let mut matching = table
        .keys()
        .filter(|key| prefix.is_none_or(|p| key.starts_with(p)));

    let selected: Vec<&str> = match limit {
        Some(limit) => matching.by_ref().take(limit).collect(),
        None => matching.by_ref().collect(),
    };
    let truncated = matching.next().is_some();

    (selected, truncated)
}

/// Run the keys command.
pub fn run(
    prefix: Option<&str>,
    limit: Option<usize>,
    json: bool,
    args: &SourceArgs,
    settings: &Settings,
) -> ExitCode {
    let format = OutputFormat::from_json_flag(json || settings.output.json);
    let table = match open_table(args, settings, format) {
        Ok(table) => table,
        Err(code) => return code,
    };

    let (keys, truncated) = select_keys(&table, prefix, limit);

    if format.is_json() {
        let count = keys.len();
        let mut envelope = Envelope::success(keys)
            .with_entity_type(EntityType::Key)
            .with_count(count)
            .with_truncated(truncated)
            .with_message(format!("Listed {count} of {} keys", table.len()));
        if let Some(prefix) = prefix {
            envelope = envelope.with_query(prefix);
        }
        print_json(&envelope);
    } else {
        for key in &keys {
            println!("{key}");
        }
        if truncated {
            eprintln!("(more keys available, raise --limit)");
        }
    }

    ExitCode::Success
}
