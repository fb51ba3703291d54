//! Command implementations for the CLI.
//!
//! Each command is implemented in its own module. Commands that read an
//! index share [`open_table`], which resolves sources from the command line
//! or settings and reports load failures in the requested format.

pub mod check;
pub mod init;
pub mod keys;
pub mod lookup;

use std::path::PathBuf;

use crate::cli::SourceArgs;
use crate::config::Settings;
use crate::error::{IndexError, IndexResult};
use crate::io::{Envelope, ErrorDetails, ExitCode, OutputFormat, ResultCode};
use crate::source;
use crate::{IndexTable, debug_event};

/// Load the table named by `args`, falling back to `[index]` settings.
///
/// On failure the error has already been printed; the caller only returns
/// the exit code.
pub fn open_table(args: &SourceArgs, settings: &Settings, format: OutputFormat) -> Result<IndexTable, ExitCode> {
    let sources = if args.sources.is_empty() {
        settings.index.sources.clone()
    } else {
        args.sources.clone()
    };

    if sources.is_empty() {
        let envelope: Envelope<()> = Envelope::error(ResultCode::ConfigError, "No index sources given")
            .with_hint("Pass a SOURCE argument or set index.sources in .symdex/settings.toml");
        return Err(emit_error(envelope, format));
    }

    let mut options = settings.index.source_options();
    if let Some(fmt) = args.format {
        options.format = fmt;
    }
    let category = args.category.as_deref().unwrap_or(&settings.index.category);

    let loaded = expand_sources(&sources, category).and_then(|files| {
        debug_event!("cli", "sources", "{} file(s)", files.len());
        IndexTable::from_paths(&files, &options)
    });

    loaded.map_err(|err| report_load_error(&err, format))
}

/// Replace directory sources by their category shards, keeping argument order.
fn expand_sources(sources: &[PathBuf], category: &str) -> IndexResult<Vec<PathBuf>> {
    let mut files = Vec::with_capacity(sources.len());
    for path in sources {
        if path.is_dir() {
            files.extend(source::category_shards(path, category)?);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn report_load_error(err: &IndexError, format: OutputFormat) -> ExitCode {
    tracing::warn!(target: "cli", "load failed: {err}");

    let (code, suggestion) = match err {
        err if err.is_malformed() => (
            ResultCode::MalformedIndex,
            "The index generator produced an invalid table; regenerate it",
        ),
        IndexError::Io { .. } => (ResultCode::IoError, "Check that the source path exists and is readable"),
        _ => (
            ResultCode::IoError,
            "Check the --category value against the files in the search directory",
        ),
    };

    let envelope: Envelope<()> = Envelope::error(code, err.to_string()).with_error_details(ErrorDetails {
        suggestions: vec![suggestion.to_string()],
        context: None,
    });
    emit_error(envelope, format)
}

fn emit_error(envelope: Envelope<()>, format: OutputFormat) -> ExitCode {
    let exit = envelope.code.exit_code();
    if format.is_json() {
        print_json(&envelope);
    } else {
        eprintln!("Error: {}", envelope.message);
        if let Some(hint) = &envelope.hint {
            eprintln!("Hint: {hint}");
        }
        if let Some(details) = &envelope.error {
            for suggestion in &details.suggestions {
                eprintln!("Hint: {suggestion}");
            }
        }
    }
    exit
}

/// Print an envelope as pretty JSON on stdout.
pub(crate) fn print_json<T: serde::Serialize>(envelope: &Envelope<T>) {
    match envelope.to_json() {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error serializing output: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_expand_sources_keeps_order() {
        let temp_dir = TempDir::new().unwrap();
        let search = temp_dir.path().join("search");
        std::fs::create_dir_all(&search).unwrap();
        std::fs::write(search.join("functions_1.js"), "var searchData=[];").unwrap();
        std::fs::write(search.join("functions_0.js"), "var searchData=[];").unwrap();

        let extra = temp_dir.path().join("extra.json");
        let files = expand_sources(&[extra.clone(), search.clone()], "functions").unwrap();
        assert_eq!(files, vec![extra, search.join("functions_0.js"), search.join("functions_1.js")]);
    }

    #[test]
    fn test_open_table_without_sources() {
        let settings = Settings::default();
        let result = open_table(&SourceArgs::default(), &settings, OutputFormat::Json);
        assert_eq!(result.unwrap_err(), ExitCode::ConfigError);
    }

    #[test]
    fn test_open_table_uses_settings_sources() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("index.json");
        std::fs::write(&path, r#"[["face", ["face", [["a02182#af6ed8", "OpenMesh::Concepts::KernelT::face"]]]]]"#)
            .unwrap();

        let mut settings = Settings::default();
        settings.index.sources = vec![path];

        let table = open_table(&SourceArgs::default(), &settings, OutputFormat::Text).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_open_table_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("index.json");
        std::fs::write(&path, r#"[["face", ["face", []]]]"#).unwrap();

        let args = SourceArgs {
            sources: vec![path],
            ..Default::default()
        };
        let result = open_table(&args, &Settings::default(), OutputFormat::Json);
        assert_eq!(result.unwrap_err(), ExitCode::ParseError);
    }

    #[test]
    fn test_open_table_duplicate_across_sources() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("a.json");
        let second = temp_dir.path().join("b.json");
        std::fs::write(&first, r#"[["face", ["face", [["a#1", "A::face"]]]]]"#).unwrap();
        std::fs::write(&second, r#"[["face", ["face", [["b#1", "B::face"]]]]]"#).unwrap();

        let args = SourceArgs {
            sources: vec![first, second],
            ..Default::default()
        };
        let result = open_table(&args, &Settings::default(), OutputFormat::Json);
        assert_eq!(result.unwrap_err(), ExitCode::ParseError);
    }
}
