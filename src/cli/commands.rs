//! CLI command implementations
//!
//! Each command loads configuration, applies the log level, then works on a
//! single result file through a [`ResultStore`].

use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::LedgerConfig;
use crate::selection::SelectionReason;
use crate::store::{ComponentId, LoadedResult, ResolutionResult, ResultStore};

use super::args::{Command, CommonArgs};
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_error, write_response};

/// Body of a `write` request
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WriteRequest {
    pub components: Vec<ComponentInput>,
}

/// One component of a `write` request
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentInput {
    pub id: ComponentId,
    /// Ordered descriptions; duplicates are dropped, empty lists rejected
    pub descriptions: SelectionReason,
}

impl WriteRequest {
    /// Build the result, rejecting repeated component ids
    pub fn into_result(self) -> CliResult<ResolutionResult> {
        let mut result = ResolutionResult::new();
        for component in self.components {
            let id = component.id.clone();
            if result.insert(component.id, component.descriptions).is_some() {
                return Err(CliError::Input(format!("duplicate component {}", id)));
            }
        }
        Ok(result)
    }
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    match run_command(cli.command) {
        Ok(()) => Ok(()),
        Err(e) => {
            let _ = write_error(e.code(), &e.to_string());
            Err(e)
        }
    }
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Write { common } => write(&common),
        Command::Inspect { common } => inspect(&common),
        Command::Verify { common } => verify(&common),
    }
}

fn open_store(common: &CommonArgs) -> CliResult<ResultStore> {
    let mut config = match &common.config {
        Some(path) => LedgerConfig::load(path)?,
        None => LedgerConfig::default(),
    };
    if let Some(store) = &common.store {
        config.store_path = store.clone();
    }
    config.validate()?;
    config.apply_logging()?;
    Ok(ResultStore::from_config(&config))
}

/// Persist a resolved graph read from stdin
pub fn write(common: &CommonArgs) -> CliResult<()> {
    let mut store = open_store(common)?;
    let request: WriteRequest = read_request()?;
    let result = request.into_result()?;

    let header = store.write(&result)?;
    let stats = store.codec_stats();
    write_response(json!({
        "store_path": store.path().display().to_string(),
        "store_id": header.store_id.to_string(),
        "components": result.len(),
        "inline_texts": stats.inline_texts,
        "dictionary_refs": stats.dictionary_refs,
        "bytes": stats.bytes,
    }))
}

/// Print a persisted result
pub fn inspect(common: &CommonArgs) -> CliResult<()> {
    let mut store = open_store(common)?;
    let loaded = store.read()?;
    write_response(render_loaded(&loaded))
}

/// Verify a persisted result
pub fn verify(common: &CommonArgs) -> CliResult<()> {
    let mut store = open_store(common)?;
    let loaded = store.read()?;
    write_response(json!({
        "valid": true,
        "store_id": loaded.header.store_id.to_string(),
        "format_version": loaded.header.format_version,
        "components": loaded.result.len(),
        "unexpected": loaded.result.unexpected().count(),
        "descriptions": loaded.stats.descriptions,
        "inline_texts": loaded.stats.inline_texts,
        "dictionary_refs": loaded.stats.dictionary_refs,
    }))
}

/// JSON view of a loaded result, including derived flags
pub fn render_loaded(loaded: &LoadedResult) -> Value {
    let components: Vec<Value> = loaded
        .result
        .iter()
        .map(|component| render_reason(component.id(), component.reason()))
        .collect();

    json!({
        "store_id": loaded.header.store_id.to_string(),
        "format_version": loaded.header.format_version,
        "written_at": loaded.header.written_at.to_rfc3339(),
        "components": components,
    })
}

fn render_reason(id: &ComponentId, reason: &SelectionReason) -> Value {
    json!({
        "id": id.to_string(),
        "primary": reason.primary_text(),
        "expected": reason.is_expected(),
        "forced": reason.is_forced(),
        "conflict_resolution": reason.is_conflict_resolution(),
        "selected_by_rule": reason.is_selected_by_rule(),
        "composite_substitution": reason.is_composite_substitution(),
        "custom": reason.has_custom_descriptions(),
        "descriptions": reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecStats;
    use crate::selection::SelectionCause;
    use crate::store::StoreHeader;

    #[test]
    fn test_write_request_builds_result() {
        let request: WriteRequest = serde_json::from_str(
            r#"{"components": [
                {"id": "org:app:1.0", "descriptions": [{"cause": "ROOT", "text": "root"}]},
                {"id": "org:lib:2.0", "descriptions": [
                    {"cause": "REQUESTED", "text": "requested"},
                    {"cause": "FORCED", "text": "pinned"},
                    {"cause": "REQUESTED", "text": "requested"}
                ]}
            ]}"#,
        )
        .unwrap();
        let result = request.into_result().unwrap();

        let lib = result.get(&"org:lib:2.0".parse().unwrap()).unwrap();
        assert_eq!(lib.len(), 2);
        assert_eq!(lib.primary_text(), "pinned");
        assert!(lib.is_forced());
    }

    #[test]
    fn test_write_request_rejects_duplicates_and_empty() {
        let request: WriteRequest = serde_json::from_str(
            r#"{"components": [
                {"id": "g:m:1", "descriptions": [{"cause": "ROOT", "text": "root"}]},
                {"id": "g:m:1", "descriptions": [{"cause": "ROOT", "text": "root"}]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(request.into_result().unwrap_err().code(), "LEDGER_CLI_INPUT");

        let empty = serde_json::from_str::<WriteRequest>(
            r#"{"components": [{"id": "g:m:1", "descriptions": []}]}"#,
        );
        assert!(empty.is_err());

        let bad_id = serde_json::from_str::<WriteRequest>(
            r#"{"components": [{"id": "g:m", "descriptions": [{"cause": "ROOT", "text": "root"}]}]}"#,
        );
        assert!(bad_id.is_err());
    }

    #[test]
    fn test_render_reason_flags() {
        let mut reason = SelectionReason::requested();
        reason.add_cause(SelectionCause::Forced, "pin 1.2");
        let mut result = ResolutionResult::new();
        result.insert(ComponentId::new("g", "m", "1.2"), reason);

        let loaded = LoadedResult {
            header: StoreHeader::new_now(),
            result,
            stats: CodecStats::default(),
        };
        let rendered = render_loaded(&loaded);
        let component = &rendered["components"][0];
        assert_eq!(component["id"], "g:m:1.2");
        assert_eq!(component["primary"], "pin 1.2");
        assert_eq!(component["expected"], false);
        assert_eq!(component["forced"], true);
        assert_eq!(component["descriptions"][0]["cause"], "REQUESTED");
        assert_eq!(rendered["format_version"], 1);
    }
}
