//! Script command - replay a JSON-lines session of operations.
//!
//! Each non-empty line is one operation, for example:
//!
//! ```text
//! {"op": "create", "collection": "Announcement", "fields": {"title": "X", "content": "Y"}}
//! {"op": "filter", "collection": "Announcement", "where": {"is_published": true}, "sort": "-publish_date"}
//! {"op": "update", "collection": "Announcement", "id": 6, "fields": {"is_published": true}}
//! {"op": "delete", "collection": "Announcement", "id": 6}
//! ```
//!
//! Lines starting with `#` are skipped. Every operation runs against the same
//! store, so later lines observe earlier mutations.

use std::io::Read;

use console::style;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use vh_core::config::ConfigHandle;
use vh_core::error::{VhError, VhResult};
use vh_models::{Fields, RecordId};
use vh_services::{Entities, EntityAccess, ListQuery, Predicate};

use crate::OutputFormat;

/// One scripted operation.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
enum Operation {
    List {
        collection: String,
        #[serde(default)]
        sort: Option<String>,
        #[serde(default)]
        limit: Option<usize>,
    },
    Filter {
        collection: String,
        #[serde(rename = "where", default)]
        conditions: Fields,
        #[serde(default)]
        sort: Option<String>,
        #[serde(default)]
        limit: Option<usize>,
    },
    Get {
        collection: String,
        id: u64,
    },
    Create {
        collection: String,
        #[serde(default)]
        fields: Fields,
    },
    Update {
        collection: String,
        id: u64,
        #[serde(default)]
        fields: Fields,
    },
    Delete {
        collection: String,
        id: u64,
    },
}

impl Operation {
    fn label(&self) -> &'static str {
        match self {
            Operation::List { .. } => "list",
            Operation::Filter { .. } => "filter",
            Operation::Get { .. } => "get",
            Operation::Create { .. } => "create",
            Operation::Update { .. } => "update",
            Operation::Delete { .. } => "delete",
        }
    }
}

fn query(sort: Option<String>, limit: Option<usize>) -> ListQuery {
    super::list_query(sort, limit)
}

/// Run one operation, returning its result as JSON.
async fn apply(entities: &Entities, op: Operation) -> VhResult<Value> {
    match op {
        Operation::List { collection, sort, limit } => {
            let records = entities.by_name(&collection)?.list(&query(sort, limit)).await?;
            Ok(Value::Array(records.iter().map(|r| r.to_json()).collect()))
        }
        Operation::Filter { collection, conditions, sort, limit } => {
            let records = entities
                .by_name(&collection)?
                .filter(&Predicate::from(conditions), &query(sort, limit))
                .await?;
            Ok(Value::Array(records.iter().map(|r| r.to_json()).collect()))
        }
        Operation::Get { collection, id } => {
            Ok(entities.by_name(&collection)?.get(RecordId(id)).await?.to_json())
        }
        Operation::Create { collection, fields } => {
            Ok(entities.by_name(&collection)?.create(fields).await?.to_json())
        }
        Operation::Update { collection, id, fields } => {
            Ok(entities.by_name(&collection)?.update(RecordId(id), fields).await?.to_json())
        }
        Operation::Delete { collection, id } => {
            let removed = entities.by_name(&collection)?.delete(RecordId(id)).await?;
            Ok(json!({ "removed": removed }))
        }
    }
}

fn read_script(file: &str) -> VhResult<String> {
    if file == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read_to_string(file)?)
    }
}

pub async fn run(
    config: ConfigHandle,
    file: &str,
    stop_on_error: bool,
    format: OutputFormat,
) -> VhResult<()> {
    let script = read_script(file)?;
    let registry = super::open_registry(config).await?;
    let entities = registry.entities();

    let mut applied = 0usize;
    let mut failed = 0usize;

    for (index, line) in script.lines().enumerate() {
        let line_no = index + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let outcome = match serde_json::from_str::<Operation>(line) {
            Ok(op) => {
                let label = op.label();
                debug!("script line {line_no}: {label}");
                apply(&entities, op).await.map(|result| (label, result))
            }
            Err(e) => Err(VhError::Serialization(format!("line {line_no}: {e}"))),
        };

        match outcome {
            Ok((label, result)) => {
                applied += 1;
                match format {
                    OutputFormat::Json => {
                        println!("{}", json!({ "line": line_no, "op": label, "ok": true, "result": result }));
                    }
                    OutputFormat::Text => {
                        println!("{} {:>4} {}", style("OK").green().bold(), line_no, label);
                        println!("{}", serde_json::to_string_pretty(&result).unwrap_or_default());
                    }
                }
            }
            Err(e) => {
                failed += 1;
                warn!("script line {line_no} failed: {e}");
                match format {
                    OutputFormat::Json => {
                        println!("{}", json!({ "line": line_no, "ok": false, "error": e.to_string() }));
                    }
                    OutputFormat::Text => {
                        println!("{} {:>4} {}", style("ERR").red().bold(), line_no, e);
                    }
                }
                if stop_on_error {
                    registry.shutdown_all().await?;
                    return Err(e);
                }
            }
        }
    }

    if let OutputFormat::Text = format {
        println!("\n{applied} operation(s) applied, {failed} failed.");
    }
    registry.shutdown_all().await
}
