//! CLI command implementations.

pub mod records;
pub mod stats;
pub mod seed;
pub mod script;

use comfy_table::{presets::UTF8_FULL, modifiers::UTF8_ROUND_CORNERS, ContentArrangement, Table};
use serde_json::Value;

use vh_core::config::ConfigHandle;
use vh_core::error::{VhError, VhResult};
use vh_models::{Collection, Fields, Record};
use vh_services::{ListQuery, Predicate, ServiceRegistry};

use crate::OutputFormat;

/// Build and initialize a registry over a freshly seeded store.
pub async fn open_registry(config: ConfigHandle) -> VhResult<ServiceRegistry> {
    let registry = ServiceRegistry::new(config).await;
    registry.init_all().await?;
    Ok(registry)
}

/// Parse a JSON object argument into a field map.
pub fn parse_fields(json: &str) -> VhResult<Fields> {
    match serde_json::from_str::<Value>(json)? {
        Value::Object(map) => Ok(map),
        other => Err(VhError::Serialization(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

/// Parse `field=value` conditions. Values that are valid JSON keep their
/// type; anything else is a string.
pub fn parse_conditions(conditions: &[String]) -> VhResult<Predicate> {
    let mut predicate = Predicate::new();
    for condition in conditions {
        let (field, raw) = condition.split_once('=').ok_or_else(|| {
            VhError::Config(format!("condition `{condition}` is not of the form field=value"))
        })?;
        let value = serde_json::from_str::<Value>(raw)
            .unwrap_or_else(|_| Value::String(raw.to_string()));
        predicate = predicate.eq(field.trim(), value);
    }
    Ok(predicate)
}

/// Build a read query from CLI options.
pub fn list_query(sort: Option<String>, limit: Option<usize>) -> ListQuery {
    let mut query = ListQuery::new();
    if let Some(sort) = sort {
        query = query.sorted(&sort);
    }
    query.limit = limit;
    query
}

/// Columns shown for a collection in text output, after the id.
fn display_columns(collection: Collection) -> &'static [&'static str] {
    match collection {
        Collection::Announcement => &["title", "type", "publish_date", "is_published"],
        Collection::Ministry => &["name", "icon", "description"],
        Collection::Subscriber => &["full_name", "email", "whatsapp", "is_active", "created_date"],
        Collection::Event => &["title", "event_date", "location", "is_featured"],
        Collection::Sermon => &["title", "preacher", "sermon_date", "scripture_reference"],
        Collection::Gallery => &["title", "media_type", "event_name", "event_date"],
        Collection::Notification => &["title", "channel", "scheduled_date", "is_sent"],
    }
}

/// Render one field value for a table cell.
fn cell(record: &Record, field: &str) -> String {
    match record.fields.get(field) {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => truncate(s, 40),
        Some(Value::Bool(true)) => "yes".to_string(),
        Some(Value::Bool(false)) => "no".to_string(),
        Some(other) => truncate(&other.to_string(), 40),
    }
}

/// Print records as a table or a JSON array.
pub fn print_records(collection: Collection, records: &[Record], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let values: Vec<Value> = records.iter().map(Record::to_json).collect();
            println!("{}", serde_json::to_string_pretty(&values).unwrap_or_default());
        }
        OutputFormat::Text => {
            if records.is_empty() {
                println!("No {} records.", collection);
                return;
            }
            let columns = display_columns(collection);
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_content_arrangement(ContentArrangement::Dynamic);

            let mut header = vec!["ID".to_string()];
            header.extend(columns.iter().map(|c| c.to_string()));
            table.set_header(header);

            for record in records {
                let mut row = vec![record.id.to_string()];
                row.extend(columns.iter().map(|c| cell(record, c)));
                table.add_row(row);
            }

            println!("{table}");
            println!("\n{} {} record(s).", records.len(), collection);
        }
    }
}

/// Print a single record with every field.
pub fn print_record(record: &Record, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&record.to_json()).unwrap_or_default());
        }
        OutputFormat::Text => {
            println!("  {:<20} {}", "id", record.id);
            for (key, value) in &record.fields {
                let shown = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                println!("  {:<20} {}", key, shown);
            }
        }
    }
}

/// Truncate a string to a maximum number of characters, appending an
/// ellipsis if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{kept}...")
    } else {
        s.chars().take(max_len).collect()
    }
}
