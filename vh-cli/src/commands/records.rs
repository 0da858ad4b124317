//! Record commands - list, filter, create, update and delete.

use console::style;

use vh_core::config::ConfigHandle;
use vh_core::error::VhResult;
use vh_models::RecordId;
use vh_services::EntityAccess;

use crate::OutputFormat;

pub async fn list(
    config: ConfigHandle,
    collection: &str,
    sort: Option<String>,
    limit: Option<usize>,
    format: OutputFormat,
) -> VhResult<()> {
    let registry = super::open_registry(config).await?;
    let facade = registry.entities().by_name(collection)?;

    let records = facade.list(&super::list_query(sort, limit)).await?;
    super::print_records(facade.collection(), &records, format);
    Ok(())
}

pub async fn filter(
    config: ConfigHandle,
    collection: &str,
    conditions: &[String],
    sort: Option<String>,
    limit: Option<usize>,
    format: OutputFormat,
) -> VhResult<()> {
    let registry = super::open_registry(config).await?;
    let facade = registry.entities().by_name(collection)?;
    let predicate = super::parse_conditions(conditions)?;

    let records = facade
        .filter(&predicate, &super::list_query(sort, limit))
        .await?;
    super::print_records(facade.collection(), &records, format);
    Ok(())
}

pub async fn create(
    config: ConfigHandle,
    collection: &str,
    json: &str,
    format: OutputFormat,
) -> VhResult<()> {
    let registry = super::open_registry(config).await?;
    let facade = registry.entities().by_name(collection)?;
    let fields = super::parse_fields(json)?;

    let record = facade.create(fields).await?;
    if let OutputFormat::Text = format {
        println!(
            "  {} Created {} {}",
            style("OK").green().bold(),
            facade.collection(),
            style(record.id).cyan()
        );
    }
    super::print_record(&record, format);
    Ok(())
}

pub async fn update(
    config: ConfigHandle,
    collection: &str,
    id: u64,
    json: &str,
    format: OutputFormat,
) -> VhResult<()> {
    let registry = super::open_registry(config).await?;
    let facade = registry.entities().by_name(collection)?;
    let fields = super::parse_fields(json)?;

    let record = facade.update(RecordId(id), fields).await?;
    if let OutputFormat::Text = format {
        println!(
            "  {} Updated {} {}",
            style("OK").green().bold(),
            facade.collection(),
            style(record.id).cyan()
        );
    }
    super::print_record(&record, format);
    Ok(())
}

pub async fn delete(
    config: ConfigHandle,
    collection: &str,
    id: u64,
    format: OutputFormat,
) -> VhResult<()> {
    let registry = super::open_registry(config).await?;
    let facade = registry.entities().by_name(collection)?;

    let removed = facade.delete(RecordId(id)).await?;
    let remaining = registry.store().count(facade.collection())?;

    match format {
        OutputFormat::Json => {
            let out = serde_json::json!({
                "collection": facade.collection(),
                "id": id,
                "removed": removed,
                "remaining": remaining,
            });
            println!("{}", serde_json::to_string_pretty(&out).unwrap_or_default());
        }
        OutputFormat::Text => {
            if removed {
                println!(
                    "  {} Deleted {} {} ({} remaining)",
                    style("OK").green().bold(),
                    facade.collection(),
                    style(id).cyan(),
                    remaining
                );
            } else {
                println!(
                    "  {} No {} with id {}; nothing removed",
                    style("--").dim(),
                    facade.collection(),
                    id
                );
            }
        }
    }
    Ok(())
}
