//! Seed command - show the population a fresh store starts with.

use console::style;

use vh_core::error::VhResult;
use vh_models::seed::{max_seed_id, seed_records};
use vh_models::Collection;

use crate::OutputFormat;

pub fn run(collection: Option<String>, format: OutputFormat) -> VhResult<()> {
    if let Some(name) = collection {
        let collection = Collection::parse(&name)?;
        super::print_records(collection, &seed_records(collection), format);
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            let all: serde_json::Map<String, serde_json::Value> = Collection::ALL
                .into_iter()
                .map(|c| {
                    let records = seed_records(c).iter().map(|r| r.to_json()).collect();
                    (c.storage_key().to_string(), serde_json::Value::Array(records))
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&all).unwrap_or_default());
        }
        OutputFormat::Text => {
            println!("{}", style("Seed population").bold().underlined());
            for c in Collection::ALL {
                println!("  {:<20} {:>3} record(s)", c.name(), seed_records(c).len());
            }
            println!("\n  Generated ids start at {}.", max_seed_id() + 1);
        }
    }
    Ok(())
}
