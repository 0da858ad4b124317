//! Stats command - record counts, subscriber engagement and cache figures.

use chrono::{NaiveDate, Utc};
use comfy_table::{presets::UTF8_FULL, modifiers::UTF8_ROUND_CORNERS, ContentArrangement, Table};
use console::style;

use vh_core::config::ConfigHandle;
use vh_core::error::{VhError, VhResult};

use crate::OutputFormat;

pub async fn run(config: ConfigHandle, today: Option<String>, format: OutputFormat) -> VhResult<()> {
    let today = match today {
        Some(day) => NaiveDate::parse_from_str(&day, "%Y-%m-%d")
            .map_err(|e| VhError::Config(format!("invalid --today `{day}`: {e}")))?,
        None => Utc::now().date_naive(),
    };

    let registry = super::open_registry(config).await?;
    let views = registry.views();
    let counts = views.dashboard_counts().await?;
    let subscribers = views.subscriber_stats(today).await?;
    let cache = registry.cache().stats().await;
    let health = registry.health_check();

    match format {
        OutputFormat::Json => {
            let out = serde_json::json!({
                "counts": counts
                    .iter()
                    .map(|(c, n)| (c.name().to_string(), serde_json::Value::from(*n)))
                    .collect::<serde_json::Map<_, _>>(),
                "subscribers": subscribers,
                "cache": {
                    "hits": cache.hits,
                    "misses": cache.misses,
                    "invalidations": cache.invalidations,
                    "entries": cache.entries,
                },
                "services": health
                    .iter()
                    .map(|(name, state, healthy)| serde_json::json!({
                        "name": name,
                        "state": state.to_string(),
                        "healthy": healthy,
                    }))
                    .collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&out).unwrap_or_default());
        }
        OutputFormat::Text => {
            println!("{}", style("Records").bold().underlined());
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Collection", "Records"]);
            for (collection, count) in &counts {
                table.add_row(vec![collection.name().to_string(), count.to_string()]);
            }
            println!("{table}");

            println!();
            println!("{}", style("Subscribers").bold().underlined());
            println!("  {:<20} {} (+{} this week)", "Total:", subscribers.total, subscribers.new_this_week);
            println!("  {:<20} {} ({}%)", "Active:", subscribers.active, subscribers.active_rate);
            println!("  {:<20} {} ({}%)", "WhatsApp:", subscribers.with_whatsapp, subscribers.whatsapp_rate);
            println!("  {:<20} {}", "Email only:", subscribers.email_only);
            for day in &subscribers.last_days {
                println!(
                    "  {:<20} {} {}",
                    day.date.format("%Y-%m-%d").to_string(),
                    style("#".repeat(day.count)).blue(),
                    day.count
                );
            }

            println!();
            println!("{}", style("Services").bold().underlined());
            for (name, state, healthy) in &health {
                let status = if *healthy {
                    style("healthy").green()
                } else {
                    style("unhealthy").red()
                };
                println!("  {:<20} {} ({})", name, status, state);
            }
            println!("  {:<20} {}", "query cache:", cache);
        }
    }

    registry.shutdown_all().await
}
