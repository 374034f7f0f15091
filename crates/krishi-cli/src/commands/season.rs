use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};

use krishi_core::season::season_for;

use crate::cli::SeasonArgs;
use crate::output::OutputWriter;

pub fn execute(args: SeasonArgs, output: &OutputWriter) -> Result<()> {
    let date = match &args.date {
        Some(date) => NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", date))?,
        None => Utc::now().date_naive(),
    };

    let season = season_for(date);

    if output.is_json() {
        return output.result(serde_json::json!({
            "date": date.to_string(),
            "season": season,
        }));
    }

    output.kv("Date", date);
    output.kv("Season", season);
    Ok(())
}
