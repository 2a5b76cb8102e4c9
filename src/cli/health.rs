//! Health CLI commands

use std::path::PathBuf;

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::crypto::FieldCodec;
use crate::error::AimsResult;
use crate::models::MOOD_CHOICES;
use crate::services::{HealthImportService, HealthLogInput, HealthService, NutritionixClient};
use crate::storage::Storage;

use super::{date_or_today, parse_opt_date};

#[derive(Subcommand)]
pub enum HealthCommands {
    /// Log a daily health entry
    Log {
        /// Entry date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Hours slept
        #[arg(long)]
        sleep: Option<f64>,
        #[arg(long)]
        steps: Option<u32>,
        /// Mood text, e.g. "😊 Happy" (stored encrypted)
        #[arg(short, long)]
        mood: Option<String>,
        /// Glasses of water
        #[arg(short, long)]
        water: Option<u32>,
        /// What you ate and drank; looked up for nutrition when configured
        #[arg(short, long)]
        food: Option<String>,
    },
    /// List entries, newest first
    List {
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Show how often each mood was logged
    Moods,
    /// Show hours slept per day
    Sleep,
    /// Import sleep and step records from an Apple Health export.xml
    Import { file: PathBuf },
}

pub fn handle_health_command(
    storage: &Storage,
    settings: &Settings,
    cmd: HealthCommands,
) -> AimsResult<()> {
    match cmd {
        HealthCommands::Log {
            date,
            sleep,
            steps,
            mood,
            water,
            food,
        } => {
            let codec = FieldCodec::new(settings.load_key()?);
            let client = if food.is_some() {
                NutritionixClient::from_settings(&settings.nutrition)?
            } else {
                None
            };

            let mut service = HealthService::new(storage, &codec);
            if let Some(client) = &client {
                service = service.with_nutrition(client);
            }

            let entry = service.log_entry(HealthLogInput {
                date: Some(date_or_today(date.as_deref())?),
                sleep_hours: sleep,
                steps,
                mood,
                water_glasses: water,
                food_beverages: food,
            })?;

            println!("Logged health entry {} for {}", entry.id, entry.date);
            if let Some(n) = entry.nutrition {
                println!(
                    "  Nutrition: {:.0} kcal, {:.1}g protein, {:.1}g carbs, {:.1}g fat",
                    n.calories, n.protein, n.carbs, n.fats
                );
            } else if !entry.food_beverages.is_empty() {
                println!("  Nutrition: not available");
            }
        }

        HealthCommands::List { from, to, limit } => {
            let codec = FieldCodec::new(settings.load_key()?);
            let rows = HealthService::new(storage, &codec).list_decrypted(
                parse_opt_date(from.as_deref())?,
                parse_opt_date(to.as_deref())?,
            )?;

            if rows.is_empty() {
                println!("No health entries logged yet.");
                return Ok(());
            }

            println!(
                "{:<14} {:<12} {:>6} {:>7} {:>6}  {}",
                "ID", "Date", "Sleep", "Steps", "Water", "Mood"
            );
            println!("{}", "-".repeat(64));
            for row in rows.iter().take(limit) {
                let e = &row.entry;
                println!(
                    "{:<14} {:<12} {:>6} {:>7} {:>6}  {}",
                    e.id.to_string(),
                    e.date.to_string(),
                    e.sleep_hours.map(|h| format!("{:.1}", h)).unwrap_or_else(|| "-".into()),
                    e.steps.map(|s| s.to_string()).unwrap_or_else(|| "-".into()),
                    e.water_glasses.map(|w| w.to_string()).unwrap_or_else(|| "-".into()),
                    row.mood_display()
                );
            }
            let unreadable = rows
                .iter()
                .filter(|r| matches!(r.mood, Some(Err(_))))
                .count();
            if unreadable > 0 {
                println!();
                println!("{} mood value(s) could not be decrypted with the current key.", unreadable);
            }
        }

        HealthCommands::Moods => {
            let codec = FieldCodec::new(settings.load_key()?);
            let counts = HealthService::new(storage, &codec).mood_distribution()?;
            if counts.is_empty() {
                println!("No moods logged yet. Suggested moods: {}", MOOD_CHOICES.join(", "));
                return Ok(());
            }
            for (mood, count) in counts {
                println!("{:<16} {}", mood, count);
            }
        }

        HealthCommands::Sleep => {
            let codec = FieldCodec::new(settings.load_key()?);
            let series = HealthService::new(storage, &codec).sleep_series()?;
            if series.is_empty() {
                println!("No sleep data logged yet.");
                return Ok(());
            }
            for (date, hours) in series {
                println!("{}  {:>5.1}h", date, hours);
            }
        }

        HealthCommands::Import { file } => {
            let summary = HealthImportService::new(storage).import_file(&file)?;
            println!("Imported {} records from {}", summary.imported(), file.display());
            println!("  Sleep: {}", summary.sleep_records);
            println!("  Steps: {}", summary.step_records);
            println!("  Skipped (other types): {}", summary.skipped);
            if !summary.errors.is_empty() {
                println!("  Errors: {}", summary.errors.len());
                for (idx, message) in summary.errors.iter().take(10) {
                    println!("    record {}: {}", idx, message);
                }
            }
        }
    }

    Ok(())
}
