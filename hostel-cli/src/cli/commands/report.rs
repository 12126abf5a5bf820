//! Report command handler

use anyhow::{Context, Result};
use colored::*;

use super::format_amount;
use crate::api::BaasClient;
use crate::cli::ReportCommands;
use crate::config::Config;
use crate::ingest::gateway::PersistenceGateway;
use crate::report::export::write_cost_report;
use crate::report::{
    CostTotals, current_month, select_month, sort_newest_first, summary_rows, unique_months,
};

pub async fn handle_report_command(command: ReportCommands, config: &Config) -> Result<()> {
    match command {
        ReportCommands::Costs { month, export } => {
            let client =
                BaasClient::new(&config.baas).context("Failed to set up the database client")?;
            let gateway = PersistenceGateway::new(&client, &config.baas.collections);

            let mut summaries = gateway
                .list_cost_summaries()
                .await
                .context("Failed to fetch cost summaries")?;
            if summaries.is_empty() {
                println!("No cost summaries stored yet");
                return Ok(());
            }
            sort_newest_first(&mut summaries);

            let month = month.unwrap_or_else(current_month);
            let selected = select_month(&summaries, &month);

            println!(
                "{} {}",
                "Months:".bold(),
                unique_months(&summaries).join(", ").dimmed()
            );
            println!();

            for summary in &selected {
                println!("{}", summary.accounted_month.bright_green().bold());
                for (label, value) in summary_rows(summary) {
                    println!("  {:<22}{}", label, format_amount(value));
                }
                for entry in &summary.shopping_entries {
                    println!("    {:<12}{}", entry.date.dimmed(), format_amount(entry.amount));
                }
                for entry in summary.teacher_meal_entries() {
                    println!(
                        "    {} ({}) {} meals, {}",
                        entry.name,
                        entry.designation.dimmed(),
                        format_amount(entry.total_meals),
                        format_amount(entry.total_cost)
                    );
                }
                println!();
            }

            if selected.len() > 1 {
                println!("{}", "Total".bold());
                for (label, value) in CostTotals::from_summaries(selected.iter().copied()).rows() {
                    println!("  {:<22}{}", label, format_amount(value));
                }
            }

            if let Some(path) = export {
                write_cost_report(&selected, &path)?;
                println!(
                    "Report saved to: {}",
                    path.display().to_string().bright_green()
                );
            }
        }
    }

    Ok(())
}
