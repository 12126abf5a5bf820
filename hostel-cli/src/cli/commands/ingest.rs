//! Ingest command handler

use anyhow::{Context, Result};
use colored::*;

use super::{format_amount, load_workbook, print_diagnostics};
use crate::api::{BaasClient, DocumentStore, DryRunStore};
use crate::cli::IngestCommands;
use crate::config::Config;
use crate::ingest::gateway::PersistenceGateway;
use crate::ingest::{ingest_costs, ingest_meal_fees, ingest_rooms, ingest_students};

pub async fn handle_ingest_command(command: IngestCommands, config: &Config) -> Result<()> {
    let args = command.args();
    let table = load_workbook(&args.file)?;

    let client = BaasClient::new(&config.baas).context("Failed to set up the database client")?;
    let dry_run = DryRunStore::new(&client);
    let store: &dyn DocumentStore = if args.dry_run { &dry_run } else { &client };
    let gateway = PersistenceGateway::new(store, &config.baas.collections);

    if args.dry_run {
        println!("{}", "Dry run: writes are logged, not sent".yellow());
    }

    match &command {
        IngestCommands::Rooms(_) => {
            let report = ingest_rooms(&table, &config.layout, &gateway)
                .await
                .context("Room ingestion failed")?;
            println!(
                "{} {} rooms updated",
                "✓".bright_green(),
                report.updated.len()
            );
            for room in &report.updated {
                println!(
                    "  {} {} seats",
                    room.room_number.bright_white(),
                    room.occupied_seats()
                );
            }
            if !report.missing.is_empty() {
                println!(
                    "{} rooms not in the database: {}",
                    "!".yellow().bold(),
                    report.missing.join(", ")
                );
            }
        }
        IngestCommands::Costs(_) => {
            let report = ingest_costs(&table, &config.layout, &gateway)
                .await
                .context("Cost ingestion failed")?;
            let summary = &report.summary;
            println!(
                "{} Cost summary {} stored for {}",
                "✓".bright_green(),
                report.document_id.dimmed(),
                summary.accounted_month.bright_white()
            );
            println!(
                "  Total cost {}, per meal {}, teacher collection {}",
                format_amount(summary.total_cost),
                format_amount(summary.per_meal_cost),
                format_amount(summary.teacher_collection())
            );
            print_diagnostics(&report.diagnostics);
        }
        IngestCommands::Students(_) => {
            let report = ingest_students(&table, &config.layout, &gateway)
                .await
                .context("Student import failed")?;
            println!(
                "{} {} students created, {} already known",
                "✓".bright_green(),
                report.created.len(),
                report.existing.len()
            );
            print_diagnostics(&report.diagnostics);
        }
        IngestCommands::MealFees(_) => {
            let report = ingest_meal_fees(
                &table,
                &config.layout,
                config.fees.hostel_fixed_fee,
                &gateway,
            )
            .await
            .context("Meal fee import failed")?;
            println!(
                "{} {} meal fee records created",
                "✓".bright_green(),
                report.created.len()
            );
            print_diagnostics(&report.diagnostics);
        }
    }

    if args.dry_run {
        println!(
            "{} {} writes not sent",
            "Dry run:".yellow(),
            dry_run.recorded().len()
        );
    }

    Ok(())
}
