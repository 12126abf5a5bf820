//! Offline preview of a workbook: nothing is read from or written to the database

use std::path::Path;

use anyhow::Result;
use colored::*;

use super::{format_amount, load_workbook, print_diagnostics};
use crate::config::Config;
use crate::ingest::costs::aggregate_costs;
use crate::ingest::rooms::aggregate_rooms;

pub fn handle_inspect_command(file: &Path, config: &Config) -> Result<()> {
    let table = load_workbook(file)?;
    let layout = &config.layout;

    println!("{} {}", "Workbook:".bold(), file.display().to_string().cyan());
    for name in table.sheet_names() {
        let rows = table.sheet(name).map(<[_]>::len).unwrap_or(0);
        println!("  {} ({} rows)", name.bright_white(), rows);
    }

    println!();
    match table.sheet(&layout.rooms.sheet) {
        Some(rows) => {
            let rooms = aggregate_rooms(rows, &layout.rooms);
            println!("{} {} rooms", "Rooms:".bold(), rooms.len());
            for room in &rooms {
                println!(
                    "  {} {} seats  {}",
                    room.room_number.bright_green(),
                    room.occupied_seats(),
                    room.student_names.join(", ").dimmed()
                );
            }
        }
        None => println!("{} sheet '{}' not found", "Rooms:".bold(), layout.rooms.sheet),
    }

    println!();
    match (table.sheet(&layout.costs.sheet), table.sheet(&layout.staff.sheet)) {
        (Some(cost_rows), Some(staff_rows)) => {
            let aggregation = aggregate_costs(cost_rows, staff_rows, &layout.costs, &layout.staff);
            let summary = &aggregation.summary;
            println!("{} {}", "Costs:".bold(), summary.accounted_month.bright_green());
            println!("  Previous Stock        {}", format_amount(summary.previous_stock));
            println!("  Std Total Collection  {}", format_amount(summary.std_total_collection));
            println!("  Teacher Collection    {}", format_amount(summary.teacher_collection()));
            println!("  Total Cost            {}", format_amount(summary.total_cost));
            println!("  Total Meals Served    {}", format_amount(summary.total_meals_served));
            println!("  Per Meal Cost         {}", format_amount(summary.per_meal_cost));
            println!(
                "  {} shopping entries, {} staff entries",
                summary.shopping_entries.len(),
                summary.teacher_meal_entries().len()
            );
            print_diagnostics(&aggregation.diagnostics);
        }
        (costs, _) => {
            let missing = if costs.is_none() {
                &layout.costs.sheet
            } else {
                &layout.staff.sheet
            };
            println!("{} sheet '{}' not found", "Costs:".bold(), missing);
        }
    }

    println!();
    match table.sheet(&layout.students.sheet) {
        Some(rows) => println!("{} {} rows", "Students:".bold(), rows.len()),
        None => println!("{} sheet '{}' not found", "Students:".bold(), layout.students.sheet),
    }

    Ok(())
}
