use anyhow::{bail, Result};
use care_compare::catalog::Catalog;
use care_compare::config;
use care_compare::query::{run_query, DisplayMode, QueryRequest, QueryResponse};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use std::path::Path;

use crate::cli::QueryArgs;

/// Execute a one-shot comparison query and render it to the console
pub fn execute(config_path: &Path, args: &QueryArgs) -> Result<()> {
    let cfg = config::load_config(config_path)?;
    let catalog = Catalog::load(&cfg.catalog)?;

    let request = QueryRequest {
        procedure_code: args.procedure.clone(),
        zip_code: args.zip.clone(),
        radius_miles: args.radius,
        require_hospital_rating: args.hospital_rated,
        require_doctor_rating: args.doctor_rated,
        addon_codes: args.addons.clone(),
        display: DisplayMode::Table,
    };

    let response = run_query(&catalog, &cfg, &request)?;

    match args.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        "table" => {
            print_table(&response);
        }
        other => bail!("Unknown output format '{}', expected 'table' or 'json'", other),
    }

    Ok(())
}

fn print_table(response: &QueryResponse) {
    println!(
        "{} {} ({})",
        "Procedure:".bold(),
        response.procedure_name,
        response.procedure_code
    );
    if let Some(zip) = &response.zip_code {
        println!("{} {}", "Zip Code:".bold(), zip);
    }
    println!("{} {} miles", "Radius:".bold(), response.radius_miles);
    if !response.addon_codes.is_empty() {
        println!("{} {}", "Add-ons:".bold(), response.addon_codes.join(", "));
    }
    println!();

    if response.providers.is_empty() {
        println!("{}", "No providers matched the query.".yellow());
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Hospital",
            "Doctor",
            "Address",
            "Zip",
            "Distance (mi)",
            "Hospital Rating",
            "Doctor Rating",
            "Total Cost",
        ]);

    for priced in &response.providers {
        let provider = &priced.provider;

        let mut cost_lines = vec![format!("${}", priced.total_cost_usd)];
        for line in &priced.breakdown {
            cost_lines.push(format!("  {}: ${}", line.label, line.amount_usd));
        }

        table.add_row(vec![
            Cell::new(&provider.hospital_name),
            Cell::new(&provider.doctor_name),
            Cell::new(&provider.hospital_address),
            Cell::new(&provider.zip_code),
            Cell::new(provider.distance_miles),
            Cell::new(provider.hospital_rating),
            Cell::new(provider.doctor_rating),
            Cell::new(cost_lines.join("\n")),
        ]);
    }

    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use care_compare::config::Config;

    #[test]
    fn test_print_table_smoke() {
        let catalog = Catalog::builtin();
        let cfg = Config::default();

        let request = QueryRequest {
            procedure_code: "45378".to_string(),
            zip_code: Some("12345".to_string()),
            radius_miles: 20,
            require_hospital_rating: false,
            require_doctor_rating: false,
            addon_codes: vec!["00810".to_string()],
            display: DisplayMode::Table,
        };

        let response = run_query(&catalog, &cfg, &request).unwrap();

        // Rendering must not panic, including the empty case
        print_table(&response);

        let empty = run_query(
            &catalog,
            &cfg,
            &QueryRequest {
                radius_miles: 1,
                addon_codes: vec![],
                ..request
            },
        )
        .unwrap();
        print_table(&empty);
    }
}
