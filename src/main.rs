//! Solar Calculator CLI
//!
//! Command-line interface for sizing an installation and projecting its savings

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

use solar_calculator::format::{format_currency, format_number};
use solar_calculator::projection::{headline, SizingResult};
use solar_calculator::scenario::SweepPoint;
use solar_calculator::tariff::{normalize, BillRange, RawTariffInputs, ToggleInput};
use solar_calculator::{PricingRegime, ScenarioRunner};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Directory with coefficients.json, installation_catalog.csv and storage_options.csv
    #[arg(long, global = true)]
    assumptions: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Tariff fields, as typed into the form
#[derive(Args)]
struct TariffArgs {
    /// Energy price per kWh
    #[arg(long, default_value = "0.62")]
    active_price: String,

    /// Distribution price per kWh
    #[arg(long, default_value = "0.48")]
    distribution_price: String,

    /// Price received per exported kWh
    #[arg(long, default_value = "0.20")]
    resale_price: String,

    /// Fixed monthly charges
    #[arg(long, default_value = "20")]
    fixed_charge: String,

    /// Yearly price growth, as a percentage (5) or a fraction (0.05)
    #[arg(long, default_value = "5")]
    price_growth: String,

    /// Dynamic tariff (true/1/yes/tak/on)
    #[arg(long, default_value = "false")]
    dynamic: String,

    /// Known yearly consumption in kWh; derived from the bill when omitted
    #[arg(long)]
    demand: Option<String>,
}

impl TariffArgs {
    fn to_raw(&self, monthly_bill: &str) -> RawTariffInputs {
        RawTariffInputs {
            monthly_bill: Some(monthly_bill.to_string()),
            annual_demand_kwh: self.demand.clone(),
            active_energy_price: Some(self.active_price.clone()),
            distribution_price: Some(self.distribution_price.clone()),
            resale_price: Some(self.resale_price.clone()),
            fixed_monthly_charge: Some(self.fixed_charge.clone()),
            annual_price_growth_rate: Some(self.price_growth.clone()),
            dynamic_pricing: Some(ToggleInput::Text(self.dynamic.clone())),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Size an installation for one bill and print its projection
    Calculate {
        /// Average monthly bill
        #[arg(long)]
        bill: String,

        #[command(flatten)]
        tariff: TariffArgs,

        /// Write the yearly projection to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Print the full result as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Evaluate every bill of the slider range
    Sweep {
        #[arg(long, default_value_t = 100.0)]
        from: f64,

        #[arg(long, default_value_t = 2000.0)]
        to: f64,

        #[arg(long, default_value_t = 10.0)]
        step: f64,

        #[command(flatten)]
        tariff: TariffArgs,

        /// Write the sweep to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let runner = match &cli.assumptions {
        Some(dir) => ScenarioRunner::from_dir(dir)
            .with_context(|| format!("Failed to load assumptions from {}", dir.display()))?,
        None => ScenarioRunner::new(),
    };

    match cli.command {
        Commands::Calculate { bill, tariff, csv, json } => {
            let result = runner
                .run_raw(&tariff.to_raw(&bill))
                .context("No result for these inputs")?;

            if json {
                let stdout = io::stdout();
                serde_json::to_writer_pretty(stdout.lock(), &result)?;
                println!();
            } else {
                print_result(&result);
            }

            if let Some(path) = csv {
                write_projection_csv(&path, &result)?;
                println!("\nFull projection written to: {}", path.display());
            }
        }
        Commands::Sweep { from, to, step, tariff, csv } => {
            let range = BillRange {
                min: from,
                max: to,
                step,
                default_value: from,
            };
            range.validate().context("Invalid bill range")?;
            let template = normalize(&tariff.to_raw(&format!("{}", range.min.max(1.0))))
                .context("No result for these tariff values")?;

            let sweep = runner.sweep_bills(&template, &range);
            info!("swept {} bills", sweep.len());
            print_sweep(&sweep);

            if let Some(path) = csv {
                write_sweep_csv(&path, &sweep)?;
                println!("\nSweep written to: {}", path.display());
            }
        }
    }

    Ok(())
}

fn payback_label(year: Option<u32>) -> String {
    match year {
        Some(year) => year.to_string(),
        None => "never".to_string(),
    }
}

fn print_result(result: &SizingResult) {
    let installation = &result.installation;
    let selected = result.inputs.regime();

    println!("Recommended installation");
    println!("  PV power:        {} kW", format_number(installation.pv_power_kw, 2));
    if let Some(storage) = installation.recommended_storage_kwh {
        println!("  Storage:         {} kWh", format_number(storage, 1));
    }
    println!(
        "  Package:         {} kW with {} kWh battery{}",
        format_number(installation.package_size_kw, 2),
        format_number(installation.battery_kwh, 1),
        if installation.clamped_to_catalog { " (largest available)" } else { "" }
    );
    println!("  Yearly demand:   {} kWh", format_number(installation.yearly_demand_kwh, 0));
    println!("  Cost:            {}", format_currency(installation.installation_cost));
    println!("  After grant:     {}", format_currency(installation.cost_after_grant));
    println!("  Net cost:        {}", format_currency(installation.net_cost));
    println!();

    for regime in [PricingRegime::Standard, PricingRegime::Dynamic] {
        let figures = headline(result, regime);
        let marker = if regime == selected { "*" } else { " " };
        let summary = result.regime(regime);
        let irr = summary
            .irr
            .map(|irr| format!("{}%", format_number(irr * 100.0, 2)))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "{} {:<8} bill {} -> {} / yr, savings {}, payback year {}, IRR {}",
            marker,
            format!("{:?}", regime),
            format_currency(figures.baseline_yearly_bill),
            format_currency(figures.yearly_bill),
            format_currency(figures.savings),
            payback_label(summary.payback_year),
            irr,
        );
    }
    println!();

    println!(
        "{:>4} {:>12} {:>10} {:>10} {:>10} {:>10} {:>12} {:>14} {:>12}",
        "Year", "Bill", "Prod", "SelfCons", "Export", "Import", "Savings", "Cumulative", "PV bill"
    );
    println!("{}", "-".repeat(104));
    for row in &result.years {
        println!(
            "{:>4} {:>12.2} {:>10.1} {:>10.1} {:>10.1} {:>10.1} {:>12.2} {:>14.2} {:>12.2}",
            row.year,
            row.yearly_bill,
            row.production_kwh,
            row.self_consumed_kwh,
            row.exported_kwh,
            row.imported_kwh,
            row.savings(selected),
            row.cumulative(selected),
            row.pv_bill(selected),
        );
    }
}

fn print_sweep(sweep: &[SweepPoint]) {
    println!(
        "{:>8} {:>8} {:>8} {:>12} {:>12} {:>12} {:>8}",
        "Bill", "PV kW", "Battery", "Cost", "Net cost", "Savings", "Payback"
    );
    println!("{}", "-".repeat(76));
    for point in sweep {
        println!(
            "{:>8.0} {:>8.2} {:>8.1} {:>12.2} {:>12.2} {:>12.2} {:>8}",
            point.monthly_bill,
            point.pv_power_kw,
            point.battery_kwh,
            point.installation_cost,
            point.net_cost,
            point.first_year_savings,
            payback_label(point.payback_year),
        );
    }
}

fn write_projection_csv(path: &Path, result: &SizingResult) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Unable to create CSV file {}", path.display()))?;
    let mut writer = csv::Writer::from_writer(file);
    for row in &result.years {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_sweep_csv(path: &Path, sweep: &[SweepPoint]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Unable to create CSV file {}", path.display()))?;
    let mut writer = csv::Writer::from_writer(file);
    for point in sweep {
        writer.serialize(point)?;
    }
    writer.flush()?;
    Ok(())
}
