// safety-stock command line entry point
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use engine::config::AnalysisSettings;
use engine::data::workspace_store::AnalysisWorkspace;
use engine::services::{
    AnalysisService, ExportRequest, LoadProcessPartsRequest, LoadUsageRequest, RunAnalysisRequest,
    RunProcessAnalysisRequest,
};
use shared::models::{DatasetSummary, ItemUsageSummary, ProcessItemSummary, TierCounts};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "safety-stock")]
#[command(about = "Safety stock and reorder point estimates from usage records")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate safety stock and reorder points per item
    Analyze {
        /// Usage files (.csv comma separated, anything else tab separated)
        #[arg(short, long, required = true, num_args = 1..)]
        usage: Vec<PathBuf>,

        /// Process parts table for the per-process view
        #[arg(long)]
        process_parts: Option<PathBuf>,

        /// JSON settings file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write item results to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write process results to this CSV file
        #[arg(long)]
        process_output: Option<PathBuf>,

        /// Only show rows for this process
        #[arg(long)]
        process: Option<String>,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Describe the loaded usage data without analysing it
    Summary {
        #[arg(short, long, required = true, num_args = 1..)]
        usage: Vec<PathBuf>,

        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze { usage, process_parts, config, output, process_output, process, format } => {
            let service = build_service(config.as_ref())?;
            let loaded = service.load_usage_data(LoadUsageRequest { file_paths: usage }).await?;
            info!("{}", loaded.message);

            let items = service.run_analysis(RunAnalysisRequest::default()).await?;
            let process_run = match process_parts {
                Some(path) => {
                    service.load_process_parts(LoadProcessPartsRequest { file_path: path }).await?;
                    Some(service.run_process_analysis(RunProcessAnalysisRequest { process, ..Default::default() }).await?)
                }
                None => None,
            };

            match format {
                OutputFormat::Json => {
                    let doc = serde_json::json!({
                        "run_id": items.snapshot.run_id,
                        "generated_at": items.snapshot.generated_at,
                        "tiers": items.tiers,
                        "items": items.snapshot.rows,
                        "processes": process_run.as_ref().map(|p| &p.rows),
                    });
                    println!("{}", serde_json::to_string_pretty(&doc)?);
                }
                OutputFormat::Text => {
                    print_items(&items.snapshot.rows, &items.tiers);
                    if let Some(run) = &process_run {
                        print_process_rows(&run.rows, &run.tiers);
                    }
                }
            }

            if output.is_some() || process_output.is_some() {
                let exported = service
                    .export_results(ExportRequest { file_path: output, process_file_path: process_output })
                    .await?;
                info!(path = %exported.path.display(), rows = exported.rows_written, "Wrote item results");
                if let Some(p) = exported.process_path {
                    info!(path = %p.display(), rows = exported.process_rows_written, "Wrote process results");
                }
            }
        }
        Commands::Summary { usage, config } => {
            let service = build_service(config.as_ref())?;
            let loaded = service.load_usage_data(LoadUsageRequest { file_paths: usage }).await?;
            print_summary(&loaded.summary);
        }
    }

    Ok(())
}

fn build_service(config: Option<&PathBuf>) -> Result<AnalysisService> {
    let settings = match config {
        Some(path) => AnalysisSettings::load(path).with_context(|| format!("loading settings from {}", path.display()))?,
        None => AnalysisSettings::default(),
    };
    Ok(AnalysisService::new(Arc::new(RwLock::new(AnalysisWorkspace::new())), settings)?)
}

fn print_items(rows: &[ItemUsageSummary], tiers: &TierCounts) {
    println!(
        "{:<16} {:<28} {:>10} {:>6} {:>9} {:>9} {:>10} {:>10} {:>10}  {}",
        "Item", "Part Name", "Total", "Count", "Mean/Day", "Std/Day", "Stock", "Safety", "Reorder", "Tier"
    );
    for r in rows {
        println!(
            "{:<16} {:<28} {:>10.2} {:>6} {:>9.3} {:>9.3} {:>10.2} {:>10.2} {:>10.2}  {}",
            r.item_identity,
            r.display_name,
            r.total_usage,
            r.usage_count,
            r.mean_daily_demand,
            r.std_daily_demand,
            r.current_stock,
            r.safety_stock,
            r.reorder_point,
            r.criticality
        );
    }
    print_tiers(tiers);
}

fn print_process_rows(rows: &[ProcessItemSummary], tiers: &TierCounts) {
    println!();
    println!("{:<20} {:<16} {:<28} {:>10} {:>9} {:>10}  {}", "Process", "Item", "Part Name", "Total", "Mean/Day", "Reorder", "Tier");
    for row in rows {
        let r = &row.summary;
        println!(
            "{:<20} {:<16} {:<28} {:>10.2} {:>9.3} {:>10.2}  {}",
            row.process, r.item_identity, r.display_name, r.total_usage, r.mean_daily_demand, r.reorder_point, r.criticality
        );
    }
    print_tiers(tiers);
}

fn print_tiers(tiers: &TierCounts) {
    println!(
        "\n{} items: CRITICAL {} | HIGH {} | MEDIUM {} | LOW {} | NO DATA {}",
        tiers.total(),
        tiers.critical,
        tiers.high,
        tiers.medium,
        tiers.low,
        tiers.no_data
    );
}

fn print_summary(summary: &DatasetSummary) {
    println!("Records:        {}", summary.record_count);
    println!("Columns:        {}", summary.columns.join(", "));
    if let Some(n) = summary.unique_items {
        println!("Unique items:   {}", n);
    }
    if let Some(q) = summary.total_quantity {
        println!("Total quantity: {:.2}", q);
    }
    match (&summary.date_column, &summary.date_range) {
        (Some(col), Some(range)) => println!(
            "Date range:     {} to {} ({} days, column '{}')",
            range.start.format("%Y-%m-%d"),
            range.end.format("%Y-%m-%d"),
            range.span_days(),
            col
        ),
        (Some(col), None) => println!("Date range:     no parseable dates in '{}'", col),
        _ => {}
    }
}
