use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use colored::*;
use cutplan_core::{validate, CutPlan, CutRequest, Optimizer, OptimizerError, StockKind};
use std::path::{Path, PathBuf};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cutplan")]
#[command(about = "Cutting stock optimizer - compute sheet and bar cut plans", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a cut plan for a job
    Optimize {
        /// Job file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the cut plan (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check a job without packing it
    Validate {
        /// Job file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Optimize { input, output } => {
            optimize_command(input, output)?;
        }
        Commands::Validate { input } => {
            validate_command(input)?;
        }
    }

    Ok(())
}

fn load_request(input: &Path) -> Result<CutRequest> {
    let content = std::fs::read_to_string(input)?;
    let extension = input.extension().and_then(|s| s.to_str());
    let request = if matches!(extension, Some("yaml") | Some("yml")) {
        serde_yaml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };
    debug!("Loaded job from {}", input.display());
    Ok(request)
}

fn optimize_command(input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    println!("{}", "🔍 Loading job...".bright_blue());

    let request = load_request(&input)?;
    let unit_name = unit_name(request.stock.kind);

    println!(
        "  {} demand lines, {} pieces",
        request.pieces.len().to_string().bright_white().bold(),
        request
            .pieces
            .iter()
            .map(|d| i128::from(d.quantity.max(0)))
            .sum::<i128>()
            .to_string()
            .bright_white()
            .bold()
    );
    println!(
        "  Stock: {} {} x {}",
        unit_name,
        request.stock.width.to_string().bright_white(),
        request.stock.length.to_string().bright_white()
    );
    println!();

    println!("{}", "🚀 Running optimization...".bright_blue());

    let optimizer = match Optimizer::new(request) {
        Ok(optimizer) => optimizer,
        Err(err) => return report_invalid(err),
    };
    let plan = optimizer.optimize();

    println!();
    println!("{}", "✅ Optimization complete!".bright_green().bold());
    println!();

    print_plan(&plan, unit_name);

    let json = serde_json::to_string_pretty(&plan)?;
    if let Some(output_path) = output {
        std::fs::write(&output_path, json)?;
        println!(
            "💾 Saved cut plan to {}",
            output_path.display().to_string().bright_white()
        );
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn validate_command(input: PathBuf) -> Result<()> {
    let request = load_request(&input)?;
    let issues = validate(&request);

    if !issues.is_empty() {
        return report_invalid(OptimizerError::Validation(issues));
    }

    println!("{}", "✅ Job is valid".bright_green().bold());
    Ok(())
}

fn report_invalid(err: OptimizerError) -> Result<()> {
    let OptimizerError::Validation(issues) = &err;
    println!("{}", "❌ Job is invalid:".bright_red().bold());
    for issue in issues {
        println!("    • {}", issue.to_string().bright_red());
    }
    error!("{} validation problem(s)", issues.len());
    bail!(err)
}

fn print_plan(plan: &CutPlan, unit_name: &str) {
    println!("{}", "📊 Results:".bright_yellow().bold());
    println!(
        "  {}s consumed: {}",
        unit_name,
        plan.units_consumed.to_string().bright_white().bold()
    );
    println!(
        "  Utilization: {}%",
        plan.utilization_rounded().to_string().bright_white()
    );
    println!(
        "  Reusable remnants: {} ({} sq units)",
        plan.scrap.len().to_string().bright_white(),
        plan.summary.reusable_remnant_area.to_string().bright_green()
    );
    println!(
        "  Waste: {} sq units",
        plan.summary.waste_area.to_string().bright_white()
    );

    if !plan.unplaceable.is_empty() {
        println!();
        println!("  {}", "Pieces that fit no stock unit:".bright_red());
        for piece in &plan.unplaceable {
            println!(
                "    • {} ({} x {})",
                piece.id.bright_red(),
                piece.width,
                piece.length
            );
        }
    }

    println!();
}

fn unit_name(kind: StockKind) -> &'static str {
    match kind {
        StockKind::Sheet => "Sheet",
        StockKind::Bar => "Bar",
    }
}
