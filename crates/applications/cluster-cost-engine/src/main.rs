//! Cluster Cost CLI
//!
//! Command-line front end for comparing job and all-purpose cluster costs
//!
//! ```bash
//! # List the instance catalog
//! cluster-cost catalog
//!
//! # Compare both billing models for one workload
//! cluster-cost estimate --instance D4A_V4 --tasks 100 --exec-time 10 --workers 5
//!
//! # Same, from a JSON scenario, writing the report to disk
//! cluster-cost estimate --scenario scenario.json --output report.json
//!
//! # Sweep task counts
//! cluster-cost sweep --instance DS4_V2 --from 10 --to 200 --step 10
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cluster_cost_engine::{
    BillingRates, CostBreakdown, Estimate, JobDbuConvention, Scenario, SweepPoint, catalog,
    sweep_task_counts, task_count_range,
};

/// Cluster Cost - job vs all-purpose cluster estimator
#[derive(Parser, Debug)]
#[command(name = "cluster-cost")]
#[command(about = "Compare batch workload cost on job and all-purpose clusters", long_about = None)]
struct Cli {
    /// Print the JSON report to stdout instead of a table
    #[arg(long, global = true)]
    json: bool,

    /// Also write the JSON report to this file
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the instance catalog
    Catalog,

    /// Price one workload on both billing models
    Estimate {
        #[command(flatten)]
        scenario: ScenarioArgs,
    },

    /// Price the same scenario over a range of task counts
    Sweep {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Explicit task counts (comma-separated); overrides --from/--to/--step
        #[arg(long, value_delimiter = ',')]
        counts: Vec<u32>,

        /// First task count
        #[arg(long, default_value_t = 10)]
        from: u32,

        /// Last task count (inclusive)
        #[arg(long, default_value_t = 200)]
        to: u32,

        /// Task count increment
        #[arg(long, default_value_t = 10)]
        step: u32,
    },
}

#[derive(Args, Debug)]
struct ScenarioArgs {
    /// Load the scenario from a JSON file instead of the flags below
    /// (the DBU rate flags still apply on top of the file)
    #[arg(
        long,
        conflicts_with_all = [
            "instance", "driver_instance", "tasks", "exec_time", "workers", "job_workers",
            "tasks_per_worker", "job_max_parallel", "all_purpose_max_parallel", "overhead",
            "dbu_convention",
        ]
    )]
    scenario: Option<PathBuf>,

    /// Catalog instance used for every node
    #[arg(short, long, default_value = "DS4_V2")]
    instance: String,

    /// Catalog instance for the driver, if different
    #[arg(long)]
    driver_instance: Option<String>,

    /// Number of tasks
    #[arg(short, long, default_value_t = 100)]
    tasks: u32,

    /// Execution time per task (minutes)
    #[arg(short, long, default_value_t = 10.0)]
    exec_time: f64,

    /// Workers in the all-purpose cluster
    #[arg(short, long, default_value_t = 5)]
    workers: u32,

    /// Workers in the job cluster
    #[arg(long, default_value_t = 1)]
    job_workers: u32,

    /// Tasks a single worker runs at once
    #[arg(long, default_value_t = 1)]
    tasks_per_worker: u32,

    /// Wave capacity of the job cluster (default: job workers x tasks per worker)
    #[arg(long)]
    job_max_parallel: Option<u32>,

    /// Wave capacity of the all-purpose cluster (default: workers x tasks per worker)
    #[arg(long)]
    all_purpose_max_parallel: Option<u32>,

    /// Startup overhead (minutes)
    #[arg(long, default_value_t = 2.5)]
    overhead: f64,

    /// Job cluster price per DBU-hour [default: 0.288]
    #[arg(long, env = "CLUSTER_COST_DBU_RATE_JOB")]
    dbu_rate_job: Option<f64>,

    /// All-purpose cluster price per DBU-hour [default: 0.528]
    #[arg(long, env = "CLUSTER_COST_DBU_RATE_ALL_PURPOSE")]
    dbu_rate_all_purpose: Option<f64>,

    /// Job cluster DBU billing convention
    #[arg(long, value_enum, default_value_t = JobDbuConvention::ExecutionOnly)]
    dbu_convention: JobDbuConvention,
}

impl ScenarioArgs {
    fn into_scenario(self) -> anyhow::Result<Scenario> {
        if let Some(path) = &self.scenario {
            let mut scenario = load_scenario(path)?;
            if let Some(rate) = self.dbu_rate_job {
                info!("Overriding scenario job DBU rate with {}", rate);
                scenario.dbu_rate_job = rate;
            }
            if let Some(rate) = self.dbu_rate_all_purpose {
                info!("Overriding scenario all-purpose DBU rate with {}", rate);
                scenario.dbu_rate_all_purpose = rate;
            }
            return Ok(scenario);
        }

        Ok(Scenario {
            instance: self.instance,
            driver_instance: self.driver_instance,
            task_count: self.tasks,
            exec_time_per_task_min: self.exec_time,
            job_workers: self.job_workers,
            all_purpose_workers: self.workers,
            tasks_per_worker: self.tasks_per_worker,
            job_max_parallel_tasks: self.job_max_parallel,
            all_purpose_max_parallel_tasks: self.all_purpose_max_parallel,
            startup_overhead_min: self.overhead,
            dbu_rate_job: self.dbu_rate_job.unwrap_or(BillingRates::DEFAULT_DBU_RATE_JOB),
            dbu_rate_all_purpose: self
                .dbu_rate_all_purpose
                .unwrap_or(BillingRates::DEFAULT_DBU_RATE_ALL_PURPOSE),
            dbu_convention: self.dbu_convention,
        })
    }
}

fn load_scenario(path: &Path) -> anyhow::Result<Scenario> {
    info!("Loading scenario from {}", path.display());
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse scenario file {}", path.display()))
}

#[derive(Serialize)]
struct EstimateReport<'a> {
    generated_at: DateTime<Utc>,
    scenario: &'a Scenario,
    #[serde(flatten)]
    estimate: &'a Estimate,
}

#[derive(Serialize)]
struct SweepReport<'a> {
    generated_at: DateTime<Utc>,
    scenario: &'a Scenario,
    points: &'a [SweepPoint],
}

fn main() -> anyhow::Result<()> {
    // Initialize logging (stderr, so --json output stays clean)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cluster_cost=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Catalog => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(catalog::instances())?);
            } else {
                print_catalog();
            }
            if let Some(path) = &cli.output {
                write_report(path, catalog::instances())?;
            }
        }
        Commands::Estimate { scenario } => {
            let scenario = scenario.into_scenario()?;
            info!(
                "Estimating {} tasks x {} min on {}",
                scenario.task_count, scenario.exec_time_per_task_min, scenario.instance
            );
            let estimate = scenario.estimate()?;

            let report = EstimateReport {
                generated_at: Utc::now(),
                scenario: &scenario,
                estimate: &estimate,
            };
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_estimate(&scenario, &estimate)?;
            }
            if let Some(path) = &cli.output {
                write_report(path, &report)?;
            }
        }
        Commands::Sweep {
            scenario,
            counts,
            from,
            to,
            step,
        } => {
            let scenario = scenario.into_scenario()?;
            let counts = if counts.is_empty() {
                task_count_range(from, to, step)?
            } else {
                counts
            };
            info!("Sweeping {} task counts on {}", counts.len(), scenario.instance);
            let points = sweep_task_counts(&scenario, &counts)?;

            let report = SweepReport {
                generated_at: Utc::now(),
                scenario: &scenario,
                points: &points,
            };
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_sweep(&points);
            }
            if let Some(path) = &cli.output {
                write_report(path, &report)?;
            }
        }
    }

    Ok(())
}

fn write_report<T: Serialize + ?Sized>(path: &Path, report: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json).with_context(|| format!("Failed to write report to {}", path.display()))?;
    info!("Report saved to {}", path.display());
    Ok(())
}

fn print_catalog() {
    println!("{:<10} {:>6} {:>6} {:>10} {:>8}", "Instance", "vCPUs", "DBUs", "Cost (/h)", "RAM (GB)");
    println!("{}", "-".repeat(44));
    for instance in catalog::instances() {
        println!(
            "{:<10} {:>6} {:>6.2} {:>10.4} {:>8.0}",
            instance.name, instance.vcpus, instance.dbus, instance.cost_per_hour, instance.ram_gb
        );
    }
}

fn print_estimate(scenario: &Scenario, estimate: &Estimate) -> anyhow::Result<()> {
    let job_config = scenario.job_config()?;
    let ap_config = scenario.all_purpose_config()?;

    println!("Workload: {} tasks x {} min", scenario.task_count, scenario.exec_time_per_task_min);
    println!("Startup overhead: {} min\n", scenario.startup_overhead_min);

    println!(
        "{:<14} {:>7} {:>7} {:>6} {:>9} {:>10}",
        "Cluster", "Nodes", "vCPUs", "DBUs", "RAM (GB)", "Parallel"
    );
    println!("{}", "-".repeat(58));
    for (label, config) in [("Job", &job_config), ("All-Purpose", &ap_config)] {
        println!(
            "{:<14} {:>7} {:>7} {:>6.2} {:>9.0} {:>10}",
            label,
            config.node_count(),
            config.total_vcpus(),
            config.total_dbus(),
            config.total_ram_gb(),
            config.max_parallel_tasks()
        );
    }

    println!(
        "\n{:<14} {:>6} {:>12} {:>10} {:>10} {:>10} {:>10}",
        "Cluster", "Waves", "Active (min)", "VM", "DBU", "Total", "Per task"
    );
    println!("{}", "-".repeat(78));
    print_breakdown("Job", &estimate.job);
    print_breakdown("All-Purpose", &estimate.all_purpose);

    if let Some(hourly) = &estimate.all_purpose.hourly {
        println!(
            "\nAll-purpose hourly: VM {:.4}/h + DBU {:.4}/h = {:.4}/h",
            hourly.vm_cost_per_hour, hourly.dbu_cost_per_hour, hourly.total_cost_per_hour
        );
    }

    let verdict = &estimate.verdict;
    println!("\nCheaper option: {}", verdict.cheaper);
    println!(
        "  Savings: {:.4} ({:.2}%)",
        verdict.savings_absolute, verdict.savings_percent
    );
    println!("Faster option: {} ({:.2} min sooner)", verdict.faster, verdict.time_saved_min);

    Ok(())
}

fn print_breakdown(label: &str, breakdown: &CostBreakdown) {
    let per_task = breakdown
        .cost_per_task
        .map(|cost| format!("{cost:.4}"))
        .unwrap_or_else(|| "N/A".to_string());
    println!(
        "{:<14} {:>6} {:>12.2} {:>10.4} {:>10.4} {:>10.4} {:>10}",
        label,
        breakdown.wave_count,
        breakdown.active_time_min,
        breakdown.vm_cost,
        breakdown.dbu_cost,
        breakdown.total_cost,
        per_task
    );
}

fn print_sweep(points: &[SweepPoint]) {
    println!(
        "{:>8} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "Tasks", "Job", "All-Purpose", "Cheaper", "Savings", "Savings %"
    );
    println!("{}", "-".repeat(73));
    for point in points {
        let estimate = &point.estimate;
        println!(
            "{:>8} {:>12.4} {:>12.4} {:>12} {:>12.4} {:>11.2}%",
            point.task_count,
            estimate.job.total_cost,
            estimate.all_purpose.total_cost,
            estimate.verdict.cheaper.to_string(),
            estimate.verdict.savings_absolute,
            estimate.verdict.savings_percent
        );
    }
}
