use std::path::Path;
use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the ride-sharing dispatch simulation workspace",
    long_about = "A unified CLI for running scenarios, benchmarks, load tests\n\
                  and CI checks in the dispatch simulation workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the generated 500 riders / 100 drivers example
    Run,
    /// Run the bundled sample scenario through the `ride-sim` CLI
    Sample {
        /// Print every executed event
        #[arg(long)]
        trace: bool,
    },
    /// Run Criterion benchmarks
    Bench,
    /// Compare benchmarks: stash changes, create baseline, restore, compare
    BenchCompare,
    /// Run CI checks (fmt, clippy, tests, examples, benchmarks)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
    /// Run load tests (ignored tests in sim_core)
    LoadTest,
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Build and run the example and the sample scenario
    Examples,
    /// Run benchmarks
    Bench,
    /// Run check + examples + bench
    All,
}

const SAMPLE_SCENARIO: &str = "crates/sim_cli/scenarios/sample.txt";

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn command(program: &str, args: &[&str]) -> ExitStatus {
    eprintln!("+ {program} {}", args.join(" "));
    match Command::new(program).args(args).status() {
        Ok(status) => status,
        Err(err) => {
            eprintln!("failed to execute {program}: {err}");
            exit(1);
        }
    }
}

fn run_cargo(args: &[&str]) {
    let status = command("cargo", args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn run_git(args: &[&str]) {
    let status = command("git", args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn run_sample(trace: bool) {
    let mut args = vec!["run", "-p", "sim_cli", "--release", "--", "run", SAMPLE_SCENARIO];
    if trace {
        args.push("--trace");
    }
    run_cargo(&args);
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);

    step("Test sim_core");
    run_cargo(&["test", "-p", "sim_core"]);

    step("Test sim_cli");
    run_cargo(&["test", "-p", "sim_cli"]);
}

fn ci_examples() {
    step("Run scenario_run (500 riders, 100 drivers)");
    run_cargo(&[
        "run",
        "-p",
        "sim_core",
        "--example",
        "scenario_run",
        "--release",
    ]);

    step("Run sample scenario");
    run_sample(false);
}

fn ci_bench() {
    step("Run benchmarks");
    run_cargo(&["bench", "--package", "sim_core", "--bench", "performance"]);
}

fn bench_compare() {
    let baseline_dir = Path::new("target/criterion");
    if baseline_dir.exists() {
        step("Removing existing benchmark data");
        if let Err(err) = std::fs::remove_dir_all(baseline_dir) {
            eprintln!("failed to remove target/criterion: {err}");
            exit(1);
        }
    }

    step("Stashing current changes");
    run_git(&[
        "stash",
        "push",
        "-m",
        "Temporary stash for benchmark comparison",
    ]);

    step("Running benchmark to create baseline");
    run_cargo(&[
        "bench",
        "--package",
        "sim_core",
        "--bench",
        "performance",
        "--",
        "--save-baseline",
        "main",
    ]);

    step("Reapplying changes");
    run_git(&["stash", "pop"]);

    step("Running benchmark comparing against baseline");
    run_cargo(&[
        "bench",
        "--package",
        "sim_core",
        "--bench",
        "performance",
        "--",
        "--baseline",
        "main",
    ]);

    eprintln!("\nDone! Check the output above to see performance comparison.");
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            run_cargo(&[
                "run",
                "-p",
                "sim_core",
                "--example",
                "scenario_run",
                "--release",
            ]);
        }
        Commands::Sample { trace } => run_sample(trace),
        Commands::Bench => ci_bench(),
        Commands::BenchCompare => bench_compare(),
        Commands::Ci { job } => {
            match job {
                CiJob::Check => ci_check(),
                CiJob::Examples => ci_examples(),
                CiJob::Bench => ci_bench(),
                CiJob::All => {
                    ci_check();
                    ci_examples();
                    ci_bench();
                }
            }
            eprintln!("\nCI job passed.");
        }
        Commands::LoadTest => {
            run_cargo(&[
                "test",
                "-p",
                "sim_core",
                "--test",
                "load_tests",
                "--",
                "--ignored",
            ]);
        }
    }
}
