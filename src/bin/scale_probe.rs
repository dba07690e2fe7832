use std::env;
use std::time::Instant;

use obst_dp::{
    materialize_tree, search_tree, Distribution, KeyRange, ObstEngineBuilder, ObstSolution,
    ScanWindow,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use sysinfo::{get_current_pid, ProcessRefreshKind, System};

fn main() {
    let options = match Options::parse(env::args().skip(1)) {
        Ok(opts) => opts,
        Err(err) => {
            eprintln!("scale_probe: {err}");
            Options::print_help();
            std::process::exit(2);
        }
    };

    eprintln!("\n{}", "=".repeat(80));
    eprintln!("OBST Scaling Probe");
    eprintln!("{}", "=".repeat(80));
    eprintln!("  • wall_s: wall-clock time of the table fill in seconds");
    eprintln!("  • rss_delta_kib: resident memory delta in KiB");
    eprintln!(
        "  • status: 'passed' = cross-checks hold, 'not_checked' = larger than {}",
        options.verify_limit
    );
    eprintln!();

    let mut sys = System::new();
    let mut measurements = Vec::new();

    eprintln!("[1/2] Full root scan (O(n³))...");
    measurements.extend(run_window(
        "obst_full",
        ScanWindow::Full,
        &[32, 64, 128, 256, 512, 1024],
        &options,
        &mut sys,
    ));
    eprintln!();

    eprintln!("[2/2] Knuth window (O(n²))...");
    measurements.extend(run_window(
        "obst_knuth",
        ScanWindow::Knuth,
        &[32, 64, 128, 256, 512, 1024, 2048, 4096],
        &options,
        &mut sys,
    ));
    eprintln!();

    print_summary(&measurements);

    if let Err(err) = options.format.write(&measurements) {
        eprintln!("scale_probe output error: {err}");
        std::process::exit(1);
    }
}

struct Options {
    format: OutputFormat,
    verify_limit: usize,
    seed: u64,
}

impl Options {
    fn parse<I, T>(mut args: I) -> Result<Self, String>
    where
        I: Iterator<Item = T>,
        T: Into<String>,
    {
        let mut format = OutputFormat::Csv;
        let mut verify_limit = 512usize;
        let mut seed = 42u64;

        while let Some(arg) = args.next() {
            let arg = arg.into();
            let mut value_of = |flag: &str| -> Result<String, String> {
                match arg.strip_prefix(&format!("{flag}=")) {
                    Some(v) => Ok(v.to_string()),
                    None => args
                        .next()
                        .map(Into::into)
                        .ok_or_else(|| format!("missing value after {flag}")),
                }
            };
            if arg == "--help" || arg == "-h" {
                Options::print_help();
                std::process::exit(0);
            } else if arg.starts_with("--format") {
                format = OutputFormat::from_str(&value_of("--format")?)?;
            } else if arg.starts_with("--verify-limit") {
                verify_limit = value_of("--verify-limit")?
                    .parse::<usize>()
                    .map_err(|_| "verify limit must be a positive integer".to_string())?;
            } else if arg.starts_with("--seed") {
                seed = value_of("--seed")?
                    .parse::<u64>()
                    .map_err(|_| "seed must be an unsigned integer".to_string())?;
            } else {
                return Err(format!("unrecognized argument '{arg}'"));
            }
        }

        Ok(Self {
            format,
            verify_limit,
            seed,
        })
    }

    fn print_help() {
        println!(
            "\
Usage: cargo run --features probe --bin scale_probe [-- <options>]

Options:
  --format <csv|table|json>     Output format (default: csv)
  --verify-limit <N>            Largest key count to cross-check against the full scan (default: 512)
  --seed <N>                    Seed for the random distributions (default: 42)
  -h, --help                    Print this help message
"
        );
    }
}

#[derive(Copy, Clone)]
enum OutputFormat {
    Csv,
    Table,
    Json,
}

impl OutputFormat {
    fn from_str(value: &str) -> Result<Self, String> {
        match value {
            "csv" => Ok(Self::Csv),
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown format '{other}'")),
        }
    }

    fn write(self, measurements: &[Measurement]) -> Result<(), String> {
        match self {
            OutputFormat::Csv => write_csv(measurements),
            OutputFormat::Table => write_table(measurements),
            OutputFormat::Json => write_json(measurements),
        }
    }
}

struct Measurement {
    scenario: &'static str,
    keys: usize,
    wall_s: f64,
    rss_delta_kib: u64,
    optimal_cost: f64,
    status: VerificationStatus,
    detail: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum VerificationStatus {
    NotChecked,
    Passed,
    Failed,
}

impl VerificationStatus {
    fn label(&self) -> &'static str {
        match self {
            VerificationStatus::NotChecked => "not_checked",
            VerificationStatus::Passed => "passed",
            VerificationStatus::Failed => "failed",
        }
    }
}

fn random_distribution(rng: &mut StdRng, n: usize) -> Distribution {
    let keys = (0..n).map(|i| format!("word{i:06}")).collect();
    // Zipf-like key mass plus light gap mass, roughly what word corpora look like
    let p: Vec<f64> = (0..n)
        .map(|_| 1.0 / rng.gen_range(1.0f64..n as f64 + 1.0))
        .collect();
    let q: Vec<f64> = (0..=n).map(|_| rng.gen_range(0.0..0.05)).collect();
    let total: f64 = p.iter().chain(q.iter()).sum();
    let p = p.iter().map(|v| v / total).collect();
    let q = q.iter().map(|v| v / total).collect();
    Distribution::new(keys, p, q).expect("generated distribution is well formed")
}

fn run_window(
    scenario: &'static str,
    window: ScanWindow,
    sizes: &[usize],
    options: &Options,
    sys: &mut System,
) -> Vec<Measurement> {
    let total = sizes.len();
    sizes
        .iter()
        .enumerate()
        .map(|(idx, &n)| {
            eprint!("      [{}/{}] n={}... ", idx + 1, total, n);
            let mut rng = StdRng::seed_from_u64(options.seed ^ n as u64);
            let dist = random_distribution(&mut rng, n);

            let before = rss_kib(sys);
            let start = Instant::now();
            let solution = ObstEngineBuilder::new(&dist).with_window(window).build().run();
            let wall_s = start.elapsed().as_secs_f64();
            let after = rss_kib(sys);

            let (status, detail) = if n <= options.verify_limit {
                verify(&dist, &solution)
            } else {
                (VerificationStatus::NotChecked, None)
            };
            eprintln!(
                "cost={:.6}, time={:.3}s, status={}",
                solution.optimal_cost(),
                wall_s,
                status.label()
            );
            Measurement {
                scenario,
                keys: n,
                wall_s,
                rss_delta_kib: after.saturating_sub(before),
                optimal_cost: solution.optimal_cost(),
                status,
                detail,
            }
        })
        .collect()
}

/// Cross-check a solution against the full scan, its materialized tree and
/// key lookups.
fn verify(dist: &Distribution, solution: &ObstSolution) -> (VerificationStatus, Option<String>) {
    let reference = ObstEngineBuilder::new(dist).build().run();
    let tolerance = 1e-9 * reference.optimal_cost().max(1.0);
    if (reference.optimal_cost() - solution.optimal_cost()).abs() > tolerance {
        return (
            VerificationStatus::Failed,
            Some(format!(
                "full scan {}, got {}",
                reference.optimal_cost(),
                solution.optimal_cost()
            )),
        );
    }

    let tree = match materialize_tree(solution.root(), dist, KeyRange::full(dist.len())) {
        Ok(Some(tree)) => tree,
        Ok(None) => return (VerificationStatus::Failed, Some("empty tree".to_string())),
        Err(err) => return (VerificationStatus::Failed, Some(err.to_string())),
    };
    match tree.expected_cost(dist.q()) {
        Ok(cost) if (cost - solution.optimal_cost()).abs() <= tolerance => {}
        Ok(cost) => {
            return (
                VerificationStatus::Failed,
                Some(format!("tree cost {cost} != table cost {}", solution.optimal_cost())),
            )
        }
        Err(err) => return (VerificationStatus::Failed, Some(err.to_string())),
    }

    for key in dist.keys() {
        match search_tree(dist.keys(), solution.root(), key) {
            Ok(outcome) if outcome.found => {}
            Ok(_) => return (VerificationStatus::Failed, Some(format!("lost key {key}"))),
            Err(err) => return (VerificationStatus::Failed, Some(err.to_string())),
        }
    }
    (VerificationStatus::Passed, None)
}

fn print_summary(measurements: &[Measurement]) {
    let failed: Vec<&Measurement> = measurements
        .iter()
        .filter(|m| m.status == VerificationStatus::Failed)
        .collect();
    let passed = measurements
        .iter()
        .filter(|m| m.status == VerificationStatus::Passed)
        .count();

    eprintln!("{}", "=".repeat(80));
    eprintln!(
        "Verified: {} passed, {} failed, {} not checked",
        passed,
        failed.len(),
        measurements.len() - passed - failed.len()
    );
    for m in &failed {
        eprintln!(
            "  ✗ {} (n={}): {}",
            m.scenario,
            m.keys,
            m.detail.as_deref().unwrap_or("")
        );
    }
    eprintln!("{}", "=".repeat(80));
    eprintln!();
}

fn write_csv(measurements: &[Measurement]) -> Result<(), String> {
    println!("scenario,keys,wall_s,rss_delta_kib,optimal_cost,verification_status,verification_detail");
    for m in measurements {
        let detail = m
            .detail
            .as_ref()
            .map(|s| s.replace('"', "'"))
            .unwrap_or_default();
        println!(
            "{},{},{:.3},{},{:.6},{},\"{}\"",
            m.scenario,
            m.keys,
            m.wall_s,
            m.rss_delta_kib,
            m.optimal_cost,
            m.status.label(),
            detail
        );
    }
    Ok(())
}

fn write_table(measurements: &[Measurement]) -> Result<(), String> {
    let col1 = measurements
        .iter()
        .map(|m| m.scenario.len())
        .fold("scenario".len(), usize::max);

    println!(
        "{:<col1$}  {:>6}  {:>10}  {:>14}  {:>12}  {:>12}  detail",
        "scenario", "keys", "wall_s", "rss_delta_kib", "cost", "status",
    );
    for m in measurements {
        println!(
            "{:<col1$}  {:>6}  {:>10.3}  {:>14}  {:>12.6}  {:>12}  {}",
            m.scenario,
            m.keys,
            m.wall_s,
            m.rss_delta_kib,
            m.optimal_cost,
            m.status.label(),
            m.detail.as_deref().unwrap_or(""),
        );
    }
    Ok(())
}

fn write_json(measurements: &[Measurement]) -> Result<(), String> {
    println!("[");
    for (idx, m) in measurements.iter().enumerate() {
        let detail = m.detail.as_ref().map(|s| s.replace('"', "'"));
        println!(
            "  {{\"scenario\":\"{}\",\"keys\":{},\"wall_s\":{:.3},\"rss_delta_kib\":{},\"optimal_cost\":{:.6},\"verification\":{{\"status\":\"{}\",\"detail\":{}}}}}{}",
            m.scenario,
            m.keys,
            m.wall_s,
            m.rss_delta_kib,
            m.optimal_cost,
            m.status.label(),
            match detail {
                Some(ref d) => format!("\"{d}\""),
                None => "null".to_string(),
            },
            if idx + 1 == measurements.len() { "" } else { "," }
        );
    }
    println!("]");
    Ok(())
}

fn rss_kib(sys: &mut System) -> u64 {
    sys.refresh_processes_specifics(ProcessRefreshKind::new());
    match get_current_pid() {
        Ok(pid) => sys.process(pid).map_or(0, |p| p.memory() / 1024),
        Err(_) => 0,
    }
}
