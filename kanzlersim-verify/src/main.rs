use anyhow::{bail, Result};
use clap::Parser;
use kanzlersim_verify::report::print_report;
use kanzlersim_verify::verify::{run_playthrough, verify_session};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// First RNG seed; each run increments from here
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of seeded playthroughs to verify
    #[arg(short, long, default_value_t = 5)]
    runs: u32,

    /// Simulated years per playthrough
    #[arg(short, long, default_value_t = 12)]
    years: u32,

    /// Decision attempts per simulated year
    #[arg(long, default_value_t = 3)]
    decisions_per_year: u32,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = std::str::FromStr::from_str(&args.log_level).unwrap_or(log::LevelFilter::Warn);
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();

    let mut total_failures = 0usize;
    let mut stdout = std::io::stdout();

    for run in 0..args.runs {
        let seed = args.seed + run as u64;
        log::info!("verifying playthrough with seed {seed}");

        let session = run_playthrough(seed, args.years, args.decisions_per_year);
        let summary = verify_session(&session);

        println!(
            "seed {seed}: {} decisions, {} events, {} history points",
            session.state().decisions.len(),
            session.state().events.len(),
            session.metrics_history().len()
        );
        print_report(&summary, &mut stdout)?;
        total_failures += summary.failed;
    }

    if total_failures > 0 {
        bail!("{total_failures} replay divergence(s) detected");
    }
    println!("All {} runs verified clean.", args.runs);
    Ok(())
}
