use anyhow::Result;
use clap::Parser;
use kanzlersim_core::{GameSession, HistoryKind, Party, SessionConfig};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;

mod loader;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// RNG seed for the playthrough
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Simulated years to play (capped at the twelve-year term)
    #[arg(short, long, default_value_t = 12)]
    years: u32,

    /// Decision attempts per simulated year
    #[arg(long, default_value_t = 3)]
    decisions_per_year: u32,

    /// Decision catalog JSON (built-in demo set if omitted)
    #[arg(long)]
    decisions: Option<PathBuf>,

    /// Event catalog JSON (built-in demo set if omitted)
    #[arg(long)]
    events: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = std::str::FromStr::from_str(&args.log_level).unwrap_or(log::LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();

    log::info!("starting kanzlersim...");

    let decisions = loader::load_decisions(args.decisions.as_deref())?;
    let events = loader::load_events(args.events.as_deref())?;
    let mut session = GameSession::new(
        SessionConfig {
            player_party: Party::Spd,
            seed: args.seed,
        },
        decisions.clone(),
        events,
    );
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    for _ in 0..args.years {
        let year = session.state().year();
        println!("— Jahr {year} —");

        for _ in 0..args.decisions_per_year {
            let available: Vec<String> = session
                .available_decisions()
                .iter()
                .map(|d| d.id.clone())
                .collect();
            if available.is_empty() {
                break;
            }
            let id = available[rng.gen_range(0..available.len())].clone();
            let decision = decisions.get(&id).expect("available id is in catalog");
            let option_id = decision.options[rng.gen_range(0..decision.options.len())]
                .id
                .clone();

            match session.apply_decision(&id, &[option_id.as_str()]) {
                Ok(outcome) => {
                    println!(
                        "  {} → {} ({:.1} Mrd)",
                        decision.title,
                        option_id,
                        outcome.completed.total_cost / 1.0e9
                    );
                    for event in &outcome.fired_events {
                        println!("  !! Ereignis: {}", event.reason);
                    }
                    if let Some(over) = outcome.game_over {
                        println!("  {over}");
                    }
                }
                Err(err) => log::warn!("abgelehnt: {err}"),
            }
            if session.game_over().is_some() {
                break;
            }
        }

        if session.game_over().is_some() {
            break;
        }
        session.advance_to_end_of_year();
        if session.should_show_yearly_evaluation() {
            let m = session.metrics();
            println!(
                "  Bilanz {year}: Beliebtheit {:.1}, Schulden {:.1} Mrd, Gesamtbewertung {:.1}",
                m.popularity,
                -m.debt / 1.0e9,
                session.gesamtbewertung()
            );
            session.dismiss_yearly_evaluation();
        }
        if session.should_show_legislature_evaluation() {
            println!("  == Ende der Legislaturperiode ==");
            session.dismiss_legislature_evaluation();
        }
        if session.game_over().is_some() || session.term_completed() {
            break;
        }
    }

    println!("\n=== Endstand ===");
    if let Some(over) = session.game_over() {
        println!("Vorzeitiges Ende: {over}");
    } else if session.term_completed() {
        println!("Volle Amtszeit absolviert.");
    }

    let m = session.metrics();
    println!("Beliebtheit:      {:>8.1}", m.popularity);
    println!("Arbeitslosigkeit: {:>8.1} %", m.unemployment);
    println!("Wachstum:         {:>8.1} %", m.growth);
    println!("Medianeinkommen:  {:>8.0} €", m.median_income);
    println!("Schulden:         {:>8.1} Mrd", -m.debt / 1.0e9);
    println!("CO2-Pfad:         {:>8.1} %", m.co2_reduction_path);
    println!("Gesamtbewertung:  {:>8.1}", session.gesamtbewertung());

    println!("\nSonntagsfrage:");
    for (party, share) in session.state().polls.iter() {
        println!("  {:<10} {:>5.1} %", party.label(), share);
    }

    let history = session.metrics_history();
    println!("\nVerlauf ({} Punkte):", history.len());
    for point in &history {
        let marker = match point.kind {
            HistoryKind::Initial => "start",
            HistoryKind::Decision => "entscheidung",
            HistoryKind::Event => "ereignis",
        };
        println!(
            "  [{:>5.1}] {} {:<28} Bewertung {:.1}",
            point.position, marker, point.label, point.metrics.overall_score
        );
    }

    Ok(())
}
