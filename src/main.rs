use anyhow::anyhow;
use clap::{Parser as ClapParser, Subcommand};
use tracing::{error, info};

use tearcheck::{counter, runner, showcase, Directory, Guard, RunOptions};

/// Exercises a mutual-exclusion guard protecting a composite shared record
///
/// Runs writer threads against a shared register while a verifier checks
/// that every snapshot is internally consistent. With the guard enabled the
/// run must stay consistent; with `--unguarded` a torn copy is expected to
/// be detected well before the iteration budget runs out.
#[derive(ClapParser)]
#[command(version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
    /// Print debugging output (can be repeated for more detail)
    #[arg(short = 'd', long = "debug", action = clap::ArgAction::Count, global = true)]
    debug_level: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Hammer the shared register and verify snapshot consistency
    Register {
        /// Drop the guard and let composite copies interleave per field
        #[arg(long)]
        unguarded: bool,
        /// Verifier iteration budget
        #[arg(long, default_value_t = tearcheck::verifier::DEFAULT_ITERATIONS)]
        iterations: u32,
    },
    /// Tally a shared counter with and without the guard, plus a trylock probe
    Counter,
    /// Spawn workers with typed join results and report ordering and timing
    Showcase,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_level(true)
        .with_target(false)
        .with_max_level(match args.debug_level {
            0 => tracing::Level::INFO,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        })
        .init();

    match args.command {
        Command::Register {
            unguarded,
            iterations,
        } => {
            let directory = Directory::staff();
            let options = RunOptions {
                guarded: !unguarded,
                iterations,
            };
            match runner::run(&directory, &options) {
                Ok(report) => {
                    info!(
                        iterations = report.iterations,
                        "register stayed consistent for the whole run"
                    );
                    Ok(())
                }
                // Violations exit with status 1; see tests/register.rs.
                Err(err) => {
                    error!(%err, "run failed");
                    Err(anyhow!(err))
                }
            }
        }
        Command::Counter => {
            let guard = Guard::new();
            let probe = counter::probe(&guard)?;
            info!(
                refused_while_held = probe.refused_while_held,
                acquired_when_free = probe.acquired_when_free,
                "trylock probe"
            );

            let guarded = counter::guarded_tally();
            info!(
                expected = guarded.expected,
                observed = guarded.observed,
                lost = guarded.lost(),
                "guarded tally"
            );

            let unguarded = counter::unguarded_tally();
            info!(
                expected = unguarded.expected,
                observed = unguarded.observed,
                lost = unguarded.lost(),
                "unguarded tally"
            );
            if unguarded.lost() == 0 {
                info!("no increments lost this time, rerun to see the race");
            }
            Ok(())
        }
        Command::Showcase => {
            let report = showcase::run()?;
            for summary in &report.summaries {
                info!(
                    thread_id = summary.thread_id,
                    operations = summary.operations,
                    token = summary.token,
                    finished_after = ?summary.finished_after,
                    "worker summary"
                );
            }
            info!(total = report.total, "showcase total");
            Ok(())
        }
    }
}
