use clap::{Args, Parser, Subcommand};
use ntm::{Batch, Job, JobResult, ProgramManager, SimulationOptions};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Simulate one machine on one or more inputs
    Run {
        /// The machine definition file, or `builtin:<name>`
        #[clap(short, long)]
        machine: String,

        /// The input strings to simulate
        #[clap(short, long, required = true)]
        input: Vec<String>,

        #[clap(flatten)]
        settings: Settings,
    },
    /// Run every job of a JSON manifest, or the built-in demonstration batch
    Batch {
        /// Manifest of `{"machine": ..., "input": ...}` jobs
        manifest: Option<PathBuf>,

        #[clap(flatten)]
        settings: Settings,
    },
    /// List the built-in machines
    List,
}

#[derive(Args)]
struct Settings {
    /// Number of breadth-first levels to explore before giving up
    #[clap(short = 'd', long, default_value_t = SimulationOptions::default().max_depth)]
    max_depth: usize,

    /// Transition bound (recognized but not enforced)
    #[clap(long, default_value_t = SimulationOptions::default().max_transitions)]
    max_transitions: usize,

    /// The trace log, truncated at the start of every invocation
    #[clap(short, long, default_value = "output.txt")]
    output: PathBuf,

    /// Do not echo trace lines to stdout
    #[clap(short, long)]
    quiet: bool,
}

impl Settings {
    fn options(&self) -> SimulationOptions {
        SimulationOptions {
            max_depth: self.max_depth,
            max_transitions: self.max_transitions,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            machine,
            input,
            settings,
        } => {
            let jobs = input
                .into_iter()
                .map(|input| Job::new(machine.as_str(), input))
                .collect();
            execute(Batch::new(jobs), &settings)
        }
        Command::Batch { manifest, settings } => {
            let batch = match manifest {
                Some(path) => match Batch::from_manifest(&path) {
                    Ok(batch) => batch,
                    Err(e) => {
                        eprintln!("{e}");
                        return ExitCode::FAILURE;
                    }
                },
                None => Batch::builtin(),
            };
            execute(batch, &settings)
        }
        Command::List => {
            for name in ProgramManager::list_program_names() {
                match ProgramManager::get_program_info(&name) {
                    Ok(info) => println!(
                        "{name}: {} (start {}, accept {}, reject {}, {} transitions)",
                        info.name,
                        info.start_state,
                        info.accept_state,
                        info.reject_state,
                        info.transition_count
                    ),
                    Err(e) => eprintln!("{name}: {e}"),
                }
            }
            ExitCode::SUCCESS
        }
    }
}

/// Runs the batch and prints one verdict line per job.
///
/// Exits with failure if the trace could not be written or any definition failed to load.
fn execute(batch: Batch, settings: &Settings) -> ExitCode {
    let results = match batch.run(&settings.output, settings.options(), !settings.quiet) {
        Ok(results) => results,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut failed = false;
    for (job, result) in batch.jobs().iter().zip(&results) {
        report(job, result);
        failed |= result.is_err();
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn report(job: &Job, result: &JobResult) {
    match result {
        Ok(summary) => eprintln!(
            "{} on {:?}: {} (depth {}, transitions {}, ndm {:.2})",
            job.machine,
            job.input,
            summary.verdict,
            summary.depth,
            summary.transitions,
            summary.nondeterminism
        ),
        Err(e) => eprintln!("{} on {:?}: {e}", job.machine, job.input),
    }
}
