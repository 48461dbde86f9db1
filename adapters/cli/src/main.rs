#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a To Arms battle from a scenario and a script.

mod output;
mod script;
mod session;

use std::{
    fs,
    io::{self, Read, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use to_arms_system_bootstrap::Scenario;
use to_arms_system_unit_agent::AgentInput;
use tracing::info;

use output::Printer;
use script::Step;
use session::Session;

/// Plays a To Arms battle on the terminal.
#[derive(Debug, Parser)]
#[command(name = "to-arms", version)]
struct Args {
    /// Scenario TOML describing the battle map and starting roster.
    scenario: PathBuf,
    /// Script of player actions, one per line; read from stdin when omitted.
    #[arg(long)]
    script: Option<PathBuf>,
    /// Print events and the final report as JSON lines.
    #[arg(long)]
    json: bool,
}

/// Entry point for the To Arms command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let scenario = Scenario::load(&args.scenario)
        .with_context(|| format!("failed to load scenario {}", args.scenario.display()))?;
    let source = read_script(args.script.as_ref())?;
    let steps = script::parse(&source).context("failed to parse script")?;

    let stdout = io::stdout();
    let mut printer = Printer::new(stdout.lock(), args.json);
    play(&scenario, &steps, &mut printer)
}

fn read_script(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display())),
        None => {
            let mut source = String::new();
            let _ = io::stdin()
                .read_to_string(&mut source)
                .context("failed to read script from stdin")?;
            Ok(source)
        }
    }
}

fn play<W: Write>(scenario: &Scenario, steps: &[Step], printer: &mut Printer<W>) -> Result<()> {
    let (mut session, events) = Session::start(scenario).context("failed to stage scenario")?;
    printer.banner(session.banner())?;
    printer.events(&events)?;

    for step in steps {
        if let Some(winner) = session.outcome() {
            info!(%winner, "battle over, ignoring the rest of the script");
            break;
        }

        match *step {
            Step::Click(cell) => {
                printer.input_result(session.input(AgentInput::new(Some(cell), false)))?;
            }
            Step::EndTurn => printer.input_result(session.input(AgentInput::new(None, true)))?,
            Step::Hover(cell) => {
                if let Some((moved, occupant)) = session.hover(cell) {
                    printer.cursor(&moved, occupant.as_ref())?;
                }
            }
            Step::Status => printer.status(session.active_unit(), &session.roster())?,
        }
    }

    printer.report(session.report())
}
