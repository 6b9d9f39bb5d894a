// src/main.rs — Tandem entry point

use clap::Parser;

use tandem::backend::BackendClient;
use tandem::cli::{Cli, Commands};
use tandem::core::events::EventSink;
use tandem::core::orchestrator::Orchestrator;
use tandem::core::types::RunStatus;
use tandem::infra::config::Config;
use tandem::infra::logger;

#[tokio::main]
async fn main() {
    // Initialize logging (respects RUST_LOG)
    logger::init_logging("warn");

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };

    if let Some(Commands::Doctor) = cli.command {
        return run_doctor(&config).await;
    }

    let Some(problem) = cli.problem else {
        anyhow::bail!("no problem given; usage: tandem \"<problem>\" [--rounds N]");
    };

    let solver = BackendClient::new("solver", &config.solver);
    let reviewer = BackendClient::new("reviewer", &config.reviewer);
    let mut orchestrator = Orchestrator::new(solver, reviewer, config.rounds.clone());

    let result = if cli.json || cli.quiet {
        orchestrator.run(&problem, cli.rounds).await?
    } else {
        let (sink, rx) = EventSink::channel();
        orchestrator = orchestrator.with_sink(sink);
        let printer = tokio::spawn(tandem::cli::progress::print_events(rx));
        let result = orchestrator.run(&problem, cli.rounds).await;
        // Drop the run's sender so the printer drains and exits.
        drop(orchestrator);
        let _ = printer.await;
        result?
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        match result.best_record() {
            Some(best) => {
                if cli.quiet {
                    println!("{}", best.solution);
                } else {
                    println!("\n{}", best.solution);
                }
            }
            None if cli.quiet => eprintln!("no solution produced"),
            None => {}
        }
    }

    if result.status == RunStatus::Error {
        anyhow::bail!(result
            .error
            .unwrap_or_else(|| "run finished with errors".into()));
    }
    Ok(())
}

async fn run_doctor(config: &Config) -> anyhow::Result<()> {
    let solver = BackendClient::new("solver", &config.solver);
    let reviewer = BackendClient::new("reviewer", &config.reviewer);

    let (solver_ok, reviewer_ok) = tokio::join!(
        solver.check_availability(),
        reviewer.check_availability()
    );

    println!(
        "solver    {} ({}): {}",
        config.solver.url,
        config.solver.model,
        status_word(solver_ok)
    );
    println!(
        "reviewer  {} ({}): {}",
        config.reviewer.url,
        config.reviewer.model,
        status_word(reviewer_ok)
    );

    if solver_ok && reviewer_ok {
        Ok(())
    } else {
        anyhow::bail!("one or more backends unavailable")
    }
}

fn status_word(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "unavailable"
    }
}
