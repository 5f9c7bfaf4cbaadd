use clap::Parser;

use riskdeck::cli::{Cli, Command, RunArgs, apply_overrides};
use riskdeck::client::{
    ClientConfig, FeedbackSwitch, HttpTransport, Orchestrator, RunOutcome, TerminalBell,
};
use riskdeck::core::Presenter;
use riskdeck::term::TextSurface;

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Serve {
            port,
            endpoint,
            mute,
        } => {
            let config = apply_overrides(ClientConfig::from_env(), endpoint.as_deref(), mute);
            riskdeck::api::run_http_server(port, config)
                .await
                .map_err(|e| format!("Server error: {e}"))
        }
        Command::Run(args) => run_once(args).await,
    };

    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

async fn run_once(args: RunArgs) -> Result<(), String> {
    let config = apply_overrides(
        ClientConfig::from_env(),
        args.endpoint.as_deref(),
        args.mute,
    );
    let orchestrator = Orchestrator::new(
        HttpTransport::new(config.endpoint),
        FeedbackSwitch::new(TerminalBell::stderr(), config.feedback_enabled),
        args.settings(),
    );

    println!("{}", riskdeck::client::orchestrator::RUNNING_STATUS);
    match orchestrator.run(&args.controls()).await {
        RunOutcome::Completed(report) => {
            println!("Expected value: {}", report.metrics.expected);
            println!("Probability of loss: {}", report.metrics.prob_loss);
            println!("Probability of ruin: {}", report.metrics.prob_ruin);
            println!("5% VaR: {}", report.metrics.var_5);
            if let Some(label) = report.shock_label {
                println!("Shock: {}", label.as_str());
            }
            println!();

            let mut presenter = Presenter::new(TextSurface::default());
            presenter.show(&report);
            print!("{}", presenter.surface().render_text());
            println!("{}", orchestrator.snapshot().status);
            Ok(())
        }
        RunOutcome::Failed(_) | RunOutcome::Ignored => Err(orchestrator.snapshot().status),
    }
}
