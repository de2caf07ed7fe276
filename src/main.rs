use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};

use sitehealth::config::{Config, OutputFormat};
use sitehealth::context::EnvContextProvider;
use sitehealth::evaluator::{Evaluator, EvaluatorConfig};
use sitehealth::info::InfoRegistry;
use sitehealth::observability::ReportMetrics;
use sitehealth::registry::Registry;
use sitehealth::report::render;
use sitehealth::runner::Runner;
use sitehealth::server::{run_internal_server, InternalState};
use sitehealth::{checks, info as panels, logging};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Exit status for a run that could not produce a report.
const EXIT_RUN_ERROR: u8 = 2;

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::from(EXIT_RUN_ERROR);
        }
    };

    if let Err(e) = logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    info!("Starting sitehealth {}", sitehealth::VERSION);
    config.log_summary();

    // Probes are I/O bound and checks run on the blocking pool
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "failed to build runtime");
            return ExitCode::from(EXIT_RUN_ERROR);
        }
    };

    match runtime.block_on(async_main(config)) {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "sitehealth failed");
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_RUN_ERROR)
        }
    }
}

async fn async_main(config: Config) -> Result<ExitCode, BoxError> {
    let mut registry = Registry::new();
    checks::register_defaults(&mut registry, &config.probe.default_locale)?;

    let mut info_registry = InfoRegistry::new();
    panels::register_defaults(&mut info_registry, &config.logging.service_name, &registry);

    let provider = EnvContextProvider::new(config.probe.clone())?;
    let metrics = Arc::new(ReportMetrics::new()?);
    let evaluator = Evaluator::new().with_config(EvaluatorConfig {
        parallelism: config.report.parallelism,
    });

    let runner = Runner::new(Arc::new(registry), Arc::new(provider))
        .with_evaluator(evaluator)
        .with_selector(config.report.selector.clone())
        .with_deadline(config.report.run_timeout)
        .with_metrics(metrics);

    if let Some(internal_addr) = config.server.internal_addr {
        let state = Arc::new(InternalState::new(
            runner,
            info_registry,
            config.report.fail_on,
        ));
        info!("Internal server listening on http://{}", internal_addr);

        tokio::select! {
            result = run_internal_server(internal_addr, state) => result?,
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down...");
            }
        }
        return Ok(ExitCode::SUCCESS);
    }

    let report = runner.run_once().await?;
    let output = match config.report.format {
        OutputFormat::Text => render::text(&report),
        OutputFormat::Json => render::json(&report)?,
    };
    println!("{}", output);

    let failed = config
        .report
        .fail_on
        .is_some_and(|threshold| report.fails(threshold));
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
