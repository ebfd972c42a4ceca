use clap::Parser;
use order_tally::core::report::render_text;
use order_tally::utils::logger;
use order_tally::{
    CliConfig, FanOutAggregator, HttpOrderLookup, LineSink, LineTarget, OutputFormat, RunReport,
};
use std::time::Instant;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting order-tally");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let session = match config.resolve_session() {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("❌ Could not resolve session: {}", e);
            eprintln!("❌ {}", e);
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    let lookup = HttpOrderLookup::new(session.endpoint.clone())?;
    tracing::info!("🌐 Tracking endpoint: {}", lookup.endpoint());

    // keep stdout clean for the JSON document
    let target = match config.format {
        OutputFormat::Text => LineTarget::Stdout,
        OutputFormat::Json => LineTarget::Stderr,
    };

    let aggregator = FanOutAggregator::new(lookup, LineSink::new(target))
        .with_max_in_flight(session.max_concurrency);

    let started = Instant::now();
    let tally = aggregator.run(session.requests()).await;
    tracing::info!("⏱️ Lookups finished in {:?}", started.elapsed());

    match config.format {
        OutputFormat::Text => println!("\n{}", render_text(&tally)),
        OutputFormat::Json => {
            let report = RunReport::new(session.store, session.locale, &tally);
            println!("{}", report.to_json()?);
        }
    }

    Ok(())
}
