// ============================================================================
// fraction-drift
// Runs the five calculations and stores the results in the configured sink
// ============================================================================

use anyhow::Context;
use fraction_drift::prelude::*;
use std::io::Write;

fn main() -> anyhow::Result<()> {
    #[cfg(feature = "logging")]
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let sink_config = SinkConfig::from_env().context("invalid database configuration")?;
    let run_config = RunConfig::from_env().context("invalid run configuration")?;

    let mut sink = connect_sink(&sink_config).context("result sink setup failed")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let engine = CalculationEngine::standard(run_config.layout);
    engine
        .run(sink.as_mut(), &mut out)
        .context("calculation run failed")?;

    if run_config.report_all {
        writeln!(out)?;
        report_all(sink.as_mut(), &mut out).context("listing stored results failed")?;
    }

    out.flush()?;
    Ok(())
}
