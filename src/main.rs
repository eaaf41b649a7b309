use anyhow::Result;
use benchmon::cli::{Cli, Command};
use benchmon::config::BenchmonConfig;
use benchmon::merge::merge_environments;
use benchmon::report::BenchmarkReport;
use benchmon::sample_store::MetricSet;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; warnings always, everything with --debug
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Cli) -> Result<BenchmonConfig> {
    match &args.config {
        Some(path) => BenchmonConfig::from_toml(path),
        None => Ok(BenchmonConfig::default()),
    }
}

/// Command line wins over the config file, which wins over `fallback`
fn resolve_metric_set(
    cli: Option<MetricSet>,
    config: &BenchmonConfig,
    fallback: MetricSet,
) -> MetricSet {
    cli.or(config.report.metric_set).unwrap_or(fallback)
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let config = load_config(&args)?;

    match args.command {
        Command::Report {
            result_dir,
            format,
            metric_set,
        } => {
            let metric_set =
                resolve_metric_set(metric_set, &config, format.default_metric_set());
            let report =
                BenchmarkReport::collect(&result_dir, metric_set.schema(), &config.correlation)?;
            let path = report.write(format)?;
            println!("Report written to {}", path.display());
        }
        Command::Merge {
            env_dirs,
            output,
            metric_set,
        } => {
            let metric_set = resolve_metric_set(metric_set, &config, MetricSet::Util);
            let merged =
                merge_environments(&env_dirs, &metric_set.schema(), &config.correlation)?;
            merged.write(&output)?;
            println!(
                "Merged report for {} environments written to {}",
                merged.environments.len(),
                output.display()
            );
        }
    }

    Ok(())
}
