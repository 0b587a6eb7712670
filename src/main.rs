use clap::Parser;
use rate_hedge::cli::{Cli, Commands};
use rate_hedge::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using default configuration");
            toml::from_str(include_str!("../config.toml.example"))?
        }
    };

    // Initialize telemetry
    let _telemetry = rate_hedge::telemetry::init_telemetry(&config.telemetry)?;

    let snapshot = cli.snapshot.as_deref();
    match cli.command {
        Commands::Analyze(args) => {
            args.execute(&config, snapshot).await?;
        }
        Commands::Quote(args) => {
            args.execute(&config, snapshot).await?;
        }
        Commands::Log(args) => {
            args.execute(&config)?;
        }
        Commands::History(args) => {
            args.execute(&config)?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!(
                "  Provider: {:?} (timeout {}s)",
                config.provider.kind, config.provider.timeout_secs
            );
            println!(
                "  Reference: {}, default delta {}, min DTE {}",
                config.hedge.reference_ticker,
                config.hedge.default_delta,
                config.hedge.min_days_to_expiration
            );
            for (ticker, multiple) in &config.hedge.multiples {
                println!(
                    "  {}: multiple {}, equivalence {}",
                    ticker,
                    multiple,
                    config.hedge.equivalence_for(ticker)
                );
            }
            println!(
                "  Rate logs: {}, {}",
                config.rate_log.swap_spread_path().display(),
                config.rate_log.policy_spread_path().display()
            );
        }
    }

    Ok(())
}
