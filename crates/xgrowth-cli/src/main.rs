mod fetch;
mod refresh;
mod report;

use chrono::TimeDelta;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use xgrowth_core::StatField;

#[derive(Debug, Parser)]
#[command(name = "xgrowth")]
#[command(about = "Track a profile's public counters and report their growth")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the profile's counters and append them to its series
    Fetch {
        /// Account name, with or without a leading @
        account: String,
        /// Keep fetching every SECONDS (bare flag: configured refresh interval; 0: once)
        #[arg(short, long, value_name = "SECONDS", num_args = 0..=1)]
        interval: Option<Option<u64>>,
    },
    /// Show growth over the configured horizons
    Growth {
        account: String,
        /// Horizon such as 1h, 6h, 24h or 7d; repeatable (defaults to XGROWTH_HORIZONS)
        #[arg(long = "horizon", value_name = "DURATION", value_parser = xgrowth_core::parse_horizon)]
        horizons: Vec<TimeDelta>,
        /// Include post statistics
        #[arg(long)]
        posts: bool,
        /// Append a daily follower gain chart
        #[arg(long)]
        plot: bool,
        /// Redraw every SECONDS (bare flag: configured refresh interval)
        #[arg(long, value_name = "SECONDS", num_args = 0..=1)]
        refresh: Option<Option<u64>>,
        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Show per-day gains for the trailing days
    Gains {
        account: String,
        #[arg(long, value_enum, default_value_t = Counter::Followers)]
        field: Counter,
        /// Number of trailing days (defaults to XGROWTH_TRAILING_DAYS)
        #[arg(long)]
        days: Option<u32>,
        /// Redraw every SECONDS (bare flag: configured refresh interval)
        #[arg(long, value_name = "SECONDS", num_args = 0..=1)]
        refresh: Option<Option<u64>>,
        /// Print JSON instead of a chart
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Counter {
    Followers,
    Following,
    Posts,
}

impl From<Counter> for StatField {
    fn from(counter: Counter) -> Self {
        match counter {
            Counter::Followers => StatField::Followers,
            Counter::Following => StatField::Following,
            Counter::Posts => StatField::Posts,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = xgrowth_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    tracing::debug!(env = %config.env, data_dir = %config.data_dir.display(), "config loaded");

    match cli.command {
        Commands::Fetch { account, interval } => {
            let interval = refresh::resolve_interval(interval, &config);
            fetch::run_fetch(&config, &account, interval).await
        }
        Commands::Growth {
            account,
            horizons,
            posts,
            plot,
            refresh,
            json,
        } => {
            let horizons = if horizons.is_empty() {
                config.horizons.clone()
            } else {
                horizons
            };
            let options = report::GrowthOptions {
                horizons,
                include_posts: posts,
                plot,
                json,
            };
            let refresh = refresh::resolve_interval(refresh, &config);
            report::run_growth(&config, &account, &options, refresh).await
        }
        Commands::Gains {
            account,
            field,
            days,
            refresh,
            json,
        } => {
            let options = report::GainsOptions {
                field: field.into(),
                days: days.unwrap_or(config.trailing_days),
                json,
            };
            let refresh = refresh::resolve_interval(refresh, &config);
            report::run_gains(&config, &account, &options, refresh).await
        }
    }
}
