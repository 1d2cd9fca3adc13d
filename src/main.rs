use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::debug;
use sec4dev::{ClientConfig, Sec4DevClient};
use serde::Serialize;
use std::time::Duration;

/// sec4dev - Security Checks API client
///
/// Checks email addresses for disposable domains and classifies IP addresses.
///
/// Examples:
///   sec4dev email user@tempmail.com
///   sec4dev ip 203.0.113.42
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API key, starting with sec4_ (also via SEC4DEV_API_KEY)
    #[arg(
        long = "api-key",
        env = "SEC4DEV_API_KEY",
        hide_env_values = true,
        value_name = "KEY",
        global = true
    )]
    pub api_key: Option<String>,

    /// API base URL (defaults to https://api.sec4.dev/api/v1)
    #[arg(long = "base-url", value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long = "timeout-ms", value_name = "MS", default_value_t = 30_000, global = true)]
    pub timeout_ms: u64,

    /// Retries after the first attempt
    #[arg(long, value_name = "N", default_value_t = 3, global = true)]
    pub retries: u32,

    /// Base delay for exponential backoff, in milliseconds
    #[arg(long = "retry-delay-ms", value_name = "MS", default_value_t = 1000, global = true)]
    pub retry_delay_ms: u64,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Check whether an email address uses a disposable domain
    Email(EmailArgs),

    /// Classify an IP address
    Ip(IpArgs),
}

#[derive(clap::Args, Debug)]
pub struct EmailArgs {
    /// The email address to check
    #[arg(value_name = "ADDRESS")]
    pub email: String,
}

#[derive(clap::Args, Debug)]
pub struct IpArgs {
    /// The IPv4 or IPv6 address to classify
    #[arg(value_name = "ADDRESS")]
    pub ip: String,
}

impl Cli {
    fn client_config(&self) -> Result<ClientConfig> {
        let api_key = self
            .api_key
            .clone()
            .ok_or_else(|| anyhow!("API key is required (use --api-key or SEC4DEV_API_KEY)"))?;

        let mut config = ClientConfig::new(api_key)
            .with_timeout(Duration::from_millis(self.timeout_ms))
            .with_retries(self.retries)
            .with_retry_delay(Duration::from_millis(self.retry_delay_ms))
            .with_rate_limit_observer(|info| {
                debug!(
                    "Rate limit: {}/{} remaining, resets in {}s",
                    info.remaining, info.limit, info.reset_seconds
                )
            });
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url.clone());
        }
        Ok(config)
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let output = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    println!("{}", output);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let client = Sec4DevClient::new(cli.client_config()?).context("Failed to create client")?;

    match &cli.command {
        Commands::Email(args) => {
            let result = client
                .email()
                .check(&args.email)
                .await
                .with_context(|| format!("Failed to check email {}", args.email))?;
            print_json(&result)?;
        }
        Commands::Ip(args) => {
            let result = client
                .ip()
                .check(&args.ip)
                .await
                .with_context(|| format!("Failed to check IP {}", args.ip))?;
            print_json(&result)?;
        }
    }

    debug!("Last rate limit snapshot: {:?}", client.rate_limit());
    Ok(())
}
