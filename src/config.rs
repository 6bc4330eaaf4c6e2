use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use crate::error::ConfigError;
use crate::invoker::{CommandSpec, DEFAULT_MAX_OUTPUT};
use crate::quota::QuotaLimits;
use crate::validate::AmountBounds;

// CLI argument structure, every option can also come from the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "token-faucet")]
#[command(about = "Rate-limited token faucet in front of a ledger transfer tool")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    // Ledger server the transfer tool talks to
    #[arg(long, env = "BDB_SERVER_URL")]
    pub server_url: String,

    // Faucet wallet key files
    #[arg(long, env = "FAUCET_PRIVATE_KEY_FILE")]
    pub private_key_file: String,

    #[arg(long, env = "FAUCET_PUBLIC_KEY_FILE")]
    pub public_key_file: String,

    // Asset handed out by the faucet
    #[arg(long, env = "FAUCET_ASSET_ID")]
    pub asset_id: String,

    // Bounds for a single request
    #[arg(long, env = "FAUCET_MIN_AMOUNT", default_value_t = 1)]
    pub min_amount: u64,

    #[arg(long, env = "FAUCET_MAX_AMOUNT", default_value_t = 5)]
    pub max_amount: u64,

    // Daily quotas
    #[arg(long, env = "FAUCET_DAILY_QUOTA_PER_IP", default_value_t = 10)]
    pub daily_quota_per_ip: u32,

    #[arg(long, env = "FAUCET_DAILY_QUOTA_PER_WALLET", default_value_t = 10)]
    pub daily_quota_per_wallet: u32,

    // Rate limit max requests per window
    #[arg(long, env = "FAUCET_RATE_LIMIT", default_value_t = 100)]
    pub rate_limit: u32,

    // Rate limit window in seconds
    #[arg(long, env = "FAUCET_RATE_WINDOW", default_value_t = 60)]
    pub rate_window: u64,

    // Transfer tool and the operation it runs
    #[arg(long, env = "FAUCET_COMMAND", default_value = "velluscinum")]
    pub command: String,

    #[arg(long, env = "FAUCET_OPERATION", default_value = "transferToken")]
    pub operation: String,

    // Hard timeout for one transfer, in seconds
    #[arg(long, env = "FAUCET_TIMEOUT", default_value_t = 30)]
    pub timeout: u64,

    // Cap on captured stdout/stderr of one transfer, in bytes
    #[arg(long, env = "FAUCET_MAX_OUTPUT", default_value_t = DEFAULT_MAX_OUTPUT)]
    pub max_output: usize,

    // Directory with the static frontend
    #[arg(long, env = "FAUCET_STATIC_DIR", default_value = "public")]
    pub static_dir: PathBuf,
}

// Validated runtime settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub bounds: AmountBounds,
    pub quota_limits: QuotaLimits,
    pub rate_limit: u32,
    pub rate_window: Duration,
    pub command: CommandSpec,
    pub static_dir: PathBuf,
}

impl Args {
    pub fn into_settings(self) -> Result<Settings, ConfigError> {
        if self.min_amount > self.max_amount {
            return Err(ConfigError::InvertedBounds {
                min: self.min_amount,
                max: self.max_amount,
            });
        }
        let positive = [
            ("daily quota per IP", self.daily_quota_per_ip as u64),
            ("daily quota per wallet", self.daily_quota_per_wallet as u64),
            ("rate limit", self.rate_limit as u64),
            ("rate window", self.rate_window),
            ("timeout", self.timeout),
            ("max output", self.max_output as u64),
        ];
        if let Some((name, _)) = positive.into_iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::Zero(name));
        }

        Ok(Settings {
            port: self.port,
            bounds: AmountBounds {
                min: self.min_amount,
                max: self.max_amount,
            },
            quota_limits: QuotaLimits {
                per_ip: self.daily_quota_per_ip,
                per_wallet: self.daily_quota_per_wallet,
            },
            rate_limit: self.rate_limit,
            rate_window: Duration::from_secs(self.rate_window),
            command: CommandSpec {
                program: self.command,
                operation: self.operation,
                ledger_url: self.server_url,
                signing_key: self.private_key_file,
                public_key: self.public_key_file,
                asset_id: self.asset_id,
                timeout: Duration::from_secs(self.timeout),
                max_output: self.max_output,
            },
            static_dir: self.static_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec![
            "token-faucet",
            "--server-url",
            "http://ledger:9984",
            "--private-key-file",
            "/keys/faucet.priv",
            "--public-key-file",
            "/keys/faucet.pub",
            "--asset-id",
            "asset-1",
        ];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_match_the_documented_deployment() {
        let settings = parse(&[]).into_settings().unwrap();
        assert_eq!(settings.bounds, AmountBounds { min: 1, max: 5 });
        assert_eq!(settings.quota_limits, QuotaLimits { per_ip: 10, per_wallet: 10 });
        assert_eq!(settings.rate_limit, 100);
        assert_eq!(settings.rate_window, Duration::from_secs(60));
        assert_eq!(settings.command.program, "velluscinum");
        assert_eq!(settings.command.operation, "transferToken");
        assert_eq!(settings.command.timeout, Duration::from_secs(30));
        assert_eq!(settings.command.ledger_url, "http://ledger:9984");
        assert_eq!(settings.command.max_output, 1024 * 1024);
    }

    #[test]
    fn inverted_bounds_are_refused() {
        let err = parse(&["--min-amount", "6", "--max-amount", "5"]).into_settings().unwrap_err();
        assert_eq!(err, ConfigError::InvertedBounds { min: 6, max: 5 });
    }

    #[test]
    fn zero_limits_are_refused() {
        let err = parse(&["--daily-quota-per-wallet", "0"]).into_settings().unwrap_err();
        assert_eq!(err, ConfigError::Zero("daily quota per wallet"));
    }
}
