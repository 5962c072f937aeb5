// Copyright (c) 2022-2023 The MobileCoin Foundation

use std::time::Duration;

/// Connection flow options
#[derive(Clone, PartialEq, Debug, clap::Args)]
pub struct FlowOptions {
    /// Interval between device scan ticks (ms)
    #[clap(long, default_value = "1000")]
    pub scan_interval_ms: u64,

    /// Timeout for device connection (s)
    #[clap(long, default_value = "30")]
    pub connect_timeout_s: u64,

    /// Timeout for fetching features with on-device unlock (s)
    #[clap(long, default_value = "120")]
    pub unlock_timeout_s: u64,

    /// User has only software wallets (reported in telemetry)
    #[clap(long)]
    pub software_wallet_only_user: bool,
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self {
            scan_interval_ms: 1000,
            connect_timeout_s: 30,
            unlock_timeout_s: 120,
            software_wallet_only_user: false,
        }
    }
}

impl FlowOptions {
    /// Helper to fetch scan interval
    pub fn scan_interval(&self) -> Duration {
        Duration::from_millis(self.scan_interval_ms)
    }

    /// Helper to fetch connect timeout
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_s)
    }

    /// Helper to fetch unlock timeout
    pub fn unlock_timeout(&self) -> Duration {
        Duration::from_secs(self.unlock_timeout_s)
    }
}

#[cfg(test)]
mod test {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct Args {
        #[clap(flatten)]
        flow: FlowOptions,
    }

    #[test]
    fn defaults_match_cli() {
        let a = Args::parse_from(["test"]);
        assert_eq!(a.flow, FlowOptions::default());
    }

    #[test]
    fn parse_overrides() {
        let a = Args::parse_from([
            "test",
            "--scan-interval-ms",
            "250",
            "--connect-timeout-s",
            "5",
            "--software-wallet-only-user",
        ]);

        assert_eq!(a.flow.scan_interval(), Duration::from_millis(250));
        assert_eq!(a.flow.connect_timeout(), Duration::from_secs(5));
        assert_eq!(a.flow.unlock_timeout(), Duration::from_secs(120));
        assert!(a.flow.software_wallet_only_user);
    }
}
