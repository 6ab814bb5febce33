// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the log subscriber. Logs go to stderr so reports on stdout stay parseable.
pub fn init_telemetry() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "stake_verify=info,stake_kernel=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
