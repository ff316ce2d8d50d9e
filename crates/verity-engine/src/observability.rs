//! Tracing setup and per-component span macros.

use tracing_subscriber::EnvFilter;
use verity_core::config::LoggingConfig;

/// Span for a claim lifecycle operation.
#[macro_export]
macro_rules! lifecycle_span {
    ($op:expr) => {
        tracing::info_span!("verity.lifecycle", op = $op)
    };
    ($op:expr, $claim_id:expr) => {
        tracing::info_span!("verity.lifecycle", op = $op, claim_id = %$claim_id)
    };
}

/// Span for a points ledger operation.
#[macro_export]
macro_rules! points_span {
    ($op:expr, $user_id:expr) => {
        tracing::info_span!("verity.points", op = $op, user_id = %$user_id)
    };
}

/// Span for a notification watermark operation.
#[macro_export]
macro_rules! notify_span {
    ($op:expr, $user_id:expr) => {
        tracing::info_span!("verity.notify", op = $op, user_id = %$user_id)
    };
}

/// Span for trending surfacing and scoring.
#[macro_export]
macro_rules! trending_span {
    ($op:expr) => {
        tracing::info_span!("verity.trending", op = $op)
    };
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `config.level`. Returns `false` when a subscriber
/// was already installed, so repeated calls are harmless.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        let config = LoggingConfig::default();
        let _ = init_tracing(&config);
        assert!(!init_tracing(&config), "second install must be refused");
    }
}
