//! Tracing subscriber setup shared by all service binaries

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_directives` is used
/// (for example `"info"` or `"rakshak_seek=debug,tower_http=info"`).
pub fn init(default_directives: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    // try_init: tests and embedded callers may have installed one already
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Default filter for a service: configured level for the service crate and
/// the HTTP tracing layer, warnings for everything else.
pub fn service_directives(crate_name: &str, level: &str) -> String {
    format!("warn,{crate_name}={level},rakshak_common={level},tower_http={level}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_directives() {
        assert_eq!(
            service_directives("rakshak_seek", "debug"),
            "warn,rakshak_seek=debug,rakshak_common=debug,tower_http=debug"
        );
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init("info");
        init("debug");
    }
}
