//! Tracing setup for the `load-actions` binary.
//!
//! Logs go to stderr so stdout stays free for the catalog document.

use tracing::{Level, Subscriber};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Crates whose events follow the requested level by default.
const CATALOG_TARGETS: [&str; 3] = ["action_catalog_core", "action_catalog_github", "load_actions"];

/// Install the global subscriber; only the first call in a process wins.
///
/// `RUST_LOG` overrides the default filter, which logs the catalog crates at
/// `level` and HTTP internals at `warn`.
pub fn init_tracing(json: bool, level: Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    tracing_subscriber::registry()
        .with(stderr_layer(json))
        .with(filter)
        .try_init()
        .ok();
}

fn default_directives(level: Level) -> String {
    let level = level.as_str().to_ascii_lowercase();
    let mut directives = vec!["warn".to_string()];
    directives.extend(CATALOG_TARGETS.iter().map(|target| format!("{target}={level}")));
    directives.join(",")
}

fn stderr_layer<S>(json: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
    if json {
        layer.json().boxed()
    } else {
        layer.boxed()
    }
}
