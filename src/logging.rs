use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install the stderr tracing subscriber.
///
/// `--verbose` forces `gcvm=debug`. Otherwise `RUST_LOG` applies, defaulting
/// to warnings only so log lines don't interleave with the prompts.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("gcvm=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gcvm=warn"))
    };

    let terminal_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);

    tracing_subscriber::registry().with(terminal_layer).init();
}
