use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins; otherwise only this crate logs, at debug when verbose.
fn board_filter(verbose: bool) -> EnvFilter {
    let fallback = if verbose {
        "board_reorder=debug,info"
    } else {
        "board_reorder=info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Human-readable output for interactive runs.
pub fn init_cli_logger(verbose: bool) {
    let layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .without_time()
        .compact();

    tracing_subscriber::registry()
        .with(board_filter(verbose))
        .with(layer)
        .init();
}

/// One JSON object per line, carrying the drop span fields.
pub fn init_json_logger(verbose: bool) {
    let layer = tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(false);

    tracing_subscriber::registry()
        .with(board_filter(verbose))
        .with(layer)
        .init();
}
