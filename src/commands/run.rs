use crate::core::{ConfigSource, Controller};
use crate::platform::{open_sink, SinkKind, StatusSink};
use crate::providers::builtin_registry;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

/// How long process exit waits for provider calls still on the blocking pool
const RUNTIME_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

pub fn execute(matches: &clap::ArgMatches) -> Result<()> {
    let source = ConfigSource::from_arg(matches.get_one::<String>("config").map(String::as_str));
    let kind = match matches.get_one::<String>("sink") {
        Some(kind) => kind.parse::<SinkKind>()?,
        None => SinkKind::X11,
    };

    let sink: Arc<dyn StatusSink> =
        Arc::from(open_sink(kind).context("Cannot open the status display")?);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("sb-worker")
        .build()
        .context("Failed to start the async runtime")?;

    log::info!("sb {} starting ({:?} sink)", env!("CARGO_PKG_VERSION"), kind);

    let result = runtime.block_on(serve(source, sink));

    runtime.shutdown_timeout(RUNTIME_SHUTDOWN_TIMEOUT);
    result.context("Status bar stopped with an error")
}

async fn serve(source: ConfigSource, sink: Arc<dyn StatusSink>) -> crate::Result<()> {
    let registry = builtin_registry();
    let blocks = registry.len();
    let controller = Controller::new(registry, source, sink);

    #[cfg(unix)]
    let _listeners = crate::platform::forward_signals(&controller.handle(), blocks)?;
    #[cfg(not(unix))]
    let _ = blocks;

    controller.run().await
}
