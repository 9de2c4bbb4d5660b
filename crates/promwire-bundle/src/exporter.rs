//! Lifecycle-bound HTTP exporter for the aggregated registry.

use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, Opts, Registry, TextEncoder};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use promwire_core::error::{PromwireError, Result};

use crate::config::ExporterConfig;

/// Fixed deadline for graceful shutdown. Bounds the host's teardown so it
/// cannot hang indefinitely on a slow exporter.
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

const TEXT_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Scrape-side instrumentation, registered into the registry it observes so
/// scrapes count themselves.
#[derive(Clone, Debug)]
struct ScrapeMetrics {
    requests: IntCounter,
    duration: Histogram,
}

impl ScrapeMetrics {
    fn register(registry: &Registry) -> Result<Self> {
        let requests = IntCounter::with_opts(Opts::new(
            "promwire_scrape_requests_total",
            "Total number of scrapes served by the exporter.",
        ))?;
        let duration = Histogram::with_opts(HistogramOpts::new(
            "promwire_scrape_duration_seconds",
            "Time spent gathering and encoding a scrape.",
        ))?;
        registry.register(Box::new(requests.clone()))?;
        registry.register(Box::new(duration.clone()))?;
        Ok(Self { requests, duration })
    }
}

#[derive(Clone, Debug)]
struct ScrapeState {
    registry: Registry,
    metrics: ScrapeMetrics,
}

#[derive(Debug)]
enum ServerState {
    Idle,
    Listening {
        local_addr: SocketAddr,
        shutdown: oneshot::Sender<()>,
        serve: JoinHandle<()>,
    },
    Stopped,
}

/// HTTP exporter with an explicit `Idle -> Listening -> Stopped` state
/// machine driven by the host's lifecycle phases.
#[derive(Debug)]
pub struct Exporter {
    config: ExporterConfig,
    registry: Registry,
    metrics: ScrapeMetrics,
    state: ServerState,
}

impl Exporter {
    /// Prepare an exporter for the given registry. Instruments the registry
    /// with scrape metrics, so building two exporters over the same registry
    /// fails with a registration error.
    pub fn new(config: ExporterConfig, registry: Registry) -> Result<Self> {
        config.validate()?;
        let metrics = ScrapeMetrics::register(&registry)?;
        Ok(Self {
            config,
            registry,
            metrics,
            state: ServerState::Idle,
        })
    }

    /// Bound address while listening. `None` before `start` / after `stop`.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        match &self.state {
            ServerState::Listening { local_addr, .. } => Some(*local_addr),
            _ => None,
        }
    }

    /// Bind the listener and begin serving scrapes on a background task.
    ///
    /// Returns as soon as the bind succeeds; the host's startup is never
    /// blocked on request serving. Bind failures are returned synchronously.
    /// A serve failure after a successful bind is logged at error severity
    /// and does not take the host down: metrics serving is auxiliary to the
    /// host's primary function.
    pub async fn start(&mut self) -> Result<()> {
        if !matches!(self.state, ServerState::Idle) {
            return Err(PromwireError::AlreadyStarted);
        }

        let app = Router::new()
            .route(&self.config.path, get(scrape))
            .with_state(ScrapeState {
                registry: self.registry.clone(),
                metrics: self.metrics.clone(),
            });

        let addr = self.config.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| PromwireError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| PromwireError::Bind { addr, source })?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let serve = tokio::spawn(async move {
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(err) = served {
                tracing::error!(%err, "exporter failed while serving");
            }
        });

        tracing::info!(%local_addr, path = %self.config.path, "exporter listening");
        self.state = ServerState::Listening {
            local_addr,
            shutdown: shutdown_tx,
            serve,
        };
        Ok(())
    }

    /// Gracefully shut the listener down.
    ///
    /// In-flight requests get up to [`SHUTDOWN_TIMEOUT`] to complete; after
    /// the deadline the serve task is aborted, closing remaining connections.
    /// Stopping an exporter that is not listening is a no-op.
    pub async fn stop(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.state, ServerState::Stopped) {
            ServerState::Idle | ServerState::Stopped => {
                tracing::debug!("exporter stop requested while not listening");
                Ok(())
            }
            ServerState::Listening {
                local_addr,
                shutdown,
                serve,
            } => {
                tracing::info!(%local_addr, timeout = ?SHUTDOWN_TIMEOUT, "stopping exporter");

                // Listener may have already failed and dropped the receiver.
                let _ = shutdown.send(());

                let abort = serve.abort_handle();
                match tokio::time::timeout(SHUTDOWN_TIMEOUT, serve).await {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(err)) => Err(PromwireError::Internal(format!(
                        "serve task failed: {err}"
                    ))),
                    Err(_) => {
                        abort.abort();
                        Err(PromwireError::ShutdownTimeout(SHUTDOWN_TIMEOUT))
                    }
                }
            }
        }
    }
}

async fn scrape(State(state): State<ScrapeState>) -> Response {
    state.metrics.requests.inc();
    let timer = state.metrics.duration.start_timer();

    let families = state.registry.gather();
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    let encoded = encoder.encode(&families, &mut buffer);

    timer.observe_duration();

    match encoded {
        Ok(()) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, TEXT_CONTENT_TYPE)],
            buffer,
        )
            .into_response(),
        Err(err) => {
            tracing::error!(%err, "failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("encode failed: {err}"),
            )
                .into_response()
        }
    }
}
