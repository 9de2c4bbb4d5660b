//! Async-runtime internals exposed as gauges.

use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{IntGauge, Opts};
use tokio::runtime::Handle;

use promwire_core::error::{PromwireError, Result};

/// Reports tokio scheduler state: worker threads, alive tasks, and the
/// global queue depth. Values are sampled each time the registry gathers,
/// so a scrape always sees the current runtime state.
pub struct RuntimeCollector {
    handle: Handle,
    workers: IntGauge,
    alive_tasks: IntGauge,
    queue_depth: IntGauge,
    descs: Vec<Desc>,
}

impl RuntimeCollector {
    /// Build against the ambient runtime. Fails outside a tokio context.
    pub fn current() -> Result<Self> {
        let handle = Handle::try_current().map_err(|e| PromwireError::Runtime(e.to_string()))?;
        Self::from_handle(handle)
    }

    pub fn from_handle(handle: Handle) -> Result<Self> {
        let workers = IntGauge::with_opts(Opts::new(
            "tokio_workers",
            "Number of worker threads used by the runtime.",
        ))?;
        let alive_tasks = IntGauge::with_opts(Opts::new(
            "tokio_alive_tasks",
            "Number of tasks currently alive in the runtime.",
        ))?;
        let queue_depth = IntGauge::with_opts(Opts::new(
            "tokio_global_queue_depth",
            "Number of tasks waiting in the runtime's injection queue.",
        ))?;

        let mut descs = Vec::with_capacity(3);
        descs.extend(workers.desc().into_iter().cloned());
        descs.extend(alive_tasks.desc().into_iter().cloned());
        descs.extend(queue_depth.desc().into_iter().cloned());

        Ok(Self {
            handle,
            workers,
            alive_tasks,
            queue_depth,
            descs,
        })
    }
}

impl Collector for RuntimeCollector {
    fn desc(&self) -> Vec<&Desc> {
        self.descs.iter().collect()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let metrics = self.handle.metrics();
        self.workers.set(metrics.num_workers() as i64);
        self.alive_tasks.set(metrics.num_alive_tasks() as i64);
        self.queue_depth.set(metrics.global_queue_depth() as i64);

        let mut families = Vec::with_capacity(3);
        families.extend(self.workers.collect());
        families.extend(self.alive_tasks.collect());
        families.extend(self.queue_depth.collect());
        families
    }
}
