//! Bounded worker pool that enriches redirect events off the request path.
//!
//! Handlers push [`RedirectEvent`]s into an [`EnrichmentQueue`] without
//! waiting. A single dispatcher task pulls events and runs each one on a
//! handler task, with at most `concurrency` tasks in flight. When the queue is
//! full new events are dropped and counted; request latency never depends on
//! enrichment.
//!
//! Shutdown closes the queue, finishes every event already buffered, then
//! waits for the in-flight tasks.

use crate::domain::redirect_event::RedirectEvent;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Processes one redirect event to completion.
///
/// Implementations absorb their own failures; the pool only sees panics.
#[async_trait]
pub trait RedirectEventHandler: Send + Sync + 'static {
    async fn handle(&self, event: RedirectEvent);
}

/// Sending half of the enrichment queue. Cheap to clone.
#[derive(Clone)]
pub struct EnrichmentQueue {
    sender: mpsc::Sender<RedirectEvent>,
}

impl EnrichmentQueue {
    /// Enqueues an event without waiting.
    ///
    /// Returns `false` when the event was dropped because the queue is full
    /// or already closed.
    pub fn submit(&self, event: RedirectEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(event)) => {
                warn!(
                    short_code = %event.short_code,
                    "Enrichment queue full, dropping redirect event"
                );
                metrics::counter!("linkchop_enrichment_dropped_total", "reason" => "full")
                    .increment(1);
                false
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                debug!(
                    short_code = %event.short_code,
                    "Enrichment queue closed, dropping redirect event"
                );
                metrics::counter!("linkchop_enrichment_dropped_total", "reason" => "closed")
                    .increment(1);
                false
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Free slots left in the buffer.
    pub fn capacity(&self) -> usize {
        self.sender.capacity()
    }

    pub fn max_capacity(&self) -> usize {
        self.sender.max_capacity()
    }
}

/// Handle to the running dispatcher.
pub struct EnrichmentWorkers {
    shutdown: CancellationToken,
    dispatcher: JoinHandle<()>,
}

impl EnrichmentWorkers {
    /// Starts the dispatcher and returns the queue feeding it.
    ///
    /// `capacity` bounds buffered events and `concurrency` bounds events
    /// processed at once. Both must be non-zero.
    pub fn start(
        handler: Arc<dyn RedirectEventHandler>,
        capacity: usize,
        concurrency: usize,
    ) -> (EnrichmentQueue, Self) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let shutdown = CancellationToken::new();

        let dispatcher = tokio::spawn(run_dispatcher(
            receiver,
            handler,
            concurrency.max(1),
            shutdown.clone(),
        ));

        info!(capacity, concurrency, "Enrichment workers started");

        (EnrichmentQueue { sender }, Self { shutdown, dispatcher })
    }

    /// Stops accepting events and waits until every buffered and in-flight
    /// event has been processed.
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        if let Err(e) = self.dispatcher.await {
            error!(error = %e, "Enrichment dispatcher terminated abnormally");
        }
    }
}

async fn run_dispatcher(
    mut receiver: mpsc::Receiver<RedirectEvent>,
    handler: Arc<dyn RedirectEventHandler>,
    concurrency: usize,
    shutdown: CancellationToken,
) {
    let permits = Arc::new(Semaphore::new(concurrency));
    let mut tasks = JoinSet::new();
    let mut draining = false;

    loop {
        let event = tokio::select! {
            _ = shutdown.cancelled(), if !draining => {
                debug!("Closing enrichment queue, draining buffered events");
                receiver.close();
                draining = true;
                continue;
            }
            event = receiver.recv() => match event {
                Some(event) => event,
                None => break,
            },
        };

        // The semaphore is never closed, so acquisition only fails if it is dropped.
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };

        let handler = handler.clone();
        tasks.spawn(async move {
            handler.handle(event).await;
            drop(permit);
        });

        while let Some(result) = tasks.try_join_next() {
            log_task_result(result);
        }
    }

    while let Some(result) = tasks.join_next().await {
        log_task_result(result);
    }

    info!("Enrichment workers stopped");
}

fn log_task_result(result: Result<(), JoinError>) {
    if let Err(e) = result {
        error!(error = %e, "Enrichment task failed");
    }
}
