//! Live receiver stream
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{sync_channel, Receiver, RecvTimeoutError, SyncSender, TrySendError},
        Arc,
    },
    time::Duration as StdDuration,
};

use log::{debug, info, warn};

use crate::prelude::{
    BacklogPolicy, Epoch, EpochPipeline, Error, ObservationEpoch, RealtimeOpts, ReceiverSolution,
};

/// Creates a bounded ([EpochFeed], [EpochStream]) pair.
/// The queue never holds more than [RealtimeOpts::queue_capacity] epochs.
pub fn feed(opts: &RealtimeOpts) -> (EpochFeed, EpochStream) {
    let (tx, rx) = sync_channel(opts.queue_capacity.max(1));
    (EpochFeed { tx }, EpochStream { rx })
}

/// Producer side of the live stream, handed to the receiver decoder.
#[derive(Debug, Clone)]
pub struct EpochFeed {
    tx: SyncSender<ObservationEpoch>,
}

impl EpochFeed {
    /// Queues a new [ObservationEpoch]. This never blocks:
    /// the epoch is dropped when the queue is full or the stream is gone.
    /// Returns true when the epoch was queued.
    pub fn push(&self, epoch: ObservationEpoch) -> bool {
        match self.tx.try_send(epoch) {
            Ok(_) => true,
            Err(TrySendError::Full(epoch)) => {
                warn!("{} - queue is full: epoch dropped", epoch.epoch);
                false
            },
            Err(TrySendError::Disconnected(epoch)) => {
                warn!("{} - stream is closed: epoch dropped", epoch.epoch);
                false
            },
        }
    }
}

/// Consumer side of the live stream.
#[derive(Debug)]
pub struct EpochStream {
    rx: Receiver<ObservationEpoch>,
}

/// [Realtime] drives an [EpochPipeline] from an [EpochStream].
#[derive(Debug)]
pub struct Realtime {
    pipeline: EpochPipeline,
    opts: RealtimeOpts,
    shutdown: Arc<AtomicBool>,
    last: Option<Epoch>,
}

impl Realtime {
    pub fn new(pipeline: EpochPipeline) -> Self {
        let opts = pipeline.cfg().realtime.clone();
        Self {
            pipeline,
            opts,
            last: None,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns the shutdown flag. Raising it stops [Realtime::run]
    /// once the epoch being processed is complete.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        self.shutdown.clone()
    }

    /// [EpochPipeline] being driven
    pub fn pipeline(&self) -> &EpochPipeline {
        &self.pipeline
    }

    /// Consumes the [EpochStream] until shutdown is requested or every
    /// [EpochFeed] is dropped. `sink` is called once per processed epoch.
    /// Epochs that do not come after the last processed epoch are dropped.
    /// Returns the number of processed epochs.
    pub fn run<F>(&mut self, stream: EpochStream, mut sink: F) -> usize
    where
        F: FnMut(Epoch, Result<ReceiverSolution, Error>),
    {
        let poll = StdDuration::from_millis(self.opts.poll_interval_ms);
        let mut processed = 0;

        info!("realtime: {:?} backlog policy", self.opts.backlog);

        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                info!("realtime: shutdown requested");
                break;
            }

            let epoch = match stream.rx.recv_timeout(poll) {
                Ok(epoch) => epoch,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    info!("realtime: stream closed");
                    break;
                },
            };

            let epoch = match self.opts.backlog {
                BacklogPolicy::Sequential => epoch,
                BacklogPolicy::SkipToLatest => {
                    let mut skipped = 0;
                    let mut latest = epoch;
                    while let Ok(next) = stream.rx.try_recv() {
                        latest = next;
                        skipped += 1;
                    }
                    if skipped > 0 {
                        warn!("{} - skipped {} pending epochs", latest.epoch, skipped);
                    }
                    latest
                },
            };

            if let Some(last) = self.last {
                if epoch.epoch <= last {
                    warn!("{} - out of order epoch dropped", epoch.epoch);
                    continue;
                }
            }

            debug!("{} - processing {} observations", epoch.epoch, epoch.len());

            let result = self.pipeline.process(&epoch);
            self.last = Some(epoch.epoch);
            sink(epoch.epoch, result);
            processed += 1;
        }

        processed
    }
}
