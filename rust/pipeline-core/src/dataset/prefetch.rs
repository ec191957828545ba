// rust/pipeline-core/src/dataset/prefetch.rs

//! Background prefetching of elements.
//!
//! A worker thread pulls from the input cursor into a bounded channel so
//! file I/O overlaps with the consumer. Order, error positions and the end of
//! the sequence are the same as pulling the input directly.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver};

use super::cursor::Cursor;
use super::element::Value;
use crate::error::{PipelineError, Result};

type PrefetchItem = Result<Value>;

/// Largest number of channel slots allocated for one prefetch stage.
const MAX_BUFFERED_ELEMENTS: usize = 4096;

pub(crate) struct PrefetchCursor {
    receiver: Option<Receiver<PrefetchItem>>,
    stop_flag: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl PrefetchCursor {
    /// Starts a worker that keeps up to `buffer_size` elements ready.
    ///
    /// The buffer is capped at `MAX_BUFFERED_ELEMENTS` since the channel
    /// allocates every slot up front.
    pub(crate) fn spawn(mut input: Box<dyn Cursor>, buffer_size: usize) -> Result<Self> {
        let capacity = buffer_size.min(MAX_BUFFERED_ELEMENTS);
        if capacity < buffer_size {
            tracing::debug!(
                "Prefetch buffer of {} elements capped at {}",
                buffer_size,
                capacity
            );
        }
        let (sender, receiver) = channel::bounded(capacity);
        let stop_flag = Arc::new(AtomicBool::new(false));
        let worker_stop = Arc::clone(&stop_flag);

        let worker = thread::Builder::new()
            .name("pipeline-prefetch".to_string())
            .spawn(move || {
                while !worker_stop.load(Ordering::Relaxed) {
                    let item = match input.next_element() {
                        Ok(Some(value)) => Ok(value),
                        Ok(None) => break,
                        Err(e) => Err(e),
                    };
                    // Fails only once the consumer is gone
                    if sender.send(item).is_err() {
                        break;
                    }
                }
            })
            .map_err(|e| PipelineError::internal_with_source("failed to spawn prefetch thread", e))?;

        Ok(Self {
            receiver: Some(receiver),
            stop_flag,
            worker: Some(worker),
        })
    }
}

impl Cursor for PrefetchCursor {
    fn next_element(&mut self) -> Result<Option<Value>> {
        let Some(receiver) = &self.receiver else {
            return Ok(None);
        };
        match receiver.recv() {
            Ok(item) => item.map(Some),
            // Worker finished and the channel is drained
            Err(_) => Ok(None),
        }
    }
}

impl Drop for PrefetchCursor {
    fn drop(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        // Unblocks a worker waiting on a full channel
        self.receiver.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::warn!("Prefetch worker panicked");
            }
        }
    }
}
