use std::{num::NonZeroUsize, sync::Arc};

use tokio::sync::{Mutex, mpsc, watch};

use crate::error::{DriverErr, Result};

/// The amount of updates a worker buffers before applying backpressure.
pub const DEFAULT_BUFFER_CAPACITY: NonZeroUsize = NonZeroUsize::new(1024).unwrap();

/// A bounded FIFO decoupling the arrival of updates from their consumption.
///
/// The driver is the only producer and the local gradient accumulator the only consumer,
/// items are taken in the exact order they were put. Handles are cheap to clone and all
/// of them share the same queue.
#[derive(Debug)]
pub struct UpdateBuffer<T> {
    tx: mpsc::Sender<T>,
    rx: Arc<Mutex<mpsc::Receiver<T>>>,
    closed: Arc<watch::Sender<bool>>,
    capacity: NonZeroUsize,
}

impl<T> Clone for UpdateBuffer<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            rx: Arc::clone(&self.rx),
            closed: Arc::clone(&self.closed),
            capacity: self.capacity,
        }
    }
}

impl<T> UpdateBuffer<T> {
    /// Creates a new `UpdateBuffer`.
    ///
    /// # Arguments
    /// * `capacity` - The maximum amount of buffered updates.
    pub fn new(capacity: NonZeroUsize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.get());
        let (closed, _) = watch::channel(false);

        Self {
            tx,
            rx: Arc::new(Mutex::new(rx)),
            closed: Arc::new(closed),
            capacity,
        }
    }

    /// Puts `item` at the back of the buffer.
    ///
    /// Waits for as long as the buffer is full, there's no timeout and nothing is dropped
    /// unless the buffer gets closed during the wait.
    ///
    /// # Returns
    /// `DriverErr::BufferClosed` if the buffer was closed before or while waiting.
    pub async fn put(&self, item: T) -> Result<()> {
        let mut closed = self.closed.subscribe();

        if *closed.borrow_and_update() {
            return Err(DriverErr::BufferClosed);
        }

        tokio::select! {
            res = self.tx.send(item) => res.map_err(|_| DriverErr::BufferClosed),
            _ = closed.wait_for(|closed| *closed) => Err(DriverErr::BufferClosed),
        }
    }

    /// Waits for the next update.
    ///
    /// # Returns
    /// The oldest buffered update, or `None` once the buffer is closed and drained.
    pub async fn take(&self) -> Option<T> {
        let mut closed = self.closed.subscribe();
        let mut rx = self.rx.lock().await;

        tokio::select! {
            biased;
            item = rx.recv() => item,
            _ = closed.wait_for(|closed| *closed) => rx.try_recv().ok(),
        }
    }

    /// Takes the next update without waiting.
    ///
    /// # Returns
    /// `None` if the buffer is empty or another consumer is currently taking from it.
    pub fn try_take(&self) -> Option<T> {
        self.rx.try_lock().ok()?.try_recv().ok()
    }

    /// Stops accepting new updates, the ones already buffered can still be taken.
    ///
    /// Producers waiting on a full buffer fail with `DriverErr::BufferClosed` and consumers
    /// waiting on an empty one get `None`.
    pub fn close(&self) {
        self.closed.send_replace(true);
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    /// Returns the amount of buffered updates.
    pub fn len(&self) -> usize {
        self.capacity.get() - self.tx.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }
}
