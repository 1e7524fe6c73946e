//! Async access to a [`Transport`]
//!
//! Receive holds the calling thread until data or the deadline arrives, so
//! async callers go through [`SharedTransport`], which runs every call on
//! tokio's blocking pool.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{ConnectionConfig, ReceiveOutcome, Transport, TransportError};

/// Cloneable handle that drives a [`Transport`] from async code
#[derive(Clone)]
pub struct SharedTransport {
    inner: Arc<Mutex<Transport>>,
}

impl SharedTransport {
    /// Wrap a transport, open or closed
    pub fn new(transport: Transport) -> Self {
        Self {
            inner: Arc::new(Mutex::new(transport)),
        }
    }

    async fn run<T, F>(&self, op: F) -> Result<T, TransportError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Transport) -> Result<T, TransportError> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let mut transport = inner
                .lock()
                .map_err(|_| TransportError::Stream("transport lock poisoned".to_string()))?;
            op(&mut *transport)
        })
        .await
        .map_err(|e| TransportError::Stream(format!("blocking task failed: {}", e)))?
    }

    /// [`Transport::open`] on the blocking pool
    pub async fn open(&self, config: ConnectionConfig) -> Result<(), TransportError> {
        self.run(move |t| t.open(config)).await
    }

    /// [`Transport::send`] on the blocking pool
    pub async fn send(&self, data: Vec<u8>) -> Result<(), TransportError> {
        self.run(move |t| t.send(&data)).await
    }

    /// [`Transport::receive`] on the blocking pool
    pub async fn receive(
        &self,
        max_len: usize,
        timeout: Duration,
    ) -> Result<ReceiveOutcome, TransportError> {
        self.run(move |t| t.receive(max_len, timeout)).await
    }

    /// Close the transport; never fails
    pub async fn close(&self) {
        // Only a poisoned lock or failed task can surface here
        if let Err(e) = self
            .run(|t| {
                t.close();
                Ok(())
            })
            .await
        {
            tracing::warn!("close skipped: {}", e);
        }
    }

    /// Whether the transport holds a channel
    pub async fn is_open(&self) -> bool {
        self.run(|t| Ok(t.is_open())).await.unwrap_or(false)
    }
}
