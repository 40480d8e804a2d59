//! # Actor runtime
//!
//! String-keyed, per-instance single-threaded actors with lazy activation.
//!
//! Each logical actor is identified by (kind, key). The runtime keeps one
//! mailbox per key; a dedicated worker task owns the actor state and drains
//! jobs strictly FIFO, so an instance never interleaves two calls. Distinct
//! instances run concurrently, and a call suspended on a sub-call to another
//! instance (same kind or not) cannot deadlock because every instance has
//! its own worker task.
//!
//! Actors that mount a durable slot read it once during activation; a store
//! that is unreachable at that point fails the triggering call with
//! [`Error::RouteUnavailable`].

mod slot;

pub use slot::{DurableSlot, MemoryStateStore, StateStore};

use crate::error::{Error, Result};
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::debug;

/// Work queued on an actor mailbox: a closure run with exclusive access to
/// the actor state.
type Job<A> = Box<dyn for<'a> FnOnce(&'a mut A) -> BoxFuture<'a, ()> + Send>;

/// Mailbox depth per instance. Senders back-pressure when full.
const MAILBOX_CAPACITY: usize = 64;

/// A logical actor constructible from shared dependencies and a key.
#[async_trait]
pub trait Actor: Send + Sized + 'static {
    /// Dependencies injected into every instance of this kind.
    type Deps: Send + Sync + 'static;

    /// Stable kind label, used for routing diagnostics and slot namespacing.
    fn kind() -> &'static str;

    /// Construct the instance for `key`. May read a mounted durable slot;
    /// failing to reach the slot store is the only legitimate failure.
    async fn activate(deps: &Self::Deps, key: &str) -> Result<Self>;
}

/// Key-addressable runtime for one actor kind.
pub struct Runtime<A: Actor> {
    deps: A::Deps,
    mailboxes: Mutex<HashMap<String, mpsc::Sender<Job<A>>>>,
}

impl<A: Actor> Runtime<A> {
    pub fn new(deps: A::Deps) -> Arc<Self> {
        Arc::new(Self {
            deps,
            mailboxes: Mutex::new(HashMap::new()),
        })
    }

    /// Route a call to the instance for `key`, activating it if necessary,
    /// and await the reply. Calls to one key serialise in FIFO order.
    pub async fn call<R, F>(&self, key: &str, f: F) -> Result<R>
    where
        R: Send + 'static,
        F: for<'a> FnOnce(&'a mut A) -> BoxFuture<'a, R> + Send + 'static,
    {
        let tx = self.mailbox(key).await?;
        let (reply_tx, reply_rx) = oneshot::channel();
        let job: Job<A> = Box::new(move |actor| {
            Box::pin(async move {
                let out = f(actor).await;
                // Reply may be abandoned; the call still ran to completion.
                let _ = reply_tx.send(out);
            })
        });
        tx.send(job).await.map_err(|_| {
            Error::RouteUnavailable(format!("{} actor mailbox closed", A::kind()))
        })?;
        reply_rx.await.map_err(|_| {
            Error::RouteUnavailable(format!("{} actor dropped its reply", A::kind()))
        })
    }

    /// Number of live instances, for diagnostics.
    pub async fn instance_count(&self) -> usize {
        self.mailboxes.lock().await.len()
    }

    async fn mailbox(&self, key: &str) -> Result<mpsc::Sender<Job<A>>> {
        let mut map = self.mailboxes.lock().await;
        if let Some(tx) = map.get(key) {
            if !tx.is_closed() {
                return Ok(tx.clone());
            }
            map.remove(key);
        }

        let mut actor = A::activate(&self.deps, key).await?;
        let (tx, mut rx) = mpsc::channel::<Job<A>>(MAILBOX_CAPACITY);
        let kind = A::kind();
        let owned_key = key.to_string();
        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                job(&mut actor).await;
            }
            debug!(kind, key = %owned_key, "actor deactivated");
        });
        map.insert(key.to_string(), tx.clone());
        debug!(kind = A::kind(), key, "actor activated");
        Ok(tx)
    }
}
