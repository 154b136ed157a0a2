//! The cart store: authoritative in-memory cart plus its persistence writer.
//!
//! Mutators run synchronously on the caller's task. Each one clones the
//! current cart, applies the change, publishes the result as a new immutable
//! snapshot on a `watch` channel, and queues that same post-mutation snapshot
//! for the writer task. The writer applies saves strictly in mutation order,
//! so the stored record is never a mutation behind the cart it mirrors.
//!
//! Public API: [`CartStore`] (cheaply cloneable handle).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use gomarketplace_core::{Cart, LineItem, NewLineItem, ProductId, UnknownLineItem};
use tokio::sync::{mpsc, oneshot, watch};

use crate::error::{CartError, Result};
use crate::persistence::CartPersistence;

/// Messages sent from the store to the writer task.
enum PersistCommand {
    /// Write this snapshot.
    Save(Arc<Cart>),
    /// Reply once every earlier save has settled.
    Flush(oneshot::Sender<()>),
    /// Settle earlier saves, reply, and exit.
    Shutdown(oneshot::Sender<()>),
}

/// Shared state behind every `CartStore` clone.
pub(crate) struct CartStoreInner {
    /// Serializes mutators so publish order matches save order.
    cart: Mutex<Arc<Cart>>,
    snapshots: watch::Sender<Arc<Cart>>,
    persist_tx: mpsc::UnboundedSender<PersistCommand>,
    last_save_error: Arc<watch::Sender<Option<String>>>,
    closed: AtomicBool,
}

/// Handle to the shopper's cart.
///
/// Cloning is cheap and every clone sees the same cart. Obtain one through
/// [`CartProvider`](crate::CartProvider) in application code, or directly with
/// [`CartStore::open`].
#[derive(Clone)]
pub struct CartStore {
    pub(crate) inner: Arc<CartStoreInner>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("line_items", &self.products().len())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Load the stored cart and start the persistence writer.
    ///
    /// The load completes before the store is returned, so no mutation can
    /// be applied to the empty placeholder and then overwritten by the load.
    /// Must be called from within a Tokio runtime.
    pub async fn open(persistence: CartPersistence) -> Self {
        let cart = Arc::new(persistence.load().await);
        tracing::info!(
            key = %persistence.key(),
            line_items = cart.len(),
            "Cart store opened"
        );

        let (snapshots, _) = watch::channel(Arc::clone(&cart));
        let (last_save_error, _) = watch::channel(None);
        let last_save_error = Arc::new(last_save_error);
        let (persist_tx, persist_rx) = mpsc::unbounded_channel();

        tokio::spawn(run_writer(
            persistence,
            persist_rx,
            Arc::clone(&last_save_error),
        ));

        Self {
            inner: Arc::new(CartStoreInner {
                cart: Mutex::new(cart),
                snapshots,
                persist_tx,
                last_save_error,
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Current snapshot of the cart.
    ///
    /// Snapshots are immutable; a mutation publishes a new one instead of
    /// changing this one.
    #[must_use]
    pub fn products(&self) -> Arc<Cart> {
        Arc::clone(&self.inner.snapshots.borrow())
    }

    /// Line items of the current snapshot, cloned.
    #[must_use]
    pub fn line_items(&self) -> Vec<LineItem> {
        self.products().line_items().to_vec()
    }

    /// Subscribe to cart snapshots.
    ///
    /// The receiver starts at the current snapshot and is notified after
    /// every successful mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<Cart>> {
        self.inner.snapshots.subscribe()
    }

    /// Add one unit of a product, appending it if it is not in the cart yet.
    pub fn add_to_cart(&self, item: NewLineItem) {
        let id = item.id.clone();
        let applied = self.apply(|cart| {
            cart.add(item);
            Ok(())
        });
        if applied.is_ok() {
            tracing::debug!(product_id = %id, "Added to cart");
        }
    }

    /// Add one unit to a line item already in the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownLineItem`] if `id` is not in the cart.
    /// Nothing is published or saved in that case.
    pub fn increment(&self, id: &ProductId) -> Result<()> {
        self.apply(|cart| cart.increment(id))
            .inspect_err(|e| tracing::warn!(error = %e, "Increment rejected"))?;
        tracing::debug!(product_id = %id, "Incremented line item");
        Ok(())
    }

    /// Remove one unit from a line item, dropping it when none are left.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownLineItem`] if `id` is not in the cart.
    /// Nothing is published or saved in that case.
    pub fn decrement(&self, id: &ProductId) -> Result<()> {
        let removed = self
            .apply(|cart| cart.decrement(id))
            .inspect_err(|e| tracing::warn!(error = %e, "Decrement rejected"))?;
        match removed {
            Some(_) => tracing::debug!(product_id = %id, "Removed line item"),
            None => tracing::debug!(product_id = %id, "Decremented line item"),
        }
        Ok(())
    }

    /// Wait until every save queued so far has been written or has failed.
    pub async fn flush(&self) {
        let (reply, done) = oneshot::channel();
        if self.inner.persist_tx.send(PersistCommand::Flush(reply)).is_ok() {
            // An error means the writer already exited; nothing is pending.
            let _ = done.await;
        }
    }

    /// Message of the most recent failed save, cleared by the next success.
    #[must_use]
    pub fn last_save_error(&self) -> Option<String> {
        self.inner.last_save_error.borrow().clone()
    }

    /// Subscribe to save failures.
    #[must_use]
    pub fn save_errors(&self) -> watch::Receiver<Option<String>> {
        self.inner.last_save_error.subscribe()
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    /// Write pending saves and stop the writer.
    ///
    /// Mutations after this point still update the in-memory cart and its
    /// subscribers but are no longer persisted.
    pub async fn close(&self) {
        let Some(done) = self.begin_close() else {
            return;
        };
        let _ = done.await;
        tracing::info!("Cart store closed");
    }

    /// Signal the writer to stop without waiting for it.
    pub(crate) fn close_nowait(&self) {
        let _ = self.begin_close();
    }

    /// Mark the store closed and queue the writer's shutdown.
    ///
    /// Runs under the cart lock, so each mutation's save is either queued
    /// ahead of the shutdown or skipped with a warning. Returns `None` if the
    /// store was already closed.
    fn begin_close(&self) -> Option<oneshot::Receiver<()>> {
        let _cart = self
            .inner
            .cart
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if self.inner.closed.swap(true, Ordering::AcqRel) {
            return None;
        }
        let (reply, done) = oneshot::channel();
        self.inner
            .persist_tx
            .send(PersistCommand::Shutdown(reply))
            .ok()?;
        Some(done)
    }

    /// Apply `mutation` to a copy of the cart, then publish and queue a save.
    ///
    /// The lock covers publish and enqueue so that concurrent mutators reach
    /// subscribers and the writer in the same order.
    fn apply<T>(
        &self,
        mutation: impl FnOnce(&mut Cart) -> std::result::Result<T, UnknownLineItem>,
    ) -> Result<T> {
        // A panic inside `mutation` happens before the guarded value is
        // replaced, so a poisoned lock still holds a consistent cart.
        let mut current = self
            .inner
            .cart
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut next = Cart::clone(&current);
        let output = mutation(&mut next).map_err(CartError::from)?;
        let next = Arc::new(next);

        *current = Arc::clone(&next);
        self.inner.snapshots.send_replace(Arc::clone(&next));
        self.schedule_save(next);
        drop(current);

        Ok(output)
    }

    fn schedule_save(&self, cart: Arc<Cart>) {
        if self.is_closed() || self.inner.persist_tx.send(PersistCommand::Save(cart)).is_err() {
            tracing::warn!("Cart store is closed, change kept in memory only");
        }
    }
}

/// Writer loop. Owns the persistence bridge and applies saves in order.
///
/// Runs until a `Shutdown` arrives or every sender is dropped.
async fn run_writer(
    persistence: CartPersistence,
    mut rx: mpsc::UnboundedReceiver<PersistCommand>,
    last_save_error: Arc<watch::Sender<Option<String>>>,
) {
    while let Some(command) = rx.recv().await {
        match command {
            PersistCommand::Save(cart) => {
                // Coalesce a backlog of saves into the newest one, but never
                // reorder across a flush or shutdown request.
                let mut latest = cart;
                let mut barrier = None;
                while let Ok(next) = rx.try_recv() {
                    match next {
                        PersistCommand::Save(cart) => latest = cart,
                        other => {
                            barrier = Some(other);
                            break;
                        }
                    }
                }

                write_snapshot(&persistence, &latest, &last_save_error).await;

                match barrier {
                    Some(PersistCommand::Flush(reply)) => {
                        let _ = reply.send(());
                    }
                    Some(PersistCommand::Shutdown(reply)) => {
                        let _ = reply.send(());
                        break;
                    }
                    Some(PersistCommand::Save(_)) | None => {}
                }
            }
            PersistCommand::Flush(reply) => {
                let _ = reply.send(());
            }
            PersistCommand::Shutdown(reply) => {
                let _ = reply.send(());
                break;
            }
        }
    }
    tracing::debug!("Cart writer stopped");
}

async fn write_snapshot(
    persistence: &CartPersistence,
    cart: &Cart,
    last_save_error: &watch::Sender<Option<String>>,
) {
    match persistence.save(cart).await {
        Ok(()) => {
            last_save_error.send_if_modified(|current| current.take().is_some());
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                key = %persistence.key(),
                line_items = cart.len(),
                "Failed to save cart"
            );
            last_save_error.send_replace(Some(e.to_string()));
        }
    }
}
