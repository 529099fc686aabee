//! # Bounded publish/subscribe value container.
//!
//! [`DataHub`] holds one current value plus a fixed table of subscriber
//! callbacks, all behind a single [`ReadWriteLock`] — it reuses the lock's
//! admission discipline and adds no coordination of its own.
//!
//! ## Rules
//! - At most [`MAX_SUBSCRIBERS`] callbacks; the next `subscribe` is rejected
//!   with [`HubError::CapacityExceeded`] so mis-sized configurations are
//!   detectable, not silently dropped.
//! - `publish` replaces the value under exclusive admission, then notifies
//!   every callback under read admission; callbacks must not call back into
//!   the same hub's write path (re-entrant admission deadlocks).

use crate::error::HubError;
use crate::sync::ReadWriteLock;

/// Fixed subscriber capacity of every [`DataHub`].
pub const MAX_SUBSCRIBERS: usize = 8;

type Callback<T> = Box<dyn Fn(&T) + Send + Sync>;

struct HubInner<T> {
    value: T,
    subscribers: Vec<Callback<T>>,
}

/// Single-value hub with bounded change notification.
///
/// Typically owned by the subsystem producing the value; consumers register a
/// callback once at initialization and read on demand.
///
/// # Example
/// ```
/// use subvisor::DataHub;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let hub = DataHub::new(0i64);
/// hub.subscribe(|reading: &i64| println!("reading changed: {reading}"))
///     .await
///     .unwrap();
///
/// hub.publish(42).await;
/// assert_eq!(hub.read(|reading| *reading).await, 42);
/// # }
/// ```
pub struct DataHub<T> {
    inner: ReadWriteLock<HubInner<T>>,
}

impl<T: Send + Sync + 'static> DataHub<T> {
    /// Creates a hub holding `initial` with no subscribers.
    pub fn new(initial: T) -> Self {
        Self {
            inner: ReadWriteLock::new(HubInner {
                value: initial,
                subscribers: Vec::new(),
            }),
        }
    }

    /// Registers a callback invoked on every publish.
    ///
    /// Takes exclusive admission for the table update. A full table is a
    /// configuration error, reported instead of silently dropping the
    /// callback.
    pub async fn subscribe<F>(&self, callback: F) -> Result<(), HubError>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let mut inner = self.inner.write().await;
        if inner.subscribers.len() == MAX_SUBSCRIBERS {
            return Err(HubError::CapacityExceeded {
                capacity: MAX_SUBSCRIBERS,
            });
        }
        inner.subscribers.push(Box::new(callback));
        Ok(())
    }

    /// Runs `f` against the current value under read admission.
    pub async fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let inner = self.inner.read().await;
        f(&inner.value)
    }

    /// Replaces the value, then notifies every subscriber with the new value.
    pub async fn publish(&self, value: T) {
        {
            let mut inner = self.inner.write().await;
            inner.value = value;
        }
        let inner = self.inner.read().await;
        for callback in &inner.subscribers {
            callback(&inner.value);
        }
    }
}
