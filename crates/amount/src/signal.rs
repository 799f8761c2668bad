//! Latest-value signals.
//!
//! A [`Signal`] is the read side of a value that changes over time (the base
//! currency, the latest exchange-rate snapshot). It starts empty and always
//! holds the most recent value once the producer has sent one. Readers can:
//! - peek at what is there now ([`Signal::latest`]),
//! - wait once for a value ([`Signal::current`]),
//! - follow every change ([`Signal::subscribe`]).
//!
//! Slow readers only ever see the newest value, never a backlog.

use tokio::sync::watch;

/// Creates an empty signal and the handle used to feed it.
#[must_use]
pub fn signal<T>() -> (SignalSender<T>, Signal<T>) {
    let (tx, rx) = watch::channel(None);
    (SignalSender { tx }, Signal { rx })
}

/// Producer side of a [`Signal`].
#[derive(Debug)]
pub struct SignalSender<T> {
    tx: watch::Sender<Option<T>>,
}

impl<T: PartialEq> SignalSender<T> {
    /// Publishes `value`. Returns `false` when it equals the current value,
    /// in which case readers are not woken up.
    pub fn send(&self, value: T) -> bool {
        self.tx.send_if_modified(|current| {
            if current.as_ref() == Some(&value) {
                return false;
            }
            *current = Some(value);
            true
        })
    }
}

impl<T> SignalSender<T> {
    /// Number of live read handles and subscriptions.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Read side of a latest-value signal.
#[derive(Debug, Clone)]
pub struct Signal<T> {
    rx: watch::Receiver<Option<T>>,
}

impl<T: Clone> Signal<T> {
    /// The value held right now, if any. Never waits.
    #[must_use]
    pub fn latest(&self) -> Option<T> {
        self.rx.borrow().clone()
    }

    /// Waits for the first available value and returns it.
    ///
    /// Resolves immediately when a value is already there. Returns `None`
    /// only if the producer went away without ever sending one.
    pub async fn current(&self) -> Option<T> {
        let mut rx = self.rx.clone();
        let value = rx
            .wait_for(Option::is_some)
            .await
            .ok()
            .and_then(|value| (*value).clone());
        value
    }
}

impl<T> Signal<T> {
    /// A receiver that observes every subsequent change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.rx.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn latest_is_empty_until_first_send() {
        let (tx, rx) = signal::<u32>();
        assert_eq!(rx.latest(), None);
        assert!(tx.send(1));
        assert_eq!(rx.latest(), Some(1));
    }

    #[tokio::test]
    async fn unchanged_value_is_not_republished() {
        let (tx, rx) = signal::<u32>();
        let mut sub = rx.subscribe();
        assert!(tx.send(7));
        assert!(sub.has_changed().unwrap());
        sub.borrow_and_update();
        assert!(!tx.send(7));
        assert!(!sub.has_changed().unwrap());
    }

    #[tokio::test]
    async fn current_waits_for_the_first_value() {
        let (tx, rx) = signal::<&'static str>();
        let reader = tokio::spawn(async move { rx.current().await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        tx.send("EUR");
        assert_eq!(reader.await.unwrap(), Some("EUR"));
    }

    #[tokio::test]
    async fn current_is_none_when_producer_never_sent() {
        let (tx, rx) = signal::<u32>();
        drop(tx);
        assert_eq!(rx.current().await, None);
    }

    #[tokio::test]
    async fn current_keeps_last_value_after_producer_left() {
        let (tx, rx) = signal::<u32>();
        tx.send(3);
        drop(tx);
        assert_eq!(rx.current().await, Some(3));
    }
}
