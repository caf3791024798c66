use std::sync::Arc;

use futures::{
    Stream, StreamExt as _,
    future,
    stream::{self, BoxStream},
};
use tokio::sync::watch;

use crate::{CancellationToken, Capability, Error, Result};

type OpenFn<V> = Arc<dyn Fn(CancellationToken) -> BoxStream<'static, Result<V>> + Send + Sync>;

/// A stream of values that can be opened any number of times.
///
/// Every [`open`](Self::open) starts a fresh, independent run. A run ends when the
/// source ends, after the first error it yields, or when its signal gets cancelled (the
/// last item is then [`Error::Cancelled`]).
pub struct Observer<V> {
    open: OpenFn<V>,
}

/// A flow of incoming values, eg. button presses.
pub type Event<T> = Observer<T>;

impl<V> Clone for Observer<V> {
    fn clone(&self) -> Self {
        Self { open: self.open.clone() }
    }
}

impl<V: Send + 'static> Observer<V> {
    pub fn new<F, S>(open: F) -> Self
    where
        F: Fn(CancellationToken) -> S + Send + Sync + 'static,
        S: Stream<Item = Result<V>> + Send + 'static,
    {
        Self { open: Arc::new(move |signal| open(signal).boxed()) }
    }

    /// Fails on the first pull.
    pub fn not_observable() -> Self {
        Self::new(|_| stream::once(future::ready(Err(Error::Unsupported(Capability::Observe)))))
    }

    /// Yields the current value of the channel, then every change to it.
    pub fn from_watch(rx: watch::Receiver<V>) -> Self
    where
        V: Clone + Sync,
    {
        Self::new(move |_| {
            stream::unfold((rx.clone(), true), |(mut rx, first)| async move {
                if !first && rx.changed().await.is_err() {
                    return None;
                }

                let value = rx.borrow_and_update().clone();
                Some((Ok(value), (rx, false)))
            })
        })
    }

    pub fn open(&self, signal: &CancellationToken) -> BoxStream<'static, Result<V>> {
        if signal.is_cancelled() {
            return stream::once(future::ready(Err(Error::Cancelled))).boxed();
        }

        let values = (self.open)(signal.clone());

        stream::unfold(Some((values, signal.clone())), |state| async move {
            let Some((mut values, signal)) = state else {
                return None;
            };

            let next = tokio::select! {
                biased;
                () = signal.cancelled() => Some(Err(Error::Cancelled)),
                next = values.next() => next,
            };

            match next {
                Some(Ok(value)) => Some((Ok(value), Some((values, signal)))),
                Some(Err(e)) => Some((Err(e), None)),
                None => None,
            }
        })
        .boxed()
    }

    /// Applies `f` to every value as it is produced. An error from `f` ends the run.
    pub fn map<Out, F>(&self, f: F) -> Observer<Out>
    where
        Out: Send + 'static,
        F: Fn(V) -> Result<Out> + Send + Sync + 'static,
    {
        let source = self.clone();
        let f = Arc::new(f);

        Observer::new(move |signal| {
            let f = f.clone();
            source.open(&signal).map(move |value| value.and_then(|value| f(value)))
        })
    }
}
