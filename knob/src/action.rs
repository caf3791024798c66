use core::future::Future;
use std::sync::Arc;

use futures::{FutureExt as _, future::BoxFuture};

use crate::{CancellationToken, Error, Result, cancellable};

type RunFn<A, R> = Arc<dyn Fn(A, CancellationToken) -> BoxFuture<'static, Result<R>> + Send + Sync>;

/// An abortable async operation, eg. "turn on" or "start playback".
///
/// The function receives the caller's signal and is expected to give up once it gets
/// cancelled. Callers don't depend on it doing so: an invocation resolves with
/// [`Error::Cancelled`] as soon as the signal fires, dropping the operation.
pub struct Action<A, R = ()> {
    run: RunFn<A, R>,
}

impl<A, R> Clone for Action<A, R> {
    fn clone(&self) -> Self {
        Self { run: self.run.clone() }
    }
}

impl<A: Send + 'static, R: Send + 'static> Action<A, R> {
    pub fn new<F, Fut>(run: F) -> Self
    where
        F: Fn(A, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R>> + Send + 'static,
    {
        Self { run: Arc::new(move |args: A, signal: CancellationToken| run(args, signal).boxed()) }
    }

    pub async fn invoke(&self, args: A, signal: Option<&CancellationToken>) -> Result<R> {
        let signal = signal.cloned().unwrap_or_default();

        // `run` may do work before handing back its future
        if signal.is_cancelled() {
            return Err(Error::Cancelled);
        }

        cancellable(&signal, (self.run)(args, signal.clone())).await
    }
}

impl<R: Send + 'static> Action<(), R> {
    pub async fn call(&self, signal: Option<&CancellationToken>) -> Result<R> {
        self.invoke((), signal).await
    }
}
