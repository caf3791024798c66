//! Coalescing of bursts of calls into one
//!
//! A debounced action waits for `window` after the first call of a burst before running
//! the underlying action once. Every caller that arrives until that run finishes shares
//! its outcome:
//!
//! ```text
//! Idle --call--> Pending --window elapsed--> InFlight --done--> Idle
//!                   |                            |
//!                   +------ every caller left ---+--> Idle
//! ```
//!
//! Leaving early (own signal cancelled, future dropped) only removes that caller. Once the
//! last caller is gone the timer is cleared, or the running call is cancelled through its
//! signal, and nothing is reported to anyone.

use std::{sync::Arc, time::Duration};

use futures::{
    FutureExt as _,
    channel::oneshot,
    future::Shared,
};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::{Action, CancellationToken, Error, Result};

type SharedResult<R> = Shared<oneshot::Receiver<Result<R>>>;

/// Wraps `send` so that calls within `window` of each other result in a single call.
///
/// With a zero `window`, `send` is returned as is.
pub fn debounce<R>(send: Action<(), R>, window: Duration) -> Action<(), R>
where
    R: Clone + Send + Sync + 'static,
{
    if window.is_zero() {
        return send;
    }

    let debouncer = Arc::new(Debouncer { send, window, state: Mutex::new(State::default()) });

    Action::new(move |(), _signal| Debouncer::enter(&debouncer).wait())
}

struct Debouncer<R> {
    send: Action<(), R>,
    window: Duration,
    state: Mutex<State<R>>,
}

struct State<R> {
    /// Bumped for every new cycle, so stale timers and callers can tell they're stale
    generation: u64,
    cycle: Option<Cycle<R>>,
}

impl<R> Default for State<R> {
    fn default() -> Self {
        Self { generation: 0, cycle: None }
    }
}

struct Cycle<R> {
    generation: u64,
    consumers: usize,
    result: SharedResult<R>,
    stage: Stage,
}

enum Stage {
    Pending(JoinHandle<()>),
    InFlight(CancellationToken),
}

impl<R: Clone + Send + Sync + 'static> Debouncer<R> {
    fn enter(self: &Arc<Self>) -> Consumer<R> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        if let Some(cycle) = &mut state.cycle {
            cycle.consumers += 1;
            trace!(consumers = cycle.consumers, "joined pending call");

            return Consumer {
                debouncer: self.clone(),
                generation: cycle.generation,
                result: cycle.result.clone(),
            };
        }

        state.generation += 1;
        let generation = state.generation;

        let (tx, rx) = oneshot::channel();
        let result = rx.shared();
        let timer = tokio::spawn(self.clone().fire(generation, tx));

        state.cycle = Some(Cycle {
            generation,
            consumers: 1,
            result: result.clone(),
            stage: Stage::Pending(timer),
        });

        Consumer { debouncer: self.clone(), generation, result }
    }

    async fn fire(self: Arc<Self>, generation: u64, tx: oneshot::Sender<Result<R>>) {
        tokio::time::sleep(self.window).await;

        let controller = CancellationToken::new();

        {
            let mut state = self.state.lock();
            match &mut state.cycle {
                Some(cycle) if cycle.generation == generation => {
                    debug!(window = ?self.window, consumers = cycle.consumers, "sending debounced call");
                    cycle.stage = Stage::InFlight(controller.clone());
                }
                _ => return,
            }
        }

        let outcome = self.send.invoke((), Some(&controller)).await;

        {
            let mut state = self.state.lock();
            if state.cycle.as_ref().is_some_and(|cycle| cycle.generation == generation) {
                state.cycle = None;
            }
        }

        // nobody is listening anymore if every caller left
        let _ = tx.send(outcome);
    }
}

/// A caller waiting on a cycle. Dropping it, however the wait ended, gives up its place.
struct Consumer<R> {
    debouncer: Arc<Debouncer<R>>,
    generation: u64,
    result: SharedResult<R>,
}

impl<R: Clone + Send + Sync + 'static> Consumer<R> {
    async fn wait(self) -> Result<R> {
        self.result.clone().await.unwrap_or(Err(Error::Cancelled))
    }
}

impl<R> Drop for Consumer<R> {
    fn drop(&mut self) {
        let mut guard = self.debouncer.state.lock();
        let state = &mut *guard;

        let Some(cycle) = state.cycle.as_mut().filter(|cycle| cycle.generation == self.generation)
        else {
            return;
        };

        cycle.consumers -= 1;
        if cycle.consumers > 0 {
            return;
        }

        let Some(cycle) = state.cycle.take() else {
            return;
        };

        match cycle.stage {
            Stage::Pending(timer) => {
                debug!("every caller left, clearing debounce timer");
                timer.abort();
            }
            Stage::InFlight(controller) => {
                debug!("every caller left, cancelling debounced call");
                controller.cancel();
            }
        }
    }
}
