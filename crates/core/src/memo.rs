//! Process-wide memoization of a fallible async initialization
//!
//! [`AsyncMemo`] is the primitive behind both the runtime-config loader and
//! the client factory: the first caller starts the initialization, every
//! concurrent caller joins the same in-flight future, a success is cached
//! for the life of the value, and a failure clears the slot so a later call
//! can retry.

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::future::Future;
use std::sync::Mutex;

type InFlight<T, E> = Shared<BoxFuture<'static, Result<T, E>>>;

enum State<T, E> {
    Idle,
    Loading(InFlight<T, E>),
    Ready(T),
}

/// A memoized async cell with single-flight initialization.
///
/// The error type must be `Clone` because one failed attempt is observed by
/// every caller that joined it.
pub struct AsyncMemo<T, E> {
    state: Mutex<State<T, E>>,
}

impl<T, E> AsyncMemo<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::Idle),
        }
    }

    /// Get the cached value, joining or starting the initialization as needed.
    ///
    /// `init` is invoked only when no value is cached and no attempt is in
    /// flight. A failed attempt is not cached: once its waiters have observed
    /// the error, the next call starts over.
    pub async fn get_or_init<F, Fut>(&self, init: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let in_flight = {
            let mut state = self.state.lock().expect("Failed to acquire memo lock");
            match &*state {
                State::Ready(value) => return Ok(value.clone()),
                State::Loading(shared) => shared.clone(),
                State::Idle => {
                    let shared = init().boxed().shared();
                    *state = State::Loading(shared.clone());
                    shared
                }
            }
        };

        let result = in_flight.clone().await;

        let mut state = self.state.lock().expect("Failed to acquire memo lock");
        // Only the attempt we joined may transition the state; a newer
        // attempt started after a failure must not be clobbered.
        if let State::Loading(current) = &*state {
            if current.ptr_eq(&in_flight) {
                *state = match &result {
                    Ok(value) => State::Ready(value.clone()),
                    Err(_) => State::Idle,
                };
            }
        }

        result
    }

    /// Whether a value has been cached.
    pub fn is_ready(&self) -> bool {
        matches!(
            &*self.state.lock().expect("Failed to acquire memo lock"),
            State::Ready(_)
        )
    }
}

impl<T, E> Default for AsyncMemo<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
