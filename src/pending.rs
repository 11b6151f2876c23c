//! Handle for work that may still be waiting on a translation.

use crate::error::{GreeterError, Result};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// The outcome of a greeter operation, either already known or still in flight.
///
/// Awaiting a `Pending` yields the outcome. Dropping it does not cancel the
/// underlying work: a translation that was started still commits its result to
/// the greeter.
#[must_use = "dropping a Pending discards the outcome, not the work"]
pub struct Pending<T> {
    inner: Inner<T>,
}

enum Inner<T> {
    Ready(Option<Result<T>>),
    InFlight(JoinHandle<Result<T>>),
}

// Nothing inside a Pending is ever pinned: T is only moved out of the Option,
// and JoinHandle is Unpin.
impl<T> Unpin for Pending<T> {}

impl<T> Pending<T> {
    pub fn ready(value: T) -> Self {
        Self {
            inner: Inner::Ready(Some(Ok(value))),
        }
    }

    pub fn failed(error: GreeterError) -> Self {
        Self {
            inner: Inner::Ready(Some(Err(error))),
        }
    }

    /// True once the outcome is available without waiting.
    pub fn is_ready(&self) -> bool {
        match &self.inner {
            Inner::Ready(_) => true,
            Inner::InFlight(handle) => handle.is_finished(),
        }
    }
}

impl<T: Send + 'static> Pending<T> {
    /// Run `work` on the current Tokio runtime.
    ///
    /// Outside a runtime nothing is started and the handle resolves with
    /// [`GreeterError::MissingDependency`].
    pub(crate) fn spawn<F>(work: F) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        match Handle::try_current() {
            Ok(runtime) => Self {
                inner: Inner::InFlight(runtime.spawn(work)),
            },
            Err(_) => Self::failed(GreeterError::MissingDependency(
                "no Tokio runtime".to_string(),
            )),
        }
    }

    /// Transform the successful outcome.
    ///
    /// A ready handle is mapped in place. An in-flight handle gets a follow-up
    /// task, so `f` still runs if the returned handle is dropped.
    pub fn then<U, F>(self, f: F) -> Pending<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        match self.inner {
            Inner::Ready(Some(outcome)) => Pending {
                inner: Inner::Ready(Some(outcome.map(f))),
            },
            Inner::Ready(None) => Pending::failed(already_taken()),
            Inner::InFlight(handle) => Pending::spawn(async move { join(handle).await.map(f) }),
        }
    }
}

impl<T> Future for Pending<T> {
    type Output = Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match &mut this.inner {
            Inner::Ready(outcome) => {
                Poll::Ready(outcome.take().unwrap_or_else(|| Err(already_taken())))
            }
            Inner::InFlight(handle) => Pin::new(handle).poll(cx).map(flatten),
        }
    }
}

impl<T> std::fmt::Debug for Pending<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &self.inner {
            Inner::Ready(_) => "ready",
            Inner::InFlight(_) => "in-flight",
        };
        f.debug_struct("Pending").field("state", &state).finish()
    }
}

async fn join<T>(handle: JoinHandle<Result<T>>) -> Result<T> {
    flatten(handle.await)
}

fn flatten<T>(joined: std::result::Result<Result<T>, tokio::task::JoinError>) -> Result<T> {
    match joined {
        Ok(outcome) => outcome,
        Err(e) => Err(GreeterError::TaskFailed(e.to_string())),
    }
}

fn already_taken() -> GreeterError {
    GreeterError::TaskFailed("outcome already taken".to_string())
}
