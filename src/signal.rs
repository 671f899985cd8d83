//! Cancellation context driven by OS termination signals.
//!
//! A [`SignalContext`] is created once at process entry. A single background
//! task waits for either the parent token to be cancelled or one signal to
//! arrive, cancels the derived token, and exits. Cancellation is cooperative:
//! work observes it through [`SignalContext::cancelled`] or a cloned token.

use std::fmt;
use std::future::Future;
use std::io;
use std::sync::{Arc, OnceLock};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[cfg(test)]
#[path = "signal_tests.rs"]
mod tests;

/// A termination signal the context reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// `SIGINT` (Ctrl+C)
    Interrupt,
    /// `SIGTERM`
    Terminate,
}

impl Signal {
    /// Conventional signal name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Interrupt => "SIGINT",
            Self::Terminate => "SIGTERM",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why the context was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cause {
    /// The owner cancelled the parent token or the context itself.
    Parent,
    /// An OS signal was received.
    Signal(Signal),
}

/// Lifecycle state of the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Not yet cancelled
    Active,
    /// Cancelled; terminal
    Cancelled,
}

/// Cancellation context that also fires on `SIGINT`/`SIGTERM`.
#[derive(Debug)]
pub struct SignalContext {
    token: CancellationToken,
    cause: Arc<OnceLock<Cause>>,
    listener: JoinHandle<()>,
}

impl SignalContext {
    /// Derives a context from `parent` that is also cancelled by OS signals.
    ///
    /// Must be called from within a Tokio runtime. Signal handlers are
    /// registered before this returns, so no signal is missed.
    ///
    /// # Errors
    ///
    /// Returns an error if the signal handlers cannot be registered.
    pub fn with_signals(parent: &CancellationToken) -> io::Result<Self> {
        let source = os_signals()?;
        Ok(Self::with_source(parent, source))
    }

    /// Derives a context whose signal comes from `source`.
    ///
    /// `source` resolving to `None` means no signal will ever arrive; the
    /// context then only follows its parent.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime, since the listener task is
    /// spawned onto the current runtime.
    pub fn with_source<F>(parent: &CancellationToken, source: F) -> Self
    where
        F: Future<Output = Option<Signal>> + Send + 'static,
    {
        let token = parent.child_token();
        let cause = Arc::new(OnceLock::new());
        let listener = tokio::spawn(listen(token.clone(), Arc::clone(&cause), source));

        Self {
            token,
            cause,
            listener,
        }
    }

    /// A token observing this context, for handing to long-running work.
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Completes once the context is cancelled.
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }

    /// Returns true once the context is cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> State {
        if self.is_cancelled() {
            State::Cancelled
        } else {
            State::Active
        }
    }

    /// Why the context was cancelled, or `None` while active.
    #[must_use]
    pub fn cause(&self) -> Option<Cause> {
        self.cause
            .get()
            .copied()
            .or_else(|| self.is_cancelled().then_some(Cause::Parent))
    }

    /// Cancels the context on behalf of its owner.
    pub fn cancel(&self) {
        let _ = self.cause.set(Cause::Parent);
        self.token.cancel();
    }

    /// Cancels the context and waits for the listener task to exit.
    pub async fn close(self) {
        self.cancel();
        if let Err(e) = self.listener.await {
            tracing::debug!("signal listener ended abnormally: {e}");
        }
    }
}

async fn listen<F>(token: CancellationToken, cause: Arc<OnceLock<Cause>>, source: F)
where
    F: Future<Output = Option<Signal>>,
{
    tokio::select! {
        () = token.cancelled() => {
            let _ = cause.set(Cause::Parent);
        }
        signal = source => {
            if let Some(signal) = signal {
                tracing::info!("received {signal}");
                if cause.set(Cause::Signal(signal)).is_ok() {
                    token.cancel();
                }
            } else {
                token.cancelled().await;
                let _ = cause.set(Cause::Parent);
            }
        }
    }
}

#[cfg(unix)]
fn os_signals() -> io::Result<impl Future<Output = Option<Signal>> + Send + 'static> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    Ok(async move {
        tokio::select! {
            received = interrupt.recv() => received.map(|()| Signal::Interrupt),
            received = terminate.recv() => received.map(|()| Signal::Terminate),
        }
    })
}

#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps)] // Mirrors the fallible Unix registration
fn os_signals() -> io::Result<impl Future<Output = Option<Signal>> + Send + 'static> {
    Ok(async {
        tokio::signal::ctrl_c()
            .await
            .ok()
            .map(|()| Signal::Interrupt)
    })
}
