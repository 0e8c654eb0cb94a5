//! Dial budget enforcement
//!
//! A blocking dial cannot be interrupted from outside, so the work runs on
//! its own thread and the caller waits on whichever finishes first: the
//! work or the timer. Work that completes after the caller gave up is
//! handed to `on_abandoned` on the worker thread.

use std::thread;
use std::time::Instant;

use crossbeam_channel::{after, bounded, select};

use crate::error::{self, Result};

/// Run `work` until `deadline`. Without a deadline it runs inline.
///
/// `work` receives the deadline so it can arm socket timeouts. A deadline
/// that has already passed fails with a timeout and `work` never starts.
pub(crate) fn race<T, W, A>(deadline: Option<Instant>, work: W, on_abandoned: A) -> Result<T>
where
    T: Send + 'static,
    W: FnOnce(Option<Instant>) -> Result<T> + Send + 'static,
    A: FnOnce(T) + Send + 'static,
{
    let Some(deadline) = deadline else {
        return work(None);
    };
    if deadline.saturating_duration_since(Instant::now()).is_zero() {
        return Err(error::timeout());
    }

    let (tx, rx) = bounded::<Result<T>>(1);

    thread::Builder::new()
        .name("tunnelchain-dial".into())
        .spawn(move || {
            let outcome = work(Some(deadline));
            if let Err(crossbeam_channel::SendError(late)) = tx.send(outcome) {
                match late {
                    Ok(value) => {
                        tracing::debug!("dial finished after its budget, discarding result");
                        on_abandoned(value);
                    }
                    Err(e) => tracing::trace!("abandoned dial failed: {e}"),
                }
            }
        })
        .map_err(error::connect)?;

    let remaining = deadline.saturating_duration_since(Instant::now());
    select! {
        recv(rx) -> outcome => outcome.unwrap_or_else(|_| {
            Err(error::connect("dial worker exited without a result"))
        }),
        recv(after(remaining)) -> _ => Err(error::timeout()),
    }
}
