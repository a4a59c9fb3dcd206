use rtc_handshake_core::NegotiationFault;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GatherState {
    Idle,
    Gathering,
    Complete,
}

/// Single-fire barrier released when the transport reports the end of candidate gathering.
///
/// Armed once per negotiation round; the first completion of the round releases every
/// waiter, current and future, and later completions are ignored until the next `arm`.
pub struct GatheringGate {
    state: watch::Sender<GatherState>,
    completions: AtomicUsize,
}

impl GatheringGate {
    pub fn new() -> Self {
        Self {
            state: watch::Sender::new(GatherState::Idle),
            completions: AtomicUsize::new(0),
        }
    }

    /// Starts a new round. Must happen before the local description is applied, since that
    /// is what starts gathering.
    pub fn arm(&self) {
        self.state.send_replace(GatherState::Gathering);
    }

    /// Abandons an unreleased round, so a late completion is not counted for it.
    pub fn disarm(&self) {
        self.state.send_if_modified(|state| {
            if *state == GatherState::Gathering {
                *state = GatherState::Idle;
                true
            } else {
                false
            }
        });
    }

    /// Releases the current round. Returns `false` if there was no armed round to release.
    pub fn complete(&self) -> bool {
        let released = self.state.send_if_modified(|state| {
            if *state == GatherState::Gathering {
                *state = GatherState::Complete;
                true
            } else {
                false
            }
        });
        if released {
            self.completions.fetch_add(1, Ordering::SeqCst);
        }
        released
    }

    pub fn is_complete(&self) -> bool {
        *self.state.borrow() == GatherState::Complete
    }

    /// How many rounds have been released so far.
    pub fn completions(&self) -> usize {
        self.completions.load(Ordering::SeqCst)
    }

    pub async fn wait(&self, timeout: Option<Duration>) -> Result<(), NegotiationFault> {
        let mut rx = self.state.subscribe();
        let released = rx.wait_for(|state| *state == GatherState::Complete);

        let outcome = match timeout {
            Some(limit) => tokio::time::timeout(limit, released)
                .await
                .map_err(|_| NegotiationFault::GatheringTimedOut(limit))?,
            None => released.await,
        };
        outcome
            .map(|_| ())
            .map_err(|_| NegotiationFault::TransportGone)
    }
}

impl Default for GatheringGate {
    fn default() -> Self {
        Self::new()
    }
}
