use crate::model::{HandshakePhase, SdpKind};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// The original failure behind a handshake error, passed along without reinterpretation.
///
/// Cheap to clone so the same cause can be both published and returned.
#[derive(Clone)]
pub struct Cause(Arc<anyhow::Error>);

impl Cause {
    pub fn inner(&self) -> &anyhow::Error {
        &self.0
    }

    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        self.0.downcast_ref::<E>()
    }

    pub fn ptr_eq(&self, other: &Cause) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<anyhow::Error> for Cause {
    fn from(err: anyhow::Error) -> Self {
        Self(Arc::new(err))
    }
}

impl From<NegotiationFault> for Cause {
    fn from(fault: NegotiationFault) -> Self {
        Self::from(anyhow::Error::new(fault))
    }
}

impl fmt::Debug for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#}", self.0)
    }
}

impl std::error::Error for Cause {}

/// A failure of one handshake phase. Every variant is both published on the coordinator's
/// error stream and returned to the caller of the failed operation.
#[derive(Debug, Clone, Error)]
pub enum HandshakeError {
    #[error("initiating the handshake failed: {0}")]
    InitiateFailed(Cause),

    #[error("applying the remote answer failed: {0}")]
    AnswerApplyFailed(Cause),

    #[error("joining the handshake failed: {0}")]
    JoinFailed(Cause),
}

impl HandshakeError {
    pub fn cause(&self) -> &Cause {
        match self {
            HandshakeError::InitiateFailed(cause)
            | HandshakeError::AnswerApplyFailed(cause)
            | HandshakeError::JoinFailed(cause) => cause,
        }
    }

    /// Coordinator-side fault behind this error, if the transport was not the one failing.
    pub fn fault(&self) -> Option<&NegotiationFault> {
        self.cause().downcast_ref::<NegotiationFault>()
    }
}

/// Failures detected by the coordinator itself rather than reported by the transport.
#[derive(Debug, Error)]
pub enum NegotiationFault {
    #[error("coordinator is not idle (phase: {0})")]
    NotIdle(HandshakePhase),

    #[error("expected a remote {expected} description, got {actual}")]
    UnexpectedDescription { expected: SdpKind, actual: SdpKind },

    #[error("unsupported description type: {0}")]
    UnsupportedDescription(String),

    #[error("candidate gathering did not complete within {0:?}")]
    GatheringTimedOut(Duration),

    #[error("{operation} did not complete within {after:?}")]
    OperationTimedOut {
        operation: &'static str,
        after: Duration,
    },

    #[error("transport has no local description after negotiation")]
    MissingLocalDescription,

    #[error("transport is gone")]
    TransportGone,
}
