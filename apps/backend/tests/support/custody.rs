//! Scripted custody client for settlement tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use backend::custody::{
    CustodyClient, CustodyError, SharedCustody, TransferReceipt, TransferRequest,
};
use parking_lot::Mutex;

/// One scripted custody response.
#[derive(Debug, Clone)]
pub enum Planned {
    Succeed { submission_id: Option<String> },
    Transport(String),
    Unavailable(String),
    Rejected(String),
}

impl Planned {
    fn materialize(&self) -> Result<TransferReceipt, CustodyError> {
        match self {
            Planned::Succeed { submission_id } => Ok(TransferReceipt {
                submission_id: submission_id.clone(),
            }),
            Planned::Transport(msg) => Err(CustodyError::Transport(msg.clone())),
            Planned::Unavailable(msg) => Err(CustodyError::Unavailable(msg.clone())),
            Planned::Rejected(msg) => Err(CustodyError::Rejected(msg.clone())),
        }
    }
}

/// Custody double that plays a script, then repeats a fallback outcome.
/// Every request it sees is recorded for assertions.
pub struct MockCustody {
    script: Mutex<VecDeque<Planned>>,
    fallback: Planned,
    calls: Mutex<Vec<TransferRequest>>,
}

impl MockCustody {
    /// Succeeds on every call.
    pub fn succeeding() -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Planned::Succeed {
                submission_id: Some("sub-1".to_string()),
            },
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Fails every call with a transient unavailability.
    pub fn always_unavailable(msg: &str) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Planned::Unavailable(msg.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Plays `script` in order, then falls back to success.
    pub fn scripted(script: Vec<Planned>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            fallback: Planned::Succeed {
                submission_id: Some("sub-1".to_string()),
            },
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn calls(&self) -> Vec<TransferRequest> {
        self.calls.lock().clone()
    }

    pub fn as_shared(self: &Arc<Self>) -> SharedCustody {
        self.clone()
    }
}

#[async_trait]
impl CustodyClient for MockCustody {
    async fn transfer(&self, request: &TransferRequest) -> Result<TransferReceipt, CustodyError> {
        self.calls.lock().push(request.clone());
        let planned = self
            .script
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        planned.materialize()
    }
}
