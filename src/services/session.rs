use std::sync::atomic::{AtomicBool, Ordering};

/// Handle onto the voice session that issued the tool call.
///
/// The session framework owns interruption suppression; the booking tool only
/// asks for it before doing any network I/O.
pub trait InterruptionGate: Send + Sync {
    fn disallow_interruptions(&self);
}

/// Gate used by the HTTP dispatch surface. Over HTTP the dispatcher learns
/// about suppression from the tool schema, so this only logs and records the
/// request against the session id.
#[derive(Debug, Default)]
pub struct DispatchGate {
    session_id: Option<String>,
    disallowed: AtomicBool,
}

impl DispatchGate {
    pub fn new(session_id: Option<String>) -> Self {
        Self {
            session_id,
            disallowed: AtomicBool::new(false),
        }
    }

    pub fn interruptions_disallowed(&self) -> bool {
        self.disallowed.load(Ordering::SeqCst)
    }
}

impl InterruptionGate for DispatchGate {
    fn disallow_interruptions(&self) {
        self.disallowed.store(true, Ordering::SeqCst);
        tracing::debug!(
            session_id = self.session_id.as_deref().unwrap_or("-"),
            "interruptions disallowed for tool call"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_gate_records_call() {
        let gate = DispatchGate::new(Some("room-1".to_string()));
        assert!(!gate.interruptions_disallowed());
        gate.disallow_interruptions();
        assert!(gate.interruptions_disallowed());
    }
}
