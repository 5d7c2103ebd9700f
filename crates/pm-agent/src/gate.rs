//! Shared interception-readiness flag.
//!
//! A swarm coordinator owns one [`InterceptGate`] and is the only writer.
//! Members hold [`GateHandle`]s, which are weak: once the coordinator and
//! its gate are gone every handle reads closed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

#[derive(Debug, Default)]
pub struct InterceptGate {
    flag: Arc<AtomicBool>,
}

impl InterceptGate {
    /// A closed gate.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn close(&self) {
        self.flag.store(false, Ordering::Release);
    }

    pub fn is_open(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    pub fn handle(&self) -> GateHandle {
        GateHandle { flag: Arc::downgrade(&self.flag) }
    }
}

/// Read-only view of an [`InterceptGate`].  The default handle is detached
/// and always closed.
#[derive(Clone, Debug, Default)]
pub struct GateHandle {
    flag: Weak<AtomicBool>,
}

impl GateHandle {
    pub fn is_open(&self) -> bool {
        self.flag.upgrade().is_some_and(|f| f.load(Ordering::Acquire))
    }
}
