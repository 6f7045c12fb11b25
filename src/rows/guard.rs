use std::sync::atomic::{AtomicBool, Ordering};

/// Keeps a row to one fetch at a time.
///
/// Entering is a non-blocking test-and-set. Whoever wins gets a
/// [`RetrievalTicket`], the only way to commit results and the only way to
/// release the guard again.
#[derive(Debug, Default)]
pub struct RetrievalGuard {
    retrieving: AtomicBool,
}

/// Proof that the holder owns the current retrieval, tagged with the
/// generation it was issued for.
#[derive(Debug)]
#[must_use = "a dropped ticket leaves the row stuck in retrieving"]
pub struct RetrievalTicket {
    generation: u64,
}

impl RetrievalTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl RetrievalGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_enter_retrieving(&self, generation: u64) -> Option<RetrievalTicket> {
        self.retrieving
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RetrievalTicket { generation })
    }

    pub fn exit_retrieving(&self, ticket: RetrievalTicket) {
        drop(ticket);
        self.retrieving.store(false, Ordering::Release);
    }

    pub fn is_retrieving(&self) -> bool {
        self.retrieving.load(Ordering::Acquire)
    }
}
