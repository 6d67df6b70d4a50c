//! Change notification for store mutations. Subscribers typically re-run
//! their active query when an event for their scope arrives; a stale pending
//! result is theirs to discard when a newer query supersedes it.

use bookstock_contract::BookAddress;
use tokio::sync::broadcast;
use tracing::debug;

/// Which resource a mutation touched: the whole collection (insert,
/// delete-all) or a single record (update, delete-by-id, sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeScope {
    Collection,
    Item(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub scope: ChangeScope,
}

impl ChangeEvent {
    /// Address of the changed resource, for callers that track addresses.
    pub fn address(&self) -> BookAddress {
        match self.scope {
            ChangeScope::Collection => BookAddress::Collection,
            ChangeScope::Item(id) => BookAddress::Item(id),
        }
    }
}

const CHANNEL_CAPACITY: usize = 64;

/// Broadcast hub scoped to one provider instance. No global registry.
#[derive(Debug)]
pub struct ChangeNotifier {
    sender: broadcast::Sender<ChangeEvent>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    /// Publishes a change. Having no subscribers is not an error.
    pub fn publish(&self, scope: ChangeScope) {
        debug!(?scope, "resource changed");
        let _ = self.sender.send(ChangeEvent { scope });
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}
