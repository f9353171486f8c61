use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use thiserror::Error;
use tokio::sync::broadcast;
use tracing::debug;

use crate::projector::Projector;

/// Change notification emitted by the datastore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    ProjectorChanged(u64),
    ProjectorRemoved(u64),
    ModelChanged { collection: String, id: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("projector {0} is not in the datastore")]
pub struct UnknownProjector(pub u64);

/// Observable state container for server-owned records.
///
/// Owned by the application root and shared via `Arc`. Snapshots are
/// synchronous; mutations notify subscribers through a broadcast channel.
/// Dropping a receiver is the teardown; lagged or dropped subscribers
/// never block writers.
pub struct Datastore {
    projectors: RwLock<BTreeMap<u64, Projector>>,
    models: RwLock<HashMap<(String, u64), serde_json::Value>>,
    update_tx: broadcast::Sender<StoreEvent>,
}

impl Datastore {
    pub fn new() -> Arc<Self> {
        let (update_tx, _) = broadcast::channel(64);
        Arc::new(Self {
            projectors: RwLock::new(BTreeMap::new()),
            models: RwLock::new(HashMap::new()),
            update_tx,
        })
    }

    /// Snapshot of all known projectors, ordered by id.
    pub fn get_projectors(&self) -> Vec<Projector> {
        self.projectors
            .read()
            .expect("datastore lock poisoned")
            .values()
            .cloned()
            .collect()
    }

    pub fn get_projector(&self, id: u64) -> Option<Projector> {
        self.projectors
            .read()
            .expect("datastore lock poisoned")
            .get(&id)
            .cloned()
    }

    /// Replace a projector record with server-delivered state and notify
    /// subscribers. This is the reconciliation path: whatever the client
    /// computed locally is overwritten.
    pub fn apply_projector(&self, projector: Projector) {
        let id = projector.id;
        self.projectors
            .write()
            .expect("datastore lock poisoned")
            .insert(id, projector);
        debug!(projector = id, "applied projector record");
        let _ = self.update_tx.send(StoreEvent::ProjectorChanged(id));
    }

    pub fn remove_projector(&self, id: u64) {
        let removed = self
            .projectors
            .write()
            .expect("datastore lock poisoned")
            .remove(&id)
            .is_some();
        if removed {
            let _ = self.update_tx.send(StoreEvent::ProjectorRemoved(id));
        }
    }

    /// Run `f` against the stored projector under the write lock.
    ///
    /// `f` returns `Some` when it changed the record; subscribers are
    /// notified only then. The mutation is complete before this returns,
    /// so a second intent arriving before a persistence round trip
    /// finishes observes the already-mutated state.
    pub fn with_projector_mut<R>(
        &self,
        id: u64,
        f: impl FnOnce(&mut Projector) -> Option<R>,
    ) -> Result<Option<R>, UnknownProjector> {
        let mut projectors = self.projectors.write().expect("datastore lock poisoned");
        let projector = projectors.get_mut(&id).ok_or(UnknownProjector(id))?;
        let result = f(projector);
        if result.is_some() {
            let _ = self.update_tx.send(StoreEvent::ProjectorChanged(id));
        }
        Ok(result)
    }

    /// Fetch a domain record for slide rendering.
    pub fn get_model(&self, collection: &str, id: u64) -> Option<serde_json::Value> {
        self.models
            .read()
            .expect("datastore lock poisoned")
            .get(&(collection.to_string(), id))
            .cloned()
    }

    pub fn apply_model(&self, collection: impl Into<String>, id: u64, record: serde_json::Value) {
        let collection = collection.into();
        self.models
            .write()
            .expect("datastore lock poisoned")
            .insert((collection.clone(), id), record);
        let _ = self.update_tx.send(StoreEvent::ModelChanged { collection, id });
    }

    /// Subscribe to change notifications. Dropping the receiver
    /// unsubscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.update_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projector::ProjectorElement;

    #[test]
    fn new_store_is_empty() {
        let store = Datastore::new();
        assert!(store.get_projectors().is_empty());
        assert!(store.get_projector(1).is_none());
    }

    #[test]
    fn apply_projector_notifies_subscribers() {
        let store = Datastore::new();
        let mut rx = store.subscribe();

        store.apply_projector(Projector::new(1, "main"));

        assert_eq!(rx.try_recv().unwrap(), StoreEvent::ProjectorChanged(1));
        assert_eq!(store.get_projector(1).unwrap().name, "main");
    }

    #[test]
    fn snapshots_are_ordered_by_id() {
        let store = Datastore::new();
        store.apply_projector(Projector::new(3, "c"));
        store.apply_projector(Projector::new(1, "a"));

        let ids: Vec<u64> = store.get_projectors().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn with_projector_mut_unknown_id_is_an_error() {
        let store = Datastore::new();
        let result = store.with_projector_mut(9, |_| Some(()));
        assert_eq!(result, Err(UnknownProjector(9)));
    }

    #[test]
    fn with_projector_mut_only_notifies_on_change() {
        let store = Datastore::new();
        store.apply_projector(Projector::new(1, "main"));
        let mut rx = store.subscribe();

        let unchanged: Option<()> = store.with_projector_mut(1, |_| None).unwrap();
        assert!(unchanged.is_none());
        assert!(rx.try_recv().is_err());

        store
            .with_projector_mut(1, |projector| {
                projector.add_element(ProjectorElement::slide("topics/topic", 1));
                Some(())
            })
            .unwrap();
        assert_eq!(rx.try_recv().unwrap(), StoreEvent::ProjectorChanged(1));
    }

    #[test]
    fn remove_projector_notifies_once() {
        let store = Datastore::new();
        store.apply_projector(Projector::new(1, "main"));
        let mut rx = store.subscribe();

        store.remove_projector(1);
        store.remove_projector(1);

        assert_eq!(rx.try_recv().unwrap(), StoreEvent::ProjectorRemoved(1));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn models_round_trip_by_collection_and_id() {
        let store = Datastore::new();
        store.apply_model(
            "motions/motion",
            4,
            serde_json::json!({"id": 4, "title": "Budget"}),
        );

        let record = store.get_model("motions/motion", 4).unwrap();
        assert_eq!(record["title"], "Budget");
        assert!(store.get_model("motions/motion", 5).is_none());
        assert!(store.get_model("topics/topic", 4).is_none());
    }

    #[test]
    fn dropped_subscriber_does_not_block_writers() {
        let store = Datastore::new();
        drop(store.subscribe());
        store.apply_projector(Projector::new(1, "main"));
        assert_eq!(store.get_projectors().len(), 1);
    }
}
