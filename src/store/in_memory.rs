//! In-memory store for tests and same-process demos.
//!
//! Documents are held as bincode bytes so every push/fetch crosses a real
//! serialization boundary, the same as a remote blob store would impose.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::common::PlayerId;
use crate::opponent::OpponentSetupData;
use crate::snapshot::GameplaySnapshot;

use super::{ChangeListener, RemoteStore, SessionId};

#[derive(Default)]
struct Slots {
    setup: HashMap<(String, PlayerId), Vec<u8>>,
    snapshot: HashMap<(String, PlayerId), Vec<u8>>,
}

/// Shared-memory [`RemoteStore`]. Cloning shares the underlying documents.
#[derive(Clone, Default)]
pub struct MemoryStore {
    slots: Arc<Mutex<Slots>>,
    notify: Arc<Notify>,
    /// When set, fetches fail; used to exercise disconnect handling.
    offline: Arc<Mutex<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the backend becoming unreachable (or reachable again).
    pub fn set_offline(&self, offline: bool) {
        *self.offline.lock().unwrap() = offline;
        self.notify.notify_waiters();
    }

    fn check_online(&self) -> anyhow::Result<()> {
        if *self.offline.lock().unwrap() {
            return Err(anyhow::anyhow!("store unreachable"));
        }
        Ok(())
    }
}

struct MemoryListener {
    notify: Arc<Notify>,
}

#[async_trait]
impl ChangeListener for MemoryListener {
    async fn changed(&mut self) -> anyhow::Result<()> {
        self.notify.notified().await;
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn push_setup(
        &self,
        session: &SessionId,
        player: PlayerId,
        setup: &OpponentSetupData,
    ) -> anyhow::Result<()> {
        self.check_online()?;
        let bytes = bincode::serialize(setup)?;
        self.slots
            .lock()
            .unwrap()
            .setup
            .insert((session.0.clone(), player), bytes);
        self.notify.notify_waiters();
        Ok(())
    }

    async fn fetch_setup(
        &self,
        session: &SessionId,
        player: PlayerId,
    ) -> anyhow::Result<Option<OpponentSetupData>> {
        self.check_online()?;
        let bytes = {
            let slots = self.slots.lock().unwrap();
            slots.setup.get(&(session.0.clone(), player)).cloned()
        };
        bytes
            .map(|b| bincode::deserialize(&b).map_err(Into::into))
            .transpose()
    }

    async fn push_snapshot(
        &self,
        session: &SessionId,
        player: PlayerId,
        snapshot: &GameplaySnapshot,
    ) -> anyhow::Result<()> {
        self.check_online()?;
        let bytes = bincode::serialize(snapshot)?;
        self.slots
            .lock()
            .unwrap()
            .snapshot
            .insert((session.0.clone(), player), bytes);
        self.notify.notify_waiters();
        Ok(())
    }

    async fn fetch_snapshot(
        &self,
        session: &SessionId,
        player: PlayerId,
    ) -> anyhow::Result<Option<GameplaySnapshot>> {
        self.check_online()?;
        let bytes = {
            let slots = self.slots.lock().unwrap();
            slots.snapshot.get(&(session.0.clone(), player)).cloned()
        };
        bytes
            .map(|b| bincode::deserialize(&b).map_err(Into::into))
            .transpose()
    }

    async fn subscribe(
        &self,
        _session: &SessionId,
        _player: PlayerId,
    ) -> anyhow::Result<Box<dyn ChangeListener>> {
        Ok(Box::new(MemoryListener {
            notify: Arc::clone(&self.notify),
        }))
    }
}
