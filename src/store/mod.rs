//! Remote data store interface: the minimal consumed surface of whatever
//! backend synchronizes two sessions.
//!
//! The store is treated as eventually consistent and polled; change
//! notifications are a wake-up hint, never a delivery guarantee. Documents
//! are opaque per (session, player) slots: a setup document exchanged once
//! and a progress snapshot overwritten on every push.

use async_trait::async_trait;

use crate::common::PlayerId;
use crate::opponent::OpponentSetupData;
use crate::snapshot::GameplaySnapshot;

pub mod in_memory;

pub use in_memory::MemoryStore;

/// Identifier shared by both sides of a remote game.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl core::fmt::Display for SessionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Change-notification handle returned by [`RemoteStore::subscribe`].
///
/// `changed` resolves when the watched slot may have new content. Spurious
/// wake-ups are allowed; the poll loop always re-fetches.
#[async_trait]
pub trait ChangeListener: Send {
    async fn changed(&mut self) -> anyhow::Result<()>;
}

/// Push/fetch primitive over the shared session state.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Publish `player`'s setup document for the session.
    async fn push_setup(
        &self,
        session: &SessionId,
        player: PlayerId,
        setup: &OpponentSetupData,
    ) -> anyhow::Result<()>;

    /// Fetch `player`'s setup document, if published yet.
    async fn fetch_setup(
        &self,
        session: &SessionId,
        player: PlayerId,
    ) -> anyhow::Result<Option<OpponentSetupData>>;

    /// Overwrite `player`'s progress snapshot.
    async fn push_snapshot(
        &self,
        session: &SessionId,
        player: PlayerId,
        snapshot: &GameplaySnapshot,
    ) -> anyhow::Result<()>;

    /// Fetch `player`'s latest progress snapshot, if any.
    async fn fetch_snapshot(
        &self,
        session: &SessionId,
        player: PlayerId,
    ) -> anyhow::Result<Option<GameplaySnapshot>>;

    /// Subscribe to change notifications for `player`'s slots.
    async fn subscribe(
        &self,
        session: &SessionId,
        player: PlayerId,
    ) -> anyhow::Result<Box<dyn ChangeListener>>;
}
