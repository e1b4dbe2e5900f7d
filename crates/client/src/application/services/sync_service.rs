//! Sync controller - debounced reconciliation of the grid with the remote
//! document.
//!
//! The controller runs as a spawned task owned through a handle; commands
//! go in over an unbounded channel and state comes back over a watch
//! channel. Because the task awaits each remote write inline, at most one
//! write is ever in flight - commands arriving mid-write queue up and are
//! coalesced into a single follow-up with the latest snapshot.
//!
//! Failure policy: a failed write is absorbed into
//! [`SyncState::sync_error`] and the snapshot is kept pending; the next
//! trigger (debounce, manual save, or online transition) retries. Nothing
//! here throws past the handle.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use loadout_domain::{SlotGrid, UserId};

use crate::application::dto::InventoryDocument;
use crate::ports::outbound::{ClockPort, InventoryRepo, RandomPort, RepoError};

/// Quiet period before a scheduled save fires.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(2000);

/// Transient sync status, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncState {
    pub is_syncing: bool,
    pub last_saved_at: Option<DateTime<Utc>>,
    pub has_unsaved_changes: bool,
    pub is_online: bool,
    pub sync_error: Option<String>,
    /// Last version reported by the store - observability only, no
    /// conflict resolution (single-writer assumption).
    pub last_seen_version: Option<u64>,
    pub auto_save_enabled: bool,
}

impl Default for SyncState {
    fn default() -> Self {
        Self {
            is_syncing: false,
            last_saved_at: None,
            has_unsaved_changes: false,
            is_online: true,
            sync_error: None,
            last_seen_version: None,
            auto_save_enabled: true,
        }
    }
}

/// Controller tuning; the defaults match production behavior.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub debounce: Duration,
    /// Version seen while hydrating, if a document existed.
    pub initial_version: Option<u64>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce: DEBOUNCE_DELAY,
            initial_version: None,
        }
    }
}

enum Command {
    Schedule(SlotGrid),
    SaveNow(SlotGrid),
    SetOnline(bool),
    SetAutoSave(bool),
    ClearError,
    Shutdown,
}

/// Handle to the sync task.
///
/// Dropping the handle without calling [`SyncController::shutdown`] ends
/// the task on the next channel poll.
pub struct SyncController {
    tx: mpsc::UnboundedSender<Command>,
    state_rx: watch::Receiver<SyncState>,
    task: Option<JoinHandle<()>>,
}

impl SyncController {
    /// Spawn the controller for one user's document.
    pub fn spawn(
        repo: Arc<dyn InventoryRepo>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
        uid: UserId,
        config: SyncConfig,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let state = SyncState {
            last_seen_version: config.initial_version,
            ..SyncState::default()
        };
        let (state_tx, state_rx) = watch::channel(state.clone());
        let worker = SyncWorker {
            repo,
            clock,
            random,
            uid,
            rx,
            state_tx,
            state,
            pending: None,
            deadline: None,
            debounce: config.debounce,
        };
        let task = tokio::spawn(worker.run());
        Self {
            tx,
            state_rx,
            task: Some(task),
        }
    }

    /// Mark the grid dirty and (re)arm the debounce timer.
    ///
    /// Each call cancels the previous timer, coalescing bursts of edits
    /// into one write carrying the latest snapshot.
    pub fn schedule_save(&self, grid: &SlotGrid) {
        let _ = self.tx.send(Command::Schedule(grid.clone()));
    }

    /// Cancel any pending debounce and write immediately.
    pub fn save_now(&self, grid: &SlotGrid) {
        let _ = self.tx.send(Command::SaveNow(grid.clone()));
    }

    /// Report a connectivity transition.
    ///
    /// Going offline suspends scheduled writes (kept pending, not lost);
    /// coming back online with unsaved changes triggers one immediate
    /// attempt.
    pub fn set_online(&self, online: bool) {
        let _ = self.tx.send(Command::SetOnline(online));
    }

    /// Toggle debounced auto-save. Manual [`SyncController::save_now`]
    /// always works.
    pub fn set_auto_save_enabled(&self, enabled: bool) {
        let _ = self.tx.send(Command::SetAutoSave(enabled));
    }

    /// Dismiss the current sync error banner state.
    pub fn clear_error(&self) {
        let _ = self.tx.send(Command::ClearError);
    }

    /// Current sync status snapshot.
    pub fn state(&self) -> SyncState {
        self.state_rx.borrow().clone()
    }

    /// Observe sync status changes.
    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.state_rx.clone()
    }

    /// Stop the task and wait for it to finish.
    pub async fn shutdown(mut self) {
        let _ = self.tx.send(Command::Shutdown);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

/// Hydrate the grid from the remote document.
///
/// A missing document yields the default catalog placement and no version.
pub async fn hydrate_inventory(
    repo: &dyn InventoryRepo,
    uid: &UserId,
) -> Result<(SlotGrid, Option<u64>), RepoError> {
    match repo.load(uid).await? {
        Some(doc) => {
            let version = doc.version;
            tracing::debug!(uid = %uid, version, "hydrated inventory from remote snapshot");
            Ok((doc.into_grid(), Some(version)))
        }
        None => {
            tracing::debug!(uid = %uid, "no remote snapshot; using default placement");
            Ok((loadout_domain::catalog::default_placement(), None))
        }
    }
}

struct SyncWorker {
    repo: Arc<dyn InventoryRepo>,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
    uid: UserId,
    rx: mpsc::UnboundedReceiver<Command>,
    state_tx: watch::Sender<SyncState>,
    state: SyncState,
    /// Latest dirty snapshot awaiting a write.
    pending: Option<SlotGrid>,
    /// Armed debounce deadline, if any.
    deadline: Option<Instant>,
    debounce: Duration,
}

impl SyncWorker {
    async fn run(mut self) {
        loop {
            let fire_at = self.deadline;
            tokio::select! {
                command = self.rx.recv() => {
                    match command {
                        None | Some(Command::Shutdown) => break,
                        Some(command) => self.handle(command).await,
                    }
                }
                _ = async {
                    match fire_at {
                        Some(at) => tokio::time::sleep_until(at).await,
                        // no deadline armed: this branch never completes
                        None => std::future::pending::<()>().await,
                    }
                } => {
                    self.deadline = None;
                    if self.state.is_online {
                        self.flush().await;
                    }
                }
            }
        }
    }

    async fn handle(&mut self, command: Command) {
        match command {
            Command::Schedule(grid) => {
                self.pending = Some(grid);
                self.state.has_unsaved_changes = true;
                if self.state.is_online && self.state.auto_save_enabled {
                    self.deadline = Some(Instant::now() + self.debounce);
                }
                self.publish();
            }
            Command::SaveNow(grid) => {
                self.pending = Some(grid);
                self.deadline = None;
                self.state.has_unsaved_changes = true;
                self.publish();
                self.flush().await;
            }
            Command::SetOnline(online) => {
                if self.state.is_online == online {
                    return;
                }
                self.state.is_online = online;
                if !online {
                    // suspend, keep the pending snapshot
                    self.deadline = None;
                }
                self.publish();
                if online && self.state.has_unsaved_changes {
                    self.flush().await;
                }
            }
            Command::SetAutoSave(enabled) => {
                self.state.auto_save_enabled = enabled;
                if !enabled {
                    self.deadline = None;
                }
                self.publish();
            }
            Command::ClearError => {
                self.state.sync_error = None;
                self.publish();
            }
            Command::Shutdown => unreachable!("handled in run"),
        }
    }

    async fn flush(&mut self) {
        let Some(grid) = self.pending.take() else {
            return;
        };

        let version = self.state.last_seen_version.map_or(1, |v| v + 1);
        let doc = InventoryDocument::from_grid(&grid, self.clock.now(), version);

        self.state.is_syncing = true;
        self.publish();

        let attempt = self.random.gen_uuid();
        tracing::debug!(uid = %self.uid, attempt = %attempt, "writing inventory snapshot");
        match self.repo.save(&self.uid, &doc).await {
            Ok(version) => {
                self.state.is_syncing = false;
                self.state.has_unsaved_changes = false;
                self.state.last_saved_at = Some(self.clock.now());
                self.state.sync_error = None;
                self.state.last_seen_version = Some(version);
                tracing::debug!(uid = %self.uid, attempt = %attempt, version, "snapshot saved");
            }
            Err(err) => {
                // keep the snapshot so the next trigger retries
                self.pending = Some(grid);
                self.state.is_syncing = false;
                self.state.sync_error = Some(err.to_string());
                tracing::warn!(uid = %self.uid, attempt = %attempt, error = %err, "snapshot save failed");
            }
        }
        self.publish();
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.state.clone());
    }
}
