//! Loadout demo runner.
//!
//! Wires the session, inventory, and sync services against the file-backed
//! local store and in-memory remote adapters, then walks through a short
//! guest session: resolve, hydrate, rearrange, earn xp, flush.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use loadout_client::application::services::{
    hydrate_inventory, GuestService, SessionService, SyncConfig, SyncController,
};
use loadout_client::infrastructure::testing::{InMemoryAuthGateway, InMemoryInventoryRepo};
use loadout_client::infrastructure::{JsonFileStore, SystemClock, SystemRandom};
use loadout_client::ports::outbound::{ClockPort, InventoryRepo, RandomPort};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment overrides (LOADOUT_DATA_DIR, RUST_LOG) if present.
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "loadout=info,loadout_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Loadout");

    let store = match std::env::var("LOADOUT_DATA_DIR") {
        Ok(dir) => JsonFileStore::new(PathBuf::from(dir)),
        Err(_) => JsonFileStore::at_default_location()
            .ok_or_else(|| anyhow::anyhow!("no usable data directory; set LOADOUT_DATA_DIR"))?,
    };
    tracing::info!(root = %store.root().display(), "local store ready");

    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
    let random: Arc<dyn RandomPort> = Arc::new(SystemRandom::new());
    let gateway = Arc::new(InMemoryAuthGateway::new(clock.clone()));
    let repo: Arc<dyn InventoryRepo> = Arc::new(InMemoryInventoryRepo::new());

    let guest = GuestService::new(Arc::new(store), clock.clone(), random.clone());
    let session = SessionService::new(gateway, guest);
    let watcher = session.spawn_identity_watcher();

    // Resolve the persisted session; fall back to a fresh guest.
    let mut state = session.resolve().await?;
    if state.identity().is_none() {
        session.start_guest_session()?;
        state = session.state();
    }
    let identity = state
        .identity()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("session resolution produced no identity"))?;
    tracing::info!(uid = %identity.uid, guest = identity.is_guest, "session active");

    // Hydrate the grid and start the sync controller.
    let (mut grid, version) = hydrate_inventory(repo.as_ref(), &identity.uid).await?;
    tracing::info!(items = grid.count(), ?version, "inventory hydrated");
    let sync = SyncController::spawn(
        repo,
        clock,
        random,
        identity.uid.clone(),
        SyncConfig {
            initial_version: version,
            ..SyncConfig::default()
        },
    );

    // Rearrange a few tools; edits coalesce into one debounced write.
    grid.swap(0, 5)?;
    sync.schedule_save(&grid);
    grid.swap(1, 9)?;
    sync.schedule_save(&grid);

    // Earn some xp for the session profile.
    session.add_xp(25).await?;
    if let Some(profile) = session.state().profile() {
        tracing::info!(level = profile.level(), xp = profile.xp(), "profile updated");
    }

    // Explicit flush before exit.
    sync.save_now(&grid);
    let mut sync_states = sync.subscribe();
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if sync_states.borrow_and_update().last_saved_at.is_some() {
                break;
            }
            if sync_states.changed().await.is_err() {
                break;
            }
        }
    })
    .await
    .ok();
    tracing::info!(state = ?sync.state(), "sync finished");

    sync.shutdown().await;
    watcher.abort();
    tracing::info!("Loadout stopped");
    Ok(())
}
