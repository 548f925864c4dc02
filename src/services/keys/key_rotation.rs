
use crate::services::keys::key_error::KeyError;
use crate::services::keys::key_store::KeyStore;
use log::{debug, error, info};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

pub const DEFAULT_ROTATION_INTERVAL: Duration = Duration::from_secs(60);

/// Keeps a [`KeyStore`] in sync with a key provisioning directory.
pub struct KeyRotation {
    store: Arc<KeyStore>,
    directory: PathBuf,
    cancellation: CancellationToken,
    handle: JoinHandle<()>,
}

impl KeyRotation {
    pub async fn start(
        store: Arc<KeyStore>,
        directory: impl Into<PathBuf>,
        cancellation: CancellationToken,
    ) -> Result<Self, KeyError> {
        Self::start_with_interval(store, directory, DEFAULT_ROTATION_INTERVAL, cancellation).await
    }

    /// Loads the directory once and fails if that load fails. Afterwards reloads on every tick
    /// until `cancellation` fires; errors past this point are only logged and the last good key
    /// set stays active.
    pub async fn start_with_interval(
        store: Arc<KeyStore>,
        directory: impl Into<PathBuf>,
        interval: Duration,
        cancellation: CancellationToken,
    ) -> Result<Self, KeyError> {
        let directory = directory.into();
        info!(directory:% = directory.display(), interval:? = interval; "Starting public key rotation");
        reload(store.clone(), directory.clone()).await?;

        let handle = tokio::spawn(maintain(
            store.clone(),
            directory.clone(),
            interval,
            cancellation.clone(),
        ));
        Ok(KeyRotation {
            store,
            directory,
            cancellation,
            handle,
        })
    }

    /// Reloads outside of the regular schedule and reports the outcome to the caller.
    pub async fn reload_now(&self) -> Result<(), KeyError> {
        reload(self.store.clone(), self.directory.clone()).await
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Cancels the loop and waits for it to exit. An in-flight reload is allowed to finish.
    pub async fn stop(self) {
        self.cancellation.cancel();
        if let Err(e) = self.handle.await {
            error!(error:% = e; "Key rotation task ended abnormally");
        }
    }
}

async fn reload(store: Arc<KeyStore>, directory: PathBuf) -> Result<(), KeyError> {
    tokio::task::spawn_blocking(move || store.reload_from_directory(&directory)).await?
}

async fn maintain(store: Arc<KeyStore>, directory: PathBuf, interval: Duration, cancellation: CancellationToken) {
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancellation.cancelled() => break,
            _ = ticker.tick() => {}
        }
        if let Err(e) = reload(store.clone(), directory.clone()).await {
            error!(error:% = e; "Error reloading public keys, keeping the previous key set");
        }
    }
    debug!("Public key rotation stopped");
}
