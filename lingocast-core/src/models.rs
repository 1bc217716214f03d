//! Local model catalog and the simulated installer.
//!
//! "Installing" a model does no real work: a timer ticks the progress
//! counter up until it reaches 100, then the status flips to `Installed`.
//! There is no resume and no integrity checking — the panel exists so the
//! UI flow can be exercised before on-device inference ships.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::error::{LingoError, Result};
use crate::ipc::events::ModelProgressEvent;

/// Tick cadence of the simulated download.
const INSTALL_TICK: Duration = Duration::from_millis(200);

/// Progress added per tick, in percent.
const INSTALL_STEP: u8 = 5;

const PROGRESS_CAP: usize = 64;

/// Install state of one catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelStatus {
    Idle,
    Downloading,
    Installed,
}

/// One entry of the local-model panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalModel {
    pub id: String,
    pub name: String,
    /// Display-only size label, e.g. `"145MB"`.
    pub size: String,
    pub description: String,
    pub status: ModelStatus,
    /// Install progress in percent, 0–100.
    pub progress: u8,
}

fn catalog(id: &str, name: &str, size: &str, description: &str, installed: bool) -> LocalModel {
    LocalModel {
        id: id.into(),
        name: name.into(),
        size: size.into(),
        description: description.into(),
        status: if installed {
            ModelStatus::Installed
        } else {
            ModelStatus::Idle
        },
        progress: if installed { 100 } else { 0 },
    }
}

/// Owner of the model panel state.
pub struct ModelLibrary {
    models: Mutex<Vec<LocalModel>>,
    progress_tx: broadcast::Sender<ModelProgressEvent>,
}

impl ModelLibrary {
    /// Library pre-seeded with the default catalog.
    pub fn new() -> Self {
        let (progress_tx, _) = broadcast::channel(PROGRESS_CAP);
        Self {
            models: Mutex::new(vec![
                catalog(
                    "wh-tiny",
                    "Whisper Tiny",
                    "75MB",
                    "Fastest, lower accuracy.",
                    true,
                ),
                catalog(
                    "wh-base",
                    "Whisper Base",
                    "145MB",
                    "Good balance for streaming.",
                    false,
                ),
                catalog(
                    "wh-small",
                    "Whisper Small",
                    "480MB",
                    "High accuracy, requires GPU.",
                    false,
                ),
                catalog(
                    "wh-medium",
                    "Whisper Medium",
                    "1.5GB",
                    "Professional grade accuracy.",
                    false,
                ),
            ]),
            progress_tx,
        }
    }

    /// Snapshot of the catalog in panel order.
    pub fn snapshot(&self) -> Vec<LocalModel> {
        self.models.lock().clone()
    }

    /// Subscribe to live install-progress events.
    pub fn subscribe(&self) -> broadcast::Receiver<ModelProgressEvent> {
        self.progress_tx.subscribe()
    }

    /// Begin a simulated install.
    ///
    /// Flips the model to `Downloading` immediately, then advances progress
    /// on a background task until it reaches 100. Takes the handle by value
    /// so the ticking task can own a clone of the library.
    ///
    /// # Errors
    /// - `LingoError::UnknownModel` for an id not in the catalog.
    /// - `LingoError::ModelBusy` if the model is not `Idle`.
    pub fn begin_install(self: Arc<Self>, id: &str) -> Result<()> {
        {
            let mut models = self.models.lock();
            let model = models
                .iter_mut()
                .find(|m| m.id == id)
                .ok_or_else(|| LingoError::UnknownModel { id: id.into() })?;
            if model.status != ModelStatus::Idle {
                return Err(LingoError::ModelBusy { id: id.into() });
            }
            model.status = ModelStatus::Downloading;
            model.progress = 0;
            let _ = self.progress_tx.send(ModelProgressEvent {
                id: model.id.clone(),
                status: model.status,
                progress: model.progress,
            });
        }

        info!(model = id, "simulated install started");
        let library = self;
        let id = id.to_string();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(INSTALL_TICK);
            // The first tick completes immediately; skip it so each progress
            // step lands a full tick apart.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if library.advance(&id) {
                    break;
                }
            }
        });
        Ok(())
    }

    /// Return an installed model to `Idle`.
    ///
    /// Removing a model that was never installed is a no-op; a download in
    /// flight cannot be removed.
    pub fn remove(&self, id: &str) -> Result<()> {
        let mut models = self.models.lock();
        let model = models
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| LingoError::UnknownModel { id: id.into() })?;
        match model.status {
            ModelStatus::Downloading => Err(LingoError::ModelBusy { id: id.into() }),
            ModelStatus::Idle => Ok(()),
            ModelStatus::Installed => {
                model.status = ModelStatus::Idle;
                model.progress = 0;
                let _ = self.progress_tx.send(ModelProgressEvent {
                    id: model.id.clone(),
                    status: model.status,
                    progress: model.progress,
                });
                info!(model = id, "model removed");
                Ok(())
            }
        }
    }

    /// One progress tick. Returns `true` when the install is finished
    /// (or the model vanished mid-install).
    fn advance(&self, id: &str) -> bool {
        let mut models = self.models.lock();
        let Some(model) = models.iter_mut().find(|m| m.id == id) else {
            warn!(model = id, "install tick for unknown model — stopping");
            return true;
        };
        if model.status != ModelStatus::Downloading {
            // Removed or externally reset mid-install; stop ticking.
            return true;
        }

        model.progress = model.progress.saturating_add(INSTALL_STEP).min(100);
        let done = model.progress >= 100;
        if done {
            model.status = ModelStatus::Installed;
            info!(model = id, "simulated install finished");
        }
        let _ = self.progress_tx.send(ModelProgressEvent {
            id: model.id.clone(),
            status: model.status,
            progress: model.progress,
        });
        done
    }
}

impl Default for ModelLibrary {
    fn default() -> Self {
        Self::new()
    }
}
