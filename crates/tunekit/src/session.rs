//! The curation session: one catalog, one selection and everything derived
//! from it.

use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard, TryLockError};

use crate::assistant::{AssistantAction, Conversation};
use crate::catalog::{Catalog, DataItem};
use crate::classification::{Classification, ClassificationClient, ClassificationStore};
use crate::cleaning::{BatchEngine, BatchRun, CleaningOptions, Progress};
use crate::config::{ExportConfig, StudioConfig};
use crate::error::{Result, TunekitError};
use crate::export::{self, ExportArtifact, ExportFormat};
use crate::llm::CurationProvider;
use crate::selection::SelectionStore;
use crate::stats::SelectionStats;

#[derive(Debug, Clone)]
struct LatestRun {
    run: BatchRun,
    generation: u64,
}

/// Returns the conversation to idle if the provider call unwinds.
struct PendingReply<'a> {
    conversation: &'a Mutex<Conversation>,
    answered: bool,
}

impl Drop for PendingReply<'_> {
    fn drop(&mut self) {
        if !self.answered {
            self.conversation
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .fail();
        }
    }
}

/// Shared state of a curation session.
///
/// The session is `Send + Sync`; share it behind an [`Arc`]. Selection
/// changes are serialized by the [`SelectionStore`]. Batch runs are
/// serialized by a session lock held from discarding the previous run until
/// the new one is stored. No data lock is held while the provider is being
/// called.
pub struct CurationSession {
    catalog: Catalog,
    selection: SelectionStore,
    provider: Arc<dyn CurationProvider>,
    classifier: ClassificationClient,
    classifications: RwLock<ClassificationStore>,
    engine: BatchEngine,
    /// Held from clearing the previous run until the new one is published.
    batch_lock: Mutex<()>,
    latest_run: RwLock<Option<LatestRun>>,
    conversation: Mutex<Conversation>,
    export_defaults: ExportConfig,
}

impl CurationSession {
    /// Create a session with the default configuration.
    pub fn new(catalog: Catalog, provider: Arc<dyn CurationProvider>) -> Self {
        Self::with_config(catalog, provider, &StudioConfig::default())
    }

    pub fn with_config(
        catalog: Catalog,
        provider: Arc<dyn CurationProvider>,
        config: &StudioConfig,
    ) -> Self {
        Self {
            catalog,
            selection: SelectionStore::new(),
            classifier: ClassificationClient::new(provider.clone()),
            engine: BatchEngine::new(provider.clone(), config.batch.clone()),
            batch_lock: Mutex::new(()),
            provider,
            classifications: RwLock::new(ClassificationStore::new()),
            latest_run: RwLock::new(None),
            conversation: Mutex::new(Conversation::new()),
            export_defaults: config.export.clone(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Handle on the session's selection.
    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn export_defaults(&self) -> &ExportConfig {
        &self.export_defaults
    }

    fn item(&self, id: u64) -> Result<&DataItem> {
        self.catalog.get(id).ok_or(TunekitError::UnknownItem(id))
    }

    // Selection

    /// Select a catalog item. Returns `true` if it was not selected before.
    pub fn select(&self, id: u64) -> Result<bool> {
        let item = self.item(id)?;
        Ok(self.selection.add(item.clone()))
    }

    /// Deselect a catalog item. Returns `true` if it was selected before.
    pub fn deselect(&self, id: u64) -> Result<bool> {
        self.item(id)?;
        Ok(self.selection.remove(id))
    }

    /// Flip membership of a catalog item. Returns the new state.
    pub fn toggle(&self, id: u64) -> Result<bool> {
        let item = self.item(id)?;
        Ok(self.selection.toggle(item.clone()))
    }

    /// Select every catalog item, in catalog order.
    pub fn select_all(&self) {
        for item in self.catalog.items() {
            self.selection.add(item.clone());
        }
    }

    pub fn clear_selection(&self) {
        self.selection.clear();
    }

    /// Selected items in selection order.
    pub fn selected(&self) -> Vec<DataItem> {
        self.selection.list()
    }

    // Classification

    fn classifications(&self) -> RwLockReadGuard<'_, ClassificationStore> {
        self.classifications.read().unwrap_or_else(|e| e.into_inner())
    }

    fn classifications_mut(&self) -> RwLockWriteGuard<'_, ClassificationStore> {
        self.classifications.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Classify one catalog item and attach the result.
    ///
    /// On failure the item's previous classification, if any, is kept.
    pub fn classify(&self, id: u64) -> Result<Classification> {
        let item = self.item(id)?;
        let classification = self.classifier.classify(item)?;
        self.classifications_mut().attach(id, classification.clone());
        Ok(classification)
    }

    pub fn classification(&self, id: u64) -> Option<Classification> {
        self.classifications().get(id).cloned()
    }

    // Batch cleaning

    fn latest_run(&self) -> RwLockReadGuard<'_, Option<LatestRun>> {
        self.latest_run.read().unwrap_or_else(|e| e.into_inner())
    }

    fn latest_run_mut(&self) -> RwLockWriteGuard<'_, Option<LatestRun>> {
        self.latest_run.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Clean the current selection.
    ///
    /// The previous run is discarded as soon as the new one starts; an
    /// aborted run leaves no result behind.
    pub fn run_batch(&self, options: &CleaningOptions) -> Result<BatchRun> {
        let (generation, items) = self.selection.snapshot();
        if items.is_empty() {
            return Err(TunekitError::NoData("No items selected".to_string()));
        }
        let _batch = match self.batch_lock.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(e)) => e.into_inner(),
            Err(TryLockError::WouldBlock) => return Err(TunekitError::BatchInProgress),
        };

        self.latest_run_mut().take();
        let run = self.engine.run(&items, options)?;
        *self.latest_run_mut() = Some(LatestRun {
            run: run.clone(),
            generation,
        });
        Ok(run)
    }

    /// The latest completed run.
    pub fn batch_run(&self) -> Option<BatchRun> {
        self.latest_run().as_ref().map(|latest| latest.run.clone())
    }

    /// Whether the selection changed since the latest run started.
    pub fn batch_is_stale(&self) -> bool {
        self.latest_run()
            .as_ref()
            .is_some_and(|latest| latest.generation != self.selection.generation())
    }

    pub fn is_batch_running(&self) -> bool {
        self.engine.is_running()
    }

    /// Current batch progress, 0-100.
    pub fn progress(&self) -> u8 {
        self.engine.progress().percent()
    }

    /// Handle for polling progress from another thread.
    pub fn progress_handle(&self) -> Progress {
        self.engine.progress()
    }

    // Export

    /// Export the live selection, with cleaned content from the latest run
    /// where available.
    pub fn export(&self, format: ExportFormat, dataset_name: &str) -> Result<ExportArtifact> {
        let selection = self.selected();
        let items = {
            let latest = self.latest_run();
            export::resolve_selection(&selection, latest.as_ref().map(|l| &l.run))
        };
        export::export(&items, format, dataset_name)
    }

    /// Export with the configured default format and dataset name.
    pub fn export_default(&self) -> Result<ExportArtifact> {
        let defaults = &self.export_defaults;
        self.export(defaults.format, &defaults.dataset_name)
    }

    // Assistant

    fn conversation_lock(&self) -> MutexGuard<'_, Conversation> {
        self.conversation.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Ask the assistant about the current selection.
    pub fn ask(&self, action: AssistantAction, message: Option<&str>) -> Result<String> {
        let selection = self.selected();
        let request = self.conversation_lock().begin(&selection, action, message)?;
        let mut pending = PendingReply {
            conversation: &self.conversation,
            answered: false,
        };

        tracing::debug!(%action, items = request.items.len(), "asking assistant");
        let outcome = self.provider.assist(&request);
        pending.answered = true;
        drop(pending);

        let mut conversation = self.conversation_lock();
        match outcome {
            Ok(reply) => {
                conversation.complete(reply.clone());
                Ok(reply)
            }
            Err(err) => {
                conversation.fail();
                tracing::warn!(%action, error = %err, "assistant call failed");
                Err(err.into())
            }
        }
    }

    /// Copy of the conversation so far.
    pub fn conversation(&self) -> Conversation {
        self.conversation_lock().clone()
    }

    pub fn clear_conversation(&self) {
        self.conversation_lock().clear();
    }

    // Statistics

    pub fn stats(&self) -> SelectionStats {
        let selection = self.selected();
        let latest = self.latest_run();
        SelectionStats::compute(
            &selection,
            latest.as_ref().map(|l| &l.run),
            &self.classifications(),
        )
    }
}
