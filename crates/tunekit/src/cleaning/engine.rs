//! Sequential batch cleaning.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;

use crate::catalog::DataItem;
use crate::error::{Result, TunekitError};
use crate::llm::{CleanRequest, CurationProvider};

use super::options::{BatchConfig, CleaningOptions};
use super::progress::{Progress, run_ticker};
use super::result::{BatchRun, ProcessedItem, interpret_reply};

/// Runs every item of a working set through the cleaning call, one at a
/// time and in order.
///
/// Rate-limit and quota errors abort the run; any other failure keeps the
/// item's original content with a fallback score. Only one run may be in
/// flight per engine.
pub struct BatchEngine {
    provider: Arc<dyn CurationProvider>,
    config: BatchConfig,
    running: AtomicBool,
    progress: Progress,
}

/// Clears the running flag when the run ends, however it ends.
struct RunGuard<'a>(&'a AtomicBool);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl BatchEngine {
    pub fn new(provider: Arc<dyn CurationProvider>, config: BatchConfig) -> Self {
        Self {
            provider,
            config,
            running: AtomicBool::new(false),
            progress: Progress::new(),
        }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Handle on this engine's progress; stays valid across runs.
    pub fn progress(&self) -> Progress {
        self.progress.clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Clean `items` in order.
    ///
    /// Fails with [`TunekitError::NoData`] for an empty working set,
    /// [`TunekitError::BatchInProgress`] if a run is already active and
    /// [`TunekitError::BatchAborted`] on a fatal service error. Progress
    /// reads 100 once this returns, whatever the outcome.
    pub fn run(&self, items: &[DataItem], options: &CleaningOptions) -> Result<BatchRun> {
        if items.is_empty() {
            return Err(TunekitError::NoData("No items selected".to_string()));
        }

        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| TunekitError::BatchInProgress)?;
        let _guard = RunGuard(&self.running);

        tracing::info!(
            items = items.len(),
            provider = self.provider.name(),
            "starting batch run"
        );
        self.progress.reset();

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let outcome = thread::scope(|scope| {
            let progress = self.progress.clone();
            let tick = self.config.progress_tick();
            let (step, cap) = (self.config.progress_step, self.config.progress_cap);
            scope.spawn(move || run_ticker(&progress, &stop_rx, tick, step, cap));

            let outcome = self.process_all(items, options);
            drop(stop_tx);
            outcome
        });
        self.progress.complete();

        let processed = outcome?;
        let run = BatchRun::new(processed, items.len(), options.clone());
        tracing::info!(
            processed = run.summary.processed,
            avg_quality = run.summary.avg_quality_score,
            "batch run complete"
        );
        Ok(run)
    }

    fn process_all(
        &self,
        items: &[DataItem],
        options: &CleaningOptions,
    ) -> Result<Vec<ProcessedItem>> {
        let delay = self.config.inter_item_delay();
        let mut processed = Vec::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            if index > 0 && !delay.is_zero() {
                thread::sleep(delay);
            }

            let request = CleanRequest::from_item(item, options);
            match self.provider.clean(&request) {
                Ok(reply) => {
                    let result = interpret_reply(item, &reply);
                    tracing::debug!(id = item.id, quality = result.quality_score, "cleaned item");
                    processed.push(result);
                }
                Err(err) if err.is_fatal() => {
                    tracing::warn!(
                        id = item.id,
                        completed = processed.len(),
                        error = %err,
                        "aborting batch run"
                    );
                    return Err(TunekitError::BatchAborted {
                        completed: processed.len(),
                        source: err,
                    });
                }
                Err(err) => {
                    tracing::warn!(id = item.id, error = %err, "cleaning failed, keeping original");
                    processed.push(ProcessedItem::fallback(item));
                }
            }
        }

        Ok(processed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ItemKind;
    use crate::llm::{MockProvider, ServiceError};

    fn items(titles: &[&str]) -> Vec<DataItem> {
        titles
            .iter()
            .enumerate()
            .map(|(i, t)| DataItem::new(i as u64 + 1, ItemKind::Code, *t, format!("{} body", t)))
            .collect()
    }

    fn engine(provider: MockProvider) -> BatchEngine {
        BatchEngine::new(Arc::new(provider), BatchConfig::immediate())
    }

    #[test]
    fn test_empty_working_set() {
        let engine = engine(MockProvider::new());
        let result = engine.run(&[], &CleaningOptions::default());

        assert!(matches!(result, Err(TunekitError::NoData(_))));
        assert!(!engine.is_running());
    }

    #[test]
    fn test_run_preserves_order_and_averages() {
        let provider = MockProvider::new()
            .with_clean_score("a", 80)
            .with_clean_score("b", 60)
            .with_clean_score("c", 100);
        let engine = engine(provider);

        let run = engine
            .run(&items(&["a", "b", "c"]), &CleaningOptions::default())
            .unwrap();

        let ids: Vec<u64> = run.items.iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(run.summary.total, 3);
        assert_eq!(run.summary.processed, 3);
        assert_eq!(run.summary.avg_quality_score, 80);
        assert_eq!(engine.progress().percent(), 100);
    }

    #[test]
    fn test_non_fatal_failure_keeps_original() {
        let provider = MockProvider::new().with_clean_failure(
            "b",
            ServiceError::Unavailable {
                status: 500,
                message: "boom".to_string(),
            },
        );
        let engine = engine(provider);

        let run = engine
            .run(&items(&["a", "b", "c"]), &CleaningOptions::default())
            .unwrap();
        let failed = run.get(2).unwrap();

        assert_eq!(run.items.len(), 3);
        assert_eq!(failed.cleaned_content, "b body");
        assert_eq!(failed.quality_score, 50);
        assert_eq!(failed.changes, vec!["Processing failed - kept original"]);
    }

    #[test]
    fn test_fatal_failure_aborts() {
        let provider = Arc::new(
            MockProvider::new().with_clean_failure("b", ServiceError::PaymentRequired),
        );
        let engine = BatchEngine::new(provider.clone(), BatchConfig::immediate());

        let result = engine.run(&items(&["a", "b", "c"]), &CleaningOptions::default());

        match result {
            Err(TunekitError::BatchAborted { completed, source }) => {
                assert_eq!(completed, 1);
                assert_eq!(source, ServiceError::PaymentRequired);
            }
            other => panic!("expected abort, got {:?}", other.map(|r| r.summary)),
        }
        assert_eq!(provider.calls(), vec!["clean:a", "clean:b"]);
        assert_eq!(engine.progress().percent(), 100);
        assert!(!engine.is_running());
    }

    #[test]
    fn test_concurrent_run_is_rejected() {
        let engine = engine(MockProvider::new());
        engine.running.store(true, Ordering::Release);

        let result = engine.run(&items(&["a"]), &CleaningOptions::default());
        assert!(matches!(result, Err(TunekitError::BatchInProgress)));
    }

    #[test]
    fn test_progress_stays_below_100_while_running_with_oversized_cap() {
        let config = BatchConfig {
            inter_item_delay_ms: 40,
            progress_tick_ms: 1,
            progress_step: 50,
            progress_cap: 250,
        };
        let engine = BatchEngine::new(Arc::new(MockProvider::new()), config);
        let progress = engine.progress();
        let working_set = items(&["a", "b", "c", "d"]);

        let max_seen = thread::scope(|s| {
            let worker = s.spawn(|| engine.run(&working_set, &CleaningOptions::default()));
            let mut max_seen = 0;
            while !worker.is_finished() {
                // 100 is only ever written by the final `complete`
                let percent = progress.percent();
                if percent != 100 {
                    max_seen = max_seen.max(percent);
                }
                thread::sleep(std::time::Duration::from_millis(1));
            }
            worker.join().unwrap().unwrap();
            max_seen
        });

        assert!(max_seen <= 99, "progress reached {} mid-run", max_seen);
        assert_eq!(progress.percent(), 100);
    }

    #[test]
    fn test_engine_is_reusable() {
        let engine = engine(MockProvider::new());
        let options = CleaningOptions::default();

        engine.run(&items(&["a"]), &options).unwrap();
        let second = engine.run(&items(&["a", "b"]), &options).unwrap();
        assert_eq!(second.summary.total, 2);
    }
}
