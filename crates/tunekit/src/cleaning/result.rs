//! Processed items, batch summaries and reply interpretation.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::catalog::DataItem;
use crate::classification::clamp_percent;
use crate::error::{Result, TunekitError};

use super::options::CleaningOptions;

/// Score used when the reply omits one or is free text.
pub const DEFAULT_QUALITY: u8 = 75;
/// Score of an item the model returned nothing for.
pub const UNCHANGED_QUALITY: u8 = 80;
/// Score of an item kept as-is after a failed call.
pub const FALLBACK_QUALITY: u8 = 50;

pub const CHANGE_REFORMATTED: &str = "Content reformatted";
pub const CHANGE_NONE_NEEDED: &str = "No changes needed";
pub const CHANGE_FAILED: &str = "Processing failed - kept original";

/// First `{` through last `}`.
static JSON_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// An item after a cleaning pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedItem {
    #[serde(flatten)]
    pub item: DataItem,

    /// Replaces `item.content` on export.
    pub cleaned_content: String,

    /// Human-readable descriptions of what changed.
    pub changes: Vec<String>,

    /// 0-100.
    pub quality_score: u8,
}

impl ProcessedItem {
    /// The original item kept unchanged after a non-fatal failure.
    pub fn fallback(item: &DataItem) -> Self {
        Self {
            item: item.clone(),
            cleaned_content: item.content.clone(),
            changes: vec![CHANGE_FAILED.to_string()],
            quality_score: FALLBACK_QUALITY,
        }
    }

    pub fn id(&self) -> u64 {
        self.item.id
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CleanPayload {
    #[serde(default)]
    cleaned_content: Option<String>,
    #[serde(default)]
    changes: Option<Vec<String>>,
    #[serde(default)]
    quality_score: Option<f64>,
}

/// Turn a raw cleaning reply into a processed item.
///
/// A reply containing a parseable JSON object is read as a structured
/// result; anything else is taken verbatim as the cleaned content.
pub fn interpret_reply(item: &DataItem, reply: &str) -> ProcessedItem {
    if reply.trim().is_empty() {
        return ProcessedItem {
            item: item.clone(),
            cleaned_content: item.content.clone(),
            changes: vec![CHANGE_NONE_NEEDED.to_string()],
            quality_score: UNCHANGED_QUALITY,
        };
    }

    let payload = JSON_OBJECT
        .find(reply)
        .and_then(|m| serde_json::from_str::<CleanPayload>(m.as_str()).ok());

    match payload {
        Some(payload) => ProcessedItem {
            item: item.clone(),
            cleaned_content: payload
                .cleaned_content
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| item.content.clone()),
            changes: payload.changes.unwrap_or_default(),
            quality_score: payload
                .quality_score
                .map(clamp_percent)
                .unwrap_or(DEFAULT_QUALITY),
        },
        None => ProcessedItem {
            item: item.clone(),
            cleaned_content: reply.to_string(),
            changes: vec![CHANGE_REFORMATTED.to_string()],
            quality_score: DEFAULT_QUALITY,
        },
    }
}

/// Aggregate of one batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    /// Items submitted.
    pub total: usize,
    /// Items that received a result, including fallbacks.
    pub processed: usize,
    /// Rounded mean quality over processed items; 0 when none.
    pub avg_quality_score: u8,
}

impl BatchSummary {
    pub fn from_items(total: usize, items: &[ProcessedItem]) -> Self {
        Self {
            total,
            processed: items.len(),
            avg_quality_score: average_quality(items),
        }
    }
}

/// Arithmetic mean of the quality scores, rounded half away from zero.
pub fn average_quality(items: &[ProcessedItem]) -> u8 {
    if items.is_empty() {
        return 0;
    }
    let sum: u32 = items.iter().map(|i| u32::from(i.quality_score)).sum();
    (f64::from(sum) / items.len() as f64).round() as u8
}

/// A completed batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRun {
    /// Results in working-set order.
    pub items: Vec<ProcessedItem>,
    pub summary: BatchSummary,
    pub options: CleaningOptions,
    pub completed_at: DateTime<Utc>,
}

impl BatchRun {
    pub fn new(items: Vec<ProcessedItem>, total: usize, options: CleaningOptions) -> Self {
        let summary = BatchSummary::from_items(total, &items);
        Self {
            items,
            summary,
            options,
            completed_at: Utc::now(),
        }
    }

    /// The processed entry for an item id.
    pub fn get(&self, id: u64) -> Option<&ProcessedItem> {
        self.items.iter().find(|p| p.id() == id)
    }

    /// Save the run to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| TunekitError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Load a run saved with [`BatchRun::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| TunekitError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ItemKind;

    fn item() -> DataItem {
        DataItem::new(1, ItemKind::Code, "Pipeline", "def f(): pass")
    }

    fn scored(score: u8) -> ProcessedItem {
        ProcessedItem {
            quality_score: score,
            ..ProcessedItem::fallback(&item())
        }
    }

    #[test]
    fn test_structured_reply() {
        let reply = r#"Sure! {"cleanedContent": "def f():\n    pass", "changes": ["Reindented"], "qualityScore": 92} Done."#;
        let processed = interpret_reply(&item(), reply);

        assert_eq!(processed.cleaned_content, "def f():\n    pass");
        assert_eq!(processed.changes, vec!["Reindented"]);
        assert_eq!(processed.quality_score, 92);
    }

    #[test]
    fn test_structured_reply_defaults() {
        let processed = interpret_reply(&item(), r#"{"cleanedContent": "x"}"#);
        assert!(processed.changes.is_empty());
        assert_eq!(processed.quality_score, DEFAULT_QUALITY);
    }

    #[test]
    fn test_empty_cleaned_content_keeps_original() {
        let processed = interpret_reply(&item(), r#"{"cleanedContent": "", "qualityScore": 40}"#);
        assert_eq!(processed.cleaned_content, "def f(): pass");
        assert_eq!(processed.quality_score, 40);
    }

    #[test]
    fn test_unstructured_reply() {
        let processed = interpret_reply(&item(), "def f():\n    pass");
        assert_eq!(processed.cleaned_content, "def f():\n    pass");
        assert_eq!(processed.changes, vec![CHANGE_REFORMATTED]);
        assert_eq!(processed.quality_score, DEFAULT_QUALITY);
    }

    #[test]
    fn test_unparseable_braces_are_unstructured() {
        let reply = "fn main() { println!(\"hi\"); }";
        let processed = interpret_reply(&item(), reply);
        assert_eq!(processed.cleaned_content, reply);
        assert_eq!(processed.changes, vec![CHANGE_REFORMATTED]);
    }

    #[test]
    fn test_empty_reply() {
        let processed = interpret_reply(&item(), "  \n");
        assert_eq!(processed.cleaned_content, "def f(): pass");
        assert_eq!(processed.changes, vec![CHANGE_NONE_NEEDED]);
        assert_eq!(processed.quality_score, UNCHANGED_QUALITY);
    }

    #[test]
    fn test_out_of_range_score_is_clamped() {
        let processed = interpret_reply(&item(), r#"{"qualityScore": 140}"#);
        assert_eq!(processed.quality_score, 100);
    }

    #[test]
    fn test_average_quality() {
        let items = vec![scored(80), scored(60), scored(100)];
        assert_eq!(average_quality(&items), 80);

        let items = vec![scored(75), scored(76)];
        assert_eq!(average_quality(&items), 76);

        assert_eq!(average_quality(&[]), 0);
    }

    #[test]
    fn test_processed_item_serializes_flat() {
        let json = serde_json::to_value(ProcessedItem::fallback(&item())).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["type"], "code");
        assert_eq!(json["cleanedContent"], "def f(): pass");
        assert_eq!(json["qualityScore"], 50);
    }

    #[test]
    fn test_run_save_and_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("run.json");
        let run = BatchRun::new(vec![scored(90)], 1, CleaningOptions::default());

        run.save(&path).unwrap();
        let loaded = BatchRun::load(&path).unwrap();

        assert_eq!(loaded.summary, run.summary);
        assert_eq!(loaded.get(1).unwrap().quality_score, 90);
    }
}
