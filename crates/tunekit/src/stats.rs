//! Statistics over the current selection.
//!
//! Quality figures come only from real scores: the latest batch run when it
//! covers an item, otherwise the item's classification. Items with neither
//! are counted as unscored.

use std::collections::HashMap;
use std::ops::RangeInclusive;

use serde::Serialize;

use crate::catalog::{DataItem, ItemKind};
use crate::classification::ClassificationStore;
use crate::cleaning::BatchRun;

/// Label and count of one histogram bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub label: String,
    pub count: usize,
}

impl Bucket {
    fn new(label: &str, count: usize) -> Self {
        Self {
            label: label.to_string(),
            count,
        }
    }
}

/// Summary of a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionStats {
    pub total_items: usize,
    pub total_tokens: u64,
    pub avg_tokens: u64,
    pub code_count: usize,
    pub prompt_count: usize,
    /// Rounded mean over scored items; `None` when nothing is scored.
    pub avg_quality: Option<u8>,
    pub scored: usize,
    pub unscored: usize,
    pub quality_distribution: Vec<Bucket>,
    pub token_distribution: Vec<Bucket>,
    pub language_distribution: Vec<Bucket>,
    pub source_distribution: Vec<Bucket>,
}

impl SelectionStats {
    pub fn compute(
        selection: &[DataItem],
        run: Option<&BatchRun>,
        classifications: &ClassificationStore,
    ) -> Self {
        let total_tokens: u64 = selection.iter().map(|i| u64::from(i.token_count)).sum();
        let avg_tokens = if selection.is_empty() {
            0
        } else {
            (total_tokens as f64 / selection.len() as f64).round() as u64
        };
        let code_count = selection.iter().filter(|i| i.kind == ItemKind::Code).count();

        let scores: Vec<u8> = selection
            .iter()
            .filter_map(|item| {
                run.and_then(|r| r.get(item.id))
                    .map(|p| p.quality_score)
                    .or_else(|| classifications.get(item.id).map(|c| c.quality_score))
            })
            .collect();
        let avg_quality = (!scores.is_empty()).then(|| {
            let sum: u32 = scores.iter().map(|s| u32::from(*s)).sum();
            (f64::from(sum) / scores.len() as f64).round() as u8
        });

        Self {
            total_items: selection.len(),
            total_tokens,
            avg_tokens,
            code_count,
            prompt_count: selection.len() - code_count,
            avg_quality,
            scored: scores.len(),
            unscored: selection.len() - scores.len(),
            quality_distribution: quality_buckets(&scores),
            token_distribution: token_buckets(selection),
            language_distribution: breakdown(selection.iter().map(|i| i.language.as_str())),
            source_distribution: breakdown(selection.iter().map(|i| i.source.as_str())),
        }
    }
}

fn quality_buckets(scores: &[u8]) -> Vec<Bucket> {
    let count = |range: RangeInclusive<u8>| scores.iter().filter(|s| range.contains(*s)).count();
    vec![
        Bucket::new("90-100", count(90..=100)),
        Bucket::new("80-89", count(80..=89)),
        Bucket::new("70-79", count(70..=79)),
        Bucket::new("60-69", count(60..=69)),
        Bucket::new("<60", count(0..=59)),
    ]
}

/// Upper bounds are inclusive: 100 tokens lands in `0-100`.
fn token_buckets(selection: &[DataItem]) -> Vec<Bucket> {
    let mut counts = [0usize; 4];
    for item in selection {
        let index = match item.token_count {
            0..=100 => 0,
            101..=500 => 1,
            501..=1000 => 2,
            _ => 3,
        };
        counts[index] += 1;
    }
    vec![
        Bucket::new("0-100", counts[0]),
        Bucket::new("100-500", counts[1]),
        Bucket::new("500-1000", counts[2]),
        Bucket::new("1000+", counts[3]),
    ]
}

/// Count per non-empty label, most frequent first, ties by label.
fn breakdown<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<Bucket> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels.map(str::trim).filter(|l| !l.is_empty()) {
        *counts.entry(label).or_default() += 1;
    }

    let mut buckets: Vec<Bucket> = counts
        .into_iter()
        .map(|(label, count)| Bucket::new(label, count))
        .collect();
    buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    buckets
}
