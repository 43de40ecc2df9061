//! Conversion of a working set into a training-data file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::catalog::DataItem;
use crate::cleaning::{BatchRun, ProcessedItem};
use crate::error::{Result, TunekitError};

use super::format::ExportFormat;

/// One exported example: the user turn and the assistant turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportItem {
    pub title: String,
    pub content: String,
}

impl ExportItem {
    /// Resolve the content of `item`, preferring non-empty cleaned content.
    pub fn resolve(item: &DataItem, processed: Option<&ProcessedItem>) -> Self {
        let content = processed
            .map(|p| p.cleaned_content.as_str())
            .filter(|c| !c.is_empty())
            .unwrap_or(&item.content);
        Self {
            title: item.title.clone(),
            content: content.to_string(),
        }
    }
}

impl From<&DataItem> for ExportItem {
    fn from(item: &DataItem) -> Self {
        Self::resolve(item, None)
    }
}

impl From<&ProcessedItem> for ExportItem {
    fn from(processed: &ProcessedItem) -> Self {
        Self::resolve(&processed.item, Some(processed))
    }
}

/// Build the export working set from the live selection.
///
/// Order follows `selection`. An item uses the cleaned content of the run's
/// entry with the same id when there is one; items selected after the run
/// export their raw content and items deselected since are left out.
pub fn resolve_selection(selection: &[DataItem], run: Option<&BatchRun>) -> Vec<ExportItem> {
    selection
        .iter()
        .map(|item| ExportItem::resolve(item, run.and_then(|r| r.get(item.id))))
        .collect()
}

/// A materialized export file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub format: ExportFormat,
    pub records: usize,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// Write the artifact into `dir`, returning the full path.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.file_name);
        fs::write(&path, &self.bytes).map_err(|e| TunekitError::Io {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }

    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRecord<'a> {
    id: String,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct AlpacaRecord<'a> {
    instruction: &'a str,
    input: &'a str,
    output: &'a str,
}

#[derive(Serialize)]
struct ShareGptTurn<'a> {
    from: &'a str,
    value: &'a str,
}

#[derive(Serialize)]
struct ShareGptRecord<'a> {
    id: String,
    conversations: [ShareGptTurn<'a>; 2],
}

fn record_id(index: usize) -> String {
    format!("train_{}", index)
}

/// Serialize `items` in `format` as `<dataset_name>.<ext>`.
///
/// Fails with [`TunekitError::NoData`] on an empty working set and
/// [`TunekitError::InvalidRequest`] on a blank or path-like dataset name;
/// nothing is produced in either case.
pub fn export(
    items: &[ExportItem],
    format: ExportFormat,
    dataset_name: &str,
) -> Result<ExportArtifact> {
    if items.is_empty() {
        return Err(TunekitError::NoData("No data to export".to_string()));
    }
    let name = dataset_name.trim();
    if name.is_empty() {
        return Err(TunekitError::InvalidRequest("Dataset name is required".to_string()));
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(TunekitError::InvalidRequest(format!(
            "Dataset name must not be a path: {}",
            name
        )));
    }

    let bytes = match format {
        ExportFormat::Jsonl => to_jsonl(items)?,
        ExportFormat::Alpaca => to_alpaca(items)?,
        ExportFormat::ShareGpt => to_sharegpt(items)?,
    };

    tracing::info!(%format, records = items.len(), bytes = bytes.len(), "exported dataset");
    Ok(ExportArtifact {
        file_name: format!("{}.{}", name, format.extension()),
        format,
        records: items.len(),
        bytes,
    })
}

/// One compact JSON object per line, joined by `\n` without a trailing newline.
fn to_jsonl(items: &[ExportItem]) -> Result<Vec<u8>> {
    let lines = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::to_string(&ChatRecord {
                id: record_id(i),
                messages: [
                    ChatMessage {
                        role: "user",
                        content: &item.title,
                    },
                    ChatMessage {
                        role: "assistant",
                        content: &item.content,
                    },
                ],
            })
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(lines.join("\n").into_bytes())
}

fn to_alpaca(items: &[ExportItem]) -> Result<Vec<u8>> {
    let records: Vec<AlpacaRecord<'_>> = items
        .iter()
        .map(|item| AlpacaRecord {
            instruction: &item.title,
            input: "",
            output: &item.content,
        })
        .collect();
    Ok(serde_json::to_vec_pretty(&records)?)
}

fn to_sharegpt(items: &[ExportItem]) -> Result<Vec<u8>> {
    let records: Vec<ShareGptRecord<'_>> = items
        .iter()
        .enumerate()
        .map(|(i, item)| ShareGptRecord {
            id: record_id(i),
            conversations: [
                ShareGptTurn {
                    from: "human",
                    value: &item.title,
                },
                ShareGptTurn {
                    from: "gpt",
                    value: &item.content,
                },
            ],
        })
        .collect();
    Ok(serde_json::to_vec_pretty(&records)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ItemKind;
    use crate::cleaning::CleaningOptions;
    use serde_json::Value;

    fn item(id: u64, title: &str, content: &str) -> DataItem {
        DataItem::new(id, ItemKind::Prompt, title, content)
    }

    fn cleaned(item: &DataItem, content: &str) -> ProcessedItem {
        ProcessedItem {
            cleaned_content: content.to_string(),
            changes: Vec::new(),
            quality_score: 90,
            item: item.clone(),
        }
    }

    #[test]
    fn test_jsonl_is_byte_exact() {
        let items = vec![
            ExportItem::from(&item(1, "Hi", "Hello \"there\"")),
            ExportItem::from(&item(2, "Q", "A")),
        ];
        let artifact = export(&items, ExportFormat::Jsonl, "set").unwrap();
        let text = String::from_utf8(artifact.bytes).unwrap();

        assert_eq!(
            text,
            "{\"id\":\"train_0\",\"messages\":[{\"role\":\"user\",\"content\":\"Hi\"},\
             {\"role\":\"assistant\",\"content\":\"Hello \\\"there\\\"\"}]}\n\
             {\"id\":\"train_1\",\"messages\":[{\"role\":\"user\",\"content\":\"Q\"},\
             {\"role\":\"assistant\",\"content\":\"A\"}]}"
        );
        assert_eq!(artifact.file_name, "set.jsonl");
        assert_eq!(artifact.records, 2);
    }

    #[test]
    fn test_alpaca_shape() {
        let items = vec![ExportItem::from(&item(1, "Explain", "Because."))];
        let artifact = export(&items, ExportFormat::Alpaca, "set").unwrap();
        let value: Value = serde_json::from_slice(&artifact.bytes).unwrap();

        assert_eq!(artifact.file_name, "set.json");
        assert_eq!(
            value,
            serde_json::json!([{"instruction": "Explain", "input": "", "output": "Because."}])
        );
    }

    #[test]
    fn test_sharegpt_shape() {
        let items = vec![ExportItem::from(&item(1, "Explain", "Because."))];
        let artifact = export(&items, ExportFormat::ShareGpt, "set").unwrap();
        let value: Value = serde_json::from_slice(&artifact.bytes).unwrap();

        assert_eq!(value[0]["id"], "train_0");
        assert_eq!(value[0]["conversations"][0]["from"], "human");
        assert_eq!(value[0]["conversations"][1]["value"], "Because.");
    }

    #[test]
    fn test_empty_working_set_is_rejected() {
        let result = export(&[], ExportFormat::Jsonl, "set");
        assert!(matches!(result, Err(TunekitError::NoData(_))));
    }

    #[test]
    fn test_path_like_names_are_rejected() {
        let items = vec![ExportItem::from(&item(1, "a", "b"))];
        for name in ["", "  ", "../escape", "a/b", ".."] {
            let result = export(&items, ExportFormat::Jsonl, name);
            assert!(matches!(result, Err(TunekitError::InvalidRequest(_))), "{}", name);
        }
    }

    #[test]
    fn test_empty_cleaned_content_falls_back() {
        let raw = item(1, "t", "raw");
        assert_eq!(ExportItem::resolve(&raw, Some(&cleaned(&raw, ""))).content, "raw");
        assert_eq!(ExportItem::resolve(&raw, Some(&cleaned(&raw, "new"))).content, "new");
    }

    #[test]
    fn test_resolve_selection_follows_live_selection() {
        let a = item(1, "a", "raw a");
        let b = item(2, "b", "raw b");
        let c = item(3, "c", "raw c");
        let run = BatchRun::new(
            vec![cleaned(&a, "clean a"), cleaned(&b, "clean b")],
            2,
            CleaningOptions::default(),
        );

        // b deselected and c selected after the run
        let resolved = resolve_selection(&[c.clone(), a.clone()], Some(&run));

        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].content, "raw c");
        assert_eq!(resolved[1].content, "clean a");
    }

    #[test]
    fn test_write_to_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let items = vec![ExportItem::from(&item(1, "a", "b"))];
        let artifact = export(&items, ExportFormat::Jsonl, "out").unwrap();

        let path = artifact.write_to(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("out.jsonl"));
        assert_eq!(fs::read(&path).unwrap(), artifact.bytes);
    }
}
