//! The item catalog: the per-session list of curatable artifacts.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, TunekitError};

use super::item::{DataItem, ItemKind};

/// An item as written by the capture tool.
///
/// `tokens` is read here, ahead of the item, so an explicit zero can be told
/// apart from a missing count.
#[derive(Deserialize)]
struct CapturedItem {
    #[serde(flatten)]
    item: DataItem,
    #[serde(default)]
    tokens: Option<u32>,
}

impl CapturedItem {
    fn into_item(self) -> DataItem {
        let mut item = self.item;
        if item.content_hash.is_empty() {
            item.content_hash = item.fingerprint();
        }
        item.token_count = self.tokens.unwrap_or_else(|| item.estimate_tokens());
        item
    }
}

/// Immutable, ordered list of captured artifacts with unique ids.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<DataItem>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids.
    pub fn new(items: Vec<DataItem>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id) {
                return Err(TunekitError::DuplicateItem(item.id));
            }
        }
        Ok(Self { items })
    }

    /// Load a catalog from a JSON array or a JSON Lines file.
    ///
    /// Items captured without a fingerprint or a `tokens` field get one
    /// computed from their content. A recorded count, zero included, is kept.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| TunekitError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let items: Vec<DataItem> = parse_items(&text)?
            .into_iter()
            .map(CapturedItem::into_item)
            .collect();

        tracing::debug!(path = %path.display(), count = items.len(), "loaded catalog");
        Self::new(items)
    }

    /// The sample artifacts shown in the data explorer.
    pub fn demo() -> Self {
        let samples = [
            (1, ItemKind::Code, "React Hook Authentication", "const useAuth = () => { const [user, setUser] = useState(null); useEffect(() => { ... ", "TYPESCRIPT", "2 mins ago"),
            (2, ItemKind::Prompt, "Cyberpunk City Prompt", "A futuristic city with neon lights, rain pouring down, reflecting on the wet pavement...", "PROMPT", "5 mins ago"),
            (3, ItemKind::Code, "Python Data Pipeline", "def process_data(df): return df.dropna().reset_index(drop=True).apply(lambda x: x.strip() if ...", "PYTHON", "12 mins ago"),
            (4, ItemKind::Prompt, "API Documentation Gen", "Generate comprehensive API documentation for a REST endpoint that handles user authentication...", "PROMPT", "18 mins ago"),
            (5, ItemKind::Code, "SQL Query Optimization", "SELECT u.id, u.name, COUNT(o.id) as order_count FROM users u LEFT JOIN orders o ON u.id = o.user_id...", "SQL", "25 mins ago"),
            (6, ItemKind::Prompt, "Machine Learning Explanation", "Explain the concept of gradient descent in machine learning, focusing on how it optimizes...", "PROMPT", "32 mins ago"),
            (7, ItemKind::Code, "Docker Compose Config", "version: '3.8' services: app: build: . ports: - '3000:3000' environment: - NODE_ENV=production...", "YAML", "45 mins ago"),
            (8, ItemKind::Prompt, "Code Review Guidelines", "Review this code for potential performance issues, security vulnerabilities, and best practices...", "PROMPT", "1 hour ago"),
        ];

        let items = samples
            .into_iter()
            .map(|(id, kind, title, content, lang, time)| {
                let item = DataItem::new(id, kind, title, content)
                    .with_language(lang)
                    .with_captured_at(time)
                    .with_source("capture");
                let tokens = item.estimate_tokens();
                let hash = item.fingerprint();
                item.with_tokens(tokens).with_hash(hash)
            })
            .collect();

        Self { items }
    }

    /// Look up an item by id.
    pub fn get(&self, id: u64) -> Option<&DataItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// All items in catalog order.
    pub fn items(&self) -> &[DataItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn parse_items(text: &str) -> Result<Vec<CapturedItem>> {
    let trimmed = text.trim_start();
    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }

    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(TunekitError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_duplicate_ids_rejected() {
        let items = vec![
            DataItem::new(1, ItemKind::Code, "a", "x"),
            DataItem::new(1, ItemKind::Prompt, "b", "y"),
        ];
        assert!(matches!(
            Catalog::new(items),
            Err(TunekitError::DuplicateItem(1))
        ));
    }

    #[test]
    fn test_demo_catalog() {
        let catalog = Catalog::demo();
        assert_eq!(catalog.len(), 8);
        assert_eq!(catalog.get(3).unwrap().language, "PYTHON");
        assert!(catalog.items().iter().all(|i| i.token_count > 0));
        assert!(catalog.get(99).is_none());
    }

    #[test]
    fn test_load_jsonl_fills_fingerprint() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"id": 1, "type": "code", "title": "a", "content": "print(1)"}}"#).unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"id": 2, "type": "prompt", "title": "b", "content": "hi", "tokens": 9}}"#).unwrap();

        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get(1).unwrap().content_hash.starts_with("sha256:"));
        assert_eq!(catalog.get(2).unwrap().token_count, 9);
    }

    #[test]
    fn test_load_keeps_recorded_zero_token_count() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"id": 1, "type": "code", "title": "a", "content": "fn main() {{}}", "tokens": 0}}"#).unwrap();
        writeln!(file, r#"{{"id": 2, "type": "code", "title": "b", "content": "fn main() {{}}"}}"#).unwrap();

        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.get(1).unwrap().token_count, 0);
        assert!(catalog.get(2).unwrap().token_count > 0);
    }

    #[test]
    fn test_load_json_array() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": 5, "type": "prompt", "title": "p", "content": "c", "hash": "h"}}]"#
        )
        .unwrap();

        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.get(5).unwrap().content_hash, "h");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Catalog::load("/nonexistent/catalog.json").unwrap_err();
        assert!(matches!(err, TunekitError::Io { .. }));
    }
}
