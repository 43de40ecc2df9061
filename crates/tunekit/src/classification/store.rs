//! Per-item classification cache and the client that fills it.

use std::collections::HashMap;
use std::sync::Arc;

use crate::catalog::DataItem;
use crate::llm::{ClassifyRequest, CurationProvider, ServiceError};

use super::model::Classification;

/// Classifications keyed by item id.
///
/// A repeat classification replaces the previous one wholesale.
#[derive(Debug, Clone, Default)]
pub struct ClassificationStore {
    entries: HashMap<u64, Classification>,
}

impl ClassificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a classification to an item, returning the one it replaced.
    pub fn attach(&mut self, id: u64, classification: Classification) -> Option<Classification> {
        self.entries.insert(id, classification)
    }

    pub fn get(&self, id: u64) -> Option<&Classification> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.entries.contains_key(&id)
    }

    /// The first `n` tags of an item's classification.
    pub fn top_tags(&self, id: u64, n: usize) -> Vec<String> {
        self.get(id)
            .map(|c| c.top_tags(n).to_vec())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &Classification)> {
        self.entries.iter().map(|(id, c)| (*id, c))
    }
}

/// Classifies one item at a time through a provider.
#[derive(Clone)]
pub struct ClassificationClient {
    provider: Arc<dyn CurationProvider>,
}

impl ClassificationClient {
    pub fn new(provider: Arc<dyn CurationProvider>) -> Self {
        Self { provider }
    }

    /// Classify one item. No fallback is applied: any failure is returned.
    pub fn classify(&self, item: &DataItem) -> Result<Classification, ServiceError> {
        let request = ClassifyRequest::from_item(item);
        tracing::debug!(id = item.id, provider = self.provider.name(), "classifying item");

        match self.provider.classify(&request) {
            Ok(classification) => {
                tracing::info!(
                    id = item.id,
                    category = %classification.category,
                    quality = classification.quality_score,
                    "classified item"
                );
                Ok(classification)
            }
            Err(err) => {
                tracing::warn!(id = item.id, error = %err, "classification failed");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ItemKind;
    use crate::llm::MockProvider;

    #[test]
    fn test_attach_overwrites() {
        let mut store = ClassificationStore::new();
        assert!(store.attach(1, Classification::new("a", 10, "s")).is_none());
        let previous = store.attach(1, Classification::new("b", 20, "s"));

        assert_eq!(previous.unwrap().category, "a");
        assert_eq!(store.get(1).unwrap().category, "b");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_classify_surfaces_failure_without_fallback() {
        let item = DataItem::new(4, ItemKind::Code, "t", "fn x() {}");
        let client = ClassificationClient::new(Arc::new(
            MockProvider::new()
                .with_classify_failure(ServiceError::MalformedResponse("nope".to_string())),
        ));

        let result = client.classify(&item);
        assert!(matches!(result, Err(ServiceError::MalformedResponse(_))));
    }

    #[test]
    fn test_classified_tags_read_back_through_store() {
        let item = DataItem::new(9, ItemKind::Code, "t", "SELECT 1");
        let mut store = ClassificationStore::new();
        let client = ClassificationClient::new(Arc::new(MockProvider::new()));

        store.attach(item.id, client.classify(&item).unwrap());
        assert_eq!(store.top_tags(9, 3), vec!["code", "snippet"]);
        assert!(store.top_tags(10, 3).is_empty());
    }
}
