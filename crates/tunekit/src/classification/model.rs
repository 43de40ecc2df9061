//! Classification metadata attached to an artifact.

use serde::{Deserialize, Serialize};

/// Convert a 0-10 wire score to the canonical 0-100 scale.
pub fn from_ten_point(score: f64) -> u8 {
    (score.clamp(0.0, 10.0) * 10.0).round() as u8
}

/// Clamp a 0-100 score reported by the cleaning call.
pub fn clamp_percent(score: f64) -> u8 {
    score.clamp(0.0, 100.0).round() as u8
}

/// How involved a prompt is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    Moderate,
    Complex,
}

impl std::str::FromStr for Complexity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(Complexity::Simple),
            "moderate" => Ok(Complexity::Moderate),
            "complex" => Ok(Complexity::Complex),
            _ => Err(format!("Unknown complexity: {}", s)),
        }
    }
}

/// AI-generated metadata for one artifact.
///
/// `quality_score` is on the canonical 0-100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub category: String,
    pub quality_score: u8,
    pub tags: Vec<String>,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<Complexity>,
}

impl Classification {
    pub fn new(category: impl Into<String>, quality_score: u8, summary: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            quality_score: quality_score.min(100),
            tags: Vec::new(),
            summary: summary.into(),
            language: None,
            domain: None,
            complexity: None,
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_complexity(mut self, complexity: Complexity) -> Self {
        self.complexity = Some(complexity);
        self
    }

    /// The first `n` tags, as shown in compact views.
    pub fn top_tags(&self, n: usize) -> &[String] {
        &self.tags[..self.tags.len().min(n)]
    }
}

/// Classification as returned by the model, before scale conversion.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationPayload {
    pub category: String,
    pub quality_score: f64,
    pub tags: Vec<String>,
    pub summary: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub complexity: Option<String>,
}

impl ClassificationPayload {
    /// Convert to the canonical scale. An unrecognized complexity is dropped.
    pub fn into_classification(self) -> Classification {
        Classification {
            category: self.category,
            quality_score: from_ten_point(self.quality_score),
            tags: self.tags,
            summary: self.summary,
            language: self.language,
            domain: self.domain,
            complexity: self.complexity.and_then(|c| c.parse().ok()),
        }
    }
}
