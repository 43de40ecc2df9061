//! Prompt templates for LLM interactions.

use crate::assistant::{AssistRequest, AssistantAction, AssistantItem};

use super::provider::{ClassifyRequest, CleanRequest};

/// Items shown to the assistant for a full analysis.
const ANALYZE_SAMPLE: usize = 10;
/// Items shown for improvement suggestions and pair generation.
const REVIEW_SAMPLE: usize = 5;
/// Items shown alongside a free-form chat question.
const CHAT_SAMPLE: usize = 3;

/// System prompt for classification.
pub fn classification_system_prompt() -> &'static str {
    r#"You are a data classification expert for AI training datasets. Analyze the given content and return a JSON classification.

For CODE snippets, identify:
- Primary language (typescript, python, javascript, sql, yaml, etc.)
- Category (authentication, api, database, ui-component, algorithm, config, utility, etc.)
- Quality score (1-10 based on completeness, best practices, readability)
- Suggested tags (2-5 relevant tags)

For PROMPTS, identify:
- Domain (coding, creative, analysis, documentation, explanation, etc.)
- Complexity (simple, moderate, complex)
- Quality score (1-10 based on clarity, specificity, actionability)
- Suggested tags (2-5 relevant tags)

Always respond with valid JSON only, no markdown formatting. Use the fields
"category", "language", "domain", "complexity", "qualityScore", "tags" and "summary"
(a one-line summary of the content)."#
}

/// User prompt for classifying one artifact.
pub fn classification_prompt(request: &ClassifyRequest) -> String {
    format!("Classify this {}:\n\n{}", request.kind, request.content)
}

/// System prompt for cleaning, with the advisory options rendered inline.
pub fn cleaning_system_prompt(request: &CleanRequest) -> String {
    let options = &request.options;
    format!(
        r#"You are a data cleaning and formatting AI assistant for machine learning training data.
Your job is to clean and format the given content to make it high-quality training data.

Rules:
1. Fix any syntax errors in code
2. Remove unnecessary comments or debug statements
3. Improve code formatting and indentation
4. For prompts, clarify ambiguous language
5. Remove any PII (emails, names, addresses) if maskPII is enabled
6. Ensure content is well-structured
7. Keep the original intent and meaning intact

Options enabled:
- Mask PII: {}
- Code formatting: {}
- Remove duplicates: {}
- Minimum tokens: {}

Return ONLY a JSON object with these fields:
{{
  "cleanedContent": "the cleaned and formatted content",
  "changes": ["list of changes made"],
  "qualityScore": 0-100
}}"#,
        options.mask_pii, options.code_only, options.remove_duplicates, options.min_tokens
    )
}

/// User prompt for cleaning one artifact.
pub fn cleaning_prompt(request: &CleanRequest) -> String {
    format!(
        "Clean and format this {}:\n\nTitle: {}\n\nContent:\n{}",
        request.kind, request.title, request.content
    )
}

/// System prompt for the dataset assistant.
pub fn assistant_system_prompt() -> &'static str {
    "You are an expert AI training data specialist. Your role is to help users optimize their \
datasets for fine-tuning language models.

You analyze data quality, suggest improvements, identify issues, and help create high-quality \
training datasets.

Be concise, actionable, and specific in your recommendations. Format your responses with clear \
sections using markdown."
}

/// User prompt for an assistant request.
pub fn assistant_prompt(request: &AssistRequest) -> String {
    let items = &request.items;
    match request.action {
        AssistantAction::Analyze => {
            let more = if items.len() > ANALYZE_SAMPLE {
                format!("\n\n... and {} more items", items.len() - ANALYZE_SAMPLE)
            } else {
                String::new()
            };
            format!(
                r#"Analyze this dataset for training quality. Identify:
1. Overall quality assessment
2. Potential issues (duplicates, low-quality items, inconsistencies)
3. Distribution analysis (types, complexity, topics)
4. Specific recommendations for improvement

Dataset ({} items):
{}{}"#,
                items.len(),
                sample_json(items, ANALYZE_SAMPLE),
                more
            )
        }
        AssistantAction::SuggestImprovements => format!(
            r#"Suggest specific improvements for these training data items. For each issue found, provide:
1. The problem
2. Why it matters for training
3. How to fix it

Items to review:
{}"#,
            sample_json(items, REVIEW_SAMPLE)
        ),
        AssistantAction::GeneratePairs => format!(
            r#"Based on these items, suggest additional instruction-response pairs that would complement this dataset. Generate 3-5 high-quality examples that:
1. Fill gaps in the current data
2. Increase diversity
3. Cover edge cases

Current items:
{}"#,
            sample_json(items, REVIEW_SAMPLE)
        ),
        AssistantAction::Chat => format!(
            r#"User has {} items selected in their dataset.

Sample of their data:
{}

User question: {}

Provide helpful, specific advice related to their dataset and question."#,
            items.len(),
            sample_json(items, CHAT_SAMPLE),
            request.user_message.as_deref().unwrap_or_default()
        ),
    }
}

fn sample_json(items: &[AssistantItem], limit: usize) -> String {
    let sample = &items[..items.len().min(limit)];
    serde_json::to_string_pretty(sample).unwrap_or_else(|_| "[]".to_string())
}
