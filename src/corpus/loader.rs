// Article cache loading.
//
// The scraper writes a JSON object keyed by article URL. Older exports are a
// plain array. Both are accepted, and file order becomes corpus order.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::info;

use super::article::{Article, MissingFieldPolicy, RawArticle};

/// Load and validate every article in a cache file.
pub fn load_articles(path: &Path, policy: MissingFieldPolicy) -> Result<Vec<Article>> {
    if !path.exists() {
        anyhow::bail!(
            "Article cache not found at {}. Point STORYLINE_ARTICLES_PATH or --input at a cache file.",
            path.display()
        );
    }

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read article cache at {}", path.display()))?;

    let articles = parse_articles(&json, policy)
        .with_context(|| format!("Failed to parse article cache at {}", path.display()))?;

    info!(count = articles.len(), path = %path.display(), "Loaded articles");
    Ok(articles)
}

/// Parse cache JSON (keyed object or array) into validated articles.
pub fn parse_articles(json: &str, policy: MissingFieldPolicy) -> Result<Vec<Article>> {
    let value: Value = serde_json::from_str(json)?;

    let records: Vec<(Option<String>, Value)> = match value {
        Value::Object(map) => map.into_iter().map(|(k, v)| (Some(k), v)).collect(),
        Value::Array(items) => items.into_iter().map(|v| (None, v)).collect(),
        other => anyhow::bail!(
            "Expected a JSON object or array of articles, found {}",
            json_kind(&other)
        ),
    };

    records
        .into_iter()
        .enumerate()
        .map(|(index, (key, value))| -> Result<Article> {
            let raw: RawArticle = serde_json::from_value(value)
                .with_context(|| format!("Article record {index} is malformed"))?;
            Ok(raw.validate(index, key.as_deref(), policy)?)
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
