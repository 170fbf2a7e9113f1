use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Result};

use crate::cluster::agglomerative::{EmptyVocabularyPolicy, Linkage, DEFAULT_DISTANCE_THRESHOLD};
use crate::cluster::tfidf::TextField;
use crate::pipeline::{ClusterCount, EngineParams};

/// Default location of the scraper's article cache.
pub const DEFAULT_ARTICLES_PATH: &str = "article_cache.json";

/// Central configuration loaded from environment variables.
///
/// Every setting has a default, so an empty environment is valid. The .env
/// file is loaded at startup via dotenvy; CLI flags override what is here.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Article cache JSON (STORYLINE_ARTICLES_PATH)
    pub articles_path: PathBuf,
    /// Merge cutoff (STORYLINE_DISTANCE_THRESHOLD)
    pub distance_threshold: f64,
    /// threshold | auto | a fixed number (STORYLINE_CLUSTERS)
    pub cluster_count: ClusterCount,
    /// average | complete | single (STORYLINE_LINKAGE)
    pub linkage: Linkage,
    /// body | title-body (STORYLINE_TEXT_FIELD)
    pub text_field: TextField,
    /// Keywords per story (STORYLINE_TOP_KEYWORDS)
    pub top_keywords: usize,
    /// Sample articles per story (STORYLINE_SAMPLE_SIZE)
    pub sample_size: usize,
    /// single-cluster | fail (STORYLINE_EMPTY_VOCABULARY)
    pub empty_vocabulary: EmptyVocabularyPolicy,
    /// Strip English suffixes before counting terms (STORYLINE_STEMMING)
    pub stemming: bool,
}

impl Default for Config {
    fn default() -> Self {
        let params = EngineParams::default();
        Self {
            articles_path: PathBuf::from(DEFAULT_ARTICLES_PATH),
            distance_threshold: DEFAULT_DISTANCE_THRESHOLD,
            cluster_count: params.cluster_count,
            linkage: params.linkage,
            text_field: params.text_field,
            top_keywords: params.top_keywords,
            sample_size: params.sample_size,
            empty_vocabulary: params.empty_vocabulary,
            stemming: params.stemming,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any name -> value lookup. Unset or blank values take the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let distance_threshold: f64 = parse_var(
            "STORYLINE_DISTANCE_THRESHOLD",
            get("STORYLINE_DISTANCE_THRESHOLD"),
            defaults.distance_threshold,
        )?;
        if !distance_threshold.is_finite() || distance_threshold < 0.0 {
            anyhow::bail!(
                "STORYLINE_DISTANCE_THRESHOLD must be a finite number >= 0, got {distance_threshold}"
            );
        }

        let stemming = match get("STORYLINE_STEMMING") {
            None => defaults.stemming,
            Some(raw) => parse_bool(&raw)
                .ok_or_else(|| anyhow!("STORYLINE_STEMMING: expected true or false, got '{raw}'"))?,
        };

        Ok(Self {
            articles_path: get("STORYLINE_ARTICLES_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.articles_path),
            distance_threshold,
            cluster_count: parse_var(
                "STORYLINE_CLUSTERS",
                get("STORYLINE_CLUSTERS"),
                defaults.cluster_count,
            )?,
            linkage: parse_var("STORYLINE_LINKAGE", get("STORYLINE_LINKAGE"), defaults.linkage)?,
            text_field: parse_var(
                "STORYLINE_TEXT_FIELD",
                get("STORYLINE_TEXT_FIELD"),
                defaults.text_field,
            )?,
            top_keywords: parse_var(
                "STORYLINE_TOP_KEYWORDS",
                get("STORYLINE_TOP_KEYWORDS"),
                defaults.top_keywords,
            )?,
            sample_size: parse_var(
                "STORYLINE_SAMPLE_SIZE",
                get("STORYLINE_SAMPLE_SIZE"),
                defaults.sample_size,
            )?,
            empty_vocabulary: parse_var(
                "STORYLINE_EMPTY_VOCABULARY",
                get("STORYLINE_EMPTY_VOCABULARY"),
                defaults.empty_vocabulary,
            )?,
            stemming,
        })
    }

    /// Engine parameters for this configuration.
    pub fn engine_params(&self) -> EngineParams {
        EngineParams {
            distance_threshold: self.distance_threshold,
            cluster_count: self.cluster_count,
            linkage: self.linkage,
            text_field: self.text_field,
            top_keywords: self.top_keywords,
            sample_size: self.sample_size,
            empty_vocabulary: self.empty_vocabulary,
            stemming: self.stemming,
            ..EngineParams::default()
        }
    }
}

fn parse_var<T>(name: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{name}: invalid value '{raw}': {e}")),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_empty_environment_gives_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.articles_path, PathBuf::from("article_cache.json"));
        assert_eq!(config.distance_threshold, 1.5);
        assert_eq!(config.engine_params(), EngineParams::default());
    }

    #[test]
    fn test_values_are_parsed() {
        let config = load(&[
            ("STORYLINE_ARTICLES_PATH", "/tmp/feed.json"),
            ("STORYLINE_DISTANCE_THRESHOLD", "0.8"),
            ("STORYLINE_CLUSTERS", "auto"),
            ("STORYLINE_LINKAGE", "complete"),
            ("STORYLINE_TEXT_FIELD", "title-body"),
            ("STORYLINE_TOP_KEYWORDS", "5"),
            ("STORYLINE_SAMPLE_SIZE", "3"),
            ("STORYLINE_EMPTY_VOCABULARY", "fail"),
            ("STORYLINE_STEMMING", "yes"),
        ])
        .unwrap();
        assert_eq!(config.articles_path, PathBuf::from("/tmp/feed.json"));
        assert_eq!(config.distance_threshold, 0.8);
        assert_eq!(config.cluster_count, ClusterCount::BySize);
        assert_eq!(config.linkage, Linkage::Complete);
        assert_eq!(config.text_field, TextField::TitleAndBody);
        assert_eq!(config.top_keywords, 5);
        assert_eq!(config.sample_size, 3);
        assert_eq!(config.empty_vocabulary, EmptyVocabularyPolicy::Fail);
        assert!(config.stemming);
    }

    #[test]
    fn test_fixed_cluster_count_reaches_engine_params() {
        let config = load(&[("STORYLINE_CLUSTERS", "4")]).unwrap();
        assert_eq!(config.engine_params().cluster_count, ClusterCount::Fixed(4));
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = load(&[("STORYLINE_LINKAGE", "  ")]).unwrap();
        assert_eq!(config.linkage, Linkage::Average);
    }

    #[test]
    fn test_invalid_values_name_the_variable() {
        let err = load(&[("STORYLINE_LINKAGE", "ward")]).unwrap_err();
        assert!(err.to_string().contains("STORYLINE_LINKAGE"));

        let err = load(&[("STORYLINE_DISTANCE_THRESHOLD", "-1")]).unwrap_err();
        assert!(err.to_string().contains("STORYLINE_DISTANCE_THRESHOLD"));

        let err = load(&[("STORYLINE_CLUSTERS", "0")]).unwrap_err();
        assert!(err.to_string().contains("STORYLINE_CLUSTERS"));

        let err = load(&[("STORYLINE_STEMMING", "maybe")]).unwrap_err();
        assert!(err.to_string().contains("STORYLINE_STEMMING"));
    }
}
