// Colored terminal output for story lists and single stories.
//
// main.rs delegates all terminal formatting here. Stories are numbered from
// 1 in label order; `storyline cluster <n>` takes the same number.

use colored::Colorize;

use crate::cluster::summary::ClusterSummary;
use crate::corpus::Article;
use crate::pipeline::ClusterResult;

/// Words of body text shown per article in the story detail view.
pub const BODY_PREVIEW_WORDS: usize = 100;

/// Display every story (or only featured ones) with keywords and samples.
pub fn display_stories(result: &ClusterResult, featured_only: bool) {
    let stories: Vec<&ClusterSummary> = if featured_only {
        result.featured()
    } else {
        result.summaries.values().collect()
    };

    if stories.is_empty() {
        if featured_only {
            println!("No story is covered by more than one source.");
        } else {
            println!("No stories found.");
        }
        return;
    }

    let heading = if featured_only {
        format!("=== Featured Stories ({} of {}) ===", stories.len(), result.n_clusters())
    } else {
        format!("=== Stories ({} from {} articles) ===", stories.len(), result.labels.len())
    };
    println!("\n{}", heading.bold());
    println!();

    for story in stories {
        println!(
            "  {:>4}. {}  {}",
            story.cluster_label + 1,
            story.headline().bold(),
            colorize_size(story.size()),
        );
        if !story.top_keywords.is_empty() {
            println!("        {} {}", "keywords:".dimmed(), story.top_keywords.join(", "));
        }
        if !story.sources.is_empty() {
            println!("        {} {}", "sources:".dimmed(), story.sources.join(", "));
        }
        for sample in &story.sample_articles {
            println!("        - {}", super::truncate_chars(&sample.title, 90));
        }
        println!();
    }

    let singletons = result.summaries.values().filter(|s| s.size() == 1).count();
    println!(
        "  {} stories, {} single-article, vocabulary of {} terms",
        result.n_clusters(),
        singletons,
        result.vocabulary_size,
    );
}

/// Display one story with every member article and a body preview.
pub fn display_story_detail(story: &ClusterSummary, corpus: &[Article]) {
    println!(
        "\n{}",
        format!("=== Story {}: {} ===", story.cluster_label + 1, story.headline()).bold()
    );
    println!("  Articles: {}", story.size());
    if !story.top_keywords.is_empty() {
        println!("  Keywords: {}", story.top_keywords.join(", "));
    }
    if story.is_featured() {
        println!("  {} covered by {} sources", "*".yellow(), story.sources.len());
    }

    for &index in &story.member_indices {
        let Some(article) = corpus.get(index) else {
            continue;
        };
        println!();
        println!("  {}", article.title.bold());

        let mut meta = Vec::new();
        if !article.source.is_empty() {
            meta.push(article.source.clone());
        }
        if let Some(date) = article.date {
            meta.push(date.format("%Y-%m-%d").to_string());
        }
        if !article.sentiment_category.is_empty() {
            meta.push(article.sentiment_category.clone());
        }
        if !meta.is_empty() {
            println!("  {}", meta.join("  |  ").dimmed());
        }

        println!("  {}", super::truncate_words(&article.body, BODY_PREVIEW_WORDS));
    }
    println!();
}

/// Colorize an article count: bigger stories stand out more.
fn colorize_size(size: usize) -> colored::ColoredString {
    let label = if size == 1 {
        "1 article".to_string()
    } else {
        format!("{size} articles")
    };
    match size {
        1 => label.dimmed(),
        2..=4 => label.normal(),
        5..=9 => label.yellow(),
        _ => label.red().bold(),
    }
}
