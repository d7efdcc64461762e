//! File loading: rulebooks, baselines and corpora.
//!
//! Structured files dispatch on extension: `.json` is JSON, anything else
//! is YAML. Corpora additionally accept `.tsv` (`token<TAB>section<TAB>label`)
//! and plain text, split on whitespace.

use anyhow::{Context, Result};
use folio::{BaselineConfig, RulebookConfig, Token};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::debug;

pub fn load_rulebook(path: &Path) -> Result<RulebookConfig> {
    let book: RulebookConfig = load_document(path)?;
    debug!(path = %path.display(), records = book.rules.len(), "rulebook read");
    Ok(book)
}

pub fn load_baseline(path: &Path) -> Result<BaselineConfig> {
    load_document(path)
}

pub fn load_corpus(path: &Path) -> Result<Vec<Token>> {
    let tokens = match extension(path).as_deref() {
        Some("json" | "yaml" | "yml") => load_document(path)?,
        Some("tsv") => parse_tsv(&read(path)?),
        _ => parse_text(&read(path)?),
    };
    debug!(path = %path.display(), tokens = tokens.len(), "corpus read");
    Ok(tokens)
}

fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = read(path)?;
    if extension(path).as_deref() == Some("json") {
        serde_json::from_str(&content)
            .with_context(|| format!("JSON parse error in \"{}\"", path.display()))
    } else {
        // Default to YAML (handles .yaml and .yml)
        serde_yaml::from_str(&content)
            .with_context(|| format!("YAML parse error in \"{}\"", path.display()))
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read \"{}\"", path.display()))
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

/// One token per line: `token`, then optional `section` and `label` columns.
///
/// Blank lines, `#` comments and a leading header row are skipped. A header
/// names the token column (`token`, `text` or `word`) and at least one other
/// known column, so a lone first token spelled `text` is still a token.
/// Empty columns are absent.
pub fn parse_tsv(content: &str) -> Vec<Token> {
    let column = |value: Option<&str>| {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_owned)
    };

    content
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .enumerate()
        .filter(|(i, line)| !(*i == 0 && is_header(line)))
        .map(|(_, line)| {
            let mut cols = line.split('\t');
            Token {
                text: cols.next().unwrap_or_default().trim().to_owned(),
                section: column(cols.next()),
                label: column(cols.next()),
            }
        })
        .collect()
}

fn is_header(line: &str) -> bool {
    const TOKEN: [&str; 3] = ["token", "text", "word"];
    const OTHER: [&str; 3] = ["section", "label", "gold"];

    let named = |name: &str, names: &[&str]| names.iter().any(|n| name.eq_ignore_ascii_case(n));
    let mut cols = line.split('\t').map(str::trim);
    let first = cols.next().unwrap_or_default();
    let rest: Vec<&str> = cols.filter(|c| !c.is_empty()).collect();

    named(first, &TOKEN) && !rest.is_empty() && rest.iter().all(|c| named(c, &OTHER))
}

/// Whitespace-delimited tokens with no section.
pub fn parse_text(content: &str) -> Vec<Token> {
    content.split_whitespace().map(Token::new).collect()
}
