//! Tolerant scanner for EFetch abstract XML
//!
//! The payload is treated as a flat stream of tag-delimited blocks rather than a
//! tree. Article blocks are located first, then title, abstract text and PMID are
//! extracted from each block independently, so a missing or malformed field only
//! blanks that field.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument, warn};

use crate::error::{PubMedError, Result};
use crate::pubmed::models::AbstractRecord;

static ARTICLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(r"(?s)<PubmedArticle(?:\s[^>]*)?>(.*?)</PubmedArticle>")
});
static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(r"(?s)<ArticleTitle(?:\s[^>]*)?>(.*?)</ArticleTitle>")
});
static ABSTRACT_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(r"(?s)<AbstractText(?:\s[^>]*)?>(.*?)</AbstractText>")
});
static PMID_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"<PMID(?:\s[^>]*)?>\s*(\d+)\s*</PMID>"));
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"<[^>]+>"));
static CHAR_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"&#(?:[xX]([0-9A-Fa-f]+)|([0-9]+));"));

fn compile_static_regex(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(re) => re,
        Err(e) => panic!("invalid built-in pattern {pattern:?}: {e}"),
    }
}

/// Parse every `<PubmedArticle>` block of an EFetch response.
///
/// `ids` is only used to label the error when nothing could be parsed.
///
/// # Errors
///
/// * `PubMedError::AbstractsNotFound` - If the payload holds no article block
#[instrument(skip(xml), fields(xml_size = xml.len()))]
pub fn parse_abstracts(xml: &str, ids: &str) -> Result<Vec<AbstractRecord>> {
    let records: Vec<AbstractRecord> = split_articles(xml).map(parse_article_block).collect();

    if records.is_empty() {
        warn!("No article blocks found in EFetch response");
        return Err(PubMedError::AbstractsNotFound {
            ids: ids.to_string(),
        });
    }

    debug!(parsed = records.len(), "Parsed abstract records");
    Ok(records)
}

/// Split the document into the inner text of each article block
fn split_articles(xml: &str) -> impl Iterator<Item = &str> {
    ARTICLE_RE
        .captures_iter(xml)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
}

/// Extract the fields of one article block
pub fn parse_article_block(block: &str) -> AbstractRecord {
    let title = TITLE_RE
        .captures(block)
        .and_then(|caps| caps.get(1))
        .map(|m| clean_text(m.as_str()))
        .unwrap_or_default();

    // Structured abstracts carry one AbstractText per labelled section
    let raw_abstract: String = ABSTRACT_TEXT_RE
        .captures_iter(block)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect();

    let pmid = PMID_RE
        .captures(block)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    if pmid.is_empty() {
        debug!("Article block without PMID");
    }

    AbstractRecord {
        pmid,
        title,
        abstract_text: clean_text(&raw_abstract),
    }
}

/// Strip nested tags, decode numeric character references and the predefined XML
/// entities, then trim
pub fn clean_text(raw: &str) -> String {
    let stripped = TAG_RE.replace_all(raw, "");
    decode_entities(&stripped).trim().to_string()
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let decoded = CHAR_REF_RE.replace_all(text, |caps: &regex::Captures| {
        let code = match (caps.get(1), caps.get(2)) {
            (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (None, Some(dec)) => dec.as_str().parse::<u32>().ok(),
            (None, None) => None,
        };
        // Out-of-range references are kept verbatim
        match code.and_then(char::from_u32) {
            Some(c) => c.to_string(),
            None => caps[0].to_string(),
        }
    });

    // &amp; last so that "&amp;lt;" stays "&lt;"
    decoded
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
