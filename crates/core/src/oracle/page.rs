//! Puzzle page scraping.
//!
//! The page masks every word as a `<span>` whose text is the word's
//! placeholder padded by two filler characters, so a word's length is the
//! span's character count minus two.

use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::types::{OracleError, PuzzleState};

static PUZZLE_NUM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<b\b[^>]*\bid\s*=\s*["']puzzle-num["'][^>]*>\s*(\d+)\s*</b>"#)
        .expect("puzzle number pattern is valid")
});

static WIKI_DIV: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<div\b[^>]*\bid\s*=\s*["']wiki["'][^>]*>"#)
        .expect("wiki pattern is valid")
});

static ARTICLE_DIV: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<div\b[^>]*\bid\s*=\s*["']article["'][^>]*>"#)
        .expect("article pattern is valid")
});

static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<h2\b[^>]*>(.*?)</h2>").expect("heading pattern is valid"));

static SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<span\b[^>]*>(.*?)</span>").expect("span pattern is valid"));

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

static DIV_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<(/?)div\b[^>]*>").expect("div pattern is valid"));

/// Padding characters around each masked word.
const SPAN_PADDING: usize = 2;

/// Extract the puzzle number and both length profiles from the page HTML.
pub fn parse_puzzle_page(html: &str) -> Result<PuzzleState, OracleError> {
    let day = PUZZLE_NUM
        .captures(html)
        .and_then(|caps| caps[1].parse().ok())
        .ok_or(OracleError::MissingLandmark("puzzle number"))?;

    let wiki = div_body(html, &WIKI_DIV).ok_or(OracleError::MissingLandmark("wiki div"))?;

    let heading = HEADING
        .captures(wiki)
        .and_then(|caps| caps.get(1))
        .ok_or(OracleError::MissingLandmark("title heading"))?;
    let title_lengths = span_lengths(heading.as_str());
    if title_lengths.is_empty() {
        return Err(OracleError::MissingLandmark("title spans"));
    }

    let article =
        div_body(wiki, &ARTICLE_DIV).ok_or(OracleError::MissingLandmark("article div"))?;
    let text_lengths = span_lengths(article);
    if text_lengths.is_empty() {
        return Err(OracleError::MissingLandmark("article spans"));
    }

    Ok(PuzzleState {
        day,
        title_lengths,
        text_lengths,
    })
}

/// Inner HTML of the first `<div>` matched by `opening`, balanced against
/// nested divs.
///
/// An unterminated div runs to the end of the document.
fn div_body<'a>(html: &'a str, opening: &Regex) -> Option<&'a str> {
    let open = opening.find(html)?;

    let body = &html[open.end()..];
    let mut depth = 1usize;
    for caps in DIV_TAG.captures_iter(body) {
        if caps[1].is_empty() {
            depth += 1;
        } else {
            depth -= 1;
            if depth == 0 {
                let close = caps.get(0)?;
                return Some(&body[..close.start()]);
            }
        }
    }
    Some(body)
}

fn span_lengths(fragment: &str) -> Vec<usize> {
    SPAN.captures_iter(fragment)
        .map(|caps| text_length(&TAG.replace_all(&caps[1], "")).saturating_sub(SPAN_PADDING))
        .collect()
}

/// Character count of HTML text, counting each entity (`&nbsp;`, `&#233;`)
/// as a single character.
fn text_length(text: &str) -> usize {
    let mut count = 0;
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        if c == '&' {
            if let Some(end) = rest[1..].find(';').filter(|&end| end > 0 && end <= 8) {
                let name = &rest[1..=end];
                if name.chars().all(|c| c.is_ascii_alphanumeric() || c == '#') {
                    count += 1;
                    rest = &rest[end + 2..];
                    continue;
                }
            }
        }
        count += 1;
        rest = &rest[c.len_utf8()..];
    }
    count
}
