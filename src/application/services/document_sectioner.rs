use std::sync::LazyLock;

use regex::Regex;

use crate::domain::PageMap;

use super::response_parser::truncate_chars;

const TRUNCATION_MARKER: &str = "\n\n[DOCUMENT TRUNCATED DUE TO LENGTH...]";

/// Structural section boundaries, in priority order. The first pattern that
/// splits the document into more than one section wins.
static SECTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\n\s*(?:CHAPTER|Chapter|SECTION|Section)\s+\d+",
        r"\n\s*\d+\.\s+[A-Z]",
        r"\n\s*[A-Z][A-Z\s]{10,}\n",
        r"\n\s*={3,}\n",
        r"\n\s*-{3,}\n",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Tunable sectioning knobs; thresholds are cost/latency tradeoffs, not
/// behavioral contracts.
#[derive(Debug, Clone)]
pub struct SectionerConfig {
    /// Documents longer than this fall back to fixed-size chunking when no
    /// structural boundary is found.
    pub chunking_threshold_chars: usize,
    /// Target size for fixed-size chunks.
    pub chunk_target_chars: usize,
    /// Ceiling for the reassembled, page-marked document.
    pub max_processed_chars: usize,
}

impl Default for SectionerConfig {
    fn default() -> Self {
        Self {
            chunking_threshold_chars: 2_000,
            chunk_target_chars: 1_000,
            max_processed_chars: 24_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionedDocument {
    pub text: String,
    pub page_map: PageMap,
}

/// Wraps each logical section of the document in `[PAGE N]` / `[/PAGE N]`
/// markers so the model can cite where a value came from, and returns the
/// citation key map alongside the reassembled text.
pub fn section_with_citations(document_text: &str, config: &SectionerConfig) -> SectionedDocument {
    let sections = split_into_sections(document_text, config);

    let mut page_map = PageMap::new();
    let mut marked_sections = Vec::with_capacity(sections.len());

    for (index, section) in sections.iter().enumerate() {
        let page_number = index + 1;
        marked_sections.push(format!(
            "[PAGE {page_number}]\n{}\n[/PAGE {page_number}]",
            section.trim()
        ));
        page_map.insert_page(page_number);
    }

    let mut text = marked_sections.join("\n\n");
    if text.chars().count() > config.max_processed_chars {
        text = format!(
            "{}{}",
            truncate_chars(&text, config.max_processed_chars),
            TRUNCATION_MARKER
        );
    }

    SectionedDocument { text, page_map }
}

/// Splits on the first structural pattern that yields more than one
/// non-empty section; otherwise falls back to fixed-size chunking for
/// documents past the length threshold.
fn split_into_sections(document_text: &str, config: &SectionerConfig) -> Vec<String> {
    for pattern in SECTION_PATTERNS.iter() {
        let sections: Vec<String> = pattern
            .split(document_text)
            .filter(|section| !section.trim().is_empty())
            .map(|section| section.to_string())
            .collect();

        if sections.len() > 1 {
            return sections;
        }
    }

    let total_chars = document_text.chars().count();
    if total_chars > config.chunking_threshold_chars {
        return chunk_by_length(document_text, config.chunk_target_chars);
    }

    vec![document_text.to_string()]
}

fn chunk_by_length(document_text: &str, target_chars: usize) -> Vec<String> {
    let chars: Vec<char> = document_text.chars().collect();
    let chunk_count = chars.len().div_ceil(target_chars);
    let chunk_size = chars.len().div_ceil(chunk_count);

    chars
        .chunks(chunk_size)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
