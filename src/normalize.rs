//! Markup stripping for fetched abstracts.
//!
//! Pure, deterministic, and never fails: malformed markup degrades to
//! whatever text content the parser can recover, down to the empty string.

use scraper::{Html, Node};

use crate::models::{AbstractRecord, NormalizedAbstract};

/// Elements treated as paragraph-level boundaries when flattening markup.
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "br", "li", "ul", "ol", "h1", "h2", "h3", "h4", "section",
];

/// Converts a fetched abstract into its plain-text form.
///
/// The `id` and `url` carry through unchanged; only the abstract body is
/// rewritten.
#[must_use]
pub fn normalize(record: AbstractRecord) -> NormalizedAbstract {
    NormalizedAbstract {
        id: record.id,
        url: record.url,
        text: strip_markup(&record.raw_abstract),
    }
}

/// Strips markup from a text fragment, preserving word order and
/// paragraph structure.
///
/// Tags are dropped, entities are decoded, block-level elements become
/// paragraph breaks, and whitespace runs collapse to single spaces.
/// Already-plain text passes through unchanged.
///
/// # Examples
///
/// ```
/// use ebpcharlie::normalize::strip_markup;
///
/// let plain = strip_markup("<p><b>Background:</b> trial results.</p>");
/// assert_eq!(plain, "Background: trial results.");
/// ```
#[must_use]
pub fn strip_markup(raw: &str) -> String {
    let fragment = Html::parse_fragment(raw);
    let mut flat = String::new();
    collect_text(*fragment.root_element(), &mut flat);
    collapse_whitespace(&flat)
}

/// Walks the fragment tree appending text content, with newlines at
/// block-element boundaries.
fn collect_text(node: ego_tree::NodeRef<'_, Node>, out: &mut String) {
    for child in node.children() {
        match child.value() {
            Node::Text(text) => out.push_str(&text.text),
            Node::Element(element) => {
                let block = BLOCK_TAGS.contains(&element.name());
                if block {
                    out.push('\n');
                }
                collect_text(child, out);
                if block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

/// Collapses whitespace runs within lines and blank-line runs between
/// paragraphs, keeping one blank line per paragraph break.
fn collapse_whitespace(text: &str) -> String {
    let mut paragraphs: Vec<Vec<String>> = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for line in text.lines() {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
        } else {
            current.push(collapsed);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }

    paragraphs
        .iter()
        .map(|lines| lines.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArticleRef;

    #[test]
    fn strips_inline_tags() {
        let plain = strip_markup("<b>Bold</b> and <i>italic</i> words");
        assert_eq!(plain, "Bold and italic words");
    }

    #[test]
    fn paragraphs_become_blank_line_separated() {
        let plain = strip_markup("<p>First paragraph.</p><p>Second paragraph.</p>");
        assert_eq!(plain, "First paragraph.\n\nSecond paragraph.");
    }

    #[test]
    fn hyperlink_decoration_is_dropped() {
        let plain = strip_markup("See <a href=\"https://example.org\">the trial</a> report");
        assert_eq!(plain, "See the trial report");
    }

    #[test]
    fn entities_are_decoded() {
        let plain = strip_markup("risk &lt; 0.05 &amp; CI 95%");
        assert_eq!(plain, "risk < 0.05 & CI 95%");
    }

    #[test]
    fn whitespace_runs_collapse() {
        let plain = strip_markup("too   many\t spaces\n   here");
        assert_eq!(plain, "too many spaces\nhere");
    }

    #[test]
    fn idempotent_on_plain_text() {
        let plain = "Background: study design.\n\nConclusions: effective.";
        assert_eq!(strip_markup(plain), plain);
        assert_eq!(strip_markup(&strip_markup(plain)), plain);
    }

    #[test]
    fn empty_and_markup_only_input_degrades_to_empty() {
        assert_eq!(strip_markup(""), "");
        assert_eq!(strip_markup("<div></div><p>  </p>"), "");
    }

    #[test]
    fn normalize_preserves_id_and_url() {
        let article = ArticleRef::from_id("111");
        let record = AbstractRecord::new(&article, "<p>Findings.</p>");

        let normalized = normalize(record);
        assert_eq!(normalized.id, "111");
        assert_eq!(normalized.url, "https://pubmed.ncbi.nlm.nih.gov/111");
        assert_eq!(normalized.text, "Findings.");
    }
}
