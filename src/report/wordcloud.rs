/// Term-frequency cloud derived from synthesis text.
///
/// The cloud itself is pure data: tokenization, frequency counting, sizing,
/// coloring and placement are all deterministic. `to_svg` materializes the
/// layout as markup; painting it to pixels is left to whatever viewer opens
/// the file.
use std::collections::HashMap;

/// Canvas dimensions, in SVG user units.
pub const CANVAS_WIDTH: u32 = 800;
pub const CANVAS_HEIGHT: u32 = 800;

/// At most this many terms appear in a cloud.
pub const MAX_TERMS: usize = 100;

/// Font-size bounds for the least and most frequent term.
const MIN_FONT_SIZE: f32 = 14.0;
const MAX_FONT_SIZE: f32 = 72.0;

/// Rough glyph width as a fraction of font size, used for row packing.
const GLYPH_WIDTH_RATIO: f32 = 0.6;

/// Horizontal and vertical gaps between placed terms.
const TERM_GAP: f32 = 14.0;

/// Fixed color scheme, cycled through by term rank (viridis-style ramp).
const PALETTE: [&str; 10] = [
    "#440154", "#482878", "#3e4989", "#31688e", "#26828e", "#1f9e89", "#35b779", "#6ece58",
    "#b5de2b", "#fde725",
];

/// Common English words excluded from frequency counting.
const STOP_WORDS: [&str; 60] = [
    "a", "an", "and", "are", "as", "at", "be", "been", "but", "by", "can", "could", "did", "do",
    "for", "from", "had", "has", "have", "in", "into", "is", "it", "its", "may", "more", "most",
    "no", "not", "of", "on", "or", "other", "our", "should", "such", "than", "that", "the",
    "their", "there", "these", "they", "this", "those", "to", "was", "we", "were", "which",
    "while", "who", "will", "with", "within", "would", "also", "between", "both", "each",
];

/// One term placed on the cloud canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedTerm {
    pub text: String,
    /// Occurrences in the source text.
    pub count: usize,
    /// Font size scaled by frequency.
    pub size: f32,
    /// Fill color from the fixed palette.
    pub color: &'static str,
    /// Left edge of the term's baseline anchor.
    pub x: f32,
    /// Baseline height.
    pub y: f32,
}

/// A laid-out term-frequency cloud.
#[derive(Debug, Clone, PartialEq)]
pub struct WordCloud {
    terms: Vec<PlacedTerm>,
}

impl WordCloud {
    /// Builds a cloud from free text.
    ///
    /// Tokens are lowercased alphabetic words of at least two characters;
    /// stop words are excluded; the most frequent [`MAX_TERMS`] terms are
    /// kept, largest first. Empty or stop-word-only input yields an empty
    /// cloud.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let counts = count_terms(text);

        let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
        // Ties broken alphabetically so layout is reproducible.
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(MAX_TERMS);

        Self {
            terms: layout(&ranked),
        }
    }

    /// The placed terms, most frequent first.
    pub fn terms(&self) -> &[PlacedTerm] {
        &self.terms
    }

    /// True when no terms survived tokenization.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Renders the cloud as an SVG document string.
    #[must_use]
    pub fn to_svg(&self) -> String {
        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{CANVAS_WIDTH}\" \
             height=\"{CANVAS_HEIGHT}\" viewBox=\"0 0 {CANVAS_WIDTH} {CANVAS_HEIGHT}\">\n\
             <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n"
        );

        for term in &self.terms {
            svg.push_str(&format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" font-family=\"sans-serif\" \
                 font-size=\"{:.1}\" fill=\"{}\">{}</text>\n",
                term.x,
                term.y,
                term.size,
                term.color,
                escape_xml(&term.text)
            ));
        }

        svg.push_str("</svg>\n");
        svg
    }
}

/// Counts eligible terms in `text`.
fn count_terms(text: &str) -> HashMap<String, usize> {
    let mut counts = HashMap::new();

    for token in text
        .to_lowercase()
        .split(|c: char| !c.is_alphabetic())
        .filter(|w| w.len() >= 2 && !STOP_WORDS.contains(w))
    {
        *counts.entry(token.to_string()).or_insert(0) += 1;
    }

    counts
}

/// Assigns sizes and colors by rank and packs terms into rows on the
/// fixed canvas.
fn layout(ranked: &[(String, usize)]) -> Vec<PlacedTerm> {
    let Some(max_count) = ranked.first().map(|(_, c)| *c) else {
        return Vec::new();
    };
    let min_count = ranked.last().map_or(max_count, |(_, c)| *c);
    let span = (max_count - min_count).max(1) as f32;

    let mut placed = Vec::with_capacity(ranked.len());
    let mut x = TERM_GAP;
    let mut y = TERM_GAP + MAX_FONT_SIZE;
    let mut row_height = 0.0f32;

    for (rank, (text, count)) in ranked.iter().enumerate() {
        let size = if max_count == min_count {
            MAX_FONT_SIZE
        } else {
            MIN_FONT_SIZE + (MAX_FONT_SIZE - MIN_FONT_SIZE) * (*count - min_count) as f32 / span
        };

        let width = text.chars().count() as f32 * size * GLYPH_WIDTH_RATIO;
        if x + width > CANVAS_WIDTH as f32 - TERM_GAP && x > TERM_GAP {
            x = TERM_GAP;
            y += row_height + TERM_GAP;
            row_height = 0.0;
        }

        // Out of vertical room: anything placed further down would sit
        // outside the viewBox and never be visible.
        if y > CANVAS_HEIGHT as f32 - TERM_GAP {
            break;
        }

        placed.push(PlacedTerm {
            text: text.clone(),
            count: *count,
            size,
            color: PALETTE[rank % PALETTE.len()],
            x,
            y,
        });

        x += width + TERM_GAP;
        row_height = row_height.max(size);
    }

    placed
}

/// Escapes text content for embedding in SVG markup.
fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
