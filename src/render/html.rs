//! HTML fragment output.
//!
//! Each card becomes one `<div class="result-card">` block, the markup the
//! engine's original web page styles. All text is escaped; server-provided
//! strings are never injected as markup.

use crate::controller::{Card, CardBody, ResultsContainer};

/// CSS class applied to every card.
pub const CARD_CLASS: &str = "result-card";

/// Results container that accumulates HTML fragments.
#[derive(Debug, Clone, Default)]
pub struct HtmlResults {
    fragments: Vec<String>,
}

impl HtmlResults {
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// All fragments, newline separated.
    pub fn to_html(&self) -> String {
        self.fragments.join("\n")
    }
}

impl ResultsContainer for HtmlResults {
    fn clear(&mut self) {
        self.fragments.clear();
    }

    fn append(&mut self, card: Card) {
        self.fragments.push(card_html(&card));
    }
}

/// Render one card as an HTML fragment.
pub fn card_html(card: &Card) -> String {
    let body = match &card.body {
        CardBody::Preformatted(text) => format!("  <pre>{}</pre>\n", escape(text)),
        CardBody::Fields(fields) => fields
            .iter()
            .map(|f| {
                format!(
                    "  <p><strong>{}:</strong> {}</p>\n",
                    escape(&f.label),
                    escape(&f.value)
                )
            })
            .collect(),
    };
    format!(
        "<div class=\"{CARD_CLASS}\">\n  <h2>{}</h2>\n{body}</div>",
        escape(&card.title)
    )
}

/// Escape text for use in element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preformatted_card_markup() {
        let html = card_html(&Card::preformatted("Strategic Analysis", "Hold."));
        assert_eq!(
            html,
            "<div class=\"result-card\">\n  <h2>Strategic Analysis</h2>\n  <pre>Hold.</pre>\n</div>"
        );
    }

    #[test]
    fn field_card_markup() {
        let html = card_html(&Card::fields("Market Status: Normal", [("Symbol", "ABC")]));
        assert!(html.contains("<p><strong>Symbol:</strong> ABC</p>"));
    }

    #[test]
    fn server_text_is_escaped() {
        let html = card_html(&Card::preformatted("Raw", "<script>alert('x')</script> & co"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; co"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn clear_drops_fragments() {
        let mut results = HtmlResults::default();
        results.append(Card::preformatted("A", "1"));
        results.append(Card::preformatted("B", "2"));
        assert_eq!(results.fragments().len(), 2);
        results.clear();
        assert!(results.to_html().is_empty());
    }
}
