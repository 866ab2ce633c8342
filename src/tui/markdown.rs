//! Markdown rendering for timeline cells.
//!
//! Thin wrapper around `tui-markdown` — converts markdown text to owned,
//! styled ratatui `Line`s so view code never borrows the source string.

use ratatui::text::{Line, Span};

/// Parse markdown text and return styled lines suitable for a `Paragraph`.
pub fn render_markdown(text: &str) -> Vec<Line<'static>> {
    let rendered = tui_markdown::from_str(text);
    rendered
        .lines
        .into_iter()
        .map(|line| {
            let spans: Vec<Span<'static>> = line
                .spans
                .into_iter()
                .map(|span| Span::styled(span.content.into_owned(), span.style))
                .collect();
            Line::from(spans)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines_to_text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn renders_plain_text() {
        let lines = render_markdown("just words");
        assert!(lines_to_text(&lines).contains("just words"));
    }

    #[test]
    fn renders_headings_and_emphasis() {
        let lines = render_markdown("# Title\n\nSome **bold** text");
        let text = lines_to_text(&lines);
        assert!(text.contains("Title"));
        assert!(text.contains("bold"));
    }

    #[test]
    fn empty_input_renders_without_panic() {
        let lines = render_markdown("");
        assert!(lines_to_text(&lines).trim().is_empty());
    }
}
