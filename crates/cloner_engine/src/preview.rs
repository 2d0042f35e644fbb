use scraper::{Html, Selector};

pub const MAX_PREVIEW_CONTENT: usize = 40_960;

/// Text rendition of an HTML artifact for terminal display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlPreview {
    pub title: Option<String>,
    /// At most [`MAX_PREVIEW_CONTENT`] bytes.
    pub text: String,
    /// The body text was cut at [`MAX_PREVIEW_CONTENT`].
    pub truncated: bool,
}

/// Pulls the `<title>` and converts the `<body>` to markdown-ish text.
pub fn render_preview(html: &str) -> HtmlPreview {
    let doc = Html::parse_document(html);
    let title = Selector::parse("title")
        .ok()
        .and_then(|sel| {
            doc.select(&sel)
                .next()
                .map(|node| node.text().collect::<String>())
        })
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());

    let body_html = Selector::parse("body")
        .ok()
        .and_then(|sel| doc.select(&sel).next().map(|node| node.inner_html()))
        .unwrap_or_else(|| doc.root_element().html());

    let text = collapse_blank_lines(&html2md::parse_html(&body_html));
    let (text, truncated) = truncate(text);
    HtmlPreview {
        title,
        text,
        truncated,
    }
}

fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;
    for line in text.lines() {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
            out.push('\n');
        } else {
            blank_run = 0;
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }
    out.trim().to_string()
}

fn truncate(mut text: String) -> (String, bool) {
    if text.len() <= MAX_PREVIEW_CONTENT {
        return (text, false);
    }
    let mut end = MAX_PREVIEW_CONTENT;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
    (text, true)
}
