use std::collections::BTreeMap;

pub const HTML_MIME: &str = "text/html";
pub const PLAIN_MIME: &str = "text/plain";

/// Minimal view of the system clipboard.
pub trait Clipboard: std::fmt::Debug {
    fn formats(&self) -> Vec<String>;

    fn html(&self) -> Option<String>;

    /// Replaces every format with `text` as plain text.
    fn set_text(&mut self, text: String);
}

/// In-process clipboard, used where no system clipboard is wired in.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: BTreeMap<String, String>,
}

impl MemoryClipboard {
    pub fn set_html(&mut self, html: impl Into<String>) {
        self.contents.clear();
        self.contents.insert(HTML_MIME.to_owned(), html.into());
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.contents.get(PLAIN_MIME).map(String::as_str)
    }
}

impl Clipboard for MemoryClipboard {
    fn formats(&self) -> Vec<String> {
        self.contents.keys().cloned().collect()
    }

    fn html(&self) -> Option<String> {
        self.contents.get(HTML_MIME).cloned()
    }

    fn set_text(&mut self, text: String) {
        self.contents.clear();
        self.contents.insert(PLAIN_MIME.to_owned(), text);
    }
}

/// Renders HTML as plain text: tags dropped, line-breaking elements turned
/// into newlines, common entities decoded.
#[must_use]
pub fn html_to_plain(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let Some(end) = rest[start..].find('>') else {
            rest = &rest[start..];
            break;
        };
        let tag = rest[start + 1..start + end].trim().to_ascii_lowercase();
        let name = tag.trim_start_matches('/').split([' ', '/']).next().unwrap_or_default();
        if matches!(name, "br" | "p" | "div" | "li" | "tr") && (name == "br" || tag.starts_with('/')) {
            out.push('\n');
        }
        rest = &rest[start + end + 1..];
    }
    out.push_str(rest);

    decode_entities(out.trim_end_matches('\n'))
}

fn decode_entities(text: &str) -> String {
    [("&nbsp;", " "), ("&lt;", "<"), ("&gt;", ">"), ("&quot;", "\""), ("&#39;", "'"), ("&amp;", "&")]
        .into_iter()
        .fold(text.to_owned(), |acc, (entity, plain)| acc.replace(entity, plain))
}
