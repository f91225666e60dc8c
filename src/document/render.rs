//! Document renderers.

use std::{io, io::Write, sync::LazyLock};

use regex::Regex;

use super::AssembledDocument;

const FONT_RULES: [&str; 10] = [
    ".font-size-7 { font-size: 79.2px !important; }",
    ".font-size-6 { font-size: 70.4px !important; }",
    ".font-size-5 { font-size: 61.6px !important; }",
    ".font-size-4 { font-size: 52.8px !important; }",
    ".font-size-3 { font-size: 44px !important; }",
    ".font-size-2 { font-size: 33px !important; }",
    ".font-size-1 { font-size: 22px !important; }",
    "font { font-size: 44px !important; }",
    "body { font-size: 44px !important; }",
    "body.amzUserPref { font-size: 44px !important; }",
];

static FILE_NAME_SEPARATORS: LazyLock<Regex> = LazyLock::new(file_name_separators);

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
fn file_name_separators() -> Regex {
    Regex::new(r"^\.+|:|\s+|[|/\\]").expect("valid separator pattern")
}

/// Serialises an [`AssembledDocument`].
pub trait DocumentRenderer {
    /// Write `document` to `out`.
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    fn render(&self, document: &AssembledDocument, out: &mut dyn Write) -> io::Result<()>;

    /// Default output file name for `document`.
    fn file_name(&self, document: &AssembledDocument) -> String;
}

/// Renders a single self-contained HTML page.
#[derive(Clone, Copy, Debug, Default)]
pub struct HtmlRenderer;

impl DocumentRenderer for HtmlRenderer {
    fn render(&self, document: &AssembledDocument, out: &mut dyn Write) -> io::Result<()> {
        write!(
            out,
            "<html><head><title>{}</title><style>\n{}\n</style>",
            escape_html(&document.metadata().title),
            FONT_RULES.join("\n"),
        )?;
        out.write_all(b"<meta http-equiv=\"Content-Type\" content=\"text/html; charset=UTF-8\">")?;
        write!(out, "</head><body id=\"{}\">\n\n", escape_html(document.asin().as_str()))?;
        for fragment in document.body() {
            out.write_all(fragment.as_bytes())?;
            out.write_all(b"\n\n")?;
        }
        out.write_all(b"</body></html>")
    }

    fn file_name(&self, document: &AssembledDocument) -> String {
        output_file_name(&document.metadata().title)
    }
}

/// File name derived from a document title.
///
/// Colons, pipes and runs of whitespace become `-`, as do path separators
/// and leading dots, so the name never leaves the output directory.
///
/// ```
/// assert_eq!(folio::output_file_name("A: B | C"), "A--B---C.html");
/// assert_eq!(folio::output_file_name("../etc/x"), "--etc-x.html");
/// ```
#[must_use]
pub fn output_file_name(title: &str) -> String {
    let stem = FILE_NAME_SEPARATORS.replace_all(title, "-");
    if stem.is_empty() {
        "untitled.html".to_owned()
    } else {
        format!("{stem}.html")
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
