//! Markdown to standalone HTML pages.
//!
//! Each poem is rendered with [pulldown-cmark](https://docs.rs/pulldown-cmark)
//! (CommonMark plus tables and strikethrough) and wrapped into a minimal
//! document with [maud](https://maud.lambda.xyz/):
//!
//! ```text
//! <!DOCTYPE html>
//! <html>
//!   <head><meta charset="utf-8"><title>The Road</title></head>
//!   <body>…rendered fragment…</body>
//! </html>
//! ```
//!
//! Raw HTML inside markdown is escaped and shown as text, never passed
//! through. A line that would open an HTML block is read as an ordinary
//! paragraph line instead, so markdown around and inside it still renders:
//! `<div>\n*emph*\n</div>` becomes `<p>&lt;div&gt;\n<em>emph</em>\n&lt;/div&gt;</p>`.
//!
//! A source that disappeared between listing and rendering yields an empty
//! [`Conversion`]; the pipeline still writes it out. This keeps the
//! established behavior of clobbering the stale page, and is logged.

use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Event, Options, Parser, html as md_html};
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::naming::{ParsedName, parse_poem_name};
use crate::types::Conversion;

pub const MARKDOWN_EXTENSION: &str = "md";
pub const HTML_EXTENSION: &str = "html";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn markdown_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH
}

/// Render markdown text to an HTML fragment.
pub fn render_fragment(markdown: &str) -> String {
    let markdown = escape_html_block_starts(markdown);
    let parser = Parser::new_ext(&markdown, markdown_options()).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut fragment = String::new();
    md_html::push_html(&mut fragment, parser);
    fragment
}

/// Replace the `<` of every line that would open a raw HTML block with `&lt;`.
///
/// The parser then sees paragraph text, and the entity renders back as an
/// escaped `<`. Fenced code and autolinks (`<https://…>`) are left alone.
fn escape_html_block_starts(markdown: &str) -> Cow<'_, str> {
    let mut out = String::with_capacity(markdown.len());
    let mut fence: Option<(char, usize)> = None;
    let mut changed = false;

    for line in markdown.split_inclusive('\n') {
        let start = container_prefix_len(line);
        let rest = &line[start..];

        match fence {
            Some((open_char, open_len)) => {
                if let Some((ch, len)) = fence_run(rest) {
                    if ch == open_char && len >= open_len && rest[len..].trim().is_empty() {
                        fence = None;
                    }
                }
                out.push_str(line);
            }
            None => {
                if let Some(run) = fence_run(rest) {
                    fence = Some(run);
                    out.push_str(line);
                } else if opens_html_block(rest) {
                    out.push_str(&line[..start]);
                    out.push_str("&lt;");
                    out.push_str(&rest[1..]);
                    changed = true;
                } else {
                    out.push_str(line);
                }
            }
        }
    }

    if changed {
        Cow::Owned(out)
    } else {
        Cow::Borrowed(markdown)
    }
}

/// Byte length of the indentation plus blockquote and list markers opening `line`.
fn container_prefix_len(line: &str) -> usize {
    let bytes = line.as_bytes();
    let mut pos = skip_indent(bytes, 0);
    loop {
        match bytes.get(pos) {
            Some(b'>') => {
                pos += 1;
                if bytes.get(pos) == Some(&b' ') {
                    pos += 1;
                }
                pos = skip_indent(bytes, pos);
            }
            Some(b'-' | b'+' | b'*') if bytes.get(pos + 1) == Some(&b' ') => {
                pos = skip_indent(bytes, pos + 2);
            }
            Some(b'0'..=b'9') => {
                let digits = bytes[pos..].iter().take_while(|b| b.is_ascii_digit()).count();
                let delim = pos + digits;
                if digits <= 9
                    && matches!(bytes.get(delim), Some(b'.' | b')'))
                    && bytes.get(delim + 1) == Some(&b' ')
                {
                    pos = skip_indent(bytes, delim + 2);
                } else {
                    break;
                }
            }
            _ => break,
        }
    }
    pos
}

/// Skip up to three spaces; a fourth would start indented code.
fn skip_indent(bytes: &[u8], from: usize) -> usize {
    from + bytes[from..]
        .iter()
        .take(3)
        .take_while(|b| **b == b' ')
        .count()
}

/// A run of three or more backticks or tildes: `(char, length)`.
fn fence_run(rest: &str) -> Option<(char, usize)> {
    let ch = rest.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = rest.chars().take_while(|c| *c == ch).count();
    (len >= 3).then_some((ch, len))
}

/// Whether `rest` starts with something the parser would take as an HTML block:
/// a tag, closing tag, comment, declaration or processing instruction.
fn opens_html_block(rest: &str) -> bool {
    let Some(after) = rest.strip_prefix('<') else {
        return false;
    };
    match after.chars().next() {
        Some('/' | '!' | '?') => true,
        Some(c) if c.is_ascii_alphabetic() => {
            let name_len = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
                .unwrap_or(after.len());
            matches!(
                after[name_len..].chars().next(),
                None | Some(' ' | '\t' | '\r' | '\n' | '>' | '/')
            )
        }
        _ => false,
    }
}

/// The skeleton document every generated page shares.
pub fn document(title: Option<&str>, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                @if let Some(title) = title {
                    title { (title) }
                }
            }
            body {
                (body)
            }
        }
    }
}

/// Full poem page: titled skeleton around a rendered fragment.
pub fn poem_page(title: &str, fragment: &str) -> Markup {
    document(Some(title), html! { (PreEscaped(fragment)) })
}

fn parse_path(path: &Path, prefix_width: usize) -> ParsedName {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    parse_poem_name(&stem, prefix_width)
}

/// Title shown for a poem source: its stem without the ordering prefix.
pub fn poem_title(path: &Path, prefix_width: usize) -> String {
    parse_path(path, prefix_width).title
}

/// Convert one markdown file into a full HTML page.
///
/// A file that does not exist produces an empty result, not an error.
/// A source without an ordering prefix is reported here, once per build.
pub fn convert(path: &Path, prefix_width: usize) -> Result<Conversion, RenderError> {
    let parsed = parse_path(path, prefix_width);
    if !parsed.is_prefixed() {
        tracing::warn!(
            path = %path.display(),
            "filename has no {prefix_width}-digit ordering prefix, using full name as title"
        );
    }
    let title = parsed.title;
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "markdown source missing, rendering empty page");
            return Ok(Conversion {
                source: path.to_path_buf(),
                title,
                html: String::new(),
            });
        }
        Err(source) => {
            return Err(RenderError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let fragment = render_fragment(&content);
    let html = poem_page(&title, &fragment).into_string();
    Ok(Conversion {
        source: path.to_path_buf(),
        title,
        html,
    })
}

/// Sibling output path for a markdown source: same stem, `.html` extension.
pub fn html_path_for(source: &Path) -> PathBuf {
    source.with_extension(HTML_EXTENSION)
}
