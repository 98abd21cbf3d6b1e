//! Conversions between speech markup and terminal text.
//!
//! Speech bodies are HTML produced by a rich-text editor. For reading in the
//! terminal only structure that affects line breaks is kept.

/// Render HTML markup as plain text.
///
/// Block elements become paragraph breaks, `<br>` a line break and list
/// items are bulleted. Unknown tags are dropped.
#[must_use]
pub fn html_to_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut chars = html.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '<' => {
                let mut tag = String::new();
                for t in chars.by_ref() {
                    if t == '>' {
                        break;
                    }
                    tag.push(t);
                }
                apply_tag(&tag, &mut out);
            }
            '&' => {
                let mut entity = String::new();
                while let Some(&n) = chars.peek() {
                    if n == ';' || n == '&' || n == '<' || n.is_whitespace() || entity.len() > 10 {
                        break;
                    }
                    entity.push(n);
                    chars.next();
                }
                if chars.peek() == Some(&';') {
                    chars.next();
                    match decode_entity(&entity) {
                        Some(decoded) => out.push(decoded),
                        None => {
                            out.push('&');
                            out.push_str(&entity);
                            out.push(';');
                        }
                    }
                } else {
                    out.push('&');
                    out.push_str(&entity);
                }
            }
            c if c.is_whitespace() => push_space(&mut out),
            c => out.push(c),
        }
    }

    normalize(&out)
}

/// Convert plain text to paragraph markup.
///
/// Blank lines separate paragraphs, single newlines become `<br>`.
#[must_use]
pub fn text_to_html(text: &str) -> String {
    let mut html = String::new();
    let mut paragraph: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            flush(&mut paragraph, &mut html);
        } else {
            paragraph.push(line);
        }
    }
    flush(&mut paragraph, &mut html);

    html
}

fn flush(paragraph: &mut Vec<&str>, html: &mut String) {
    if paragraph.is_empty() {
        return;
    }
    let body = paragraph
        .iter()
        .map(|line| escape(line.trim()))
        .collect::<Vec<_>>()
        .join("<br>");
    html.push_str("<p>");
    html.push_str(&body);
    html.push_str("</p>");
    paragraph.clear();
}

/// Whether `content` already looks like markup.
#[must_use]
pub fn looks_like_html(content: &str) -> bool {
    let trimmed = content.trim_start();
    trimmed.starts_with('<') && trimmed.contains('>')
}

/// Whether the markup renders to any visible text.
#[must_use]
pub fn has_visible_text(html: &str) -> bool {
    !html_to_text(html).trim().is_empty()
}

/// Count words in rendered text, ignoring bullets and punctuation-only tokens.
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace()
        .filter(|token| token.chars().any(char::is_alphanumeric))
        .count()
}

/// Greedy word wrap. Continuation lines of bullets are indented.
#[must_use]
pub fn wrap(text: &str, width: usize) -> String {
    let width = width.max(20);
    let mut out = Vec::new();

    for line in text.lines() {
        if line.chars().count() <= width {
            out.push(line.to_string());
            continue;
        }

        let indent = if line.starts_with("• ") { "  " } else { "" };
        let mut current = String::new();
        for word in line.split_whitespace() {
            let needed = current.chars().count()
                + word.chars().count()
                + usize::from(!current.is_empty());
            if !current.is_empty() && needed > width {
                out.push(std::mem::take(&mut current));
                current.push_str(indent);
            }
            if !current.is_empty() && !current.ends_with(' ') {
                current.push(' ');
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            out.push(current);
        }
    }

    out.join("\n")
}

fn apply_tag(tag: &str, out: &mut String) {
    let closing = tag.starts_with('/');
    let name = tag
        .trim_start_matches('/')
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();

    match name.as_str() {
        "br" => line_break(out),
        "p" | "div" | "blockquote" | "ul" | "ol" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            paragraph_break(out);
        }
        "li" if closing => line_break(out),
        "li" => {
            trim_trailing_spaces(out);
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("• ");
        }
        _ => {}
    }
}

fn push_space(out: &mut String) {
    if !out.is_empty() && !out.ends_with(' ') && !out.ends_with('\n') {
        out.push(' ');
    }
}

fn line_break(out: &mut String) {
    trim_trailing_spaces(out);
    if !out.is_empty() {
        out.push('\n');
    }
}

fn paragraph_break(out: &mut String) {
    trim_trailing_spaces(out);
    if out.is_empty() {
        return;
    }
    while !out.ends_with("\n\n") {
        out.push('\n');
    }
}

fn trim_trailing_spaces(out: &mut String) {
    while out.ends_with(' ') {
        out.pop();
    }
}

fn normalize(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut blank_run = 0;

    for line in text.lines().map(str::trim_end) {
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        result.push_str(line);
        result.push('\n');
    }

    result.trim().to_string()
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let code = entity.strip_prefix('#')?;
            let value = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse().ok()?,
            };
            char::from_u32(value)
        }
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            c => escaped.push(c),
        }
    }
    escaped
}
