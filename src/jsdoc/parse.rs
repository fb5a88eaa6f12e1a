//! Parsing of `/** ... */` comment text into a [`DocBlock`]

use super::{DocBlock, Tag, TagKind};

impl DocBlock {
    /// Parse the full text of a documentation comment, delimiters included.
    ///
    /// Returns `None` if the text is not a `/** */` block.
    pub fn parse(text: &str) -> Option<Self> {
        let body = text.strip_prefix("/**")?.strip_suffix("*/")?;
        let content = strip_decoration(body);

        let starts = tag_starts(&content);
        let description_end = starts.first().copied().unwrap_or(content.len());
        let description = content[..description_end]
            .trim_end()
            .lines()
            .map(str::to_string)
            .collect();

        let tags = starts
            .iter()
            .enumerate()
            .map(|(i, &start)| {
                let end = starts.get(i + 1).copied().unwrap_or(content.len());
                Tag::parse(content[start..end].trim_end())
            })
            .collect();

        Some(Self { description, tags })
    }
}

impl Tag {
    /// Parse one tag chunk starting at its `@`
    fn parse(chunk: &str) -> Self {
        let after_at = &chunk[1..];
        let name_len = after_at
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
            .unwrap_or(after_at.len());
        let name = after_at[..name_len].to_string();
        let mut rest = after_at[name_len..].trim_start();

        let mut type_expression = None;
        if rest.starts_with('{') {
            if let Some(close) = matching_close(rest, '{', '}') {
                type_expression = Some(rest[1..close].trim().to_string());
                rest = rest[close + 1..].trim_start();
            }
        }

        let mut subject = None;
        if TagKind::of(&name) == TagKind::Param && !rest.is_empty() {
            let end = if rest.starts_with('[') {
                matching_close(rest, '[', ']').map(|i| i + 1)
            } else {
                Some(rest.find(char::is_whitespace).unwrap_or(rest.len()))
            };
            if let Some(end) = end {
                subject = Some(rest[..end].to_string());
                rest = rest[end..].trim_start();
            }
        }

        Self {
            name,
            type_expression,
            subject,
            comment: rest.to_string(),
            raw: Some(chunk.to_string()),
        }
    }
}

/// Remove the leading ` * ` decoration of each comment line, dropping blank
/// lines at both ends. Lines are joined with `\n`.
fn strip_decoration(body: &str) -> String {
    let lines: Vec<&str> = body
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            let line = line.trim_end();
            let trimmed = line.trim_start();
            if i == 0 {
                trimmed
            } else if let Some(after_star) = trimmed.strip_prefix('*') {
                after_star.strip_prefix(' ').unwrap_or(after_star)
            } else {
                trimmed
            }
        })
        .collect();

    let first = lines.iter().position(|l| !l.trim().is_empty());
    let last = lines.iter().rposition(|l| !l.trim().is_empty());
    match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].join("\n"),
        _ => String::new(),
    }
}

/// Byte offsets of every `@name` that starts a tag: the `@` opens the
/// content or follows whitespace, and is followed by a letter.
fn tag_starts(content: &str) -> Vec<usize> {
    let bytes = content.as_bytes();
    let mut depth = 0usize;
    let mut starts = Vec::new();
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b'@' if depth == 0 => {
                let after_space = i == 0 || bytes[i - 1].is_ascii_whitespace();
                let names_tag = bytes.get(i + 1).is_some_and(|c| c.is_ascii_alphabetic());
                if after_space && names_tag {
                    starts.push(i);
                }
            }
            _ => {}
        }
    }
    starts
}

/// Index of the bracket closing the one at position 0
fn matching_close(text: &str, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}
