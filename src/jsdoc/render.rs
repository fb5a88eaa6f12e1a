//! Rendering of documentation blocks back to comment text

use super::{DocBlock, Tag, TagKind};

/// How a block is laid out in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout<'a> {
    /// One ` * ` line per description or tag line, indented like the line
    /// the block starts on
    Block { indent: &'a str, newline: &'a str },
    /// `/** ... */` on a single line, used when code precedes the block
    Inline,
}

impl Tag {
    /// Tag text as it appears inside the comment, without the ` * ` prefix.
    ///
    /// Format: `@name {type} subject  comment` for parameter tags,
    /// `@name {type} comment` for everything else.
    pub fn to_text(&self) -> String {
        if let Some(raw) = &self.raw {
            return raw.clone();
        }

        let mut out = format!("@{}", self.name);
        if let Some(ty) = &self.type_expression {
            out.push_str(" {");
            out.push_str(ty);
            out.push('}');
        }
        if let Some(subject) = &self.subject {
            out.push(' ');
            out.push_str(subject);
        }
        if !self.comment.is_empty() {
            let separator = if self.kind() == TagKind::Param && self.subject.is_some() {
                "  "
            } else {
                " "
            };
            out.push_str(separator);
            out.push_str(&self.comment);
        }
        escape_comment_end(&out)
    }
}

/// Keep `*/` in type or initializer text from closing the comment
fn escape_comment_end(text: &str) -> String {
    text.replace("*/", "*\\/")
}

/// Collapse a possibly multi-line part onto one line
fn flatten(part: &str) -> String {
    part.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

impl DocBlock {
    /// Render the block as comment text, delimiters included
    pub fn render(&self, layout: Layout<'_>) -> String {
        let tag_texts: Vec<String> = self.tags.iter().map(Tag::to_text).collect();

        match layout {
            Layout::Inline => {
                let parts: Vec<String> = self
                    .description
                    .iter()
                    .chain(tag_texts.iter())
                    .map(|part| flatten(part))
                    .filter(|part| !part.is_empty())
                    .collect();
                format!("/** {} */", parts.join(" "))
            }
            Layout::Block { indent, newline } => {
                let mut out = String::from("/**");
                out.push_str(newline);
                let lines = self
                    .description
                    .iter()
                    .map(String::as_str)
                    .chain(tag_texts.iter().flat_map(|t| t.split('\n')));
                for line in lines {
                    out.push_str(indent);
                    out.push_str(" *");
                    if !line.is_empty() {
                        out.push(' ');
                        out.push_str(line);
                    }
                    out.push_str(newline);
                }
                out.push_str(indent);
                out.push_str(" */");
                out
            }
        }
    }
}
