//! Formatter re-emitting raw entries as canonical dox annotation text.
//!
//! Wrapping width is a parameter, not a constant. The formatter never breaks
//! inside a word, so re-parsing formatted output yields a structurally equal
//! document for any width (the round-trip law the tests pin down).

use crate::dox::raw::body::{BodyNode, RawBody};
use crate::dox::raw::entry::{RawDoc, RawEntry, RawParam, RawReturn, RawTParam, RawThrow};
use crate::dox::raw::text::RawText;

pub const DEFAULT_WIDTH: usize = 77;

/// Formatter for correctly indented and wrapped dox output.
#[derive(Debug, Clone, Copy)]
pub struct DoxFormatter {
    width: usize,
}

impl Default for DoxFormatter {
    fn default() -> Self {
        DoxFormatter::new(DEFAULT_WIDTH)
    }
}

impl DoxFormatter {
    pub fn new(width: usize) -> DoxFormatter {
        DoxFormatter { width }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Format one command line: `@name [leading] text`, with continuation
    /// lines wrapped and indented to the end of the head.
    pub fn format_command(&self, name: &str, text: &str, leading: Option<&str>) -> String {
        let mut head = format!("@{}", name);
        if let Some(lead) = leading {
            head.push(' ');
            head.push_str(lead);
        }
        let body = text.trim();
        if body.is_empty() {
            head.push('\n');
            return head;
        }
        head.push(' ');
        let indent = " ".repeat(head.len());
        let avail = self.width.saturating_sub(head.len()).max(1);
        let lines = wrap(body, avail);
        let mut out = head;
        out.push_str(&lines[0]);
        out.push('\n');
        for line in &lines[1..] {
            out.push_str(&indent);
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    /// Format plain paragraph text, wrapped to the full width.
    pub fn format_paragraph(&self, text: &str) -> String {
        let lines = wrap(text.trim(), self.width.max(1));
        if lines.is_empty() {
            return "\n".to_string();
        }
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

/// Greedy word wrap that never splits a word: a word longer than `width`
/// gets a line of its own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + 1 + word.len() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

impl RawBody {
    /// Format all body nodes, separated by blank lines.
    pub fn get_formatted(&self, f: &DoxFormatter) -> String {
        self.nodes
            .iter()
            .map(|n| n.get_formatted(f))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl BodyNode {
    pub fn get_formatted(&self, f: &DoxFormatter) -> String {
        match self {
            BodyNode::Paragraph(text) => f.format_paragraph(&text.normalized()),
            BodyNode::Section { heading, level } => {
                let cmd = if *level == 0 { "section" } else { "subsection" };
                f.format_command(cmd, &heading.normalized(), None)
            }
            BodyNode::Code(text) => format!("@code{}@endcode\n", text),
            BodyNode::HtmlOnly(text) => format!("@htmlonly{}@endhtmlonly\n", text),
            BodyNode::Include { path } => format!("@include {}\n", path.normalized()),
            BodyNode::Snippet { path, name } => {
                format!("@snippet {} {}\n", path.normalized(), name.normalized())
            }
        }
    }
}

impl RawEntry {
    /// Re-emit this entry as a canonical dox command block.
    pub fn get_formatted(&self, f: &DoxFormatter) -> String {
        let mut blocks: Vec<String> = Vec::new();
        blocks.push(self.command_line(f));

        push_text_block(&mut blocks, f, "implements", self.implements_list());
        push_text_block(&mut blocks, f, "extends", self.extends_list());
        if let Some(code) = self.code() {
            push_text_block(&mut blocks, f, "headerfile", Some(&code.headerfiles));
        }
        push_text_block(&mut blocks, f, "brief", Some(&self.core().briefs));
        if let Some(code) = self.code() {
            push_text_block(&mut blocks, f, "deprecated", Some(&code.deprecation_msgs));
            push_text_block(&mut blocks, f, "note", Some(&code.notes));
            push_text_block(&mut blocks, f, "warning", Some(&code.warnings));
            push_text_block(&mut blocks, f, "aka", Some(&code.akas));
            push_text_block(&mut blocks, f, "internal", Some(&code.internals));
            push_text_block(&mut blocks, f, "signature", Some(&code.signatures));
        }
        push_block(&mut blocks, tparams_block(f, self.tparams_list()));
        push_block(&mut blocks, params_block(f, self.params_list()));
        push_block(&mut blocks, returns_block(f, self.returns_list()));
        push_block(&mut blocks, throws_block(f, self.throws_list()));
        push_text_block(&mut blocks, f, "datarace", self.dataraces_list());
        if !self.core().body.is_empty() {
            blocks.push(self.core().body.get_formatted(f));
        }
        push_text_block(&mut blocks, f, "see", Some(&self.core().sees));

        blocks.join("\n")
    }

    fn command_line(&self, f: &DoxFormatter) -> String {
        match self {
            RawEntry::Variable(v) | RawEntry::EnumValue(v) => {
                let cmd = self.command().keyword().trim_start_matches('@');
                let name = format!("{};", v.core.name.normalized());
                let ty = v.var_type.normalized();
                if ty.is_empty() {
                    f.format_command(cmd, &name, None)
                } else {
                    f.format_command(cmd, &name, Some(&ty))
                }
            }
            RawEntry::MainPage(p) => f.format_command("mainpage", &p.core.title.normalized(), None),
            _ => {
                let cmd = self.command().keyword().trim_start_matches('@');
                let name = self.core().name.normalized();
                let title = self.core().title.normalized();
                if title.is_empty() {
                    f.format_command(cmd, &name, None)
                } else {
                    f.format_command(cmd, &title, Some(&name))
                }
            }
        }
    }
}

fn push_block(blocks: &mut Vec<String>, block: Option<String>) {
    if let Some(b) = block {
        blocks.push(b);
    }
}

fn push_text_block(
    blocks: &mut Vec<String>,
    f: &DoxFormatter,
    cmd: &str,
    items: Option<&[RawText]>,
) {
    let items = match items {
        Some(items) if !items.is_empty() => items,
        _ => return,
    };
    let block: String = items
        .iter()
        .map(|t| f.format_command(cmd, &t.normalized(), None))
        .collect();
    blocks.push(block);
}

fn tparams_block(f: &DoxFormatter, items: Option<&[RawTParam]>) -> Option<String> {
    let items = items.filter(|i| !i.is_empty())?;
    Some(
        items
            .iter()
            .map(|p| f.format_command("tparam", &p.text.normalized(), Some(&p.name.normalized())))
            .collect(),
    )
}

fn params_block(f: &DoxFormatter, items: Option<&[RawParam]>) -> Option<String> {
    let items = items.filter(|i| !i.is_empty())?;
    Some(
        items
            .iter()
            .map(|p| {
                let cmd = match p.in_out {
                    Some(io) => format!("param{}", io.marker()),
                    None => "param".to_string(),
                };
                f.format_command(&cmd, &p.text.normalized(), Some(&p.name.normalized()))
            })
            .collect(),
    )
}

fn returns_block(f: &DoxFormatter, items: Option<&[RawReturn]>) -> Option<String> {
    let items = items.filter(|i| !i.is_empty())?;
    Some(
        items
            .iter()
            .map(|r| f.format_command("return", &r.text.normalized(), Some(&r.ty.normalized())))
            .collect(),
    )
}

fn throws_block(f: &DoxFormatter, items: Option<&[RawThrow]>) -> Option<String> {
    let items = items.filter(|i| !i.is_empty())?;
    Some(
        items
            .iter()
            .map(|t| f.format_command("throw", &t.text.normalized(), Some(&t.ty.normalized())))
            .collect(),
    )
}

impl RawDoc {
    /// Format the whole document; entries are separated by one blank line.
    pub fn get_formatted(&self, width: usize) -> String {
        let f = DoxFormatter::new(width);
        self.entries
            .iter()
            .map(|e| e.get_formatted(&f))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
