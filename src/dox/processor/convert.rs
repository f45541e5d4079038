//! Conversion of raw entries into processed entries.
//!
//! Token runs become [`TextNode`] trees here: inline `@link ... @endlink`
//! markup becomes link nodes, HTML-looking tags become element nodes
//! (unexpected tag names are reported), `@code`/`@include`/`@snippet`
//! become verbatim code nodes, and `#` placeholders in section headings are
//! numbered per entry.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::dox::diagnostics::Diagnostics;
use crate::dox::lexer::{Command, Token, TokenKind};
use crate::dox::processor::entries::{
    Location, ProcClass, ProcCodeCore, ProcCodeEntry, ProcConcept, ProcCore, ProcEntry,
    ProcFunction, ProcMacro, ProcMetafunction, ProcPage, ProcParam, ProcReturn, ProcTParam,
    ProcTag, ProcThrow, ProcVariable,
};
use crate::dox::processor::include_mgr::IncludeManager;
use crate::dox::processor::text_node::{NodeTag, TextNode};
use crate::dox::raw::body::{BodyNode, RawBody};
use crate::dox::raw::entry::{CodeCore, RawEntry, RawParam, RawReturn, RawTParam, RawThrow};
use crate::dox::raw::text::RawText;
use crate::dox::sig;

static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<(/?)([a-zA-Z][a-zA-Z0-9]*)([^>]*?)(/?)>$").expect("static regex"));

static ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([a-zA-Z_:][a-zA-Z0-9_:-]*)(?:\s*=\s*"([^"]*)"|\s*=\s*([^\s">]+))?"#)
        .expect("static regex")
});

static CODE_EXT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\{([^}]*)\}").expect("static regex"));

/// Shared state of one conversion pass.
pub struct ConvertCx<'a> {
    pub include_mgr: &'a mut IncludeManager,
    pub expected_tags: &'a BTreeSet<String>,
    pub diags: &'a mut Diagnostics,
}

/// Convert one raw entry; `file` is the fallback location when the entry
/// carries no tokens of its own.
pub fn convert_entry(raw: &RawEntry, file: &str, cx: &mut ConvertCx) -> ProcEntry {
    let core = convert_core(raw, file, cx);
    match raw {
        RawEntry::Class(r) => ProcEntry::Class(ProcClass {
            core,
            code: convert_code_core(&r.code, true, cx),
            extends: texts(&r.extends),
            implements: texts(&r.implements),
            tparams: convert_tparams(&r.tparams, cx),
            ..ProcClass::default()
        }),
        RawEntry::Concept(r) => ProcEntry::Concept(ProcConcept {
            core,
            code: convert_code_core(&r.code, true, cx),
            extends: texts(&r.extends),
            ..ProcConcept::default()
        }),
        RawEntry::Function(r) => ProcEntry::Function(ProcFunction {
            core,
            code: convert_code_core(&r.code, true, cx),
            params: convert_params(&r.params, cx),
            tparams: convert_tparams(&r.tparams, cx),
            returns: convert_returns(&r.returns, cx),
            throws: convert_throws(&r.throws, cx),
            dataraces: convert_text_list(&r.dataraces, cx),
        }),
        RawEntry::Metafunction(r) => ProcEntry::Metafunction(ProcMetafunction {
            core,
            code: convert_code_core(&r.code, true, cx),
            tparams: convert_tparams(&r.tparams, cx),
            returns: convert_returns(&r.returns, cx),
            throws: convert_throws(&r.throws, cx),
            dataraces: convert_text_list(&r.dataraces, cx),
        }),
        RawEntry::Macro(r) => ProcEntry::Macro(ProcMacro {
            core,
            code: convert_code_core(&r.code, false, cx),
            params: convert_params(&r.params, cx),
            returns: convert_returns(&r.returns, cx),
            throws: convert_throws(&r.throws, cx),
            dataraces: convert_text_list(&r.dataraces, cx),
        }),
        RawEntry::Enum(r) => ProcEntry::Enum(ProcCodeEntry {
            core,
            code: convert_code_core(&r.code, true, cx),
        }),
        RawEntry::Typedef(r) => ProcEntry::Typedef(ProcCodeEntry {
            core,
            code: convert_code_core(&r.code, false, cx),
        }),
        RawEntry::Adaption(r) => ProcEntry::Adaption(ProcCodeEntry {
            core,
            code: convert_code_core(&r.code, false, cx),
        }),
        RawEntry::Variable(r) => ProcEntry::Variable(ProcVariable {
            core,
            code: convert_code_core(&r.code, true, cx),
            var_type: non_empty(r.var_type.normalized()),
        }),
        RawEntry::EnumValue(r) => ProcEntry::EnumValue(ProcVariable {
            core,
            code: convert_code_core(&r.code, true, cx),
            var_type: non_empty(r.var_type.normalized()),
        }),
        RawEntry::Tag(r) => ProcEntry::Tag(ProcTag {
            core,
            code: convert_code_core(&r.code, false, cx),
            tparams: convert_tparams(&r.tparams, cx),
        }),
        RawEntry::Page(_) | RawEntry::MainPage(_) => ProcEntry::Page(ProcPage { core }),
        RawEntry::Group(_) => ProcEntry::Group(ProcPage { core }),
    }
}

fn convert_core(raw: &RawEntry, file: &str, cx: &mut ConvertCx) -> ProcCore {
    let name = raw.name_text().trim_end_matches(';').to_string();
    let location = match raw.location() {
        Some(token) => Location {
            file: token.file.clone(),
            line: token.line,
        },
        None => Location {
            file: file.to_string(),
            line: 0,
        },
    };
    if raw.core().briefs.len() > 1 {
        cx.diags.warning_at(
            &location.file,
            location.line,
            format!("entry {:?} has more than one @brief", name),
        );
    }
    let brief = raw
        .core()
        .briefs
        .first()
        .map(|b| TextConverter::new(cx.expected_tags, cx.diags).run(b, false));
    let body = body_to_text_node(&raw.core().body, cx);
    let sees = raw
        .core()
        .sees
        .iter()
        .map(|see| see_node(see, cx))
        .collect();
    ProcCore {
        name,
        title: non_empty(raw.title_text()),
        brief,
        body,
        sees,
        subentries: Default::default(),
        location,
    }
}

fn convert_code_core(code: &CodeCore, parse_signatures: bool, cx: &mut ConvertCx) -> ProcCodeCore {
    let mut out = ProcCodeCore {
        headerfiles: code.headerfiles.iter().map(|h| h.normalized()).collect(),
        akas: code.akas.iter().map(|a| a.normalized()).collect(),
        deprecation_msgs: convert_text_list(&code.deprecation_msgs, cx),
        notes: convert_text_list(&code.notes, cx),
        warnings: convert_text_list(&code.warnings, cx),
        internals: convert_text_list(&code.internals, cx),
        ..ProcCodeCore::default()
    };
    for s in &code.signatures {
        out.signatures
            .push(TextConverter::new(cx.expected_tags, cx.diags).run(s, true));
        if parse_signatures {
            // A signature outside the signature grammar is simply not
            // indexed; the entry itself stays valid.
            match sig::parse(&s.text()) {
                Ok(entry) => out.signature_entries.push(entry),
                Err(err) => tracing::debug!(signature = %s.normalized(), %err, "signature not indexed"),
            }
        }
    }
    out
}

/// Resolve the body nodes of one entry, numbering `#` placeholders in
/// section headings with the section's 1-based index within the entry.
fn body_to_text_node(body: &RawBody, cx: &mut ConvertCx) -> TextNode {
    let mut root = TextNode::elem(NodeTag::Div);
    let mut section_index = 0usize;
    for node in &body.nodes {
        match node {
            BodyNode::Paragraph(text) => {
                if text.normalized().is_empty() {
                    continue;
                }
                let mut p = TextConverter::new(cx.expected_tags, cx.diags).run(text, false);
                p.tag = NodeTag::Paragraph;
                root.add_child(p);
            }
            BodyNode::Section { heading, level } => {
                section_index += 1;
                let heading = substitute_section_counter(heading, section_index);
                let mut h = TextConverter::new(cx.expected_tags, cx.diags).run(&heading, false);
                h.tag = NodeTag::Heading(level + 2);
                root.add_child(h);
            }
            BodyNode::Code(text) => root.add_child(inline_code_node(text)),
            BodyNode::HtmlOnly(text) => {
                let mut n = TextNode::verbatim(text);
                n.raw_html = true;
                root.add_child(n);
            }
            BodyNode::Include { path } => {
                let rel = path.normalized();
                let mut node = TextNode::elem(NodeTag::Code)
                    .with_attr("type", &dotted_extension(&rel))
                    .with_attr("source", "include")
                    .with_attr("path", &rel);
                match cx.include_mgr.load_file(&rel) {
                    Ok(text) => node.add_child(TextNode::verbatim(&text)),
                    Err(err) => report_inclusion(cx.diags, path, &err.to_string()),
                }
                root.add_child(node);
            }
            BodyNode::Snippet { path, name } => {
                let rel = path.normalized();
                let snippet = name.normalized();
                let mut node = TextNode::elem(NodeTag::Code)
                    .with_attr("type", &dotted_extension(&rel))
                    .with_attr("source", "snippet")
                    .with_attr("path", &rel)
                    .with_attr("name", &snippet);
                match cx.include_mgr.load_snippet(&rel, &snippet) {
                    Ok(text) => node.add_child(TextNode::verbatim(&text)),
                    Err(err) => report_inclusion(cx.diags, path, &err.to_string()),
                }
                root.add_child(node);
            }
        }
    }
    root
}

/// Unresolved inclusions warn and leave the code node empty.
fn report_inclusion(diags: &mut Diagnostics, path: &RawText, msg: &str) {
    match path.first_token() {
        Some(token) => diags.token_warning(token, msg),
        None => diags.warning(msg),
    }
}

fn see_node(see: &RawText, cx: &mut ConvertCx) -> TextNode {
    let target = see.normalized();
    let mut node = TextConverter::new(cx.expected_tags, cx.diags).run(see, false);
    node.tag = NodeTag::Link;
    if target.starts_with("http") {
        node.set_attr("href", &target);
        node.set_attr("target", "_top");
    } else {
        node.set_attr("href", &format!("dox:{}", target));
    }
    node
}

fn inline_code_node(text: &str) -> TextNode {
    let (ext, rest) = match CODE_EXT_RE.captures(text) {
        Some(caps) => {
            let end = caps.get(0).map(|m| m.end()).unwrap_or(0);
            (caps[1].to_string(), &text[end..])
        }
        None => (".txt".to_string(), text),
    };
    TextNode::elem(NodeTag::Code)
        .with_attr("type", &ext)
        .with_child(TextNode::verbatim(rest.trim()))
}

fn dotted_extension(path: &str) -> String {
    match path.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() && !ext.contains('/') => format!(".{}", ext),
        _ => String::new(),
    }
}

fn substitute_section_counter(heading: &RawText, index: usize) -> RawText {
    let mut out = heading.clone();
    for token in &mut out.tokens {
        if token.kind == TokenKind::Word && token.text.contains('#') {
            token.text = token.text.replace('#', &index.to_string());
        }
    }
    out
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn texts(items: &[RawText]) -> Vec<String> {
    items.iter().map(|t| t.normalized()).collect()
}

fn convert_text_list(items: &[RawText], cx: &mut ConvertCx) -> Vec<TextNode> {
    items
        .iter()
        .map(|t| TextConverter::new(cx.expected_tags, cx.diags).run(t, false))
        .collect()
}

fn convert_params(items: &[RawParam], cx: &mut ConvertCx) -> Vec<ProcParam> {
    items
        .iter()
        .map(|p| ProcParam {
            name: p.name.normalized(),
            in_out: p.in_out,
            desc: TextConverter::new(cx.expected_tags, cx.diags).run(&p.text, false),
        })
        .collect()
}

fn convert_tparams(items: &[RawTParam], cx: &mut ConvertCx) -> Vec<ProcTParam> {
    items
        .iter()
        .map(|p| ProcTParam {
            ty: p.name.normalized(),
            desc: TextConverter::new(cx.expected_tags, cx.diags).run(&p.text, false),
        })
        .collect()
}

fn convert_returns(items: &[RawReturn], cx: &mut ConvertCx) -> Vec<ProcReturn> {
    items
        .iter()
        .map(|r| ProcReturn {
            ty: r.ty.normalized(),
            desc: TextConverter::new(cx.expected_tags, cx.diags).run(&r.text, false),
        })
        .collect()
}

fn convert_throws(items: &[RawThrow], cx: &mut ConvertCx) -> Vec<ProcThrow> {
    items
        .iter()
        .map(|t| ProcThrow {
            ty: t.ty.normalized(),
            desc: TextConverter::new(cx.expected_tags, cx.diags).run(&t.text, false),
        })
        .collect()
}

/// Converts one token run into a tree of text nodes.
pub struct TextConverter<'a> {
    expected_tags: &'a BTreeSet<String>,
    diags: &'a mut Diagnostics,
}

impl<'a> TextConverter<'a> {
    pub fn new(expected_tags: &'a BTreeSet<String>, diags: &'a mut Diagnostics) -> Self {
        TextConverter {
            expected_tags,
            diags,
        }
    }

    /// Convert `text` into a `div` node. In verbatim mode tags and inline
    /// commands stay literal text and nothing is escaped.
    pub fn run(&mut self, text: &RawText, verbatim: bool) -> TextNode {
        let mut stack: Vec<TextNode> = vec![TextNode::elem(NodeTag::Div)];
        let mut open_tags: Vec<String> = Vec::new();
        let mut link_buf: Option<Vec<Token>> = None;
        let mut at_line_start = true;
        let count = text.tokens.len();

        for (i, token) in text.tokens.iter().enumerate() {
            if link_buf.is_some() {
                if token.command() == Some(Command::EndLink) {
                    let tokens = link_buf.take().unwrap_or_default();
                    self.close_link(&mut stack, tokens);
                } else if let Some(buf) = link_buf.as_mut() {
                    buf.push(token.clone());
                }
                continue;
            }

            if token.kind.is_whitespace() {
                if i == 0 || i + 1 == count {
                    // Leading and trailing whitespace render nothing.
                } else if token.kind == TokenKind::Space && at_line_start {
                    // Indentation after a break renders nothing either.
                } else {
                    let rendered = if token.kind == TokenKind::Space {
                        " "
                    } else {
                        "\n"
                    };
                    push_leaf(&mut stack, TextNode::text(rendered));
                }
            } else if !verbatim && token.kind == TokenKind::HtmlTag {
                self.handle_tag(&mut stack, &mut open_tags, token);
            } else if !verbatim && token.command() == Some(Command::Link) {
                link_buf = Some(Vec::new());
            } else if !verbatim && token.command() == Some(Command::EndLink) {
                self.diags.token_warning(token, "@endlink without @link");
            } else if verbatim {
                push_leaf(&mut stack, TextNode::verbatim(&token.text));
            } else {
                push_leaf(&mut stack, TextNode::text(&token.text));
            }
            at_line_start = token.kind.is_line_break();
        }

        if link_buf.is_some() {
            self.diags.warning("@link without closing @endlink");
        }
        while stack.len() > 1 {
            if let Some(name) = open_tags.pop() {
                self.diags.warning(format!("unclosed tag <{}>", name));
            }
            let node = stack.pop().unwrap_or_default();
            push_leaf(&mut stack, node);
        }
        stack.pop().unwrap_or_default()
    }

    fn handle_tag(&mut self, stack: &mut Vec<TextNode>, open_tags: &mut Vec<String>, token: &Token) {
        let caps = match TAG_RE.captures(&token.text) {
            Some(caps) => caps,
            None => {
                // Not a parseable tag after all; keep it as text.
                push_leaf(stack, TextNode::text(&token.text));
                return;
            }
        };
        let closing = &caps[1] == "/";
        let name = caps[2].to_string();
        let self_closing = &caps[4] == "/";
        if !self.expected_tags.contains(&name) {
            self.diags.token_warning(
                token,
                format!("unknown tag {:?}; expected one of the configured tags", name),
            );
        }

        if closing {
            match open_tags.last() {
                Some(open) if *open == name => {
                    open_tags.pop();
                    pop_elem(stack);
                }
                Some(open) => {
                    self.diags.token_warning(
                        token,
                        format!("closing tag </{}> while <{}> is open", name, open),
                    );
                    open_tags.pop();
                    pop_elem(stack);
                }
                None => {
                    self.diags
                        .token_warning(token, format!("closing tag </{}> was never opened", name));
                }
            }
            return;
        }

        let mut node = TextNode::elem(NodeTag::Html(name.clone()));
        node.raw_html = true;
        for attr in ATTR_RE.captures_iter(&caps[3]) {
            let key = attr[1].to_string();
            let value = attr
                .get(2)
                .or(attr.get(3))
                .map(|m| m.as_str())
                .unwrap_or("");
            node.set_attr(&key, value);
        }
        if self_closing {
            push_leaf(stack, node);
        } else {
            open_tags.push(name);
            stack.push(node);
        }
    }

    /// Close an inline link: the leading word run is the target, anything
    /// after it is the display text (defaulting to the target).
    fn close_link(&mut self, stack: &mut Vec<TextNode>, mut tokens: Vec<Token>) {
        while tokens.first().is_some_and(|t| t.kind.is_whitespace()) {
            tokens.remove(0);
        }
        while tokens.last().is_some_and(|t| t.kind.is_whitespace()) {
            tokens.pop();
        }
        if tokens.is_empty() {
            self.diags.warning("empty @link ... @endlink");
            return;
        }
        let mut target = String::new();
        let mut rest = tokens.as_slice();
        while let Some((first, tail)) = rest.split_first() {
            if first.kind.is_whitespace() {
                break;
            }
            target.push_str(&first.text);
            rest = tail;
        }
        while rest.first().is_some_and(|t| t.kind.is_whitespace()) {
            rest = &rest[1..];
        }
        let mut link = TextNode::elem(NodeTag::Link).with_attr("href", &format!("dox:{}", target));
        if rest.is_empty() {
            link.add_child(TextNode::text(&target));
        } else {
            for token in rest {
                if token.kind.is_whitespace() {
                    link.add_child(TextNode::text(" "));
                } else {
                    link.add_child(TextNode::text(&token.text));
                }
            }
        }
        push_leaf(stack, link);
    }
}

fn push_leaf(stack: &mut [TextNode], node: TextNode) {
    if let Some(top) = stack.last_mut() {
        top.add_child(node);
    }
}

fn pop_elem(stack: &mut Vec<TextNode>) {
    if stack.len() > 1 {
        let node = stack.pop().unwrap_or_default();
        if let Some(top) = stack.last_mut() {
            top.add_child(node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dox::config::DEFAULT_EXPECTED_TAGS;
    use crate::dox::lexer::tokenize;

    fn tags() -> BTreeSet<String> {
        DEFAULT_EXPECTED_TAGS.iter().map(|s| s.to_string()).collect()
    }

    fn convert(input: &str) -> (TextNode, Diagnostics) {
        let tags = tags();
        let mut diags = Diagnostics::new();
        let node = TextConverter::new(&tags, &mut diags)
            .run(&RawText::from_tokens(tokenize(input, "<test>")), false);
        (node, diags)
    }

    #[test]
    fn test_plain_text() {
        let (node, diags) = convert("This is some example.");
        assert_eq!(node.to_html_like(), "<div>This is some example.</div>");
        assert!(diags.is_empty());
    }

    #[test]
    fn test_inline_tag() {
        let (node, diags) = convert("This <b>is</b> some example.");
        assert_eq!(
            node.to_html_like(),
            "<div>This <b>is</b> some example.</div>"
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn test_nested_tags() {
        let (node, _) = convert("<ul><li>Lists</li><li>Lists again!</li></ul>");
        assert_eq!(
            node.to_html_like(),
            "<div><ul><li>Lists</li><li>Lists again!</li></ul></div>"
        );
    }

    #[test]
    fn test_unknown_tag_warns() {
        let (_, diags) = convert("some <blink>text</blink>");
        assert!(diags.warning_count() >= 1);
    }

    #[test]
    fn test_unclosed_tag_warns_and_unwinds() {
        let (node, diags) = convert("some <b>text");
        assert_eq!(node.to_html_like(), "<div>some <b>text</b></div>");
        assert!(diags.warning_count() >= 1);
    }

    #[test]
    fn test_angle_brackets_escaped_in_plain_text() {
        let (node, _) = convert("a < b");
        assert_eq!(node.to_html_like(), "<div>a &lt; b</div>");
    }

    #[test]
    fn test_link_with_title() {
        let (node, diags) = convert("@link Target the title @endlink");
        assert_eq!(
            node.to_html_like(),
            "<div><a href=\"dox:Target\">the title</a></div>"
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn test_link_without_title_displays_target() {
        let (node, _) = convert("see @link Target @endlink here");
        assert_eq!(
            node.to_html_like(),
            "<div>see <a href=\"dox:Target\">Target</a> here</div>"
        );
    }

    #[test]
    fn test_endlink_without_link_warns() {
        let (_, diags) = convert("text @endlink more");
        assert_eq!(diags.warning_count(), 1);
    }

    #[test]
    fn test_verbatim_keeps_everything_literal() {
        let tags = tags();
        let mut diags = Diagnostics::new();
        let node = TextConverter::new(&tags, &mut diags).run(
            &RawText::from_tokens(tokenize("template <typename T>", "<test>")),
            true,
        );
        assert_eq!(node.to_html_like(), "<div>template <typename T></div>");
        assert!(diags.is_empty());
    }

    #[test]
    fn test_inline_code_node_extension() {
        let node = inline_code_node("{.cpp}\nint x;\n");
        assert_eq!(node.attr("type"), Some(".cpp"));
        assert_eq!(node.children[0].text, "int x;");
    }

    #[test]
    fn test_inline_code_node_default_extension() {
        let node = inline_code_node("\nplain text\n");
        assert_eq!(node.attr("type"), Some(".txt"));
    }

    #[test]
    fn test_dotted_extension() {
        assert_eq!(dotted_extension("a/b/demo.cpp"), ".cpp");
        assert_eq!(dotted_extension("Makefile"), "");
    }

    #[test]
    fn test_section_counter_substitution() {
        let heading = RawText::from_tokens(tokenize("Section # overview", "<test>"));
        let replaced = substitute_section_counter(&heading, 3);
        assert_eq!(replaced.text(), "Section 3 overview");
    }
}
