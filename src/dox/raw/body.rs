//! Entry bodies: the ordered sequence of paragraphs, sections, and
//! inclusions between an entry's clauses.

use crate::dox::raw::text::RawText;

/// One node of an entry body, in document order.
///
/// Verbatim nodes (`Code`, `HtmlOnly`) store their inner text as plain
/// strings so equality is exact; everything else stays token-backed with
/// whitespace-normalized equality.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyNode {
    Paragraph(RawText),
    /// `@section` (level 0) or `@subsection` (level 1) heading.
    Section { heading: RawText, level: u8 },
    /// `@code{ext} ... @endcode`; the text includes the `{ext}` prefix.
    Code(String),
    /// `@htmlonly ... @endhtmlonly`.
    HtmlOnly(String),
    Include { path: RawText },
    Snippet { path: RawText, name: RawText },
}

/// A documentation body: the ordered [`BodyNode`]s of one entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawBody {
    pub nodes: Vec<BodyNode>,
}

impl RawBody {
    pub fn new() -> RawBody {
        RawBody { nodes: Vec::new() }
    }

    pub fn push(&mut self, node: BodyNode) {
        self.nodes.push(node);
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dox::lexer::tokenize;

    #[test]
    fn test_paragraph_equality_is_normalized() {
        let a = BodyNode::Paragraph(RawText::from_tokens(tokenize("one two", "<test>")));
        let b = BodyNode::Paragraph(RawText::from_tokens(tokenize("one\ntwo", "<test>")));
        assert_eq!(a, b);
    }

    #[test]
    fn test_code_equality_is_exact() {
        let a = BodyNode::Code("{.cpp}\nint x;\n".to_string());
        let b = BodyNode::Code("{.cpp}\nint  x;\n".to_string());
        assert_ne!(a, b);
        assert_eq!(a.clone(), a);
    }
}
