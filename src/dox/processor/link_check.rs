//! Link checking over resolved text trees.
//!
//! Every link node whose `href` uses the `dox:` scheme must name a
//! registered entry. Unresolved links are reported with the owning entry's
//! location; they never abort the run.

use crate::dox::diagnostics::Diagnostics;
use crate::dox::processor::doc::ProcDoc;
use crate::dox::processor::text_node::NodeTag;

/// Pass 4 of the document processor.
pub fn check_links(doc: &ProcDoc, diags: &mut Diagnostics) {
    for id in doc.ids() {
        let entry = doc.get(id);
        let location = entry.core().location.clone();
        let owner = entry.name().to_string();
        entry.for_each_text_node(&mut |node| {
            if node.tag != NodeTag::Link {
                return;
            }
            let target = match node.attr("href").and_then(|h| h.strip_prefix("dox:")) {
                Some(target) => target,
                None => return, // external link
            };
            if !doc.entries.contains_key(target) {
                diags.error_at(
                    &location.file,
                    location.line,
                    format!(
                        "cannot find documentation entry {:?} linked from {:?}",
                        target, owner
                    ),
                );
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use crate::dox::testing;

    #[test]
    fn test_resolved_see_link_passes() {
        let (_, diags) = testing::process("@class A\n@class B\n@see A\n");
        assert_eq!(diags.error_count(), 0);
    }

    #[test]
    fn test_unresolved_see_link_is_reported() {
        let (_, diags) = testing::process("@class A\n@see Ghost\n");
        assert_eq!(diags.error_count(), 1);
        assert!(diags.items()[0].message.contains("Ghost"));
    }

    #[test]
    fn test_external_see_link_is_not_checked() {
        let (_, diags) = testing::process("@class A\n@see http://example.com/docs\n");
        assert_eq!(diags.error_count(), 0);
    }

    #[test]
    fn test_inline_link_is_checked() {
        let (_, diags) =
            testing::process("@page P Title\n\nSee @link Missing @endlink for more.\n");
        assert_eq!(diags.error_count(), 1);
    }
}
