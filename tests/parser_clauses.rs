//! Clause whitelist enforcement and clause boundary behavior across entry
//! kinds.

use rstest::rstest;

use dox::dox::parser::parse_text;
use dox::dox::raw::RawEntry;
use dox::dox::testing;

#[rstest]
#[case("@page P Title", "@param")]
#[case("@page P Title", "@tparam")]
#[case("@page P Title", "@extends")]
#[case("@page P Title", "@headerfile")]
#[case("@mainpage Title", "@signature")]
#[case("@defgroup G Title", "@deprecated")]
#[case("@concept C", "@param")]
#[case("@concept C", "@implements")]
#[case("@macro M", "@tparam")]
#[case("@enum E", "@param")]
#[case("@typedef T", "@extends")]
#[case("@var int v", "@return")]
#[case("@class K", "@datarace")]
fn whitelist_rejects(#[case] head: &str, #[case] cmd: &str) {
    let source = format!("{}\n{} x text\n", head, cmd);
    let err = parse_text(&source, "<test>").unwrap_err();
    assert!(err.msg.contains(cmd), "message should name {}: {}", cmd, err);
    assert!(
        err.msg.contains("allowed commands"),
        "message should name the allowed set: {}",
        err
    );
}

#[rstest]
#[case("@class K", "@implements")]
#[case("@class K", "@tparam")]
#[case("@concept C", "@extends")]
#[case("@fn f", "@throw")]
#[case("@fn f", "@datarace")]
#[case("@macro M", "@param")]
#[case("@mfn M", "@tparam")]
#[case("@tag T", "@tparam")]
#[case("@enum E", "@headerfile")]
#[case("@page P Title", "@section")]
fn whitelist_accepts(#[case] head: &str, #[case] cmd: &str) {
    let source = format!("{}\n{} x text\n", head, cmd);
    assert!(parse_text(&source, "<test>").is_ok(), "{} in {}", cmd, head);
}

#[test]
fn test_clause_ends_at_blank_line_only() {
    // A single line break continues the clause text.
    let doc = testing::parse("@class K\n@brief spans\ntwo lines\n\nA paragraph.\n");
    let entry = &doc.entries[0];
    assert_eq!(entry.core().briefs[0].normalized(), "spans two lines");
    assert_eq!(entry.core().body.nodes.len(), 1);
}

#[test]
fn test_clause_ends_at_next_clause_command() {
    let doc = testing::parse("@class K\n@brief the brief\n@see Other\n");
    let entry = &doc.entries[0];
    assert_eq!(entry.core().briefs[0].normalized(), "the brief");
    assert_eq!(entry.core().sees.len(), 1);
}

#[test]
fn test_item_command_ends_entry_from_inside_clause() {
    let doc = testing::parse("@class K\n@brief brief of K\n@enum E\n");
    assert_eq!(doc.entries.len(), 2);
    assert_eq!(doc.entries[0].core().briefs.len(), 1);
}

#[test]
fn test_multiple_signatures_accumulate_in_order() {
    let doc = testing::parse(
        "@fn f\n@signature TRes1 f(T1 x);\n@signature TRes2 f(T2 x);\n",
    );
    let code = doc.entries[0].code().unwrap();
    assert_eq!(code.signatures.len(), 2);
    assert_eq!(code.signatures[0].normalized(), "TRes1 f(T1 x);");
    assert_eq!(code.signatures[1].normalized(), "TRes2 f(T2 x);");
}

#[test]
fn test_param_direction_markers() {
    let doc = testing::parse(
        "@fn f\n@param[in] a In.\n@param[out] b Out.\n@param[in,out] c Both.\n@param d None.\n",
    );
    match &doc.entries[0] {
        RawEntry::Function(f) => {
            use dox::dox::raw::InOut;
            let dirs: Vec<Option<InOut>> = f.params.iter().map(|p| p.in_out).collect();
            assert_eq!(
                dirs,
                vec![
                    Some(InOut::In),
                    Some(InOut::Out),
                    Some(InOut::InOut),
                    None
                ]
            );
        }
        other => panic!("unexpected entry: {other:?}"),
    }
}

#[test]
fn test_code_swallows_blank_lines() {
    let doc = testing::parse("@page P T\n@code{.txt}\nfirst\n\nsecond\n@endcode\n");
    match &doc.entries[0].core().body.nodes[0] {
        dox::dox::raw::BodyNode::Code(text) => {
            assert_eq!(text, "{.txt}\nfirst\n\nsecond\n");
        }
        other => panic!("unexpected node: {other:?}"),
    }
}

#[test]
fn test_include_path_with_hash() {
    let doc = testing::parse("@page P T\n@include path/to/file#hash\n");
    match &doc.entries[0].core().body.nodes[0] {
        dox::dox::raw::BodyNode::Include { path } => {
            assert_eq!(path.text(), "path/to/file#hash");
        }
        other => panic!("unexpected node: {other:?}"),
    }
}

#[test]
fn test_error_location_points_at_offending_token() {
    let err = parse_text("@page P Title\n@param x text\n", "doc.dox").unwrap_err();
    let token = err.token.expect("token location");
    assert_eq!(token.file, "doc.dox");
    assert_eq!(token.line, 2);
    assert_eq!(token.column, 1);
}
