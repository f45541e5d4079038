//! Per-kind parser tests: each entry kind parses into the expected raw
//! structure and re-emits canonical dox text.
//!
//! The formatted expectations pin the canonical layout down to the byte, so
//! they double as regression tests for the formatter.

use dox::dox::raw::{BodyNode, EntryKind, InOut, RawEntry};
use dox::dox::testing;

#[test]
fn test_minimal_class_formats_back() {
    assert_eq!(testing::reformat("@class Klass", 77), "@class Klass\n");
}

#[test]
fn test_two_minimal_entries() {
    let formatted = testing::reformat("@class A\n@brief Brief A\n@class B\n", 77);
    assert_eq!(formatted, "@class A\n\n@brief Brief A\n\n@class B\n");
}

#[test]
fn test_full_class_layout() {
    let source = "@class Klass\n\
                  @implements Concept\n\
                  @extends Other\n\
                  @headerfile <demo/base.h>\n\
                  @brief This is a brief text.\n\
                  @deprecated Deprecation message.\n\
                  @signature template <typename T>\n\
                  \x20          class Klass;\n\
                  @tparam T The type.\n\
                  \n\
                  @section First section.\n\
                  \n\
                  This is the first paragraph.\n\
                  \n\
                  @see Other\n";
    insta::assert_snapshot!(testing::reformat(source, 50), @r###"
    @class Klass

    @implements Concept

    @extends Other

    @headerfile <demo/base.h>

    @brief This is a brief text.

    @deprecated Deprecation message.

    @signature template <typename T> class Klass;

    @tparam T The type.

    @section First section.

    This is the first paragraph.

    @see Other
    "###);
}

#[test]
fn test_full_function_layout() {
    let source = "@fn funktion\n\
                  @brief Brief.\n\
                  @signature TRes funktion(TParam p1);\n\
                  @param[in] p1 The first parameter.\n\
                  @param p2 The second parameter.\n\
                  @return TRes The return value.\n\
                  @throw Exception The thrown exception.\n\
                  @datarace Thread safe.\n\
                  @see Other\n";
    let expected = "@fn funktion\n\n\
                    @brief Brief.\n\n\
                    @signature TRes funktion(TParam p1);\n\n\
                    @param[in] p1 The first parameter.\n\
                    @param p2 The second parameter.\n\n\
                    @return TRes The return value.\n\n\
                    @throw Exception The thrown exception.\n\n\
                    @datarace Thread safe.\n\n\
                    @see Other\n";
    assert_eq!(testing::reformat(source, 77), expected);
}

#[test]
fn test_function_clause_structure() {
    let doc = testing::parse(
        "@fn funktion\n\
         @param[in] p1 The first parameter.\n\
         @param p2 The second parameter.\n\
         @return bool Whether it worked.\n\
         @throw Exception On failure.\n\
         @datarace Thread safe.\n",
    );
    match &doc.entries[0] {
        RawEntry::Function(f) => {
            assert_eq!(f.params.len(), 2);
            assert_eq!(f.params[0].name.text(), "p1");
            assert_eq!(f.params[0].in_out, Some(InOut::In));
            assert_eq!(f.params[1].in_out, None);
            assert_eq!(f.returns.len(), 1);
            assert_eq!(f.returns[0].ty.text(), "bool");
            assert_eq!(f.returns[0].text.text(), "Whether it worked.");
            assert_eq!(f.throws.len(), 1);
            assert_eq!(f.throws[0].ty.text(), "Exception");
            assert_eq!(f.dataraces.len(), 1);
        }
        other => panic!("unexpected entry: {other:?}"),
    }
}

#[test]
fn test_variable_gets_trailing_semicolon() {
    assert_eq!(
        testing::reformat("@var int var\n@brief B.\n", 77),
        "@var int var;\n\n@brief B.\n"
    );
    // Formatting is idempotent: the added semicolon is stripped on re-parse.
    let once = testing::reformat("@var int var\n@brief B.\n", 77);
    assert_eq!(testing::reformat(&once, 77), once);
}

#[test]
fn test_member_variable() {
    let doc = testing::parse("@var Klass::Type Klass::var");
    assert_eq!(doc.entries[0].kind(), EntryKind::MemberVariable);
    assert_eq!(
        testing::reformat("@var Klass::Type Klass::var", 77),
        "@var Klass::Type Klass::var;\n"
    );
}

#[test]
fn test_page_with_inclusions_and_code() {
    let source = "@page Page Title\n\
                  @include example.cpp\n\
                  @snippet example.cpp Snippet Name\n\
                  @code{.cpp}\n\
                  int main() { return 0; }\n\
                  @endcode\n";
    let doc = testing::parse(source);
    let body = &doc.entries[0].core().body;
    assert_eq!(body.nodes.len(), 3);
    match &body.nodes[1] {
        BodyNode::Snippet { path, name } => {
            assert_eq!(path.text(), "example.cpp");
            assert_eq!(name.text(), "Snippet Name");
        }
        other => panic!("unexpected node: {other:?}"),
    }
    let expected = "@page Page Title\n\n\
                    @include example.cpp\n\n\
                    @snippet example.cpp Snippet Name\n\n\
                    @code{.cpp}\nint main() { return 0; }\n@endcode\n";
    assert_eq!(testing::reformat(source, 77), expected);
}

#[test]
fn test_group_and_tag_and_enum() {
    let doc = testing::parse(
        "@defgroup GroupName Group Title\n@brief G.\n\
         @tag GroupName#TagName\n@brief T.\n\
         @enum Enum\n@brief E.\n\
         @adaption Adaption\n@brief A.\n\
         @typedef Klass::Typedef\n@brief T.\n",
    );
    let kinds: Vec<EntryKind> = doc.entries.iter().map(|e| e.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            EntryKind::Group,
            EntryKind::GroupedTag,
            EntryKind::Enum,
            EntryKind::Adaption,
            EntryKind::MemberTypedef,
        ]
    );
}

#[test]
fn test_mainpage_formats_title_only() {
    assert_eq!(
        testing::reformat("@mainpage The Main Page\n@brief Intro.\n", 77),
        "@mainpage The Main Page\n\n@brief Intro.\n"
    );
}

#[test]
fn test_note_warning_aka_internal_clauses() {
    let doc = testing::parse(
        "@class Klass\n\
         @note A note.\n\
         @warning A warning.\n\
         @aka OldName\n\
         @internal\n",
    );
    let code = doc.entries[0].code().unwrap();
    assert_eq!(code.notes.len(), 1);
    assert_eq!(code.notes[0].text(), "A note.");
    assert_eq!(code.warnings.len(), 1);
    assert_eq!(code.akas.len(), 1);
    assert_eq!(code.akas[0].text(), "OldName");
    assert_eq!(code.internals.len(), 1);
}

#[test]
fn test_htmlonly_is_verbatim() {
    let doc = testing::parse(
        "@page P Title\n@htmlonly\n<marquee class=\"x\">wild</marquee>\n@endhtmlonly\n",
    );
    match &doc.entries[0].core().body.nodes[0] {
        BodyNode::HtmlOnly(text) => {
            assert_eq!(text, "\n<marquee class=\"x\">wild</marquee>\n");
        }
        other => panic!("unexpected node: {other:?}"),
    }
}

#[test]
fn test_multiline_clause_text_is_normalized() {
    let doc = testing::parse(
        "@class Klass\n@brief A brief   that continues\n   on the next line.\n",
    );
    let brief = &doc.entries[0].core().briefs[0];
    assert_eq!(brief.normalized(), "A brief that continues on the next line.");
}
