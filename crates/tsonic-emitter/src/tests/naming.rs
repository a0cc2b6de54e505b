use super::*;

#[test]
fn reserved_words_get_at_prefix() {
    assert_eq!(escape_identifier("class"), "@class");
    assert_eq!(escape_identifier("event"), "@event");
    assert_eq!(escape_identifier("value"), "value");
}

#[test]
fn contextual_keywords_are_not_escaped() {
    assert_eq!(escape_identifier("var"), "var");
    assert_eq!(escape_identifier("init"), "init");
    assert_eq!(escape_identifier("record"), "record");
    assert_eq!(escape_identifier("yield"), "yield");
}

#[test]
fn qualified_names_escape_each_segment() {
    assert_eq!(escape_qualified_name("Foo.class.Bar"), "Foo.@class.Bar");
}

#[test]
fn global_prefix_is_preserved() {
    assert_eq!(
        escape_qualified_name("global::Tsonic.Runtime.Union"),
        "global::Tsonic.Runtime.Union"
    );
    assert_eq!(
        escape_qualified_name("global::App.this.Mod"),
        "global::App.@this.Mod"
    );
}
