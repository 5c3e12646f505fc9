// Unit tests for the argument tokenizer.
// Grammar reference lives in args/mod.rs.

use crate::args::{Comparison, FlagDefinition, ParsedArguments};

fn pairs(raw: &str) -> Vec<(String, String)> {
    ParsedArguments::parse(raw)
        .iter()
        .map(|argument| (argument.definition.to_string(), argument.value.clone()))
        .collect()
}

fn pair(flag: &str, value: &str) -> (String, String) {
    (flag.to_string(), value.to_string())
}

/// **VALUE**: Verifies aggregated short flags each receive a copy of the value, in order.
///
/// **WHY THIS MATTERS**: `-abc value` is a documented shorthand. Losing an entry or
/// reordering them changes which flag a first-match lookup sees.
///
/// **BUG THIS CATCHES**: Would catch if the aggregated token is treated as one long
/// flag named `abc`, or if only the last character receives the value.
#[test]
fn given_aggregated_short_flags_when_parsed_then_each_gets_value_in_order() {
    // GIVEN / WHEN
    let parsed = pairs("-abc value");

    // THEN
    assert_eq!(
        parsed,
        vec![pair("a", "value"), pair("b", "value"), pair("c", "value")]
    );
}

/// **VALUE**: Verifies aggregated entries are short definitions, not a long one.
///
/// **WHY THIS MATTERS**: Lookups by `'b'` must find the value of `-abc`.
///
/// **BUG THIS CATCHES**: Would catch if the split entries carry long names.
#[test]
fn given_aggregated_short_flags_when_looked_up_by_char_then_found() {
    let args = ParsedArguments::parse("-nvf x");

    assert_eq!(args.find('v', Comparison::CaseSensitive), Some("x"));
    assert_eq!(args.find("-f", Comparison::CaseSensitive), Some("x"));
    assert!(!args.has("nvf", Comparison::CaseSensitive));
}

/// **VALUE**: Verifies a closing quote ends the value even when text follows.
///
/// **WHY THIS MATTERS**: Values with spaces are only possible through quoting, and the
/// quote must delimit the value exactly.
///
/// **BUG THIS CATCHES**: Would catch if `extra` is appended to the value, or if the
/// quotes themselves end up in the value.
#[test]
fn given_quoted_value_with_trailing_text_when_parsed_then_quote_ends_value() {
    let parsed = pairs(r#"--name "quoted value" extra"#);

    assert_eq!(parsed, vec![pair("name", "quoted value")]);
}

/// **VALUE**: Verifies the closing quote ends the value before the next space.
///
/// **WHY THIS MATTERS**: `"a"b` must not produce `ab`.
///
/// **BUG THIS CATCHES**: Would catch if the closing quote is treated as a literal character.
#[test]
fn given_text_glued_after_closing_quote_when_parsed_then_text_is_dropped() {
    let parsed = pairs(r#"--name "a"b --next 1"#);

    assert_eq!(parsed, vec![pair("name", "a"), pair("next", "1")]);
}

/// **VALUE**: Verifies an escaped hyphen never introduces a flag.
///
/// **WHY THIS MATTERS**: Values like negative numbers need a way to start with `-`.
///
/// **BUG THIS CATCHES**: Would catch if escapes are applied after flag detection.
#[test]
fn given_escaped_hyphen_when_parsed_then_literal_value_fragment() {
    assert_eq!(pairs(r"--offset \-5"), vec![pair("offset", "-5")]);
    assert_eq!(
        pairs(r"--name \-notaflag"),
        vec![pair("name", "-notaflag")]
    );
}

/// **VALUE**: Verifies an escaped hyphen at the start of input is not a flag.
///
/// **WHY THIS MATTERS**: `\-notaflag` alone carries no flag, so nothing may be emitted.
///
/// **BUG THIS CATCHES**: Would catch if the escaped text is parsed as flag `notaflag`.
#[test]
fn given_escaped_hyphen_without_flag_when_parsed_then_nothing_emitted() {
    let args = ParsedArguments::parse(r"\-notaflag");

    assert!(args.is_empty());
    assert!(!args.has("notaflag", Comparison::CaseSensitive));
}

/// **VALUE**: Verifies escaped spaces and quotes are kept literally.
///
/// **WHY THIS MATTERS**: Paths with spaces must be passable without quoting.
///
/// **BUG THIS CATCHES**: Would catch if the escape flag is reset before the next char is consumed.
#[test]
fn given_escaped_space_and_quote_when_parsed_then_kept_in_value() {
    assert_eq!(
        pairs(r#"--path C:\ Music\"x"#),
        vec![pair("path", r#"C: Music"x"#)]
    );
}

/// **VALUE**: Pins the rule for a flag directly followed by another flag: no entry.
///
/// **WHY THIS MATTERS**: Lookups use `find`, so an empty placeholder entry would shadow
/// nothing but still make `has` return true for a flag the user gave no value for.
///
/// **BUG THIS CATCHES**: Would catch a change that starts emitting empty-value entries.
#[test]
fn given_flag_followed_by_flag_when_parsed_then_first_not_emitted() {
    assert_eq!(pairs("--a --b x"), vec![pair("b", "x")]);
    assert_eq!(pairs("-a -b x"), vec![pair("b", "x")]);
}

/// **VALUE**: Verifies a trailing flag without a value is not emitted.
///
/// **WHY THIS MATTERS**: Whitespace is never recorded as a value.
///
/// **BUG THIS CATCHES**: Would catch if end-of-input flushes an empty value.
#[test]
fn given_trailing_flag_without_value_when_parsed_then_not_emitted() {
    assert_eq!(pairs("--a 1 --b   "), vec![pair("a", "1")]);
    assert!(ParsedArguments::parse("--lonely").is_empty());
}

/// **VALUE**: Verifies an explicitly quoted empty value is recorded.
///
/// **WHY THIS MATTERS**: It is the only way to pass an empty value on purpose.
///
/// **BUG THIS CATCHES**: Would catch if quoted values go through the whitespace filter.
#[test]
fn given_quoted_empty_value_when_parsed_then_empty_entry() {
    assert_eq!(pairs(r#"--a "" --b 2"#), vec![pair("a", ""), pair("b", "2")]);
}

/// **VALUE**: Verifies bare `-` and `--` tokens are discarded.
///
/// **WHY THIS MATTERS**: They name no flag, so any value after them has no owner.
///
/// **BUG THIS CATCHES**: Would catch if a sentinel "no flag" entry leaks into the result.
#[test]
fn given_bare_hyphen_tokens_when_parsed_then_discarded() {
    assert_eq!(pairs("- x -- y --z 1"), vec![pair("z", "1")]);
}

/// **VALUE**: Verifies hyphens inside names and values are literal.
///
/// **WHY THIS MATTERS**: `--set-startup` is the flag applied before coordination.
///
/// **BUG THIS CATCHES**: Would catch if every hyphen is treated as a flag introducer.
#[test]
fn given_hyphen_inside_name_and_value_when_parsed_then_literal() {
    assert_eq!(
        pairs("--set-startup true --title foo-bar"),
        vec![pair("set-startup", "true"), pair("title", "foo-bar")]
    );
}

/// **VALUE**: Verifies entries preserve input order, duplicates included.
///
/// **WHY THIS MATTERS**: First-match-wins lookups depend on order.
///
/// **BUG THIS CATCHES**: Would catch if results are stored in a map.
#[test]
fn given_repeated_flag_when_parsed_then_order_preserved_and_first_wins() {
    let args = ParsedArguments::parse("--name 1 -x 2 --name 3");

    assert_eq!(args.len(), 3);
    assert_eq!(args.find("name", Comparison::CaseSensitive), Some("1"));
}

/// **VALUE**: Verifies text before any flag is ignored.
///
/// **WHY THIS MATTERS**: Shells and launchers sometimes prepend stray tokens.
///
/// **BUG THIS CATCHES**: Would catch if positional text is parsed as a flag name.
#[test]
fn given_positional_text_when_parsed_then_ignored() {
    assert_eq!(pairs("stray words --a 1"), vec![pair("a", "1")]);
}

/// **VALUE**: Verifies an unterminated quote degrades to the buffered text.
///
/// **WHY THIS MATTERS**: The parser is total; malformed input yields partial results.
///
/// **BUG THIS CATCHES**: Would catch if an open quote swallows the value entirely.
#[test]
fn given_unterminated_quote_when_parsed_then_partial_value() {
    assert_eq!(pairs(r#"--a "open value"#), vec![pair("a", "open value")]);
}

/// **VALUE**: Verifies the parser never panics on hostile input.
///
/// **WHY THIS MATTERS**: It runs before logging and coordination on every launch.
///
/// **BUG THIS CATCHES**: Would catch index-based slicing on multi-byte characters or
/// unchecked state transitions.
#[test]
fn given_malformed_inputs_when_parsed_then_returns_without_panicking() {
    let inputs = [
        "",
        " ",
        "\\",
        "\"",
        "-",
        "--",
        "---",
        "--\"",
        "-\\",
        "\"\"\"",
        "-- -- --",
        "--a \"\\",
        "--ä ö -üß ✓",
        "\\\\\\\\",
        "- - - \" \" \"",
    ];

    for input in inputs {
        let _ = ParsedArguments::parse(input);
    }
}

/// **VALUE**: Verifies long names with a single character stay long.
///
/// **WHY THIS MATTERS**: `--v` and `-v` are different spellings; only the short one
/// should match a short lookup.
///
/// **BUG THIS CATCHES**: Would catch if one-character long names are converted to short.
#[test]
fn given_single_char_long_flag_when_parsed_then_long_definition() {
    let args = ParsedArguments::parse("--v 1");

    assert!(args.has(FlagDefinition::long("v"), Comparison::CaseSensitive));
    assert!(!args.has('v', Comparison::CaseSensitive));
}

/// **VALUE**: Verifies token sequences are joined with single spaces before parsing.
///
/// **WHY THIS MATTERS**: `from_env` feeds `std::env::args_os` through this path.
///
/// **BUG THIS CATCHES**: Would catch if tokens are concatenated without separators.
#[test]
fn given_token_sequence_when_parsed_then_same_as_joined_string() {
    let from_tokens = ParsedArguments::parse_tokens(["--set-startup", "TRUE", "-ab", "7"]);
    let from_string = ParsedArguments::parse("--set-startup TRUE -ab 7");

    assert_eq!(from_tokens, from_string);
    assert_eq!(from_tokens.len(), 3);
}
