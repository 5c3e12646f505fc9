use crate::args::{Comparison, FlagDefinition, ParsedArgument};

/// **VALUE**: Verifies the string spellings a caller can use for a definition.
///
/// **WHY THIS MATTERS**: Lookups accept `"name"`, `"--name"`, `"n"` and `"-n"` interchangeably.
///
/// **BUG THIS CATCHES**: Would catch if a prefix is kept in the stored name.
#[test]
fn given_string_spellings_when_converted_then_long_or_short() {
    assert_eq!(FlagDefinition::from("name"), FlagDefinition::long("name"));
    assert_eq!(FlagDefinition::from("--name"), FlagDefinition::long("name"));
    assert_eq!(FlagDefinition::from("n"), FlagDefinition::short('n'));
    assert_eq!(FlagDefinition::from("-n"), FlagDefinition::short('n'));
    assert_eq!(FlagDefinition::from("--n"), FlagDefinition::long("n"));
}

/// **VALUE**: Verifies the "no flag" spellings.
///
/// **WHY THIS MATTERS**: The sentinel must be recognizable so the parser can discard it.
///
/// **BUG THIS CATCHES**: Would catch if `-` becomes a short flag named `-`.
#[test]
fn given_empty_or_bare_hyphen_when_converted_then_none() {
    assert!(FlagDefinition::from("").is_none());
    assert!(FlagDefinition::from("-").is_none());
    assert!(FlagDefinition::from("--").is_none());
    assert!(FlagDefinition::from('-').is_none());
    assert!(FlagDefinition::from('\0').is_none());
}

/// **VALUE**: Verifies the sentinel never matches, not even itself.
///
/// **WHY THIS MATTERS**: Two definitions with only empty components would otherwise
/// match each other, making every short-only lookup hit every long-only entry.
///
/// **BUG THIS CATCHES**: Would catch comparing empty names as equal.
#[test]
fn given_disjoint_components_when_matched_then_no_match() {
    let long = FlagDefinition::long("name");
    let short = FlagDefinition::short('n');

    assert!(!long.matches(&short, Comparison::CaseSensitive));
    assert!(!FlagDefinition::NONE.matches(&FlagDefinition::NONE, Comparison::IgnoreCase));
}

/// **VALUE**: Verifies either component matching is enough.
///
/// **WHY THIS MATTERS**: A definition with both names should find `--name` and `-n`.
///
/// **BUG THIS CATCHES**: Would catch requiring both components to match.
#[test]
fn given_definition_with_both_names_when_matched_then_either_component_matches() {
    let both = FlagDefinition::new("name", Some('n'));

    assert!(both.matches(&FlagDefinition::long("name"), Comparison::CaseSensitive));
    assert!(both.matches(&FlagDefinition::short('n'), Comparison::CaseSensitive));
}

/// **VALUE**: Verifies the caller-chosen comparison is honoured for both components.
///
/// **WHY THIS MATTERS**: `--Set-Startup TRUE` must be accepted by a case-insensitive lookup
/// and rejected by a case-sensitive one.
///
/// **BUG THIS CATCHES**: Would catch ignoring the comparison for short names.
#[test]
fn given_different_case_when_matched_then_depends_on_comparison() {
    let parsed = FlagDefinition::long("Set-Startup");
    let wanted = FlagDefinition::long("set-startup");

    assert!(!parsed.matches(&wanted, Comparison::CaseSensitive));
    assert!(parsed.matches(&wanted, Comparison::IgnoreCase));

    let short = FlagDefinition::short('N');
    assert!(!short.matches(&FlagDefinition::short('n'), Comparison::CaseSensitive));
    assert!(short.matches(&FlagDefinition::short('n'), Comparison::IgnoreCase));
}

/// **VALUE**: Verifies the `name=value` display form used in diagnostics.
#[test]
fn given_parsed_argument_when_displayed_then_name_equals_value() {
    let argument = ParsedArgument::new(FlagDefinition::long("set-startup"), "true");

    assert_eq!(argument.to_string(), "set-startup=true");
}
