use std::fmt::{Display, Formatter, Result as FormatResult};

/// How flag names are compared during lookups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Comparison {
    #[default]
    CaseSensitive,
    IgnoreCase,
}

impl Comparison {
    fn names_equal(self, left: &str, right: &str) -> bool {
        match self {
            Comparison::CaseSensitive => left == right,
            Comparison::IgnoreCase => left.to_lowercase() == right.to_lowercase(),
        }
    }

    fn chars_equal(self, left: char, right: char) -> bool {
        match self {
            Comparison::CaseSensitive => left == right,
            Comparison::IgnoreCase => left.to_lowercase().eq(right.to_lowercase()),
        }
    }
}

/// Identifies a flag by a long name, a short name, or both.
///
/// Conversions accept the spellings a caller would type:
///
/// | input | result |
/// |---|---|
/// | `"name"`, `"--name"` | long `name` |
/// | `"n"`, `"-n"` | short `n` |
/// | `""`, `"-"`, `"--"` | [`FlagDefinition::NONE`] |
/// | `'n'` | short `n` |
/// | `'-'`, `'\0'` | [`FlagDefinition::NONE`] |
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagDefinition {
    name: String,
    short: Option<char>,
}

impl FlagDefinition {
    /// The "no flag" sentinel. Never matches anything, including itself.
    pub const NONE: FlagDefinition = FlagDefinition {
        name: String::new(),
        short: None,
    };

    pub fn new(name: impl Into<String>, short: Option<char>) -> Self {
        Self {
            name: name.into(),
            short,
        }
    }

    pub fn long(name: impl Into<String>) -> Self {
        Self::new(name, None)
    }

    pub fn short(short: char) -> Self {
        Self::new(String::new(), Some(short))
    }

    pub fn name(&self) -> Option<&str> {
        (!self.name.is_empty()).then_some(self.name.as_str())
    }

    pub fn short_name(&self) -> Option<char> {
        self.short
    }

    pub fn is_none(&self) -> bool {
        self.name.is_empty() && self.short.is_none()
    }

    /// `true` when either the long names or the short names are present on both sides and equal.
    pub fn matches(&self, other: &FlagDefinition, comparison: Comparison) -> bool {
        let long_match = !self.name.is_empty()
            && !other.name.is_empty()
            && comparison.names_equal(&self.name, &other.name);

        let short_match = match (self.short, other.short) {
            (Some(left), Some(right)) => comparison.chars_equal(left, right),
            _ => false,
        };

        long_match || short_match
    }
}

impl From<&str> for FlagDefinition {
    fn from(text: &str) -> Self {
        let trimmed = text.strip_prefix("--").or_else(|| text.strip_prefix('-'));
        let dashed_single = text.starts_with('-') && !text.starts_with("--");

        match trimmed {
            Some("") => FlagDefinition::NONE,
            Some(rest) if dashed_single => {
                let mut chars = rest.chars();
                match (chars.next(), chars.next()) {
                    (Some(short), None) => FlagDefinition::short(short),
                    // "-abc" names several short flags at once; a definition can only hold one
                    _ => FlagDefinition::long(rest),
                }
            }
            Some(rest) => FlagDefinition::long(rest),
            None => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (None, _) => FlagDefinition::NONE,
                    (Some(short), None) => FlagDefinition::short(short),
                    _ => FlagDefinition::long(text),
                }
            }
        }
    }
}

impl From<String> for FlagDefinition {
    fn from(text: String) -> Self {
        FlagDefinition::from(text.as_str())
    }
}

impl From<char> for FlagDefinition {
    fn from(short: char) -> Self {
        match short {
            '-' | '\0' => FlagDefinition::NONE,
            short => FlagDefinition::short(short),
        }
    }
}

impl Display for FlagDefinition {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        match (self.name(), self.short) {
            (Some(name), _) => write!(formatter, "{name}"),
            (None, Some(short)) => write!(formatter, "{short}"),
            (None, None) => Ok(()),
        }
    }
}

/// A flag paired with the value text that followed it (possibly empty).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArgument {
    pub definition: FlagDefinition,
    pub value: String,
}

impl ParsedArgument {
    pub fn new(definition: FlagDefinition, value: impl Into<String>) -> Self {
        Self {
            definition,
            value: value.into(),
        }
    }

    pub fn matches(&self, definition: &FlagDefinition, comparison: Comparison) -> bool {
        self.definition.matches(definition, comparison)
    }
}

impl Display for ParsedArgument {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        write!(formatter, "{}={}", self.definition, self.value)
    }
}
