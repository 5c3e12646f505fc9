//! Command-line argument tokenizer.
//!
//! Interprets the process arguments before single-instance coordination runs, so
//! flags such as `--set-startup` take effect even on a launch that ends up forwarding
//! to an already running instance.
//!
//! # Grammar
//!
//! - `--name value`: long flag
//! - `-n value`: short flag
//! - `-nvf value`: aggregated short flags, each receiving a copy of `value`
//! - `--name "quoted value"`: spaces allowed inside quotes, the closing quote ends the value
//! - `\x`: the escaped character is literal (`\-`, `\"`, `\ `)
//!
//! A flag without a value is not recorded, so `--a --b x` yields only `b=x`.
//! An explicitly quoted empty value (`--a ""`) is recorded with an empty value.

mod flag;
mod parser;

pub use flag::{Comparison, FlagDefinition, ParsedArgument};

use std::slice::Iter;

use log::debug;

/// Ordered result of a parse. Lookups are first-match-wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArguments {
    arguments: Vec<ParsedArgument>,
}

impl ParsedArguments {
    /// Parses a raw argument string.
    pub fn parse(raw: &str) -> Self {
        debug!("Parsing arguments: {raw}");

        let arguments = parser::tokenize(raw);

        debug!(
            "Parsed arguments: '{}'",
            arguments
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("', '")
        );

        Self { arguments }
    }

    /// Parses a token sequence joined with single spaces.
    pub fn parse_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = tokens
            .into_iter()
            .map(|token| token.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join(" ");
        Self::parse(&joined)
    }

    /// Parses the arguments this process was started with, skipping the executable path.
    ///
    /// Arguments that are not valid Unicode are parsed lossily.
    pub fn from_env() -> Self {
        Self::parse_tokens(
            std::env::args_os()
                .skip(1)
                .map(|token| token.to_string_lossy().into_owned()),
        )
    }

    /// Value of the first argument matching `definition`.
    pub fn find(
        &self,
        definition: impl Into<FlagDefinition>,
        comparison: Comparison,
    ) -> Option<&str> {
        let definition = definition.into();
        self.arguments
            .iter()
            .find(|argument| argument.matches(&definition, comparison))
            .map(|argument| argument.value.as_str())
    }

    /// Whether any argument matches `definition`.
    pub fn has(&self, definition: impl Into<FlagDefinition>, comparison: Comparison) -> bool {
        self.find(definition, comparison).is_some()
    }

    pub fn iter(&self) -> Iter<'_, ParsedArgument> {
        self.arguments.iter()
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }
}

impl<'a> IntoIterator for &'a ParsedArguments {
    type Item = &'a ParsedArgument;
    type IntoIter = Iter<'a, ParsedArgument>;

    fn into_iter(self) -> Self::IntoIter {
        self.arguments.iter()
    }
}
