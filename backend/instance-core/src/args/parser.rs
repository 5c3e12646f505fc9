//! Character level tokenizer for Unix style argument strings.
//!
//! `--arg1 "test" -bc 7` becomes `[arg1=test, b=7, c=7]`.
//!
//! The tokenizer is total: any input produces a (possibly empty) list, never an error.

use crate::args::flag::{FlagDefinition, ParsedArgument};

use log::debug;

const ESCAPE: char = '\\';
const QUOTE: char = '"';
const HYPHEN: char = '-';
const SEPARATOR: char = ' ';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stage {
    ReadingName,
    ReadingValue,
}

/// Transient state of one [`tokenize`] call.
#[derive(Debug)]
pub(crate) struct ParseState {
    buffer: String,
    stage: Stage,
    /// Current name token was introduced by a single hyphen and holds several characters.
    multi: bool,
    escape_next: bool,
    quoted: bool,
    hyphens: usize,
    flag: Option<FlagDefinition>,
    parsed: Vec<ParsedArgument>,
}

impl ParseState {
    fn new() -> Self {
        Self {
            buffer: String::new(),
            stage: Stage::ReadingName,
            multi: false,
            escape_next: false,
            quoted: false,
            hyphens: 0,
            flag: None,
            parsed: Vec::new(),
        }
    }

    fn feed(&mut self, c: char) {
        if self.escape_next {
            self.escape_next = false;
            self.buffer.push(c);
            return;
        }

        match (c, self.stage) {
            (ESCAPE, _) => self.escape_next = true,

            (QUOTE, Stage::ReadingValue) => self.on_quote(),
            (QUOTE, Stage::ReadingName) => {}

            (SEPARATOR, Stage::ReadingName) => self.finish_name(),
            (SEPARATOR, Stage::ReadingValue) if self.quoted => self.buffer.push(c),
            (SEPARATOR, Stage::ReadingValue) => {
                if self.buffer.trim().is_empty() {
                    self.buffer.clear();
                } else {
                    self.emit(false);
                }
            }

            (HYPHEN, Stage::ReadingName) if self.buffer.is_empty() => self.hyphens += 1,
            (HYPHEN, Stage::ReadingValue) if !self.quoted && self.buffer.is_empty() => {
                // A new flag token starts before the current flag received any value.
                self.emit(false);
                self.hyphens = 1;
            }

            _ => self.buffer.push(c),
        }
    }

    fn on_quote(&mut self) {
        if self.quoted {
            self.emit(true);
        } else if self.buffer.trim().is_empty() {
            self.buffer.clear();
            self.quoted = true;
        } else {
            self.emit(false);
        }
    }

    /// Interprets the buffered name token and moves to [`Stage::ReadingValue`].
    fn finish_name(&mut self) {
        let text = std::mem::take(&mut self.buffer);
        let hyphens = std::mem::take(&mut self.hyphens);

        if hyphens == 0 {
            if !text.trim().is_empty() {
                debug!("Discarding text outside of any flag: '{text}'");
            }
            return;
        }

        if text.is_empty() {
            debug!("Discarding bare '{}' token", "-".repeat(hyphens));
            return;
        }

        let mut chars = text.chars();
        let definition = match (hyphens, chars.next(), chars.next()) {
            (1, Some(short), None) => FlagDefinition::short(short),
            (1, _, _) => {
                self.multi = true;
                FlagDefinition::long(text)
            }
            _ => FlagDefinition::long(text),
        };

        self.flag = Some(definition);
        self.stage = Stage::ReadingValue;
    }

    /// Emits the current flag with the buffered value, then resets to [`Stage::ReadingName`].
    ///
    /// Whitespace-only values are dropped unless `explicit` (a closed quote pair) is set.
    fn emit(&mut self, explicit: bool) {
        let value = std::mem::take(&mut self.buffer);
        let flag = self.flag.take();
        let multi = std::mem::take(&mut self.multi);

        self.stage = Stage::ReadingName;
        self.quoted = false;
        self.hyphens = 0;

        let Some(definition) = flag else {
            return;
        };

        if !explicit && value.trim().is_empty() {
            debug!("Flag '{definition}' has no value, not recorded");
            return;
        }

        match definition.name() {
            Some(aggregated) if multi => {
                for short in aggregated.chars() {
                    self.push(FlagDefinition::from(short), value.clone());
                }
            }
            _ => self.push(definition, value),
        }
    }

    fn push(&mut self, definition: FlagDefinition, value: String) {
        if definition.is_none() {
            debug!("Discarding value '{value}' without a flag");
            return;
        }

        self.parsed.push(ParsedArgument::new(definition, value));
    }

    fn finish(mut self) -> Vec<ParsedArgument> {
        if self.escape_next {
            debug!("Ignoring trailing escape character");
        }

        if self.stage == Stage::ReadingName {
            self.finish_name();
        }

        if self.stage == Stage::ReadingValue {
            self.emit(false);
        }

        self.parsed
    }
}

/// Tokenizes `raw` into ordered flag/value pairs.
pub(crate) fn tokenize(raw: &str) -> Vec<ParsedArgument> {
    let mut state = ParseState::new();
    for c in raw.chars() {
        state.feed(c);
    }
    state.finish()
}
