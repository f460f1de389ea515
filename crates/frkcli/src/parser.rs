use std::collections::BTreeMap;
use std::io::Write;

use crate::error::ParseError;
use crate::registry::{ArgKind, ArgRegistry};

/// Values and flags matched by one parse call.
///
/// Every registered flag is present (defaulting to `false`) and every
/// registered positional or option with a default is present in `values`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseResult {
    values: BTreeMap<String, String>,
    flags: BTreeMap<String, bool>,
}

impl ParseResult {
    /// Value bound to a positional or option.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Whether a flag was set. Unknown names read as `false`.
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    /// Whether `name` has an entry in either map.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name) || self.flags.contains_key(name)
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    pub fn flags(&self) -> &BTreeMap<String, bool> {
        &self.flags
    }
}

/// What a successful parse produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Matches(ParseResult),
    /// A help trigger was seen; carries the rendered help text.
    Help(String),
}

impl ArgRegistry {
    /// Parse `tokens` (without the program name) against the registry.
    ///
    /// Tokens are scanned once, left to right:
    /// - a help trigger stops the scan with [`ParseOutcome::Help`]
    /// - a token not starting with `-` binds the next positional
    /// - a flag trigger sets the flag
    /// - an option trigger takes the following token verbatim as its value
    ///
    /// Afterwards required arguments are checked and defaults filled in.
    /// The first problem found is returned as the error.
    pub fn parse<I, S>(&self, tokens: I) -> Result<ParseOutcome, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens: Vec<S> = tokens.into_iter().collect();
        let mut result = ParseResult::default();
        let mut cursor = 0usize;
        let mut consumed: Option<usize> = None;

        for (i, token) in tokens.iter().enumerate() {
            let token = token.as_ref();

            if self.is_help_trigger(token) {
                tracing::debug!(trigger = token, "help requested");
                return Ok(ParseOutcome::Help(self.render_help()));
            }
            if consumed == Some(i) {
                continue;
            }

            if !token.starts_with('-') {
                if cursor >= self.positional_count() {
                    return Err(ParseError::TooManyPositionals(token.to_string()));
                }
                if let Some(spec) = self.positional_at(cursor) {
                    result
                        .values
                        .insert(spec.name().to_string(), token.to_string());
                }
                cursor += 1;
                continue;
            }

            let Some(spec) = self.lookup_trigger(token) else {
                return Err(ParseError::UnknownTrigger(token.to_string()));
            };
            match spec.kind() {
                ArgKind::Flag => {
                    result.flags.insert(spec.name().to_string(), true);
                }
                ArgKind::Option => {
                    let Some(value) = tokens.get(i + 1) else {
                        return Err(ParseError::MissingValue(token.to_string()));
                    };
                    // Last occurrence wins.
                    result
                        .values
                        .insert(spec.name().to_string(), value.as_ref().to_string());
                    consumed = Some(i + 1);
                }
                ArgKind::Positional => {
                    return Err(ParseError::UnknownTrigger(token.to_string()));
                }
            }
        }

        for name in self.required_names() {
            if !result.values.contains_key(name) && !result.flags.contains_key(name) {
                return Err(ParseError::MissingRequired(name.clone()));
            }
        }

        for (name, value) in self.default_values() {
            if !result.values.contains_key(name) {
                result.values.insert(name.to_string(), value.to_string());
            }
        }
        for spec in self.flags() {
            result.flags.entry(spec.name().to_string()).or_insert(false);
        }

        tracing::debug!(
            values = result.values.len(),
            flags = result.flags.len(),
            "parsed arguments"
        );
        Ok(ParseOutcome::Matches(result))
    }

    /// Like [`ArgRegistry::parse`], but a help trigger prints the help text
    /// to stdout and exits the process with status 0.
    ///
    /// Code after this call never runs when a help trigger was present.
    pub fn parse_or_exit<I, S>(&self, tokens: I) -> Result<ParseResult, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match self.parse(tokens)? {
            ParseOutcome::Matches(m) => Ok(m),
            ParseOutcome::Help(text) => {
                let mut stdout = std::io::stdout().lock();
                // Nothing useful can be done about a closed stdout here.
                let _ = stdout.write_all(text.as_bytes());
                let _ = stdout.flush();
                std::process::exit(0);
            }
        }
    }

    /// Parse the current process arguments, skipping the program name.
    pub fn parse_env(&self) -> Result<ParseResult, ParseError> {
        self.parse_or_exit(std::env::args().skip(1))
    }
}
