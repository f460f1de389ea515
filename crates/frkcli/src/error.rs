use thiserror::Error;

/// A registration-time violation of the registry's invariants.
///
/// These are programmer errors: they are detected while the program declares
/// its arguments, before any user input is looked at.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("argument name must not be empty")]
    EmptyName,

    #[error("argument '{0}' is already registered")]
    DuplicateName(String),

    #[error("invalid trigger key '{0}': must start with '-' and contain no spaces")]
    InvalidTrigger(String),

    #[error("trigger key '{key}' is already registered by argument '{existing}'")]
    DuplicateTrigger { key: String, existing: String },

    #[error("trigger key '{0}' conflicts with a help trigger")]
    HelpTriggerConflict(String),

    #[error("flag '{0}' cannot have a default value")]
    FlagDefault(String),

    #[error("positional argument '{0}' cannot have aliases")]
    PositionalAlias(String),

    #[error(
        "required positional argument '{name}' cannot follow optional positional argument '{previous}'"
    )]
    RequiredAfterOptional { name: String, previous: String },
}

/// A failure to match the supplied tokens against a registry.
///
/// Parsing stops at the first of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown flag or option: {0}")]
    UnknownTrigger(String),

    #[error("too many positional arguments: unexpected '{0}'")]
    TooManyPositionals(String),

    #[error("no value provided for option: {0}")]
    MissingValue(String),

    #[error("required arg not found: {0}")]
    MissingRequired(String),
}
