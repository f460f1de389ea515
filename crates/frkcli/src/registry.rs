use std::collections::HashMap;

use indexmap::IndexMap;

use crate::error::ConfigError;

/// Help triggers a new registry starts with.
pub const DEFAULT_HELP_TRIGGERS: [&str; 2] = ["-h", "--help"];

/// How an argument is matched on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKind {
    /// Identified by position.
    Positional,
    /// Boolean switch, never takes a value.
    Flag,
    /// Trigger key followed by exactly one value token.
    Option,
}

/// Optional settings for a single registration call.
///
/// Every field is independently optional:
///
/// ```
/// use frkcli::{ArgOptions, ArgRegistry};
///
/// let mut registry = ArgRegistry::new("resize");
/// registry.add_option(
///     "width",
///     ArgOptions::new()
///         .help("Output width in pixels")
///         .alias("-w")
///         .default_value("640"),
/// )?;
/// assert_eq!(registry.get("width").unwrap().aliases(), ["-w"]);
/// # Ok::<(), frkcli::ConfigError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgOptions {
    help: Option<String>,
    aliases: Vec<String>,
    default_value: Option<String>,
}

impl ArgOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Add an extra trigger key (e.g. `-k`) besides the canonical `--name`.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Make the argument optional, falling back to `value` when absent.
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// A declared argument, owned by its [`ArgRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentSpec {
    name: String,
    kind: ArgKind,
    help: Option<String>,
    aliases: Vec<String>,
    default_value: Option<String>,
}

impl ArgumentSpec {
    fn new(name: String, kind: ArgKind, options: ArgOptions) -> Self {
        Self {
            name,
            kind,
            help: options.help,
            aliases: options.aliases,
            default_value: options.default_value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ArgKind {
        self.kind
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// Positionals and options without a default must be supplied. Flags never are.
    pub fn is_required(&self) -> bool {
        self.kind != ArgKind::Flag && self.default_value.is_none()
    }

    /// The `--name` form, for flags and options.
    pub fn canonical_trigger(&self) -> Option<String> {
        match self.kind {
            ArgKind::Positional => None,
            ArgKind::Flag | ArgKind::Option => Some(format!("--{}", self.name)),
        }
    }
}

/// Declared positionals, flags and options for one program.
///
/// Registration is fail-fast: every `add_*` call either fully succeeds or
/// returns a [`ConfigError`] and leaves the registry untouched.
#[derive(Debug, Clone)]
pub struct ArgRegistry {
    program: String,
    description: Option<String>,
    help_triggers: Vec<String>,
    args: IndexMap<String, ArgumentSpec>,
    triggers: HashMap<String, String>,
    positionals: Vec<String>,
    required: Vec<String>,
    defaults: IndexMap<String, String>,
}

impl ArgRegistry {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            description: None,
            help_triggers: DEFAULT_HELP_TRIGGERS.iter().map(|s| s.to_string()).collect(),
            args: IndexMap::new(),
            triggers: HashMap::new(),
            positionals: Vec::new(),
            required: Vec::new(),
            defaults: IndexMap::new(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Text shown beneath the usage line in help output.
    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    pub fn help_triggers(&self) -> &[String] {
        &self.help_triggers
    }

    pub fn is_help_trigger(&self, token: &str) -> bool {
        self.help_triggers.iter().any(|t| t == token)
    }

    /// Replace the help-trigger set. An empty set disables help handling.
    ///
    /// Each key must be a valid trigger key and must not already be in use
    /// by a registered flag or option.
    pub fn set_help_triggers<I, S>(&mut self, keys: I) -> Result<&mut Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut triggers: Vec<String> = Vec::new();
        for key in keys {
            let key = key.into();
            validate_trigger(&key)?;
            if self.triggers.contains_key(&key) {
                return Err(ConfigError::HelpTriggerConflict(key));
            }
            if !triggers.contains(&key) {
                triggers.push(key);
            }
        }
        self.help_triggers = triggers;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&ArgumentSpec> {
        self.args.get(name)
    }

    /// All declared arguments in registration order.
    pub fn arguments(&self) -> impl Iterator<Item = &ArgumentSpec> {
        self.args.values()
    }

    /// Positional arguments in the order they are matched.
    pub fn positionals(&self) -> impl Iterator<Item = &ArgumentSpec> {
        self.positionals.iter().filter_map(|name| self.args.get(name))
    }

    pub fn flags(&self) -> impl Iterator<Item = &ArgumentSpec> {
        self.of_kind(ArgKind::Flag)
    }

    pub fn options(&self) -> impl Iterator<Item = &ArgumentSpec> {
        self.of_kind(ArgKind::Option)
    }

    fn of_kind(&self, kind: ArgKind) -> impl Iterator<Item = &ArgumentSpec> {
        self.args.values().filter(move |a| a.kind == kind)
    }

    pub(crate) fn positional_at(&self, index: usize) -> Option<&ArgumentSpec> {
        self.positionals.get(index).and_then(|name| self.args.get(name))
    }

    pub(crate) fn positional_count(&self) -> usize {
        self.positionals.len()
    }

    pub(crate) fn lookup_trigger(&self, key: &str) -> Option<&ArgumentSpec> {
        self.triggers.get(key).and_then(|name| self.args.get(name))
    }

    pub(crate) fn required_names(&self) -> &[String] {
        &self.required
    }

    pub(crate) fn default_values(&self) -> impl Iterator<Item = (&str, &str)> {
        self.defaults.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Append a positional argument.
    ///
    /// Without a default it is required, which is only allowed while every
    /// previously declared positional is required as well.
    pub fn add_positional(
        &mut self,
        name: impl Into<String>,
        options: ArgOptions,
    ) -> Result<&mut Self, ConfigError> {
        let name = name.into();
        self.check_name(&name)?;
        if !options.aliases.is_empty() {
            return Err(ConfigError::PositionalAlias(name));
        }
        if options.default_value.is_none() {
            if let Some(previous) = self.positionals().last() {
                if !previous.is_required() {
                    return Err(ConfigError::RequiredAfterOptional {
                        name,
                        previous: previous.name.clone(),
                    });
                }
            }
        }

        let spec = ArgumentSpec::new(name, ArgKind::Positional, options);
        self.positionals.push(spec.name.clone());
        self.insert(spec, Vec::new());
        Ok(self)
    }

    /// Register a boolean switch triggered by `--name` and any aliases.
    pub fn add_flag(
        &mut self,
        name: impl Into<String>,
        options: ArgOptions,
    ) -> Result<&mut Self, ConfigError> {
        let name = name.into();
        self.check_name(&name)?;
        if options.default_value.is_some() {
            return Err(ConfigError::FlagDefault(name));
        }
        let keys = self.check_triggers(&name, &options.aliases)?;

        self.insert(ArgumentSpec::new(name, ArgKind::Flag, options), keys);
        Ok(self)
    }

    /// Register a key-plus-value argument triggered by `--name` and any aliases.
    pub fn add_option(
        &mut self,
        name: impl Into<String>,
        options: ArgOptions,
    ) -> Result<&mut Self, ConfigError> {
        let name = name.into();
        self.check_name(&name)?;
        let keys = self.check_triggers(&name, &options.aliases)?;

        self.insert(ArgumentSpec::new(name, ArgKind::Option, options), keys);
        Ok(self)
    }

    fn check_name(&self, name: &str) -> Result<(), ConfigError> {
        if name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.args.contains_key(name) {
            return Err(ConfigError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    /// Build and validate the full trigger-key set for a new flag or option.
    fn check_triggers(&self, name: &str, aliases: &[String]) -> Result<Vec<String>, ConfigError> {
        let mut keys = Vec::with_capacity(aliases.len() + 1);
        keys.push(format!("--{name}"));
        keys.extend(aliases.iter().cloned());

        for (i, key) in keys.iter().enumerate() {
            validate_trigger(key)?;
            if self.is_help_trigger(key) {
                return Err(ConfigError::HelpTriggerConflict(key.clone()));
            }
            if let Some(existing) = self.triggers.get(key) {
                return Err(ConfigError::DuplicateTrigger {
                    key: key.clone(),
                    existing: existing.clone(),
                });
            }
            if keys[..i].contains(key) {
                return Err(ConfigError::DuplicateTrigger {
                    key: key.clone(),
                    existing: name.to_string(),
                });
            }
        }
        Ok(keys)
    }

    fn insert(&mut self, spec: ArgumentSpec, keys: Vec<String>) {
        tracing::trace!(name = %spec.name, kind = ?spec.kind, "registered argument");
        for key in keys {
            self.triggers.insert(key, spec.name.clone());
        }
        match &spec.default_value {
            Some(value) => {
                self.defaults.insert(spec.name.clone(), value.clone());
            }
            None if spec.kind != ArgKind::Flag => self.required.push(spec.name.clone()),
            None => {}
        }
        self.args.insert(spec.name.clone(), spec);
    }
}

/// A trigger key starts with `-` and contains no whitespace.
fn validate_trigger(key: &str) -> Result<(), ConfigError> {
    if key.starts_with('-') && !key.chars().any(char::is_whitespace) {
        Ok(())
    } else {
        Err(ConfigError::InvalidTrigger(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> ArgOptions {
        ArgOptions::new()
    }

    #[test]
    fn flag_with_default_is_rejected() {
        let mut r = ArgRegistry::new("cmd");
        let err = r
            .add_flag("verbose", opts().default_value("true"))
            .unwrap_err();
        assert_eq!(err, ConfigError::FlagDefault("verbose".to_string()));
        assert!(r.get("verbose").is_none());
    }

    #[test]
    fn required_positional_after_optional_is_rejected() {
        let mut r = ArgRegistry::new("cmd");
        r.add_positional("src", opts()).unwrap();
        r.add_positional("dst", opts().default_value("out")).unwrap();
        let err = r.add_positional("mode", opts()).unwrap_err();
        assert_eq!(
            err,
            ConfigError::RequiredAfterOptional {
                name: "mode".to_string(),
                previous: "dst".to_string(),
            }
        );

        // Optional after optional stays fine.
        r.add_positional("extra", opts().default_value("x")).unwrap();
        assert_eq!(r.positionals().count(), 3);
    }

    #[test]
    fn names_are_unique_across_kinds() {
        let mut r = ArgRegistry::new("cmd");
        r.add_positional("file", opts()).unwrap();
        assert_eq!(
            r.add_option("file", opts()).unwrap_err(),
            ConfigError::DuplicateName("file".to_string())
        );
        assert_eq!(
            r.add_flag("file", opts()).unwrap_err(),
            ConfigError::DuplicateName("file".to_string())
        );
        assert_eq!(r.add_flag("", opts()).unwrap_err(), ConfigError::EmptyName);
    }

    #[test]
    fn malformed_trigger_keys_are_rejected() {
        for bad in ["k", "key", "- k", "--with space", "x-", "--tab\tbed"] {
            let mut r = ArgRegistry::new("cmd");
            let err = r.add_option("key", opts().alias(bad)).unwrap_err();
            assert_eq!(err, ConfigError::InvalidTrigger(bad.to_string()), "{bad}");
            assert!(r.get("key").is_none());
        }

        let mut r = ArgRegistry::new("cmd");
        let err = r.add_flag("dry run", opts()).unwrap_err();
        assert_eq!(err, ConfigError::InvalidTrigger("--dry run".to_string()));
    }

    #[test]
    fn duplicate_triggers_are_rejected_across_kinds() {
        let mut r = ArgRegistry::new("cmd");
        r.add_flag("verbose", opts().alias("-v")).unwrap();

        let err = r.add_option("value", opts().alias("-v")).unwrap_err();
        assert_eq!(
            err,
            ConfigError::DuplicateTrigger {
                key: "-v".to_string(),
                existing: "verbose".to_string(),
            }
        );

        let err = r.add_flag("quiet", opts().alias("--verbose")).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateTrigger { ref key, .. } if key == "--verbose"));

        r.add_option("level", opts().alias("-l")).unwrap();
        let err = r.add_flag("loud", opts().alias("-l")).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateTrigger { ref existing, .. } if existing == "level"));
    }

    #[test]
    fn alias_repeating_own_trigger_is_rejected() {
        let mut r = ArgRegistry::new("cmd");
        let err = r.add_flag("all", opts().aliases(["-a", "-a"])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::DuplicateTrigger {
                key: "-a".to_string(),
                existing: "all".to_string(),
            }
        );
        let err = r.add_flag("all", opts().alias("--all")).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateTrigger { .. }));
    }

    #[test]
    fn help_triggers_are_reserved() {
        let mut r = ArgRegistry::new("cmd");
        let err = r.add_flag("host", opts().alias("-h")).unwrap_err();
        assert_eq!(err, ConfigError::HelpTriggerConflict("-h".to_string()));
        let err = r.add_flag("help", opts()).unwrap_err();
        assert_eq!(err, ConfigError::HelpTriggerConflict("--help".to_string()));

        r.set_help_triggers(["-?"]).unwrap();
        r.add_flag("host", opts().alias("-h")).unwrap();
        let err = r.set_help_triggers(["--host"]).unwrap_err();
        assert_eq!(err, ConfigError::HelpTriggerConflict("--host".to_string()));
        assert_eq!(r.help_triggers(), ["-?"]);

        let err = r.set_help_triggers(["help"]).unwrap_err();
        assert_eq!(err, ConfigError::InvalidTrigger("help".to_string()));
    }

    #[test]
    fn positionals_cannot_have_aliases() {
        let mut r = ArgRegistry::new("cmd");
        let err = r.add_positional("file", opts().alias("-f")).unwrap_err();
        assert_eq!(err, ConfigError::PositionalAlias("file".to_string()));
    }

    #[test]
    fn required_list_tracks_positionals_and_options_only() {
        let mut r = ArgRegistry::new("cmd");
        r.add_positional("input", opts())
            .unwrap()
            .add_flag("verbose", opts())
            .unwrap()
            .add_option("width", opts().alias("-w"))
            .unwrap()
            .add_option("height", opts().default_value("10"))
            .unwrap();

        assert_eq!(r.required_names(), ["input", "width"]);
        assert_eq!(r.default_values().collect::<Vec<_>>(), [("height", "10")]);
        assert_eq!(r.lookup_trigger("-w").map(ArgumentSpec::name), Some("width"));
        assert_eq!(r.lookup_trigger("--verbose").map(ArgumentSpec::kind), Some(ArgKind::Flag));
        assert!(r.lookup_trigger("--input").is_none());
        assert_eq!(
            r.arguments().map(ArgumentSpec::name).collect::<Vec<_>>(),
            ["input", "verbose", "width", "height"]
        );
    }
}
