//! Declarative JSON model for frkcli argument registries.
//!
//! The types here describe an [`ArgRegistry`] as data so a registry can be
//! shipped as a file and built at startup:
//!
//! ```json
//! {
//!   "name": "resize",
//!   "description": "Resize an image",
//!   "args": [
//!     { "name": "input", "kind": "positional", "help": "Image to resize" },
//!     { "name": "width", "kind": "option", "aliases": ["-w"], "default-value": "640" },
//!     { "name": "verbose", "kind": "flag", "aliases": ["-v"] }
//!   ]
//! }
//! ```
//!
//! Building goes through the regular registration calls, so a schema is held
//! to exactly the same rules as hand-written registration code.

use frkcli::{ArgKind, ArgOptions, ArgRegistry, ConfigError, DEFAULT_HELP_TRIGGERS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid schema JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid argument configuration: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Kind {
    Positional,
    Flag,
    Option,
}

impl From<Kind> for ArgKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Positional => ArgKind::Positional,
            Kind::Flag => ArgKind::Flag,
            Kind::Option => ArgKind::Option,
        }
    }
}

impl From<ArgKind> for Kind {
    fn from(kind: ArgKind) -> Self {
        match kind {
            ArgKind::Positional => Kind::Positional,
            ArgKind::Flag => Kind::Flag,
            ArgKind::Option => Kind::Option,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ArgSchema {
    pub name: String,
    pub kind: Kind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl ArgSchema {
    fn options(&self) -> ArgOptions {
        let mut options = ArgOptions::new().aliases(self.aliases.iter().cloned());
        if !self.help.trim().is_empty() {
            options = options.help(self.help.clone());
        }
        if let Some(value) = &self.default_value {
            options = options.default_value(value.clone());
        }
        options
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CommandSchema {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Replaces the default `-h`/`--help` triggers when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_triggers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<ArgSchema>,
}

impl CommandSchema {
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, SchemaError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, SchemaError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Register every argument, in array order, on a fresh registry.
    ///
    /// Help triggers are applied first so argument triggers are checked
    /// against the configured set.
    pub fn build_registry(&self) -> Result<ArgRegistry, SchemaError> {
        let mut registry = ArgRegistry::new(self.name.clone());
        if !self.description.trim().is_empty() {
            registry.set_description(self.description.clone());
        }
        if let Some(triggers) = &self.help_triggers {
            registry.set_help_triggers(triggers.iter().cloned())?;
        }

        for arg in &self.args {
            let options = arg.options();
            match arg.kind {
                Kind::Positional => registry.add_positional(arg.name.clone(), options)?,
                Kind::Flag => registry.add_flag(arg.name.clone(), options)?,
                Kind::Option => registry.add_option(arg.name.clone(), options)?,
            };
        }
        Ok(registry)
    }

    /// Describe an existing registry.
    pub fn from_registry(registry: &ArgRegistry) -> Self {
        let help_triggers = if registry.help_triggers() == DEFAULT_HELP_TRIGGERS {
            None
        } else {
            Some(registry.help_triggers().to_vec())
        };
        Self {
            name: registry.program().to_string(),
            description: registry.description().unwrap_or_default().to_string(),
            help_triggers,
            args: registry
                .arguments()
                .map(|a| ArgSchema {
                    name: a.name().to_string(),
                    kind: a.kind().into(),
                    help: a.help().unwrap_or_default().to_string(),
                    aliases: a.aliases().to_vec(),
                    default_value: a.default_value().map(str::to_string),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frkcli::ParseOutcome;

    const RESIZE: &str = r#"{
        "name": "resize",
        "description": "Resize an image",
        "args": [
            { "name": "input", "kind": "positional", "help": "Image to resize" },
            { "name": "width", "kind": "option", "aliases": ["-w"], "default-value": "640" },
            { "name": "verbose", "kind": "flag", "aliases": ["-v"] }
        ]
    }"#;

    #[test]
    fn builds_registry_in_declaration_order() {
        let schema = CommandSchema::from_json_str(RESIZE).unwrap();
        let registry = schema.build_registry().unwrap();
        assert_eq!(registry.program(), "resize");
        assert_eq!(registry.description(), Some("Resize an image"));
        let names: Vec<&str> = registry.arguments().map(|a| a.name()).collect();
        assert_eq!(names, ["input", "width", "verbose"]);

        let ParseOutcome::Matches(m) = registry.parse(["cat.png", "-v"]).unwrap() else {
            panic!("expected Matches");
        };
        assert_eq!(m.get("input"), Some("cat.png"));
        assert_eq!(m.get("width"), Some("640"));
        assert!(m.flag("verbose"));
    }

    #[test]
    fn configuration_errors_surface() {
        let json = r#"{
            "name": "bad",
            "args": [
                { "name": "force", "kind": "flag", "default-value": "yes" }
            ]
        }"#;
        let err = CommandSchema::from_json_str(json)
            .unwrap()
            .build_registry()
            .unwrap_err();
        match err {
            SchemaError::Config(ConfigError::FlagDefault(name)) => assert_eq!(name, "force"),
            other => panic!("expected FlagDefault, got: {other:?}"),
        }
    }

    #[test]
    fn unknown_kind_is_a_json_error() {
        let json = r#"{ "name": "bad", "args": [ { "name": "x", "kind": "switch" } ] }"#;
        let err = CommandSchema::from_json_str(json).unwrap_err();
        assert!(matches!(err, SchemaError::Json(_)));
    }

    #[test]
    fn custom_help_triggers_are_applied() {
        let json = r#"{ "name": "tool", "help-triggers": ["-?"],
                        "args": [ { "name": "host", "kind": "option", "aliases": ["-h"] } ] }"#;
        let registry = CommandSchema::from_json_str(json)
            .unwrap()
            .build_registry()
            .unwrap();
        assert_eq!(registry.help_triggers(), ["-?"]);
        assert!(matches!(registry.parse(["-?"]).unwrap(), ParseOutcome::Help(_)));
    }

    #[test]
    fn from_registry_describes_the_same_registry() {
        let schema = CommandSchema::from_json_str(RESIZE).unwrap();
        let registry = schema.build_registry().unwrap();
        let described = CommandSchema::from_registry(&registry);
        assert_eq!(described, schema);
        assert_eq!(
            described.build_registry().unwrap().render_help(),
            registry.render_help()
        );

        let json = described.to_json_pretty().unwrap();
        assert!(json.contains("\"default-value\": \"640\""));
        assert!(!json.contains("help-triggers"));
    }
}
