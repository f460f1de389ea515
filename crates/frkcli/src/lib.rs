//! Small declarative argument parsing and help rendering.
//!
//! Arguments are declared up front on an [`ArgRegistry`]; invalid
//! declarations are rejected immediately with a [`ConfigError`]. A registry
//! then parses one token sequence per invocation into a [`ParseResult`], or
//! renders column-aligned usage text.
//!
//! ```
//! use frkcli::{ArgOptions, ArgRegistry, ParseOutcome};
//!
//! let mut registry = ArgRegistry::new("resize");
//! registry
//!     .add_positional("input", ArgOptions::new().help("Image to resize"))?
//!     .add_flag("verbose", ArgOptions::new().alias("-v"))?
//!     .add_option("width", ArgOptions::new().alias("-w").default_value("640"))?;
//!
//! let ParseOutcome::Matches(m) = registry.parse(["cat.png", "-v"])? else {
//!     unreachable!("no help trigger in input");
//! };
//! assert_eq!(m.get("input"), Some("cat.png"));
//! assert_eq!(m.get("width"), Some("640"));
//! assert!(m.flag("verbose"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod help;
mod parser;
mod registry;

pub use error::{ConfigError, ParseError};
pub use help::DEFAULT_INDENT;
pub use parser::{ParseOutcome, ParseResult};
pub use registry::{ArgKind, ArgOptions, ArgRegistry, ArgumentSpec, DEFAULT_HELP_TRIGGERS};
