//! This crate implements a GNU style command line tokenizer on top of a flag
//! registry.  The registry knows the options and how to store their values,
//! the tokenizer knows how a command line is spelled.
//!
//! The goal of this crate is that it's small, predictable and excellently
//! tested.  It parses in a single pass, never backtracks and never looks ahead
//! further than the character it's currently looking at.
//!
//! # Example
//!
//! Parsing happens via the [`Parser`] type which is bound to a [`Registry`].
//! The crate comes with [`FlagSet`], a registry with usage rendering:
//!
//! ```
//! use flagset_parser::{Error, ErrorHandling, FlagSet, Parser};
//!
//! fn main() -> Result<(), Error> {
//!     let mut flags = FlagSet::new("demo", ErrorHandling::Continue);
//!     flags
//!         .bool("v", false, "verbose output")
//!         .string("output", "out.txt", "where to write the result");
//!
//!     let mut parser = Parser::new(flags);
//!     parser.parse(["-v", "--output=result.txt", "input.txt"])?;
//!
//!     assert_eq!(parser.registry().get::<bool>("v"), Some(true));
//!     assert_eq!(parser.registry().value_of("output").as_deref(), Some("result.txt"));
//!     assert_eq!(parser.args(), ["input.txt"]);
//!     Ok(())
//! }
//! ```
//!
//! Here is what's happening:
//!
//! * [`FlagSet::new`] creates an empty registry with a name (used for usage
//!   output) and an [`ErrorHandling`] policy.
//! * [`FlagSet::bool`], [`FlagSet::string`] and friends define options.  Any
//!   type implementing [`Value`] can be registered with [`FlagSet::define`].
//! * [`Parser::new`] binds a parser to the registry and [`Parser::parse`] walks
//!   the arguments, setting option values and collecting positional arguments.
//! * [`Parser::arg`], [`Parser::nargs`] and [`Parser::args`] give access to the
//!   positional arguments afterwards.
//!
//! # Syntax
//!
//! * `-v` sets the boolean option `v`.  Boolean short options can be combined:
//!   `-vqa` is the same as `-v -q -a`.
//! * `-o value` and `-o=value` set the option `o`.  A short option that takes a
//!   value cannot be combined with other letters, so `-ovalue` is an error
//!   ([`ErrorKind::OptionNotFlag`]).  The last letter of a combined group may
//!   take a value: `-vo=value` and `-vo value` both work.
//! * `--name` sets a boolean long option, `--name value` and `--name=value` set
//!   a long option that takes a value.
//! * A lone `-` is a positional argument.
//! * `--` ends option parsing, everything after it is positional.
//! * Empty arguments never turn into positional arguments.
//! * `-1` is always an option, negative numbers are not special cased.
//!
//! Names are scanned as unicode characters, so `-ü` is a short option.
//!
//! # Errors
//!
//! The first problem stops parsing and is returned as [`Error`].  Values set
//! before that point stay set.  If `-h` or `--help` are used but not
//! registered, the error is [`ErrorKind::HelpRequested`] which signals that
//! the caller should show usage information.  [`FlagSet::handle_error`] and
//! [`Parser::parse_and_handle`] do that according to the configured
//! [`ErrorHandling`].  The parser itself never prints and never exits.
use std::ffi::OsString;
use std::fmt;

mod error;
mod flagset;
mod scan;
mod value;

pub use crate::error::{BoxError, Error, ErrorKind};
pub use crate::flagset::{ErrorHandling, Flag, FlagSet};
pub use crate::value::{Registry, Value};

use crate::scan::Scanner;

/// The name of an option as it appeared on the command line.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptionName {
    /// A single character option introduced with one dash (`-x`).
    Short(char),
    /// An option introduced with two dashes (`--name`).
    Long(String),
}

impl OptionName {
    /// Is this a specific short option?
    pub fn is_short(&self, c: char) -> bool {
        match self {
            OptionName::Short(r) => c == *r,
            OptionName::Long(_) => false,
        }
    }

    /// Is this a specific long option?
    pub fn is_long(&self, name: &str) -> bool {
        match self {
            OptionName::Long(s) => s == name,
            OptionName::Short(_) => false,
        }
    }

    /// Is this `-h` or `--help`?
    pub fn is_help(&self) -> bool {
        self.is_short('h') || self.is_long("help")
    }

    /// Guesses how a registered name is spelled on the command line.
    pub(crate) fn for_name(name: &str) -> OptionName {
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => OptionName::Short(c),
            _ => OptionName::Long(name.to_string()),
        }
    }
}

impl fmt::Display for OptionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionName::Short(c) => write!(f, "-{}", c),
            OptionName::Long(name) => write!(f, "--{}", name),
        }
    }
}

/// A command line parser bound to a [`Registry`].
///
/// The parser owns the registry and the positional arguments of the last
/// [`parse`](Self::parse) call.  A parser can be reused: parsing again
/// replaces the positional arguments, option values accumulate in the
/// registry.
#[derive(Debug)]
pub struct Parser<R> {
    registry: R,
    args: Vec<String>,
    parsed: bool,
}

impl<R: Registry> Parser<R> {
    /// Creates a parser for the given registry.
    pub fn new(registry: R) -> Parser<R> {
        Parser {
            registry,
            args: Vec::new(),
            parsed: false,
        }
    }

    /// Parses the given arguments.
    ///
    /// The arguments must not include the program name.  Recognized options
    /// are set in the registry as they are encountered, everything else is
    /// collected as positional argument.  On error the options set up to
    /// that point keep their new values.
    pub fn parse<I, S>(&mut self, arguments: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.parsed = true;
        self.args.clear();
        let mut scanner = Scanner::new(&mut self.registry, &mut self.args);
        let rv = arguments
            .into_iter()
            .try_for_each(|arg| scanner.feed(arg.as_ref()));
        if let Err(ref err) = rv {
            tracing::debug!(error = %err, kind = ?err.kind(), "failed to parse arguments");
        }
        rv
    }

    /// Parses the arguments of the current process.
    ///
    /// The first argument (the program name) is skipped.  Arguments that are
    /// not valid unicode fail with [`ErrorKind::InvalidUnicode`].
    pub fn parse_env(&mut self) -> Result<(), Error> {
        self.parse_os(std::env::args_os().skip(1))
    }

    /// Parses arguments given as OS strings.
    ///
    /// All arguments are converted before scanning starts, so if any of them
    /// is not valid unicode the parse fails with [`ErrorKind::InvalidUnicode`]
    /// without touching the registry.
    pub fn parse_os<I, S>(&mut self, arguments: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let args = arguments
            .into_iter()
            .map(|arg| {
                arg.into()
                    .into_string()
                    .map_err(|arg| Error::new(ErrorKind::InvalidUnicode).with_os_value(arg))
            })
            .collect::<Result<Vec<_>, _>>();
        match args {
            Ok(args) => self.parse(args),
            Err(err) => {
                tracing::debug!(error = %err, "argument is not valid unicode");
                self.parsed = true;
                self.args.clear();
                Err(err)
            }
        }
    }
}

impl<R> Parser<R> {
    /// Returns the i'th positional argument.
    ///
    /// `arg(0)` is the first argument that was not consumed by an option.
    /// If there is no such argument an empty string is returned.
    pub fn arg(&self, i: usize) -> &str {
        self.args.get(i).map_or("", |x| x.as_str())
    }

    /// Returns the number of positional arguments.
    pub fn nargs(&self) -> usize {
        self.args.len()
    }

    /// Returns all positional arguments.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns `true` once [`parse`](Self::parse) ran, even if it failed.
    pub fn parsed(&self) -> bool {
        self.parsed
    }

    /// Returns the registry.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Returns the registry mutably.
    pub fn registry_mut(&mut self) -> &mut R {
        &mut self.registry
    }

    /// Consumes the parser and returns the registry.
    pub fn into_registry(self) -> R {
        self.registry
    }
}
