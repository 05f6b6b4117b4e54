use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use tracing::{debug, warn};

use crate::error::{Error, ErrorKind};
use crate::value::{Registry, Value};
use crate::{OptionName, Parser};

type UsageFn = Box<dyn Fn(&FlagSet, &mut dyn Write) -> io::Result<()> + Send + Sync>;

/// What to do when parsing fails.
///
/// The policy is applied by [`FlagSet::handle_error`].  Help requests always
/// render the usage first.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorHandling {
    /// Return the error to the caller.
    #[default]
    Continue,
    /// Print the error and exit the process with [`Error::exit_code`].
    Exit,
    /// Panic with the error.
    Panic,
}

/// A defined option in a [`FlagSet`].
pub struct Flag {
    name: String,
    usage: String,
    default: String,
    value: Box<dyn Value + Send>,
}

impl Flag {
    /// The name without leading dashes.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The help text.
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// The value at definition time, formatted.
    pub fn default_value(&self) -> &str {
        &self.default
    }

    /// The current value.
    pub fn value(&self) -> &dyn Value {
        &self.value
    }

    /// How the option is spelled on the command line.
    pub fn option_name(&self) -> OptionName {
        OptionName::for_name(&self.name)
    }

    fn has_zero_default(&self) -> bool {
        matches!(self.default.as_str(), "" | "0" | "false")
    }
}

impl fmt::Debug for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flag")
            .field("name", &self.name)
            .field("usage", &self.usage)
            .field("default", &self.default)
            .field("value", &self.value.to_string())
            .finish()
    }
}

/// A set of defined options.
///
/// This is the registry that comes with the crate.  Options are defined with
/// a name, an initial value (which also becomes the default shown in the
/// usage) and a help text.  Single character names are spelled with one dash
/// on the command line, longer names with two.
///
/// ```
/// use flagset_parser::{ErrorHandling, FlagSet, Parser};
///
/// let mut flags = FlagSet::new("tool", ErrorHandling::Continue);
/// flags.int("n", 1, "number of runs").bool("dry-run", false, "do nothing");
///
/// let mut parser = Parser::new(flags);
/// parser.parse(["-n", "3", "--dry-run"]).unwrap();
/// assert_eq!(parser.registry().get::<i64>("n"), Some(3));
/// assert_eq!(parser.registry().get::<bool>("dry-run"), Some(true));
/// ```
pub struct FlagSet {
    name: String,
    error_handling: ErrorHandling,
    flags: BTreeMap<String, Flag>,
    usage: Option<UsageFn>,
    output: Option<Box<dyn Write + Send>>,
}

impl fmt::Debug for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagSet")
            .field("name", &self.name)
            .field("error_handling", &self.error_handling)
            .field("flags", &self.flags)
            .finish()
    }
}

impl FlagSet {
    /// Creates an empty flag set.
    ///
    /// The name shows up in the usage header and can be empty.
    pub fn new(name: impl Into<String>, error_handling: ErrorHandling) -> FlagSet {
        FlagSet {
            name: name.into(),
            error_handling,
            flags: BTreeMap::new(),
            usage: None,
            output: None,
        }
    }

    /// The name of the flag set.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The configured error handling policy.
    pub fn error_handling(&self) -> ErrorHandling {
        self.error_handling
    }

    /// Defines an option with an arbitrary value.
    ///
    /// Defining a name a second time replaces the earlier definition.
    pub fn define<V>(
        &mut self,
        name: impl Into<String>,
        value: V,
        usage: impl Into<String>,
    ) -> &mut Self
    where
        V: Value + Send + 'static,
    {
        let name = name.into();
        let flag = Flag {
            name: name.clone(),
            usage: usage.into(),
            default: value.to_string(),
            value: Box::new(value),
        };
        if self.flags.insert(name, flag).is_some() {
            warn!(flagset = %self.name, "option redefined");
        }
        self
    }

    /// Defines a boolean option.
    pub fn bool(
        &mut self,
        name: impl Into<String>,
        default: bool,
        usage: impl Into<String>,
    ) -> &mut Self {
        self.define(name, default, usage)
    }

    /// Defines a string option.
    pub fn string(
        &mut self,
        name: impl Into<String>,
        default: impl Into<String>,
        usage: impl Into<String>,
    ) -> &mut Self {
        self.define(name, default.into(), usage)
    }

    /// Defines a signed integer option.
    pub fn int(
        &mut self,
        name: impl Into<String>,
        default: i64,
        usage: impl Into<String>,
    ) -> &mut Self {
        self.define(name, default, usage)
    }

    /// Defines an unsigned integer option.
    pub fn uint(
        &mut self,
        name: impl Into<String>,
        default: u64,
        usage: impl Into<String>,
    ) -> &mut Self {
        self.define(name, default, usage)
    }

    /// Defines a floating point option.
    pub fn float(
        &mut self,
        name: impl Into<String>,
        default: f64,
        usage: impl Into<String>,
    ) -> &mut Self {
        self.define(name, default, usage)
    }

    /// Returns the definition of an option.
    pub fn lookup_flag(&self, name: &str) -> Option<&Flag> {
        self.flags.get(name)
    }

    /// Iterates over all options in name order.
    pub fn flags(&self) -> impl Iterator<Item = &Flag> {
        self.flags.values()
    }

    /// Returns the current value of an option formatted as string.
    pub fn value_of(&self, name: &str) -> Option<String> {
        self.flags.get(name).map(|flag| flag.value.to_string())
    }

    /// Returns the current value of an option parsed into `T`.
    ///
    /// Returns `None` if the option is not defined or its value does not
    /// parse as `T`.
    pub fn get<T: FromStr>(&self, name: &str) -> Option<T> {
        self.value_of(name)?.parse().ok()
    }

    /// Sets the value of an option as if it was given on the command line.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), Error> {
        let flag = match self.flags.get_mut(name) {
            Some(flag) => flag,
            None => {
                return Err(Error::new(ErrorKind::OptionNotFound)
                    .with_option(OptionName::for_name(name)));
            }
        };
        flag.value.set(value).map_err(|err| {
            Error::new(ErrorKind::InvalidValue)
                .with_option(OptionName::for_name(name))
                .with_value(value)
                .with_source(err)
        })
    }

    /// Replaces the usage renderer.
    ///
    /// The function is invoked for help requests instead of the default
    /// rendering of [`write_usage`](Self::write_usage).
    pub fn set_usage<F>(&mut self, f: F)
    where
        F: Fn(&FlagSet, &mut dyn Write) -> io::Result<()> + Send + Sync + 'static,
    {
        self.usage = Some(Box::new(f));
    }

    /// Sets where usage and error messages go.  Defaults to stderr.
    pub fn set_output<W: Write + Send + 'static>(&mut self, output: W) {
        self.output = Some(Box::new(output));
    }

    /// Writes the usage message.
    ///
    /// This is the custom renderer if one was set with
    /// [`set_usage`](Self::set_usage), otherwise a header followed by
    /// [`write_defaults`](Self::write_defaults).
    pub fn write_usage(&self, w: &mut dyn Write) -> io::Result<()> {
        if let Some(ref usage) = self.usage {
            return usage(self, w);
        }
        if self.name.is_empty() {
            writeln!(w, "Usage:")?;
        } else {
            writeln!(w, "Usage of {}:", self.name)?;
        }
        self.write_defaults(w)
    }

    /// Writes one help entry per option.
    ///
    /// ```text
    ///   -a    is for apple
    ///   --story string
    ///         the purpose of the story (default "for")
    /// ```
    pub fn write_defaults(&self, w: &mut dyn Write) -> io::Result<()> {
        for flag in self.flags.values() {
            let hint = flag.value.type_hint();
            let mut line = format!("  {}", flag.option_name());
            if let Some(hint) = hint {
                line.push(' ');
                line.push_str(hint);
            }
            // the tab lines up short entries with the indented help text
            if line.chars().count() <= 4 {
                line.push('\t');
            } else {
                line.push_str("\n    \t");
            }
            line.push_str(&flag.usage.replace('\n', "\n    \t"));
            if !flag.has_zero_default() {
                if hint == Some("string") {
                    line.push_str(&format!(" (default {:?})", flag.default));
                } else {
                    line.push_str(&format!(" (default {})", flag.default));
                }
            }
            writeln!(w, "{}", line)?;
        }
        Ok(())
    }

    /// Applies the error handling policy to a parsing error.
    ///
    /// Help requests render the usage to the output first.  With
    /// [`ErrorHandling::Continue`] the error is handed back, the other
    /// policies do not return.
    pub fn handle_error(&mut self, err: Error) -> Error {
        debug!(error = %err, policy = ?self.error_handling, "handling parse error");
        if err.is_help() {
            self.with_output(|flags, w| flags.write_usage(w));
        }
        match self.error_handling {
            ErrorHandling::Continue => err,
            ErrorHandling::Exit => {
                if !err.is_help() {
                    self.with_output(|_, w| writeln!(w, "error: {}", err));
                }
                std::process::exit(err.exit_code());
            }
            ErrorHandling::Panic => panic!("{}", err),
        }
    }

    fn with_output<F>(&mut self, f: F)
    where
        F: FnOnce(&FlagSet, &mut dyn Write) -> io::Result<()>,
    {
        let mut output = self.output.take();
        let rv = match output {
            Some(ref mut w) => f(self, w),
            None => f(self, &mut io::stderr().lock()),
        };
        self.output = output;
        if let Err(err) = rv {
            warn!(error = %err, "failed to write to output");
        }
    }
}

impl Registry for FlagSet {
    fn lookup(&mut self, name: &str) -> Option<&mut dyn Value> {
        self.flags
            .get_mut(name)
            .map(|flag| &mut flag.value as &mut dyn Value)
    }
}

impl Parser<FlagSet> {
    /// Parses the arguments and applies the flag set's error handling.
    ///
    /// This is [`parse`](Self::parse) followed by [`FlagSet::handle_error`]
    /// on failure.
    pub fn parse_and_handle<I, S>(&mut self, arguments: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.parse(arguments)
            .map_err(|err| self.registry_mut().handle_error(err))
    }
}
