use std::ffi::{OsStr, OsString};
use std::fmt;

use crate::OptionName;

/// The boxed error type registries use to report rejected values.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type of this crate.
///
/// Errors carry an [`ErrorKind`] and, depending on the kind, the option that
/// caused it, the offending value and the error reported by the registry.
/// The regular [`Display`](fmt::Display) output is a short one-line message,
/// the alternate form (`{:#}`) also includes the value and the cause.
pub struct Error {
    repr: Box<ErrorRepr>,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Error {
        Error {
            repr: Box::new(ErrorRepr {
                kind,
                option: None,
                value: None,
                source: None,
            }),
        }
    }

    pub(crate) fn with_option(mut self, option: OptionName) -> Error {
        self.repr.option = Some(option);
        self
    }

    pub(crate) fn with_value(mut self, value: impl Into<String>) -> Error {
        self.repr.value = Some(ErrorValue::String(value.into()));
        self
    }

    pub(crate) fn with_os_value(mut self, value: OsString) -> Error {
        self.repr.value = Some(ErrorValue::OsString(value));
        self
    }

    pub(crate) fn with_source(mut self, source: BoxError) -> Error {
        self.repr.source = Some(source);
        self
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> ErrorKind {
        self.repr.kind
    }

    /// Returns the option the error is about, if there is one.
    pub fn option(&self) -> Option<&OptionName> {
        self.repr.option.as_ref()
    }

    /// Returns the raw value that caused the error.
    pub fn raw_value(&self) -> Option<&OsStr> {
        match self.repr.value.as_ref()? {
            ErrorValue::String(s) => Some(OsStr::new(s)),
            ErrorValue::OsString(s) => Some(s),
        }
    }

    /// Returns the value that caused the error if it's valid unicode.
    pub fn value(&self) -> Option<&str> {
        match self.repr.value.as_ref()? {
            ErrorValue::String(s) => Some(s),
            ErrorValue::OsString(s) => s.to_str(),
        }
    }

    /// Is this the help request signal rather than a real failure?
    pub fn is_help(&self) -> bool {
        self.kind() == ErrorKind::HelpRequested
    }

    /// The process exit code conventionally used for this error.
    ///
    /// Help requests exit with `0`, everything else with `2`.
    pub fn exit_code(&self) -> i32 {
        if self.is_help() {
            0
        } else {
            2
        }
    }
}

impl<'s> From<&'s str> for Error {
    fn from(message: &'s str) -> Error {
        Error::from(message.to_string())
    }
}

impl From<String> for Error {
    fn from(message: String) -> Error {
        Error::new(ErrorKind::Custom).with_value(message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind(), self.option()) {
            (ErrorKind::OptionNotFound, Some(x)) => write!(f, "unknown option {}", x)?,
            (ErrorKind::OptionNotFound, None) => write!(f, "unknown option")?,
            (ErrorKind::OptionNotFlag, Some(x)) => {
                write!(f, "option {} expects a value and cannot be combined", x)?
            }
            (ErrorKind::OptionNotFlag, None) => {
                write!(f, "option expects a value and cannot be combined")?
            }
            (ErrorKind::HelpRequested, _) => write!(f, "help requested")?,
            (ErrorKind::InvalidValue, Some(x)) => write!(f, "invalid value for option {}", x)?,
            (ErrorKind::InvalidValue, None) => write!(f, "invalid value")?,
            (ErrorKind::InvalidUnicode, _) => write!(f, "argument is invalid unicode")?,
            (ErrorKind::Custom, _) => return write!(f, "{}", self.value().unwrap_or_default()),
        }
        if f.alternate() {
            if let Some(value) = self.raw_value() {
                write!(f, ": {:?}", value)?;
            }
            if let Some(ref source) = self.repr.source {
                write!(f, " ({})", source)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind())
            .field("option", &self.option())
            .field("raw_value", &self.raw_value())
            .finish()
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.repr.source {
            Some(ref source) => Some(&**source),
            None => None,
        }
    }
}

enum ErrorValue {
    String(String),
    OsString(OsString),
}

struct ErrorRepr {
    kind: ErrorKind,
    option: Option<OptionName>,
    value: Option<ErrorValue>,
    source: Option<BoxError>,
}

/// Represents the kind of a parsing error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// An option name was not known to the registry.
    OptionNotFound,
    /// A non boolean short option was followed by more letters in the same
    /// argument (eg: `-ox` where `o` takes a value).
    OptionNotFlag,
    /// `-h` or `--help` was passed but no such option is registered.
    ///
    /// This is not really a failure, it signals that usage should be shown.
    HelpRequested,
    /// The registry rejected the value for an option.
    ///
    /// The registry's error is available via `source()`.
    InvalidValue,
    /// An argument taken from the environment is not valid unicode.
    InvalidUnicode,
    /// A custom message
    Custom,
}
