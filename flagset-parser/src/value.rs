use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::BuildHasher;

use crate::error::BoxError;

/// A settable option value.
///
/// This is the handle the tokenizer pushes values into.  The [`Display`](fmt::Display)
/// output is used to report current and default values.
///
/// Any value kind can opt into boolean semantics by returning `true` from
/// [`is_boolean`](Self::is_boolean).  Boolean values are set to `"true"` when
/// they appear without a value (`-v`, `--verbose`) and can be combined with
/// other boolean short options (`-vq`).
pub trait Value: fmt::Display {
    /// Parses `value` and stores it.
    fn set(&mut self, value: &str) -> Result<(), BoxError>;

    /// Does this option work without a value?
    fn is_boolean(&self) -> bool {
        false
    }

    /// A short name for the kind of value, shown in usage output.
    ///
    /// `None` renders no hint, which is what boolean values do.
    fn type_hint(&self) -> Option<&'static str> {
        Some("value")
    }
}

impl<V: Value + ?Sized> Value for Box<V> {
    fn set(&mut self, value: &str) -> Result<(), BoxError> {
        (**self).set(value)
    }

    fn is_boolean(&self) -> bool {
        (**self).is_boolean()
    }

    fn type_hint(&self) -> Option<&'static str> {
        (**self).type_hint()
    }
}

impl Value for bool {
    fn set(&mut self, value: &str) -> Result<(), BoxError> {
        *self = parse_bool(value)?;
        Ok(())
    }

    fn is_boolean(&self) -> bool {
        true
    }

    fn type_hint(&self) -> Option<&'static str> {
        None
    }
}

impl Value for String {
    fn set(&mut self, value: &str) -> Result<(), BoxError> {
        value.clone_into(self);
        Ok(())
    }

    fn type_hint(&self) -> Option<&'static str> {
        Some("string")
    }
}

macro_rules! impl_parsed_value {
    ($($ty:ty => $hint:literal),* $(,)?) => {
        $(
            impl Value for $ty {
                fn set(&mut self, value: &str) -> Result<(), BoxError> {
                    *self = value.parse()?;
                    Ok(())
                }

                fn type_hint(&self) -> Option<&'static str> {
                    Some($hint)
                }
            }
        )*
    };
}

impl_parsed_value!(
    i8 => "int",
    i16 => "int",
    i32 => "int",
    i64 => "int",
    i128 => "int",
    isize => "int",
    u8 => "uint",
    u16 => "uint",
    u32 => "uint",
    u64 => "uint",
    u128 => "uint",
    usize => "uint",
    f32 => "float",
    f64 => "float",
);

/// Parses the boolean spellings accepted on the command line.
fn parse_bool(value: &str) -> Result<bool, BoxError> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(format!("{:?} is not a boolean", value).into()),
    }
}

/// A name indexed store of option values.
///
/// The tokenizer resolves every option name through [`lookup`](Self::lookup)
/// and never holds on to the returned handle across arguments.
pub trait Registry {
    /// Looks up the value for an option name (without leading dashes).
    fn lookup(&mut self, name: &str) -> Option<&mut dyn Value>;
}

impl<R: Registry + ?Sized> Registry for &mut R {
    fn lookup(&mut self, name: &str) -> Option<&mut dyn Value> {
        (**self).lookup(name)
    }
}

impl<V: Value, S: BuildHasher> Registry for HashMap<String, V, S> {
    fn lookup(&mut self, name: &str) -> Option<&mut dyn Value> {
        self.get_mut(name).map(|value| value as &mut dyn Value)
    }
}

impl<V: Value> Registry for BTreeMap<String, V> {
    fn lookup(&mut self, name: &str) -> Option<&mut dyn Value> {
        self.get_mut(name).map(|value| value as &mut dyn Value)
    }
}

