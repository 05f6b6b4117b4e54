//! This example shows how to plug custom values into a flag set.
//!
//! `-v` can be repeated (`-vvv`) to raise the verbosity and `--tag` collects
//! comma separated values across multiple uses.
use std::fmt;

use flagset_parser::{BoxError, ErrorHandling, FlagSet, Parser, Value};

#[derive(Default)]
struct Verbosity(u32);

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Value for Verbosity {
    fn set(&mut self, value: &str) -> Result<(), BoxError> {
        match value {
            "true" => self.0 += 1,
            other => self.0 = other.parse()?,
        }
        Ok(())
    }

    fn is_boolean(&self) -> bool {
        true
    }

    fn type_hint(&self) -> Option<&'static str> {
        None
    }
}

#[derive(Default)]
struct Tags(Vec<String>);

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(","))
    }
}

impl Value for Tags {
    fn set(&mut self, value: &str) -> Result<(), BoxError> {
        self.0.extend(
            value
                .split(',')
                .filter(|x| !x.is_empty())
                .map(str::to_string),
        );
        Ok(())
    }

    fn type_hint(&self) -> Option<&'static str> {
        Some("list")
    }
}

fn main() {
    let mut flags = FlagSet::new("custom-values", ErrorHandling::Exit);
    flags
        .define("v", Verbosity::default(), "more output, can be repeated")
        .define("tag", Tags::default(), "comma separated tags");

    let mut parser = Parser::new(flags);
    if let Err(err) = parser.parse_env() {
        parser.registry_mut().handle_error(err);
    }

    let flags = parser.registry();
    println!("verbosity: {}", flags.value_of("v").unwrap_or_default());
    println!("tags: {}", flags.value_of("tag").unwrap_or_default());
    println!("args: {:?}", parser.args());
}
