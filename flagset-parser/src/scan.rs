//! The tokenizer.
//!
//! Arguments are fed one after another and scanned char by char.  After the
//! last char of every argument a separator event is fed which ends whatever
//! token is currently being collected.  Option names are resolved against the
//! registry the moment they are complete and values are pushed into the
//! registry the moment they end.  Nothing is ever scanned twice.
//!
//! There is no final state: when the arguments run out the scan just stops.
//! An option still waiting for its value at that point is left untouched.
use std::mem::{replace, take};

use tracing::trace;

use crate::error::{BoxError, Error, ErrorKind};
use crate::value::{Registry, Value};
use crate::OptionName;

/// The scanner states.
#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    /// Nothing buffered, start of a new token.
    Default,
    /// Collecting a positional argument.
    BufferingArgument,
    /// Seen a single leading `-`.
    OptionStart,
    /// Seen `--`.
    DoubleDash,
    /// Collecting a long option name.
    LongOption,
    /// The short option letter waiting to be resolved.
    ShortOptions(char),
    /// Collecting the value for the given option.
    ValueExpected(OptionName),
    /// After `--`, everything is positional.
    ArgumentOnly,
}

/// A single scanner input.
#[derive(Debug, Clone, Copy)]
enum Input {
    Char(char),
    Separator,
}

pub(crate) struct Scanner<'a, R: ?Sized> {
    registry: &'a mut R,
    positionals: &'a mut Vec<String>,
    state: State,
    buffer: String,
}

impl<'a, R: Registry + ?Sized> Scanner<'a, R> {
    pub fn new(registry: &'a mut R, positionals: &'a mut Vec<String>) -> Scanner<'a, R> {
        Scanner {
            registry,
            positionals,
            state: State::Default,
            buffer: String::new(),
        }
    }

    /// Scans a single argument including the separator behind it.
    pub fn feed(&mut self, arg: &str) -> Result<(), Error> {
        for c in arg.chars() {
            self.step(Input::Char(c))?;
        }
        self.step(Input::Separator)
    }

    fn step(&mut self, input: Input) -> Result<(), Error> {
        self.state = match (replace(&mut self.state, State::Default), input) {
            (State::Default, Input::Separator) => State::Default,
            (State::Default, Input::Char('-')) => State::OptionStart,
            (State::Default, Input::Char(c)) => {
                self.buffer.push(c);
                State::BufferingArgument
            }

            (State::BufferingArgument, Input::Separator) => {
                self.emit_positional();
                State::Default
            }
            (State::BufferingArgument, Input::Char(c)) => {
                self.buffer.push(c);
                State::BufferingArgument
            }

            (State::OptionStart, Input::Separator) => {
                self.positionals.push("-".to_string());
                State::Default
            }
            (State::OptionStart, Input::Char('-')) => State::DoubleDash,
            (State::OptionStart, Input::Char(c)) => State::ShortOptions(c),

            (State::DoubleDash, Input::Separator) => {
                trace!("end of options");
                State::ArgumentOnly
            }
            (State::DoubleDash, Input::Char(c)) => {
                self.buffer.push(c);
                State::LongOption
            }

            (State::LongOption, Input::Char('=')) => {
                State::ValueExpected(OptionName::Long(take(&mut self.buffer)))
            }
            (State::LongOption, Input::Separator) => {
                let option = OptionName::Long(take(&mut self.buffer));
                if self.resolve(&option)? {
                    State::Default
                } else {
                    State::ValueExpected(option)
                }
            }
            (State::LongOption, Input::Char(c)) => {
                self.buffer.push(c);
                State::LongOption
            }

            (State::ShortOptions(letter), input) => self.short_option(letter, input)?,

            (State::ValueExpected(option), Input::Separator) => {
                self.commit_value(option)?;
                State::Default
            }
            (State::ValueExpected(option), Input::Char(c)) => {
                self.buffer.push(c);
                State::ValueExpected(option)
            }

            (State::ArgumentOnly, Input::Separator) => {
                self.emit_positional();
                State::ArgumentOnly
            }
            (State::ArgumentOnly, Input::Char(c)) => {
                self.buffer.push(c);
                State::ArgumentOnly
            }
        };
        Ok(())
    }

    /// Handles the input following a short option letter.
    fn short_option(&mut self, letter: char, input: Input) -> Result<State, Error> {
        let option = OptionName::Short(letter);
        if let Input::Char('=') = input {
            return Ok(State::ValueExpected(option));
        }
        let is_boolean = self.resolve(&option)?;
        match (is_boolean, input) {
            (true, Input::Separator) => Ok(State::Default),
            (true, Input::Char(next)) => Ok(State::ShortOptions(next)),
            (false, Input::Separator) => Ok(State::ValueExpected(option)),
            (false, Input::Char(_)) => {
                Err(Error::new(ErrorKind::OptionNotFlag).with_option(option))
            }
        }
    }

    /// Resolves an option name.
    ///
    /// Boolean options are set right away and `true` is returned, for all
    /// other options `false` is returned and the value needs to follow.
    fn resolve(&mut self, option: &OptionName) -> Result<bool, Error> {
        let value = match lookup(&mut *self.registry, option) {
            Some(value) => value,
            None => {
                let kind = if option.is_help() {
                    ErrorKind::HelpRequested
                } else {
                    ErrorKind::OptionNotFound
                };
                return Err(Error::new(kind).with_option(option.clone()));
            }
        };
        if !value.is_boolean() {
            trace!(%option, "option expects a value");
            return Ok(false);
        }
        value
            .set("true")
            .map_err(|err| invalid_value(option.clone(), "true", err))?;
        trace!(%option, "boolean option set");
        Ok(true)
    }

    /// Pushes the buffered value into the registry.
    fn commit_value(&mut self, option: OptionName) -> Result<(), Error> {
        let value = take(&mut self.buffer);
        let handle = match lookup(&mut *self.registry, &option) {
            Some(handle) => handle,
            None => return Err(Error::new(ErrorKind::OptionNotFound).with_option(option)),
        };
        trace!(%option, %value, "option value set");
        handle
            .set(&value)
            .map_err(|err| invalid_value(option, value, err))
    }

    fn emit_positional(&mut self) {
        if !self.buffer.is_empty() {
            self.positionals.push(take(&mut self.buffer));
        }
    }
}

fn lookup<'r, R: Registry + ?Sized>(
    registry: &'r mut R,
    option: &OptionName,
) -> Option<&'r mut dyn Value> {
    match option {
        OptionName::Short(c) => registry.lookup(c.encode_utf8(&mut [0; 4])),
        OptionName::Long(name) => registry.lookup(name),
    }
}

fn invalid_value(option: OptionName, value: impl Into<String>, err: BoxError) -> Error {
    Error::new(ErrorKind::InvalidValue)
        .with_option(option)
        .with_value(value)
        .with_source(err)
}
