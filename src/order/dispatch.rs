//! Dispatch

use std::{fmt, io, str::FromStr};

use thiserror::Error;
use tracing::info;

use crate::validation::ValidationError;

const MIN_DIGITS: usize = 10;
const MAX_DIGITS: usize = 15;
const NATIONAL_DIGITS: usize = 11;
const COUNTRY_CODE: &str = "55";

/// Failures handing an order to the messaging channel.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The channel could not be reached.
    #[error("messaging channel unavailable: {0}")]
    ChannelUnavailable(String),

    /// The channel refused the message.
    #[error("message rejected: {0}")]
    Rejected(String),
}

/// Phone number an order is sent to, digits only, with country code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Destination(String);

impl Destination {
    /// Normalise a phone number: strip everything but digits, require 10 to 15
    /// of them, and prefix the Brazilian country code to 11-digit national numbers.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDestination`] if the digit count is out of range.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

        if !(MIN_DIGITS..=MAX_DIGITS).contains(&digits.len()) {
            return Err(ValidationError::InvalidDestination(raw.to_string()));
        }

        if digits.len() == NATIONAL_DIGITS {
            return Ok(Self(format!("{COUNTRY_CODE}{digits}")));
        }

        Ok(Self(digits))
    }

    /// The normalised digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Destination {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hands a rendered order to an external messaging channel.
#[cfg_attr(test, mockall::automock)]
pub trait Dispatcher {
    /// Send `message` to `destination`.
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] if the message was not handed off.
    fn send(&mut self, message: &str, destination: &Destination) -> Result<(), DispatchError>;
}

/// Dispatcher that writes the message to an output stream, for terminals and logs.
#[derive(Debug)]
pub struct WriterDispatcher<W> {
    out: W,
}

impl<W: io::Write> WriterDispatcher<W> {
    /// Write dispatched messages to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the output stream.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: io::Write> Dispatcher for WriterDispatcher<W> {
    fn send(&mut self, message: &str, destination: &Destination) -> Result<(), DispatchError> {
        writeln!(self.out, "Para: +{destination}\n\n{message}")
            .and_then(|()| self.out.flush())
            .map_err(|err| DispatchError::ChannelUnavailable(err.to_string()))?;

        info!(%destination, bytes = message.len(), "dispatched order");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn strips_formatting() -> TestResult {
        let destination = Destination::parse("+55 (11) 99999-9999")?;

        assert_eq!(destination.as_str(), "5511999999999");

        Ok(())
    }

    #[test]
    fn prefixes_national_numbers() -> TestResult {
        assert_eq!(Destination::parse("(11) 98765-4321")?.as_str(), "5511987654321");
        assert_eq!(Destination::parse("1133334444")?.as_str(), "1133334444");

        Ok(())
    }

    #[test]
    fn rejects_wrong_lengths() {
        for raw in ["", "12345", "123456789", "1234567890123456", "abc"] {
            assert_eq!(
                Destination::parse(raw),
                Err(ValidationError::InvalidDestination(raw.to_string())),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn writer_dispatcher_writes_message() -> TestResult {
        let mut dispatcher = WriterDispatcher::new(Vec::new());

        dispatcher.send("olá", &"5511999999999".parse()?)?;

        let output = String::from_utf8(dispatcher.into_inner())?;

        assert_eq!(output, "Para: +5511999999999\n\nolá\n");

        Ok(())
    }
}
