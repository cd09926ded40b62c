//! Errors

use std::error;
use std::fmt;

/// The main error type of the library
#[derive(Debug)]
pub enum Error {
    /// An error related to performing a HTTP request
    Http(reqwest::Error),
    /// An attempt to parse a string that was not a valid URL
    Url(url::ParseError),
    /// A response body could not be decoded as the expected JSON shape
    Json(serde_json::Error),
    /// A parameter violated a documented constraint before any remote
    /// call was made
    Validation(Validation),
    /// The remote call reported a failure in its response envelope
    Remote {
        /// Name of the remote operation that failed
        operation: &'static str,
        /// Message extracted from the response envelope
        message: String,
    },
    /// A response did not have the shape this crate expects
    UnexpectedResponse(&'static str),
}

/// A parameter constraint violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// A string parameter exceeded its length ceiling
    TooLong {
        /// Parameter name
        field: &'static str,
        /// Maximum accepted length in characters
        max: usize,
        /// Length that was supplied
        len: usize,
    },
    /// An integer parameter fell outside its accepted range
    OutOfRange {
        /// Parameter name
        field: &'static str,
        /// Smallest accepted value
        min: i64,
        /// Largest accepted value
        max: i64,
        /// Value that was supplied
        value: i64,
    },
    /// A sort name outside the fixed enumeration
    UnknownSort(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Http(err) => write!(f, "http error: {}", err),
            Error::Url(err) => write!(f, "invalid url: {}", err),
            Error::Json(err) => write!(f, "unexpected response body: {}", err),
            Error::Validation(validation) => validation.fmt(f),
            Error::Remote { operation, message } => {
                write!(f, "{} failed: {}", operation, message)
            }
            Error::UnexpectedResponse(what) => write!(f, "unexpected response: {}", what),
        }
    }
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validation::TooLong { field, max, len } => {
                write!(f, "{} is limited to {} characters (got {})", field, max, len)
            }
            Validation::OutOfRange {
                field,
                min,
                max,
                value,
            } => write!(
                f,
                "{} must be between {} and {} (got {})",
                field, min, max, value
            ),
            Validation::UnknownSort(sort) => write!(f, "unknown sort order: {}", sort),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Http(err) => Some(err),
            Error::Url(err) => Some(err),
            Error::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(error: url::ParseError) -> Self {
        Error::Url(error)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<Validation> for Error {
    fn from(validation: Validation) -> Self {
        Error::Validation(validation)
    }
}

/// Reject `value` if it is longer than `max` characters.
pub(crate) fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), Error> {
    let len = value.chars().count();
    if len > max {
        Err(Validation::TooLong { field, max, len }.into())
    } else {
        Ok(())
    }
}

/// Reject `value` if it falls outside `min..=max`.
pub(crate) fn check_range(field: &'static str, value: i64, min: i64, max: i64) -> Result<(), Error> {
    if value < min || value > max {
        Err(Validation::OutOfRange {
            field,
            min,
            max,
            value,
        }
        .into())
    } else {
        Ok(())
    }
}
