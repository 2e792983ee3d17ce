use core::fmt;
use std::{borrow::Cow, ops::Deref};

/// An error that aborts a whole conversion call.
///
/// Per-node problems never surface here, they degrade to placeholder output
/// and are reported as [`crate::diagnostics::Degradation`]s instead.
#[derive(Clone)]
pub struct Error(Box<Repr>);

#[derive(Clone)]
enum Repr {
    /// Just a message.
    Msg(Cow<'static, str>),
    /// The input could not be read as a document tree or option set.
    Input(Cow<'static, str>),
    /// The document builder rejected the assembled output.
    Pack(Cow<'static, str>),
}

impl Error {
    /// Creates an error for input that is not a document tree or option set.
    pub fn input(msg: impl Into<Cow<'static, str>>) -> Self {
        Error(Box::new(Repr::Input(msg.into())))
    }

    /// Creates an error for a packaging failure of the document builder.
    pub fn pack(msg: impl Into<Cow<'static, str>>) -> Self {
        Error(Box::new(Repr::Pack(msg.into())))
    }

    /// Whether the error was raised by the document builder.
    pub fn is_pack(&self) -> bool {
        matches!(self.0.deref(), Repr::Pack(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.deref() {
            Repr::Msg(s) => write!(f, "{s}"),
            Repr::Input(s) => write!(f, "invalid input: {s}"),
            Repr::Pack(s) => write!(f, "failed to pack DOCX: {s}"),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        <Self as fmt::Display>::fmt(self, f)
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error(Box::new(Repr::Msg(e.to_string().into())))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::input(e.to_string())
    }
}

impl From<&'static str> for Error {
    fn from(s: &'static str) -> Self {
        Error(Box::new(Repr::Msg(s.into())))
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error(Box::new(Repr::Msg(s.into())))
    }
}

impl From<Cow<'static, str>> for Error {
    fn from(s: Cow<'static, str>) -> Self {
        Error(Box::new(Repr::Msg(s)))
    }
}
