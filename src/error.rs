//! Parse failures and their classification.

use crate::data::Opt;

/// Coarse failure class, used by callers to decide how to report a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed token: separators, field count, number syntax, vocabulary.
    Syntax,
    /// Numeric or CIDR value outside the bound allowed in its context.
    Range,
    /// Option already specified in this command.
    Duplicate,
    /// Resource exhaustion while copying input.
    Allocation,
    /// Hostname did not resolve to a usable address.
    Resolution,
    /// Missing type descriptor or parser binding.
    Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Syntax error: {0}")]
    Syntax(String),
    #[error("Syntax error: '{0}' is invalid as number")]
    NotANumber(String),
    #[error("Syntax error: '{value}' is out of range {min}-{max}")]
    OutOfRange { value: String, min: u64, max: u64 },
    #[error("Syntax error: {0} already specified")]
    DuplicateOption(Opt),
    #[error("Syntax error: cannot parse '{0}' as ethernet address")]
    NotAnEtherAddress(String),
    #[error("Syntax error: setname '{name}' is longer than {max} characters")]
    NameTooLong { name: String, max: usize },
    #[error("Syntax error: you must specify elements as setname,[before|after],setname: {0}")]
    BadNameRefSyntax(String),
    #[error("Syntax error: Missing separator from {0}")]
    MissingSeparator(String),
    #[error("Syntax error: {0}")]
    AddressFamilyMismatch(String),
    #[error("Syntax error: Protocol {proto} can be used with family {family} only")]
    ProtocolFamilyMismatch { proto: &'static str, family: &'static str },
    #[error("Syntax error: Elem separator in {elem}, but settype {settype} supports none.")]
    UnsupportedElementSyntax { elem: String, settype: String },
    #[error("Syntax error: {which} element is missing from {elem}.")]
    MissingElement { which: &'static str, elem: String },
    #[error("Syntax error: {found} elem separators in {elem}, but settype {settype} supports {supported}.")]
    TooManyElements {
        elem: String,
        settype: String,
        found: &'static str,
        supported: &'static str,
    },
    #[error("Cannot allocate memory to duplicate {0}.")]
    Allocation(String),
    #[error("Syntax error: {0}")]
    Resolution(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::OutOfRange { .. } => ErrorKind::Range,
            ParseError::DuplicateOption(_) => ErrorKind::Duplicate,
            ParseError::Allocation(_) => ErrorKind::Allocation,
            ParseError::Resolution(_) => ErrorKind::Resolution,
            ParseError::Internal(_) => ErrorKind::Internal,
            _ => ErrorKind::Syntax,
        }
    }

    pub(crate) fn syntax(msg: impl Into<String>) -> Self {
        ParseError::Syntax(msg.into())
    }
}

/// Copy user input into an owned string, reporting exhaustion instead of aborting.
pub(crate) fn dup(s: &str) -> Result<String, ParseError> {
    let mut out = String::new();
    out.try_reserve_exact(s.len())
        .map_err(|_| ParseError::Allocation(s.to_string()))?;
    out.push_str(s);
    Ok(out)
}
