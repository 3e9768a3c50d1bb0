//! Set names and `before`/`after` references for list:set.

use super::check_free;
use crate::data::Opt;
use crate::error::{dup, ParseError};
use crate::separator::Separator;
use crate::session::Session;
use crate::value::Value;

/// Size of a set name buffer including the terminator.
pub const MAX_NAME_LEN: usize = 32;

fn check_setname(s: &str) -> Result<(), ParseError> {
    if s.len() > MAX_NAME_LEN - 1 {
        return Err(ParseError::NameTooLong {
            name: s.to_string(),
            max: MAX_NAME_LEN - 1,
        });
    }
    Ok(())
}

const MIXED_REFERENCE: &str = "mixed syntax, before|after option already used";

pub fn parse_setname(session: &mut Session<'_>, opt: Opt, s: &str) -> Result<(), ParseError> {
    debug_assert!(matches!(opt, Opt::SetName | Opt::Name | Opt::SetName2));
    check_setname(s)?;
    session.data_mut().set(opt, Value::Str(dup(s)?))
}

/// `setname` or `setname,before|after,setname`.
///
/// A reference given while one is already set is dropped with a warning.
pub fn parse_name_compat(session: &mut Session<'_>, opt: Opt, s: &str) -> Result<(), ParseError> {
    debug_assert_eq!(opt, Opt::Name);
    let (name, reference) = match Separator::Name.split(s) {
        None => (s, None),
        Some((name, rest)) => {
            let (marker, refname) = Separator::Name
                .split(rest)
                .ok_or_else(|| ParseError::BadNameRefSyntax(s.to_string()))?;
            let before = match marker {
                "before" => true,
                "after" => false,
                _ => return Err(ParseError::BadNameRefSyntax(s.to_string())),
            };
            (name, Some((before, refname)))
        }
    };
    check_setname(name)?;
    if let Some((_, refname)) = reference {
        check_setname(refname)?;
    }

    let reference = match reference {
        Some(_) if session.data().test_flag(Opt::NameRef) => {
            session.warn(MIXED_REFERENCE);
            None
        }
        other => other,
    };

    let name = dup(name)?;
    let data = session.data_mut();
    match reference {
        None => data.set(opt, Value::Str(name)),
        Some((before, refname)) => {
            let refname = dup(refname)?;
            let mut slots = vec![opt, Opt::NameRef];
            if before {
                slots.push(Opt::Before);
            }
            check_free(data, &slots)?;
            data.set(opt, Value::Str(name))?;
            data.set(Opt::NameRef, Value::Str(refname))?;
            if before {
                data.set(Opt::Before, Value::Flag)?;
            }
            Ok(())
        }
    }
}

/// Reference set name to insert before.
pub fn parse_before(session: &mut Session<'_>, opt: Opt, s: &str) -> Result<(), ParseError> {
    debug_assert_eq!(opt, Opt::NameRef);
    if session.data().test_flag(Opt::NameRef) {
        session.warn(MIXED_REFERENCE);
        return Ok(());
    }
    check_setname(s)?;
    let refname = dup(s)?;
    let data = session.data_mut();
    check_free(data, &[Opt::Before])?;
    data.set(opt, Value::Str(refname))?;
    data.set(Opt::Before, Value::Flag)
}

/// Reference set name to insert after.
pub fn parse_after(session: &mut Session<'_>, opt: Opt, s: &str) -> Result<(), ParseError> {
    debug_assert_eq!(opt, Opt::NameRef);
    if session.data().test_flag(Opt::NameRef) {
        session.warn(MIXED_REFERENCE);
        return Ok(());
    }
    check_setname(s)?;
    session.data_mut().set(opt, Value::Str(dup(s)?))
}
