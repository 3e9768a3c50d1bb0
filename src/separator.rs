//! Separator lookup for composite tokens.
//!
//! A separator character at the very first or very last position of a token
//! belongs to the token itself and is never treated as a separator.

/// Position of the first interior occurrence of any of `seps` in `s`.
pub fn find(s: &str, seps: &[char]) -> Option<usize> {
    let last = s.char_indices().last().map(|(i, _)| i)?;
    s.char_indices()
        .find(|&(i, c)| i != 0 && i != last && seps.contains(&c))
        .map(|(i, _)| i)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// `addr/cidr`, `type/code`
    Cidr,
    /// `from-to`
    Range,
    /// `part,part[,part]`
    Elem,
    /// `setname,before|after,setname`
    Name,
    /// `proto:port`
    Proto,
}

impl Separator {
    pub fn as_char(self) -> char {
        match self {
            Separator::Cidr => '/',
            Separator::Range => '-',
            Separator::Elem | Separator::Name => ',',
            Separator::Proto => ':',
        }
    }

    pub fn find(self, s: &str) -> Option<usize> {
        find(s, &[self.as_char()])
    }

    pub fn contained_in(self, s: &str) -> bool {
        self.find(s).is_some()
    }

    /// Split at the first interior separator, dropping it.
    pub fn split(self, s: &str) -> Option<(&str, &str)> {
        let at = self.find(s)?;
        Some((&s[..at], &s[at + self.as_char().len_utf8()..]))
    }
}
