//! The `$<tag>.` type-prefix discipline of variable names.
//!
//! A variable name like `$i.count` carries its type in the prefix: the tag
//! is both a routing key (which store holds the variable) and a contract
//! checked at every use. Tags are parsed once, at the point a token is
//! recognized as a variable; the full name string remains the store key.

use std::fmt;

/// Variable type tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    /// `$i.` - integer value.
    Int,
    /// `$r.` - real value.
    Real,
    /// `$s.` - string value.
    Str,
    /// `$b.` - boolean value.
    Bool,
    /// `$c.` - character value.
    Char,
    /// `$ip.` - item reference.
    Item,
    /// `$fp.` - frame reference.
    Frame,
    /// `$ap.` - association (key/value map) reference.
    Assoc,
    /// `$sp.` - stream (open file handle) reference.
    Stream,
}

impl Tag {
    /// Parse a tag from its prefix text (the part between `$` and `.`).
    pub fn parse(text: &str) -> Option<Tag> {
        match text {
            "i" => Some(Tag::Int),
            "r" => Some(Tag::Real),
            "s" => Some(Tag::Str),
            "b" => Some(Tag::Bool),
            "c" => Some(Tag::Char),
            "ip" => Some(Tag::Item),
            "fp" => Some(Tag::Frame),
            "ap" => Some(Tag::Assoc),
            "sp" => Some(Tag::Stream),
            _ => None,
        }
    }

    /// Parse the tag of a full variable name of the form `$<tag>.<ident>`.
    ///
    /// Returns `None` when the token is not a well-formed variable name
    /// (missing `$`, unknown tag, or empty identifier).
    pub fn of_var(name: &str) -> Option<Tag> {
        let rest = name.strip_prefix('$')?;
        let dot = rest.find('.')?;
        let tag = Tag::parse(&rest[..dot])?;
        if rest[dot + 1..].is_empty() {
            return None;
        }
        Some(tag)
    }

    /// The tag prefix text (without `$` or `.`).
    pub fn text(self) -> &'static str {
        match self {
            Tag::Int => "i",
            Tag::Real => "r",
            Tag::Str => "s",
            Tag::Bool => "b",
            Tag::Char => "c",
            Tag::Item => "ip",
            Tag::Frame => "fp",
            Tag::Assoc => "ap",
            Tag::Stream => "sp",
        }
    }

    /// Human-readable tag name for diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            Tag::Int => "integer",
            Tag::Real => "real",
            Tag::Str => "string",
            Tag::Bool => "boolean",
            Tag::Char => "character",
            Tag::Item => "item reference",
            Tag::Frame => "frame reference",
            Tag::Assoc => "association reference",
            Tag::Stream => "stream reference",
        }
    }

    /// Whether this tag routes to the value store.
    pub fn is_value(self) -> bool {
        matches!(self, Tag::Int | Tag::Real | Tag::Str | Tag::Bool | Tag::Char)
    }

    /// Whether this tag routes to the reference store.
    pub fn is_reference(self) -> bool {
        !self.is_value()
    }

    /// Whether this tag participates in arithmetic.
    pub fn is_numeric(self) -> bool {
        matches!(self, Tag::Int | Tag::Real)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.", self.text())
    }
}

/// The tag character of a token: the letter right after `$`.
///
/// Procedure signature matching compares only this character at each
/// argument position, so `$ip.here` and `$ip.there` match while `$i.n`
/// and `$r.n` do not. Returns `None` for tokens that do not start with `$`.
pub fn tag_char(token: &str) -> Option<char> {
    let mut chars = token.chars();
    if chars.next()? != '$' {
        return None;
    }
    chars.next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_all_tag_prefixes() {
        for (text, tag) in [
            ("i", Tag::Int),
            ("r", Tag::Real),
            ("s", Tag::Str),
            ("b", Tag::Bool),
            ("c", Tag::Char),
            ("ip", Tag::Item),
            ("fp", Tag::Frame),
            ("ap", Tag::Assoc),
            ("sp", Tag::Stream),
        ] {
            assert_eq!(Tag::parse(text), Some(tag));
            assert_eq!(tag.text(), text);
        }
        assert_eq!(Tag::parse("x"), None);
    }

    #[test]
    fn of_var_requires_full_shape() {
        assert_eq!(Tag::of_var("$i.count"), Some(Tag::Int));
        assert_eq!(Tag::of_var("$ap.lookup"), Some(Tag::Assoc));
        assert_eq!(Tag::of_var("i.count"), None);
        assert_eq!(Tag::of_var("$i."), None);
        assert_eq!(Tag::of_var("$z.count"), None);
        assert_eq!(Tag::of_var("$icount"), None);
    }

    #[test]
    fn tag_char_is_second_character() {
        assert_eq!(tag_char("$i.x"), Some('i'));
        assert_eq!(tag_char("$fp.home"), Some('f'));
        assert_eq!(tag_char("42"), None);
    }

    #[test]
    fn store_routing_is_total() {
        let all = [
            Tag::Int,
            Tag::Real,
            Tag::Str,
            Tag::Bool,
            Tag::Char,
            Tag::Item,
            Tag::Frame,
            Tag::Assoc,
            Tag::Stream,
        ];
        for tag in all {
            assert_ne!(tag.is_value(), tag.is_reference());
        }
    }
}
