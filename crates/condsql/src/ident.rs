//! SQL identifier quoting.
//!
//! Identifiers (table and column names) are wrapped in backticks before they
//! are emitted. Names are passed through verbatim: an embedded backtick is not
//! escaped, so callers must only hand in simple, unquoted names.
//!
//! # Example
//! ```
//! use condsql::ident::quote_identifier;
//!
//! assert_eq!(quote_identifier("pet_shop_name"), "`pet_shop_name`");
//! ```

/// The identifier quote character used for every emitted identifier.
pub const IDENT_QUOTE: char = '`';

/// Wrap a raw identifier in the identifier quote character.
pub fn quote_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    write_identifier(&mut out, name);
    out
}

/// Append a quoted identifier to `out`.
pub(crate) fn write_identifier(out: &mut String, name: &str) {
    out.push(IDENT_QUOTE);
    out.push_str(name);
    out.push(IDENT_QUOTE);
}

/// Quote each name and join them with `", "`.
pub(crate) fn quote_list<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for (i, name) in names.into_iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_identifier(&mut out, name);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ident_simple() {
        assert_eq!(quote_identifier("users"), "`users`");
    }

    #[test]
    fn ident_keeps_case_and_digits() {
        assert_eq!(quote_identifier("PetShop2"), "`PetShop2`");
    }

    #[test]
    fn ident_does_not_escape_embedded_quote() {
        assert_eq!(quote_identifier("a`b"), "`a`b`");
    }

    #[test]
    fn ident_list() {
        assert_eq!(quote_list(["id", "name"]), "`id`, `name`");
        assert_eq!(quote_list(Vec::<&str>::new()), "");
    }
}
