//! Identifier quoting and positional-parameter conventions.
//!
//! Everything backend-specific about statement text lives here so the query
//! builder can stay dialect-agnostic.

/// Placeholder convention for bound parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// PostgreSQL-style placeholders like `$1`.
    Postgres,
    /// SQLite-style placeholders like `?1`.
    Sqlite,
}

impl PlaceholderStyle {
    /// Render the placeholder for the 1-based parameter `position`.
    #[must_use]
    pub fn placeholder(self, position: usize) -> String {
        match self {
            PlaceholderStyle::Postgres => format!("${position}"),
            PlaceholderStyle::Sqlite => format!("?{position}"),
        }
    }
}

/// Statement-text conventions of one backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub placeholders: PlaceholderStyle,
    /// Delimiter wrapped around table and column names.
    pub ident_quote: char,
}

impl Dialect {
    pub const SQLITE: Dialect = Dialect {
        placeholders: PlaceholderStyle::Sqlite,
        ident_quote: '"',
    };

    pub const POSTGRES: Dialect = Dialect {
        placeholders: PlaceholderStyle::Postgres,
        ident_quote: '"',
    };

    #[must_use]
    pub fn quote_ident(&self, name: &str) -> String {
        quote_ident(name, self.ident_quote)
    }

    #[must_use]
    pub fn placeholder(&self, position: usize) -> String {
        self.placeholders.placeholder(position)
    }
}

/// Wrap `name` in `delimiter`, doubling any delimiter already inside it.
///
/// ```rust
/// use sql_table_map::dialect::quote_ident;
///
/// assert_eq!(quote_ident("message_id", '"'), r#""message_id""#);
/// assert_eq!(quote_ident(r#"odd"name"#, '"'), r#""odd""name""#);
/// ```
#[must_use]
pub fn quote_ident(name: &str, delimiter: char) -> String {
    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push(delimiter);
    for ch in name.chars() {
        if ch == delimiter {
            quoted.push(delimiter);
        }
        quoted.push(ch);
    }
    quoted.push(delimiter);
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoting_doubles_embedded_delimiters() {
        assert_eq!(quote_ident("plain", '"'), "\"plain\"");
        assert_eq!(quote_ident("a\"b\"\"c", '"'), "\"a\"\"b\"\"\"\"c\"");
        assert_eq!(quote_ident("we`ird", '`'), "`we``ird`");
        assert_eq!(quote_ident("has space; DROP", '"'), "\"has space; DROP\"");
    }

    #[test]
    fn placeholders_follow_the_backend() {
        assert_eq!(Dialect::SQLITE.placeholder(3), "?3");
        assert_eq!(Dialect::POSTGRES.placeholder(1), "$1");
    }
}
