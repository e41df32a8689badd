//! Escaping for identifiers interpolated into generated Cypher.
//!
//! Labels, relationship types, and property names cannot be bound as
//! parameters, so any such string that originates outside this crate must
//! pass through here before it reaches a query template.

/// Escape an untrusted string for use as a Cypher label, relationship
/// type, or property name. Backtick-quotes the identifier, doubling any
/// embedded backticks.
pub fn escape_identifier(raw: &str) -> String {
    format!("`{}`", raw.replace('`', "``"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_identifiers_are_quoted() {
        assert_eq!(escape_identifier("member-of"), "`member-of`");
        assert_eq!(escape_identifier("Group"), "`Group`");
    }

    #[test]
    fn embedded_backticks_cannot_break_out() {
        assert_eq!(
            escape_identifier("x` ]->(n) DETACH DELETE n //"),
            "`x`` ]->(n) DETACH DELETE n //`"
        );
    }
}
