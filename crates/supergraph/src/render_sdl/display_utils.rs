use crate::{Deprecated, FederatedGraph};
use std::fmt::{self, Write};

pub(super) const INDENT: &str = "  ";

/// Write `s` as a GraphQL string literal, quotes included.
pub(super) fn write_string_literal(s: &str, out: &mut String) -> fmt::Result {
    out.push('"');

    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => write!(out, "\\u{:04X}", c as u32)?,
            c => out.push(c),
        }
    }

    out.push('"');
    Ok(())
}

/// Block string description, each line at `indent`.
pub(super) fn write_description(description: Option<&str>, indent: &str, out: &mut String) -> fmt::Result {
    let Some(description) = description else {
        return Ok(());
    };

    writeln!(out, "{indent}\"\"\"")?;

    for line in description.lines() {
        if line.is_empty() {
            out.push('\n');
        } else {
            writeln!(out, "{indent}{}", line.replace("\"\"\"", "\\\"\"\""))?;
        }
    }

    writeln!(out, "{indent}\"\"\"")
}

/// `@deprecated`, the only directive that also survives in the API schema.
pub(super) fn write_deprecated(deprecated: &Deprecated, out: &mut String) -> fmt::Result {
    out.push_str("@deprecated");

    if let Some(reason) = &deprecated.reason {
        out.push_str("(reason: ");
        write_string_literal(reason, out)?;
        out.push(')');
    }

    Ok(())
}

/// The `join__Graph` enum value for each subgraph, in subgraph order.
pub(super) fn graph_enum_values(graph: &FederatedGraph) -> Vec<String> {
    let mut values: Vec<String> = Vec::with_capacity(graph.subgraphs.len());

    for subgraph in &graph.subgraphs {
        let mut value: String = subgraph
            .name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
            .collect();

        if value.is_empty() || value.starts_with(|c: char| c.is_ascii_digit()) {
            value.insert(0, '_');
        }

        let mut candidate = value.clone();
        let mut suffix = 1;

        while values.contains(&candidate) {
            candidate = format!("{value}_{suffix}");
            suffix += 1;
        }

        values.push(candidate);
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Subgraph;

    #[test]
    fn graph_enum_values_are_unique() {
        let graph = FederatedGraph {
            subgraphs: ["products", "my-products", "my_products", "1st"]
                .into_iter()
                .map(|name| Subgraph {
                    name: name.to_owned(),
                    url: None,
                })
                .collect(),
            ..Default::default()
        };

        assert_eq!(
            graph_enum_values(&graph),
            ["PRODUCTS", "MY_PRODUCTS", "MY_PRODUCTS_1", "_1ST"]
        );
    }

    #[test]
    fn string_literal_escapes() {
        let mut out = String::new();
        write_string_literal("say \"hi\"\n", &mut out).unwrap();
        assert_eq!(out, r#""say \"hi\"\n""#);
    }
}
