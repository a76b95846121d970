//! Upserts into Gherkin `| variable | value |` data tables.
//!
//! Behave scenarios pass container environment variables through tables
//! headed `| variable | value |`. Rows are keyed by their first cell, so an
//! upsert rewrites the value of an existing key instead of appending a
//! duplicate row.

use std::sync::LazyLock;

use regex::Regex;

use super::substitution::Rewrite;

static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<indent>[ \t]*)\|[ \t]*variable[ \t]*\|[ \t]*value[ \t]*\|[ \t]*$")
        .expect("valid header regex")
});

/// A `| key | value |` row to insert or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub key: String,
    pub value: String,
}

impl Row {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    fn render(&self, indent: &str) -> String {
        format!("{indent}| {} | {} |", self.key, self.value)
    }
}

struct Line<'a> {
    body: &'a str,
    eol: &'a str,
}

fn split_lines(text: &str) -> Vec<Line<'_>> {
    text.split_inclusive('\n')
        .map(|raw| {
            let body = raw.trim_end_matches(['\n', '\r']);
            Line {
                body,
                eol: &raw[body.len()..],
            }
        })
        .collect()
}

fn is_table_row(body: &str) -> bool {
    body.trim_start().starts_with('|')
}

fn row_key(body: &str) -> Option<&str> {
    body.trim().split('|').nth(1).map(str::trim)
}

fn indent_of(body: &str) -> &str {
    &body[..body.len() - body.trim_start().len()]
}

/// Upsert `rows` into every variable table in `text`.
///
/// Each table found counts as one replacement, whether or not its content
/// changed.
pub fn upsert_rows(text: &str, rows: &[Row]) -> Rewrite {
    let lines = split_lines(text);
    let mut out = String::with_capacity(text.len() + 64);
    let mut tables = 0;
    let mut i = 0;

    while i < lines.len() {
        let line = &lines[i];
        out.push_str(line.body);
        out.push_str(line.eol);
        i += 1;

        let Some(caps) = HEADER.captures(line.body) else {
            continue;
        };
        tables += 1;

        let start = i;
        while i < lines.len() && is_table_row(lines[i].body) {
            i += 1;
        }
        let body = &lines[start..i];
        let indent = body
            .first()
            .map_or_else(|| caps["indent"].to_string(), |row| indent_of(row.body).to_string());
        // a header on the last line without a newline still needs one before inserted rows
        let eol = if line.eol.is_empty() { "\n" } else { line.eol };
        if line.eol.is_empty() && rows.iter().any(|r| !has_key(body, &r.key)) {
            out.push_str(eol);
        }

        for row in rows {
            if !has_key(body, &row.key) {
                out.push_str(&row.render(&indent));
                out.push_str(eol);
            }
        }
        for existing in body {
            let replaced = row_key(existing.body)
                .and_then(|key| rows.iter().find(|row| row.key == key))
                .map(|row| row.render(indent_of(existing.body)));
            match replaced {
                Some(rendered) => out.push_str(&rendered),
                None => out.push_str(existing.body),
            }
            out.push_str(existing.eol);
        }
    }

    Rewrite {
        text: out,
        replacements: tables,
    }
}

fn has_key(body: &[Line<'_>], key: &str) -> bool {
    body.iter().any(|line| row_key(line.body) == Some(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = "\
  Scenario: build
    When the container is started with env
      | variable     | value |
      | SCRIPT_DEBUG | true  |
    Then the image should contain label version
";

    #[test]
    fn inserts_missing_row_after_header() {
        let out = upsert_rows(SCENARIO, &[Row::new("MAVEN_REPO_URL", "https://repo/maven")]);
        assert_eq!(out.replacements, 1);
        assert!(out.text.contains(
            "| variable     | value |\n      | MAVEN_REPO_URL | https://repo/maven |\n      | SCRIPT_DEBUG | true  |"
        ));
    }

    #[test]
    fn updates_existing_row_in_place() {
        let text = "      | variable | value |\n      | MAVEN_REPO_URL | http://old |\n";
        let out = upsert_rows(text, &[Row::new("MAVEN_REPO_URL", "http://new")]);
        assert_eq!(
            out.text,
            "      | variable | value |\n      | MAVEN_REPO_URL | http://new |\n"
        );
    }

    #[test]
    fn upsert_is_idempotent() {
        let rows = [
            Row::new("MAVEN_REPO_URL", "http://repo"),
            Row::new("MAVEN_DOWNLOAD_OUTPUT", "true"),
        ];
        let once = upsert_rows(SCENARIO, &rows);
        let twice = upsert_rows(&once.text, &rows);
        assert_eq!(once.text, twice.text);
        assert_eq!(twice.replacements, 1);
    }

    #[test]
    fn empty_table_uses_header_indentation() {
        let text = "    | variable | value |\n    Then done\n";
        let out = upsert_rows(text, &[Row::new("A", "1")]);
        assert_eq!(out.text, "    | variable | value |\n    | A | 1 |\n    Then done\n");
    }

    #[test]
    fn header_without_trailing_newline() {
        let out = upsert_rows("| variable | value |", &[Row::new("A", "1")]);
        assert_eq!(out.text, "| variable | value |\n| A | 1 |\n");
    }

    #[test]
    fn other_tables_are_ignored() {
        let text = "      | name | value |\n      | A | 1 |\n";
        let out = upsert_rows(text, &[Row::new("A", "2")]);
        assert_eq!(out, Rewrite::unchanged(text));
    }
}
