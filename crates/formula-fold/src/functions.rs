//! Embedded function catalog.
//!
//! The tables live outside the Rust source in `src/data/` so they can be extended without touching
//! code:
//!
//! - `functions.txt`: one Excel function name per line (the lexer's function catalog).
//! - `function-comments.tsv`: `NAME<TAB>description`, used for annotation comments.
//! - `python-functions.tsv`: `EXCEL_NAME<TAB>python_name`, used by the Python-like mode.
//!
//! Every table is parsed lazily on first use. Malformed or duplicate entries are programming errors
//! in the embedded data and panic with the offending line numbers.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

#[derive(Debug)]
struct FunctionNames {
    data: &'static str,
    names: OnceLock<HashSet<String>>,
}

impl FunctionNames {
    const fn new(data: &'static str) -> Self {
        Self {
            data,
            names: OnceLock::new(),
        }
    }

    fn names(&self) -> &HashSet<String> {
        self.names.get_or_init(|| {
            let mut seen: HashMap<String, usize> = HashMap::new();
            for (line_no, line) in data_lines(self.data) {
                if line.contains(char::is_whitespace) {
                    panic!("invalid function name at line {line_no}: {line:?}");
                }
                let key = line.to_ascii_uppercase();
                if let Some(prev_no) = seen.get(&key) {
                    panic!(
                        "duplicate function name {key:?}\n  first: line {prev_no}\n  second: line {line_no}"
                    );
                }
                seen.insert(key, line_no);
            }
            seen.into_keys().collect()
        })
    }

    fn contains(&self, name: &str) -> bool {
        self.names().contains(&name.to_ascii_uppercase())
    }
}

#[derive(Debug)]
struct NameMaps {
    forward: HashMap<String, &'static str>,
    reverse: HashMap<&'static str, &'static str>,
}

/// Two-column TSV keyed by upper-cased Excel function name.
///
/// When `invertible` is set the second column must be unique too, and the table can be read in
/// both directions.
#[derive(Debug)]
struct NameTable {
    data_tsv: &'static str,
    invertible: bool,
    maps: OnceLock<NameMaps>,
}

impl NameTable {
    const fn new(data_tsv: &'static str, invertible: bool) -> Self {
        Self {
            data_tsv,
            invertible,
            maps: OnceLock::new(),
        }
    }

    fn maps(&self) -> &NameMaps {
        self.maps.get_or_init(|| {
            let mut forward = HashMap::new();
            let mut reverse = HashMap::new();
            let mut key_line: HashMap<String, (usize, &'static str)> = HashMap::new();
            let mut value_line: HashMap<&'static str, (usize, &'static str)> = HashMap::new();

            for (line_no, line) in data_lines(self.data_tsv) {
                let (name, value) = line.split_once('\t').unwrap_or_else(|| {
                    panic!("invalid function table line (expected TSV) at line {line_no}: {line:?}")
                });
                let name = name.trim();
                let value = value.trim();
                if name.is_empty() || value.is_empty() {
                    panic!("invalid function table line (empty entry) at line {line_no}: {line:?}");
                }

                let key = name.to_ascii_uppercase();
                if let Some((prev_no, prev_line)) = key_line.get(&key) {
                    panic!(
                        "duplicate function table key {key:?}\n  first: line {prev_no}: {prev_line:?}\n  second: line {line_no}: {line:?}"
                    );
                }
                if self.invertible {
                    if let Some((prev_no, prev_line)) = value_line.get(value) {
                        panic!(
                            "duplicate function table value {value:?}\n  first: line {prev_no}: {prev_line:?}\n  second: line {line_no}: {line:?}"
                        );
                    }
                    value_line.insert(value, (line_no, line));
                    reverse.insert(value, name);
                }

                key_line.insert(key.clone(), (line_no, line));
                forward.insert(key, value);
            }

            NameMaps { forward, reverse }
        })
    }

    fn get(&self, name: &str) -> Option<&'static str> {
        self.maps()
            .forward
            .get(&name.to_ascii_uppercase())
            .copied()
    }

    fn reverse(&self, value: &str) -> Option<&'static str> {
        self.maps().reverse.get(value).copied()
    }
}

/// Non-blank, non-comment lines with their 1-based line numbers.
fn data_lines(data: &'static str) -> impl Iterator<Item = (usize, &'static str)> {
    data.lines()
        .enumerate()
        .map(|(idx, raw)| (idx + 1, raw.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

static FUNCTION_NAMES: FunctionNames = FunctionNames::new(include_str!("data/functions.txt"));
static FUNCTION_COMMENTS: NameTable =
    NameTable::new(include_str!("data/function-comments.tsv"), false);
static PYTHON_NAMES: NameTable = NameTable::new(include_str!("data/python-functions.tsv"), true);

/// Whether `name` is a known Excel function (case-insensitive).
pub fn is_function_name(name: &str) -> bool {
    FUNCTION_NAMES.contains(name)
}

/// Short human description for annotation comments, e.g. `SUM` → `Sum values`.
pub fn function_description(name: &str) -> Option<&'static str> {
    FUNCTION_COMMENTS.get(name)
}

/// Python-style spelling of an Excel function, e.g. `AND` → `all`.
pub fn python_name(excel_name: &str) -> Option<&'static str> {
    PYTHON_NAMES.get(excel_name)
}

/// Excel function for a Python-style spelling produced by [`python_name`] (exact match).
pub fn excel_name_for_python(python_name: &str) -> Option<&'static str> {
    PYTHON_NAMES.reverse(python_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::AssertUnwindSafe;

    fn panic_message(err: &(dyn std::any::Any + Send)) -> String {
        if let Some(msg) = err.downcast_ref::<&str>() {
            (*msg).to_string()
        } else if let Some(msg) = err.downcast_ref::<String>() {
            msg.clone()
        } else {
            "<non-string panic>".to_string()
        }
    }

    #[test]
    fn catalog_lookups_are_case_insensitive() {
        assert!(is_function_name("SUM"));
        assert!(is_function_name("xlookup"));
        assert!(is_function_name("Log10"));
        assert!(!is_function_name("TRUE"));
        assert!(!is_function_name("FALSE"));
        assert!(!is_function_name("A1"));
    }

    #[test]
    fn descriptions_cover_layout_sensitive_functions() {
        assert_eq!(function_description("sum"), Some("Sum values"));
        assert_eq!(function_description("LET"), Some("Variable assignments"));
        assert_eq!(function_description("IFS"), Some("Multiple conditions"));
        assert_eq!(function_description("RAND"), None);
    }

    #[test]
    fn python_names_map_both_ways() {
        assert_eq!(python_name("and"), Some("all"));
        assert_eq!(excel_name_for_python("all"), Some("AND"));
        assert_eq!(excel_name_for_python("ALL"), None);
        assert_eq!(python_name("VLOOKUP"), None);
    }

    #[test]
    fn every_mapped_name_is_a_catalog_function() {
        for (_, line) in data_lines(include_str!("data/python-functions.tsv")) {
            let name = line.split('\t').next().unwrap_or_default();
            assert!(is_function_name(name), "{name} missing from functions.txt");
        }
        for (_, line) in data_lines(include_str!("data/function-comments.tsv")) {
            let name = line.split('\t').next().unwrap_or_default();
            assert!(is_function_name(name), "{name} missing from functions.txt");
        }
    }

    #[test]
    fn duplicate_function_name_panics_with_diagnostics() {
        let names = FunctionNames::new("SUM\nsum\n");
        let err = std::panic::catch_unwind(AssertUnwindSafe(|| {
            names.names();
        }))
        .expect_err("expected duplicate function name to panic");

        let msg = panic_message(&*err);
        assert!(msg.contains("duplicate function name \"SUM\""));
        assert!(msg.contains("line 1"));
        assert!(msg.contains("line 2"));
    }

    #[test]
    fn duplicate_value_in_invertible_table_panics_with_diagnostics() {
        let table = NameTable::new("MAX\tbig\nLARGE\tbig\n", true);
        let err = std::panic::catch_unwind(AssertUnwindSafe(|| {
            table.maps();
        }))
        .expect_err("expected duplicate value to panic");

        let msg = panic_message(&*err);
        assert!(msg.contains("duplicate function table value \"big\""));
        assert!(msg.contains("MAX\\tbig"));
        assert!(msg.contains("LARGE\\tbig"));
    }

    #[test]
    fn non_invertible_table_allows_repeated_values() {
        let table = NameTable::new("MAX\tLargest\nLARGE\tLargest\n", false);
        assert_eq!(table.get("large"), Some("Largest"));
        assert_eq!(table.reverse("Largest"), None);
    }

    #[test]
    fn missing_tab_panics() {
        let table = NameTable::new("SUM sum\n", false);
        let err = std::panic::catch_unwind(AssertUnwindSafe(|| {
            table.maps();
        }))
        .expect_err("expected malformed line to panic");
        assert!(panic_message(&*err).contains("expected TSV"));
    }
}
