//! # Serialization Capability
//!
//! The comparator never formats values itself. It asks a [`Serializer`] for
//! either a dump-style text or a JSON document and works on the result.

use std::fmt::Debug;

use serde::Serialize;

/// Converts values into deterministic text.
///
/// `dump` must be stable for equal values: composite values should print their
/// fields in a fixed order and maps in key order. `to_json` fails when the value
/// cannot be encoded; callers treat that failure as fatal.
pub trait Serializer {
    fn dump<T: Debug + ?Sized>(&self, value: &T) -> String;

    fn to_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, serde_json::Error>;
}

/// Alternate `Debug` formatting with sorted map and set entries, and 2-space
/// pretty JSON.
///
/// Struct fields keep declaration order and sequences keep their order. Every
/// brace block that is not a named struct (`HashMap`, `HashSet`, `BTreeMap`,
/// ...) has its entries sorted by their printed text, so hash-ordered
/// collections dump identically across instances and runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrettyDebug;

impl Serializer for PrettyDebug {
    fn dump<T: Debug + ?Sized>(&self, value: &T) -> String {
        let pretty = format!("{:#?}", value);
        let lines: Vec<&str> = pretty.lines().collect();
        let mut out = sort_entries(&lines).join("\n");
        out.push('\n');
        out
    }

    fn to_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(value)
    }
}

// ============================================================================
// KEY SORTING
// ============================================================================

/// Pretty `Debug` indents one level per nesting depth.
const INDENT: usize = 4;

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// A bare `{` opens a map or set; `Name {` opens a struct.
fn opens_unordered(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed == "{" || trimmed.ends_with(": {")
}

fn closes_block(line: &str) -> bool {
    line.trim_start().starts_with(['}', ']', ')'])
}

/// Rewrites pretty `Debug` lines with every unordered block's entries sorted,
/// innermost blocks first.
fn sort_entries(lines: &[&str]) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        out.push(line.to_string());
        i += 1;

        if !opens_unordered(line) {
            continue;
        }
        let depth = indent_of(line);
        let Some(close) = lines[i..]
            .iter()
            .position(|l| indent_of(l) == depth && l.trim_start().starts_with('}'))
            .map(|offset| i + offset)
        else {
            continue;
        };

        let mut entries: Vec<Vec<String>> = Vec::new();
        let mut start = i;
        for at in i..=close {
            let boundary = at == close
                || (at > start && indent_of(lines[at]) == depth + INDENT && !closes_block(lines[at]));
            if boundary {
                if at > start {
                    entries.push(sort_entries(&lines[start..at]));
                }
                start = at;
            }
        }
        entries.sort();
        out.extend(entries.into_iter().flatten());
        out.push(lines[close].to_string());
        i = close + 1;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashMap, HashSet};

    #[allow(dead_code)]
    #[derive(Debug)]
    struct Inventory {
        owner: &'static str,
        items: HashMap<&'static str, u32>,
        tags: Vec<&'static str>,
    }

    #[test]
    fn test_hash_map_dump_is_key_sorted() {
        let map: HashMap<&str, i32> = [("delta", 4), ("alpha", 1), ("charlie", 3), ("bravo", 2)]
            .into_iter()
            .collect();
        assert_eq!(
            PrettyDebug.dump(&map),
            "{\n    \"alpha\": 1,\n    \"bravo\": 2,\n    \"charlie\": 3,\n    \"delta\": 4,\n}\n"
        );
    }

    #[test]
    fn test_struct_fields_and_sequences_keep_order() {
        let value = Inventory {
            owner: "zed",
            items: [("rope", 2), ("axe", 1)].into_iter().collect(),
            tags: vec!["z", "a"],
        };
        assert_eq!(
            PrettyDebug.dump(&value),
            "Inventory {\n    owner: \"zed\",\n    items: {\n        \"axe\": 1,\n        \"rope\": 2,\n    },\n    tags: [\n        \"z\",\n        \"a\",\n    ],\n}\n"
        );
    }

    #[test]
    fn test_nested_maps_sort_at_every_level() {
        let mut inner_b = HashMap::new();
        inner_b.insert("y", 2);
        inner_b.insert("x", 1);
        let mut outer = HashMap::new();
        outer.insert("b", inner_b);
        outer.insert("a", HashMap::from([("k", 0)]));

        assert_eq!(
            PrettyDebug.dump(&outer),
            "{\n    \"a\": {\n        \"k\": 0,\n    },\n    \"b\": {\n        \"x\": 1,\n        \"y\": 2,\n    },\n}\n"
        );
    }

    #[test]
    fn test_set_of_structs_is_sorted_by_text() {
        #[derive(Debug, PartialEq, Eq, Hash)]
        struct Point(i32, i32);

        let set: HashSet<Point> = [Point(2, 0), Point(1, 5)].into_iter().collect();
        assert_eq!(
            PrettyDebug.dump(&set),
            "{\n    Point(\n        1,\n        5,\n    ),\n    Point(\n        2,\n        0,\n    ),\n}\n"
        );
    }

    #[test]
    fn test_empty_map_and_scalars_are_untouched() {
        assert_eq!(PrettyDebug.dump(&BTreeMap::<i32, i32>::new()), "{}\n");
        assert_eq!(PrettyDebug.dump(&42), "42\n");
    }
}
