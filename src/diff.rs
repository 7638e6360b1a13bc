//! # Unified Diffs
//!
//! The [`Differ`] capability turns two texts into a unified diff. The default
//! [`LineDiffer`] takes the line-level edit script from `difference` and groups
//! it into `@@` hunks with a fixed amount of surrounding context.

use std::fmt::Write as _;

use difference::{Changeset, Difference};

/// Labels and context width for a rendered diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffOptions {
    pub from_label: String,
    pub to_label: String,
    pub context: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            from_label: "Expected".to_string(),
            to_label: "Reported".to_string(),
            context: 3,
        }
    }
}

/// Computes a unified diff. Returns an empty string when the inputs are equal.
pub trait Differ {
    fn unified_diff(&self, expected: &str, reported: &str, options: &DiffOptions) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LineDiffer;

impl Differ for LineDiffer {
    fn unified_diff(&self, expected: &str, reported: &str, options: &DiffOptions) -> String {
        if expected == reported {
            return String::new();
        }
        let lines = edit_script(expected, reported);
        render(&lines, options)
    }
}

// ============================================================================
// EDIT SCRIPT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Equal,
    Delete,
    Insert,
}

#[derive(Debug, Clone, Copy)]
struct DiffLine<'a> {
    tag: Tag,
    text: &'a str,
    /// False only for a final line with no trailing newline.
    terminated: bool,
}

/// One side of the diff, split the same way `Changeset` splits it: an empty
/// text has no items, otherwise every `\n` separates two items.
struct Side<'a> {
    items: Vec<&'a str>,
}

impl<'a> Side<'a> {
    fn new(text: &'a str) -> Self {
        let items = if text.is_empty() {
            Vec::new()
        } else {
            text.split('\n').collect()
        };
        Self { items }
    }

    fn is_last(&self, index: usize) -> bool {
        index + 1 == self.items.len()
    }

    /// The empty item after a trailing newline is not a line.
    fn is_phantom(&self, index: usize) -> bool {
        self.is_last(index) && self.items[index].is_empty()
    }

    fn line(&self, tag: Tag, index: usize) -> Option<DiffLine<'a>> {
        if index >= self.items.len() || self.is_phantom(index) {
            return None;
        }
        Some(DiffLine {
            tag,
            text: self.items[index],
            terminated: !self.is_last(index),
        })
    }
}

fn edit_script<'a>(expected: &'a str, reported: &'a str) -> Vec<DiffLine<'a>> {
    let old = Side::new(expected);
    let new = Side::new(reported);
    let changeset = Changeset::new(expected, reported, "\n");

    let mut lines = Vec::new();
    let (mut i, mut j) = (0, 0);

    for chunk in &changeset.diffs {
        match chunk {
            Difference::Same(text) => {
                for _ in text.split('\n') {
                    let removed = old.line(Tag::Delete, i);
                    let added = new.line(Tag::Insert, j);
                    match (removed, added) {
                        (Some(a), Some(b)) if a.terminated == b.terminated => {
                            lines.push(DiffLine { tag: Tag::Equal, ..a });
                        }
                        (a, b) => lines.extend(a.into_iter().chain(b)),
                    }
                    i += 1;
                    j += 1;
                }
            }
            Difference::Rem(text) => {
                for _ in text.split('\n') {
                    lines.extend(old.line(Tag::Delete, i));
                    i += 1;
                }
            }
            Difference::Add(text) => {
                for _ in text.split('\n') {
                    lines.extend(new.line(Tag::Insert, j));
                    j += 1;
                }
            }
        }
    }

    order_changes(&mut lines);
    lines
}

/// Within each run of changed lines, removals come before additions.
fn order_changes(lines: &mut [DiffLine<'_>]) {
    let mut start = 0;
    while start < lines.len() {
        if lines[start].tag == Tag::Equal {
            start += 1;
            continue;
        }
        let end = lines[start..]
            .iter()
            .position(|line| line.tag == Tag::Equal)
            .map_or(lines.len(), |offset| start + offset);
        // Stable sort keeps each side in its original order.
        lines[start..end].sort_by_key(|line| line.tag == Tag::Insert);
        start = end;
    }
}

// ============================================================================
// RENDERING
// ============================================================================

struct Hunk {
    start: usize,
    end: usize,
}

fn group_hunks(lines: &[DiffLine<'_>], context: usize) -> Vec<Hunk> {
    let changes: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.tag != Tag::Equal)
        .map(|(index, _)| index)
        .collect();

    let mut hunks = Vec::new();
    let Some((&first, rest)) = changes.split_first() else {
        return hunks;
    };

    let mut start = first.saturating_sub(context);
    let mut previous = first;
    for &change in rest {
        if change - previous - 1 > 2 * context {
            hunks.push(Hunk {
                start,
                end: (previous + context + 1).min(lines.len()),
            });
            start = change - context;
        }
        previous = change;
    }
    hunks.push(Hunk {
        start,
        end: (previous + context + 1).min(lines.len()),
    });
    hunks
}

fn format_range(start: usize, length: usize) -> String {
    match length {
        0 => format!("{},0", start),
        1 => format!("{}", start + 1),
        _ => format!("{},{}", start + 1, length),
    }
}

fn render(lines: &[DiffLine<'_>], options: &DiffOptions) -> String {
    let hunks = group_hunks(lines, options.context);
    if hunks.is_empty() {
        return String::new();
    }

    // Line offsets on each side at every position of the edit script.
    let mut offsets = Vec::with_capacity(lines.len() + 1);
    let (mut old_at, mut new_at) = (0, 0);
    for line in lines {
        offsets.push((old_at, new_at));
        match line.tag {
            Tag::Equal => {
                old_at += 1;
                new_at += 1;
            }
            Tag::Delete => old_at += 1,
            Tag::Insert => new_at += 1,
        }
    }
    offsets.push((old_at, new_at));

    let mut out = String::new();
    let _ = writeln!(out, "--- {}", options.from_label);
    let _ = writeln!(out, "+++ {}", options.to_label);

    for hunk in hunks {
        let body = &lines[hunk.start..hunk.end];
        let (old_start, new_start) = offsets[hunk.start];
        let old_len = body.iter().filter(|l| l.tag != Tag::Insert).count();
        let new_len = body.iter().filter(|l| l.tag != Tag::Delete).count();
        let _ = writeln!(
            out,
            "@@ -{} +{} @@",
            format_range(old_start, old_len),
            format_range(new_start, new_len)
        );

        for line in body {
            let prefix = match line.tag {
                Tag::Equal => ' ',
                Tag::Delete => '-',
                Tag::Insert => '+',
            };
            let _ = writeln!(out, "{}{}", prefix, line.text);
            if !line.terminated {
                out.push_str("\\ No newline at end of file\n");
            }
        }
    }
    out
}
