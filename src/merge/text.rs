//! Line-set union for plain text.

use std::collections::HashSet;

/// Append the lines of `incoming` that `base` lacks.
///
/// Existing lines are never removed or reordered. New lines keep their order
/// from `incoming` and each is added once. A non-empty `base` that doesn't
/// already end with a blank line gets one blank separator first, and the
/// result ends with a single newline. When nothing is new, `base` is returned
/// untouched.
pub fn merge_lines(base: &str, incoming: &str) -> String {
    let existing: HashSet<&str> = base.lines().collect();
    let mut seen = HashSet::new();
    let added: Vec<&str> = incoming
        .lines()
        .filter(|line| !existing.contains(line) && seen.insert(*line))
        .collect();

    if added.is_empty() {
        return base.to_string();
    }

    let mut lines: Vec<&str> = base.lines().collect();
    if lines.last().is_some_and(|last| !last.is_empty()) {
        lines.push("");
    }
    lines.extend(added);

    let mut merged = lines.join("\n");
    merged.push('\n');
    merged
}
