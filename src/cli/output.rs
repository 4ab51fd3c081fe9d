//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically. Everything that
//! needs a numeric value from a fraction skips degenerate ones (`n/0`) and
//! logs the skip.

use colored::Colorize;
use generational_arena::Index;
use itertools::Itertools;
use serde::Serialize;
use termtree::Tree;
use tracing::debug;

use crate::cli::CliResult;
use crate::domain::{
    level_entries, ContinuedFraction, Convergent, ConvergentEntry, Fraction, MediantArena,
    TreeLevel, UnitySplit, Vector,
};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// Print a value as pretty JSON.
pub fn json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| crate::cli::CliError::InvalidArgs(format!("cannot render JSON: {}", e)))?;
    info(&rendered);
    Ok(())
}

/// `n/d` for 2-D vectors, the tuple form otherwise.
pub fn format_vector(vector: &Vector) -> String {
    match Fraction::try_from(vector) {
        Ok(fraction) => fraction.to_string(),
        Err(_) => vector.to_string(),
    }
}

pub fn format_level(level: &TreeLevel) -> String {
    level.iter().map(format_vector).join(", ")
}

pub fn print_levels(levels: &[TreeLevel]) {
    for level in levels {
        header(&format!("Level {} ({} vectors)", level.generation, level.len()));
        detail(&format_level(level));
    }
}

pub fn print_levels_json(levels: &[TreeLevel]) -> CliResult<()> {
    json(&level_entries(levels))
}

/// Ratios of every non-degenerate fraction, for the JSON split output.
#[derive(Debug, Serialize)]
struct SplitEntry {
    level: usize,
    side: &'static str,
    fraction: String,
    value: f64,
}

fn split_entries(levels: &[TreeLevel], side: &'static str) -> Vec<SplitEntry> {
    let mut entries = Vec::new();
    for level in levels {
        for vector in level.iter() {
            let Ok(fraction) = Fraction::try_from(vector) else {
                continue;
            };
            match fraction.to_f64() {
                Ok(value) => entries.push(SplitEntry {
                    level: level.generation,
                    side,
                    fraction: fraction.to_string(),
                    value,
                }),
                Err(e) => debug!("skipping {}: {}", fraction, e),
            }
        }
    }
    entries
}

pub fn print_split(split: &UnitySplit) {
    header("Below 1");
    for level in &split.below {
        detail(&format!("{}: {}", level.generation, format_level(level)));
    }
    header("Above 1");
    for level in &split.above {
        detail(&format!("{}: {}", level.generation, format_level(level)));
    }
}

pub fn print_split_json(split: &UnitySplit) -> CliResult<()> {
    let mut entries = split_entries(&split.below, "below");
    entries.extend(split_entries(&split.above, "above"));
    json(&entries)
}

/// Parent/child structure of the arena as an indented tree.
pub fn structure_tree(tree: &MediantArena) -> Tree<String> {
    fn build(tree: &MediantArena, idx: Index) -> Tree<String> {
        let Some(node) = tree.get(idx) else {
            return Tree::new("?".to_string());
        };
        Tree::new(format_vector(&node.vector))
            .with_leaves(node.children.iter().map(|&c| build(tree, c)))
    }

    let mut root = Tree::new("mediants".to_string());
    for &idx in tree.roots() {
        root.push(build(tree, idx));
    }
    root
}

pub fn print_structure(tree: &MediantArena) {
    if tree.roots().is_empty() {
        info("Empty tree");
    } else {
        info(&structure_tree(tree));
    }
}

pub fn print_cf(label: &str, cf: &ContinuedFraction) {
    println!("{} = {}", label.cyan(), cf);
}

pub fn print_convergents(convergents: &[Convergent]) {
    for c in convergents {
        detail(&format!(
            "{:>3}  {:>24}  {:.15}",
            c.index,
            c.value.to_string(),
            c.to_f64()
        ));
    }
}

#[derive(Debug, Serialize)]
struct CfReport<'a> {
    label: String,
    terms: &'a ContinuedFraction,
    #[serde(skip_serializing_if = "Option::is_none")]
    convergents: Option<Vec<ConvergentEntry>>,
}

/// JSON rows `{label, terms, convergents?}` for one or more expansions.
pub fn print_cf_json(reports: &[(String, &ContinuedFraction, Option<&[Convergent]>)]) -> CliResult<()> {
    let rows: Vec<CfReport<'_>> = reports
        .iter()
        .map(|(label, cf, convergents)| CfReport {
            label: label.clone(),
            terms: cf,
            convergents: convergents.map(|cs| cs.iter().map(ConvergentEntry::from).collect()),
        })
        .collect();
    json(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{generate_levels, split_at_unity, stern_brocot_basis};
    use rstest::rstest;

    #[rstest]
    #[case(Vector::from((2, 3)), "2/3")]
    #[case(Vector::new(vec![1, 2, 3]), "(1, 2, 3)")]
    fn test_format_vector(#[case] vector: Vector, #[case] expected: &str) {
        assert_eq!(format_vector(&vector), expected);
    }

    #[rstest]
    fn test_structure_tree_renders_children() {
        let tree = MediantArena::grow(&stern_brocot_basis(), 2, 2).unwrap();
        let rendered = structure_tree(&tree).to_string();
        assert!(rendered.starts_with("mediants"));
        for label in ["1/1", "1/2", "2/1"] {
            assert!(rendered.contains(label), "missing {} in {}", label, rendered);
        }
    }

    #[rstest]
    fn test_split_entries_skip_degenerate() {
        let levels = generate_levels(&stern_brocot_basis(), 1, 2).unwrap();
        let split = split_at_unity(&levels).unwrap();
        let above = split_entries(&split.above, "above");
        // 1/0 sits above 1 but has no value
        assert!(above.is_empty());
        let below = split_entries(&split.below, "below");
        assert_eq!(below.len(), 2);
        assert!(below.iter().all(|e| e.fraction == "0/1"));
    }
}
