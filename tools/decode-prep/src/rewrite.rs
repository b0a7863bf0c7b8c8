//! The source edits: companion attributes and include directives.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{debug, info};
use walkdir::WalkDir;

const MARKER_DERIVE: &str = "DecodeObject";
const COMPANION_ATTRIBUTE: &str = "#[decode_object(generated)]";

/// Suffixes of generated-output files that must never be rewritten.
const GENERATED_SUFFIXES: &[&str] = &["_decoders.rs", ".gen.rs"];

/// Options for one rewrite run, built from CLI arguments.
#[derive(Debug, Clone)]
pub struct PrepOptions {
    pub root: PathBuf,
    pub target: PathBuf,
    pub dry_run: bool,
    pub verbose: bool,
}

/// Which of the two edits were applied to one file. Paths are relative to
/// the run's root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChanges {
    pub path: PathBuf,
    pub attribute_inserted: bool,
    pub include_inserted: bool,
}

/// Outcome of a whole run.
#[derive(Debug, Default)]
pub struct PrepReport {
    pub changed: Vec<FileChanges>,
    pub skipped: Vec<PathBuf>,
    pub scanned: usize,
}

struct CompanionScan {
    text: String,
    matches: usize,
    inserted: usize,
}

/// Walks the target tree and applies both edits to every marked file.
pub fn run(options: &PrepOptions) -> Result<PrepReport> {
    if options.target.is_absolute() {
        bail!(
            "target must be a subdirectory relative to the root, got {}",
            options.target.display()
        );
    }
    let scan_root = options.root.join(&options.target);

    let mut report = PrepReport::default();
    for entry in WalkDir::new(&scan_root).follow_links(false).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walk {}", scan_root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("rs") {
            continue;
        }
        let rel = path
            .strip_prefix(&options.root)
            .unwrap_or(path)
            .to_path_buf();
        if is_generated_output(path) {
            debug!(path = ?rel, "skipping generated output");
            report.skipped.push(rel);
            continue;
        }
        report.scanned += 1;

        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            report.skipped.push(rel);
            continue;
        };
        let directive = format!("include!(\"{}_decoders.rs\");", stem);

        let source =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let Some((text, attribute_inserted, include_inserted)) =
            rewrite_source(&source, &directive)
        else {
            continue;
        };
        if !attribute_inserted && !include_inserted {
            debug!(path = ?rel, "already prepared");
            continue;
        }
        if !options.dry_run {
            fs::write(path, &text).with_context(|| format!("write {}", path.display()))?;
        }
        info!(
            path = ?rel,
            attribute_inserted,
            include_inserted,
            dry_run = options.dry_run,
            "prepared file"
        );
        report.changed.push(FileChanges {
            path: rel,
            attribute_inserted,
            include_inserted,
        });
    }
    Ok(report)
}

fn is_generated_output(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    GENERATED_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Applies both edits to one file's text. `None` when the file has no
/// marker preceding a type declaration; otherwise the rewritten text plus
/// which edits were needed.
fn rewrite_source(source: &str, include_directive: &str) -> Option<(String, bool, bool)> {
    let scan = insert_companions(source);
    if scan.matches == 0 {
        return None;
    }
    let mut text = scan.text;
    let include_inserted = !text.contains(include_directive);
    if include_inserted {
        append_include(&mut text, include_directive);
    }
    Some((text, scan.inserted > 0, include_inserted))
}

/// Inserts the companion attribute after every marker that precedes a type
/// declaration and does not already carry one.
fn insert_companions(source: &str) -> CompanionScan {
    let lines: Vec<&str> = source.lines().collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut matches = 0;
    let mut inserted = 0;

    for (i, line) in lines.iter().enumerate() {
        out.push((*line).to_string());
        if !is_marker(line) {
            continue;
        }
        let Some(decl) = following_type_declaration(&lines, i) else {
            continue;
        };
        matches += 1;
        let companion_present = lines[i + 1..=decl]
            .iter()
            .any(|l| l.trim_start().starts_with("#[decode_object"));
        if !companion_present {
            let indent = &line[..line.len() - line.trim_start().len()];
            out.push(format!("{}{}", indent, COMPANION_ATTRIBUTE));
            inserted += 1;
        }
    }

    let mut text = out.join("\n");
    if source.ends_with('\n') {
        text.push('\n');
    }
    CompanionScan {
        text,
        matches,
        inserted,
    }
}

/// A single-line derive attribute whose list names the marker derive.
fn is_marker(line: &str) -> bool {
    let trimmed = line.trim_start();
    let Some(list) = trimmed.strip_prefix("#[derive(") else {
        return false;
    };
    let list = list.split(')').next().unwrap_or(list);
    list.split(',').any(|name| name.trim() == MARKER_DERIVE)
}

/// Index of the type declaration following `marker`, if the lines between
/// are only attributes, doc comments or blanks.
fn following_type_declaration(lines: &[&str], marker: usize) -> Option<usize> {
    for (offset, line) in lines[marker + 1..].iter().enumerate() {
        if is_type_declaration(line) {
            return Some(marker + 1 + offset);
        }
        let trimmed = line.trim_start();
        let between = trimmed.is_empty() || trimmed.starts_with("#[") || trimmed.starts_with("//");
        if !between {
            return None;
        }
    }
    None
}

fn is_type_declaration(line: &str) -> bool {
    let mut rest = line.trim_start();
    if let Some(stripped) = rest.strip_prefix("pub") {
        rest = stripped.trim_start();
        if let Some(after) = rest.strip_prefix('(') {
            match after.find(')') {
                Some(end) => rest = after[end + 1..].trim_start(),
                None => return false,
            }
        }
    }
    rest.starts_with("struct ") || rest.starts_with("enum ")
}

fn append_include(source: &mut String, directive: &str) {
    if !source.ends_with('\n') {
        source.push('\n');
    }
    source.push('\n');
    source.push_str(directive);
    source.push('\n');
}
