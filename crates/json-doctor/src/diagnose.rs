//! Assembles multi-section diagnostic reports for decode failures.
//!
//! Reports are plain text, fully built before they are attached to an error,
//! and byte-for-byte reproducible for identical inputs. The failure kind
//! alone decides which sections appear.

use serde_json::{Map, Value};

use crate::coerce::UNIX_MILLIS_THRESHOLD;
use crate::context::{FailureKind, FieldContext};
use crate::describe::{actual_label, type_name, value_preview, TargetKind};
use crate::similar::{similar_keys, to_camel_case, to_pascal_case, to_snake_case};

/// First words of every field-level report. Stable, for tests and log
/// scraping.
pub const REPORT_HEADER: &str = "Failed to decode JSON field";

const RULE_WIDTH: usize = 64;

const SECTION_DIAGNOSIS: &str = "Diagnosis";
const SECTION_COMPARISON: &str = "Expected vs actual";
const SECTION_SUGGESTIONS: &str = "Suggestions";
const SECTION_REMEDIATION: &str = "How to fix";
const SECTION_TECHNICAL: &str = "Technical details";

struct Report {
    text: String,
}

impl Report {
    fn new(first_line: String) -> Self {
        Report { text: first_line }
    }

    fn section(&mut self, title: &str) {
        self.text.push_str("\n\n");
        self.text.push_str(&rule(title));
    }

    fn line(&mut self, s: &str) {
        self.text.push_str("\n  ");
        self.text.push_str(s);
    }

    fn finish(self) -> String {
        self.text
    }
}

fn rule(title: &str) -> String {
    let mut s = format!("-- {} ", title);
    let pad = RULE_WIDTH.saturating_sub(s.len());
    s.push_str(&"-".repeat(pad));
    s
}

// ---------------------------------------------------------- Failure reports

/// Report for a failure tied to a single present key.
pub(crate) fn field_report(ctx: &FieldContext, kind: FailureKind, cause: Option<&str>) -> String {
    let mut r = Report::new(format!("{} '{}'.", REPORT_HEADER, ctx.key));
    push_diagnosis(&mut r, ctx, kind);
    push_comparison(&mut r, ctx, kind);
    push_remediation(&mut r, ctx, kind);
    push_technical(&mut r, kind, cause);
    r.finish()
}

/// Report for a key that is not present at all. Includes suggestions.
pub(crate) fn missing_key_report(ctx: &FieldContext, object: &Map<String, Value>) -> String {
    let mut r = Report::new(format!("{} '{}'.", REPORT_HEADER, ctx.key));
    push_diagnosis(&mut r, ctx, FailureKind::MissingKey);
    push_suggestions(&mut r, &ctx.key, object);
    push_remediation(&mut r, ctx, FailureKind::MissingKey);
    r.finish()
}

/// Batch report for `require_keys`: every missing key at once.
pub(crate) fn required_keys_report(missing: &[&str], object: &Map<String, Value>) -> String {
    let mut r = Report::new(format!(
        "Failed to decode JSON object: {} required {} missing.",
        missing.len(),
        if missing.len() == 1 { "key is" } else { "keys are" }
    ));
    r.section("Missing keys");
    for key in missing {
        r.line(&format!("* '{}'", key));
    }
    r.section("Available keys");
    if object.is_empty() {
        r.line("(none)");
    } else {
        for key in object.keys() {
            r.line(&format!("* '{}'", key));
        }
    }
    r.section(SECTION_REMEDIATION);
    r.line("1. Compare the missing keys with the available keys; near");
    r.line("   matches usually mean a renamed or misspelled field.");
    r.line("2. Read legitimately optional keys with nullable accessors");
    r.line("   instead of listing them in require_keys.");
    r.line("3. Otherwise fix the producer to include every required key.");
    r.finish()
}

/// Report for a top-level value that is not an object.
pub(crate) fn root_not_object_report(value: &Value) -> String {
    let mut r = Report::new("Failed to decode JSON value: expected an object.".to_string());
    r.section(SECTION_COMPARISON);
    r.line("* Expected: a JSON object");
    r.line(&format!("* Actual:   {}", actual_label(value)));
    r.line(&format!("* Value:    {}", value_preview(value)));
    r.section(SECTION_REMEDIATION);
    r.line("1. Decode the top-level value with the accessor matching its");
    r.line("   actual type.");
    r.line("2. Or fix the producer to send an object.");
    r.finish()
}

// ------------------------------------------------------------- Introspection

/// Pairs every key with the runtime type of its value. Never fails.
pub(crate) fn structure_summary(object: &Map<String, Value>) -> String {
    let mut out = format!("JSON object structure ({}):", count_word(object.len(), "key"));
    if object.is_empty() {
        out.push_str("\n  (empty)");
        return out;
    }
    for (key, value) in object {
        let detail = match value {
            Value::Array(items) => format!("list ({})", count_word(items.len(), "item")),
            Value::Object(m) => format!("object ({})", count_word(m.len(), "key")),
            other => type_name(other).to_string(),
        };
        out.push_str(&format!("\n  * '{}': {}", key, detail));
    }
    out
}

/// Partitions expected keys into matched/missing and lists extras, with a
/// summary line whose counts equal the section sizes.
pub(crate) fn property_mapping_report(object: &Map<String, Value>, expected: &[&str]) -> String {
    let matched: Vec<&str> = expected
        .iter()
        .copied()
        .filter(|k| object.contains_key(*k))
        .collect();
    let missing: Vec<&str> = expected
        .iter()
        .copied()
        .filter(|k| !object.contains_key(*k))
        .collect();
    let extra: Vec<&str> = object
        .keys()
        .map(String::as_str)
        .filter(|k| !expected.contains(k))
        .collect();

    let mut r = Report::new(format!(
        "Property mapping: {} against {} in the JSON object.",
        count_word(expected.len(), "expected key"),
        count_word(object.len(), "key")
    ));
    push_name_section(&mut r, &format!("Matched ({})", matched.len()), &matched);
    push_name_section(
        &mut r,
        &format!("Missing from JSON ({})", missing.len()),
        &missing,
    );
    push_name_section(&mut r, &format!("Extra in JSON ({})", extra.len()), &extra);
    let mut text = r.finish();
    text.push_str(&format!(
        "\n\nSummary: {} matched, {} missing, {} extra.",
        matched.len(),
        missing.len(),
        extra.len()
    ));
    text
}

// ------------------------------------------------------------ Section pieces

fn push_diagnosis(r: &mut Report, ctx: &FieldContext, kind: FailureKind) {
    r.section(SECTION_DIAGNOSIS);
    r.line(&format!("* Field name:     '{}'", ctx.key));
    r.line(&format!("* Problem:        {}", kind.message()));
    let (exists, type_matches) = match kind {
        FailureKind::MissingKey => ("no", "n/a (key not found)"),
        FailureKind::NullValue => ("yes", "no (value is null)"),
        _ => ("yes", "no"),
    };
    r.line(&format!("* Exists in JSON: {}", exists));
    r.line(&format!("* Type matches:   {}", type_matches));
}

// Conversion failures only; structural failures state the actual type
// in their remediation lines instead.
fn push_comparison(r: &mut Report, ctx: &FieldContext, kind: FailureKind) {
    match kind {
        FailureKind::TypeMismatch | FailureKind::UnparsableFormat => {
            r.section(SECTION_COMPARISON);
            r.line(&format!("* Expected: {}", ctx.target_label));
            r.line(&format!("* Actual:   {}", actual_label(&ctx.raw)));
            r.line(&format!("* Value:    {}", value_preview(&ctx.raw)));
        }
        FailureKind::ListItemMismatch { index } => {
            r.section(SECTION_COMPARISON);
            r.line(&format!("* Item at index {} does not match.", index));
            r.line(&format!("* Expected: {}", ctx.target_label));
            if let Some(item) = ctx.raw.get(index) {
                r.line(&format!("* Actual:   {}", actual_label(item)));
                r.line(&format!("* Value:    {}", value_preview(item)));
            }
            r.line(&format!("* Full list: {}", value_preview(&ctx.raw)));
        }
        FailureKind::MissingKey
        | FailureKind::NullValue
        | FailureKind::NotAList
        | FailureKind::NotAnObject => {}
    }
}

fn push_suggestions(r: &mut Report, key: &str, object: &Map<String, Value>) {
    r.section(SECTION_SUGGESTIONS);
    if let Some((variant, style)) = convention_match(key, object) {
        r.line(&format!(
            "Naming convention mismatch: the object has '{}' ({})",
            variant, style
        ));
        r.line(&format!(
            "while the code asked for '{}' ({}).",
            key,
            style_of(key)
        ));
    } else {
        let candidates = similar_keys(key, object.keys().map(String::as_str));
        if candidates.is_empty() {
            r.line("No similar keys were found.");
        } else {
            r.line("Did you mean one of these?");
            for candidate in candidates {
                r.line(&format!("* '{}'", candidate));
            }
        }
    }
    r.line(&available_keys_line(object));
}

fn push_remediation(r: &mut Report, ctx: &FieldContext, kind: FailureKind) {
    r.section(SECTION_REMEDIATION);
    for line in remediation_lines(ctx, kind) {
        r.line(&line);
    }
}

fn push_technical(r: &mut Report, kind: FailureKind, cause: Option<&str>) {
    if let Some(cause) = cause {
        r.section(SECTION_TECHNICAL);
        r.line(&format!("failure class: {}", kind.name()));
        r.line(&format!("cause: {}", cause));
    }
}

fn push_name_section(r: &mut Report, title: &str, names: &[&str]) {
    r.section(title);
    if names.is_empty() {
        r.line("(none)");
    } else {
        for name in names {
            r.line(&format!("* '{}'", name));
        }
    }
}

// ----------------------------------------------------------------- Wording

fn available_keys_line(object: &Map<String, Value>) -> String {
    if object.is_empty() {
        return "Available keys: (none)".to_string();
    }
    let keys: Vec<String> = object.keys().map(|k| format!("'{}'", k)).collect();
    format!("Available keys: {}", keys.join(", "))
}

fn convention_match(key: &str, object: &Map<String, Value>) -> Option<(String, &'static str)> {
    let variants = [
        (to_snake_case(key), "snake_case"),
        (to_camel_case(key), "camelCase"),
        (to_pascal_case(key), "PascalCase"),
    ];
    for (variant, style) in variants {
        if variant != key && object.contains_key(&variant) {
            return Some((variant, style));
        }
    }
    None
}

fn style_of(key: &str) -> &'static str {
    let has_upper = key.chars().any(char::is_uppercase);
    if !has_upper {
        return "snake_case";
    }
    if key.contains('_') {
        return "mixed case";
    }
    if key.chars().next().map(char::is_uppercase).unwrap_or(false) {
        "PascalCase"
    } else {
        "camelCase"
    }
}

fn remediation_lines(ctx: &FieldContext, kind: FailureKind) -> Vec<String> {
    let key = &ctx.key;
    match kind {
        FailureKind::MissingKey => vec![
            "1. Check the spelling against the suggestions above.".to_string(),
            "2. If the key is legitimately optional, read it with a nullable".to_string(),
            format!("   accessor: {}", nullable_hint(ctx.target_kind, key)),
            format!("3. Otherwise fix the producer to include '{}'.", key),
        ],
        FailureKind::NullValue => vec![
            format!("The key '{}' exists but its value is null.", key),
            "1. If null is legal here, switch to the nullable accessor:".to_string(),
            format!("   {}", nullable_hint(ctx.target_kind, key)),
            "2. Otherwise fix the producer to send a real value.".to_string(),
        ],
        FailureKind::NotAList => vec![
            format!(
                "A list was requested but the value is {}.",
                actual_label(&ctx.raw)
            ),
            "1. If a single value is expected here, read it directly with".to_string(),
            "   the matching accessor.".to_string(),
            "2. If the producer sometimes sends one item instead of a list,".to_string(),
            "   fix it to always send a list.".to_string(),
        ],
        FailureKind::NotAnObject => vec![
            format!(
                "A nested object was requested but the value is {}.",
                actual_label(&ctx.raw)
            ),
            "1. Read the value with the accessor matching its actual type.".to_string(),
            format!("2. Or fix the producer to send an object under '{}'.", key),
        ],
        FailureKind::ListItemMismatch { index } => vec![
            format!(
                "1. Fix the item at index {} (shown above); every item must be",
                index
            ),
            format!("   {}.", ctx.target_label),
            "2. If mixed item types are expected, decode with a custom".to_string(),
            format!("   converter through get_list(\"{}\", ...).", key),
        ],
        FailureKind::TypeMismatch | FailureKind::UnparsableFormat => type_pair_lines(ctx),
    }
}

/// Remediation wording specific to the (expected, actual) type pair.
fn type_pair_lines(ctx: &FieldContext) -> Vec<String> {
    let key = &ctx.key;
    match (ctx.target_kind, &ctx.raw) {
        (TargetKind::Int, Value::String(_)) | (TargetKind::Double, Value::String(_)) => {
            let parse_ty = if ctx.target_kind == TargetKind::Int {
                "i64"
            } else {
                "f64"
            };
            vec![
                "The value is text that may contain a number.".to_string(),
                "1. Parse it after reading:".to_string(),
                format!(
                    "   let parsed = reader.get_string(\"{}\")?.parse::<{}>();",
                    key, parse_ty
                ),
                "2. Or read it through a custom converter:".to_string(),
                format!("   reader.get(\"{}\", |v| ...)", key),
                "3. Or fix the producer to emit a JSON number.".to_string(),
            ]
        }
        (TargetKind::Int, Value::Bool(_)) | (TargetKind::Double, Value::Bool(_)) => vec![
            "A boolean cannot be read as a number.".to_string(),
            format!(
                "1. If 0/1 semantics are intended, read reader.get_bool(\"{}\")",
                key
            ),
            "   and map the result to a number.".to_string(),
            "2. Or fix the producer to emit a JSON number.".to_string(),
        ],
        (TargetKind::Bool, Value::Number(_)) | (TargetKind::Bool, Value::String(_)) => vec![
            "Booleans often arrive encoded as 0/1 or text.".to_string(),
            format!(
                "1. get_bool(\"{}\") already accepts 0/1, true/false and yes/no",
                key
            ),
            "   (case-insensitive).".to_string(),
            "2. Other spellings need a custom converter through get().".to_string(),
            "3. Or fix the producer to emit a JSON boolean.".to_string(),
        ],
        (TargetKind::DateTime, Value::String(_)) => vec![
            "The text is not a recognized date/time. Accepted formats:".to_string(),
            "* ISO-8601 text, like '2024-01-15T10:30:00Z' or '2024-01-15'".to_string(),
            "* a Unix timestamp in seconds or milliseconds".to_string(),
            format!(
                "Fix the producer, or parse the custom format through get(\"{}\", ...).",
                key
            ),
        ],
        (TargetKind::DateTime, Value::Number(_)) => vec![
            "The number cannot be used as a Unix timestamp.".to_string(),
            format!(
                "* values at or above {} are read as milliseconds,",
                UNIX_MILLIS_THRESHOLD
            ),
            "  below it as seconds".to_string(),
            "* the timestamp must be a whole number in range".to_string(),
            "Fix the producer to send a timestamp in that form.".to_string(),
        ],
        (TargetKind::Str, Value::Number(_)) => vec![
            "Expected text but the value is a number.".to_string(),
            "1. Read it as a number and format it:".to_string(),
            format!("   reader.get_int(\"{}\")?.to_string()", key),
            "2. Or fix the producer to quote the value.".to_string(),
        ],
        _ => vec![
            format!("1. Check which type the producer actually sends for '{}'.", key),
            "2. Read it with the accessor matching that type, or a custom".to_string(),
            "   converter through get().".to_string(),
            "3. If the type varies between records, normalize the producer.".to_string(),
        ],
    }
}

fn nullable_hint(kind: TargetKind, key: &str) -> String {
    match kind {
        TargetKind::Int => format!("reader.get_nullable_int(\"{}\")", key),
        TargetKind::Double => format!("reader.get_nullable_double(\"{}\")", key),
        TargetKind::Bool => format!("reader.get_nullable_bool(\"{}\")", key),
        TargetKind::Str => format!("reader.get_nullable_string(\"{}\")", key),
        TargetKind::DateTime => format!("reader.get_nullable_datetime(\"{}\")", key),
        TargetKind::List => format!("reader.get_nullable_list(\"{}\", ...)", key),
        TargetKind::Object => format!("reader.get_nullable_object(\"{}\", ...)", key),
        TargetKind::Other => format!("reader.get_nullable(\"{}\", ...)", key),
    }
}

fn count_word(n: usize, word: &str) -> String {
    format!("{} {}{}", n, word, if n == 1 { "" } else { "s" })
}
