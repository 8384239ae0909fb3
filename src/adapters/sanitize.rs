//! Log sanitization for clinical data.
//!
//! Patient vitals must never reach the log file. This module redacts:
//! - Clinical key/value pairs (`age=45`, `chol: 210`, `sex: Male`)
//! - Encoded feature vectors (`[45.0, 1.0, 0.0, ...]`)
//! - Identifiers that may be pasted into free text (UUIDs, emails, MRNs)
//!
//! `SanitizingMakeWriter` applies this to every formatted log line, so
//! callsites do not need to remember to sanitize. Prefer not logging
//! observations at all; this is the fallback.
//!
//! Input is capped (see `HEARTCARE_SANITIZE_MAX_BYTES`) to bound the cost of
//! scanning very long lines.

use regex::{Regex, RegexSet};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

static PATTERNS: OnceLock<RedactionPatterns> = OnceLock::new();

/// Default per-call cap, 16 KiB.
const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

/// Field names of the clinical observation, both wire codes and Rust names.
const CLINICAL_KEYS: &str = "age|sex|cp|chest_pain|trestbps|resting_bp|chol|cholesterol|fbs|fasting_sugar_elevated|restecg|resting_ecg|thalach|max_heart_rate|exang|exercise_angina|oldpeak|st_depression|slope|ca|vessels|thal";

struct RedactionPattern {
    regex: Regex,
    replacement: &'static str,
}

struct RedactionPatterns {
    set: RegexSet,
    patterns: Vec<RedactionPattern>,
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }

    let mut end = max_bytes.min(input.len());
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

fn max_sanitize_bytes() -> usize {
    std::env::var("HEARTCARE_SANITIZE_MAX_BYTES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_SANITIZE_MAX_BYTES)
}

fn get_patterns() -> &'static RedactionPatterns {
    PATTERNS.get_or_init(|| {
        let clinical = format!(
            r"\b(?P<key>{CLINICAL_KEYS})\b\s*[:=]\s*(?:-?\d+(?:\.\d+)?|true|false|[A-Z][A-Za-z]*)"
        );

        let rules: Vec<(String, &'static str)> = vec![
            (clinical, "${key}=[REDACTED]"),
            // Five or more comma-separated numbers in brackets
            (
                r"\[\s*-?\d+(?:\.\d+)?(?:\s*,\s*-?\d+(?:\.\d+)?){4,}\s*\]".to_string(),
                "[REDACTED-FEATURES]",
            ),
            (
                r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}"
                    .to_string(),
                "[REDACTED-UUID]",
            ),
            (r"\bMRN[:\s]?\d{6,10}\b".to_string(), "[REDACTED-MRN]"),
            (
                r"(?i)\b[a-z0-9](?:[a-z0-9._%+-]{0,62}[a-z0-9])?@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b"
                    .to_string(),
                "[REDACTED-EMAIL]",
            ),
        ];

        let set = RegexSet::new(rules.iter().map(|(p, _)| p.as_str())).expect("Valid regex set");
        let patterns = rules
            .into_iter()
            .map(|(pattern, replacement)| RedactionPattern {
                regex: Regex::new(&pattern).expect("Valid regex"),
                replacement,
            })
            .collect();

        RedactionPatterns { set, patterns }
    })
}

/// Redact clinical values and identifiers from `input`.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, max_sanitize_bytes())
}

fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let patterns = get_patterns();
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    let mut result = prefix.to_string();
    for idx in patterns.set.matches(prefix).into_iter() {
        let pattern = &patterns.patterns[idx];
        result = pattern
            .regex
            .replace_all(&result, pattern.replacement)
            .into_owned();
    }

    if truncated {
        result.push_str(" [TRUNCATED]");
    }
    result
}

/// Check whether `input` contains anything `sanitize` would redact.
#[must_use]
pub fn contains_clinical_data(input: &str) -> bool {
    let (prefix, _) = truncate_to_char_boundary(input, max_sanitize_bytes());
    get_patterns().set.is_match(prefix)
}

/// A `tracing_subscriber` writer wrapper that sanitizes each formatted log
/// line before it reaches the underlying sink.
#[derive(Debug, Clone)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

pub struct SanitizingWriter<W> {
    inner: W,
    buffer: Vec<u8>,
}

impl<W> SanitizingWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
        }
    }
}

impl<W> SanitizingWriter<W>
where
    W: std::io::Write,
{
    fn flush_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line = self.buffer.drain(..=pos).collect::<Vec<u8>>();
            let sanitized = sanitize(&String::from_utf8_lossy(&line));
            self.inner.write_all(sanitized.as_bytes())?;
        }
        Ok(())
    }
}

impl<W> std::io::Write for SanitizingWriter<W>
where
    W: std::io::Write,
{
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        // A single line without newline must not grow the buffer unbounded.
        let hard_cap = max_sanitize_bytes().saturating_mul(2);
        if self.buffer.len() > hard_cap {
            let sanitized = sanitize(&String::from_utf8_lossy(&self.buffer));
            self.inner.write_all(sanitized.as_bytes())?;
            self.inner.write_all(b"\n")?;
            self.buffer.clear();
            return Ok(buf.len());
        }

        self.flush_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_lines()?;

        if !self.buffer.is_empty() {
            let sanitized = sanitize(&String::from_utf8_lossy(&self.buffer));
            self.inner.write_all(sanitized.as_bytes())?;
            self.buffer.clear();
        }

        self.inner.flush()
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter::new(self.inner.make_writer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_sanitize_clinical_pairs() {
        let sanitized = sanitize("submitted age=45 chol: 210 oldpeak=1.2");
        assert!(!sanitized.contains("45"));
        assert!(!sanitized.contains("210"));
        assert!(!sanitized.contains("1.2"));
        assert!(sanitized.contains("age=[REDACTED]"));
        assert!(sanitized.contains("chol=[REDACTED]"));
    }

    #[test]
    fn test_sanitize_debug_formatted_observation() {
        let obs = crate::domain::ClinicalObservation::default();
        let sanitized = sanitize(&format!("{obs:?}"));
        assert!(sanitized.contains("sex=[REDACTED]"));
        assert!(sanitized.contains("max_heart_rate=[REDACTED]"));
        assert!(!sanitized.contains("155"));
        assert!(!sanitized.contains("Male"));
    }

    #[test]
    fn test_sanitize_feature_vector() {
        let v = crate::domain::ClinicalObservation::default().to_feature_vector();
        let sanitized = sanitize(&format!("features {v:?}"));
        assert!(sanitized.contains("[REDACTED-FEATURES]"));
        assert!(!sanitized.contains("155.0"));
    }

    #[test]
    fn test_plain_text_is_untouched() {
        let input = "Analysis complete: category=STABLE in 12ms";
        assert!(!contains_clinical_data("Analysis complete in 12ms"));
        assert_eq!(sanitize("Loaded model (3 entries)"), "Loaded model (3 entries)");
        // "category" is not a clinical key even though it ends in "ca".
        assert!(sanitize(input).contains("category=STABLE"));
    }

    #[test]
    fn test_sanitize_identifiers() {
        let sanitized = sanitize("patient 550e8400-e29b-41d4-a716-446655440000 MRN:12345678");
        assert!(sanitized.contains("[REDACTED-UUID]"));
        assert!(sanitized.contains("[REDACTED-MRN]"));

        assert!(sanitize("contact doctor@clinic.org").contains("[REDACTED-EMAIL]"));
    }

    #[test]
    fn test_sanitize_truncates_large_inputs() {
        let sanitized = sanitize_with_limit("age=45 and a very long tail", 6);
        assert!(sanitized.ends_with("[TRUNCATED]"));
    }

    #[test]
    fn test_writer_sanitizes_each_line() {
        let mut out = Vec::new();
        {
            let mut writer = SanitizingWriter::new(&mut out);
            writer.write_all(b"first thalach=150\nsecond ").expect("write");
            writer.write_all(b"trestbps=130\n").expect("write");
            writer.flush().expect("flush");
        }
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(
            text,
            "first thalach=[REDACTED]\nsecond trestbps=[REDACTED]\n"
        );
    }
}
