use std::sync::OnceLock;

use regex::Regex;

use super::model::{RunKey, Variant};
use crate::error::ReportError;

/// Tags in scan order: longest first, canonical order on ties, so a tag that
/// happens to be a substring of another can never shadow it.
const SCAN_ORDER: [Variant; 3] = [Variant::Compressed, Variant::Sketch, Variant::Plain];

fn digit_runs() -> &'static Regex {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    DIGITS.get_or_init(|| Regex::new(r"[0-9]+").expect("digit-run pattern is valid"))
}

/// Identify the structure variant named in a filename (case-insensitive).
pub fn detect_variant(filename: &str) -> Option<Variant> {
    let lower = filename.to_lowercase();
    SCAN_ORDER
        .into_iter()
        .find(|variant| lower.contains(variant.tag()))
}

/// The K parameter of a filename: the *last* maximal ASCII digit run.
///
/// `exp3_sketch_21mers.csv` yields 21, not 3.
pub fn extract_parameter(filename: &str) -> Result<u32, ReportError> {
    digit_runs()
        .find_iter(filename)
        .last()
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .ok_or_else(|| ReportError::not_recognized(filename))
}

/// Recover the run key (variant, K) from a result filename.
pub fn extract(filename: &str) -> Result<RunKey, ReportError> {
    let variant = detect_variant(filename).ok_or_else(|| ReportError::not_recognized(filename))?;
    let parameter = extract_parameter(filename)?;
    Ok(RunKey::new(variant, parameter))
}
