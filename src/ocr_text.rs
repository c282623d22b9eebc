//! Cleanup of raw OCR output before it is treated as LaTeX.

use std::sync::LazyLock;

use regex::{NoExpand, Regex};

const COMMON_REPLACEMENTS: &[(&str, &str)] = &[
  ("−", "-"),
  ("–", "-"),
  ("—", "-"),
  ("÷", "/"),
  ("×", "x"),
  ("∠", "\\angle "),
  ("°", "^\\circ"),
];

static SPACE_AFTER_ANGLE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\\angle\s+").unwrap());

/// A lone `l` or `L` is almost always a misread `1`.
static MISREAD_ONE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\b[lL]\b").unwrap());

static MATHRM_DIFFERENTIAL: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\\?mathrm\{dx\}").unwrap());

fn collapse_whitespace(text: &str) -> String {
  text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize OCR quirks: typographic dashes and operators, angle and degree
/// signs, letters misread for digits and `\mathrm{dx}` differentials.
///
/// `"∠C = 30°"` becomes `"\angleC = 30^\circ"` and `"l + O"` becomes
/// `"1 + 0"`.
pub fn clean_ocr_text(text: &str) -> String {
  let mut result = text.to_string();
  for (from, to) in COMMON_REPLACEMENTS {
    result = result.replace(from, to);
  }
  let result = SPACE_AFTER_ANGLE.replace_all(&result, NoExpand(r"\angle"));
  let result = MISREAD_ONE.replace_all(&result, "1");
  let result = result.replace('O', "0");
  let result = MATHRM_DIFFERENTIAL.replace_all(&result, " dx");
  collapse_whitespace(&result)
}
