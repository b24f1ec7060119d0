//! Locale code helpers

use crate::error::{Result, TranslateError};

/// Normalize a locale code by stripping region information
///
/// - `en-US` → `en`
/// - `zh-Hans` → `zh`
/// - `pt_BR` → `pt`
/// - `en` → `en` (unchanged)
pub fn normalize_locale(locale: &str) -> String {
    locale
        .split(['-', '_'])
        .next()
        .unwrap_or(locale)
        .to_lowercase()
}

/// Check that a locale code can be used as `<code>.json` inside the locales
/// directory
///
/// Accepts ASCII letters, digits, `-` and `_`. Anything else (path
/// separators, dots, whitespace) is reported with the offending character.
pub fn validate_locale(locale: &str) -> Result<()> {
    if locale.is_empty() {
        return Err(TranslateError::InvalidLocale(
            "locale code must not be empty".to_string(),
        ));
    }

    let is_allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_');
    match locale.chars().find(|&c| !is_allowed(c)) {
        Some(bad) => Err(TranslateError::InvalidLocale(format!(
            "'{}' contains {:?}, only letters, digits, '-' and '_' are allowed",
            locale, bad
        ))),
        None => Ok(()),
    }
}

const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("ar", "Arabic"),
    ("bg", "Bulgarian"),
    ("bn", "Bengali"),
    ("ca", "Catalan"),
    ("cs", "Czech"),
    ("da", "Danish"),
    ("de", "German"),
    ("el", "Greek"),
    ("en", "English"),
    ("es", "Spanish"),
    ("et", "Estonian"),
    ("fa", "Persian"),
    ("fi", "Finnish"),
    ("fr", "French"),
    ("he", "Hebrew"),
    ("hi", "Hindi"),
    ("hr", "Croatian"),
    ("hu", "Hungarian"),
    ("id", "Indonesian"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("lt", "Lithuanian"),
    ("lv", "Latvian"),
    ("ml", "Malayalam"),
    ("ms", "Malay"),
    ("nb", "Norwegian Bokmål"),
    ("nl", "Dutch"),
    ("pl", "Polish"),
    ("pt", "Portuguese"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("sk", "Slovak"),
    ("sl", "Slovenian"),
    ("sr", "Serbian"),
    ("sv", "Swedish"),
    ("ta", "Tamil"),
    ("th", "Thai"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("vi", "Vietnamese"),
    ("zh", "Chinese"),
];

/// English display name for a locale code, falling back to the code itself
///
/// Region and script subtags are ignored for the lookup, so `pt-BR` and
/// `pt` both map to "Portuguese".
pub fn language_name(locale: &str) -> String {
    let base = normalize_locale(locale);
    LANGUAGE_NAMES
        .iter()
        .find(|(code, _)| *code == base)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| locale.to_string())
}
