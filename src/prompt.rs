//! Prompt templates for full and delta translation
//!
//! Both templates assume the provider attaches the current target locale file
//! separately; only the diff is embedded in the prompt text.

use crate::config::OutputMode;
use crate::locale::language_name;

/// Build the prompt for `mode`, resolving the language name from the code
pub fn build_prompt(mode: OutputMode, diff: &str, locale_code: &str) -> String {
    let name = language_name(locale_code);
    match mode {
        OutputMode::Full => full_prompt(diff, locale_code, &name),
        OutputMode::Delta => delta_prompt(diff, locale_code, &name),
    }
}

/// Ask for the complete updated locale file
pub fn full_prompt(diff: &str, locale_code: &str, language: &str) -> String {
    format!(
        r#"You are an expert translator of user interface text for web and mobile applications, familiar with i18n JSON locale files.

You receive two inputs:
1. A git diff of the English source locale file showing added or changed strings.
2. The current {language} locale file ({locale_code}.json), attached separately. It may be empty if the locale is new.

Translate the added and changed English strings from the diff into {language} ({locale_code}) and apply them to the attached {locale_code}.json. Return the whole updated file.

Git diff of the source locale file:
```diff
{diff}
```

Rules:
1. Find the keys that the diff adds or modifies. Ignore removed lines.
2. Translate only the values of those keys into {language}.
3. Every key that is not in the diff must keep exactly the value it has in the attached {locale_code}.json. Do not re-translate, reorder or drop existing keys.
4. Add new keys next to related keys, or in the order they appear in the diff.
5. Match the style, tone and terminology of the existing {language} translations.
6. Never translate keys. Keep placeholders such as {{{{variable}}}}, %s or <tag> exactly as written.
7. Keep the nesting structure of the source file.
8. Respond with a single valid JSON object representing the complete {locale_code}.json and nothing else: no markdown fences, no commentary.

Example response shape:
{{
  "existingKey": "existing translation",
  "changedOrAddedKey": "new translation"
}}
"#
    )
}

/// Ask for only the added or changed keys
pub fn delta_prompt(diff: &str, locale_code: &str, language: &str) -> String {
    format!(
        r#"You are an expert translator of user interface text for web and mobile applications, familiar with i18n JSON locale files.

You receive two inputs:
1. A git diff of the English source locale file showing added or changed strings.
2. The current {language} locale file ({locale_code}.json), attached separately for style and terminology reference only.

Translate only the added and changed English strings from the diff into {language} ({locale_code}). Return a JSON object that contains ONLY those keys with their {language} translations, not the whole file.

Git diff of the source locale file:
```diff
{diff}
```

Rules:
1. Find the keys that the diff adds or modifies. Ignore removed lines.
2. Translate only those keys into {language}.
3. Do not include unchanged or deleted keys.
4. Keep the nesting of the source file: a changed nested key is returned inside its parent objects.
5. Never translate keys. Keep placeholders such as {{{{variable}}}}, %s or <tag> exactly as written.
6. Respond with a single valid JSON object and nothing else: no markdown fences, no commentary.

Example response shape:
{{
  "new.or.changed.key": "translated value"
}}
"#
    )
}
