pub mod fluent_loader;
pub mod helpers;
pub mod language;
pub mod localizer;

pub use fluent_loader::FluentLoader;
pub use helpers::I18n;
pub use language::SupportedLanguage;
pub use localizer::{LocalizedString, Localizer};

use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;

/// Initialize the i18n system, reading `.ftl` overrides from `locales_dir` when given
pub fn init_i18n(locales_dir: Option<&Path>) -> Result<Localizer> {
    let mut loader = FluentLoader::new();

    for language in SupportedLanguage::all() {
        loader.load_locale(*language, locales_dir)?;
    }

    Ok(Localizer::new(loader))
}

/// Extract a dictionary of key-value pairs for client-side usage
pub fn extract_translations_for_client(
    localizer: &Localizer,
    language: SupportedLanguage,
    keys: &[&str],
) -> HashMap<String, String> {
    let mut translations = HashMap::new();

    for key in keys {
        if let Ok(translation) = localizer.get_message_with_language(&language, key, None) {
            translations.insert(key.to_string(), translation.into_string());
        }
    }

    translations
}
