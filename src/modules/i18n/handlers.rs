use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::app_state::AppState;
use crate::i18n::{extract_translations_for_client, I18n, SupportedLanguage};

/// Keys the booking screens need when the client asks for none in particular.
const DEFAULT_CLIENT_KEYS: &[&str] = &[
    "app-name",
    "loading",
    "save",
    "cancel",
    "error-generic",
    "appointment-created",
    "scheduling-salon-closed",
];

#[derive(Debug, Deserialize)]
pub struct TranslationQuery {
    /// Comma-separated list of keys
    pub keys: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageInfo {
    pub code: String,
    pub name: String,
    pub is_default: bool,
}

impl From<SupportedLanguage> for LanguageInfo {
    fn from(language: SupportedLanguage) -> Self {
        Self {
            code: language.code().to_string(),
            name: language.name().to_string(),
            is_default: language == SupportedLanguage::default(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedLanguagesResponse {
    pub languages: Vec<LanguageInfo>,
    pub default_language: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationsResponse {
    pub translations: HashMap<String, String>,
    pub language: String,
    pub requested_keys: Vec<String>,
}

pub async fn get_supported_languages() -> Json<SupportedLanguagesResponse> {
    Json(SupportedLanguagesResponse {
        languages: SupportedLanguage::all().iter().copied().map(LanguageInfo::from).collect(),
        default_language: SupportedLanguage::default().code().to_string(),
    })
}

/// Translations for the requested keys; `language` overrides the request language.
pub async fn get_translations(
    State(state): State<AppState>,
    i18n: I18n,
    Query(query): Query<TranslationQuery>,
) -> Json<TranslationsResponse> {
    let language = query
        .language
        .and_then(|code| code.parse::<SupportedLanguage>().ok())
        .unwrap_or(i18n.language());

    let keys: Vec<String> = match query.keys {
        Some(keys) => keys
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => DEFAULT_CLIENT_KEYS.iter().map(|s| s.to_string()).collect(),
    };

    let key_refs: Vec<&str> = keys.iter().map(|s| s.as_str()).collect();
    let translations = extract_translations_for_client(&state.localizer, language, &key_refs);

    Json(TranslationsResponse {
        translations,
        language: language.code().to_string(),
        requested_keys: keys,
    })
}

pub async fn get_current_language(i18n: I18n) -> Json<LanguageInfo> {
    Json(i18n.language().into())
}
