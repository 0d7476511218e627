use anyhow::{anyhow, Result};
use fluent_bundle::{FluentArgs, FluentValue};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::i18n::fluent_loader::FluentLoader;
use crate::i18n::language::SupportedLanguage;
use crate::i18n_args;
use crate::scheduling::Rejection;

/// A localized string that can be converted to different formats
#[derive(Debug, Clone, Serialize)]
pub struct LocalizedString {
    value: String,
    language: SupportedLanguage,
}

impl LocalizedString {
    pub fn new(value: String, language: SupportedLanguage) -> Self {
        Self { value, language }
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

impl fmt::Display for LocalizedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Main localization interface
pub struct Localizer {
    loader: FluentLoader,
    default_language: SupportedLanguage,
}

impl Localizer {
    pub fn new(loader: FluentLoader) -> Self {
        Self {
            loader,
            default_language: SupportedLanguage::default(),
        }
    }

    /// Get a localized message for a specific language
    pub fn get_message_with_language(
        &self,
        language: &SupportedLanguage,
        key: &str,
        args: Option<&HashMap<String, FluentValue>>,
    ) -> Result<LocalizedString> {
        let bundle = self
            .loader
            .get_bundle(language)
            .or_else(|| self.loader.get_bundle(&self.default_language))
            .ok_or_else(|| anyhow!("No bundle available for language: {}", language))?;

        let message = bundle
            .get_message(key)
            .ok_or_else(|| anyhow!("Message not found: {}", key))?;

        let pattern = message
            .value()
            .ok_or_else(|| anyhow!("Message has no value: {}", key))?;

        let mut errors = Vec::new();
        let formatted = if let Some(args) = args {
            let mut fluent_args = FluentArgs::new();
            for (k, v) in args {
                fluent_args.set(k.as_str(), v.clone());
            }
            bundle.format_pattern(pattern, Some(&fluent_args), &mut errors)
        } else {
            bundle.format_pattern(pattern, None, &mut errors)
        };

        if !errors.is_empty() {
            tracing::warn!("Fluent formatting errors for key '{}': {:?}", key, errors);
        }

        Ok(LocalizedString::new(formatted.into_owned(), *language))
    }

    /// Get a message for a specific language, falling back to the key
    pub fn get_string_for_language(&self, language: &SupportedLanguage, key: &str) -> String {
        self.get_string_with_args(language, key, &HashMap::new())
    }

    /// Get a message with arguments for a specific language, falling back to the key
    pub fn get_string_with_args(
        &self,
        language: &SupportedLanguage,
        key: &str,
        args: &HashMap<String, FluentValue>,
    ) -> String {
        let args = (!args.is_empty()).then_some(args);
        self.get_message_with_language(language, key, args)
            .unwrap_or_else(|_| LocalizedString::new(key.to_string(), *language))
            .into_string()
    }

    /// User-facing explanation of a scheduling rejection
    pub fn rejection_message(&self, language: &SupportedLanguage, rejection: &Rejection) -> String {
        let (key, args) = match rejection {
            Rejection::PastDate { date, .. } => (
                "scheduling-past-date",
                i18n_args! { "date" => date.to_string() },
            ),
            Rejection::LeadTimeTooShort {
                earliest_date,
                earliest_time,
            } => (
                "scheduling-lead-time-too-short",
                i18n_args! {
                    "date" => earliest_date.to_string(),
                    "time" => earliest_time.to_string(),
                },
            ),
            Rejection::BeyondBookingHorizon { last_bookable_date } => (
                "scheduling-beyond-horizon",
                i18n_args! { "date" => last_bookable_date.to_string() },
            ),
            Rejection::SalonClosed { .. } => ("scheduling-salon-closed", HashMap::new()),
            Rejection::OutsideBusinessHours { opens_at, closes_at } => (
                "scheduling-outside-business-hours",
                i18n_args! {
                    "opens" => opens_at.to_string(),
                    "closes" => closes_at.to_string(),
                },
            ),
            Rejection::SlotConflict { start_time, end_time, .. } => (
                "scheduling-slot-conflict",
                i18n_args! {
                    "start" => start_time.to_string(),
                    "end" => end_time.to_string(),
                },
            ),
        };
        self.get_string_with_args(language, key, &args)
    }

    /// Check if a message exists for a language
    pub fn has_message(&self, language: &SupportedLanguage, key: &str) -> bool {
        self.loader
            .get_bundle(language)
            .map(|bundle| bundle.has_message(key))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::init_i18n;
    use crate::scheduling::TimeOfDay;
    use time::macros::date;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    #[test]
    fn formats_rejections_in_both_languages() {
        let localizer = init_i18n(None).unwrap();
        let conflict = Rejection::SlotConflict {
            appointment_id: None,
            start_time: t("10:00"),
            end_time: t("11:00"),
        };

        assert_eq!(
            localizer.rejection_message(&SupportedLanguage::English, &conflict),
            "Time conflict: the professional is already booked from 10:00 to 11:00"
        );
        assert_eq!(
            localizer.rejection_message(&SupportedLanguage::Portuguese, &conflict),
            "Conflito de horário: profissional já possui agendamento das 10:00 às 11:00"
        );

        let hours = Rejection::OutsideBusinessHours {
            opens_at: t("09:00"),
            closes_at: t("18:00"),
        };
        assert_eq!(
            localizer.rejection_message(&SupportedLanguage::Portuguese, &hours),
            "Horário fora do expediente (09:00 - 18:00)"
        );

        let past = Rejection::PastDate {
            date: date!(2026 - 10 - 15),
            today: date!(2026 - 10 - 16),
        };
        assert!(localizer
            .rejection_message(&SupportedLanguage::English, &past)
            .contains("2026-10-15"));
    }

    #[test]
    fn every_rejection_has_a_message_in_every_language() {
        let localizer = init_i18n(None).unwrap();
        for language in SupportedLanguage::all() {
            for key in [
                "scheduling-past-date",
                "scheduling-lead-time-too-short",
                "scheduling-beyond-horizon",
                "scheduling-salon-closed",
                "scheduling-outside-business-hours",
                "scheduling-slot-conflict",
            ] {
                assert!(localizer.has_message(language, key), "{key} missing for {language}");
            }
        }
    }

    #[test]
    fn unknown_keys_fall_back_to_the_key() {
        let localizer = init_i18n(None).unwrap();
        assert_eq!(
            localizer.get_string_for_language(&SupportedLanguage::English, "no-such-key"),
            "no-such-key"
        );
    }
}
