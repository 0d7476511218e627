use anyhow::{Context, Result};
use fluent_bundle::{concurrent::FluentBundle, FluentResource};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::i18n::language::SupportedLanguage;

pub type Bundle = FluentBundle<FluentResource>;

/// Resources compiled into the binary, used when no override directory exists.
fn bundled_resources(language: SupportedLanguage) -> &'static [&'static str] {
    match language {
        SupportedLanguage::Portuguese => &[
            include_str!("../../locales/pt/common.ftl"),
            include_str!("../../locales/pt/scheduling.ftl"),
        ],
        SupportedLanguage::English => &[
            include_str!("../../locales/en/common.ftl"),
            include_str!("../../locales/en/scheduling.ftl"),
        ],
    }
}

/// Loads and manages Fluent translation resources
pub struct FluentLoader {
    bundles: HashMap<SupportedLanguage, Bundle>,
}

impl FluentLoader {
    pub fn new() -> Self {
        Self {
            bundles: HashMap::new(),
        }
    }

    /// Load a locale from `{locales_dir}/{code}/*.ftl`, falling back to the
    /// bundled resources when the directory is absent or holds no `.ftl`.
    pub fn load_locale(
        &mut self,
        language: SupportedLanguage,
        locales_dir: Option<&Path>,
    ) -> Result<()> {
        let sources = match locales_dir {
            Some(dir) => read_locale_dir(&dir.join(language.code()))?,
            None => Vec::new(),
        };

        let mut bundle = FluentBundle::new_concurrent(vec![language.lang_id()]);
        bundle.set_use_isolating(false);

        if sources.is_empty() {
            for source in bundled_resources(language) {
                add_source(&mut bundle, source.to_string())?;
            }
            tracing::info!("Loaded bundled translations for locale {}", language.code());
        } else {
            let loaded_files = sources.len();
            for source in sources {
                add_source(&mut bundle, source)?;
            }
            tracing::info!("Loaded {} FTL files for locale {}", loaded_files, language.code());
        }

        self.bundles.insert(language, bundle);
        Ok(())
    }

    /// Get a bundle for a specific language
    pub fn get_bundle(&self, language: &SupportedLanguage) -> Option<&Bundle> {
        self.bundles.get(language)
    }
}

impl Default for FluentLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn read_locale_dir(dir: &Path) -> Result<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let paths = fs::read_dir(dir)
        .with_context(|| format!("Failed to read locale directory: {:?}", dir))?;

    let mut sources = Vec::new();
    for path in paths {
        let path = path?.path();
        if path.extension().and_then(|s| s.to_str()) == Some("ftl") {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read file: {:?}", path))?;
            sources.push(content);
        }
    }
    Ok(sources)
}

fn add_source(bundle: &mut Bundle, source: String) -> Result<()> {
    let resource = FluentResource::try_new(source)
        .map_err(|(_, errors)| anyhow::anyhow!("Failed to parse FTL resource: {:?}", errors))?;

    bundle
        .add_resource(resource)
        .map_err(|errors| anyhow::anyhow!("Failed to add resource to bundle: {:?}", errors))
}
