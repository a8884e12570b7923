//! Optional auto-fill of a card's back text by machine translation.
//!
//! Translation is a capability, not a dependency: the [`Translator`] is either
//! `Disabled` or wraps a [`TranslationBackend`] targeting one language. Callers
//! check [`Translator::is_available`] instead of probing for a provider.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    Disabled,
    Spanish,
    French,
    German,
    Italian,
    Portuguese,
    Chinese,
    Japanese,
}

impl Language {
    pub const ALL: [Language; 8] = [
        Language::Disabled,
        Language::Spanish,
        Language::French,
        Language::German,
        Language::Italian,
        Language::Portuguese,
        Language::Chinese,
        Language::Japanese,
    ];

    /// Target code understood by translation providers.
    pub fn code(self) -> Option<&'static str> {
        match self {
            Language::Disabled => None,
            Language::Spanish => Some("es"),
            Language::French => Some("fr"),
            Language::German => Some("de"),
            Language::Italian => Some("it"),
            Language::Portuguese => Some("pt"),
            Language::Chinese => Some("zh-CN"),
            Language::Japanese => Some("ja"),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Language::Disabled => "Disabled",
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "German",
            Language::Italian => "Italian",
            Language::Portuguese => "Portuguese",
            Language::Chinese => "Chinese",
            Language::Japanese => "Japanese",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Language::ALL
            .into_iter()
            .find(|lang| lang.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let names: Vec<&str> = Language::ALL.iter().map(|l| l.name()).collect();
                format!("Unknown language '{}' (expected one of {})", wanted, names.join(", "))
            })
    }
}

/// A translation provider. Implementations may do I/O; failures are reported
/// as plain strings and never abort card entry.
pub trait TranslationBackend {
    fn translate(&self, text: &str, target_code: &str) -> Result<String, String>;
}

pub enum Translator {
    Disabled,
    Provider {
        language: Language,
        backend: Box<dyn TranslationBackend>,
    },
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Translator::Disabled => f.write_str("Translator::Disabled"),
            Translator::Provider { language, .. } => {
                write!(f, "Translator::Provider({})", language)
            }
        }
    }
}

/// What auto-fill wants done to the back text field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoFill {
    Unchanged,
    Clear,
    Fill(String),
}

impl Translator {
    /// Builds a translator for the configured language. Without a backend, or
    /// with auto-fill disabled, the capability is unavailable.
    pub fn new(language: Language, backend: Option<Box<dyn TranslationBackend>>) -> Self {
        match (language, backend) {
            (Language::Disabled, _) | (_, None) => Translator::Disabled,
            (language, Some(backend)) => Translator::Provider { language, backend },
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Translator::Provider { .. })
    }

    /// Suggests a back text for `front`. An existing back text is never
    /// overwritten, and an empty front clears the back.
    pub fn auto_fill(&self, front: &str, back: &str) -> AutoFill {
        let Translator::Provider { language, backend } = self else {
            return AutoFill::Unchanged;
        };
        let front = front.trim();
        if front.is_empty() {
            return AutoFill::Clear;
        }
        if !back.trim().is_empty() {
            return AutoFill::Unchanged;
        }
        let Some(code) = language.code() else {
            return AutoFill::Unchanged;
        };
        match backend.translate(front, code) {
            Ok(text) => AutoFill::Fill(text),
            Err(e) => {
                tracing::debug!(error = %e, "auto-fill translation failed");
                AutoFill::Unchanged
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl TranslationBackend for Echo {
        fn translate(&self, text: &str, target_code: &str) -> Result<String, String> {
            Ok(format!("{}:{}", target_code, text))
        }
    }

    struct Broken;

    impl TranslationBackend for Broken {
        fn translate(&self, _: &str, _: &str) -> Result<String, String> {
            Err("offline".into())
        }
    }

    #[test]
    fn unavailable_without_backend_or_language() {
        assert!(!Translator::new(Language::Spanish, None).is_available());
        assert!(!Translator::new(Language::Disabled, Some(Box::new(Echo))).is_available());
        assert!(Translator::new(Language::French, Some(Box::new(Echo))).is_available());
    }

    #[test]
    fn fills_only_an_empty_back() {
        let translator = Translator::new(Language::Spanish, Some(Box::new(Echo)));
        assert_eq!(
            translator.auto_fill("Hello", ""),
            AutoFill::Fill("es:Hello".into())
        );
        assert_eq!(translator.auto_fill("Hello", "Hola"), AutoFill::Unchanged);
        assert_eq!(translator.auto_fill("  ", "Hola"), AutoFill::Clear);
    }

    #[test]
    fn provider_failure_is_silent() {
        let translator = Translator::new(Language::German, Some(Box::new(Broken)));
        assert_eq!(translator.auto_fill("Hello", ""), AutoFill::Unchanged);
    }

    #[test]
    fn language_names_round_trip() {
        for lang in Language::ALL {
            assert_eq!(lang.to_string().parse::<Language>().unwrap(), lang);
        }
        assert_eq!("japanese".parse::<Language>().unwrap(), Language::Japanese);
        assert!("Klingon".parse::<Language>().is_err());
    }
}
