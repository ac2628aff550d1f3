//! Spoken phrases per display language and the synthesis locale table.
//!
//! Only the spoken confirmations are localized. Notices shown in toasts
//! stay in English, matching the rest of the marketplace UI.

/// Synthesis locale used when the display language has no entry.
pub const DEFAULT_SYNTHESIS_LOCALE: &str = "en-US";

const SYNTHESIS_LOCALES: &[(&str, &str)] = &[
    ("en", "en-US"),
    ("hi", "hi-IN"),
    ("mr", "mr-IN"),
    ("ta", "ta-IN"),
    ("te", "te-IN"),
    ("kn", "kn-IN"),
    ("bn", "bn-IN"),
    ("gu", "gu-IN"),
    ("pa", "pa-IN"),
];

fn primary_subtag(language: &str) -> String {
    language
        .split(|c| c == '-' || c == '_')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Maps a display language code (`hi`, `hi-IN`, `mr_IN`) to the locale the
/// synthesizer should speak in.
pub fn synthesis_locale(language: &str) -> &'static str {
    let primary = primary_subtag(language);
    SYNTHESIS_LOCALES
        .iter()
        .find(|(code, _)| *code == primary)
        .map(|(_, locale)| *locale)
        .unwrap_or(DEFAULT_SYNTHESIS_LOCALE)
}

/// The phrases spoken back to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phrasebook {
    navigating_prefix: &'static str,
    navigating_suffix: &'static str,
    login_required: &'static str,
    not_understood_prefix: &'static str,
    not_understood: &'static str,
}

const ENGLISH: Phrasebook = Phrasebook {
    navigating_prefix: "Navigating to ",
    navigating_suffix: "",
    login_required: "Please login to access this page",
    not_understood_prefix: "Sorry, I did not understand ",
    not_understood: "Sorry, I did not understand that",
};

const HINDI: Phrasebook = Phrasebook {
    navigating_prefix: "",
    navigating_suffix: " पर जा रहे हैं",
    login_required: "इस पेज को देखने के लिए कृपया लॉगिन करें",
    not_understood_prefix: "माफ़ कीजिए, मैं समझ नहीं पाया: ",
    not_understood: "माफ़ कीजिए, मैं समझ नहीं पाया",
};

const MARATHI: Phrasebook = Phrasebook {
    navigating_prefix: "",
    navigating_suffix: " कडे जात आहोत",
    login_required: "हे पान पाहण्यासाठी कृपया लॉगिन करा",
    not_understood_prefix: "माफ करा, मला समजले नाही: ",
    not_understood: "माफ करा, मला समजले नाही",
};

impl Phrasebook {
    /// Phrasebook for a display language, English when untranslated.
    pub fn for_language(language: &str) -> Self {
        match primary_subtag(language).as_str() {
            "hi" => HINDI,
            "mr" => MARATHI,
            _ => ENGLISH,
        }
    }

    pub fn navigating_to(&self, destination: &str) -> String {
        format!(
            "{}{}{}",
            self.navigating_prefix, destination, self.navigating_suffix
        )
    }

    pub fn login_required(&self) -> &'static str {
        self.login_required
    }

    /// Apology echoing what was heard. Nothing heard gets the bare apology.
    pub fn not_understood(&self, heard: &str) -> String {
        let heard = heard.trim();
        if heard.is_empty() {
            return self.not_understood.to_string();
        }
        format!("{}{}", self.not_understood_prefix, heard)
    }
}
