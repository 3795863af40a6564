//! Locale handling for campaign topics.
//!
//! The backend runs the pipeline in English or Arabic; the client guesses the
//! language from the topic text and lets the backend correct it in the create
//! response. Detection counts codepoints in the Arabic Unicode blocks and
//! flips to Arabic when they make up more than 30% of the text.

/// Supported campaign languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::En => write!(f, "en"),
            Language::Ar => write!(f, "ar"),
        }
    }
}

impl Language {
    /// Parse a backend locale tag. Unknown tags fall back to English.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "ar" => Language::Ar,
            _ => Language::En,
        }
    }

    #[must_use]
    pub fn is_rtl(self) -> bool {
        matches!(self, Language::Ar)
    }

    /// Guess the language of `text` from its Arabic-block codepoint ratio.
    #[must_use]
    pub fn detect(text: &str) -> Self {
        let total = text.chars().count();
        if total == 0 {
            return Language::En;
        }
        let arabic = text.chars().filter(|&c| is_arabic_char(c)).count();
        // Strictly more than 30%, not at-least.
        if arabic * 10 > total * 3 {
            Language::Ar
        } else {
            Language::En
        }
    }
}

/// True when `c` falls in one of the Arabic Unicode blocks, including the
/// supplement, extended, and presentation-form ranges.
fn is_arabic_char(c: char) -> bool {
    matches!(c,
        '\u{0600}'..='\u{06FF}'
        | '\u{0750}'..='\u{077F}'
        | '\u{08A0}'..='\u{08FF}'
        | '\u{FB50}'..='\u{FDFF}'
        | '\u{FE70}'..='\u{FEFF}')
}

const TOPIC_SUGGESTIONS_EN: &[&str] = &[
    "productivity hack for students",
    "morning routine that changed my life",
    "budget travel tips 2026",
    "AI tools nobody talks about",
    "fitness transformation in 30 days",
    "5-minute cooking hacks",
    "money-saving tips for Gen Z",
    "side hustle ideas from home",
];

const TOPIC_SUGGESTIONS_AR: &[&str] = &[
    "نصائح للدراسة الفعالة",
    "روتين صباحي غير حياتي",
    "حيل طبخ سريعة بـ5 دقائق",
    "أدوات ذكاء اصطناعي ما حد يعرفها",
    "نصائح توفير المال للشباب",
    "تحول لياقة بدنية في 30 يوم",
];

/// Curated topic ideas shown when the user has not typed anything yet.
#[must_use]
pub fn topic_suggestions(language: Language) -> &'static [&'static str] {
    match language {
        Language::En => TOPIC_SUGGESTIONS_EN,
        Language::Ar => TOPIC_SUGGESTIONS_AR,
    }
}
