use crate::db::models::Question;

pub(crate) const MISSING_ANSWER_TEXT: &str = "Correct answer not specified";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OptionLetter {
    A,
    B,
    C,
    D,
}

impl OptionLetter {
    pub(crate) const ALL: [OptionLetter; 4] = [Self::A, Self::B, Self::C, Self::D];

    /// Accepts a single letter in either case, surrounding whitespace ignored.
    pub(crate) fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "A" | "a" => Some(Self::A),
            "B" | "b" => Some(Self::B),
            "C" | "c" => Some(Self::C),
            "D" | "d" => Some(Self::D),
            _ => None,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
            Self::D => 3,
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

/// Trimmed option text, `None` when the option is missing or blank.
pub(crate) fn option_text(question: &Question, letter: OptionLetter) -> Option<&str> {
    let raw = match letter {
        OptionLetter::A => question.option_a.as_deref(),
        OptionLetter::B => question.option_b.as_deref(),
        OptionLetter::C => question.option_c.as_deref(),
        OptionLetter::D => question.option_d.as_deref(),
    };
    raw.map(str::trim).filter(|text| !text.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ResolvedAnswer<'a> {
    pub(crate) letter: OptionLetter,
    pub(crate) text: &'a str,
    /// The stored letter was unusable and the first filled option was taken instead.
    pub(crate) substituted: bool,
}

/// The stored correct option when it points at a filled option, otherwise the first filled
/// option A through D. `None` when every option is blank.
pub(crate) fn resolve_correct_answer(question: &Question) -> Option<ResolvedAnswer<'_>> {
    let stored = question.correct_option.as_deref().and_then(OptionLetter::parse);
    if let Some(letter) = stored {
        if let Some(text) = option_text(question, letter) {
            return Some(ResolvedAnswer { letter, text, substituted: false });
        }
    }

    OptionLetter::ALL.into_iter().find_map(|letter| {
        option_text(question, letter).map(|text| ResolvedAnswer { letter, text, substituted: true })
    })
}

/// Key line text for one question.
pub(crate) fn answer_line(question: &Question) -> String {
    match resolve_correct_answer(question) {
        Some(answer) => format!("Answer: ({}) {}", answer.letter.as_str(), answer.text),
        None => format!("Answer: {MISSING_ANSWER_TEXT}"),
    }
}
