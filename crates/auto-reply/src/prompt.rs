//! Routing and prompt construction.
//!
//! A raw message is routed exactly once into a [`Route`]: either an explicit
//! command token or the language inferred from the cleaned text. The route
//! picks one fixed template, and the template decides how the completion
//! text is turned back into a reply.

use bilingo_providers::{CompletionFailure, CompletionResult, PromptRequest};

use crate::language::{Language, classify, clean};

/// Label preceding the corrected English section in a two-section answer.
pub const ENGLISH_MARKER: &str = "English:";
/// Label preceding the Chinese translation in a two-section answer.
pub const CHINESE_MARKER: &str = "Chinese:";

const REPHRASE_AND_TRANSLATE_TEMPLATE: &str = "Please help rephrase this English sentence to \
make it grammatically correct, but do not change the meaning:\n{text}\nThen translate the \
rephrased version into Traditional Chinese. Reply in this format:\n\nEnglish: \
<corrected>\nChinese: <translated>";

const TRANSLATE_TO_ENGLISH_TEMPLATE: &str =
    "Please translate the following Traditional Chinese text to natural English:\n{text}";

const ECHO_THEN_TRANSLATE_TEMPLATE: &str = "Repeat the following Traditional Chinese text \
exactly as written, then on a new line give its translation into natural English. Reply \
with only those two lines:\n{text}";

/// Explicit user commands, recognized by a leading token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// `/ttw`: fix the English, then translate it to Chinese.
    RephraseAndTranslate,
    /// `/ten`: translate Chinese to English.
    TranslateToEnglish,
}

impl Command {
    pub const ALL: [Self; 2] = [Self::RephraseAndTranslate, Self::TranslateToEnglish];

    pub fn token(self) -> &'static str {
        match self {
            Self::RephraseAndTranslate => "/ttw",
            Self::TranslateToEnglish => "/ten",
        }
    }

    /// Payload remaining after the command token, if `text` starts with it
    /// (ASCII case-insensitive).
    fn strip(self, text: &str) -> Option<&str> {
        let token = self.token();
        let head = text.get(..token.len())?;
        head.eq_ignore_ascii_case(token)
            .then(|| &text[token.len()..])
    }
}

/// Which template handles a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Command(Command),
    Inferred(Language),
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Command(cmd) => f.write_str(cmd.token()),
            Self::Inferred(lang) => write!(f, "inferred:{lang}"),
        }
    }
}

/// Route a raw message and return the cleaned payload to put in the prompt.
///
/// Command tokens take precedence over the language heuristic. The payload
/// is cleaned in both cases.
pub fn route(raw: &str) -> (Route, String) {
    let text = raw.trim_start();
    for command in Command::ALL {
        if let Some(rest) = command.strip(text) {
            return (Route::Command(command), clean(rest));
        }
    }
    let cleaned = clean(raw);
    (Route::Inferred(classify(&cleaned)), cleaned)
}

/// How the completion text becomes a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// Split on [`ENGLISH_MARKER`] / [`CHINESE_MARKER`].
    Sections,
    /// Use the text as is, trimmed.
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPrompt {
    pub request: PromptRequest,
    pub shape: ResponseShape,
}

pub fn build_prompt(route: Route, payload: impl Into<String>) -> BuiltPrompt {
    let (template, shape) = match route {
        Route::Command(Command::RephraseAndTranslate) | Route::Inferred(Language::English) => {
            (REPHRASE_AND_TRANSLATE_TEMPLATE, ResponseShape::Sections)
        },
        Route::Command(Command::TranslateToEnglish) => {
            (TRANSLATE_TO_ENGLISH_TEMPLATE, ResponseShape::Plain)
        },
        Route::Inferred(Language::Chinese) => (ECHO_THEN_TRANSLATE_TEMPLATE, ResponseShape::Plain),
    };
    BuiltPrompt {
        request: PromptRequest::new(template, payload),
        shape,
    }
}

fn trim_section(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == '*')
}

/// Split a two-section answer into `(english, chinese)`.
///
/// Both markers must be present. Sections are delimited by marker position,
/// so either order is accepted.
pub fn split_sections(text: &str) -> Option<(String, String)> {
    let en = text.find(ENGLISH_MARKER)?;
    let zh = text.find(CHINESE_MARKER)?;
    let en_body = en + ENGLISH_MARKER.len();
    let zh_body = zh + CHINESE_MARKER.len();
    let (english, chinese) = if en < zh {
        (&text[en_body..zh], &text[zh_body..])
    } else {
        (&text[en_body..], &text[zh_body..en])
    };
    Some((
        trim_section(english).to_string(),
        trim_section(chinese).to_string(),
    ))
}

/// Turn a completion outcome into display text.
///
/// A successful completion that lacks the requested sections, or is blank,
/// is reported as [`CompletionFailure::MalformedResponse`].
pub fn render_reply(shape: ResponseShape, result: CompletionResult) -> CompletionResult {
    let text = result?;
    match shape {
        ResponseShape::Sections => split_sections(&text)
            .map(|(english, chinese)| format!("{english}\n\n{chinese}"))
            .ok_or(CompletionFailure::MalformedResponse),
        ResponseShape::Plain => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Err(CompletionFailure::MalformedResponse)
            } else {
                Ok(trimmed.to_string())
            }
        },
    }
}
