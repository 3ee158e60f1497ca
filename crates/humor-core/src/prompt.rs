//! Prompt Builder: renders one submission into the fixed four-part interpretation prompt.
//!
//! The template text never contains a humor-level or style label itself, so each label appears
//! in the prompt exactly once.

use serde::{Deserialize, Serialize};

use crate::error::{InterpretError, InterpretResult};
use crate::options::{HumorLevel, InterpretationStyle};

/// System message sent ahead of every prompt.
pub const SYSTEM_INSTRUCTION: &str = "당신은 한글 단어를 재미있고 창의적으로 해석하는 전문가입니다. \
항상 유머러스하고 친근한 톤으로 답변하세요.";

/// Clickable suggestions shown under the form; clicking one only fills the word field.
pub const EXAMPLE_WORDS: [&str; 10] = [
    "사과", "바람", "꿈", "컴퓨터", "바다", "책", "음악", "친구", "시간", "미소",
];

/// One form submission. Built fresh per submit, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpretationRequest {
    word: String,
    humor_level: HumorLevel,
    style: InterpretationStyle,
}

impl InterpretationRequest {
    /// Trims `word`; a blank word is rejected.
    pub fn new(
        word: &str,
        humor_level: HumorLevel,
        style: InterpretationStyle,
    ) -> InterpretResult<Self> {
        let word = word.trim();
        if word.is_empty() {
            return Err(InterpretError::EmptyWord);
        }
        Ok(Self {
            word: word.to_string(),
            humor_level,
            style,
        })
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn humor_level(&self) -> HumorLevel {
        self.humor_level
    }

    pub fn style(&self) -> InterpretationStyle {
        self.style
    }
}

/// Render the user prompt for `request`. Pure and infallible.
///
/// Both option labels appear exactly once. The word is interpolated once, but a word that is
/// itself template text (e.g. "해석", "관점", "단어") also matches the fixed wording and so
/// occurs more than once in the result.
pub fn build_prompt(request: &InterpretationRequest) -> String {
    format!(
        "다음 한글 단어를 {humor}하고 {style}으로 해석해주세요.\n\
\n\
단어: {word}\n\
\n\
다음 형식으로 답변해주세요:\n\
1. 재미있는 해석: (창의적이고 유머러스한 해석)\n\
2. 생활 속 관점: (실생활에서 어떻게 보는지)\n\
3. 엉뚱한 상상: (완전히 다른 관점에서의 해석)\n\
4. 재미있는 팁: (이 단어와 관련된 재미있는 사실이나 조언)\n\
\n\
답변은 친근하고 재미있게, 이모지를 적절히 사용해서 작성해주세요.\n",
        humor = request.humor_level.label(),
        style = request.style.label(),
        word = request.word,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_triple_embeds_each_value_exactly_once() {
        for word in EXAMPLE_WORDS {
            for level in HumorLevel::ALL {
                for style in InterpretationStyle::ALL {
                    let req = InterpretationRequest::new(word, level, style).unwrap();
                    let prompt = build_prompt(&req);
                    assert_eq!(prompt.matches(word).count(), 1, "word {word}");
                    assert_eq!(prompt.matches(level.label()).count(), 1, "{level} / {style}");
                    assert_eq!(prompt.matches(style.label()).count(), 1, "{level} / {style}");
                }
            }
        }
    }

    #[test]
    fn word_from_template_text_still_interpolated_once() {
        let req =
            InterpretationRequest::new("해석", HumorLevel::Slight, InterpretationStyle::Everyday)
                .unwrap();
        let prompt = build_prompt(&req);
        assert_eq!(prompt.matches("단어: 해석\n").count(), 1);
        assert!(prompt.matches("해석").count() > 1);
    }

    #[test]
    fn template_is_free_of_option_labels() {
        let req =
            InterpretationRequest::new("꿈", HumorLevel::Slight, InterpretationStyle::Everyday)
                .unwrap();
        let prompt = build_prompt(&req);
        for level in HumorLevel::ALL.iter().filter(|l| **l != HumorLevel::Slight) {
            assert!(!prompt.contains(level.label()));
        }
        for style in InterpretationStyle::ALL
            .iter()
            .filter(|s| **s != InterpretationStyle::Everyday)
        {
            assert!(!prompt.contains(style.label()));
        }
    }

    #[test]
    fn prompt_has_four_sections() {
        let req =
            InterpretationRequest::new("바다", HumorLevel::FullGag, InterpretationStyle::Modern)
                .unwrap();
        let prompt = build_prompt(&req);
        for marker in ["1. ", "2. ", "3. ", "4. "] {
            assert!(prompt.contains(marker), "missing section {marker}");
        }
        assert!(prompt.contains("단어: 바다\n"));
    }

    #[test]
    fn blank_word_is_rejected_and_word_is_trimmed() {
        let err = InterpretationRequest::new("   ", HumorLevel::Very, InterpretationStyle::Modern)
            .unwrap_err();
        assert_eq!(err, InterpretError::EmptyWord);

        let req = InterpretationRequest::new(" 책 ", HumorLevel::Very, InterpretationStyle::Modern)
            .unwrap();
        assert_eq!(req.word(), "책");
    }
}
