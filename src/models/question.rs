use serde::{Deserialize, Serialize};

/// A single multiple-choice question as embedded by the hosting page.
///
/// The wire format uses camelCase keys (`answerIndex`); `id` and `tag`
/// are optional. Questions are immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Backend identifier, used to key the durable answer map.
    #[serde(default)]
    pub id: Option<i64>,
    pub text: String,
    /// Ordered answer options. A valid question has at least one.
    pub options: Vec<String>,
    /// Index into `options` of the correct answer.
    pub answer_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl Question {
    /// Whether `index` names the correct option.
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.answer_index
    }
}

/// Per-option visual state exposed to the presentation layer.
///
/// While a question is unanswered every option is `Selectable`. Once
/// answered, the correct option and the learner's (incorrect) choice are
/// revealed and every other option is hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionAppearance {
    /// Question not answered yet; option can be chosen.
    Selectable,
    /// Question answered; this is the correct option.
    RevealedCorrect,
    /// Question answered; this is the learner's incorrect choice.
    RevealedIncorrectChosen,
    /// Question answered; neither correct nor chosen. Rendered hidden.
    RevealedOther,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_wire_format() {
        let json = r#"{
            "id": 11,
            "text": "What is 2 + 2?",
            "options": ["3", "4", "5"],
            "answerIndex": 1,
            "tag": "arithmetic"
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.id, Some(11));
        assert_eq!(q.options.len(), 3);
        assert_eq!(q.answer_index, 1);
        assert!(q.is_correct(1));
        assert!(!q.is_correct(0));
    }

    #[test]
    fn test_question_without_id_or_tag() {
        let json = r#"{"text": "Pick one", "options": ["a", "b"], "answerIndex": 0}"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.id, None);
        assert_eq!(q.tag, None);
    }
}
