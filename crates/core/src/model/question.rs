use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question must have at least one accepted answer")]
    NoAcceptedAnswers,

    #[error("accepted answer {index} is empty")]
    EmptyAnswer { index: usize },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A civics question together with every answer the grader should accept.
///
/// Questions are validated on construction and never mutated afterwards.
/// The serialized form is `{ "question": ..., "answers": [...] }`, the same
/// shape the question bank and the grading endpoint use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionRecord", into = "QuestionRecord")]
pub struct Question {
    text: String,
    accepted_answers: Vec<String>,
}

impl Question {
    /// Build a question from its text and accepted answers.
    ///
    /// Surrounding whitespace is trimmed from the text and from each answer.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text is blank, no answers are given, or
    /// any answer is blank.
    pub fn new<T, A, I>(text: T, accepted_answers: I) -> Result<Self, QuestionError>
    where
        T: Into<String>,
        A: Into<String>,
        I: IntoIterator<Item = A>,
    {
        let text = text.into().trim().to_string();
        if text.is_empty() {
            return Err(QuestionError::EmptyText);
        }

        let accepted_answers = accepted_answers
            .into_iter()
            .enumerate()
            .map(|(index, answer)| {
                let answer = answer.into().trim().to_string();
                if answer.is_empty() {
                    Err(QuestionError::EmptyAnswer { index })
                } else {
                    Ok(answer)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        if accepted_answers.is_empty() {
            return Err(QuestionError::NoAcceptedAnswers);
        }

        Ok(Self {
            text,
            accepted_answers,
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn accepted_answers(&self) -> &[String] {
        &self.accepted_answers
    }

    /// Accepted answers joined for display and prompting.
    #[must_use]
    pub fn joined_answers(&self) -> String {
        self.accepted_answers.join(", ")
    }
}

/// Wire shape of a question record.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct QuestionRecord {
    question: String,
    answers: Vec<String>,
}

impl TryFrom<QuestionRecord> for Question {
    type Error = QuestionError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        Question::new(record.question, record.answers)
    }
}

impl From<Question> for QuestionRecord {
    fn from(question: Question) -> Self {
        Self {
            question: question.text,
            answers: question.accepted_answers,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_text_and_answers() {
        let q = Question::new("  Who vetoes bills? ", ["  the President "]).unwrap();
        assert_eq!(q.text(), "Who vetoes bills?");
        assert_eq!(q.accepted_answers(), ["the President"]);
    }

    #[test]
    fn blank_text_is_rejected() {
        let err = Question::new("   ", ["x"]).unwrap_err();
        assert_eq!(err, QuestionError::EmptyText);
    }

    #[test]
    fn missing_answers_are_rejected() {
        let err = Question::new("Q?", Vec::<String>::new()).unwrap_err();
        assert_eq!(err, QuestionError::NoAcceptedAnswers);
    }

    #[test]
    fn blank_answer_reports_its_index() {
        let err = Question::new("Q?", ["ok", " "]).unwrap_err();
        assert_eq!(err, QuestionError::EmptyAnswer { index: 1 });
    }

    #[test]
    fn joined_answers_uses_comma_separator() {
        let q = Question::new("Name a right.", ["life", "liberty"]).unwrap();
        assert_eq!(q.joined_answers(), "life, liberty");
    }

    #[test]
    fn deserializes_from_question_bank_shape() {
        let json = r#"{ "question": "What is the capital?", "answers": ["Washington, D.C."] }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.text(), "What is the capital?");
        assert_eq!(q.accepted_answers(), ["Washington, D.C."]);

        let bad = r#"{ "question": "What is the capital?", "answers": [] }"#;
        assert!(serde_json::from_str::<Question>(bad).is_err());
    }
}
