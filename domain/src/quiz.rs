use serde::{Deserialize, Serialize};

pub const QUIZ_QUESTION_COUNT: usize = 5;
pub const QUIZ_OPTION_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: usize,
}

impl QuizQuestion {
    pub fn new(question: impl Into<String>, correct_answer: usize) -> Self {
        Self {
            question: question.into(),
            options: ["Option A", "Option B", "Option C", "Option D"]
                .into_iter()
                .map(String::from)
                .collect(),
            correct_answer,
        }
    }

    pub fn is_well_formed(&self) -> bool {
        !self.question.trim().is_empty()
            && self.options.len() == QUIZ_OPTION_COUNT
            && self.correct_answer < QUIZ_OPTION_COUNT
    }
}
