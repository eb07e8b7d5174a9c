use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::validation::{validate_options, validate_title};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, sqlx::Type)]
#[sqlx(type_name = "quiz_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum QuizStatus {
    Draft,
    Published,
}

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct Quiz {
    pub id: Uuid,
    pub mentor_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: QuizStatus,
    pub join_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A question as persisted: prompt text, ordered option list and the index
/// of the correct option.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct QuizQuestion {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub position: i32,
    pub prompt: String,
    pub options: sqlx::types::Json<Vec<String>>,
    pub correct_option_index: i32,
}

/// Normalized question shape served to the mentor dashboard.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct QuestionView {
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_option_index: i32,
}

/// Question shape served to students. The correct index stays server-side
/// until the answer is scored.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StudentQuestionView {
    pub question_text: String,
    pub options: Vec<String>,
}

impl QuizQuestion {
    pub fn to_view(&self) -> QuestionView {
        QuestionView {
            question_text: self.prompt.clone(),
            options: self.options.0.clone(),
            correct_option_index: self.correct_option_index,
        }
    }

    pub fn to_student_view(&self) -> StudentQuestionView {
        StudentQuestionView {
            question_text: self.prompt.clone(),
            options: self.options.0.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 500, message = "Question prompt must be 1-500 characters"))]
    pub prompt: String,
    #[validate(custom(function = validate_options))]
    pub options: Vec<String>,
    pub correct_option_index: i32,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(custom(function = validate_title))]
    pub title: String,
    pub description: Option<String>,
    #[validate(nested)]
    #[validate(length(min = 1, message = "A quiz needs at least one question"))]
    pub questions: Vec<CreateQuestionRequest>,
}

#[derive(Debug, Serialize, Deserialize, Hash)]
pub struct QuizPageQuery {
    pub page_num: Option<u16>,
}

#[derive(Debug, Serialize)]
pub struct PublishQuizResponse {
    pub quiz_id: Uuid,
    pub join_code: String,
}
