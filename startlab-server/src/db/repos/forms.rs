//! Form catalogue: submissions, their forms, and form questions

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool, Row};

use super::DbError;

pub(crate) const SUBMISSIONS_SQL: &str = r#"
    SELECT id, title, created_at
    FROM submissions
    ORDER BY created_at DESC, id DESC
"#;

pub(crate) const FORMS_SQL: &str = r#"
    SELECT id, submission_id, name, created_at
    FROM forms
    WHERE submission_id = $1
    ORDER BY name, id
"#;

pub(crate) const QUESTIONS_SQL: &str = r#"
    SELECT fq.id AS form_question_id,
           fq.question_text,
           sq.question_order
    FROM form_questions fq
    JOIN submission_questions sq ON sq.id = fq.submission_question_id
    WHERE fq.form_id = $1
    ORDER BY sq.question_order, fq.id
"#;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Submission {
    pub id: i32,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Form {
    pub id: i32,
    pub submission_id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A question as clients see it; `form_question_id` is what answers reference.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FormQuestion {
    pub form_question_id: i32,
    pub question_text: String,
    pub question_order: i32,
}

/// Form catalogue repository
pub struct FormRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> FormRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All submissions, newest first.
    pub async fn list_submissions(&self) -> Result<Vec<Submission>, DbError> {
        Ok(sqlx::query_as::<_, Submission>(SUBMISSIONS_SQL)
            .fetch_all(self.pool)
            .await?)
    }

    /// Forms of one submission by name. `NotFound` if the submission is unknown.
    pub async fn list_forms(&self, submission_id: i32) -> Result<Vec<Form>, DbError> {
        let exists: bool = sqlx::query("SELECT EXISTS(SELECT 1 FROM submissions WHERE id = $1)")
            .bind(submission_id)
            .fetch_one(self.pool)
            .await?
            .get(0);
        if !exists {
            return Err(DbError::not_found("submission", submission_id));
        }

        Ok(sqlx::query_as::<_, Form>(FORMS_SQL)
            .bind(submission_id)
            .fetch_all(self.pool)
            .await?)
    }

    /// Questions of one form in questionnaire order. `NotFound` if the form is unknown.
    pub async fn list_questions(&self, form_id: i32) -> Result<Vec<FormQuestion>, DbError> {
        let exists: bool = sqlx::query("SELECT EXISTS(SELECT 1 FROM forms WHERE id = $1)")
            .bind(form_id)
            .fetch_one(self.pool)
            .await?
            .get(0);
        if !exists {
            return Err(DbError::not_found("form", form_id));
        }

        Ok(sqlx::query_as::<_, FormQuestion>(QUESTIONS_SQL)
            .bind(form_id)
            .fetch_all(self.pool)
            .await?)
    }

    /// First form whose name matches an `ILIKE` pattern.
    pub async fn find_form_by_name(&self, pattern: &str) -> Result<Form, DbError> {
        sqlx::query_as::<_, Form>(
            r#"
            SELECT id, submission_id, name, created_at
            FROM forms
            WHERE name ILIKE $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(pattern)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("form", pattern))
    }

    /// Ids from `question_ids` that are not questions of `form_id`.
    pub async fn foreign_questions(
        &self,
        form_id: i32,
        question_ids: &[i64],
    ) -> Result<Vec<i64>, DbError> {
        if question_ids.is_empty() {
            return Ok(Vec::new());
        }

        let known: Vec<i64> = sqlx::query_scalar(
            "SELECT id::BIGINT FROM form_questions WHERE form_id = $1 AND id = ANY($2)",
        )
        .bind(form_id)
        .bind(question_ids)
        .fetch_all(self.pool)
        .await?;

        Ok(question_ids
            .iter()
            .copied()
            .filter(|id| !known.contains(id))
            .collect())
    }
}
