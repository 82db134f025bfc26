//! Demo content for fresh databases
//!
//! Inserts a few FAQ entries, partners, and a questionnaire with one
//! science form and one startup form. Rows are matched by their natural key
//! so `run` can be repeated.

use sqlx::{PgPool, Postgres, Transaction};

const FAQS: &[(&str, &str, i32)] = &[
    (
        "Что такое СТАРТЛАБ?",
        "СТАРТЛАБ - это конкурс инновационных проектов для студентов и школьников, направленный на развитие предпринимательских навыков и поддержку инновационных идей.",
        1,
    ),
    (
        "Кто может участвовать в конкурсе?",
        "В конкурсе могут участвовать студенты высших учебных заведений и школьники старших классов, объединенные в команды от 2 до 5 человек.",
        2,
    ),
    (
        "Какие проекты принимаются на конкурс?",
        "Принимаются инновационные проекты в различных областях: IT, медицина, экология, образование, социальные проекты и другие.",
        3,
    ),
];

const PARTNERS: &[(&str, &str, &str)] = &[
    (
        "Белорусский государственный университет информатики и радиоэлектроники",
        "Ведущий технический университет Беларуси",
        "https://www.bsuir.by",
    ),
    (
        "Парк высоких технологий",
        "Крупнейший IT-кластер в регионе",
        "https://www.park.by",
    ),
];

const SUBMISSION_TITLE: &str = "СТАРТЛАБ: заявка на участие";
const FORM_NAMES: &[&str] = &["Направление: наука", "Направление: стартап"];
const QUESTIONS: &[&str] = &[
    "Название проекта",
    "Цель проекта",
    "Описание проекта",
    "Ожидаемые результаты",
    "Бюджет проекта (BYN)",
];

/// Rows inserted by one seeding run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub faqs: u64,
    pub partners: u64,
    pub forms: u64,
    pub questions: u64,
}

/// Insert demo rows that are not present yet.
pub async fn run(pool: &PgPool) -> Result<SeedReport, sqlx::Error> {
    let mut report = SeedReport::default();
    let mut tx = pool.begin().await?;

    for (question, answer, order) in FAQS {
        report.faqs += sqlx::query(
            r#"
            INSERT INTO faqs (question, answer, "order", is_active)
            SELECT $1, $2, $3, TRUE
            WHERE NOT EXISTS (SELECT 1 FROM faqs WHERE question = $1)
            "#,
        )
        .bind(question)
        .bind(answer)
        .bind(order)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    for (name, description, website) in PARTNERS {
        report.partners += sqlx::query(
            r#"
            INSERT INTO partners (name, description, website, is_active)
            SELECT $1, $2, $3, TRUE
            WHERE NOT EXISTS (SELECT 1 FROM partners WHERE name = $1)
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(website)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    seed_questionnaire(&mut tx, &mut report).await?;

    tx.commit().await?;
    tracing::info!(
        faqs = report.faqs,
        partners = report.partners,
        forms = report.forms,
        questions = report.questions,
        "Seed complete"
    );
    Ok(report)
}

async fn seed_questionnaire(
    tx: &mut Transaction<'_, Postgres>,
    report: &mut SeedReport,
) -> Result<(), sqlx::Error> {
    let existing: Option<i32> =
        sqlx::query_scalar("SELECT id FROM submissions WHERE title = $1 ORDER BY id LIMIT 1")
            .bind(SUBMISSION_TITLE)
            .fetch_optional(&mut **tx)
            .await?;
    if existing.is_some() {
        return Ok(());
    }

    let submission_id: i32 =
        sqlx::query_scalar("INSERT INTO submissions (title) VALUES ($1) RETURNING id")
            .bind(SUBMISSION_TITLE)
            .fetch_one(&mut **tx)
            .await?;

    let mut question_ids = Vec::with_capacity(QUESTIONS.len());
    for (order, text) in (1..).zip(QUESTIONS) {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO submission_questions (submission_id, question_text, question_order)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(submission_id)
        .bind(text)
        .bind(order)
        .fetch_one(&mut **tx)
        .await?;
        question_ids.push((id, *text));
    }

    for name in FORM_NAMES {
        let form_id: i32 = sqlx::query_scalar(
            "INSERT INTO forms (submission_id, name) VALUES ($1, $2) RETURNING id",
        )
        .bind(submission_id)
        .bind(name)
        .fetch_one(&mut **tx)
        .await?;
        report.forms += 1;

        for (question_id, text) in &question_ids {
            sqlx::query(
                r#"
                INSERT INTO form_questions (form_id, submission_question_id, question_text)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(form_id)
            .bind(question_id)
            .bind(text)
            .execute(&mut **tx)
            .await?;
            report.questions += 1;
        }
    }

    Ok(())
}
