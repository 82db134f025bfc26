//! Application intake persistence
//!
//! Each submission is written in one transaction: either every row sharing
//! the content hash is stored, or none is.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use startlab_core::intake::{
    first_attachment, FlatApplication, FlatIntake, FormApplication, ScienceApplication,
    StartupApplication, SupervisorContact, TeamMember,
};

use super::DbError;

const INSERT_SCIENCE_SQL: &str = r#"
    INSERT INTO answers (
        "title", "relevance", "goal", "tasks", "description", "expectedResults",
        "marketAssessment", "competitionAnalysis", "budgetBYN", "timeline",
        "label", "url", "additionalInfo", "sha256"
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
"#;

const INSERT_STARTUP_SQL: &str = r#"
    INSERT INTO answer_2 (
        "title", "problemStatementShort", "goal", "stageAndNextSteps", "description",
        "founderMotivationAndExpertise", "expectedResults", "benefitForBelarus",
        "marketAssessment", "monetization", "competitionAnalysis", "budgetBYN",
        "needsInvestmentNow", "timeline", "label", "url", "additionalInfo", "sha256"
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
"#;

const INSERT_TEAM_SQL: &str = r#"
    INSERT INTO team (
        "lastName", "firstName", "middleName", "faculty", "group",
        "phone", "email", "keySkills", "role", "sha256"
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
"#;

const INSERT_FLAT_SUPERVISOR_SQL: &str = r#"
    INSERT INTO supervisor_2 ("fullName", "academicTitle", "position", "phone", "email", "sha256")
    VALUES ($1, $2, $3, $4, $5, $6)
"#;

/// Row of `answers` (science)
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScienceRow {
    pub id: i32,
    pub title: Option<String>,
    pub relevance: Option<String>,
    pub goal: Option<String>,
    pub tasks: Option<String>,
    pub description: Option<String>,
    pub expected_results: Option<String>,
    pub market_assessment: Option<String>,
    pub competition_analysis: Option<String>,
    #[serde(rename = "budgetBYN")]
    pub budget_byn: Option<String>,
    pub timeline: Option<String>,
    pub label: Option<String>,
    pub url: Option<String>,
    pub additional_info: Option<String>,
    pub sha256: Option<String>,
    #[serde(rename = "created_at")]
    pub created_at: DateTime<Utc>,
}

/// Row of `answer_2` (startup)
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartupRow {
    pub id: i32,
    pub title: Option<String>,
    pub problem_statement_short: Option<String>,
    pub goal: Option<String>,
    pub stage_and_next_steps: Option<String>,
    pub description: Option<String>,
    pub founder_motivation_and_expertise: Option<String>,
    pub expected_results: Option<String>,
    pub benefit_for_belarus: Option<String>,
    pub market_assessment: Option<String>,
    pub monetization: Option<String>,
    pub competition_analysis: Option<String>,
    #[serde(rename = "budgetBYN")]
    pub budget_byn: Option<String>,
    pub needs_investment_now: Option<String>,
    pub timeline: Option<String>,
    pub label: Option<String>,
    pub url: Option<String>,
    pub additional_info: Option<String>,
    pub sha256: Option<String>,
    #[serde(rename = "created_at")]
    pub created_at: DateTime<Utc>,
}

/// Row of `team`
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRow {
    pub id: i32,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub faculty: Option<String>,
    pub group: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub key_skills: Option<String>,
    pub role: Option<String>,
}

/// Row of `supervisor_2`
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatSupervisorRow {
    pub id: i32,
    pub full_name: Option<String>,
    pub academic_title: Option<String>,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Row of `form_answers` with its question text
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FormAnswerRow {
    pub id: i32,
    pub form_question_id: i32,
    pub question_text: String,
    pub answer_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Row of `participants`
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ParticipantRow {
    pub id: i32,
    pub form_id: i32,
    pub last_name: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub faculty: Option<String>,
    pub student_group: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub key_competencies: Option<String>,
    pub role_in_implementation: Option<String>,
}

/// Row of `supervisors`
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FormSupervisorRow {
    pub id: i32,
    pub form_id: i32,
    pub last_name: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub academic_rank: Option<String>,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Every row stored under one content hash
#[derive(Debug, Clone, Default, Serialize)]
pub struct ApplicationGroup {
    pub sha256: String,
    pub science: Vec<ScienceRow>,
    pub startup: Vec<StartupRow>,
    pub team: Vec<TeamRow>,
    pub supervisors: Vec<FlatSupervisorRow>,
    pub form_answers: Vec<FormAnswerRow>,
    pub participants: Vec<ParticipantRow>,
    pub form_supervisors: Vec<FormSupervisorRow>,
}

impl ApplicationGroup {
    pub fn is_empty(&self) -> bool {
        self.science.is_empty()
            && self.startup.is_empty()
            && self.team.is_empty()
            && self.supervisors.is_empty()
            && self.form_answers.is_empty()
            && self.participants.is_empty()
            && self.form_supervisors.is_empty()
    }
}

/// Intake repository
pub struct IntakeRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> IntakeRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a flat application: answers row, team rows, supervisor row.
    pub async fn save_flat(&self, intake: &FlatIntake) -> Result<(), DbError> {
        let hash = intake.sha256.as_str();
        let mut tx = self.pool.begin().await?;

        match &intake.application {
            FlatApplication::Science(app) => insert_science(&mut tx, app, hash).await?,
            FlatApplication::Startup(app) => insert_startup(&mut tx, app, hash).await?,
        }
        for member in intake.application.team() {
            insert_team_member(&mut tx, member, hash).await?;
        }
        if let Some(supervisor) = intake.application.supervisor() {
            insert_flat_supervisor(&mut tx, supervisor, hash).await?;
        }

        tx.commit().await?;
        tracing::info!(
            kind = %intake.kind(),
            sha256 = %hash,
            team = intake.application.team().len(),
            "Stored flat application"
        );
        Ok(())
    }

    /// Store a form-based application: answers, participants, supervisor.
    pub async fn save_form(
        &self,
        form_id: i32,
        app: &FormApplication,
        hash: &str,
    ) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        for answer in &app.answers {
            sqlx::query(
                "INSERT INTO form_answers (form_question_id, answer_text, sha256_hash) VALUES ($1, $2, $3)",
            )
            .bind(answer.form_question_id)
            .bind(&answer.answer_text)
            .bind(hash)
            .execute(&mut *tx)
            .await?;
        }

        for p in &app.participants {
            sqlx::query(
                r#"
                INSERT INTO participants (
                    form_id, last_name, first_name, middle_name, faculty, student_group,
                    phone, email, key_competencies, role_in_implementation, sha256_hash
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                "#,
            )
            .bind(form_id)
            .bind(&p.last_name)
            .bind(&p.first_name)
            .bind(&p.middle_name)
            .bind(&p.faculty)
            .bind(&p.student_group)
            .bind(&p.phone)
            .bind(&p.email)
            .bind(&p.key_competencies)
            .bind(&p.role_in_implementation)
            .bind(hash)
            .execute(&mut *tx)
            .await?;
        }

        if let Some(s) = &app.supervisor {
            sqlx::query(
                r#"
                INSERT INTO supervisors (
                    form_id, last_name, first_name, middle_name, academic_rank,
                    position, phone, email, sha256_hash
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(form_id)
            .bind(&s.last_name)
            .bind(&s.first_name)
            .bind(&s.middle_name)
            .bind(&s.academic_rank)
            .bind(&s.position)
            .bind(&s.phone)
            .bind(&s.email)
            .bind(hash)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::info!(
            kind = %app.kind,
            form_id,
            sha256 = %hash,
            answers = app.answers.len(),
            participants = app.participants.len(),
            "Stored form application"
        );
        Ok(())
    }

    /// Load every row written under `hash`. `NotFound` when there are none.
    pub async fn find_group(&self, hash: &str) -> Result<ApplicationGroup, DbError> {
        let science = sqlx::query_as::<_, ScienceRow>(
            r#"
            SELECT id, "title" AS title, "relevance" AS relevance, "goal" AS goal,
                   "tasks" AS tasks, "description" AS description,
                   "expectedResults" AS expected_results,
                   "marketAssessment" AS market_assessment,
                   "competitionAnalysis" AS competition_analysis,
                   "budgetBYN" AS budget_byn, "timeline" AS timeline,
                   "label" AS label, "url" AS url, "additionalInfo" AS additional_info,
                   "sha256" AS sha256, created_at
            FROM answers
            WHERE "sha256" = $1
            ORDER BY id
            "#,
        )
        .bind(hash)
        .fetch_all(self.pool)
        .await?;

        let startup = sqlx::query_as::<_, StartupRow>(
            r#"
            SELECT id, "title" AS title,
                   "problemStatementShort" AS problem_statement_short,
                   "goal" AS goal, "stageAndNextSteps" AS stage_and_next_steps,
                   "description" AS description,
                   "founderMotivationAndExpertise" AS founder_motivation_and_expertise,
                   "expectedResults" AS expected_results,
                   "benefitForBelarus" AS benefit_for_belarus,
                   "marketAssessment" AS market_assessment,
                   "monetization" AS monetization,
                   "competitionAnalysis" AS competition_analysis,
                   "budgetBYN" AS budget_byn,
                   "needsInvestmentNow" AS needs_investment_now,
                   "timeline" AS timeline, "label" AS label, "url" AS url,
                   "additionalInfo" AS additional_info, "sha256" AS sha256, created_at
            FROM answer_2
            WHERE "sha256" = $1
            ORDER BY id
            "#,
        )
        .bind(hash)
        .fetch_all(self.pool)
        .await?;

        let team = sqlx::query_as::<_, TeamRow>(
            r#"
            SELECT id, "lastName" AS last_name, "firstName" AS first_name,
                   "middleName" AS middle_name, "faculty" AS faculty, "group" AS "group",
                   "phone" AS phone, "email" AS email, "keySkills" AS key_skills,
                   "role" AS role
            FROM team
            WHERE "sha256" = $1
            ORDER BY id
            "#,
        )
        .bind(hash)
        .fetch_all(self.pool)
        .await?;

        let supervisors = sqlx::query_as::<_, FlatSupervisorRow>(
            r#"
            SELECT id, "fullName" AS full_name, "academicTitle" AS academic_title,
                   "position" AS position, "phone" AS phone, "email" AS email
            FROM supervisor_2
            WHERE "sha256" = $1
            ORDER BY id
            "#,
        )
        .bind(hash)
        .fetch_all(self.pool)
        .await?;

        let form_answers = sqlx::query_as::<_, FormAnswerRow>(
            r#"
            SELECT fa.id, fa.form_question_id, fq.question_text, fa.answer_text, fa.created_at
            FROM form_answers fa
            JOIN form_questions fq ON fq.id = fa.form_question_id
            WHERE fa.sha256_hash = $1
            ORDER BY fa.id
            "#,
        )
        .bind(hash)
        .fetch_all(self.pool)
        .await?;

        let participants = sqlx::query_as::<_, ParticipantRow>(
            r#"
            SELECT id, form_id, last_name, first_name, middle_name, faculty, student_group,
                   phone, email, key_competencies, role_in_implementation
            FROM participants
            WHERE sha256_hash = $1
            ORDER BY id
            "#,
        )
        .bind(hash)
        .fetch_all(self.pool)
        .await?;

        let form_supervisors = sqlx::query_as::<_, FormSupervisorRow>(
            r#"
            SELECT id, form_id, last_name, first_name, middle_name, academic_rank,
                   position, phone, email
            FROM supervisors
            WHERE sha256_hash = $1
            ORDER BY id
            "#,
        )
        .bind(hash)
        .fetch_all(self.pool)
        .await?;

        let group = ApplicationGroup {
            sha256: hash.to_owned(),
            science,
            startup,
            team,
            supervisors,
            form_answers,
            participants,
            form_supervisors,
        };
        if group.is_empty() {
            return Err(DbError::not_found("application", hash));
        }
        Ok(group)
    }
}

async fn insert_science(
    tx: &mut Transaction<'_, Postgres>,
    app: &ScienceApplication,
    hash: &str,
) -> Result<(), DbError> {
    let (label, url) = first_attachment(&app.attachments);
    sqlx::query(INSERT_SCIENCE_SQL)
        .bind(&app.title)
        .bind(&app.relevance)
        .bind(&app.goal)
        .bind(&app.tasks)
        .bind(&app.description)
        .bind(&app.expected_results)
        .bind(&app.market_assessment)
        .bind(&app.competition_analysis)
        .bind(&app.budget_byn)
        .bind(&app.timeline)
        .bind(label)
        .bind(url)
        .bind(&app.additional_info)
        .bind(hash)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

async fn insert_startup(
    tx: &mut Transaction<'_, Postgres>,
    app: &StartupApplication,
    hash: &str,
) -> Result<(), DbError> {
    let (label, url) = first_attachment(&app.attachments);
    sqlx::query(INSERT_STARTUP_SQL)
        .bind(&app.title)
        .bind(&app.problem_statement_short)
        .bind(&app.goal)
        .bind(&app.stage_and_next_steps)
        .bind(&app.description)
        .bind(&app.founder_motivation_and_expertise)
        .bind(&app.expected_results)
        .bind(&app.benefit_for_belarus)
        .bind(&app.market_assessment)
        .bind(&app.monetization)
        .bind(&app.competition_analysis)
        .bind(&app.budget_byn)
        .bind(&app.needs_investment_now)
        .bind(&app.timeline)
        .bind(label)
        .bind(url)
        .bind(&app.additional_info)
        .bind(hash)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

async fn insert_team_member(
    tx: &mut Transaction<'_, Postgres>,
    member: &TeamMember,
    hash: &str,
) -> Result<(), DbError> {
    let name = member.name_parts();
    sqlx::query(INSERT_TEAM_SQL)
        .bind(name.last_name)
        .bind(name.first_name)
        .bind(name.middle_name)
        .bind(&member.faculty)
        .bind(&member.group)
        .bind(&member.phone)
        .bind(&member.email)
        .bind(&member.key_skills)
        .bind(&member.role)
        .bind(hash)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

async fn insert_flat_supervisor(
    tx: &mut Transaction<'_, Postgres>,
    supervisor: &SupervisorContact,
    hash: &str,
) -> Result<(), DbError> {
    sqlx::query(INSERT_FLAT_SUPERVISOR_SQL)
        .bind(&supervisor.full_name)
        .bind(&supervisor.academic_title)
        .bind(&supervisor.position)
        .bind(&supervisor.phone)
        .bind(&supervisor.email)
        .bind(hash)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn placeholders(sql: &str) -> usize {
        (1..=30).filter(|n| sql.contains(&format!("${n}"))).count()
    }

    fn columns(sql: &str) -> usize {
        let start = sql.find('(').unwrap_or_default();
        let end = sql.find(')').unwrap_or_default();
        sql[start..end].matches('"').count() / 2
    }

    #[test]
    fn insert_arity_matches() {
        for sql in [
            INSERT_SCIENCE_SQL,
            INSERT_STARTUP_SQL,
            INSERT_TEAM_SQL,
            INSERT_FLAT_SUPERVISOR_SQL,
        ] {
            assert_eq!(columns(sql), placeholders(sql), "{sql}");
        }
        assert_eq!(placeholders(INSERT_SCIENCE_SQL), 14);
        assert_eq!(placeholders(INSERT_STARTUP_SQL), 18);
    }

    #[test]
    fn empty_group() {
        assert!(ApplicationGroup::default().is_empty());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn flat_application_round_trip() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = PgPool::connect(&url).await.expect("connect failed");
        crate::db::migrations::run(&pool).await.expect("migrations failed");

        let ts = NaiveDate::from_ymd_opt(2025, 1, 2)
            .unwrap()
            .and_hms_micro_opt(3, 4, 5, 678_901)
            .unwrap();
        let payload = json!({
            "type": "science",
            "title": "Round trip",
            "team": [{"fullName": "Иванов Иван Иванович"}, {"fullName": "Solo"}],
            "supervisor": {"fullName": "Петров П. П."},
            "attachments": [{"label": "Нет", "url": "https://example.org"}]
        });
        let intake = FlatIntake::science(&payload, ts).unwrap();

        let repo = IntakeRepo::new(&pool);
        repo.save_flat(&intake).await.expect("save failed");

        let group = repo.find_group(&intake.sha256).await.expect("group");
        assert_eq!(group.science.len(), 1);
        assert_eq!(group.science[0].label.as_deref(), Some("Нет"));
        assert_eq!(group.team.len(), 2);
        assert_eq!(group.team[1].last_name, None);
        assert_eq!(group.team[1].first_name.as_deref(), Some("Solo"));
        assert_eq!(group.supervisors.len(), 1);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn unknown_hash_is_not_found() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = PgPool::connect(&url).await.expect("connect failed");
        crate::db::migrations::run(&pool).await.expect("migrations failed");

        let err = IntakeRepo::new(&pool)
            .find_group(&"0".repeat(64))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { resource: "application", .. }));
    }
}
