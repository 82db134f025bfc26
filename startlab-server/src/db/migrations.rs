//! Schema migrations
//!
//! Every statement is idempotent, so `run` is safe on each startup.
//! Flat intake tables keep the camelCase column names the public site
//! already reads; they must be quoted in SQL.

use sqlx::PgPool;

const CONTENT_TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS faqs (
        id SERIAL PRIMARY KEY,
        question TEXT NOT NULL,
        answer TEXT NOT NULL,
        "order" INTEGER NOT NULL DEFAULT 0,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        image VARCHAR(255),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS news (
        id SERIAL PRIMARY KEY,
        title VARCHAR(300) NOT NULL,
        content TEXT NOT NULL,
        image VARCHAR(255),
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS partners (
        id SERIAL PRIMARY KEY,
        name VARCHAR(200) NOT NULL,
        title VARCHAR(200),
        logo VARCHAR(255),
        description TEXT,
        website VARCHAR(255),
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
];

const FORM_TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS submissions (
        id SERIAL PRIMARY KEY,
        title VARCHAR(300) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS forms (
        id SERIAL PRIMARY KEY,
        submission_id INTEGER NOT NULL REFERENCES submissions(id) ON DELETE CASCADE,
        name VARCHAR(300) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS submission_questions (
        id SERIAL PRIMARY KEY,
        submission_id INTEGER NOT NULL REFERENCES submissions(id) ON DELETE CASCADE,
        question_text TEXT NOT NULL,
        question_order INTEGER NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS form_questions (
        id SERIAL PRIMARY KEY,
        form_id INTEGER NOT NULL REFERENCES forms(id) ON DELETE CASCADE,
        submission_question_id INTEGER NOT NULL REFERENCES submission_questions(id) ON DELETE CASCADE,
        question_text TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS form_answers (
        id SERIAL PRIMARY KEY,
        form_question_id INTEGER NOT NULL REFERENCES form_questions(id) ON DELETE CASCADE,
        answer_text TEXT,
        sha256_hash VARCHAR(64) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS participants (
        id SERIAL PRIMARY KEY,
        form_id INTEGER NOT NULL REFERENCES forms(id) ON DELETE CASCADE,
        last_name VARCHAR(100) NOT NULL,
        first_name VARCHAR(100) NOT NULL,
        middle_name VARCHAR(100),
        faculty VARCHAR(200),
        student_group VARCHAR(50),
        phone VARCHAR(50),
        email VARCHAR(150),
        key_competencies TEXT,
        role_in_implementation VARCHAR(200),
        sha256_hash VARCHAR(64) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS supervisors (
        id SERIAL PRIMARY KEY,
        form_id INTEGER NOT NULL REFERENCES forms(id) ON DELETE CASCADE,
        last_name VARCHAR(100) NOT NULL,
        first_name VARCHAR(100) NOT NULL,
        middle_name VARCHAR(100),
        academic_rank VARCHAR(200),
        position VARCHAR(200),
        phone VARCHAR(50),
        email VARCHAR(150),
        sha256_hash VARCHAR(64) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
];

const FLAT_TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS answers (
        id SERIAL PRIMARY KEY,
        "title" TEXT,
        "relevance" TEXT,
        "goal" TEXT,
        "tasks" TEXT,
        "description" TEXT,
        "expectedResults" TEXT,
        "marketAssessment" TEXT,
        "competitionAnalysis" TEXT,
        "budgetBYN" TEXT,
        "timeline" TEXT,
        "label" TEXT,
        "url" TEXT,
        "additionalInfo" TEXT,
        "sha256" VARCHAR(64),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS answer_2 (
        id SERIAL PRIMARY KEY,
        "title" TEXT,
        "problemStatementShort" TEXT,
        "goal" TEXT,
        "stageAndNextSteps" TEXT,
        "description" TEXT,
        "founderMotivationAndExpertise" TEXT,
        "expectedResults" TEXT,
        "benefitForBelarus" TEXT,
        "marketAssessment" TEXT,
        "monetization" TEXT,
        "competitionAnalysis" TEXT,
        "budgetBYN" TEXT,
        "needsInvestmentNow" TEXT,
        "timeline" TEXT,
        "label" TEXT,
        "url" TEXT,
        "additionalInfo" TEXT,
        "sha256" VARCHAR(64),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS team (
        id SERIAL PRIMARY KEY,
        "lastName" VARCHAR(255),
        "firstName" VARCHAR(255),
        "middleName" VARCHAR(255),
        "faculty" VARCHAR(255),
        "group" VARCHAR(255),
        "phone" VARCHAR(255),
        "email" VARCHAR(255),
        "keySkills" TEXT,
        "role" VARCHAR(255),
        "sha256" VARCHAR(64),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS supervisor_2 (
        id SERIAL PRIMARY KEY,
        "fullName" VARCHAR(255),
        "academicTitle" VARCHAR(255),
        "position" VARCHAR(255),
        "phone" VARCHAR(255),
        "email" VARCHAR(255),
        "sha256" VARCHAR(64),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
];

const INDEXES: &[&str] = &[
    r#"CREATE INDEX IF NOT EXISTS ix_faqs_order ON faqs("order")"#,
    "CREATE INDEX IF NOT EXISTS ix_news_created_at ON news(created_at)",
    "CREATE INDEX IF NOT EXISTS ix_partners_name ON partners(name)",
    "CREATE INDEX IF NOT EXISTS ix_forms_submission_id ON forms(submission_id)",
    "CREATE INDEX IF NOT EXISTS ix_submission_questions_submission_id ON submission_questions(submission_id)",
    "CREATE INDEX IF NOT EXISTS ix_submission_questions_order ON submission_questions(submission_id, question_order)",
    "CREATE INDEX IF NOT EXISTS ix_form_questions_form_id ON form_questions(form_id)",
    "CREATE INDEX IF NOT EXISTS ix_form_questions_submission_question_id ON form_questions(submission_question_id)",
    "CREATE INDEX IF NOT EXISTS ix_form_answers_form_question_id ON form_answers(form_question_id)",
    "CREATE INDEX IF NOT EXISTS ix_form_answers_sha256 ON form_answers(sha256_hash)",
    "CREATE INDEX IF NOT EXISTS ix_participants_form_id ON participants(form_id)",
    "CREATE INDEX IF NOT EXISTS ix_participants_sha256 ON participants(sha256_hash)",
    "CREATE INDEX IF NOT EXISTS ix_supervisors_form_id ON supervisors(form_id)",
    "CREATE INDEX IF NOT EXISTS ix_supervisors_sha256 ON supervisors(sha256_hash)",
    r#"CREATE INDEX IF NOT EXISTS ix_answers_sha256 ON answers("sha256")"#,
    r#"CREATE INDEX IF NOT EXISTS ix_answer_2_sha256 ON answer_2("sha256")"#,
    r#"CREATE INDEX IF NOT EXISTS ix_team_sha256 ON team("sha256")"#,
    r#"CREATE INDEX IF NOT EXISTS ix_supervisor_2_sha256 ON supervisor_2("sha256")"#,
];

/// Every statement, in dependency order.
pub fn statements() -> impl Iterator<Item = &'static str> {
    CONTENT_TABLES
        .iter()
        .chain(FORM_TABLES)
        .chain(FLAT_TABLES)
        .chain(INDEXES)
        .copied()
}

/// Create all tables and indexes that do not exist yet.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running database migrations...");

    let mut tx = pool.begin().await?;
    for sql in statements() {
        sqlx::query(sql).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    tracing::info!("Database migrations complete");
    Ok(())
}
