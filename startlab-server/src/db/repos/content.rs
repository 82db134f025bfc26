//! Site content: FAQ, news, partners
//!
//! Only active rows are ever returned, including lookups by id.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use super::DbError;

pub(crate) const FAQ_LIST_SQL: &str = r#"
    SELECT id, question, answer, "order", is_active, image, created_at
    FROM faqs
    WHERE is_active = TRUE
    ORDER BY "order", id
"#;

const FAQ_GET_SQL: &str = r#"
    SELECT id, question, answer, "order", is_active, image, created_at
    FROM faqs
    WHERE id = $1 AND is_active = TRUE
"#;

pub(crate) const NEWS_LIST_SQL: &str = r#"
    SELECT id, title, content, image, is_active, created_at, updated_at
    FROM news
    WHERE is_active = TRUE
    ORDER BY created_at DESC, id DESC
"#;

const NEWS_GET_SQL: &str = r#"
    SELECT id, title, content, image, is_active, created_at, updated_at
    FROM news
    WHERE id = $1 AND is_active = TRUE
"#;

pub(crate) const PARTNER_LIST_SQL: &str = r#"
    SELECT id, name, title, logo, description, website, is_active, created_at
    FROM partners
    WHERE is_active = TRUE
    ORDER BY name, id
"#;

const PARTNER_GET_SQL: &str = r#"
    SELECT id, name, title, logo, description, website, is_active, created_at
    FROM partners
    WHERE id = $1 AND is_active = TRUE
"#;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Faq {
    pub id: i32,
    pub question: String,
    pub answer: String,
    pub order: i32,
    pub is_active: bool,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NewsItem {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Partner {
    pub id: i32,
    pub name: String,
    pub title: Option<String>,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Content repository
pub struct ContentRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ContentRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Active FAQ entries by display order.
    pub async fn list_faqs(&self) -> Result<Vec<Faq>, DbError> {
        Ok(sqlx::query_as::<_, Faq>(FAQ_LIST_SQL)
            .fetch_all(self.pool)
            .await?)
    }

    pub async fn get_faq(&self, id: i32) -> Result<Faq, DbError> {
        sqlx::query_as::<_, Faq>(FAQ_GET_SQL)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("faq", id))
    }

    /// Active news, newest first.
    pub async fn list_news(&self) -> Result<Vec<NewsItem>, DbError> {
        Ok(sqlx::query_as::<_, NewsItem>(NEWS_LIST_SQL)
            .fetch_all(self.pool)
            .await?)
    }

    pub async fn get_news(&self, id: i32) -> Result<NewsItem, DbError> {
        sqlx::query_as::<_, NewsItem>(NEWS_GET_SQL)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("news", id))
    }

    /// Active partners by name.
    pub async fn list_partners(&self) -> Result<Vec<Partner>, DbError> {
        Ok(sqlx::query_as::<_, Partner>(PARTNER_LIST_SQL)
            .fetch_all(self.pool)
            .await?)
    }

    pub async fn get_partner(&self, id: i32) -> Result<Partner, DbError> {
        sqlx::query_as::<_, Partner>(PARTNER_GET_SQL)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("partner", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_by(sql: &str) -> &str {
        sql.split("ORDER BY").nth(1).map(str::trim).unwrap_or_default()
    }

    #[test]
    fn list_orderings() {
        assert_eq!(order_by(FAQ_LIST_SQL), r#""order", id"#);
        assert_eq!(order_by(NEWS_LIST_SQL), "created_at DESC, id DESC");
        assert_eq!(order_by(PARTNER_LIST_SQL), "name, id");
    }

    #[test]
    fn every_query_filters_inactive_rows() {
        for sql in [
            FAQ_LIST_SQL,
            FAQ_GET_SQL,
            NEWS_LIST_SQL,
            NEWS_GET_SQL,
            PARTNER_LIST_SQL,
            PARTNER_GET_SQL,
        ] {
            assert!(sql.contains("is_active = TRUE"), "{sql}");
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn faqs_come_back_in_display_order() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = PgPool::connect(&url).await.expect("connect failed");
        crate::db::migrations::run(&pool).await.expect("migrations failed");

        let faqs = ContentRepo::new(&pool).list_faqs().await.expect("list failed");
        assert!(faqs.windows(2).all(|w| w[0].order <= w[1].order));
        assert!(faqs.iter().all(|f| f.is_active));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn missing_partner_is_not_found() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = PgPool::connect(&url).await.expect("connect failed");
        crate::db::migrations::run(&pool).await.expect("migrations failed");

        let err = ContentRepo::new(&pool).get_partner(i32::MAX).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { resource: "partner", .. }));
    }
}
