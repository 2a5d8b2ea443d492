use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::ApplicationStore;
use crate::dto::application_dto::ApplicationFilter;
use crate::error::{Error, Result};
use crate::models::application::{Application, ApplicationStatus, NewApplication, Role};

const COLUMNS: &str = "id, legal_name, email, contact_number, resume_link, role, justification, status, created_at, updated_at";

#[derive(Clone)]
pub struct PgApplicationStore {
    pool: PgPool,
}

impl PgApplicationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationStore for PgApplicationStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Application>> {
        let query = format!("SELECT {} FROM applications WHERE id = $1", COLUMNS);
        let application = sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(application)
    }

    async fn find_duplicate(
        &self,
        contact_number: &str,
        legal_name: &str,
    ) -> Result<Option<Application>> {
        let query = format!(
            "SELECT {} FROM applications WHERE contact_number = $1 OR legal_name = $2 LIMIT 1",
            COLUMNS
        );
        let application = sqlx::query_as::<_, Application>(&query)
            .bind(contact_number)
            .bind(legal_name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(application)
    }

    async fn list(&self, filter: &ApplicationFilter) -> Result<(Vec<Application>, i64)> {
        let mut filters = Vec::new();
        let mut args: Vec<String> = Vec::new();

        if let Some(status) = filter.status {
            filters.push(format!("status::text = ${}", args.len() + 1));
            args.push(status.as_str().to_string());
        }
        if let Some(role) = filter.role {
            filters.push(format!("role::text = ${}", args.len() + 1));
            args.push(role.as_str().to_string());
        }
        if let Some(search) = &filter.search {
            let first = args.len() + 1;
            let second = first + 1;
            filters.push(format!(
                "(legal_name ILIKE ${first} ESCAPE '\\' OR email ILIKE ${first} ESCAPE '\\' \
                 OR contact_number LIKE ${second} ESCAPE '\\')"
            ));
            let pattern = contains_pattern(search);
            args.push(pattern.clone());
            args.push(pattern);
        }

        let where_clause = if filters.is_empty() {
            "".to_string()
        } else {
            format!("WHERE {}", filters.join(" AND "))
        };

        let items_query = format!(
            "SELECT {} FROM applications {} ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            COLUMNS,
            where_clause,
            args.len() + 1,
            args.len() + 2
        );
        let total_query = format!("SELECT COUNT(*) FROM applications {}", where_clause);

        let mut items_statement = sqlx::query_as::<_, Application>(&items_query);
        for value in &args {
            items_statement = items_statement.bind(value);
        }
        items_statement = items_statement.bind(filter.limit).bind(filter.offset);
        let items = items_statement.fetch_all(&self.pool).await?;

        let mut total_statement = sqlx::query_scalar::<_, i64>(&total_query);
        for value in &args {
            total_statement = total_statement.bind(value);
        }
        let total = total_statement.fetch_one(&self.pool).await?;

        Ok((items, total))
    }

    async fn create(&self, draft: NewApplication) -> Result<Application> {
        let record = draft.into_record(Utc::now());
        let query = format!(
            "INSERT INTO applications ({cols}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {cols}",
            cols = COLUMNS
        );
        // unique_violation on either identity column surfaces as Error::Conflict
        let application = sqlx::query_as::<_, Application>(&query)
            .bind(record.id)
            .bind(&record.legal_name)
            .bind(&record.email)
            .bind(&record.contact_number)
            .bind(&record.resume_link)
            .bind(record.role)
            .bind(&record.justification)
            .bind(record.status)
            .bind(record.created_at)
            .bind(record.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(application)
    }

    async fn update_status(
        &self,
        id: Uuid,
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> Result<Application> {
        let query = format!(
            "UPDATE applications SET status = $3, updated_at = NOW() WHERE id = $1 AND status = $2 RETURNING {}",
            COLUMNS
        );
        let updated = sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .bind(from)
            .bind(to)
            .fetch_optional(&self.pool)
            .await?;

        match updated {
            Some(application) => Ok(application),
            None => match self.find_by_id(id).await? {
                Some(current) => Err(Error::InvalidTransition {
                    from: current.status,
                    to,
                }),
                None => Err(Error::NotFound("Application not found".to_string())),
            },
        }
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let res = sqlx::query("DELETE FROM applications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Application not found".to_string()));
        }
        Ok(())
    }

    async fn count(&self, status: Option<ApplicationStatus>) -> Result<i64> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM applications WHERE $1::application_status IS NULL OR status = $1",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    async fn group_count_by_role(&self) -> Result<BTreeMap<Role, i64>> {
        let rows = sqlx::query_as::<_, (Role, i64)>(
            "SELECT role, COUNT(*) AS count FROM applications GROUP BY role",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().collect())
    }
}

/// Wraps a search term in `%...%`, escaping LIKE metacharacters so it matches literally.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
