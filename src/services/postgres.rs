use std::collections::{HashMap, HashSet};
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::core::CanonicalLead;
use crate::models::{Bid, Client, CreateBidRequest, Match, PipelineStage, Pro, ScoreBreakdown};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// PostgreSQL client for the matching schema.
///
/// Owns the pros/clients/bids/matches tables. Duplicate-match prevention is a
/// read-side existence check, not a constraint; callers run `match_exists`
/// before `create_match`.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, PostgresError> {
        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }

    /// Upsert a normalized lead by email.
    ///
    /// A new email inserts a fresh pro at the `new_lead` stage; an existing
    /// one refreshes profile fields without touching its pipeline stage.
    /// Returns the stored row and whether it was newly created.
    pub async fn upsert_pro(&self, lead: &CanonicalLead) -> Result<(Pro, bool), PostgresError> {
        let existing: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM pros WHERE email = $1")
                .bind(&lead.email)
                .fetch_optional(&self.pool)
                .await?;
        let created = existing.is_none();

        let query = r#"
            INSERT INTO pros (
                first_name, last_name, email, phone,
                cities, states, zips, counties, neighborhoods,
                latitude, longitude,
                transactions, volume, years_experience, interest_level,
                wants, qualification_score, source
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            ON CONFLICT (email)
            DO UPDATE SET
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                phone = EXCLUDED.phone,
                cities = EXCLUDED.cities,
                states = EXCLUDED.states,
                zips = EXCLUDED.zips,
                counties = EXCLUDED.counties,
                neighborhoods = EXCLUDED.neighborhoods,
                latitude = EXCLUDED.latitude,
                longitude = EXCLUDED.longitude,
                transactions = EXCLUDED.transactions,
                volume = EXCLUDED.volume,
                years_experience = EXCLUDED.years_experience,
                interest_level = EXCLUDED.interest_level,
                wants = EXCLUDED.wants,
                qualification_score = EXCLUDED.qualification_score,
                source = EXCLUDED.source,
                updated_at = NOW()
            RETURNING *
        "#;

        let pro: Pro = sqlx::query_as(query)
            .bind(&lead.first_name)
            .bind(&lead.last_name)
            .bind(&lead.email)
            .bind(&lead.phone)
            .bind(&lead.cities)
            .bind(&lead.states)
            .bind(&lead.zips)
            .bind(&lead.counties)
            .bind(&lead.neighborhoods)
            .bind(lead.latitude)
            .bind(lead.longitude)
            .bind(lead.transactions)
            .bind(lead.volume)
            .bind(lead.years_experience)
            .bind(lead.interest_level)
            .bind(&lead.wants)
            .bind(lead.qualification_score)
            .bind(&lead.source)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!(
            "Upserted pro {} (created: {}, qualification: {})",
            pro.email,
            created,
            pro.qualification_score
        );

        Ok((pro, created))
    }

    /// Fetch a pro by id
    pub async fn get_pro(&self, id: Uuid) -> Result<Pro, PostgresError> {
        sqlx::query_as("SELECT * FROM pros WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PostgresError::NotFound(format!("pro {}", id)))
    }

    /// List pros, optionally filtered to one pipeline stage (kanban column)
    pub async fn list_pros(
        &self,
        stage: Option<PipelineStage>,
    ) -> Result<Vec<Pro>, PostgresError> {
        let pros = match stage {
            Some(stage) => {
                sqlx::query_as(
                    "SELECT * FROM pros WHERE pipeline_stage = $1 ORDER BY created_at DESC",
                )
                .bind(stage)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as("SELECT * FROM pros ORDER BY created_at DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(pros)
    }

    /// Move a pro to a new pipeline stage
    pub async fn update_stage(
        &self,
        id: Uuid,
        stage: PipelineStage,
    ) -> Result<Pro, PostgresError> {
        sqlx::query_as(
            "UPDATE pros SET pipeline_stage = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(stage)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| PostgresError::NotFound(format!("pro {}", id)))
    }

    /// Fetch a client by id
    pub async fn get_client(&self, id: Uuid) -> Result<Client, PostgresError> {
        sqlx::query_as("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PostgresError::NotFound(format!("client {}", id)))
    }

    /// Create a standing bid for a client
    pub async fn create_bid(&self, req: &CreateBidRequest) -> Result<Bid, PostgresError> {
        let territory = req.territory.as_ref().map(|ring| Json(ring.clone()));

        let query = r#"
            INSERT INTO bids (
                client_id, amount, zips, neighborhoods, cities, states,
                territory, min_transactions, min_volume, min_experience
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
        "#;

        let bid: Bid = sqlx::query_as(query)
            .bind(req.client_id)
            .bind(req.amount)
            .bind(&req.zips)
            .bind(&req.neighborhoods)
            .bind(&req.cities)
            .bind(&req.states)
            .bind(territory)
            .bind(req.min_transactions)
            .bind(req.min_volume)
            .bind(req.min_experience)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!("Created bid {} for client {}", bid.id, bid.client_id);

        Ok(bid)
    }

    /// Fetch a bid by id
    pub async fn get_bid(&self, id: Uuid) -> Result<Bid, PostgresError> {
        sqlx::query_as("SELECT * FROM bids WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PostgresError::NotFound(format!("bid {}", id)))
    }

    /// List bids, optionally for one client
    pub async fn list_bids(&self, client_id: Option<Uuid>) -> Result<Vec<Bid>, PostgresError> {
        let bids = match client_id {
            Some(client_id) => {
                sqlx::query_as(
                    "SELECT * FROM bids WHERE client_id = $1 ORDER BY created_at DESC",
                )
                .bind(client_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as("SELECT * FROM bids ORDER BY created_at DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(bids)
    }

    /// Deactivate a bid; returns whether a row changed
    pub async fn deactivate_bid(&self, id: Uuid) -> Result<bool, PostgresError> {
        let result = sqlx::query("UPDATE bids SET active = FALSE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Every active bid paired with its owning client.
    ///
    /// Two queries joined in memory; the bid book is small enough that this
    /// beats a wide join row.
    pub async fn active_bids_with_clients(&self) -> Result<Vec<(Bid, Client)>, PostgresError> {
        let bids: Vec<Bid> =
            sqlx::query_as("SELECT * FROM bids WHERE active = TRUE ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        if bids.is_empty() {
            return Ok(vec![]);
        }

        let client_ids: Vec<Uuid> = bids
            .iter()
            .map(|b| b.client_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let clients: Vec<Client> = sqlx::query_as("SELECT * FROM clients WHERE id = ANY($1)")
            .bind(&client_ids)
            .fetch_all(&self.pool)
            .await?;

        let by_id: HashMap<Uuid, Client> =
            clients.into_iter().map(|c| (c.id, c)).collect();

        Ok(bids
            .into_iter()
            .filter_map(|bid| by_id.get(&bid.client_id).cloned().map(|c| (bid, c)))
            .collect())
    }

    /// The single pre-insert existence check for a pro/bid pair.
    pub async fn match_exists(&self, pro_id: Uuid, bid_id: Uuid) -> Result<bool, PostgresError> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM matches WHERE pro_id = $1 AND bid_id = $2)",
        )
        .bind(pro_id)
        .bind(bid_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Insert a match, deduct the bid amount from the client's credits, and
    /// advance the pro to the `matched` stage, all in one transaction.
    pub async fn create_match(
        &self,
        pro_id: Uuid,
        bid_id: Uuid,
        client_id: Uuid,
        score: i32,
        breakdown: &ScoreBreakdown,
        amount: i64,
    ) -> Result<Match, PostgresError> {
        let mut tx = self.pool.begin().await?;

        let record: Match = sqlx::query_as(
            r#"
            INSERT INTO matches (pro_id, bid_id, client_id, status, score, breakdown)
            VALUES ($1, $2, $3, 'pending', $4, $5)
            RETURNING *
            "#,
        )
        .bind(pro_id)
        .bind(bid_id)
        .bind(client_id)
        .bind(score)
        .bind(Json(breakdown.clone()))
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE clients SET credits = credits - $1 WHERE id = $2")
            .bind(amount)
            .bind(client_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE pros SET pipeline_stage = 'matched', updated_at = NOW() WHERE id = $1",
        )
        .bind(pro_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            "Created match {} (pro {}, bid {}, score {})",
            record.id,
            pro_id,
            bid_id,
            score
        );

        Ok(record)
    }

    /// List matches for a pro or a client
    pub async fn list_matches(
        &self,
        pro_id: Option<Uuid>,
        client_id: Option<Uuid>,
    ) -> Result<Vec<Match>, PostgresError> {
        let matches = match (pro_id, client_id) {
            (Some(pro_id), _) => {
                sqlx::query_as(
                    "SELECT * FROM matches WHERE pro_id = $1 ORDER BY created_at DESC",
                )
                .bind(pro_id)
                .fetch_all(&self.pool)
                .await?
            }
            (None, Some(client_id)) => {
                sqlx::query_as(
                    "SELECT * FROM matches WHERE client_id = $1 ORDER BY created_at DESC",
                )
                .bind(client_id)
                .fetch_all(&self.pool)
                .await?
            }
            (None, None) => {
                return Err(PostgresError::InvalidInput(
                    "proId or clientId is required".to_string(),
                ));
            }
        };
        Ok(matches)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
