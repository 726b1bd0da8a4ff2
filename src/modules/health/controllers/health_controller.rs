use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use tracing::error;

/// Tables the permission and report endpoints read from
pub const REQUIRED_TABLES: [&str; 5] = [
    "tb_permission",
    "tb_role_permission",
    "tb_user_role",
    "tb_fee_item",
    "tb_payment_record",
];

#[derive(Debug, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    /// Pool answered `SELECT 1`
    pub database: bool,
    /// Every table in [`REQUIRED_TABLES`] exists
    pub schema: bool,
}

/// GET /health
///
/// Liveness only; never touches the database.
pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok().json(LivenessResponse {
        status: "alive".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// GET /ready
///
/// 503 until the database is reachable and migrations have created the
/// campus tables.
pub async fn readiness(pool: web::Data<MySqlPool>) -> HttpResponse {
    let database = match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => true,
        Err(e) => {
            error!(error = %e, "Database ping failed");
            false
        }
    };

    let schema = database && schema_present(pool.get_ref()).await;
    let response = ReadinessResponse {
        ready: database && schema,
        database,
        schema,
    };

    if response.ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

async fn schema_present(pool: &MySqlPool) -> bool {
    let placeholders = vec!["?"; REQUIRED_TABLES.len()].join(", ");
    let sql = format!(
        "SELECT COUNT(*) FROM information_schema.tables \
         WHERE table_schema = DATABASE() AND table_name IN ({})",
        placeholders
    );

    let mut query = sqlx::query_scalar::<_, i64>(&sql);
    for table in REQUIRED_TABLES {
        query = query.bind(table);
    }

    match query.fetch_one(pool).await {
        Ok(found) => found == REQUIRED_TABLES.len() as i64,
        Err(e) => {
            error!(error = %e, "Schema check failed");
            false
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(liveness))
        .route("/ready", web::get().to(readiness));
}
