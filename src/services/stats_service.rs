use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;

use crate::{
    dto::stats::{DashboardStats, StatusCount, TopDish},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    response::ApiResponse,
    routes::params::StatsQuery,
    state::AppState,
    status::{OrderStatus, Vocabulary},
};

const TOP_DISHES: i64 = 5;
const DEFAULT_WINDOW_DAYS: i64 = 30;

#[derive(FromRow)]
struct StatusRow {
    status: String,
    count: i64,
}

#[derive(FromRow)]
struct TopDishRow {
    name: String,
    quantity: i64,
    revenue: i64,
}

/// Resolve the `[from, to)` window, defaulting to the last 30 days.
pub fn stats_window(query: &StatsQuery, now: DateTime<Utc>) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
    let to = query.to.unwrap_or(now);
    let from = query
        .from
        .unwrap_or_else(|| to - Duration::days(DEFAULT_WINDOW_DAYS));
    if from >= to {
        return Err(AppError::bad_request("la date de début doit précéder la date de fin"));
    }
    Ok((from, to))
}

pub fn average_basket(revenue: i64, paid_orders: i64) -> i64 {
    if paid_orders <= 0 { 0 } else { revenue / paid_orders }
}

pub async fn dashboard_stats(
    state: &AppState,
    user: &AuthUser,
    query: StatsQuery,
) -> AppResult<ApiResponse<DashboardStats>> {
    ensure_admin(user)?;
    let (from, to) = stats_window(&query, Utc::now())?;
    let stats = compute(state, from, to)
        .await
        .map_err(|e| e.context("Impossible de calculer les statistiques"))?;

    tracing::debug!(%from, %to, orders = stats.order_count, "dashboard stats computed");
    Ok(ApiResponse::ok("Statistiques", stats))
}

async fn compute(state: &AppState, from: DateTime<Utc>, to: DateTime<Utc>) -> AppResult<DashboardStats> {
    let status_rows = sqlx::query_as::<_, StatusRow>(
        r#"
        SELECT status::TEXT AS status, COUNT(*) AS count
        FROM orders
        WHERE created_at >= $1 AND created_at < $2
        GROUP BY status
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(&state.pool)
    .await?;

    // Every status is reported, zero when absent from the window.
    let orders_by_status: Vec<StatusCount> = OrderStatus::ALL
        .iter()
        .map(|status| StatusCount {
            status: *status,
            count: status_rows
                .iter()
                .find(|row| OrderStatus::from_db(&row.status) == Some(*status))
                .map(|row| row.count)
                .unwrap_or(0),
        })
        .collect();
    let order_count = orders_by_status.iter().map(|s| s.count).sum();

    let (revenue, billed_orders): (i64, i64) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(total_amount), 0)::BIGINT, COUNT(*)
        FROM orders
        WHERE created_at >= $1 AND created_at < $2
          AND status <> 'annulee'
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_one(&state.pool)
    .await?;

    let (client_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM clients")
        .fetch_one(&state.pool)
        .await?;

    let (new_clients,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM clients WHERE created_at >= $1 AND created_at < $2")
            .bind(from)
            .bind(to)
            .fetch_one(&state.pool)
            .await?;

    let top_dishes = sqlx::query_as::<_, TopDishRow>(
        r#"
        SELECT oi.name,
               SUM(oi.quantity)::BIGINT AS quantity,
               COALESCE(SUM(oi.unit_price * oi.quantity) FILTER (WHERE NOT oi.is_offered), 0)::BIGINT AS revenue
        FROM order_items oi
        JOIN orders o ON o.id = oi.order_id
        WHERE oi.dish_id IS NOT NULL
          AND o.created_at >= $1 AND o.created_at < $2
          AND o.status <> 'annulee'
        GROUP BY oi.name
        ORDER BY quantity DESC, oi.name
        LIMIT $3
        "#,
    )
    .bind(from)
    .bind(to)
    .bind(TOP_DISHES)
    .fetch_all(&state.pool)
    .await?
    .into_iter()
    .map(|row| TopDish {
        name: row.name,
        quantity: row.quantity,
        revenue: row.revenue,
    })
    .collect();

    let (open_event_requests,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM events WHERE status IN ('demande_initiale', 'devis_envoye')",
    )
    .fetch_one(&state.pool)
    .await?;

    Ok(DashboardStats {
        order_count,
        orders_by_status,
        revenue,
        average_basket: average_basket(revenue, billed_orders),
        client_count,
        new_clients,
        top_dishes,
        open_event_requests,
    })
}
