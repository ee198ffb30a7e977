use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use sqlx::FromRow;

use crate::{
    audit,
    dto::clients::{ClientDetail, ClientList, ClientSummary, SyncClientRequest, UpdateClientRequest},
    entity::{
        clients::{ActiveModel as ClientActive, Column as ClientCol, Entity as Clients, Model as ClientModel},
        events::{Column as EventCol, Entity as Events},
        orders::{Column as OrderCol, Entity as Orders},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Client,
    notify::CLIENT_PATHS,
    response::{ApiResponse, Meta},
    routes::params::ClientListQuery,
    services::order_service::clean_text,
    state::AppState,
};

fn required_name(value: String, field: &str) -> AppResult<String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(AppError::bad_request(format!("le champ {field} est obligatoire")));
    }
    Ok(value)
}

fn normalize_email(email: Option<String>) -> AppResult<Option<String>> {
    let Some(email) = clean_text(email) else {
        return Ok(None);
    };
    if !email.contains('@') {
        return Err(AppError::bad_request("adresse email invalide"));
    }
    Ok(Some(email.to_lowercase()))
}

/// Create or refresh the client record of the signed-in customer.
pub async fn sync_current_client(
    state: &AppState,
    user: &AuthUser,
    payload: SyncClientRequest,
) -> AppResult<ApiResponse<Client>> {
    let client = sync_current_client_inner(state, user, payload)
        .await
        .map_err(|e| e.context("Impossible d'enregistrer le profil client"))?;

    audit::record(
        &state.pool,
        Some(&user.subject),
        "client_sync",
        "clients",
        serde_json::json!({ "client_id": client.id }),
    )
    .await;
    state.notifier.revalidate(CLIENT_PATHS).await;

    Ok(ApiResponse::ok("Profil enregistré", client.into()))
}

async fn sync_current_client_inner(
    state: &AppState,
    user: &AuthUser,
    payload: SyncClientRequest,
) -> AppResult<ClientModel> {
    if user.is_admin() {
        return Err(AppError::Forbidden);
    }
    let first_name = required_name(payload.first_name, "prénom")?;
    let last_name = required_name(payload.last_name, "nom")?;
    let email = normalize_email(payload.email)?;

    let profile = ClientActive {
        id: NotSet,
        auth_user_id: Set(Some(user.subject.clone())),
        first_name: Set(first_name),
        last_name: Set(last_name),
        email: Set(email),
        phone: Set(clean_text(payload.phone)),
        address: Set(clean_text(payload.address)),
        postal_code: Set(clean_text(payload.postal_code)),
        city: Set(clean_text(payload.city)),
        created_at: NotSet,
        updated_at: Set(Utc::now().into()),
    };

    // Concurrent first syncs of one account land on the same row.
    let client = Clients::insert(profile)
        .on_conflict(
            OnConflict::column(ClientCol::AuthUserId)
                .update_columns([
                    ClientCol::FirstName,
                    ClientCol::LastName,
                    ClientCol::Email,
                    ClientCol::Phone,
                    ClientCol::Address,
                    ClientCol::PostalCode,
                    ClientCol::City,
                    ClientCol::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_with_returning(&state.orm)
        .await?;

    tracing::info!(client_id = client.id, "client profile synced");
    Ok(client)
}

pub async fn get_current_client(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<Client>> {
    let client = Clients::find()
        .filter(ClientCol::AuthUserId.eq(user.subject.as_str()))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::ok("Client", client.into()))
}

#[derive(FromRow)]
struct ClientSummaryRow {
    id: i32,
    order_count: i64,
    total_spent: i64,
}

pub async fn list_clients(
    state: &AppState,
    user: &AuthUser,
    query: ClientListQuery,
) -> AppResult<ApiResponse<ClientList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();
    let pattern = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(|q| format!("%{q}%"));

    let rows = sqlx::query_as::<_, ClientSummaryRow>(
        r#"
        SELECT c.id,
               COUNT(o.id) AS order_count,
               COALESCE(SUM(o.total_amount) FILTER (WHERE o.status <> 'annulee'), 0)::BIGINT AS total_spent
        FROM clients c
        LEFT JOIN orders o ON o.client_id = c.id
        WHERE $1::TEXT IS NULL
           OR c.first_name ILIKE $1
           OR c.last_name ILIKE $1
           OR c.email ILIKE $1
           OR c.phone ILIKE $1
        GROUP BY c.id
        ORDER BY c.last_name, c.first_name, c.id
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(pattern.as_deref())
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    let (total,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM clients c
        WHERE $1::TEXT IS NULL
           OR c.first_name ILIKE $1
           OR c.last_name ILIKE $1
           OR c.email ILIKE $1
           OR c.phone ILIKE $1
        "#,
    )
    .bind(pattern.as_deref())
    .fetch_one(&state.pool)
    .await?;

    let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
    let mut clients: std::collections::HashMap<i32, ClientModel> = Clients::find()
        .filter(ClientCol::Id.is_in(ids))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    let items = rows
        .into_iter()
        .filter_map(|row| {
            clients.remove(&row.id).map(|client| ClientSummary {
                client: client.into(),
                order_count: row.order_count,
                total_spent: row.total_spent,
            })
        })
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Clients", ClientList { items }, Some(meta)))
}

pub async fn get_client(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<ClientDetail>> {
    ensure_admin(user)?;
    let client = Clients::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let orders = Orders::find()
        .filter(OrderCol::ClientId.eq(client.id))
        .order_by_desc(OrderCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let events = Events::find()
        .filter(EventCol::ClientId.eq(client.id))
        .order_by_desc(EventCol::EventDate)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(ApiResponse::ok(
        "Client",
        ClientDetail {
            client: client.into(),
            orders,
            events,
        },
    ))
}

pub async fn update_client(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: UpdateClientRequest,
) -> AppResult<ApiResponse<Client>> {
    ensure_admin(user)?;
    let client = update_client_inner(state, id, payload)
        .await
        .map_err(|e| e.context("Impossible de mettre à jour le client"))?;

    audit::record(
        &state.pool,
        Some(&user.subject),
        "client_update",
        "clients",
        serde_json::json!({ "client_id": client.id }),
    )
    .await;
    state.notifier.revalidate(CLIENT_PATHS).await;

    Ok(ApiResponse::ok("Client mis à jour", client.into()))
}

async fn update_client_inner(
    state: &AppState,
    id: i32,
    payload: UpdateClientRequest,
) -> AppResult<ClientModel> {
    let existing = Clients::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ClientActive = existing.into();
    if let Some(first_name) = payload.first_name {
        active.first_name = Set(required_name(first_name, "prénom")?);
    }
    if let Some(last_name) = payload.last_name {
        active.last_name = Set(required_name(last_name, "nom")?);
    }
    if payload.email.is_some() {
        active.email = Set(normalize_email(payload.email)?);
    }
    if payload.phone.is_some() {
        active.phone = Set(clean_text(payload.phone));
    }
    if payload.address.is_some() {
        active.address = Set(clean_text(payload.address));
    }
    if payload.postal_code.is_some() {
        active.postal_code = Set(clean_text(payload.postal_code));
    }
    if payload.city.is_some() {
        active.city = Set(clean_text(payload.city));
    }
    active.updated_at = Set(Utc::now().into());

    Ok(active.update(&state.orm).await?)
}

/// Delete a client together with their orders and events.
pub async fn delete_client(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Clients::delete_by_id(id)
        .exec(&state.orm)
        .await
        .map_err(|e| AppError::from(e).context("Impossible de supprimer le client"))?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(client_id = id, "client deleted");
    audit::record(
        &state.pool,
        Some(&user.subject),
        "client_delete",
        "clients",
        serde_json::json!({ "client_id": id }),
    )
    .await;
    state.notifier.revalidate(CLIENT_PATHS).await;

    Ok(ApiResponse::ok("Client supprimé", serde_json::json!({})))
}
