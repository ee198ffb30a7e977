use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::{
    audit,
    dto::events::{CreateEventRequest, EventList, EventWithClient, UpdateEventRequest},
    entity::{
        clients::Entity as Clients,
        dishes::{Column as DishCol, Entity as Dishes},
        events::{ActiveModel as EventActive, Column as EventCol, Entity as Events, Model as EventModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Event,
    notify::EVENT_PATHS,
    response::{ApiResponse, Meta},
    routes::params::{EventListQuery, Pagination, SortOrder},
    services::order_service::{ClientRef, clean_text, resolve_client},
    state::AppState,
    status::{EventStatus, Vocabulary},
};

fn validate_title(title: &str) -> AppResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::bad_request("le titre de l'événement est obligatoire"));
    }
    Ok(title.to_string())
}

fn validate_guest_count(guest_count: i32) -> AppResult<i32> {
    if guest_count <= 0 {
        return Err(AppError::bad_request("le nombre d'invités doit être supérieur à 0"));
    }
    Ok(guest_count)
}

fn validate_budget(budget: Option<i64>) -> AppResult<Option<i64>> {
    match budget {
        Some(b) if b < 0 => Err(AppError::bad_request("le budget ne peut pas être négatif")),
        other => Ok(other),
    }
}

/// Check that every preselected dish exists and return the ids deduplicated.
async fn validate_dish_ids<C: ConnectionTrait>(db: &C, ids: Vec<i32>) -> AppResult<serde_json::Value> {
    let mut ids = ids;
    ids.sort_unstable();
    ids.dedup();
    if !ids.is_empty() {
        let found = Dishes::find()
            .filter(DishCol::Id.is_in(ids.clone()))
            .count(db)
            .await?;
        if found != ids.len() as u64 {
            return Err(AppError::bad_request("un des plats présélectionnés est introuvable"));
        }
    }
    Ok(serde_json::json!(ids))
}

/// Event request submitted by the signed-in client.
pub async fn create_event(
    state: &AppState,
    user: &AuthUser,
    payload: CreateEventRequest,
) -> AppResult<ApiResponse<Event>> {
    let event = create_event_inner(state, user, payload)
        .await
        .map_err(|e| e.context("Impossible d'enregistrer la demande d'événement"))?;

    tracing::info!(event_id = event.id, client_id = event.client_id, "event request created");
    audit::record(
        &state.pool,
        Some(&user.subject),
        "event_create",
        "events",
        serde_json::json!({ "event_id": event.id }),
    )
    .await;
    state.notifier.revalidate(EVENT_PATHS).await;

    Ok(ApiResponse::ok("Demande envoyée", event.into()))
}

async fn create_event_inner(
    state: &AppState,
    user: &AuthUser,
    payload: CreateEventRequest,
) -> AppResult<EventModel> {
    let client = resolve_client(&state.orm, &ClientRef::AuthId(user.subject.clone())).await?;
    let title = validate_title(&payload.title)?;
    let guest_count = validate_guest_count(payload.guest_count)?;
    let budget = validate_budget(payload.budget)?;
    if payload.event_date < Utc::now() {
        return Err(AppError::bad_request("la date de l'événement est déjà passée"));
    }
    let dish_ids = validate_dish_ids(&state.orm, payload.preselected_dish_ids).await?;

    let event = EventActive {
        id: NotSet,
        client_id: Set(client.id),
        event_type: Set(payload.event_type),
        status: Set(EventStatus::Requested),
        title: Set(title),
        description: Set(clean_text(payload.description)),
        event_date: Set(payload.event_date.into()),
        guest_count: Set(guest_count),
        budget: Set(budget),
        location: Set(clean_text(payload.location)),
        preselected_dish_ids: Set(dish_ids),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(event)
}

pub async fn list_client_events(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<EventList>> {
    let (page, limit, offset) = pagination.normalize();
    let client = resolve_client(&state.orm, &ClientRef::AuthId(user.subject.clone())).await?;

    let finder = Events::find()
        .filter(EventCol::ClientId.eq(client.id))
        .order_by_desc(EventCol::EventDate);
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|event| EventWithClient {
            event: event.into(),
            client: None,
        })
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Événements", EventList { items }, Some(meta)))
}

pub async fn list_events(
    state: &AppState,
    user: &AuthUser,
    query: EventListQuery,
) -> AppResult<ApiResponse<EventList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status {
        condition = condition.add(EventCol::Status.eq(status));
    }
    if let Some(event_type) = query.event_type {
        condition = condition.add(EventCol::EventType.eq(event_type));
    }

    let mut finder = Events::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Asc) {
        SortOrder::Asc => finder.order_by_asc(EventCol::EventDate),
        SortOrder::Desc => finder.order_by_desc(EventCol::EventDate),
    };

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .find_also_related(Clients)
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|(event, client)| EventWithClient {
            event: event.into(),
            client: client.map(Into::into),
        })
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Événements", EventList { items }, Some(meta)))
}

pub async fn get_event(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<EventWithClient>> {
    ensure_admin(user)?;
    let (event, client) = Events::find_by_id(id)
        .find_also_related(Clients)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::ok(
        "Événement",
        EventWithClient {
            event: event.into(),
            client: client.map(Into::into),
        },
    ))
}

pub async fn update_event(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: UpdateEventRequest,
) -> AppResult<ApiResponse<Event>> {
    ensure_admin(user)?;
    let (event, previous_status) = update_event_inner(state, id, payload)
        .await
        .map_err(|e| e.context("Impossible de mettre à jour l'événement"))?;

    if event.status != previous_status {
        tracing::info!(
            event_id = event.id,
            from = previous_status.as_db(),
            to = event.status.as_db(),
            "event status changed"
        );
    }
    audit::record(
        &state.pool,
        Some(&user.subject),
        "event_update",
        "events",
        serde_json::json!({ "event_id": event.id, "status": event.status.as_db() }),
    )
    .await;
    state.notifier.revalidate(EVENT_PATHS).await;

    Ok(ApiResponse::ok("Événement mis à jour", event.into()))
}

async fn update_event_inner(
    state: &AppState,
    id: i32,
    payload: UpdateEventRequest,
) -> AppResult<(EventModel, EventStatus)> {
    let existing = Events::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let previous_status = existing.status;

    let mut active: EventActive = existing.into();
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    if let Some(event_type) = payload.event_type {
        active.event_type = Set(event_type);
    }
    if let Some(title) = payload.title {
        active.title = Set(validate_title(&title)?);
    }
    if payload.description.is_some() {
        active.description = Set(clean_text(payload.description));
    }
    if let Some(event_date) = payload.event_date {
        active.event_date = Set(event_date.into());
    }
    if let Some(guest_count) = payload.guest_count {
        active.guest_count = Set(validate_guest_count(guest_count)?);
    }
    if payload.budget.is_some() {
        active.budget = Set(validate_budget(payload.budget)?);
    }
    if payload.location.is_some() {
        active.location = Set(clean_text(payload.location));
    }
    if let Some(ids) = payload.preselected_dish_ids {
        active.preselected_dish_ids = Set(validate_dish_ids(&state.orm, ids).await?);
    }
    active.updated_at = Set(Utc::now().into());

    let event = active.update(&state.orm).await?;
    Ok((event, previous_status))
}

pub async fn delete_event(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Events::delete_by_id(id)
        .exec(&state.orm)
        .await
        .map_err(|e| AppError::from(e).context("Impossible de supprimer l'événement"))?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        Some(&user.subject),
        "event_delete",
        "events",
        serde_json::json!({ "event_id": id }),
    )
    .await;
    state.notifier.revalidate(EVENT_PATHS).await;

    Ok(ApiResponse::ok("Événement supprimé", serde_json::json!({})))
}
