use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::{
    audit,
    dto::menu::{
        CreateDishRequest, CreateExtraRequest, DishList, ExtraList, UpdateDishRequest,
        UpdateExtraRequest,
    },
    entity::{
        dishes::{ActiveModel as DishActive, Column as DishCol, Entity as Dishes},
        extras::{ActiveModel as ExtraActive, Column as ExtraCol, Entity as Extras},
        order_items::{Column as OrderItemCol, Entity as OrderItems},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Dish, Extra},
    notify::MENU_PATHS,
    response::ApiResponse,
    routes::params::DishQuery,
    services::order_service::clean_text,
    state::AppState,
};

fn validate_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("le nom est obligatoire"));
    }
    Ok(name.to_string())
}

fn validate_price(price: i64) -> AppResult<i64> {
    if price < 0 {
        return Err(AppError::bad_request("le prix ne peut pas être négatif"));
    }
    Ok(price)
}

async fn ensure_dish_name_free<C: ConnectionTrait>(
    db: &C,
    name: &str,
    except: Option<i32>,
) -> AppResult<()> {
    let mut condition = Condition::all().add(DishCol::Name.eq(name));
    if let Some(id) = except {
        condition = condition.add(DishCol::Id.ne(id));
    }
    if Dishes::find().filter(condition).count(db).await? > 0 {
        return Err(AppError::Conflict(format!("un plat nommé « {name} » existe déjà")));
    }
    Ok(())
}

async fn ensure_extra_name_free<C: ConnectionTrait>(
    db: &C,
    name: &str,
    except: Option<i32>,
) -> AppResult<()> {
    let mut condition = Condition::all().add(ExtraCol::Name.eq(name));
    if let Some(id) = except {
        condition = condition.add(ExtraCol::Id.ne(id));
    }
    if Extras::find().filter(condition).count(db).await? > 0 {
        return Err(AppError::Conflict(format!("un extra nommé « {name} » existe déjà")));
    }
    Ok(())
}

pub async fn list_dishes(state: &AppState, query: DishQuery) -> AppResult<ApiResponse<DishList>> {
    let mut condition = Condition::all();
    if !query.include_unavailable.unwrap_or(false) {
        condition = condition.add(DishCol::Available.eq(true));
    }
    if let Some(category) = query.category.as_ref().filter(|c| !c.is_empty()) {
        condition = condition.add(DishCol::Category.eq(category.clone()));
    }

    let items = Dishes::find()
        .filter(condition)
        .order_by_asc(DishCol::Category)
        .order_by_asc(DishCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Dish::from)
        .collect();

    Ok(ApiResponse::ok("Plats", DishList { items }))
}

pub async fn get_dish(state: &AppState, id: i32) -> AppResult<ApiResponse<Dish>> {
    let dish = Dishes::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::ok("Plat", dish.into()))
}

pub async fn list_extras(state: &AppState) -> AppResult<ApiResponse<ExtraList>> {
    let items = Extras::find()
        .filter(ExtraCol::Available.eq(true))
        .order_by_asc(ExtraCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Extra::from)
        .collect();

    Ok(ApiResponse::ok("Extras", ExtraList { items }))
}

pub async fn create_dish(
    state: &AppState,
    user: &AuthUser,
    payload: CreateDishRequest,
) -> AppResult<ApiResponse<Dish>> {
    ensure_admin(user)?;
    let dish = async {
        let name = validate_name(&payload.name)?;
        let price = validate_price(payload.price)?;
        ensure_dish_name_free(&state.orm, &name, None).await?;

        let dish = DishActive {
            id: NotSet,
            name: Set(name),
            description: Set(clean_text(payload.description)),
            price: Set(price),
            category: Set(clean_text(payload.category)),
            photo_url: Set(clean_text(payload.photo_url)),
            available: Set(payload.available.unwrap_or(true)),
            created_at: NotSet,
            updated_at: NotSet,
        }
        .insert(&state.orm)
        .await?;
        Ok::<_, AppError>(dish)
    }
    .await
    .map_err(|e| e.context("Impossible de créer le plat"))?;

    audit::record(
        &state.pool,
        Some(&user.subject),
        "dish_create",
        "dishes",
        serde_json::json!({ "dish_id": dish.id }),
    )
    .await;
    state.notifier.revalidate(MENU_PATHS).await;

    Ok(ApiResponse::ok("Plat créé", dish.into()))
}

/// Price changes only affect future line items.
pub async fn update_dish(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: UpdateDishRequest,
) -> AppResult<ApiResponse<Dish>> {
    ensure_admin(user)?;
    let dish = async {
        let existing = Dishes::find_by_id(id)
            .one(&state.orm)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: DishActive = existing.into();
        if let Some(name) = payload.name {
            let name = validate_name(&name)?;
            ensure_dish_name_free(&state.orm, &name, Some(id)).await?;
            active.name = Set(name);
        }
        if payload.description.is_some() {
            active.description = Set(clean_text(payload.description));
        }
        if let Some(price) = payload.price {
            active.price = Set(validate_price(price)?);
        }
        if payload.category.is_some() {
            active.category = Set(clean_text(payload.category));
        }
        if payload.photo_url.is_some() {
            active.photo_url = Set(clean_text(payload.photo_url));
        }
        if let Some(available) = payload.available {
            active.available = Set(available);
        }
        active.updated_at = Set(Utc::now().into());
        Ok::<_, AppError>(active.update(&state.orm).await?)
    }
    .await
    .map_err(|e| e.context("Impossible de modifier le plat"))?;

    audit::record(
        &state.pool,
        Some(&user.subject),
        "dish_update",
        "dishes",
        serde_json::json!({ "dish_id": dish.id }),
    )
    .await;
    state.notifier.revalidate(MENU_PATHS).await;

    Ok(ApiResponse::ok("Plat modifié", dish.into()))
}

/// Dishes referenced by past orders cannot be deleted; mark them
/// unavailable instead.
pub async fn delete_dish(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    async {
        let used = OrderItems::find()
            .filter(OrderItemCol::DishId.eq(id))
            .count(&state.orm)
            .await?;
        if used > 0 {
            return Err(AppError::Conflict(
                "ce plat figure dans des commandes, rendez-le indisponible à la place".into(),
            ));
        }
        let result = Dishes::delete_by_id(id).exec(&state.orm).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok::<_, AppError>(())
    }
    .await
    .map_err(|e| e.context("Impossible de supprimer le plat"))?;

    audit::record(
        &state.pool,
        Some(&user.subject),
        "dish_delete",
        "dishes",
        serde_json::json!({ "dish_id": id }),
    )
    .await;
    state.notifier.revalidate(MENU_PATHS).await;

    Ok(ApiResponse::ok("Plat supprimé", serde_json::json!({})))
}

pub async fn create_extra(
    state: &AppState,
    user: &AuthUser,
    payload: CreateExtraRequest,
) -> AppResult<ApiResponse<Extra>> {
    ensure_admin(user)?;
    let extra = async {
        let name = validate_name(&payload.name)?;
        let price = validate_price(payload.price)?;
        ensure_extra_name_free(&state.orm, &name, None).await?;

        let extra = ExtraActive {
            id: NotSet,
            name: Set(name),
            description: Set(clean_text(payload.description)),
            price: Set(price),
            available: Set(payload.available.unwrap_or(true)),
            created_at: NotSet,
            updated_at: NotSet,
        }
        .insert(&state.orm)
        .await?;
        Ok::<_, AppError>(extra)
    }
    .await
    .map_err(|e| e.context("Impossible de créer l'extra"))?;

    audit::record(
        &state.pool,
        Some(&user.subject),
        "extra_create",
        "extras",
        serde_json::json!({ "extra_id": extra.id }),
    )
    .await;
    state.notifier.revalidate(MENU_PATHS).await;

    Ok(ApiResponse::ok("Extra créé", extra.into()))
}

pub async fn update_extra(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: UpdateExtraRequest,
) -> AppResult<ApiResponse<Extra>> {
    ensure_admin(user)?;
    let extra = async {
        let existing = Extras::find_by_id(id)
            .one(&state.orm)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ExtraActive = existing.into();
        if let Some(name) = payload.name {
            let name = validate_name(&name)?;
            ensure_extra_name_free(&state.orm, &name, Some(id)).await?;
            active.name = Set(name);
        }
        if payload.description.is_some() {
            active.description = Set(clean_text(payload.description));
        }
        if let Some(price) = payload.price {
            active.price = Set(validate_price(price)?);
        }
        if let Some(available) = payload.available {
            active.available = Set(available);
        }
        active.updated_at = Set(Utc::now().into());
        Ok::<_, AppError>(active.update(&state.orm).await?)
    }
    .await
    .map_err(|e| e.context("Impossible de modifier l'extra"))?;

    audit::record(
        &state.pool,
        Some(&user.subject),
        "extra_update",
        "extras",
        serde_json::json!({ "extra_id": extra.id }),
    )
    .await;
    state.notifier.revalidate(MENU_PATHS).await;

    Ok(ApiResponse::ok("Extra modifié", extra.into()))
}

pub async fn delete_extra(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    async {
        let used = OrderItems::find()
            .filter(OrderItemCol::ExtraId.eq(id))
            .count(&state.orm)
            .await?;
        if used > 0 {
            return Err(AppError::Conflict(
                "cet extra figure dans des commandes, rendez-le indisponible à la place".into(),
            ));
        }
        let result = Extras::delete_by_id(id).exec(&state.orm).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok::<_, AppError>(())
    }
    .await
    .map_err(|e| e.context("Impossible de supprimer l'extra"))?;

    audit::record(
        &state.pool,
        Some(&user.subject),
        "extra_delete",
        "extras",
        serde_json::json!({ "extra_id": id }),
    )
    .await;
    state.notifier.revalidate(MENU_PATHS).await;

    Ok(ApiResponse::ok("Extra supprimé", serde_json::json!({})))
}
