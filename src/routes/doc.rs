use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse},
        clients::{ClientDetail, ClientList, ClientSummary, SyncClientRequest, UpdateClientRequest},
        events::{CreateEventRequest, EventList, EventWithClient, UpdateEventRequest},
        menu::{CreateDishRequest, CreateExtraRequest, DishList, ExtraList, UpdateDishRequest, UpdateExtraRequest},
        orders::{
            AdminCreateOrderRequest, CreateOrderRequest, OrderHistory, OrderItemInput, OrderList,
            OrderSummary, OrderWithItems, UpdateDistributionRequest, UpdateOrderRequest,
            UpdateQuantityRequest, UpdateSpiceLevelRequest,
        },
        stats::{DashboardStats, StatusCount, TopDish},
    },
    models::{Client, Dish, Event, Extra, Order, OrderItem},
    response::{ApiResponse, Meta},
    routes::{admin, auth, clients, events, health, menu, orders, params},
    status::{DeliveryType, EventStatus, EventType, OrderStatus, PaymentStatus},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        clients::get_me,
        clients::sync_me,
        menu::list_dishes,
        menu::get_dish,
        menu::list_extras,
        orders::create_order,
        orders::list_my_orders,
        orders::get_my_order,
        events::create_event,
        events::list_my_events,
        admin::list_orders,
        admin::create_order,
        admin::get_order,
        admin::update_order,
        admin::delete_order,
        admin::add_item,
        admin::remove_item,
        admin::update_item_quantity,
        admin::update_item_spice_level,
        admin::update_item_distribution,
        admin::toggle_item_pin,
        admin::toggle_item_offered,
        admin::list_clients,
        admin::get_client,
        admin::update_client,
        admin::delete_client,
        admin::create_dish,
        admin::update_dish,
        admin::delete_dish,
        admin::create_extra,
        admin::update_extra,
        admin::delete_extra,
        admin::list_events,
        admin::get_event,
        admin::update_event,
        admin::delete_event,
        admin::dashboard_stats
    ),
    components(
        schemas(
            Client,
            Dish,
            Extra,
            Order,
            OrderItem,
            Event,
            OrderStatus,
            PaymentStatus,
            DeliveryType,
            EventStatus,
            EventType,
            LoginRequest,
            LoginResponse,
            SyncClientRequest,
            UpdateClientRequest,
            ClientSummary,
            ClientList,
            ClientDetail,
            CreateDishRequest,
            UpdateDishRequest,
            CreateExtraRequest,
            UpdateExtraRequest,
            DishList,
            ExtraList,
            OrderItemInput,
            CreateOrderRequest,
            AdminCreateOrderRequest,
            UpdateOrderRequest,
            UpdateQuantityRequest,
            UpdateSpiceLevelRequest,
            UpdateDistributionRequest,
            OrderWithItems,
            OrderSummary,
            OrderList,
            OrderHistory,
            CreateEventRequest,
            UpdateEventRequest,
            EventWithClient,
            EventList,
            StatusCount,
            TopDish,
            DashboardStats,
            health::HealthData,
            params::Pagination,
            params::OrderListQuery,
            params::ClientListQuery,
            params::EventListQuery,
            params::DishQuery,
            params::StatsQuery,
            Meta,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>,
            ApiResponse<ClientList>,
            ApiResponse<EventList>,
            ApiResponse<DishList>,
            ApiResponse<DashboardStats>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Staff authentication"),
        (name = "Clients", description = "Customer profile"),
        (name = "Menu", description = "Public menu"),
        (name = "Orders", description = "Customer orders and tracking"),
        (name = "Events", description = "Customer event requests"),
        (name = "Admin", description = "Back-office endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
