pub mod auth_service;
pub mod client_service;
pub mod event_service;
pub mod menu_service;
pub mod order_item_service;
pub mod order_lines;
pub mod order_service;
pub mod stats_service;
