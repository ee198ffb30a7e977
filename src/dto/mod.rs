pub mod auth;
pub mod clients;
pub mod events;
pub mod menu;
pub mod orders;
pub mod stats;
