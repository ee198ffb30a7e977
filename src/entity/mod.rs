pub mod clients;
pub mod dishes;
pub mod events;
pub mod extras;
pub mod order_items;
pub mod orders;

pub use clients::Entity as Clients;
pub use dishes::Entity as Dishes;
pub use events::Entity as Events;
pub use extras::Entity as Extras;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
