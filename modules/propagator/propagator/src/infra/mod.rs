pub mod inventory;
pub mod locality;
pub mod payload;

pub use inventory::{FarmInventory, InventoryDirectory, InventoryError};
pub use locality::{AliasLocality, AnyOf, BasePathLocality, content_locality};
pub use payload::AppSettingsPayload;
