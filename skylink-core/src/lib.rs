pub mod identity;
pub mod inventory;
pub mod partner;
pub mod payment;
pub mod store;

pub use identity::{CallerContext, ForwardableCredential};
pub use inventory::{InventoryClient, InventoryError, MockInventoryClient};
pub use partner::{MockPartnerClient, PartnerClient, PartnerError};
pub use store::{BookingStore, InMemoryBookingStore, StoreError};
