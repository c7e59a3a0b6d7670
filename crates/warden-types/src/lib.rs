pub mod broadcast;
pub mod deeplink;
pub mod models;
pub mod role;

pub use broadcast::{BroadcastTally, Delivery, format_elapsed};
pub use deeplink::{PayloadError, UnmuteTarget};
pub use models::{Counter, Counters, MuteRecord, SudoGrant, UserProfile};
pub use role::Role;
