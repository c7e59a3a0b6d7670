pub mod api;
pub mod broadcast;
pub mod commands;
pub mod error;
pub mod keyboards;
pub mod router;
pub mod settings;
pub mod state;
pub mod telegram;
pub mod texts;
pub mod tracker;
pub mod verification;

pub use api::{ChatApi, MessageRef, PermissionPreset, notify};
pub use commands::Command;
pub use error::PlatformError;
pub use router::{ButtonPress, Caller, Invocation};
pub use settings::Settings;
pub use state::{SharedWarden, Warden};
pub use telegram::TelegramApi;
pub use verification::{JoinOutcome, JoinRequest, VerifyOutcome};
