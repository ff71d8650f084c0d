pub mod allow;
pub mod commands;
pub mod error;
pub mod followup;
pub mod interaction;
pub mod response;
pub mod verify;

pub use error::DiscordError;
pub use followup::FollowupClient;
pub use interaction::Interaction;
pub use response::InteractionResponse;
