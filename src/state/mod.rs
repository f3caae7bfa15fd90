pub mod app_state;
pub mod messages;
pub mod network;
pub mod refresher;
