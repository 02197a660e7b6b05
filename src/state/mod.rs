pub mod app_settings;
pub mod app_state;
pub mod clubs;
pub mod competitions;
pub mod formation;
pub mod lineup_view;
pub mod messages;
pub mod network;
pub mod placement;
pub mod players;
pub mod ratings;
pub mod roster;
