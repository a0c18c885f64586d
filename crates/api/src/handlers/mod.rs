pub mod auth;
pub mod cast;
pub mod character;
pub mod event;
pub mod location;
pub mod location_link;
pub mod participant;
pub mod relationship;
pub mod work;
