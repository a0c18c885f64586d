//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` + `Validate` create DTO for inserts
//! - A `Deserialize` + `Validate` update DTO (all `Option` fields) for patches

pub mod character;
pub mod character_in_work;
pub mod event;
pub mod event_participant;
pub mod location;
pub mod location_in_work;
pub mod relationship;
pub mod token;
pub mod user;
pub mod work;
