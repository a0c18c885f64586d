//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` (or any `PgExecutor`, for methods that take part
//! in transactions) as the first argument. Owner-checked reads and deletes
//! go through [`crate::ownership::OwnedRepo`].

pub mod character_in_work_repo;
pub mod character_repo;
pub mod event_participant_repo;
pub mod event_repo;
pub mod location_in_work_repo;
pub mod location_repo;
pub mod relationship_repo;
pub mod token_repo;
pub mod user_repo;
pub mod work_repo;

pub use character_in_work_repo::CharacterInWorkRepo;
pub use character_repo::CharacterRepo;
pub use event_participant_repo::EventParticipantRepo;
pub use event_repo::EventRepo;
pub use location_in_work_repo::LocationInWorkRepo;
pub use location_repo::LocationRepo;
pub use relationship_repo::RelationshipRepo;
pub use token_repo::TokenRepo;
pub use user_repo::UserRepo;
pub use work_repo::WorkRepo;
