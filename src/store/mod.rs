//! Persistence layer — durable registration list and its tabular export.

pub mod json_backend;
pub mod model;
pub mod registrations;

pub use json_backend::JsonFileStore;
pub use model::{ChildRecord, RegistrationEntry};
pub use registrations::RegistrationStore;
