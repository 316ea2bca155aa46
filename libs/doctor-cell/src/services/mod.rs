pub mod availability;
pub mod conflict;
pub mod registry;
pub mod store;
pub mod validation;

pub use availability::AvailabilityService;
pub use registry::DoctorRegistry;
pub use store::{AvailabilityStore, InMemoryAvailabilityStore};
