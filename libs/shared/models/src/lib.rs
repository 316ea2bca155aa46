pub mod error;
pub mod response;

pub use error::{AppError, ErrorKind, StoreError};
pub use response::ServiceResponse;
