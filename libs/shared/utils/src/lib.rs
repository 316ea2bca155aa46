pub mod clock;
pub mod locks;
pub mod test_utils;

pub use clock::{Clock, FixedClock, SystemClock};
pub use locks::DoctorLocks;
