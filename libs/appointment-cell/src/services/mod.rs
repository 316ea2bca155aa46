pub mod booking;
pub mod conflict;
pub mod directory;
pub mod lifecycle;
pub mod notification;
pub mod scheduling;
pub mod store;

pub use booking::AppointmentBookingService;
pub use conflict::ConflictDetectionService;
pub use directory::{DirectoryDoctors, DirectoryService, InMemoryDirectory};
pub use lifecycle::AppointmentLifecycleService;
pub use notification::{spawn_notification, AppointmentEvent, NotificationError, Notifier, TracingNotifier};
pub use scheduling::SchedulingService;
pub use store::{AppointmentStore, InMemoryAppointmentStore};
