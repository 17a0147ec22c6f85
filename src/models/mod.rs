pub mod calendar_event;
pub mod envelope;

pub use calendar_event::{CalendarEventPayload, CalendarEventRequest};
pub use envelope::{envelope, ApiResponse};
