pub mod booking;
pub mod tool;

pub use booking::{AppointmentStatus, BookingArgs, BookingPayload, BookingRequest, CustomerPayload};
pub use tool::ToolSchema;
