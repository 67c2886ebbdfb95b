pub mod booking;
pub mod session;
pub mod submitter;
pub mod timezone;
pub mod validation;
