pub mod booking;
pub mod flight;
pub mod partner;
pub mod pii;

pub use booking::{Booking, BookingSource, BookingStatus, NewBooking, PaymentStatus};
pub use flight::FlightInfo;
pub use partner::PartnerBooking;
