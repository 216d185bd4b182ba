pub mod reservation;
pub mod room;
pub mod stats;
pub mod user;

pub use reservation::{Reservation, ReservationStatus};
pub use room::{Room, RoomListQuery};
pub use stats::AdminStats;
pub use user::{Role, User};
