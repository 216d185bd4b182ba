pub mod reservation;
pub mod room;
pub mod stats;
pub mod user;

pub use reservation::ReservationRepository;
pub use room::RoomRepository;
pub use stats::StatsRepository;
pub use user::UserRepository;
