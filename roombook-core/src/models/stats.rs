use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregate counts for the admin dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdminStats {
    pub users: i64,
    pub rooms: i64,
    pub blocked_rooms: i64,
    pub reservations: i64,
    /// Reservation count per status
    pub reservations_by_status: BTreeMap<String, i64>,
}
