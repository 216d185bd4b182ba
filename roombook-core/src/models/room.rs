use serde::{Deserialize, Serialize};

/// A bookable room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    pub name: String,
    pub location: String,
    /// Free-form category such as `lecture`, `lab` or `meeting`
    pub room_type: String,
    pub capacity: i64,
    pub description: Option<String>,
    /// Blocked rooms are listed but cannot be reserved
    pub is_blocked: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomListQuery {
    #[serde(rename = "type")]
    pub room_type: Option<String>,
}

impl RoomListQuery {
    /// The type filter, ignoring blank values
    #[must_use]
    pub fn type_filter(&self) -> Option<&str> {
        self.room_type.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}
