use serde::{Deserialize, Serialize};

use crate::passenger::Gender;

/// One passenger record as submitted by the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassengerSpec {
    pub name: String,
    pub age: i32,
    pub gender: Gender,
    #[serde(default)]
    pub is_parent: bool,
    #[serde(default)]
    pub parent_identifier: Option<String>,
}

/// Body of a booking request: the travelling group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub passengers: Vec<PassengerSpec>,
}
