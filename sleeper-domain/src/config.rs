use serde::{Deserialize, Serialize};

/// Berth counts per category for the single coach
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachLayout {
    pub lower_berths: u16,
    pub middle_berths: u16,
    pub upper_berths: u16,
    pub side_lower_berths: u16,
}

impl CoachLayout {
    /// Total berths available to confirmed passengers
    pub fn confirmed_capacity(&self) -> usize {
        (self.lower_berths + self.middle_berths + self.upper_berths) as usize
    }

    /// Total RAC slots: two occupants per side-lower berth
    pub fn rac_capacity(&self) -> usize {
        self.side_lower_berths as usize * 2
    }
}

impl Default for CoachLayout {
    fn default() -> Self {
        Self {
            lower_berths: 21,
            middle_berths: 21,
            upper_berths: 21,
            side_lower_berths: 9,
        }
    }
}

/// Allocation policy knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationRules {
    pub waiting_list_capacity: usize,
    /// Passengers younger than this travel without a berth
    pub min_berth_age: i32,
    pub senior_age: i32,
    /// Maximum berth-holding passengers per booking
    pub max_group_size: usize,
}

impl Default for ReservationRules {
    fn default() -> Self {
        Self {
            waiting_list_capacity: 10,
            min_berth_age: 5,
            senior_age: 60,
            max_group_size: 6,
        }
    }
}
