use serde::{Deserialize, Serialize};

use crate::berth::BerthAssignment;
use crate::config::ReservationRules;

pub type PassengerId = u64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// A passenger on a booked ticket. Identity attributes are fixed at booking
/// time; only the berth assignment changes afterwards (promotion, release).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passenger {
    pub id: PassengerId,
    pub name: String,
    pub age: i32,
    pub gender: Gender,
    pub is_parent: bool,
    pub parent_identifier: Option<String>,
    pub berth: Option<BerthAssignment>,
}

impl Passenger {
    /// Children travel on a parent's lap and never occupy inventory
    pub fn is_child(&self, rules: &ReservationRules) -> bool {
        self.age < rules.min_berth_age
    }

    pub fn is_senior(&self, rules: &ReservationRules) -> bool {
        self.age >= rules.senior_age
    }

    pub fn needs_berth(&self, rules: &ReservationRules) -> bool {
        !self.is_child(rules)
    }
}
