use serde::{Deserialize, Serialize};

/// Physical berth categories in the coach
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum BerthType {
    Lower,
    Middle,
    Upper,
    SideLower,
}

/// Identity of a single berth: category plus 1-based index within it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct BerthId {
    pub berth_type: BerthType,
    pub index: u16,
}

impl BerthId {
    pub fn new(berth_type: BerthType, index: u16) -> Self {
        Self { berth_type, index }
    }
}

/// A passenger's claim on a berth. `slot` distinguishes the two occupant
/// positions of a side-lower berth; regular berths always use slot 1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BerthAssignment {
    pub berth: BerthId,
    pub slot: u8,
}

impl BerthAssignment {
    pub fn new(berth: BerthId, slot: u8) -> Self {
        Self { berth, slot }
    }

    pub fn is_confirmed_berth(&self) -> bool {
        self.berth.berth_type != BerthType::SideLower
    }
}
