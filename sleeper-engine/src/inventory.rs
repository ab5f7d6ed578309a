use sleeper_domain::{BerthId, BerthType, CoachLayout, PassengerId};

use crate::error::EngineError;

/// Occupants a side-lower berth accommodates (RAC shares one berth
/// between two passengers); every other berth holds one.
pub const SIDE_LOWER_OCCUPANCY: usize = 2;

#[derive(Debug, Clone)]
pub struct Berth {
    pub id: BerthId,
    pub occupants: Vec<PassengerId>,
}

impl Berth {
    fn new(id: BerthId) -> Self {
        Self {
            id,
            occupants: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        match self.id.berth_type {
            BerthType::SideLower => SIDE_LOWER_OCCUPANCY,
            _ => 1,
        }
    }

    pub fn free_slots(&self) -> usize {
        self.capacity() - self.occupants.len()
    }

    pub fn is_free(&self) -> bool {
        self.occupants.is_empty()
    }
}

/// The fixed berth pool of the coach. Berths are created once at
/// initialization and ordered by (type, index), so free-berth scans are
/// deterministic: lowest index first.
#[derive(Debug, Clone)]
pub struct Inventory {
    berths: Vec<Berth>,
}

impl Inventory {
    pub fn new(layout: &CoachLayout) -> Self {
        let mut berths = Vec::with_capacity(
            (layout.lower_berths
                + layout.middle_berths
                + layout.upper_berths
                + layout.side_lower_berths) as usize,
        );
        let sections = [
            (BerthType::Lower, layout.lower_berths),
            (BerthType::Middle, layout.middle_berths),
            (BerthType::Upper, layout.upper_berths),
            (BerthType::SideLower, layout.side_lower_berths),
        ];
        for (berth_type, count) in sections {
            for index in 1..=count {
                berths.push(Berth::new(BerthId::new(berth_type, index)));
            }
        }
        Self { berths }
    }

    pub fn berths(&self) -> &[Berth] {
        &self.berths
    }

    fn berth_mut(&mut self, id: BerthId) -> Result<&mut Berth, EngineError> {
        self.berths
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| EngineError::Inconsistent(format!("unknown berth {:?}", id)))
    }

    pub fn count_free(&self, berth_type: BerthType) -> usize {
        self.berths
            .iter()
            .filter(|b| b.id.berth_type == berth_type && b.is_free())
            .count()
    }

    /// Free berth ids of one type, lowest index first
    pub fn free_ids(&self, berth_type: BerthType) -> Vec<BerthId> {
        self.berths
            .iter()
            .filter(|b| b.id.berth_type == berth_type && b.is_free())
            .map(|b| b.id)
            .collect()
    }

    pub fn first_free(&self, berth_type: BerthType) -> Option<BerthId> {
        self.berths
            .iter()
            .find(|b| b.id.berth_type == berth_type && b.is_free())
            .map(|b| b.id)
    }

    /// Sum of open occupant slots over the side-lower berths
    pub fn side_lower_free_slots(&self) -> usize {
        self.berths
            .iter()
            .filter(|b| b.id.berth_type == BerthType::SideLower)
            .map(|b| b.free_slots())
            .sum()
    }

    /// Next side-lower slot under the packing rule: half-full berths are
    /// filled before empty ones so that releasing one occupant always
    /// frees exactly one RAC slot; lowest index within each category.
    pub fn next_side_lower_slot(&self) -> Option<BerthId> {
        let side_lowers = || {
            self.berths
                .iter()
                .filter(|b| b.id.berth_type == BerthType::SideLower)
        };
        side_lowers()
            .find(|b| b.occupants.len() == 1)
            .or_else(|| side_lowers().find(|b| b.is_free()))
            .map(|b| b.id)
    }

    /// Plan `count` side-lower slots without mutating, in the exact order
    /// sequential `next_side_lower_slot` + `occupy` calls would pick them
    pub fn plan_side_lower_slots(&self, count: usize) -> Option<Vec<BerthId>> {
        let mut simulated: Vec<(BerthId, usize)> = self
            .berths
            .iter()
            .filter(|b| b.id.berth_type == BerthType::SideLower)
            .map(|b| (b.id, b.occupants.len()))
            .collect();
        let mut plan = Vec::with_capacity(count);
        for _ in 0..count {
            let next = match simulated
                .iter_mut()
                .position(|(_, occ)| *occ == 1)
                .or_else(|| simulated.iter().position(|(_, occ)| *occ == 0))
            {
                Some(i) => &mut simulated[i],
                None => return None,
            };
            next.1 += 1;
            plan.push(next.0);
        }
        Some(plan)
    }

    /// Seat `passenger` on `berth`. Returns the 1-based occupant slot.
    pub fn occupy(&mut self, id: BerthId, passenger: PassengerId) -> Result<u8, EngineError> {
        let berth = self.berth_mut(id)?;
        if berth.free_slots() == 0 {
            return Err(EngineError::Inconsistent(format!(
                "berth {:?} is already fully occupied",
                id
            )));
        }
        berth.occupants.push(passenger);
        Ok(berth.occupants.len() as u8)
    }

    /// Remove `passenger` from `berth`. A release for a passenger that is
    /// not seated there is a broken invariant.
    pub fn release(&mut self, id: BerthId, passenger: PassengerId) -> Result<(), EngineError> {
        let berth = self.berth_mut(id)?;
        let pos = berth
            .occupants
            .iter()
            .position(|&p| p == passenger)
            .ok_or_else(|| {
                EngineError::Inconsistent(format!(
                    "passenger {} does not occupy berth {:?}",
                    passenger, id
                ))
            })?;
        berth.occupants.remove(pos);
        Ok(())
    }

    pub fn occupant_of(&self, passenger: PassengerId) -> Option<BerthId> {
        self.berths
            .iter()
            .find(|b| b.occupants.contains(&passenger))
            .map(|b| b.id)
    }
}
