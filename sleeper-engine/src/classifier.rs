use sleeper_domain::{Gender, Passenger, ReservationRules};

/// Priority buckets for lower-berth preference during confirmed
/// allocation. Ordering is allocation order: seniors first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PriorityClass {
    Senior,
    LadyWithChild,
    Normal,
}

/// Classify one passenger within its booking group. The group is needed
/// to detect a mother travelling with a child linked through
/// `parent_identifier`.
pub fn classify(passenger: &Passenger, group: &[Passenger], rules: &ReservationRules) -> PriorityClass {
    if passenger.is_senior(rules) {
        return PriorityClass::Senior;
    }
    if passenger.gender == Gender::Female && (passenger.is_parent || has_linked_child(passenger, group, rules)) {
        return PriorityClass::LadyWithChild;
    }
    PriorityClass::Normal
}

fn has_linked_child(passenger: &Passenger, group: &[Passenger], rules: &ReservationRules) -> bool {
    let Some(identifier) = passenger
        .parent_identifier
        .as_deref()
        .filter(|s| !s.is_empty())
    else {
        return false;
    };
    group
        .iter()
        .any(|p| p.is_child(rules) && p.parent_identifier.as_deref() == Some(identifier))
}

/// Indices of the group's berth-holding passengers in allocation order:
/// seniors, then ladies with children, then the rest; request order
/// preserved within each bucket.
pub fn prioritized_indices(group: &[Passenger], rules: &ReservationRules) -> Vec<usize> {
    let mut indices: Vec<usize> = group
        .iter()
        .enumerate()
        .filter(|(_, p)| p.needs_berth(rules))
        .map(|(i, _)| i)
        .collect();
    indices.sort_by_key(|&i| classify(&group[i], group, rules));
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use sleeper_domain::PassengerId;

    fn passenger(id: PassengerId, name: &str, age: i32, gender: Gender) -> Passenger {
        Passenger {
            id,
            name: name.to_string(),
            age,
            gender,
            is_parent: false,
            parent_identifier: None,
            berth: None,
        }
    }

    #[test]
    fn test_senior_classification() {
        let rules = ReservationRules::default();
        let group = vec![passenger(1, "Asha", 64, Gender::Female)];
        assert_eq!(classify(&group[0], &group, &rules), PriorityClass::Senior);
    }

    #[test]
    fn test_lady_with_child_via_is_parent() {
        let rules = ReservationRules::default();
        let mut mother = passenger(1, "Mary", 32, Gender::Female);
        mother.is_parent = true;
        let group = vec![mother];
        assert_eq!(
            classify(&group[0], &group, &rules),
            PriorityClass::LadyWithChild
        );
    }

    #[test]
    fn test_lady_with_child_via_linked_child() {
        let rules = ReservationRules::default();
        let mut mother = passenger(1, "Mary", 32, Gender::Female);
        mother.parent_identifier = Some("family2".to_string());
        let mut kid = passenger(2, "Kid", 4, Gender::Male);
        kid.parent_identifier = Some("family2".to_string());
        let group = vec![mother, kid];
        assert_eq!(
            classify(&group[0], &group, &rules),
            PriorityClass::LadyWithChild
        );
    }

    #[test]
    fn test_father_with_child_is_normal() {
        let rules = ReservationRules::default();
        let mut father = passenger(1, "Ravi", 35, Gender::Male);
        father.is_parent = true;
        father.parent_identifier = Some("family1".to_string());
        let mut kid = passenger(2, "Kid", 3, Gender::Female);
        kid.parent_identifier = Some("family1".to_string());
        let group = vec![father, kid];
        assert_eq!(classify(&group[0], &group, &rules), PriorityClass::Normal);
    }

    #[test]
    fn test_prioritized_order_is_stable_within_bucket() {
        let rules = ReservationRules::default();
        let group = vec![
            passenger(1, "Normal1", 30, Gender::Male),
            passenger(2, "Senior1", 70, Gender::Male),
            passenger(3, "Kid", 2, Gender::Other),
            passenger(4, "Senior2", 61, Gender::Female),
            passenger(5, "Normal2", 45, Gender::Female),
        ];
        // Seniors keep request order, then normals keep request order;
        // the child is excluded entirely
        assert_eq!(prioritized_indices(&group, &rules), vec![1, 3, 0, 4]);
    }
}
