//! Build shipment classification against the configured Brew tags.

use std::collections::HashSet;

use crate::config::TargetSpec;

/// Promotion stage of a build relative to the configured Brew tags.
///
/// Ordered from least to most shipped so the aggregate state of a tracker's
/// builds is simply the minimum over them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ShipState {
    /// Fix not yet built into the candidate tag.
    NotCandidate,
    /// Built into the candidate tag but not yet shipped.
    Candidate,
    /// Tagged into the production tag.
    Shipped,
}

/// Classify one build's current tag set. The production tag dominates: a
/// build carrying both tags counts as shipped.
pub fn classify(tags: &HashSet<String>, target: &TargetSpec) -> ShipState {
    if tags.contains(&target.prod_brew_tag) {
        ShipState::Shipped
    } else if tags.contains(&target.candidate_brew_tag) {
        ShipState::Candidate
    } else {
        ShipState::NotCandidate
    }
}

/// Aggregate state over all builds a tracker delivers: every build must
/// reach a stage before the tracker counts as being at that stage, so one
/// untagged build holds the whole tracker back.
pub fn classify_all<'a, I>(tag_sets: I, target: &TargetSpec) -> ShipState
where
    I: IntoIterator<Item = &'a HashSet<String>>,
{
    tag_sets
        .into_iter()
        .map(|tags| classify(tags, target))
        .min()
        .unwrap_or(ShipState::NotCandidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> TargetSpec {
        TargetSpec {
            project: "OCPBUGS".to_string(),
            component: "RHCOS".to_string(),
            version: "4.14".to_string(),
            target_release: "4.14.0".to_string(),
            candidate_brew_tag: "rhaos-4.14-rhel-9-candidate".to_string(),
            prod_brew_tag: "rhaos-4.14-rhel-9".to_string(),
        }
    }

    fn tags(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_prod_tag_means_shipped() {
        let state = classify(&tags(&["rhaos-4.14-rhel-9"]), &target());
        assert_eq!(state, ShipState::Shipped);
    }

    #[test]
    fn test_prod_tag_dominates_candidate() {
        // Tag sets are unordered; prod presence decides regardless of what
        // else is applied.
        let state = classify(
            &tags(&["rhaos-4.14-rhel-9-candidate", "rhaos-4.14-rhel-9", "irrelevant"]),
            &target(),
        );
        assert_eq!(state, ShipState::Shipped);
    }

    #[test]
    fn test_candidate_tag_only() {
        let state = classify(&tags(&["irrelevant", "rhaos-4.14-rhel-9-candidate"]), &target());
        assert_eq!(state, ShipState::Candidate);
    }

    #[test]
    fn test_no_relevant_tags() {
        assert_eq!(classify(&tags(&[]), &target()), ShipState::NotCandidate);
        assert_eq!(classify(&tags(&["other-tag"]), &target()), ShipState::NotCandidate);
    }

    #[test]
    fn test_state_ordering() {
        assert!(ShipState::NotCandidate < ShipState::Candidate);
        assert!(ShipState::Candidate < ShipState::Shipped);
    }

    #[test]
    fn test_aggregate_takes_minimum() {
        let shipped = tags(&["rhaos-4.14-rhel-9"]);
        let candidate = tags(&["rhaos-4.14-rhel-9-candidate"]);
        let sets = vec![shipped, candidate];
        assert_eq!(classify_all(&sets, &target()), ShipState::Candidate);
    }

    #[test]
    fn test_aggregate_all_shipped() {
        let sets = vec![
            tags(&["rhaos-4.14-rhel-9", "rhaos-4.14-rhel-9-candidate"]),
            tags(&["rhaos-4.14-rhel-9"]),
        ];
        assert_eq!(classify_all(&sets, &target()), ShipState::Shipped);
    }

    #[test]
    fn test_aggregate_empty_is_not_candidate() {
        let sets: Vec<HashSet<String>> = Vec::new();
        assert_eq!(classify_all(&sets, &target()), ShipState::NotCandidate);
    }
}
