//! Step Partitioner
//!
//! Buckets eligible groups by wizard step. Step 1 always exists, even when
//! empty, so the wizard never opens on a later step. Within a step groups are
//! ordered by `sort_order` (missing = 0), ties keep catalog order.

use shared::models::OptionGroup;
use std::collections::BTreeMap;
use std::ops::Bound;

/// Ordered step sequence with the groups shown in each step
#[derive(Debug, Clone)]
pub struct StepPlan<'a> {
    steps: BTreeMap<u32, Vec<&'a OptionGroup>>,
}

impl<'a> StepPlan<'a> {
    /// Partition already-eligible groups (given in catalog order)
    pub fn partition(groups: impl IntoIterator<Item = &'a OptionGroup>) -> Self {
        let mut steps: BTreeMap<u32, Vec<&'a OptionGroup>> = BTreeMap::new();
        steps.entry(1).or_default();
        for group in groups {
            steps.entry(group.step()).or_default().push(group);
        }
        for bucket in steps.values_mut() {
            // Stable sort keeps catalog order for ties
            bucket.sort_by_key(|g| g.ui.sort_order);
        }
        Self { steps }
    }

    /// Step numbers in navigation order
    pub fn step_numbers(&self) -> Vec<u32> {
        self.steps.keys().copied().collect()
    }

    /// Groups of one step, in display order
    pub fn groups(&self, step: u32) -> &[&'a OptionGroup] {
        self.steps.get(&step).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All groups, step by step
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[&'a OptionGroup])> {
        self.steps.iter().map(|(step, groups)| (*step, groups.as_slice()))
    }

    /// Step following `step`, if any
    pub fn next_step(&self, step: u32) -> Option<u32> {
        self.steps
            .range((Bound::Excluded(step), Bound::Unbounded))
            .next().map(|(s, _)| *s)
    }

    /// Step preceding `step`, if any
    pub fn previous_step(&self, step: u32) -> Option<u32> {
        self.steps.range(..step).next_back().map(|(s, _)| *s)
    }

    pub fn last_step(&self) -> u32 {
        self.steps.keys().next_back().copied().unwrap_or(1)
    }

    /// Groups of one step bucketed by their category label
    ///
    /// Buckets are ordered by `category_sort_order` (smallest in the bucket),
    /// ties by first appearance; groups keep their display order inside a bucket.
    pub fn by_category(&self, step: u32) -> Vec<(Option<&'a str>, Vec<&'a OptionGroup>)> {
        let mut buckets: Vec<(Option<&'a str>, i32, Vec<&'a OptionGroup>)> = Vec::new();
        for &group in self.groups(step) {
            let label = group.ui.category.as_deref();
            match buckets.iter_mut().find(|(l, _, _)| *l == label) {
                Some((_, order, members)) => {
                    *order = (*order).min(group.ui.category_sort_order);
                    members.push(group);
                }
                None => buckets.push((label, group.ui.category_sort_order, vec![group])),
            }
        }
        buckets.sort_by_key(|(_, order, _)| *order);
        buckets
            .into_iter()
            .map(|(label, _, members)| (label, members))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::testing::group;

    fn keys(groups: &[&OptionGroup]) -> Vec<String> {
        groups.iter().map(|g| g.key().to_string()).collect()
    }

    #[test]
    fn test_step_one_always_present() {
        let groups = vec![group("addon", 2), group("extra", 3)];
        let plan = StepPlan::partition(groups.iter());
        assert_eq!(plan.step_numbers(), vec![1, 2, 3]);
        assert!(plan.groups(1).is_empty());
    }

    #[test]
    fn test_sort_order_with_stable_ties() {
        let mut a = group("a", 2);
        a.ui.sort_order = 5;
        let b = group("b", 2);
        let c = group("c", 2);
        let mut d = group("d", 2);
        d.ui.sort_order = -1;
        let groups = vec![a, b, c, d];
        let plan = StepPlan::partition(groups.iter());
        assert_eq!(keys(plan.groups(2)), vec!["d", "b", "c", "a"]);
    }

    #[test]
    fn test_navigation() {
        let groups = vec![group("a", 1), group("b", 2), group("c", 4)];
        let plan = StepPlan::partition(groups.iter());
        assert_eq!(plan.next_step(1), Some(2));
        assert_eq!(plan.next_step(2), Some(4));
        assert_eq!(plan.next_step(4), None);
        assert_eq!(plan.previous_step(4), Some(2));
        assert_eq!(plan.previous_step(1), None);
        assert_eq!(plan.last_step(), 4);
    }

    #[test]
    fn test_navigation_at_max_step() {
        let groups = vec![group("a", 1), group("z", u32::MAX)];
        let plan = StepPlan::partition(groups.iter());
        assert_eq!(plan.next_step(1), Some(u32::MAX));
        assert_eq!(plan.next_step(u32::MAX), None);
        assert_eq!(plan.previous_step(u32::MAX), Some(1));
    }

    #[test]
    fn test_by_category() {
        let mut a = group("a", 2);
        a.ui.category = Some("Straps".into());
        a.ui.category_sort_order = 2;
        let mut b = group("b", 2);
        b.ui.category = Some("Coatings".into());
        b.ui.category_sort_order = 1;
        let mut c = group("c", 2);
        c.ui.category = Some("Straps".into());
        c.ui.category_sort_order = 2;
        let groups = vec![a, b, c];
        let plan = StepPlan::partition(groups.iter());
        let buckets = plan.by_category(2);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].0, Some("Coatings"));
        assert_eq!(keys(&buckets[1].1), vec!["a", "c"]);
    }
}
