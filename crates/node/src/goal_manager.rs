// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Node Goal Manager: receives the goal snapshot the cloud side publishes
//! for this node, diffs it against what's currently held, and reports
//! add/update/remove changes for the scheduler loop to apply. Grounded on
//! `sg_cloud::goal_manager::GoalManager`'s table-ownership shape, adapted
//! to a single-node, diff-on-apply contract (the node side has no
//! persistent store of its own — the cloud goal table is authoritative).

use std::collections::HashMap;

use parking_lot::Mutex;

use sg_core::ScienceGoal;

/// One observed change between the previous and newly applied snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum GoalChange {
    Added(ScienceGoal),
    Updated(ScienceGoal),
    Removed(String),
}

/// Holds the set of `ScienceGoal`s currently known to apply to this node.
/// A single mutex guards the table, per spec.md §5's shared-resource list.
pub struct NodeGoalManager {
    node_name: String,
    goals: Mutex<HashMap<String, ScienceGoal>>,
}

impl NodeGoalManager {
    pub fn new(node_name: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into(),
            goals: Mutex::new(HashMap::new()),
        }
    }

    pub fn node_name(&self) -> &str {
        &self.node_name
    }

    /// Replaces the held goal set with `snapshot` (goals not addressed to
    /// this node are ignored), returning the changes relative to the
    /// previous snapshot. A goal present in both but with different
    /// contents is reported `Updated`; a goal present before but absent
    /// now is `Removed`.
    pub fn apply_snapshot(&self, snapshot: Vec<ScienceGoal>) -> Vec<GoalChange> {
        let incoming: HashMap<String, ScienceGoal> = snapshot
            .into_iter()
            .filter(|g| g.has_node(&self.node_name))
            .map(|g| (g.id.clone(), g))
            .collect();

        let mut goals = self.goals.lock();
        let mut changes = Vec::new();

        for (id, goal) in &incoming {
            match goals.get(id) {
                None => changes.push(GoalChange::Added(goal.clone())),
                Some(previous) if previous != goal => changes.push(GoalChange::Updated(goal.clone())),
                Some(_) => {}
            }
        }
        for id in goals.keys() {
            if !incoming.contains_key(id) {
                changes.push(GoalChange::Removed(id.clone()));
            }
        }

        *goals = incoming;
        changes
    }

    pub fn current_goals(&self) -> Vec<ScienceGoal> {
        self.goals.lock().values().cloned().collect()
    }

    /// Every raw rule string across every currently-held goal's SubGoal for
    /// this node, in goal-then-declaration order.
    pub fn all_rules(&self) -> Vec<String> {
        self.goals
            .lock()
            .values()
            .filter_map(|g| g.sub_goal_for_node(&self.node_name))
            .flat_map(|sg| sg.rules.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
#[path = "goal_manager_tests.rs"]
mod tests;
