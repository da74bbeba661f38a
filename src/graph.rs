//! Activity precedence graph.
//!
//! Activities live in an arena indexed by insertion position; edges run
//! from predecessor to successor. Removal tombstones the slot and drops
//! its incident edges, so indices of the remaining nodes stay stable.
//!
//! Validation detects cycles (including self-dependencies) with a
//! depth-first search for back edges.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use std::collections::{BTreeSet, HashMap};

use crate::error::{Error, Result};
use crate::models::Activity;

/// Directed acyclic graph of activities.
///
/// # Example
///
/// ```
/// use risk_schedule::graph::ActivityGraph;
/// use risk_schedule::models::Activity;
///
/// let mut graph = ActivityGraph::new();
/// graph.add_activity(Activity::new("A")).unwrap();
/// graph.add_activity(Activity::new("B")).unwrap();
/// graph.add_dependency("A", "B").unwrap();
/// graph.validate().unwrap();
///
/// assert_eq!(graph.successors("A").unwrap(), vec!["B"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ActivityGraph {
    slots: Vec<Option<Activity>>,
    index: HashMap<String, usize>,
    predecessors: Vec<BTreeSet<usize>>,
    successors: Vec<BTreeSet<usize>>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InStack,
    Done,
}

impl ActivityGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from activities and their `predecessors` lists.
    ///
    /// Fails on duplicate IDs or predecessors that are not in the set.
    /// Cycles are not checked here; call [`validate`](Self::validate).
    pub fn from_activities<I>(activities: I) -> Result<Self>
    where
        I: IntoIterator<Item = Activity>,
    {
        let mut graph = Self::new();
        let mut links = Vec::new();
        for activity in activities {
            for pred in &activity.predecessors {
                links.push((pred.clone(), activity.id.clone()));
            }
            graph.add_activity(activity)?;
        }
        for (pred, succ) in links {
            graph.add_dependency(&pred, &succ)?;
        }
        Ok(graph)
    }

    /// Adds an activity.
    ///
    /// Edges are not created from `activity.predecessors`; use
    /// [`add_dependency`](Self::add_dependency) or [`from_activities`](Self::from_activities).
    pub fn add_activity(&mut self, activity: Activity) -> Result<()> {
        if self.index.contains_key(&activity.id) {
            return Err(Error::DuplicateIdentifier(activity.id));
        }
        let slot = self.slots.len();
        self.index.insert(activity.id.clone(), slot);
        self.slots.push(Some(activity));
        self.predecessors.push(BTreeSet::new());
        self.successors.push(BTreeSet::new());
        Ok(())
    }

    /// Adds the edge `predecessor → successor`.
    ///
    /// The successor's `predecessors` list is kept in sync so that a
    /// schedule built from this graph carries the same relation.
    pub fn add_dependency(&mut self, predecessor_id: &str, successor_id: &str) -> Result<()> {
        let pred = self.slot_of(predecessor_id)?;
        let succ = self.slot_of(successor_id)?;
        self.successors[pred].insert(succ);
        self.predecessors[succ].insert(pred);
        if let Some(activity) = self.slots[succ].as_mut() {
            if !activity.predecessors.iter().any(|p| p == predecessor_id) {
                activity.predecessors.push(predecessor_id.to_string());
            }
        }
        Ok(())
    }

    /// Checks that the predecessor relation is acyclic.
    ///
    /// Fails with [`Error::CyclicDependency`] naming an activity on the cycle.
    pub fn validate(&self) -> Result<()> {
        let mut marks = vec![Mark::Unvisited; self.slots.len()];
        for slot in self.live_slots() {
            if marks[slot] == Mark::Unvisited {
                if let Some(on_cycle) = self.find_back_edge(slot, &mut marks) {
                    return Err(Error::CyclicDependency(self.id_at(on_cycle).to_string()));
                }
            }
        }
        Ok(())
    }

    /// Iterative DFS from `start`; returns a node on a cycle if one is found.
    fn find_back_edge(&self, start: usize, marks: &mut [Mark]) -> Option<usize> {
        let mut stack: Vec<(usize, Vec<usize>)> = Vec::new();
        marks[start] = Mark::InStack;
        stack.push((start, self.successors[start].iter().copied().collect()));

        while let Some((node, pending)) = stack.last_mut() {
            let node = *node;
            match pending.pop() {
                Some(next) => match marks[next] {
                    Mark::InStack => return Some(next),
                    Mark::Unvisited => {
                        marks[next] = Mark::InStack;
                        let children = self.successors[next].iter().copied().collect();
                        stack.push((next, children));
                    }
                    Mark::Done => {}
                },
                None => {
                    marks[node] = Mark::Done;
                    stack.pop();
                }
            }
        }
        None
    }

    /// Removes an activity and its incident edges.
    pub fn remove_activity(&mut self, id: &str) -> Result<Activity> {
        let slot = self.slot_of(id)?;
        for pred in std::mem::take(&mut self.predecessors[slot]) {
            self.successors[pred].remove(&slot);
        }
        for succ in std::mem::take(&mut self.successors[slot]) {
            self.predecessors[succ].remove(&slot);
        }
        self.index.remove(id);
        self.slots[slot]
            .take()
            .ok_or_else(|| Error::UnknownActivity(id.to_string()))
    }

    /// Looks up an activity.
    pub fn get(&self, id: &str) -> Option<&Activity> {
        self.index.get(id).and_then(|&slot| self.slots[slot].as_ref())
    }

    /// Whether the graph holds `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// IDs of the direct predecessors of `id`, in insertion order.
    pub fn predecessors(&self, id: &str) -> Result<Vec<&str>> {
        let slot = self.slot_of(id)?;
        Ok(self.predecessors[slot].iter().map(|&p| self.id_at(p)).collect())
    }

    /// IDs of the direct successors of `id`, in insertion order.
    pub fn successors(&self, id: &str) -> Result<Vec<&str>> {
        let slot = self.slot_of(id)?;
        Ok(self.successors[slot].iter().map(|&s| self.id_at(s)).collect())
    }

    /// Activities in insertion order.
    pub fn activities(&self) -> impl Iterator<Item = &Activity> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    /// Number of activities.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the graph has no activities.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // ---- slot-level access for the scheduler ----

    /// Slots of live activities in insertion order.
    pub(crate) fn live_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, a)| a.as_ref().map(|_| slot))
    }

    /// Upper bound of slot indices (including tombstones).
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn activity_at(&self, slot: usize) -> Option<&Activity> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub(crate) fn predecessor_slots(&self, slot: usize) -> &BTreeSet<usize> {
        &self.predecessors[slot]
    }

    pub(crate) fn successor_slots(&self, slot: usize) -> &BTreeSet<usize> {
        &self.successors[slot]
    }

    fn slot_of(&self, id: &str) -> Result<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| Error::UnknownActivity(id.to_string()))
    }

    fn id_at(&self, slot: usize) -> &str {
        self.slots[slot].as_ref().map_or("", |a| a.id.as_str())
    }
}
