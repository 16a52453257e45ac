use std::collections::{HashMap, HashSet};

use ordermap::OrderMap;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;

use crate::error::RelationError;

/// Interned handle for an element name, local to one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

/// Everything known to come before and after one element.
/// Both sets are transitively closed and never contain the element itself.
#[derive(Debug, Clone, Default)]
pub struct ElementRecord {
    pub name: String,
    pub predecessors: HashSet<ElementId>,
    pub successors: HashSet<ElementId>,
}

/// The elements of one poset and the transitive closure of their order.
///
/// Every implied pair is stored as its own entry, so `test` is a single
/// set lookup. Insertion of a relation materializes all of its
/// consequences immediately; deletion only ever removes one entry.
#[derive(Debug, Clone, Default)]
pub struct RelationStore {
    /// Stable order-of-appearance: name -> handle
    ids: OrderMap<String, ElementId>,
    records: HashMap<ElementId, ElementRecord>,
    next: u64,
}

/// Serializable view of a store, elements in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PosetSnapshot {
    pub elements: Vec<ElementSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementSnapshot {
    pub name: String,
    pub successors: Vec<String>,
}

impl RelationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ids.contains_key(name)
    }

    /// Element names in insertion order.
    pub fn elements(&self) -> impl Iterator<Item = &str> + '_ {
        self.ids.keys().map(String::as_str)
    }

    /// Adds an element related to nothing.
    pub fn insert(&mut self, name: &str) -> Result<ElementId, RelationError> {
        if self.ids.contains_key(name) {
            return Err(RelationError::DuplicateElement(name.to_owned()));
        }
        let id = ElementId(self.next);
        self.next += 1;
        self.ids.insert(name.to_owned(), id);
        self.records.insert(
            id,
            ElementRecord { name: name.to_owned(), ..ElementRecord::default() },
        );
        Ok(id)
    }

    /// Removes an element and unlinks it from every other record.
    ///
    /// Pairs between surviving elements are untouched: each of them was
    /// stored directly when it was implied, so nothing depended on `name`.
    pub fn remove(&mut self, name: &str) -> Result<(), RelationError> {
        let id = self
            .ids
            .remove(name)
            .ok_or_else(|| RelationError::UnknownElement(name.to_owned()))?;
        let Some(record) = self.records.remove(&id) else {
            return Ok(());
        };
        for p in &record.predecessors {
            if let Some(r) = self.records.get_mut(p) {
                r.successors.remove(&id);
            }
        }
        for s in &record.successors {
            if let Some(r) = self.records.get_mut(s) {
                r.predecessors.remove(&id);
            }
        }
        Ok(())
    }

    /// Drops every element and relation.
    pub fn clear(&mut self) {
        self.ids.clear();
        self.records.clear();
        self.next = 0;
    }

    /// Whether `v1` precedes `v2`. Every element precedes itself.
    pub fn test(&self, v1: &str, v2: &str) -> Result<bool, RelationError> {
        let (a, b) = (self.id(v1)?, self.id(v2)?);
        Ok(a == b || self.precedes(a, b))
    }

    /// Makes `v1` precede `v2` and stores every pair this implies.
    ///
    /// The two elements must be distinct and incomparable.
    pub fn add(&mut self, v1: &str, v2: &str) -> Result<(), RelationError> {
        let (a, b) = (self.id(v1)?, self.id(v2)?);
        if a == b {
            return Err(RelationError::Reflexive(v1.to_owned()));
        }
        if self.precedes(a, b) || self.precedes(b, a) {
            return Err(RelationError::Comparable { v1: v1.to_owned(), v2: v2.to_owned() });
        }

        // Both sides are captured before any link so the cross product
        // below is taken over the pre-insertion closure.
        let before: Vec<ElementId> = self.record(a).predecessors.iter().copied().collect();
        let after: Vec<ElementId> = self.record(b).successors.iter().copied().collect();

        for &p in &before {
            self.link(p, b);
        }
        for &s in &after {
            self.link(a, s);
            for &p in &before {
                self.link(p, s);
            }
        }
        self.link(a, b);
        Ok(())
    }

    /// Removes the single stored pair `v1 -> v2`.
    ///
    /// Refused unless the pair is stored and no element sits between the two.
    /// Entries once derived from this pair are left in place.
    pub fn del(&mut self, v1: &str, v2: &str) -> Result<(), RelationError> {
        let (a, b) = (self.id(v1)?, self.id(v2)?);
        if a == b {
            return Err(RelationError::Reflexive(v1.to_owned()));
        }
        if !self.precedes(a, b) {
            return Err(RelationError::NotRelated { v1: v1.to_owned(), v2: v2.to_owned() });
        }
        if let Some(via) = self.intermediate(a, b) {
            return Err(RelationError::Implied {
                v1: v1.to_owned(),
                v2: v2.to_owned(),
                via: self.record(via).name.clone(),
            });
        }
        self.unlink(a, b);
        Ok(())
    }

    /// Names stored as preceding `name`, in insertion order.
    pub fn predecessors(&self, name: &str) -> Result<Vec<&str>, RelationError> {
        let id = self.id(name)?;
        Ok(self.names(&self.record(id).predecessors))
    }

    /// Names stored as following `name`, in insertion order.
    pub fn successors(&self, name: &str) -> Result<Vec<&str>, RelationError> {
        let id = self.id(name)?;
        Ok(self.names(&self.record(id).successors))
    }

    /// Stored pairs with no element in between: exactly the pairs `del` accepts.
    pub fn cover_edges(&self) -> Vec<(&str, &str)> {
        let mut out = Vec::new();
        for (name, &a) in &self.ids {
            for b in sorted(&self.record(a).successors) {
                if self.intermediate(a, b).is_none() {
                    out.push((name.as_str(), self.record(b).name.as_str()));
                }
            }
        }
        out
    }

    /// The stored relation as a graph, one node per element in insertion order.
    pub fn graph(&self) -> DiGraph<String, ()> {
        let mut g: DiGraph<String, ()> = DiGraph::with_capacity(self.len(), 0);
        let mut nodes: HashMap<ElementId, NodeIndex> = HashMap::with_capacity(self.len());
        for (name, &id) in &self.ids {
            nodes.insert(id, g.add_node(name.clone()));
        }
        for &a in self.ids.values() {
            for b in sorted(&self.record(a).successors) {
                g.add_edge(nodes[&a], nodes[&b], ());
            }
        }
        g
    }

    /// One deterministic total order compatible with the stored relation.
    /// Returns Err with the "stuck" name if a cycle prevents a full order.
    pub fn linear_extension(&self) -> Result<Vec<String>, Vec<String>> {
        let g = self.graph();
        match toposort(&g, None) {
            Ok(order) => Ok(order.into_iter().map(|ix| g[ix].clone()).collect()),
            Err(cycle) => Err(vec![g[cycle.node_id()].clone()]),
        }
    }

    pub fn snapshot(&self) -> PosetSnapshot {
        let elements = self
            .ids
            .iter()
            .map(|(name, &id)| ElementSnapshot {
                name: name.clone(),
                successors: self
                    .names(&self.record(id).successors)
                    .into_iter()
                    .map(str::to_owned)
                    .collect(),
            })
            .collect();
        PosetSnapshot { elements }
    }

    fn id(&self, name: &str) -> Result<ElementId, RelationError> {
        self.ids
            .get(name)
            .copied()
            .ok_or_else(|| RelationError::UnknownElement(name.to_owned()))
    }

    // Handles in `ids` and in every set are always live.
    fn record(&self, id: ElementId) -> &ElementRecord {
        &self.records[&id]
    }

    fn precedes(&self, a: ElementId, b: ElementId) -> bool {
        self.record(a).successors.contains(&b)
    }

    /// Some `x` with `a -> x` and `x -> b` both stored.
    fn intermediate(&self, a: ElementId, b: ElementId) -> Option<ElementId> {
        let (succ, pred) = (&self.record(a).successors, &self.record(b).predecessors);
        let (small, large) = if succ.len() <= pred.len() { (succ, pred) } else { (pred, succ) };
        small.iter().copied().filter(|x| large.contains(x)).min()
    }

    fn names(&self, set: &HashSet<ElementId>) -> Vec<&str> {
        sorted(set).into_iter().map(|id| self.record(id).name.as_str()).collect()
    }

    fn link(&mut self, from: ElementId, to: ElementId) {
        if let Some(r) = self.records.get_mut(&from) {
            r.successors.insert(to);
        }
        if let Some(r) = self.records.get_mut(&to) {
            r.predecessors.insert(from);
        }
    }

    fn unlink(&mut self, from: ElementId, to: ElementId) {
        if let Some(r) = self.records.get_mut(&from) {
            r.successors.remove(&to);
        }
        if let Some(r) = self.records.get_mut(&to) {
            r.predecessors.remove(&from);
        }
    }
}

// Handles grow with insertion, so this is insertion order.
fn sorted(set: &HashSet<ElementId>) -> Vec<ElementId> {
    let mut ids: Vec<ElementId> = set.iter().copied().collect();
    ids.sort_unstable();
    ids
}
