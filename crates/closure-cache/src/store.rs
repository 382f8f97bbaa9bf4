//! Adjacency store: the direct view of the relation.
//!
//! Every term owns one record in a flat arena addressed by [`TermId`]. A
//! class of mutually reachable terms is represented by one *lead* record
//! that holds the other members and the class's direct successor and
//! predecessor leads; the remaining members only point back at the lead.
//! All links are indices, so a cycle among terms never becomes a cycle of
//! owning references.
//!
//! Invariants maintained by the mutators (checked by
//! [`AdjacencyStore::check_structure`] and
//! [`AdjacencyStore::check_acyclic`]):
//! - a lead's `lead` is itself, a member's `lead` names a lead whose
//!   `members` list contains it;
//! - only leads carry `members`, `succ`, `pred`;
//! - `succ`/`pred` are symmetric, never self-referencing, and only name
//!   leads;
//! - the graph of leads is acyclic.

use crate::closure::Direction;
use crate::error::{Invariant, InvariantViolation};
use crate::term::TermId;
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::iter::{Chain, Copied, Once};
use std::mem;
use std::slice;

/// Members of one class, lead first.
pub type ClassMembers<'a> = Chain<Once<TermId>, Copied<slice::Iter<'a, TermId>>>;

#[derive(Debug, Clone)]
struct TermNode {
    lead: TermId,
    members: Vec<TermId>,
    succ: BTreeSet<TermId>,
    pred: BTreeSet<TermId>,
}

impl TermNode {
    fn singleton(id: TermId) -> Self {
        Self {
            lead: id,
            members: Vec::new(),
            succ: BTreeSet::new(),
            pred: BTreeSet::new(),
        }
    }
}

/// Arena of term records holding the direct view and class bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyStore {
    nodes: Vec<TermNode>,
}

impl AdjacencyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of term records.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a record for a newly registered term, in its own class.
    pub fn push(&mut self) -> TermId {
        let id = TermId::new(self.nodes.len());
        self.nodes.push(TermNode::singleton(id));
        id
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    fn node(&self, id: TermId) -> &TermNode {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: TermId) -> &mut TermNode {
        &mut self.nodes[id.index()]
    }

    /// Lead of the class containing `id`.
    pub fn lead(&self, id: TermId) -> TermId {
        self.node(id).lead
    }

    pub fn is_lead(&self, id: TermId) -> bool {
        self.lead(id) == id
    }

    /// Iterate every class lead in index order.
    pub fn leads(&self) -> impl Iterator<Item = TermId> + '_ {
        (0..self.nodes.len())
            .map(TermId::new)
            .filter(|&id| self.is_lead(id))
    }

    /// Whether `id` belongs to a class with more than one member.
    pub fn in_cycle(&self, id: TermId) -> bool {
        !self.node(self.lead(id)).members.is_empty()
    }

    /// All members of the class containing `id`, lead first.
    pub fn class_of(&self, id: TermId) -> ClassMembers<'_> {
        let lead = self.lead(id);
        std::iter::once(lead).chain(self.node(lead).members.iter().copied())
    }

    pub fn class_size(&self, id: TermId) -> usize {
        1 + self.node(self.lead(id)).members.len()
    }

    /// Direct successor leads of the class containing `id`.
    pub fn successors(&self, id: TermId) -> &BTreeSet<TermId> {
        &self.node(self.lead(id)).succ
    }

    /// Direct predecessor leads of the class containing `id`.
    pub fn predecessors(&self, id: TermId) -> &BTreeSet<TermId> {
        &self.node(self.lead(id)).pred
    }

    pub fn neighbours(&self, id: TermId, direction: Direction) -> &BTreeSet<TermId> {
        match direction {
            Direction::Forward => self.successors(id),
            Direction::Backward => self.predecessors(id),
        }
    }

    /// Whether `from` is related to `to` in the direct view.
    pub fn has_direct(&self, from: TermId, to: TermId) -> bool {
        let (from, to) = (self.lead(from), self.lead(to));
        from == to || self.node(from).succ.contains(&to)
    }

    /// Whether `to` is reachable from `from` (reflexively).
    pub fn reaches(&self, from: TermId, to: TermId) -> bool {
        let (from, to) = (self.lead(from), self.lead(to));
        if from == to {
            return true;
        }
        let mut visited = HashSet::new();
        let mut stack = vec![from];
        while let Some(current) = stack.pop() {
            for &next in &self.node(current).succ {
                if next == to {
                    return true;
                }
                if visited.insert(next) {
                    stack.push(next);
                }
            }
        }
        false
    }

    /// Leads strictly reachable from the class of `id` in `direction`.
    pub fn reachable(&self, id: TermId, direction: Direction) -> BTreeSet<TermId> {
        let start = self.lead(id);
        let mut found = BTreeSet::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            for &next in self.neighbours(current, direction) {
                if found.insert(next) {
                    stack.push(next);
                }
            }
        }
        found
    }

    /// Leads that reach the class of `id`, including that class's lead.
    pub fn ancestors(&self, id: TermId) -> BTreeSet<TermId> {
        let mut found = self.reachable(id, Direction::Backward);
        found.insert(self.lead(id));
        found
    }

    /// Leads reachable from the class of `id`, including that class's lead.
    pub fn descendants(&self, id: TermId) -> BTreeSet<TermId> {
        let mut found = self.reachable(id, Direction::Forward);
        found.insert(self.lead(id));
        found
    }

    /// Add a direct edge between two distinct leads.
    pub(crate) fn link(&mut self, from: TermId, to: TermId) -> bool {
        debug_assert!(self.is_lead(from) && self.is_lead(to) && from != to);
        let added = self.node_mut(from).succ.insert(to);
        self.node_mut(to).pred.insert(from);
        added
    }

    pub(crate) fn unlink(&mut self, from: TermId, to: TermId) -> bool {
        let removed = self.node_mut(from).succ.remove(&to);
        self.node_mut(to).pred.remove(&from);
        removed
    }

    /// Collapse the classes led by `component` into one class led by `into`.
    ///
    /// External edges of every merged class are rewired onto `into`; edges
    /// between merged classes disappear into the class representation.
    pub(crate) fn merge(&mut self, into: TermId, component: &BTreeSet<TermId>) {
        debug_assert!(component.contains(&into));
        let mut members = Vec::new();
        let mut succ = BTreeSet::new();
        let mut pred = BTreeSet::new();
        for &lead in component {
            let node = self.node_mut(lead);
            succ.append(&mut node.succ);
            pred.append(&mut node.pred);
            if lead != into {
                members.push(lead);
            }
            members.append(&mut node.members);
        }
        succ.retain(|id| !component.contains(id));
        pred.retain(|id| !component.contains(id));

        for &next in &succ {
            let back = &mut self.node_mut(next).pred;
            back.retain(|id| !component.contains(id));
            back.insert(into);
        }
        for &prev in &pred {
            let forward = &mut self.node_mut(prev).succ;
            forward.retain(|id| !component.contains(id));
            forward.insert(into);
        }
        for &member in &members {
            self.node_mut(member).lead = into;
        }

        let node = self.node_mut(into);
        node.lead = into;
        node.members = members;
        node.succ = succ;
        node.pred = pred;
    }

    /// Drop direct successors of `lead` that lie in `targets`.
    pub(crate) fn prune_into(&mut self, lead: TermId, targets: &BTreeSet<TermId>) -> usize {
        let doomed: Vec<TermId> = self
            .node(lead)
            .succ
            .iter()
            .copied()
            .filter(|id| targets.contains(id))
            .collect();
        for &target in &doomed {
            self.unlink(lead, target);
        }
        doomed.len()
    }

    /// Drop direct successors of `lead` reachable through another successor.
    pub(crate) fn prune_successors(&mut self, lead: TermId) -> usize {
        let covered = self.covered_successors(lead);
        self.prune_into(lead, &covered)
    }

    /// Successors of `lead` that are also reachable via a different successor.
    fn covered_successors(&self, lead: TermId) -> BTreeSet<TermId> {
        let succ = &self.node(lead).succ;
        let mut below = BTreeSet::new();
        for &next in succ {
            below.extend(self.reachable(next, Direction::Forward));
        }
        succ.intersection(&below).copied().collect()
    }

    /// Cut the classes led by `region` loose and split them into singletons.
    ///
    /// Returns every term that belonged to the region. Edges from outside
    /// leads into the region are dropped as well.
    pub(crate) fn detach(&mut self, region: &BTreeSet<TermId>) -> Vec<TermId> {
        let mut terms = Vec::new();
        for &lead in region {
            let node = self.node_mut(lead);
            let succ = mem::take(&mut node.succ);
            let pred = mem::take(&mut node.pred);
            let members = mem::take(&mut node.members);
            for next in succ.into_iter().filter(|id| !region.contains(id)) {
                self.node_mut(next).pred.remove(&lead);
            }
            for prev in pred.into_iter().filter(|id| !region.contains(id)) {
                self.node_mut(prev).succ.remove(&lead);
            }
            terms.push(lead);
            terms.extend(members);
        }
        for &term in &terms {
            *self.node_mut(term) = TermNode::singleton(term);
        }
        terms
    }

    /// Every direct edge between leads that another path already implies.
    pub fn redundant_edges(&self) -> Vec<(TermId, TermId)> {
        let mut redundant = Vec::new();
        for lead in self.leads() {
            for target in self.covered_successors(lead) {
                redundant.push((lead, target));
            }
        }
        redundant
    }

    /// Verify lead/member bookkeeping and succ/pred symmetry.
    pub fn check_structure(&self) -> Result<(), InvariantViolation> {
        let bookkeeping =
            |description: String| InvariantViolation::new(Invariant::Bookkeeping, description);
        let count = self.nodes.len();

        for (index, node) in self.nodes.iter().enumerate() {
            let id = TermId::new(index);
            if node.lead.index() >= count {
                return Err(bookkeeping(format!("{id} points at missing lead {}", node.lead)));
            }
            let lead = self.node(node.lead);
            if lead.lead != node.lead {
                return Err(bookkeeping(format!("{id} points at non-lead {}", node.lead)));
            }
            if node.lead != id {
                if !node.members.is_empty() || !node.succ.is_empty() || !node.pred.is_empty() {
                    return Err(bookkeeping(format!("non-lead {id} carries class state")));
                }
                if !lead.members.contains(&id) {
                    return Err(bookkeeping(format!("{} does not list member {id}", node.lead)));
                }
                continue;
            }

            for &member in &node.members {
                if member == id || self.node(member).lead != id {
                    return Err(bookkeeping(format!("{id} lists foreign member {member}")));
                }
            }
            for &next in &node.succ {
                if next == id || !self.is_lead(next) || !self.node(next).pred.contains(&id) {
                    return Err(bookkeeping(format!("asymmetric or bad edge {id} -> {next}")));
                }
            }
            for &prev in &node.pred {
                if prev == id || !self.is_lead(prev) || !self.node(prev).succ.contains(&id) {
                    return Err(bookkeeping(format!("asymmetric or bad edge {prev} -> {id}")));
                }
            }
        }
        Ok(())
    }

    /// Verify that the graph of leads has no cycles.
    pub fn check_acyclic(&self) -> Result<(), InvariantViolation> {
        let mut indegree: Vec<usize> = self.nodes.iter().map(|node| node.pred.len()).collect();
        let mut queue: VecDeque<TermId> = self
            .leads()
            .filter(|id| indegree[id.index()] == 0)
            .collect();
        let mut visited = 0;
        while let Some(current) = queue.pop_front() {
            visited += 1;
            for &next in &self.node(current).succ {
                indegree[next.index()] -= 1;
                if indegree[next.index()] == 0 {
                    queue.push_back(next);
                }
            }
        }
        let leads = self.leads().count();
        if visited != leads {
            return Err(InvariantViolation::new(
                Invariant::Acyclicity,
                format!("{} of {leads} classes lie on an uncollapsed cycle", leads - visited),
            ));
        }
        Ok(())
    }
}
