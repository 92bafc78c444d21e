use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

use crate::Var;

/// A directed graph between variables. An edge `x -> y` means that the value of `x`
/// mentions `y`.
#[derive(Debug, Default)]
pub(crate) struct DepGraph {
    edges: BTreeMap<Var, BTreeSet<Var>>,
}

impl DepGraph {
    pub fn add_node(&mut self, node: &Var) {
        self.edges.entry(node.clone()).or_default();
    }

    pub fn add_edge(&mut self, from: &Var, to: &Var) {
        self.add_node(to);
        self.edges.entry(from.clone()).or_default().insert(to.clone());
    }

    pub fn has_edge(&self, from: &Var, to: &Var) -> bool {
        self.edges.get(from).is_some_and(|tos| tos.contains(to))
    }

    pub fn remove_out_edges(&mut self, node: &Var) {
        if let Some(tos) = self.edges.get_mut(node) {
            tos.clear();
        }
    }

    /// The strongly connected components, such that every edge between two different
    /// components goes from an earlier to a later one.
    pub fn sccs_in_topological_order(&self) -> Vec<Vec<Var>> {
        fn dfs<'a>(
            node: &'a Var,
            edges: &'a BTreeMap<Var, BTreeSet<Var>>,
            visited: &mut BTreeSet<&'a Var>,
            order: &mut Vec<&'a Var>,
        ) {
            if !visited.insert(node) {
                return;
            }
            if let Some(neighbors) = edges.get(node) {
                for next in neighbors {
                    dfs(next, edges, visited, order);
                }
            }
            order.push(node);
        }

        fn dfs_rev<'a>(
            node: &'a Var,
            reverse: &BTreeMap<&'a Var, BTreeSet<&'a Var>>,
            visited: &mut BTreeSet<&'a Var>,
            component: &mut Vec<Var>,
        ) {
            if !visited.insert(node) {
                return;
            }
            component.push(node.clone());
            if let Some(neighbors) = reverse.get(node) {
                for next in neighbors {
                    dfs_rev(*next, reverse, visited, component);
                }
            }
        }

        let mut visited = BTreeSet::new();
        let mut order = Vec::new();
        for node in self.edges.keys() {
            dfs(node, &self.edges, &mut visited, &mut order);
        }

        let mut reverse: BTreeMap<&Var, BTreeSet<&Var>> = BTreeMap::new();
        for (from, tos) in &self.edges {
            for to in tos {
                reverse.entry(to).or_default().insert(from);
            }
        }

        // Kosaraju: visiting the reversed graph in order of decreasing finishing time
        // yields the components in topological order.
        let mut rev_visited = BTreeSet::new();
        let mut components = Vec::new();
        while let Some(node) = order.pop() {
            if rev_visited.contains(node) {
                continue;
            }
            let mut component = Vec::new();
            dfs_rev(node, &reverse, &mut rev_visited, &mut component);
            component.sort();
            components.push(component);
        }
        components
    }

    /// A topological order that, among all topological orders, takes the smallest
    /// available node first. `None` if the graph has a cycle.
    pub fn lexicographical_topological_sort(&self) -> Option<Vec<Var>> {
        let mut in_degree: BTreeMap<&Var, usize> = self.edges.keys().map(|node| (node, 0)).collect();
        for tos in self.edges.values() {
            for to in tos {
                *in_degree.entry(to).or_default() += 1;
            }
        }

        let mut ready: BinaryHeap<Reverse<&Var>> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(node, _)| Reverse(*node))
            .collect();
        let mut order = Vec::with_capacity(in_degree.len());
        while let Some(Reverse(node)) = ready.pop() {
            order.push(node.clone());
            for to in self.edges.get(node).into_iter().flatten() {
                if let Some(degree) = in_degree.get_mut(to) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push(Reverse(to));
                    }
                }
            }
        }

        (order.len() == in_degree.len()).then_some(order)
    }
}
