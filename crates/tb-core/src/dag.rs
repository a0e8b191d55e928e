//! Table dependency graph and creation ordering

use crate::error::{CoreError, CoreResult};
use crate::names::TableName;
use crate::scenario::DdlTable;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// Directed graph of table dependencies.
///
/// Edges run from a dependency to its dependent, so a topological walk yields
/// tables in creation order.
#[derive(Debug)]
pub struct TableDag<'a> {
    graph: DiGraph<&'a DdlTable, ()>,
}

impl<'a> TableDag<'a> {
    /// Build the graph, rejecting duplicate names and unknown dependencies
    pub fn build(tables: &'a [DdlTable]) -> CoreResult<Self> {
        let mut graph = DiGraph::with_capacity(tables.len(), tables.len());
        let mut node_map = HashMap::with_capacity(tables.len());

        for table in tables {
            let idx = graph.add_node(table);
            if node_map.insert(table.name.as_str(), idx).is_some() {
                return Err(CoreError::DuplicateTable {
                    name: table.name.to_string(),
                });
            }
        }

        let mut missing = Vec::new();
        for table in tables {
            let to = node_map[table.name.as_str()];
            for dep in &table.dependencies {
                match node_map.get(dep.as_str()) {
                    Some(&from) => {
                        graph.update_edge(from, to, ());
                    }
                    None => missing.push((table.name.to_string(), dep.to_string())),
                }
            }
        }

        if !missing.is_empty() {
            return Err(CoreError::UnknownDependency { missing });
        }

        Ok(Self { graph })
    }

    /// Tables in creation order.
    ///
    /// Kahn's algorithm; among tables whose dependencies are all placed, the
    /// lowest `order` goes first, then the lexically smallest name.
    pub fn creation_order(&self) -> CoreResult<Vec<&'a DdlTable>> {
        let mut in_degree: Vec<usize> = self
            .graph
            .node_indices()
            .map(|idx| self.graph.edges_directed(idx, Direction::Incoming).count())
            .collect();

        let mut ready: BinaryHeap<Reverse<(u32, &'a TableName, NodeIndex)>> = self
            .graph
            .node_indices()
            .filter(|idx| in_degree[idx.index()] == 0)
            .map(|idx| self.ready_entry(idx))
            .collect();

        let mut ordered = Vec::with_capacity(self.graph.node_count());
        while let Some(Reverse((_, _, idx))) = ready.pop() {
            ordered.push(self.graph[idx]);
            for edge in self.graph.edges_directed(idx, Direction::Outgoing) {
                let target = edge.target();
                in_degree[target.index()] -= 1;
                if in_degree[target.index()] == 0 {
                    ready.push(self.ready_entry(target));
                }
            }
        }

        if ordered.len() < self.graph.node_count() {
            let placed: HashSet<&str> = ordered.iter().map(|t| t.name.as_str()).collect();
            let mut remaining: Vec<String> = self
                .graph
                .node_weights()
                .filter(|t| !placed.contains(t.name.as_str()))
                .map(|t| t.name.to_string())
                .collect();
            remaining.sort();
            return Err(CoreError::CyclicDependency {
                cycle: self.find_cycle_path(&placed),
                tables: remaining,
            });
        }

        Ok(ordered)
    }

    fn ready_entry(&self, idx: NodeIndex) -> Reverse<(u32, &'a TableName, NodeIndex)> {
        let table = self.graph[idx];
        Reverse((table.order, &table.name, idx))
    }

    /// Follow unplaced dependencies until a table repeats.
    ///
    /// Every unplaced table has at least one unplaced dependency, so the walk
    /// always closes a cycle.
    fn find_cycle_path(&self, placed: &HashSet<&str>) -> String {
        let Some(start) = self
            .graph
            .node_indices()
            .filter(|idx| !placed.contains(self.graph[*idx].name.as_str()))
            .min_by_key(|idx| &self.graph[*idx].name)
        else {
            return String::new();
        };

        let mut path = vec![start];
        let mut current = start;
        loop {
            let next = self
                .graph
                .edges_directed(current, Direction::Incoming)
                .map(|e| e.source())
                .filter(|src| !placed.contains(self.graph[*src].name.as_str()))
                .min_by_key(|src| &self.graph[*src].name);

            let Some(next) = next else {
                break;
            };
            if let Some(pos) = path.iter().position(|p| *p == next) {
                path.drain(..pos);
                path.push(next);
                break;
            }
            path.push(next);
            current = next;
        }

        path.iter()
            .map(|idx| self.graph[*idx].name.as_str())
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    /// Group tables into levels; every table's dependencies sit in earlier levels
    pub fn levels(&self) -> CoreResult<Vec<Vec<&'a DdlTable>>> {
        let order = self.creation_order()?;
        let mut depth: HashMap<&str, usize> = HashMap::with_capacity(order.len());
        let mut levels: Vec<Vec<&'a DdlTable>> = Vec::new();

        for table in order {
            let level = table
                .dependencies
                .iter()
                .filter_map(|d| depth.get(d.as_str()))
                .map(|d| d + 1)
                .max()
                .unwrap_or(0);
            depth.insert(table.name.as_str(), level);
            if levels.len() <= level {
                levels.resize_with(level + 1, Vec::new);
            }
            levels[level].push(table);
        }

        Ok(levels)
    }
}

/// Order tables so that every table follows all of its dependencies.
///
/// Fails with [`CoreError::UnknownDependency`] when a dependency names a table
/// outside the set, and with [`CoreError::CyclicDependency`] when no complete
/// order exists. A partial order is never returned.
pub fn order_tables(tables: &[DdlTable]) -> CoreResult<Vec<DdlTable>> {
    let dag = TableDag::build(tables)?;
    let ordered = dag.creation_order()?;
    log::debug!(
        "Table creation order: {}",
        ordered
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(ordered.into_iter().cloned().collect())
}

#[cfg(test)]
#[path = "dag_test.rs"]
mod tests;
