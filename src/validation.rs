//! Whole-graph validation of service registrations.
//!
//! Validation is a static pass over the registration table. It never
//! constructs anything and never fails; problems are collected in a
//! [`ValidationReport`]. It complements the cycle check performed during
//! resolution, which remains the authoritative safety net.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::token::{AnyToken, TokenId};

/// A problem found in the registration graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A declared dependency has no registration
    MissingDependency {
        service: AnyToken,
        dependency: AnyToken,
    },
    /// A service lists its own token among its dependencies
    SelfDependency { service: AnyToken },
    /// A dependency cycle; the first token is repeated at the end
    CircularDependency { cycle: Vec<AnyToken> },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingDependency { service, dependency } => write!(
                f,
                "Service {} depends on unregistered service {}",
                service, dependency
            ),
            ValidationError::SelfDependency { service } => {
                write!(f, "Service {} has a self-dependency", service)
            }
            ValidationError::CircularDependency { cycle } => {
                let names: Vec<&str> = cycle.iter().map(AnyToken::name).collect();
                write!(f, "Circular dependency: {}", names.join(" -> "))
            }
        }
    }
}

/// Outcome of [`ServiceRegistry::validate`](crate::ServiceRegistry::validate).
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Human-readable form of every error, in discovery order.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Cycles found, each starting and ending with the same token.
    pub fn cycles(&self) -> impl Iterator<Item = &[AnyToken]> {
        self.errors.iter().filter_map(|error| match error {
            ValidationError::CircularDependency { cycle } => Some(cycle.as_slice()),
            _ => None,
        })
    }
}

/// Validates a graph given as `(service, dependencies)` pairs in registration order.
pub(crate) fn validate_graph(nodes: &[(AnyToken, Vec<AnyToken>)]) -> ValidationReport {
    let positions: HashMap<TokenId, usize> = nodes
        .iter()
        .enumerate()
        .map(|(position, (token, _))| (token.id(), position))
        .collect();

    let mut report = ValidationReport::default();

    for (service, deps) in nodes {
        for dependency in deps {
            if dependency == service {
                report.errors.push(ValidationError::SelfDependency { service: *service });
            } else if !positions.contains_key(&dependency.id()) {
                report.errors.push(ValidationError::MissingDependency {
                    service: *service,
                    dependency: *dependency,
                });
            }
        }
    }

    // Edges between registered services only; missing ones are reported above
    let edges: Vec<Vec<usize>> = nodes
        .iter()
        .map(|(_, deps)| deps.iter().filter_map(|dep| positions.get(&dep.id()).copied()).collect())
        .collect();
    let components = strongly_connected(&edges);

    let mut walker = CycleWalker {
        nodes,
        edges: &edges,
        components: &components,
        start: 0,
        path: Vec::new(),
        on_path: vec![false; nodes.len()],
        seen: HashSet::new(),
        cycles: Vec::new(),
    };
    for start in 0..nodes.len() {
        walker.start = start;
        walker.walk(start);
    }

    report.errors.extend(
        walker
            .cycles
            .into_iter()
            .map(|cycle| ValidationError::CircularDependency { cycle }),
    );
    report
}

/// Labels every node with its strongly connected component (Tarjan).
fn strongly_connected(edges: &[Vec<usize>]) -> Vec<usize> {
    struct Tarjan<'e> {
        edges: &'e [Vec<usize>],
        index: Vec<Option<usize>>,
        low: Vec<usize>,
        on_stack: Vec<bool>,
        stack: Vec<usize>,
        next_index: usize,
        component: Vec<usize>,
        next_component: usize,
    }

    impl Tarjan<'_> {
        fn visit(&mut self, node: usize) {
            self.index[node] = Some(self.next_index);
            self.low[node] = self.next_index;
            self.next_index += 1;
            self.stack.push(node);
            self.on_stack[node] = true;

            let edges = self.edges;
            for &dep in &edges[node] {
                match self.index[dep] {
                    None => {
                        self.visit(dep);
                        self.low[node] = self.low[node].min(self.low[dep]);
                    }
                    Some(dep_index) if self.on_stack[dep] => {
                        self.low[node] = self.low[node].min(dep_index);
                    }
                    Some(_) => {}
                }
            }

            if self.index[node] == Some(self.low[node]) {
                while let Some(member) = self.stack.pop() {
                    self.on_stack[member] = false;
                    self.component[member] = self.next_component;
                    if member == node {
                        break;
                    }
                }
                self.next_component += 1;
            }
        }
    }

    let count = edges.len();
    let mut tarjan = Tarjan {
        edges,
        index: vec![None; count],
        low: vec![0; count],
        on_stack: vec![false; count],
        stack: Vec::new(),
        next_index: 0,
        component: vec![0; count],
        next_component: 0,
    };
    for node in 0..count {
        if tarjan.index[node].is_none() {
            tarjan.visit(node);
        }
    }
    tarjan.component
}

/// Depth-first walk tracking visited tokens per path, not globally.
///
/// Each walk starts at one service and only enters services registered
/// after it within the same strongly connected component, so every cycle is
/// found once, from its earliest-registered member, and acyclic parts of the
/// graph are never re-walked.
struct CycleWalker<'g> {
    nodes: &'g [(AnyToken, Vec<AnyToken>)],
    edges: &'g [Vec<usize>],
    components: &'g [usize],
    start: usize,
    path: Vec<usize>,
    on_path: Vec<bool>,
    /// Canonical rotations of cycles already reported
    seen: HashSet<Vec<usize>>,
    cycles: Vec<Vec<AnyToken>>,
}

impl CycleWalker<'_> {
    fn walk(&mut self, node: usize) {
        self.path.push(node);
        self.on_path[node] = true;

        let edges = self.edges;
        for &dep in &edges[node] {
            if dep < self.start || self.components[dep] != self.components[self.start] {
                continue;
            }
            if dep == self.start {
                self.record_cycle();
            } else if !self.on_path[dep] {
                self.walk(dep);
            }
        }

        self.on_path[node] = false;
        self.path.pop();
    }

    fn record_cycle(&mut self) {
        // Paths always begin at the smallest position, so the path is canonical
        if !self.seen.insert(self.path.clone()) {
            return;
        }
        let mut cycle: Vec<AnyToken> = self.path.iter().map(|&position| self.nodes[position].0).collect();
        cycle.push(self.nodes[self.start].0);
        self.cycles.push(cycle);
    }
}
