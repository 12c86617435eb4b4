use super::utils::ClassFilter;
use crate::error::RuleError;
use crate::model::Classes;
use crate::policy::CheckPolicy;
use crate::rule::ArchRule;
use archrule_types::{Violation, ids};
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

pub const DESCRIPTION: &str = "no package cycles";

type Graph<'a> = BTreeMap<&'a str, BTreeSet<&'a str>>;

pub fn rule(policy: &CheckPolicy) -> Result<ArchRule, RuleError> {
    let filter = ClassFilter::from_policy(ids::RULE_NO_PACKAGE_CYCLES, policy)?;
    Ok(ArchRule::new(
        ids::RULE_NO_PACKAGE_CYCLES,
        DESCRIPTION,
        move |classes, out| run(classes, &filter, out),
    ))
}

/// One violation per strongly connected group of packages, reported on the
/// lexically smallest package of the group.
pub fn run(classes: &Classes, filter: &ClassFilter, out: &mut Vec<Violation>) {
    let graph = package_graph(classes, filter);

    for component in strongly_connected(&graph) {
        let Some(&start) = component.first() else { continue };
        let members: BTreeSet<&str> = component.iter().copied().collect();
        let cycle = shortest_cycle(&graph, start, &members);
        let location = classes
            .iter()
            .find(|c| c.package() == start && c.source.is_some())
            .and_then(|c| c.location());

        out.push(
            Violation::new(
                ids::RULE_NO_PACKAGE_CYCLES,
                ids::CODE_PACKAGE_CYCLE,
                start,
                format!("Cycle detected: {}", cycle.join(" -> ")),
            )
            .with_location(location)
            .with_data(json!({
                "packages": component,
                "cycle": cycle,
            })),
        );
    }
}

/// Package edges contributed by classes the filter applies to. Only packages
/// present in the snapshot are nodes; self edges are dropped.
fn package_graph<'a>(classes: &'a Classes, filter: &ClassFilter) -> Graph<'a> {
    let known = classes.packages();
    let mut graph = Graph::new();

    for class in classes.iter().filter(|c| filter.applies_to(&c.name)) {
        let from = class.package();
        for dependency in &class.dependencies {
            let to = dependency
                .rsplit_once('.')
                .map(|(pkg, _)| pkg)
                .unwrap_or("");
            if to == from {
                continue;
            }
            if let Some(&to) = known.get(to) {
                graph.entry(from).or_default().insert(to);
            }
        }
    }
    graph
}

/// Components with more than one package, each sorted, ordered by their first package.
fn strongly_connected<'a>(graph: &Graph<'a>) -> Vec<Vec<&'a str>> {
    let mut tarjan = Tarjan {
        graph,
        index: BTreeMap::new(),
        low: BTreeMap::new(),
        stack: Vec::new(),
        on_stack: BTreeSet::new(),
        next: 0,
        components: Vec::new(),
    };
    for &node in graph.keys() {
        if !tarjan.index.contains_key(node) {
            tarjan.visit(node);
        }
    }

    let mut components: Vec<Vec<&str>> = tarjan
        .components
        .into_iter()
        .filter(|c| c.len() > 1)
        .collect();
    components.sort();
    components
}

struct Tarjan<'g, 'a> {
    graph: &'g Graph<'a>,
    index: BTreeMap<&'a str, usize>,
    low: BTreeMap<&'a str, usize>,
    stack: Vec<&'a str>,
    on_stack: BTreeSet<&'a str>,
    next: usize,
    components: Vec<Vec<&'a str>>,
}

impl<'a> Tarjan<'_, 'a> {
    fn visit(&mut self, v: &'a str) {
        self.index.insert(v, self.next);
        self.low.insert(v, self.next);
        self.next += 1;
        self.stack.push(v);
        self.on_stack.insert(v);

        let graph = self.graph;
        for &w in graph.get(v).into_iter().flatten() {
            let candidate = if !self.index.contains_key(w) {
                self.visit(w);
                self.low.get(w).copied()
            } else if self.on_stack.contains(w) {
                self.index.get(w).copied()
            } else {
                None
            };
            if let Some(candidate) = candidate {
                if let Some(low) = self.low.get_mut(v) {
                    *low = (*low).min(candidate);
                }
            }
        }

        if self.low.get(v) == self.index.get(v) {
            let mut component = Vec::new();
            while let Some(w) = self.stack.pop() {
                self.on_stack.remove(w);
                component.push(w);
                if w == v {
                    break;
                }
            }
            component.sort_unstable();
            self.components.push(component);
        }
    }
}

/// Breadth-first path from `start` back to itself inside `members`.
fn shortest_cycle<'a>(graph: &Graph<'a>, start: &'a str, members: &BTreeSet<&'a str>) -> Vec<&'a str> {
    let mut parent: BTreeMap<&str, &str> = BTreeMap::new();
    let mut queue = VecDeque::from([start]);
    let mut visited = BTreeSet::from([start]);

    while let Some(node) = queue.pop_front() {
        for &next in graph.get(node).into_iter().flatten() {
            if !members.contains(next) {
                continue;
            }
            if next == start {
                let mut path = vec![start];
                let mut cursor = node;
                while cursor != start {
                    path.push(cursor);
                    cursor = match parent.get(cursor) {
                        Some(&p) => p,
                        None => break,
                    };
                }
                path[1..].reverse();
                path.push(start);
                return path;
            }
            if visited.insert(next) {
                parent.insert(next, node);
                queue.push_back(next);
            }
        }
    }
    vec![start]
}
