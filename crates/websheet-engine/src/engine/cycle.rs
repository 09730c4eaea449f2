//! Circular dependency detection for formula cells.
//!
//! When dependents are recomputed we must not follow a cycle (A1 reads B1,
//! B1 reads C1, C1 reads A1). Depth-first search over the graph finds one
//! before evaluation starts.

use std::collections::{HashMap, HashSet};

/// Maps a cell identifier to the identifiers its formula reads.
pub type DependencyGraph = HashMap<String, Vec<String>>;

/// Detect a cycle reachable from `start`.
/// Returns Some(cycle_path) if a cycle is found, None otherwise.
///
/// Iterative depth-first search. Cells whose inputs were fully explored are
/// remembered in `done` and never walked again, so shared inputs cost one visit.
pub fn detect_cycle<'a>(start: &'a str, graph: &'a DependencyGraph) -> Option<Vec<String>> {
    if !graph.contains_key(start) {
        return None;
    }

    let mut done: HashSet<&str> = HashSet::new();
    let mut on_path: HashSet<&str> = HashSet::from([start]);
    // (cell, index of the next input to visit)
    let mut stack: Vec<(&str, usize)> = vec![(start, 0)];

    while let Some((cell, next)) = stack.last_mut() {
        let deps = graph.get(*cell).map(Vec::as_slice).unwrap_or(&[]);
        match deps.get(*next) {
            Some(dep) => {
                *next += 1;
                let dep = dep.as_str();
                if on_path.contains(dep) {
                    let mut path: Vec<String> = stack.iter().map(|(c, _)| c.to_string()).collect();
                    path.push(dep.to_string());
                    return Some(path);
                }
                if !done.contains(dep) && graph.contains_key(dep) {
                    on_path.insert(dep);
                    stack.push((dep, 0));
                }
            }
            None => {
                let cell = *cell;
                stack.pop();
                on_path.remove(cell);
                done.insert(cell);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&str, &[&str])]) -> DependencyGraph {
        edges
            .iter()
            .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    #[test]
    fn test_detect_cycle_no_cycle() {
        let g = graph(&[("C1", &["A1", "B1"])]);
        assert!(detect_cycle("C1", &g).is_none());
    }

    #[test]
    fn test_detect_cycle_direct() {
        let g = graph(&[("A1", &["B1"]), ("B1", &["A1"])]);
        assert!(detect_cycle("A1", &g).is_some());
        assert!(detect_cycle("B1", &g).is_some());
    }

    #[test]
    fn test_detect_cycle_indirect() {
        let g = graph(&[("A1", &["B1"]), ("B1", &["C1"]), ("C1", &["A1"])]);
        let path = detect_cycle("A1", &g).unwrap();
        assert_eq!(path, vec!["A1", "B1", "C1", "A1"]);
    }

    #[test]
    fn test_detect_cycle_self_reference() {
        let g = graph(&[("A1", &["A1"])]);
        assert!(detect_cycle("A1", &g).is_some());
    }

    #[test]
    fn test_detect_cycle_shared_inputs_visited_once() {
        // Each row reads the two rows above it: 2^60 paths, 60 cells.
        let mut g = DependencyGraph::new();
        for r in 3..=60 {
            g.insert(format!("A{r}"), vec![format!("A{}", r - 1), format!("A{}", r - 2)]);
        }
        assert!(detect_cycle("A60", &g).is_none());

        g.insert("A1".into(), vec!["A60".into()]);
        let path = detect_cycle("A60", &g).unwrap();
        assert_eq!(path.first(), Some(&"A60".to_string()));
        assert_eq!(path.last(), Some(&"A60".to_string()));
    }

    #[test]
    fn test_detect_cycle_long_chain() {
        let mut g = DependencyGraph::new();
        for r in 2..=200_000 {
            g.insert(format!("A{r}"), vec![format!("A{}", r - 1)]);
        }
        assert!(detect_cycle("A200000", &g).is_none());
    }

    #[test]
    fn test_detect_cycle_downstream_of_cycle() {
        let g = graph(&[("D1", &["A1"]), ("A1", &["B1"]), ("B1", &["A1"])]);
        assert!(detect_cycle("D1", &g).is_some());
    }
}
