//! Route sequencing: order waypoints from a fixed start to a fixed end.
//!
//! Every sequencer here returns a full visitation order: each index of the
//! matrix appears exactly once, index 0 first and the last index last. The
//! orders are heuristic and not guaranteed to be the shortest possible path.

use serde::{Deserialize, Serialize};

use crate::matrix::DistanceMatrix;
use crate::traits::RouteSequencer;

/// Default cap on 2-opt improvement passes.
pub const DEFAULT_TWO_OPT_PASSES: usize = 100;

/// Improvements smaller than this are treated as float noise.
const IMPROVEMENT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    /// Waypoint indices in visiting order.
    pub order: Vec<usize>,
    /// Sum of consecutive leg distances along `order`, in km.
    pub total_distance_km: f64,
}

impl RouteResult {
    pub fn empty() -> Self {
        Self {
            order: Vec::new(),
            total_distance_km: 0.0,
        }
    }

    fn from_order(order: Vec<usize>, matrix: &DistanceMatrix) -> Self {
        let total_distance_km = matrix.path_length(&order);
        Self {
            order,
            total_distance_km,
        }
    }
}

/// Handles the sizes where the order is forced: nothing, a single stop, or
/// just start and goal.
fn trivial_route(matrix: &DistanceMatrix) -> Option<RouteResult> {
    match matrix.size() {
        0 => Some(RouteResult::empty()),
        1 => Some(RouteResult::from_order(vec![0], matrix)),
        2 => Some(RouteResult::from_order(vec![0, 1], matrix)),
        _ => None,
    }
}

// ============================================================================
// Nearest neighbor with fixed endpoints
// ============================================================================

/// Greedy nearest-neighbor walk from index 0, closing at the last index,
/// followed by bounded 2-opt improvement of the interior.
///
/// This is the default sequencer.
#[derive(Debug, Clone)]
pub struct NearestNeighborSequencer {
    /// Maximum number of improving 2-opt moves to apply. Zero disables it.
    pub two_opt_passes: usize,
}

impl Default for NearestNeighborSequencer {
    fn default() -> Self {
        Self {
            two_opt_passes: DEFAULT_TWO_OPT_PASSES,
        }
    }
}

impl RouteSequencer for NearestNeighborSequencer {
    fn sequence(&self, matrix: &DistanceMatrix) -> RouteResult {
        if let Some(route) = trivial_route(matrix) {
            return route;
        }

        let n = matrix.size();
        let goal = n - 1;
        let mut visited = vec![false; n];
        visited[0] = true;
        visited[goal] = true;

        let mut order = Vec::with_capacity(n);
        order.push(0);
        let mut current = 0;

        while order.len() < n - 1 {
            let next = (0..n)
                .filter(|&candidate| !visited[candidate])
                .min_by(|&a, &b| matrix.get(current, a).total_cmp(&matrix.get(current, b)));

            let Some(next) = next else { break };
            visited[next] = true;
            order.push(next);
            current = next;
        }
        order.push(goal);

        let moves = two_opt(&mut order, matrix, self.two_opt_passes);
        let route = RouteResult::from_order(order, matrix);
        tracing::debug!(
            stops = n,
            two_opt_moves = moves,
            total_km = route.total_distance_km,
            "sequenced route by nearest neighbor"
        );
        route
    }
}

// ============================================================================
// Best-first search with full visitation
// ============================================================================

/// Best-first (A*-style) search from index 0 to the last index over the
/// complete graph, with `f(i) = g(i) + d(i, goal)`.
///
/// On its own the search stops as soon as the goal is expanded, which on a
/// metric matrix is usually the direct hop `[0, goal]`. The sequencer keeps
/// that path as a skeleton and splices every skipped index in at its
/// cheapest insertion position, so the result still visits all stops.
#[derive(Debug, Clone)]
pub struct BestFirstSequencer {
    /// Maximum number of improving 2-opt moves applied after insertion.
    pub two_opt_passes: usize,
}

impl Default for BestFirstSequencer {
    fn default() -> Self {
        Self {
            two_opt_passes: DEFAULT_TWO_OPT_PASSES,
        }
    }
}

impl RouteSequencer for BestFirstSequencer {
    fn sequence(&self, matrix: &DistanceMatrix) -> RouteResult {
        if let Some(route) = trivial_route(matrix) {
            return route;
        }

        let n = matrix.size();
        let mut order = best_first_path(matrix);
        let skeleton_len = order.len();

        let mut on_path = vec![false; n];
        for &index in &order {
            on_path[index] = true;
        }
        let mut pending: Vec<usize> = (0..n).filter(|&index| !on_path[index]).collect();
        cheapest_insertion(&mut order, &mut pending, matrix);

        let moves = two_opt(&mut order, matrix, self.two_opt_passes);
        let route = RouteResult::from_order(order, matrix);
        tracing::debug!(
            stops = n,
            skeleton = skeleton_len,
            two_opt_moves = moves,
            total_km = route.total_distance_km,
            "sequenced route by best-first search"
        );
        route
    }
}

/// Runs the best-first search and returns the path it finds from index 0 to
/// the last index.
///
/// The path only contains the indices on the winning predecessor chain; it
/// does not visit every stop. Returns an empty path for an empty matrix.
pub fn best_first_path(matrix: &DistanceMatrix) -> Vec<usize> {
    let n = matrix.size();
    if n == 0 {
        return Vec::new();
    }

    let start = 0;
    let goal = n - 1;
    let mut g_score = vec![f64::INFINITY; n];
    let mut f_score = vec![f64::INFINITY; n];
    let mut came_from: Vec<Option<usize>> = vec![None; n];
    let mut open = vec![false; n];

    g_score[start] = 0.0;
    f_score[start] = matrix.get(start, goal);
    open[start] = true;

    loop {
        let current = (0..n)
            .filter(|&index| open[index])
            .min_by(|&a, &b| f_score[a].total_cmp(&f_score[b]));

        let Some(current) = current else {
            // Unreachable on a complete graph; keep the endpoints anyway.
            return vec![start, goal];
        };
        open[current] = false;

        if current == goal {
            return reconstruct_path(&came_from, goal);
        }

        for neighbor in 0..n {
            if neighbor == current {
                continue;
            }
            let tentative = g_score[current] + matrix.get(current, neighbor);
            if tentative < g_score[neighbor] {
                came_from[neighbor] = Some(current);
                g_score[neighbor] = tentative;
                f_score[neighbor] = tentative + matrix.get(neighbor, goal);
                open[neighbor] = true;
            }
        }
    }
}

fn reconstruct_path(came_from: &[Option<usize>], goal: usize) -> Vec<usize> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(previous) = came_from[current] {
        // Predecessor links form a tree rooted at the start.
        if path.len() > came_from.len() {
            break;
        }
        path.push(previous);
        current = previous;
    }
    path.reverse();
    path
}

/// Inserts every pending index into `order` between two consecutive stops,
/// always picking the globally cheapest (index, position) pair next.
fn cheapest_insertion(order: &mut Vec<usize>, pending: &mut Vec<usize>, matrix: &DistanceMatrix) {
    while !pending.is_empty() {
        let mut best: Option<(usize, usize, f64)> = None;

        for (pending_idx, &candidate) in pending.iter().enumerate() {
            for position in 1..order.len() {
                let prev = order[position - 1];
                let next = order[position];
                let cost = matrix.get(prev, candidate) + matrix.get(candidate, next)
                    - matrix.get(prev, next);
                if best.is_none_or(|(_, _, best_cost)| cost < best_cost) {
                    best = Some((pending_idx, position, cost));
                }
            }
        }

        let Some((pending_idx, position, _)) = best else { break };
        let index = pending.remove(pending_idx);
        order.insert(position, index);
    }
}

// ============================================================================
// Local search
// ============================================================================

/// 2-opt: reverse an interior segment when that shortens the path.
///
/// The first and last positions never move. Candidates are scored on the
/// whole path so asymmetric (road-network) matrices are handled correctly.
/// Applies at most `max_moves` improving moves and returns how many it made.
fn two_opt(order: &mut [usize], matrix: &DistanceMatrix, max_moves: usize) -> usize {
    let n = order.len();
    if n < 4 {
        return 0;
    }

    let mut moves = 0;
    let mut current_cost = matrix.path_length(order);

    while moves < max_moves {
        let mut improved = false;

        'search: for i in 0..n - 3 {
            for j in i + 2..n - 1 {
                // Reverse segment [i+1..=j]
                order[i + 1..=j].reverse();
                let cost = matrix.path_length(order);
                if cost < current_cost - IMPROVEMENT_EPSILON {
                    current_cost = cost;
                    improved = true;
                    break 'search;
                }
                order[i + 1..=j].reverse();
            }
        }

        if !improved {
            break;
        }
        moves += 1;
    }

    moves
}
