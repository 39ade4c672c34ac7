//! End-to-end planner tests
//!
//! Concrete scenarios for sequencing, packing and grouping, plus realistic
//! Riyadh missions run through the planner facade.

mod fixtures;

use pickup_planner::geocode::FixedGeocoder;
use pickup_planner::planner::MissionPlanner;
use pickup_planner::sequencer::{BestFirstSequencer, NearestNeighborSequencer};
use pickup_planner::traits::RouteSequencer;
use pickup_planner::waypoint::waypoints_from_coords;
use pickup_planner::{
    distance, distance_matrix, group_by_capacity, pack_by_capacity, sequence_route, CapacityItem,
    PlannerError, Waypoint,
};

use fixtures::{mission, pickup_orders, tire_batches, COLLECTION_POINTS, DEPOTS};

fn assert_full_visitation(order: &[usize], n: usize) {
    assert_eq!(order.len(), n, "every stop must be visited");
    assert_eq!(order[0], 0, "route must start at the first waypoint");
    assert_eq!(order[n - 1], n - 1, "route must end at the last waypoint");
    let mut seen = vec![false; n];
    for &index in order {
        assert!(!seen[index], "stop {} visited twice", index);
        seen[index] = true;
    }
}

// ============================================================================
// Route sequencing
// ============================================================================

#[test]
fn three_point_route_starts_and_ends_fixed() {
    let waypoints = waypoints_from_coords(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]).unwrap();
    let route = sequence_route(&waypoints);

    assert_eq!(route.order.first(), Some(&0));
    assert_eq!(route.order.last(), Some(&2));
    assert_full_visitation(&route.order, 3);

    let legs: f64 = route
        .order
        .windows(2)
        .map(|leg| distance(waypoints[leg[0]], waypoints[leg[1]]))
        .sum();
    assert!((route.total_distance_km - legs).abs() < 1e-9);
}

#[test]
fn empty_and_single_waypoint_routes() {
    let empty = sequence_route(&[]);
    assert!(empty.order.is_empty());
    assert_eq!(empty.total_distance_km, 0.0);

    let single = sequence_route(&[DEPOTS[0].waypoint()]);
    assert_eq!(single.order, vec![0]);
    assert_eq!(single.total_distance_km, 0.0);
}

#[test]
fn invalid_coordinates_fail_fast() {
    let err = waypoints_from_coords(&[(24.7, 46.7), (24.7, 190.0)]).unwrap_err();
    assert!(matches!(err, PlannerError::InvalidCoordinate { longitude, .. } if longitude == 190.0));
}

#[test]
fn riyadh_mission_visits_every_collection_point() {
    let waypoints = mission(COLLECTION_POINTS.len());
    let n = waypoints.len();
    let matrix = distance_matrix(&waypoints);

    let nearest = NearestNeighborSequencer::default();
    let best_first = BestFirstSequencer::default();
    let sequencers: [(&str, &dyn RouteSequencer); 2] =
        [("nearest-neighbor", &nearest), ("best-first", &best_first)];

    for (name, sequencer) in sequencers {
        let route = sequencer.sequence(&matrix);
        assert_full_visitation(&route.order, n);
        assert!(
            (route.total_distance_km - matrix.path_length(&route.order)).abs() < 1e-9,
            "{} total must match its legs",
            name
        );
    }
}

#[test]
fn two_opt_never_lengthens_the_greedy_route() {
    let waypoints = mission(COLLECTION_POINTS.len());
    let matrix = distance_matrix(&waypoints);

    let greedy = NearestNeighborSequencer { two_opt_passes: 0 }.sequence(&matrix);
    let improved = NearestNeighborSequencer::default().sequence(&matrix);
    assert!(improved.total_distance_km <= greedy.total_distance_km + 1e-9);
}

// ============================================================================
// Load packing
// ============================================================================

#[test]
fn greedy_packing_example() {
    let items = vec![
        CapacityItem::new(2.0, 10.0),
        CapacityItem::new(3.0, 9.0),
        CapacityItem::new(4.0, 8.0),
    ];
    let selection = pack_by_capacity(&items, 5.0).unwrap();
    assert_eq!(
        selection.items,
        vec![CapacityItem::new(2.0, 10.0), CapacityItem::new(3.0, 9.0)]
    );
}

#[test]
fn truck_load_respects_rated_capacity() {
    let items = tire_batches();
    let selection = pack_by_capacity(&items, 400.0).unwrap();

    // Densities: 80kg (3.25), 160kg (3.125), 120kg (2.5), 45kg (2.0), ...
    assert_eq!(selection.indices, vec![1, 4, 0]);
    assert_eq!(selection.total_weight, 360.0);
    assert_eq!(selection.total_value, 1060.0);
    assert!(selection.total_weight <= 400.0);
}

// ============================================================================
// Order grouping
// ============================================================================

#[test]
fn next_fit_grouping_example() {
    let groups = group_by_capacity(pickup_orders(&[3.0, 4.0, 2.0, 5.0]), 6.0).unwrap();
    let ids: Vec<Vec<&str>> = groups
        .iter()
        .map(|group| group.entries.iter().map(|entry| entry.payload.as_str()).collect())
        .collect();
    assert_eq!(
        ids,
        vec![vec!["order-1"], vec!["order-2", "order-3"], vec!["order-4"]]
    );
}

#[test]
fn oversized_order_forms_its_own_group() {
    let groups = group_by_capacity(pickup_orders(&[500.0, 2500.0, 300.0]), 1000.0).unwrap();
    assert_eq!(groups.len(), 3);
    assert_eq!(groups[1].entries.len(), 1);
    assert_eq!(groups[1].total_weight, 2500.0);
    assert!(groups[1].is_oversized(1000.0));
}

// ============================================================================
// Planner facade
// ============================================================================

#[test]
fn planner_optimizes_riyadh_mission() {
    let planner = MissionPlanner::new().with_sequencer(BestFirstSequencer::default());
    let waypoints = mission(6);
    let optimized = planner.optimize_mission(&waypoints).unwrap();

    assert_full_visitation(&optimized.order, waypoints.len());
    assert_eq!(optimized.route.len(), waypoints.len());
    assert_eq!(optimized.route[0], DEPOTS[0].waypoint());
    assert_eq!(optimized.route.last(), Some(&DEPOTS[2].waypoint()));

    let rows = &optimized.distance_matrix;
    for i in 0..rows.len() {
        assert_eq!(rows[i][i], 0.0);
        for j in 0..rows.len() {
            assert_eq!(rows[i][j], rows[j][i]);
        }
    }
}

#[test]
fn planner_plans_route_between_addresses() {
    let depot = DEPOTS[1].waypoint();
    let geocoder = FixedGeocoder::new(depot, "Sulay, Riyadh");
    let planned = MissionPlanner::new()
        .plan_route(&geocoder, "Sulay Recycling Yard", "Sulay Recycling Yard")
        .unwrap();
    assert_eq!(planned.start, depot);
    assert_eq!(planned.distance_km, 0.0);
}

#[test]
fn planner_straight_leg_between_depots() {
    let start: Waypoint = DEPOTS[0].waypoint();
    let end: Waypoint = DEPOTS[2].waypoint();
    let leg = MissionPlanner::new().route_leg(start, end).unwrap();

    assert_eq!(leg.distance_km, distance(start, end));
    assert!(leg.duration_secs > 0.0);
    assert!((leg.geometry.length_km() - leg.distance_km).abs() < 1e-9);
}
