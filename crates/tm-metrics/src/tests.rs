//! Unit tests for the metric accumulators.

use rustc_hash::{FxHashMap, FxHashSet};

use tm_core::{EdgeId, Step, StepWindow, VehicleId};

use crate::{is_missing, FundamentalDiagram, Throughput, TimeDistance, WaitingTime};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn e(id: &str) -> EdgeId {
    EdgeId::new(id)
}

fn v(id: &str) -> VehicleId {
    VehicleId::new(id)
}

fn vehicles(ids: &[&str]) -> FxHashSet<VehicleId> {
    ids.iter().map(VehicleId::new).collect()
}

// ── WaitingTime ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod waiting_time_tests {
    use super::*;

    #[test]
    fn snapshots_append_in_order() {
        let mut wt = WaitingTime::new();
        let mut first = FxHashMap::default();
        first.insert(e("a"), 2.5);
        let mut second = FxHashMap::default();
        second.insert(e("a"), 0.0);

        wt.update(first);
        wt.update(second);

        assert_eq!(wt.len(), 2);
        assert_eq!(wt.snapshots()[0].get("a"), Some(&2.5));
        assert_eq!(wt.snapshots()[1].get("a"), Some(&0.0));
    }

    #[test]
    fn empty_edge_snapshot_carries_zero() {
        // The collector resolves a zero-vehicle edge to 0.0; the accumulator
        // stores it verbatim, indistinguishable from a genuine zero wait.
        let mut wt = WaitingTime::new();
        let mut snap = FxHashMap::default();
        snap.insert(e("empty"), 0.0);
        wt.update(snap);
        assert_eq!(wt.snapshots()[0].get("empty"), Some(&0.0));
    }
}

// ── Throughput ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod throughput_tests {
    use super::*;

    #[test]
    fn first_observation_is_zero_whatever_the_set() {
        let mut tp = Throughput::new();
        tp.update(&e("main"), vehicles(&["a", "b", "c"]));
        assert_eq!(tp.departed("main"), Some(&[0][..]));
    }

    #[test]
    fn churn_counts_set_difference() {
        // {A,B} → {B,C} → {}: departed counts [0, 1, 2].
        let mut tp = Throughput::new();
        tp.update(&e("main"), vehicles(&["A", "B"]));
        tp.update(&e("main"), vehicles(&["B", "C"]));
        tp.update(&e("main"), vehicles(&[]));
        assert_eq!(tp.departed("main"), Some(&[0, 1, 2][..]));
    }

    #[test]
    fn within_step_visits_are_invisible() {
        // A vehicle that enters and leaves between two observations never
        // shows up in the departed signal.
        let mut tp = Throughput::new();
        tp.update(&e("main"), vehicles(&["A"]));
        tp.update(&e("main"), vehicles(&["A"]));
        assert_eq!(tp.departed("main"), Some(&[0, 0][..]));
    }

    #[test]
    fn occupant_set_replaced_not_merged() {
        let mut tp = Throughput::new();
        tp.update(&e("main"), vehicles(&["A", "B"]));
        tp.update(&e("main"), vehicles(&["C"]));
        let occ = tp.occupants("main").unwrap();
        assert_eq!(occ.len(), 1);
        assert!(occ.contains("C"));
    }

    #[test]
    fn edges_initialise_independently() {
        let mut tp = Throughput::new();
        tp.update(&e("a"), vehicles(&["x"]));
        tp.update(&e("b"), vehicles(&["y"]));
        tp.update(&e("a"), vehicles(&[]));
        assert_eq!(tp.departed("a"), Some(&[0, 1][..]));
        assert_eq!(tp.departed("b"), Some(&[0][..]));
        assert_eq!(tp.departed("never-seen"), None);
    }

    #[test]
    fn explicit_edge_subset_is_reported() {
        let tp = Throughput::with_edges(vec![e("a"), e("b")]);
        assert_eq!(tp.edge_filter(), Some(&[e("a"), e("b")][..]));
        assert_eq!(Throughput::new().edge_filter(), None);
    }
}

// ── FundamentalDiagram ────────────────────────────────────────────────────────

#[cfg(test)]
mod fundamental_diagram_tests {
    use super::*;

    #[test]
    fn series_stay_equal_length() {
        let mut fd = FundamentalDiagram::new("main");
        for i in 0..50 {
            fd.update(i as f64, vehicles(&["a"]));
        }
        assert_eq!(fd.speeds().len(), 50);
        assert_eq!(fd.flows().len(), 50);
        assert_eq!(fd.vehicle_counts().len(), 50);
        assert_eq!(fd.len(), 50);
    }

    #[test]
    fn speed_stored_in_kmh() {
        let mut fd = FundamentalDiagram::new("main");
        fd.update(10.0, vehicles(&["a"]));
        assert!((fd.speeds()[0] - 36.0).abs() < 1e-12);
    }

    #[test]
    fn flow_follows_departed_rule() {
        let mut fd = FundamentalDiagram::new("main");
        fd.update(5.0, vehicles(&["A", "B"]));
        fd.update(5.0, vehicles(&["B", "C"]));
        fd.update(0.0, vehicles(&[]));
        assert_eq!(fd.flows(), &[0, 1, 2]);
        assert_eq!(fd.vehicle_counts(), &[2, 2, 0]);
    }

    #[test]
    fn empty_edge_records_zero_speed() {
        let mut fd = FundamentalDiagram::new("main");
        fd.update(0.0, vehicles(&[]));
        assert_eq!(fd.speeds()[0], 0.0);
        assert_eq!(fd.vehicle_counts()[0], 0);
    }

    #[test]
    fn edge_length_defaults_to_zero() {
        let mut fd = FundamentalDiagram::new("main");
        assert_eq!(fd.edge_length(), 0.0);
        fd.set_edge_length(250.0);
        assert_eq!(fd.edge_length(), 250.0);
    }
}

// ── TimeDistance ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod time_distance_tests {
    use super::*;

    fn window(start: u64, end: u64) -> StepWindow {
        StepWindow::new(Step(start), Step(end)).unwrap()
    }

    #[test]
    fn mid_window_discovery_keeps_sentinels() {
        // Vehicle first observed at start+5 in [start, start+10): slot array
        // of length 10, slots 0–4 and 6–9 missing, slot 5 holding the sample.
        let mut td = TimeDistance::new("in", "out", window(100, 110));
        td.update(&v("veh-0"), 321.5, Step(105));

        let track = td.track("veh-0").unwrap();
        assert_eq!(track.len(), 10);
        for (i, &sample) in track.iter().enumerate() {
            if i == 5 {
                assert_eq!(sample, 321.5);
            } else {
                assert!(is_missing(sample), "slot {i} should hold the sentinel");
            }
        }
    }

    #[test]
    fn reupdate_overwrites_not_accumulates() {
        let mut td = TimeDistance::new("in", "out", window(0, 4));
        td.update(&v("veh-0"), 10.0, Step(2));
        td.update(&v("veh-0"), 12.0, Step(2));
        assert_eq!(td.track("veh-0").unwrap()[2], 12.0);
    }

    #[test]
    fn slot_length_independent_of_first_sighting() {
        let mut td = TimeDistance::new("in", "out", window(0, 8));
        td.update(&v("early"), 1.0, Step(0));
        td.update(&v("late"), 1.0, Step(7));
        assert_eq!(td.track("early").unwrap().len(), 8);
        assert_eq!(td.track("late").unwrap().len(), 8);
        assert_eq!(td.tracked_count(), 2);
    }

    #[test]
    fn zero_distance_is_not_missing() {
        let mut td = TimeDistance::new("in", "out", window(0, 2));
        td.update(&v("veh-0"), 0.0, Step(0));
        let track = td.track("veh-0").unwrap();
        assert!(!is_missing(track[0]), "a genuine 0.0 sample is not the sentinel");
        assert!(is_missing(track[1]));
    }

    #[test]
    fn untracked_vehicle_reads_none() {
        let td = TimeDistance::new("in", "out", window(0, 2));
        assert!(td.track("ghost").is_none());
    }
}
