//! Unit tests for tm-export.

use rustc_hash::{FxHashMap, FxHashSet};

use tm_core::{EdgeId, Step, StepWindow, VehicleId};
use tm_metrics::{FundamentalDiagram, Throughput, TimeDistance, WaitingTime};

use crate::table::Cell;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn e(id: &str) -> EdgeId {
    EdgeId::new(id)
}

fn vehicles(ids: &[&str]) -> FxHashSet<VehicleId> {
    ids.iter().map(VehicleId::new).collect()
}

fn snapshot(entries: &[(&str, f64)]) -> FxHashMap<EdgeId, f64> {
    entries.iter().map(|(id, w)| (e(id), *w)).collect()
}

// ── Table builders ────────────────────────────────────────────────────────────

#[cfg(test)]
mod convert_tests {
    use super::*;
    use crate::convert::{
        fundamental_diagram_buckets, fundamental_diagram_table, throughput_table,
        time_distance_table, waiting_time_table,
    };

    #[test]
    fn waiting_time_layout() {
        let mut waits = WaitingTime::new();
        waits.update(snapshot(&[("b", 1.0), ("a", 2.0)]));
        waits.update(snapshot(&[("b", 0.0), ("a", 0.5)]));

        let table = waiting_time_table(&waits);
        assert_eq!(table.columns(), ["step", "a", "b"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows()[0], vec![Cell::Int(0), Cell::Float(2.0), Cell::Float(1.0)]);
        assert_eq!(table.rows()[1], vec![Cell::Int(1), Cell::Float(0.5), Cell::Float(0.0)]);
    }

    #[test]
    fn waiting_time_missing_edge_is_empty() {
        let mut waits = WaitingTime::new();
        waits.update(snapshot(&[("a", 1.0)]));
        waits.update(snapshot(&[("a", 1.5), ("late", 4.0)]));

        let table = waiting_time_table(&waits);
        assert_eq!(table.columns(), ["step", "a", "late"]);
        assert_eq!(table.rows()[0][2], Cell::Empty);
        assert_eq!(table.rows()[1][2], Cell::Float(4.0));
    }

    #[test]
    fn throughput_layout_and_padding() {
        let mut tp = Throughput::new();
        tp.update(&e("a"), vehicles(&["x"]));
        tp.update(&e("a"), vehicles(&[]));
        tp.update(&e("late"), vehicles(&["y"]));

        let table = throughput_table(&tp);
        assert_eq!(table.columns(), ["step", "a", "late"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows()[0], vec![Cell::Int(0), Cell::Int(0), Cell::Int(0)]);
        // "late" has a single observation; its second slot pads out Empty.
        assert_eq!(table.rows()[1], vec![Cell::Int(1), Cell::Int(1), Cell::Empty]);
    }

    #[test]
    fn fundamental_diagram_density() {
        let mut fd = FundamentalDiagram::new("main");
        fd.set_edge_length(200.0);
        fd.update(10.0, vehicles(&["a", "b"]));
        fd.update(0.0, vehicles(&[]));

        let table = fundamental_diagram_table(&fd);
        assert_eq!(
            table.columns(),
            ["step", "speed_kmh", "flow", "vehicle_count", "density"]
        );
        assert_eq!(table.rows()[0][4], Cell::Float(2.0 / 200.0));
        assert_eq!(table.rows()[1][2], Cell::Int(2)); // both vehicles departed
        assert_eq!(table.rows()[1][4], Cell::Float(0.0));
    }

    #[test]
    fn fundamental_diagram_unresolved_length_blanks_density() {
        let mut fd = FundamentalDiagram::new("main");
        fd.update(10.0, vehicles(&["a"]));
        let table = fundamental_diagram_table(&fd);
        assert_eq!(table.rows()[0][4], Cell::Empty);
    }

    #[test]
    fn bucket_resample_sums_flow_and_weights_speed() {
        let mut fd = FundamentalDiagram::new("main");
        fd.set_edge_length(500.0);
        // Steps: counts [1, 1, 0, 0]; speeds 10 and 20 m/s → 36 and 72 km/h.
        fd.update(10.0, vehicles(&["a"]));
        fd.update(20.0, vehicles(&["b"]));
        fd.update(0.0, vehicles(&[]));
        fd.update(0.0, vehicles(&[]));

        let table = fundamental_diagram_buckets(&fd, 2);
        assert_eq!(table.row_count(), 2);

        // Bucket 0: flow_sum = 0 + 1 = 1 → 1 × 3600/2 = 1800 veh/h;
        // speed = (36·1 + 72·1)/2 = 54 km/h;
        // density = 2 vehicles × 1000 / (2 steps × 500 m) = 2 veh/km.
        assert_eq!(table.rows()[0][0], Cell::Int(0));
        assert_eq!(table.rows()[0][1], Cell::Float(1800.0));
        assert_eq!(table.rows()[0][2], Cell::Float(54.0));
        assert_eq!(table.rows()[0][3], Cell::Float(2.0));

        // Bucket 1: one departure, no occupants → speed is Empty.
        assert_eq!(table.rows()[1][0], Cell::Int(2));
        assert_eq!(table.rows()[1][1], Cell::Float(1800.0));
        assert_eq!(table.rows()[1][2], Cell::Empty);
        assert_eq!(table.rows()[1][3], Cell::Float(0.0));
    }

    #[test]
    fn bucket_resample_keeps_partial_tail() {
        let mut fd = FundamentalDiagram::new("main");
        for _ in 0..5 {
            fd.update(0.0, vehicles(&[]));
        }
        let table = fundamental_diagram_buckets(&fd, 2);
        assert_eq!(table.row_count(), 3, "5 steps in buckets of 2 → 2 full + 1 partial");
    }

    #[test]
    fn time_distance_layout_with_sentinels() {
        let window = StepWindow::new(Step(5), Step(8)).unwrap();
        let mut td = TimeDistance::new("in", "out", window);
        td.update(&VehicleId::new("car"), 42.0, Step(6));

        let table = time_distance_table(&td);
        assert_eq!(table.columns(), ["step", "car"]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.rows()[0], vec![Cell::Int(5), Cell::Empty]);
        assert_eq!(table.rows()[1], vec![Cell::Int(6), Cell::Float(42.0)]);
        assert_eq!(table.rows()[2], vec![Cell::Int(7), Cell::Empty]);
    }
}

// ── CSV writing ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use super::*;
    use crate::convert::waiting_time_table;
    use crate::csv::{write_csv, write_csv_path};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn two_step_waits() -> WaitingTime {
        let mut waits = WaitingTime::new();
        waits.update(snapshot(&[("a", 1.5)]));
        waits.update(snapshot(&[("a", 0.0)]));
        waits
    }

    #[test]
    fn csv_header_and_rows_round_trip() {
        let dir = tmp();
        let path = dir.path().join("waits.csv");
        write_csv_path(&waiting_time_table(&two_step_waits()), &path).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["step", "a"]);

        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "0");
        assert_eq!(&rows[0][1], "1.5");
        assert_eq!(&rows[1][1], "0");
    }

    #[test]
    fn empty_cells_serialise_as_empty_fields() {
        let window = StepWindow::new(Step(0), Step(2)).unwrap();
        let mut td = TimeDistance::new("in", "out", window);
        td.update(&VehicleId::new("car"), 7.0, Step(1));

        let mut buffer = Vec::new();
        write_csv(&crate::convert::time_distance_table(&td), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "step,car");
        assert_eq!(lines[1], "0,");
        assert_eq!(lines[2], "1,7");
    }

    #[test]
    fn empty_table_writes_header_only() {
        let dir = tmp();
        let path = dir.path().join("empty.csv");
        write_csv_path(&waiting_time_table(&WaitingTime::new()), &path).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        assert_eq!(rdr.headers().unwrap().len(), 1, "only the step column");
        assert_eq!(rdr.records().count(), 0);
    }
}
