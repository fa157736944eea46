//! Accumulator-to-table conversions.

use std::collections::BTreeSet;

use tm_metrics::{is_missing, FundamentalDiagram, Throughput, TimeDistance, WaitingTime};

use crate::table::{Cell, Table};

/// One row per step, one column per edge (sorted), cells holding that
/// step's average wait in seconds.  Edges absent from a snapshot (possible
/// when snapshots were fed by hand rather than a collector) render `Empty`.
pub fn waiting_time_table(waits: &WaitingTime) -> Table {
    let edges: BTreeSet<_> = waits
        .snapshots()
        .iter()
        .flat_map(|snap| snap.keys())
        .collect();

    let mut columns = vec!["step".to_owned()];
    columns.extend(edges.iter().map(|e| e.to_string()));
    let mut table = Table::new(columns);

    for (step, snap) in waits.snapshots().iter().enumerate() {
        let mut row = vec![Cell::Int(step as u64)];
        row.extend(
            edges
                .iter()
                .map(|edge| snap.get(edge.as_str()).map_or(Cell::Empty, |w| Cell::Float(*w))),
        );
        table.push_row(row);
    }
    table
}

/// One row per observation, one column per edge (sorted), cells holding the
/// departed-vehicle count.  When fed by a collector every edge is observed
/// every step, so observation index and step coincide; edges with shorter
/// series (observed late, by hand) are padded with `Empty` at the tail.
pub fn throughput_table(throughput: &Throughput) -> Table {
    let mut edges: Vec<_> = throughput.edges().collect();
    edges.sort_unstable();

    let height = edges
        .iter()
        .filter_map(|edge| throughput.departed(edge.as_str()))
        .map(<[usize]>::len)
        .max()
        .unwrap_or(0);

    let mut columns = vec!["step".to_owned()];
    columns.extend(edges.iter().map(|e| e.to_string()));
    let mut table = Table::new(columns);

    for step in 0..height {
        let mut row = vec![Cell::Int(step as u64)];
        row.extend(edges.iter().map(|edge| {
            throughput
                .departed(edge.as_str())
                .and_then(|series| series.get(step))
                .map_or(Cell::Empty, |n| Cell::Int(*n as u64))
        }));
        table.push_row(row);
    }
    table
}

/// Per-step speed (km/h), flow (departed vehicles), vehicle count, and
/// density (vehicles per metre of edge).  Density is `Empty` while the edge
/// length is unresolved — an unknown length makes the quotient meaningless,
/// not infinite.
pub fn fundamental_diagram_table(fd: &FundamentalDiagram) -> Table {
    let mut table = Table::new(
        ["step", "speed_kmh", "flow", "vehicle_count", "density"]
            .map(str::to_owned)
            .to_vec(),
    );
    let length = fd.edge_length();

    for step in 0..fd.len() {
        let count = fd.vehicle_counts()[step];
        let density = if length > 0.0 {
            Cell::Float(count as f64 / length)
        } else {
            Cell::Empty
        };
        table.push_row(vec![
            Cell::Int(step as u64),
            Cell::Float(fd.speeds()[step]),
            Cell::Int(fd.flows()[step] as u64),
            Cell::Int(count as u64),
            density,
        ]);
    }
    table
}

/// Regroup a fundamental diagram into fixed-size step buckets for plotting,
/// assuming the backend's usual 1 s step.
///
/// Per bucket: flow is summed and scaled to vehicles/hour, speed is the
/// vehicle-weighted mean (`Empty` when the bucket saw no vehicles), and
/// density is vehicles per kilometre averaged over the bucket (`Empty`
/// without a resolved edge length).  The trailing partial bucket is kept.
pub fn fundamental_diagram_buckets(fd: &FundamentalDiagram, bucket_steps: usize) -> Table {
    assert!(bucket_steps > 0, "bucket size must be positive");
    let mut table = Table::new(
        ["step", "flow_veh_per_hr", "speed_kmh", "density_veh_per_km"]
            .map(str::to_owned)
            .to_vec(),
    );
    let length = fd.edge_length();
    let per_hour = 3600.0 / bucket_steps as f64;

    for (bucket, start) in (0..fd.len()).step_by(bucket_steps).enumerate() {
        let end = (start + bucket_steps).min(fd.len());

        let flow_sum: usize = fd.flows()[start..end].iter().sum();
        let count_sum: usize = fd.vehicle_counts()[start..end].iter().sum();
        let weighted_speed: f64 = fd.speeds()[start..end]
            .iter()
            .zip(&fd.vehicle_counts()[start..end])
            .map(|(speed, count)| speed * *count as f64)
            .sum();

        let speed = if count_sum > 0 {
            Cell::Float(weighted_speed / count_sum as f64)
        } else {
            Cell::Empty
        };
        let density = if length > 0.0 {
            Cell::Float(count_sum as f64 * 1000.0 / (bucket_steps as f64 * length))
        } else {
            Cell::Empty
        };

        table.push_row(vec![
            Cell::Int((bucket * bucket_steps) as u64),
            Cell::Float(flow_sum as f64 * per_hour),
            speed,
            density,
        ]);
    }
    table
}

/// One row per window slot (absolute step in the first column), one column
/// per tracked vehicle (sorted); missing-sample sentinels render `Empty`.
pub fn time_distance_table(td: &TimeDistance) -> Table {
    let mut vehicles: Vec<_> = td.vehicles().collect();
    vehicles.sort_unstable();

    let mut columns = vec!["step".to_owned()];
    columns.extend(vehicles.iter().map(|v| v.to_string()));
    let mut table = Table::new(columns);

    let window = td.window();
    for slot in 0..window.len() {
        let mut row = vec![Cell::Int(window.start().0 + slot as u64)];
        row.extend(vehicles.iter().map(|vehicle| {
            match td.track(vehicle.as_str()).map(|track| track[slot]) {
                Some(sample) if !is_missing(sample) => Cell::Float(sample),
                _ => Cell::Empty,
            }
        }));
        table.push_row(row);
    }
    table
}
