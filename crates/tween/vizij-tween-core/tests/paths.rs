use approx::assert_relative_eq;
use vizij_tween_core::{
    shared, Adapter, Config, Ease, Engine, Path, PathOptions, PathType, TweenEvent,
    TweenSettings, Value,
};

const WAYPOINTS: [[f32; 3]; 4] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 5.0, 0.0],
    [11.0, 5.0, 0.0],
];

fn distance(a: [f32; 3], b: [f32; 3]) -> f32 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)).sqrt()
}

/// Arc length covered by each quarter of the percentage range, measured by
/// dense sampling.
fn quarter_lengths(path: &Path, constant_speed: bool) -> [f32; 4] {
    const STEPS: usize = 200;
    let mut out = [0.0; 4];
    for (q, slot) in out.iter_mut().enumerate() {
        let from = q as f32 / 4.0;
        let mut prev = path.get_point(from, constant_speed);
        for i in 1..=STEPS {
            let p = path.get_point(from + 0.25 * i as f32 / STEPS as f32, constant_speed);
            *slot += distance(prev, p);
            prev = p;
        }
    }
    out
}

#[test]
fn constant_speed_covers_equal_arcs() {
    let path = Path::new(PathType::CatmullRom, &WAYPOINTS, false, 50).unwrap();
    let quarter = path.length() / 4.0;

    let even = quarter_lengths(&path, true);
    for len in even {
        assert_relative_eq!(len, quarter, max_relative = 0.03);
    }

    let raw = quarter_lengths(&path, false);
    let (min, max) = raw
        .iter()
        .fold((f32::MAX, 0.0f32), |(lo, hi), l| (lo.min(*l), hi.max(*l)));
    assert!(max / min > 1.5, "raw sampling should be uneven: {raw:?}");
}

#[test]
fn path_passes_through_every_waypoint() {
    let path = Path::new(PathType::CatmullRom, &WAYPOINTS, false, 10).unwrap();
    for (i, wp) in WAYPOINTS.iter().enumerate() {
        let p = path.get_point(i as f32 / 3.0, false);
        assert_relative_eq!(distance(p, *wp), 0.0, epsilon = 1e-4);
    }
}

#[test]
fn path_tween_reports_waypoints_in_order() {
    let mut engine = Engine::new(Config {
        path_subdivisions_per_segment: 50,
        ..Config::default()
    });
    let cell = shared([0.0f32, 0.0, 0.0]);
    let id = engine
        .tween(
            cell.clone(),
            Adapter::Path(PathOptions::new(PathType::CatmullRom)),
            WAYPOINTS[1..].to_vec(),
            3.0,
            TweenSettings::default().with_ease(Ease::Linear),
        )
        .unwrap();

    let mut indices = Vec::new();
    for _ in 0..24 {
        let report = engine.update(0.125);
        indices.extend(report.events.iter().filter_map(|e| match e {
            TweenEvent::WaypointChanged { id: e_id, index } if *e_id == id => Some(*index),
            _ => None,
        }));
    }
    assert_eq!(indices, vec![0, 1, 2, 3]);

    let end = cell.borrow().as_vec3().unwrap();
    assert_relative_eq!(distance(end, WAYPOINTS[3]), 0.0, epsilon = 1e-4);
}

#[test]
fn linear_path_closes_back_to_start() {
    let mut engine = Engine::default();
    let cell = shared([0.0f32, 0.0, 0.0]);
    engine
        .tween(
            cell.clone(),
            Adapter::Path(PathOptions::new(PathType::Linear).closed(true)),
            vec![[2.0f32, 0.0, 0.0], [2.0, 2.0, 0.0], [0.0, 2.0, 0.0]],
            4.0,
            TweenSettings::default().with_ease(Ease::Linear),
        )
        .unwrap();
    // Square of side 2: one side per second.
    engine.update(1.5);
    let p = cell.borrow().as_vec3().unwrap();
    assert_relative_eq!(p[0], 2.0, epsilon = 1e-5);
    assert_relative_eq!(p[1], 1.0, epsilon = 1e-5);
    engine.update(2.5);
    assert_eq!(*cell.borrow(), Value::Vec3([0.0, 0.0, 0.0]));
}

#[test]
fn invalid_paths_fail_at_creation() {
    let mut engine = Engine::default();
    let cell = shared([0.0f32, 0.0, 0.0]);
    let err = engine
        .tween(
            cell,
            Adapter::Path(PathOptions::default()),
            Vec::<[f32; 3]>::new(),
            1.0,
            TweenSettings::default(),
        )
        .unwrap_err();
    assert!(matches!(err, vizij_tween_core::TweenError::InvalidPath { .. }));
    assert_eq!(err.category(), "config");
}
