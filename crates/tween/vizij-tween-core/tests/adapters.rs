use approx::assert_relative_eq;
use vizij_tween_core::{
    shared, Adapter, Axis, Ease, EaseCurve, Engine, Rect, RotateMode, SpiralOptions,
    TweenError, TweenSettings, Value,
};

fn linear() -> TweenSettings {
    TweenSettings::default().with_ease(Ease::Linear)
}

#[test]
fn euler_rotation_takes_the_short_way() {
    let mut engine = Engine::default();
    let cell = shared([0.0f32, 350.0, 0.0]);
    engine
        .tween(
            cell.clone(),
            Adapter::Rotation {
                mode: RotateMode::Fast,
            },
            [0.0f32, 10.0, 0.0],
            1.0,
            linear(),
        )
        .unwrap();
    engine.update(0.5);
    assert_relative_eq!(cell.borrow().as_vec3().unwrap()[1], 360.0);
    engine.update(0.5);
    assert_relative_eq!(cell.borrow().as_vec3().unwrap()[1], 370.0);
}

#[test]
fn relative_rotation_keeps_the_full_amount() {
    let mut engine = Engine::default();
    let cell = shared([0.0f32, 0.0, 0.0]);
    engine
        .tween(
            cell.clone(),
            Adapter::Rotation {
                mode: RotateMode::Fast,
            },
            [0.0f32, 270.0, 0.0],
            1.0,
            linear().relative(),
        )
        .unwrap();
    engine.update(0.5);
    assert_relative_eq!(cell.borrow().as_vec3().unwrap()[1], 135.0);
    engine.update(0.5);
    assert_eq!(*cell.borrow(), Value::Vec3([0.0, 270.0, 0.0]));
}

#[test]
fn quaternion_targets_use_default_rotation_adapter() {
    let mut engine = Engine::default();
    let cell = shared(Value::Quat([0.0, 0.0, 0.0, 1.0]));
    engine
        .to(cell.clone(), Value::Vec3([0.0, 90.0, 0.0]), 1.0, linear())
        .unwrap();
    engine.update(1.0);
    let Value::Quat(q) = cell.borrow().clone() else {
        panic!("expected a quaternion");
    };
    let half = std::f32::consts::FRAC_1_SQRT_2;
    assert_relative_eq!(q[0], 0.0, epsilon = 1e-5);
    assert_relative_eq!(q[1], half, epsilon = 1e-5);
    assert_relative_eq!(q[2], 0.0, epsilon = 1e-5);
    assert_relative_eq!(q[3], half, epsilon = 1e-5);
}

#[test]
fn axis_constraint_leaves_other_components_to_the_host() {
    let mut engine = Engine::default();
    let cell = shared([1.0f32, 2.0, 3.0]);
    engine
        .tween(
            cell.clone(),
            Adapter::Vector {
                axis: Some(Axis::Y),
            },
            [10.0f32, 10.0, 10.0],
            1.0,
            linear(),
        )
        .unwrap();
    engine.update(0.5);
    assert_eq!(*cell.borrow(), Value::Vec3([1.0, 6.0, 3.0]));

    *cell.borrow_mut() = Value::Vec3([5.0, 6.0, 3.0]);
    engine.update(0.5);
    assert_eq!(*cell.borrow(), Value::Vec3([5.0, 10.0, 3.0]));
}

#[test]
fn ints_round_on_write() {
    let mut engine = Engine::default();
    let cell = shared(0i32);
    engine.to(cell.clone(), 9i32, 1.0, linear()).unwrap();
    engine.update(0.25);
    assert_eq!(*cell.borrow(), Value::Int(2));
    engine.update(0.75);
    assert_eq!(*cell.borrow(), Value::Int(9));
}

#[test]
fn text_types_in_the_target() {
    let mut engine = Engine::default();
    let cell = shared("");
    engine.to(cell.clone(), "HELLO", 1.0, linear()).unwrap();
    engine.update(0.4);
    assert_eq!(cell.borrow().as_text(), Some("HE"));
    engine.update(0.6);
    assert_eq!(cell.borrow().as_text(), Some("HELLO"));
}

#[test]
fn alpha_only_color_fade() {
    let mut engine = Engine::default();
    let cell = shared(Value::Color([1.0, 0.0, 0.0, 1.0]));
    engine
        .tween(
            cell.clone(),
            Adapter::Color { alpha_only: true },
            Value::Color([0.0, 1.0, 0.0, 0.0]),
            1.0,
            linear(),
        )
        .unwrap();
    engine.update(0.5);
    assert_eq!(*cell.borrow(), Value::Color([1.0, 0.0, 0.0, 0.5]));
}

#[test]
fn rects_ease_every_field() {
    let mut engine = Engine::default();
    let cell = shared(Rect::new(0.0, 0.0, 10.0, 10.0));
    engine
        .to(cell.clone(), Rect::new(10.0, 10.0, 20.0, 20.0), 1.0, linear())
        .unwrap();
    engine.update(0.5);
    assert_eq!(*cell.borrow(), Value::Rect(Rect::new(5.0, 5.0, 15.0, 15.0)));
}

#[test]
fn relative_and_snapping() {
    let mut engine = Engine::default();
    let relative = shared(5.0f32);
    let snapped = shared(0.0f32);
    engine
        .to(relative.clone(), 10.0f32, 1.0, linear().relative())
        .unwrap();
    engine
        .to(snapped.clone(), 10.0f32, 1.0, linear().snapping())
        .unwrap();
    engine.update(0.33);
    assert_eq!(*snapped.borrow(), Value::Float(3.0));
    engine.update(0.67);
    assert_eq!(*relative.borrow(), Value::Float(15.0));
}

#[test]
fn speed_based_duration_from_distance() {
    let mut engine = Engine::default();
    let cell = shared([0.0f32, 0.0]);
    let id = engine
        .to(cell.clone(), [3.0f32, 4.0], 2.5, linear().speed_based())
        .unwrap();
    assert_eq!(engine.duration(id, false), Some(2.0));
    engine.update(1.0);
    assert_eq!(*cell.borrow(), Value::Vec2([1.5, 2.0]));
}

#[test]
fn waypoints_split_the_timeline() {
    let mut engine = Engine::default();
    let cell = shared([0.0f32, 0.0, 0.0]);
    engine
        .tween(
            cell.clone(),
            Adapter::Waypoints,
            vec![[1.0f32, 0.0, 0.0], [1.0, 3.0, 0.0]],
            2.0,
            linear(),
        )
        .unwrap();
    engine.update(0.5);
    assert_eq!(*cell.borrow(), Value::Vec3([0.5, 0.0, 0.0]));
    engine.update(1.0);
    assert_eq!(*cell.borrow(), Value::Vec3([1.0, 1.5, 0.0]));
}

#[test]
fn spiral_ends_at_radius_and_depth() {
    let mut engine = Engine::default();
    let cell = shared([0.0f32, 0.0, 0.0]);
    let options = SpiralOptions {
        depth: 2.0,
        ..SpiralOptions::default()
    };
    engine
        .tween(
            cell.clone(),
            Adapter::Spiral(options),
            [0.0f32, 0.0, 1.0],
            1.0,
            linear(),
        )
        .unwrap();
    engine.update(1.0);
    let p = cell.borrow().as_vec3().unwrap();
    assert_relative_eq!(p[2], 2.0, epsilon = 1e-4);
    assert_relative_eq!((p[0] * p[0] + p[1] * p[1]).sqrt(), 1.0, epsilon = 1e-4);
}

#[test]
fn registered_curves_resolve_by_name() {
    let mut engine = Engine::default();
    engine
        .registry_mut()
        .register_curve("late", EaseCurve::from_samples(&[0.0, 0.0, 1.0]).unwrap());
    assert_eq!(engine.registry().list_custom(), vec!["late"]);

    let ease = engine.registry().resolve_ease("late");
    let cell = shared(0.0f32);
    engine
        .to(cell.clone(), 10.0f32, 1.0, TweenSettings::default().with_ease(ease))
        .unwrap();
    engine.update(0.25);
    assert_eq!(*cell.borrow(), Value::Float(0.0));
    engine.update(0.5);
    assert_relative_eq!(cell.borrow().as_float().unwrap(), 5.0);

    engine.registry_mut().purge();
    assert!(engine.registry().list_custom().is_empty());
}

#[test]
fn mismatched_adapters_are_rejected() {
    let mut engine = Engine::default();
    let err = engine
        .tween(shared(0.0f32), Adapter::Text, "x", 1.0, linear())
        .unwrap_err();
    assert!(matches!(err, TweenError::UnsupportedTarget { .. }));
    assert_eq!(err.category(), "adapter");

    let err = engine
        .to(shared(0.0f32), [1.0f32, 2.0], 1.0, linear())
        .unwrap_err();
    assert_eq!(err.category(), "config");
    assert_eq!(engine.active_count(), 0);
}
