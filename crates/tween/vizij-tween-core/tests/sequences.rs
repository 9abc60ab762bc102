use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;
use vizij_tween_core::{
    shared, Ease, Engine, HookContext, LoopType, SequenceSettings, SharedValue, Tween,
    TweenError, TweenEvent, TweenSettings,
};

fn linear() -> TweenSettings {
    TweenSettings::default().with_ease(Ease::Linear)
}

fn float(cell: &SharedValue) -> f32 {
    cell.borrow().as_float().expect("float cell")
}

fn tween(engine: &Engine, cell: &SharedValue, end: f32, duration: f32) -> Tween {
    engine
        .create_default_tween(cell.clone(), end, duration, linear())
        .unwrap()
}

#[test]
fn appended_children_play_back_to_back() {
    let mut engine = Engine::default();
    let (a, b) = (shared(0.0f32), shared(0.0f32));
    let mut seq = engine.sequence(SequenceSettings::default()).unwrap();
    seq.append(tween(&engine, &a, 1.0, 1.0))
        .unwrap()
        .append(tween(&engine, &b, 2.0, 1.0))
        .unwrap();
    let id = engine.add_sequence(seq);
    assert_eq!(engine.duration(id, false), Some(2.0));

    engine.update(0.5);
    assert_eq!((float(&a), float(&b)), (0.5, 0.0));
    engine.update(1.0);
    assert_eq!((float(&a), float(&b)), (1.0, 1.0));
    engine.update(0.5);
    assert_eq!(float(&b), 2.0);

    // Only the top-level sequence reports events.
    let report = engine.report();
    assert!(report.events.iter().all(|e| e.id() == id));
    assert!(report.events.contains(&TweenEvent::Completed { id }));
    assert!(!engine.is_alive(id));
}

#[test]
fn joined_children_overlap() {
    let mut engine = Engine::default();
    let (a, b) = (shared(0.0f32), shared(0.0f32));
    let mut seq = engine.sequence(SequenceSettings::default()).unwrap();
    seq.append(tween(&engine, &a, 1.0, 1.0)).unwrap();
    seq.join(tween(&engine, &b, 4.0, 2.0)).unwrap();
    let id = engine.add_sequence(seq);
    assert_eq!(engine.duration(id, false), Some(2.0));

    engine.update(0.5);
    assert_eq!((float(&a), float(&b)), (0.5, 1.0));
}

#[test]
fn callbacks_fire_when_crossed_in_both_directions() {
    let mut engine = Engine::default();
    let cell = shared(0.0f32);
    let hits = Rc::new(RefCell::new(0));
    let counter = hits.clone();

    let mut seq = engine
        .sequence(SequenceSettings::default().with_auto_kill(false))
        .unwrap();
    seq.append(tween(&engine, &cell, 1.0, 1.0)).unwrap();
    seq.append_callback(move |_: &mut HookContext<'_>| *counter.borrow_mut() += 1);
    seq.append(tween(&engine, &cell, 2.0, 1.0)).unwrap();
    let id = engine.add_sequence(seq);

    engine.update(0.75);
    assert_eq!(*hits.borrow(), 0);
    engine.update(0.75);
    assert_eq!(*hits.borrow(), 1);
    engine.update(0.25);
    assert_eq!(*hits.borrow(), 1);

    assert!(engine.goto(id, 0.5, false));
    assert_eq!(*hits.borrow(), 2);
    assert_relative_eq!(float(&cell), 0.5);
}

#[test]
fn callback_can_kill_its_sequence() {
    let mut engine = Engine::default();
    let cell = shared(0.0f32);
    let order = Rc::new(RefCell::new(Vec::new()));

    let child_log = order.clone();
    let child = tween(&engine, &cell, 1.0, 1.0)
        .on_kill(move |_: &mut HookContext<'_>| child_log.borrow_mut().push("child"));
    let mut seq = engine.sequence(SequenceSettings::default()).unwrap();
    seq.append(child).unwrap();
    seq.insert_callback(0.5, |ctx: &mut HookContext<'_>| ctx.kill_self())
        .unwrap();
    let seq_log = order.clone();
    seq.hooks_mut().on_kill = Some(Box::new(move |_: &mut HookContext<'_>| {
        seq_log.borrow_mut().push("sequence")
    }));
    let id = engine.add_sequence(seq);

    engine.update(0.75);
    assert!(!engine.is_alive(id));
    assert_eq!(*order.borrow(), vec!["child", "sequence"]);
    assert_relative_eq!(float(&cell), 0.75);

    engine.update(0.25);
    assert_relative_eq!(float(&cell), 0.75);
}

#[test]
fn restart_loops_reset_children() {
    let mut engine = Engine::default();
    let (a, b) = (shared(0.0f32), shared(0.0f32));
    let mut seq = engine
        .sequence(
            SequenceSettings::default()
                .with_loops(2, LoopType::Restart)
                .with_auto_kill(false),
        )
        .unwrap();
    seq.append(tween(&engine, &a, 10.0, 1.0)).unwrap();
    seq.append(tween(&engine, &b, 10.0, 1.0)).unwrap();
    let id = engine.add_sequence(seq);

    engine.update(2.5);
    assert_eq!(engine.completed_loops(id), Some(1));
    assert_relative_eq!(float(&a), 5.0);
    assert_relative_eq!(float(&b), 0.0);

    engine.update(1.5);
    assert_eq!((float(&a), float(&b)), (10.0, 10.0));
    assert!(engine.is_complete(id));
}

#[test]
fn restart_boundary_keeps_children_at_their_end() {
    let mut engine = Engine::default();
    let (a, b) = (shared(0.0f32), shared(0.0f32));
    let seen = Rc::new(RefCell::new(Vec::new()));
    let (log, read_a, read_b) = (seen.clone(), a.clone(), b.clone());
    let mut seq = engine
        .sequence(SequenceSettings::default().with_loops(3, LoopType::Restart))
        .unwrap()
        .on_step_complete(move |_: &mut HookContext<'_>| {
            log.borrow_mut().push((float(&read_a), float(&read_b)))
        });
    seq.append(tween(&engine, &a, 10.0, 1.0)).unwrap();
    seq.append(tween(&engine, &b, 10.0, 1.0)).unwrap();
    let id = engine.add_sequence(seq);

    engine.update(2.0);
    assert_eq!(engine.completed_loops(id), Some(1));
    assert_eq!((float(&a), float(&b)), (10.0, 10.0));
    assert_eq!(*seen.borrow(), vec![(10.0, 10.0)]);

    engine.update(0.5);
    assert_relative_eq!(float(&a), 5.0);
    assert_relative_eq!(float(&b), 0.0);
}

#[test]
fn yoyo_sequence_plays_children_backwards() {
    let mut engine = Engine::default();
    let (a, b) = (shared(0.0f32), shared(0.0f32));
    let mut seq = engine
        .sequence(
            SequenceSettings::default()
                .with_loops(2, LoopType::Yoyo)
                .with_auto_kill(false),
        )
        .unwrap();
    seq.append(tween(&engine, &a, 10.0, 1.0)).unwrap();
    seq.append(tween(&engine, &b, 10.0, 1.0)).unwrap();
    let id = engine.add_sequence(seq);

    engine.update(2.5);
    assert_relative_eq!(float(&a), 10.0);
    assert_relative_eq!(float(&b), 5.0);
    engine.update(1.0);
    assert_relative_eq!(float(&a), 5.0);
    assert_relative_eq!(float(&b), 0.0);
    engine.update(0.5);
    assert_eq!((float(&a), float(&b)), (0.0, 0.0));
    assert!(engine.is_complete(id));
}

#[test]
fn nested_sequences_follow_the_outer_timeline() {
    let mut engine = Engine::default();
    let (a, b) = (shared(0.0f32), shared(0.0f32));
    let mut inner = engine.sequence(SequenceSettings::default()).unwrap();
    inner.append(tween(&engine, &a, 1.0, 1.0)).unwrap();
    inner.append(tween(&engine, &b, 1.0, 1.0)).unwrap();

    let mut outer = engine.sequence(SequenceSettings::default()).unwrap();
    outer.append_interval(1.0).unwrap();
    outer.append(inner).unwrap();
    let id = engine.add_sequence(outer);
    assert_eq!(engine.duration(id, true), Some(3.0));

    engine.update(1.5);
    assert_eq!((float(&a), float(&b)), (0.5, 0.0));
    engine.update(1.0);
    assert_eq!((float(&a), float(&b)), (1.0, 0.5));
}

#[test]
fn infinite_children_are_rejected() {
    let engine = Engine::default();
    let cell = shared(0.0f32);
    let endless = engine
        .create_default_tween(
            cell,
            1.0f32,
            1.0,
            linear().with_loops(-1, LoopType::Restart),
        )
        .unwrap();
    let mut seq = engine.sequence(SequenceSettings::default()).unwrap();
    assert!(matches!(
        seq.append(endless),
        Err(TweenError::InfiniteLoopInSequence)
    ));
    assert!(seq.is_empty());
}

#[test]
fn sequence_delay_and_child_delay() {
    let mut engine = Engine::default();
    let cell = shared(0.0f32);
    let child = engine
        .create_default_tween(cell.clone(), 4.0f32, 1.0, linear().with_delay(0.5))
        .unwrap();
    let mut seq = engine
        .sequence(SequenceSettings::default().with_delay(1.0))
        .unwrap();
    seq.append(child).unwrap();
    let id = engine.add_sequence(seq);
    assert_eq!(engine.duration(id, false), Some(1.5));

    engine.update(1.25);
    assert_eq!(float(&cell), 0.0);
    engine.update(0.5);
    assert_relative_eq!(float(&cell), 1.0);
}
