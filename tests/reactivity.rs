use serde_json::json;
use spark_panel::{computed, computed_memo, observable, reactive, watch_effect, Object, Property};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn counter() -> Rc<Cell<u32>> {
    Rc::new(Cell::new(0))
}

fn bump(c: &Rc<Cell<u32>>) {
    c.set(c.get() + 1);
}

// =============================================================================
// OBSERVABLE REFERENCES
// =============================================================================

#[test]
fn setting_the_current_value_never_notifies() {
    let mode = observable(String::from("static"));
    let runs = counter();

    let _effect = watch_effect({
        let mode = mode.clone();
        let runs = runs.clone();
        move || {
            let _ = mode.get();
            bump(&runs);
        }
    });

    for _ in 0..5 {
        assert!(!mode.set("static".to_string()));
    }
    assert_eq!(runs.get(), 1);
}

#[test]
fn each_change_reruns_each_subscriber_once() {
    let level = observable(0);
    let first = counter();
    let second = counter();

    let _a = watch_effect({
        let level = level.clone();
        let first = first.clone();
        move || {
            let _ = level.get();
            bump(&first);
        }
    });
    let _b = watch_effect({
        let level = level.clone();
        let second = second.clone();
        move || {
            let _ = level.get();
            let _ = level.get();
            bump(&second);
        }
    });

    level.set(1);
    level.set(2);
    assert_eq!((first.get(), second.get()), (3, 3));
    assert_eq!(level.dep().subscriber_count(), 2);
}

#[test]
fn peek_does_not_subscribe() {
    let level = observable(3);
    let runs = counter();

    let effect = watch_effect({
        let level = level.clone();
        let runs = runs.clone();
        move || {
            let _ = level.peek();
            bump(&runs);
        }
    });

    level.set(4);
    assert_eq!(runs.get(), 1);
    assert_eq!(effect.dep_count(), 0);
}

// =============================================================================
// OBJECT PROXIES
// =============================================================================

#[test]
fn writing_an_unread_key_never_notifies() {
    let state = Object::from_json_value(json!({ "on": false, "mode": "static" })).expect("object");
    let proxy = reactive(&state);
    let runs = counter();

    let _effect = watch_effect({
        let proxy = proxy.clone();
        let runs = runs.clone();
        move || {
            let _ = proxy.get("on");
            bump(&runs);
        }
    });

    proxy.set("mode", "rainbow");
    proxy.set("brand-new", 1);
    assert_eq!(runs.get(), 1);
    assert_eq!(state.to_json(), json!({ "on": false, "mode": "rainbow", "brand-new": 1 }));
}

#[test]
fn writing_a_read_key_always_notifies() {
    let state = Object::from_json_value(json!({ "on": false })).expect("object");
    let proxy = reactive(&state);
    let runs = counter();

    let _effect = watch_effect({
        let proxy = proxy.clone();
        let runs = runs.clone();
        move || {
            let _ = proxy.get("on");
            bump(&runs);
        }
    });

    proxy.set("on", false);
    proxy.set("on", false);
    assert_eq!(runs.get(), 3);
}

#[test]
fn nested_reads_give_distinct_proxies_over_one_object() {
    let state = Object::from_json_value(json!({ "colour": { "r": 255, "g": 0 } })).expect("object");
    let root = reactive(&state);

    let first = root.get("colour").and_then(Property::into_nested).expect("nested");
    let second = root.get("colour").and_then(Property::into_nested).expect("nested");
    assert_ne!(first, second);
    assert!(first.same_target(&second));

    let runs = counter();
    let _effect = watch_effect({
        let first = first.clone();
        let runs = runs.clone();
        move || {
            let _ = first.get("r");
            bump(&runs);
        }
    });

    second.set("r", 128);
    assert_eq!(runs.get(), 2);
    assert_eq!(first.get("r").and_then(|p| p.as_i64()), Some(128));
}

#[test]
fn absent_keys_can_be_tracked() {
    let state = Object::new();
    let proxy = reactive(&state);
    let seen = Rc::new(Cell::new(false));

    let _effect = watch_effect({
        let proxy = proxy.clone();
        let seen = seen.clone();
        move || seen.set(proxy.get("speed").is_some())
    });
    assert!(!seen.get());

    proxy.set("speed", 5);
    assert!(seen.get());
}

// =============================================================================
// EFFECTS
// =============================================================================

#[test]
fn branch_switch_picks_up_new_dependencies() {
    let use_name = observable(false);
    let name = observable("a");
    let runs = counter();

    let _effect = watch_effect({
        let use_name = use_name.clone();
        let name = name.clone();
        let runs = runs.clone();
        move || {
            if use_name.get() {
                let _ = name.get();
            }
            bump(&runs);
        }
    });

    name.set("b");
    assert_eq!(runs.get(), 1);

    use_name.set(true);
    name.set("c");
    assert_eq!(runs.get(), 3);
}

#[test]
fn disposed_effects_detach_from_every_node() {
    let a = observable(1);
    let b = observable(2);
    let runs = counter();

    let effect = watch_effect({
        let a = a.clone();
        let b = b.clone();
        let runs = runs.clone();
        move || {
            let _ = a.get() + b.get();
            bump(&runs);
        }
    });
    assert_eq!(effect.dep_count(), 2);

    effect.dispose();
    assert_eq!(a.dep().subscriber_count(), 0);
    assert_eq!(b.dep().subscriber_count(), 0);

    a.set(10);
    b.set(20);
    effect.run();
    assert_eq!(runs.get(), 1);
}

#[test]
fn nested_effect_does_not_steal_outer_reads() {
    let outer_source = observable(0);
    let inner_source = observable(0);
    let outer_runs = counter();

    let _outer = watch_effect({
        let outer_source = outer_source.clone();
        let inner_source = inner_source.clone();
        let outer_runs = outer_runs.clone();
        move || {
            let inner = watch_effect({
                let inner_source = inner_source.clone();
                move || {
                    let _ = inner_source.get();
                }
            });
            inner.dispose();
            let _ = outer_source.get();
            bump(&outer_runs);
        }
    });

    outer_source.set(1);
    assert_eq!(outer_runs.get(), 2);

    inner_source.set(1);
    assert_eq!(outer_runs.get(), 2);
}

// =============================================================================
// COMPUTED
// =============================================================================

#[test]
fn default_computed_recomputes_on_every_read() {
    let x = observable(1);
    let evaluations = counter();
    let plus_one = computed({
        let x = x.clone();
        let evaluations = evaluations.clone();
        move || {
            bump(&evaluations);
            x.get() + 1
        }
    });

    assert_eq!(plus_one.get(), 2);
    assert_eq!(plus_one.get(), 2);
    assert_eq!(evaluations.get(), 2);
}

#[test]
fn memoized_computed_only_recomputes_after_change() {
    let x = observable(1);
    let evaluations = counter();
    let plus_one = computed_memo({
        let x = x.clone();
        let evaluations = evaluations.clone();
        move || {
            bump(&evaluations);
            x.get() + 1
        }
    });

    assert_eq!(plus_one.get(), 2);
    assert_eq!(plus_one.get(), 2);
    assert_eq!(evaluations.get(), 1);

    x.set(1);
    assert_eq!(plus_one.get(), 2);
    assert_eq!(evaluations.get(), 1);

    x.set(5);
    assert!(plus_one.is_dirty());
    assert_eq!(plus_one.get(), 6);
    assert_eq!(evaluations.get(), 2);
}

#[test]
fn effects_reading_a_memoized_computed_rerun_on_invalidation() {
    let x = observable(1);
    let doubled = computed_memo({
        let x = x.clone();
        move || x.get() * 2
    });
    let seen = Rc::new(Cell::new(0));

    let _effect = watch_effect({
        let doubled = doubled.clone();
        let seen = seen.clone();
        move || seen.set(doubled.get())
    });
    assert_eq!(seen.get(), 2);

    x.set(21);
    assert_eq!(seen.get(), 42);
}

#[test]
fn effect_reading_source_and_memo_never_sees_a_stale_pair() {
    let x = observable(1);
    let tenfold = computed_memo({
        let x = x.clone();
        move || x.get() * 10
    });
    let pairs = Rc::new(RefCell::new(Vec::new()));

    let _effect = watch_effect({
        let x = x.clone();
        let tenfold = tenfold.clone();
        let pairs = pairs.clone();
        move || {
            let source = x.get();
            pairs.borrow_mut().push((source, tenfold.get()));
        }
    });

    x.set(2);
    x.set(3);
    assert_eq!(*pairs.borrow(), vec![(1, 10), (2, 20), (3, 30)]);
}
