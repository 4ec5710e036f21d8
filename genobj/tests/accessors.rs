use std::{sync::Arc, thread};

use genobj::{
    CachePolicy, Class, FALSE, False, Object, Receiver, Registry,
    RegistryCreateInfo, Value,
};

fn registry() -> Arc<Registry> {
    Registry::new(RegistryCreateInfo::default())
}

#[test]
fn set_then_get_for_many_values() {
    let class = registry().define_class("Bag");
    let object = Object::empty(&class);
    let values = [
        Value::from(0),
        Value::from(-7),
        Value::from(2.5),
        Value::from(""),
        Value::from("text"),
        Value::from(false),
        Value::List(vec![Value::from(1), Value::from("two")]),
        Value::from(class.create([("inner", 1)])),
    ];
    for (i, value) in values.iter().enumerate() {
        let key = format!("k{i}");
        assert_eq!(&object.set(key.as_str(), value.clone()), value);
        assert_eq!(&object.get(&key), value);
        assert!(object.exists(&key));
    }
    assert_eq!(object.keys().len(), values.len());
}

#[test]
fn open_class_accepts_any_key_in_every_form() {
    let class = registry().define_class("Open");
    let object = Object::empty(&class);

    for key in ["alpha", "beta_2", "x"] {
        object.write(&format!("set_{key}"), 1);
        assert_eq!(object.read(key), Value::from(1));
        assert_eq!(object.get(key), Value::from(1));

        object.write(key, 2);
        assert_eq!(object.read(&format!("get_{key}")), Value::from(2));

        object.set(key, 3);
        assert_eq!(object.read(key), Value::from(3));
        assert_eq!(object.read(&format!("get_{key}")), Value::from(3));
    }
}

#[test]
fn declared_class_rejects_unlisted_keys() {
    let class = registry().define_class("C");
    assert!(class.declare_allowed(["color", "height"]));
    let object = Object::empty(&class);

    assert_eq!(object.write("set_color", "red"), Value::from("red"));
    assert_eq!(object.read("get_color"), Value::from("red"));

    assert_eq!(object.write("set_weight", 5), FALSE);
    assert!(!object.exists("weight"));
    assert!(object.read("weight").is_sentinel());
    assert!(object.read("get_weight").is_sentinel());

    // the primitive path is not checked
    object.set("weight", 5);
    assert!(object.exists("weight"));
    assert!(object.read("weight").is_sentinel());
}

#[test]
fn chains_through_missing_keys() {
    let class = registry().define_class("Chain");
    let object = class.create([("present", "yes")]);

    let missing = object.read("missing");
    assert_eq!(missing, False);
    let deep = missing.read("anything").read("anything2");
    assert_eq!(deep, False);
    assert!(!bool::from(&deep));

    assert!(object.read("present").read("length").is_sentinel());
}

#[test]
fn sentinel_is_a_receiver_and_comparable() {
    assert!(!FALSE.is_true());
    assert_eq!(FALSE.read("x").write("y", 1), FALSE);
    assert_eq!(False.send("z", &[FALSE]), FALSE);
    assert_ne!(FALSE, Value::from(0));
    assert_eq!(FALSE, Value::default());
}

#[test]
fn keys_reflect_every_set() {
    let class = registry().define_class("Keys");
    let object = class.create([("a", Value::from(0))]);
    object.args([("b", Value::from("")), ("c", Value::from(false))]);
    object.args_flat(&[Value::from("d"), FALSE]);
    object.write("e", 1);
    object.write("set_f", Value::Bool(false));

    let mut keys = object.keys();
    keys.sort_unstable();
    assert_eq!(
        keys.iter().map(|k| &**k).collect::<Vec<_>>(),
        ["a", "b", "c", "d", "e", "f"]
    );
}

#[test]
fn concrete_scenario() {
    let class = registry().define_class("Scenario");
    class.declare_allowed(["color", "height"]);
    let object = class.create([("color", "red")]);

    assert_eq!(object.get("color"), Value::from("red"));
    assert_eq!(object.read("color"), Value::from("red"));
    object.write("color", "blue");
    assert_eq!(object.read("get_color"), Value::from("blue"));
    assert_eq!(object.write("set_country", "France"), FALSE);
    assert!(!object.exists("country"));
}

#[test]
fn class_level_calls_never_mutate() {
    let class = registry().define_class("Static");
    assert_eq!(class.write("set_color", "red"), FALSE);
    assert_eq!(class.read("color"), FALSE);
    assert_eq!(class.send("set", &["a".into(), 1.into()]), FALSE);
    assert_eq!(class.accessor_count(), 0);
}

#[test]
fn subclasses_resolve_their_own_class() {
    let registry = registry();
    let base = registry.define_class("Base");
    let derived = base.subclass("Derived");
    derived.declare_allowed(["color"]);

    let b = base.create([("weight", 1)]);
    let d = derived.create([("weight", 1)]);

    assert_eq!(b.read("weight"), Value::from(1));
    assert_eq!(d.read("weight"), FALSE);
    assert_eq!(d.write("color", "red"), Value::from("red"));
    assert_eq!(base.accessor_count(), 1);
    assert_eq!(derived.accessor_count(), 1);
}

#[test]
fn permanent_cache_keeps_accessors_after_declaration() {
    let class = registry().define_class("Stale");
    let object = class.create([("weight", 1)]);

    assert_eq!(object.read("weight"), Value::from(1));
    class.declare_allowed(["color"]);

    // `weight` was synthesized while the class was open
    assert_eq!(object.read("weight"), Value::from(1));
    // a selector never used before is checked
    assert_eq!(object.read("get_weight"), FALSE);
}

#[test]
fn revalidating_cache_rechecks_allow_list() {
    let registry = Registry::new(RegistryCreateInfo {
        cache_policy: CachePolicy::Revalidate,
        ..Default::default()
    });
    let class = registry.define_class("Fresh");
    let object = class.create([("weight", 1)]);

    assert_eq!(object.read("weight"), Value::from(1));
    class.declare_allowed(["color"]);

    assert_eq!(object.read("weight"), FALSE);
    assert_eq!(class.accessor_count(), 1);
}

#[test]
fn global_registry_backs_class_new() {
    let class = Class::new("genobj_tests::GlobalShape");
    assert!(Arc::ptr_eq(class.registry(), &Registry::global()));
    assert_eq!(class, Class::new("genobj_tests::GlobalShape"));

    class.declare_allowed(["side"]);
    let object = class.create([("side", 4)]);
    assert_eq!(object.read("side"), Value::from(4));
    assert_eq!(object.write("set_area", 16), FALSE);
}

#[test]
fn concurrent_first_use_synthesizes_once() {
    let class = registry().define_class("Shared");
    class.declare_allowed(["color"]);

    thread::scope(|scope| {
        for i in 0..8 {
            let class = &class;
            scope.spawn(move || {
                let object = class.create([("color", i)]);
                for _ in 0..100 {
                    assert_eq!(object.read("color"), Value::from(i));
                    assert_eq!(object.read("get_color"), Value::from(i));
                    assert_eq!(object.write("set_weight", i), FALSE);
                }
            });
        }
    });

    assert_eq!(class.accessor_count(), 2);
    assert_eq!(
        class.cached_selectors().iter().map(|s| &**s).collect::<Vec<_>>(),
        ["color", "get_color"]
    );
}
