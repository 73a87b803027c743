// crates/osc-core/tests/address_space.rs
use std::sync::Arc;
use std::thread;

use osc_core::{AddressSpace, MatchOptions, OscError, TYPETAGS_ANY};

/// The address space used by most tests; handlers are just labels.
fn ops_space() -> AddressSpace<&'static str> {
    let space = AddressSpace::new();
    space.register("math-add", "/ops/math/add", "ii").unwrap();
    space.register("math-sum", "/ops/math/sum", TYPETAGS_ANY).unwrap();
    space.register("string-add", "/ops/string/add", "ii").unwrap();
    space.register("array-add", "/ops/array/add", "ii").unwrap();
    space.register("math-sub", "/ops/math/sub", "ii").unwrap();
    space
}

fn addresses(space: &AddressSpace<&'static str>, pattern: &str, tags: Option<&str>) -> Vec<String> {
    space
        .match_pattern(pattern, tags)
        .unwrap()
        .iter()
        .map(|m| m.address().to_string())
        .collect()
}

#[test]
fn exact_address_matches_one_method() {
    let space = ops_space();

    let results = space.match_pattern("/ops/math/add", None).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].address(), "/ops/math/add");
    assert_eq!(results[0].typetags(), "ii");
    assert_eq!(*results[0].handler(), "math-add");
}

#[test]
fn typetags_must_match_exactly() {
    let space = ops_space();

    assert_eq!(addresses(&space, "/ops/math/add", Some("ii")), vec!["/ops/math/add"]);
    assert!(addresses(&space, "/ops/math/add", Some("f")).is_empty());
    assert!(addresses(&space, "/ops/math/add", Some("i")).is_empty());

    // "*" accepts anything
    assert_eq!(addresses(&space, "/ops/math/sum", Some("fff")), vec!["/ops/math/sum"]);
    assert_eq!(addresses(&space, "/ops/math/sum", Some("")), vec!["/ops/math/sum"]);
}

#[test]
fn brace_alternation_matches_each_alternative() {
    let space = ops_space();

    assert_eq!(
        addresses(&space, "/ops/math/{add,sub}", None),
        vec!["/ops/math/add", "/ops/math/sub"]
    );
    assert_eq!(
        addresses(&space, "/ops/{math,array}/add", None),
        vec!["/ops/math/add", "/ops/array/add"]
    );
}

#[test]
fn star_matches_all_leaves_one_level_down() {
    let space = ops_space();
    space.register("status", "/ops/status", TYPETAGS_ANY).unwrap();

    // Containers under /ops are not methods, so only the leaf comes back.
    assert_eq!(addresses(&space, "/ops/*", None), vec!["/ops/status"]);

    assert_eq!(
        addresses(&space, "/ops/*/add", None),
        vec!["/ops/math/add", "/ops/string/add", "/ops/array/add"]
    );
}

#[test]
fn glob_classes_and_single_char() {
    let space = ops_space();

    assert_eq!(
        addresses(&space, "/ops/math/s??", None),
        vec!["/ops/math/sum", "/ops/math/sub"]
    );
    assert_eq!(addresses(&space, "/ops/math/su[m]", None), vec!["/ops/math/sum"]);
    assert_eq!(addresses(&space, "/ops/math/su[!m]", None), vec!["/ops/math/sub"]);
    assert_eq!(
        addresses(&space, "/ops/[a-m]*/add", None),
        vec!["/ops/math/add", "/ops/array/add"]
    );
}

#[test]
fn results_follow_registration_order() {
    let space = ops_space();

    assert_eq!(
        addresses(&space, "/ops/math/*", None),
        vec!["/ops/math/add", "/ops/math/sum", "/ops/math/sub"]
    );
}

#[test]
fn unmatched_brace_falls_back_to_literal() {
    let space = ops_space();

    assert!(addresses(&space, "/ops/math/{add", None).is_empty());
    assert!(addresses(&space, "/ops/{math/add", None).is_empty());
}

#[test]
fn brace_and_glob_combined_do_not_duplicate() {
    let space = ops_space();

    assert_eq!(
        addresses(&space, "/ops/math/{add,a*}", None),
        vec!["/ops/math/add"]
    );
}

#[test]
fn literal_matching_option_disables_wildcards() {
    let space = ops_space();
    let literal = MatchOptions {
        glob: false,
        braces: false,
    };

    assert!(space
        .match_pattern_with("/ops/math/*", None, literal)
        .unwrap()
        .is_empty());
    assert_eq!(
        space
            .match_pattern_with("/ops/math/sub", Some("ii"), literal)
            .unwrap()
            .len(),
        1
    );

    let no_braces = MatchOptions {
        glob: true,
        braces: false,
    };
    assert!(space
        .match_pattern_with("/ops/math/{add,sub}", None, no_braces)
        .unwrap()
        .is_empty());
}

#[test]
fn invalid_patterns_are_address_errors() {
    let space = ops_space();

    for pattern in ["ops/math/add", "", "/ops//add", "/ops/math/"] {
        match space.match_pattern(pattern, None) {
            Err(OscError::Address(_)) => {}
            other => panic!("{:?}: expected address error, got {:?}", pattern, other),
        }
    }
}

#[test]
fn invalid_registrations_leave_the_tree_untouched() {
    let space: AddressSpace<u32> = AddressSpace::new();

    for address in ["noslash", "/a//b", "/a/b/", "/a/b*", "/a b/c", "/a/{b}", "/a/#b"] {
        assert!(
            matches!(space.register(1, address, "*"), Err(OscError::Address(_))),
            "{:?} should be rejected",
            address
        );
    }
    assert!(space.is_empty());

    space.register(1, "/a/b", "*").unwrap();

    // "/a/b" is a method, it can't also be a container ...
    assert!(space.register(2, "/a/b/c", "*").is_err());
    // ... and "/a" is a container, it can't become a method.
    assert!(space.register(3, "/a", "*").is_err());

    let all = space.methods();
    assert_eq!(all.len(), 1);
    assert_eq!(*all[0].handler(), 1);
}

#[test]
fn reregistering_overwrites_in_place() {
    let space = AddressSpace::new();
    space.register(1, "/x/first", "i").unwrap();
    space.register(2, "/x/second", "i").unwrap();
    space.register(3, "/x/first", "f").unwrap();

    let all = space.methods();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].address(), "/x/first");
    assert_eq!(*all[0].handler(), 3);
    assert_eq!(all[0].typetags(), "f");
    assert_eq!(all[1].address(), "/x/second");
}

#[test]
fn clear_empties_the_space() {
    let space = ops_space();
    assert_eq!(space.len(), 5);

    space.clear();
    assert!(space.is_empty());
    assert!(space.match_pattern("/ops/*/*", None).unwrap().is_empty());
}

#[test]
fn independent_spaces_do_not_share_state() {
    let a = ops_space();
    let b: AddressSpace<&'static str> = AddressSpace::new();

    assert_eq!(a.len(), 5);
    assert!(b.is_empty());
    assert!(b.match_pattern("/ops/math/add", None).unwrap().is_empty());
}

#[test]
fn match_results_survive_later_changes() {
    let space = ops_space();
    let results = space.match_pattern("/ops/math/add", None).unwrap();

    space.register("replaced", "/ops/math/add", "ii").unwrap();
    space.clear();

    assert_eq!(results.len(), 1);
    assert_eq!(*results[0].handler(), "math-add");
}

#[test]
fn concurrent_matches_see_whole_registrations() {
    let space = Arc::new(AddressSpace::new());
    space.register(0usize, "/seed/value", "*").unwrap();

    let writer = {
        let space = Arc::clone(&space);
        thread::spawn(move || {
            for i in 0..200 {
                let address = format!("/bank{}/fader{}/level", i % 7, i);
                space.register(i, &address, "f").unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let space = Arc::clone(&space);
            thread::spawn(move || {
                for _ in 0..200 {
                    for m in space.match_pattern("/bank*/fader*/level", Some("f")).unwrap() {
                        assert!(m.address().ends_with("/level"));
                        assert_eq!(m.typetags(), "f");
                    }
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for r in readers {
        r.join().unwrap();
    }

    assert_eq!(space.match_pattern("/bank*/fader*/level", None).unwrap().len(), 200);
}
