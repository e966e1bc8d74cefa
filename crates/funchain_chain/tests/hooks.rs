//! Tests for hook firing order and fault isolation.

mod test_utils;

use funchain_chain::prelude::*;
use funchain_system::prelude::*;
use test_utils::*;

/// Builds a chain whose hooks record `before/after/error` events.
fn observed_chain(log: &EventLog) -> Chain {
    let mut chain = Chain::new();
    let (before, after, error) = (log.clone(), log.clone(), log.clone());
    chain
        .before(move |args| before.record(format!("before {}", show(args))))
        .after(move |args, outputs| after.record(format!("after {} -> {}", show(args), show(outputs))))
        .on_error(move |outputs, err| error.record(format!("error {} {err}", show(outputs))));
    chain
}

#[test]
fn hooks_observe_every_step_in_order() {
    let log = EventLog::new();
    let mut chain = observed_chain(&log);
    chain.then(answer).then(render);

    chain.execute().unwrap();

    assert_eq!(
        log.events(),
        [
            "before []",
            "after [] -> [42]",
            "before [42]",
            "after [42] -> [42]",
        ]
    );
}

#[test]
fn error_hooks_fire_after_post_hooks_of_the_failing_step() {
    let log = EventLog::new();
    let mut chain = observed_chain(&log);
    chain
        .then(|| (9i64, Fault::new("boom")))
        .then(render);

    chain.execute().unwrap_err();

    assert_eq!(
        log.events(),
        ["before []", "after [] -> [9]", "error [9] boom"]
    );
}

#[test]
fn error_hooks_see_panics() {
    let log = EventLog::new();
    let mut chain = observed_chain(&log);
    chain.then(|| -> i64 { panic!("bad step") });

    chain.execute().unwrap_err();

    assert_eq!(log.events().last().map(String::as_str), Some("error [] panic occurred: bad step"));
}

#[test]
fn error_hooks_see_configuration_faults() {
    let log = EventLog::new();
    let mut chain = observed_chain(&log);
    chain.then(seven).push_step(Step::inert(true));

    chain.execute().unwrap_err();
    assert_eq!(
        log.events().last().map(String::as_str),
        Some("error [] step is not callable: got a bool value")
    );

    let log = EventLog::new();
    let mut chain = observed_chain(&log);
    chain.then(|| (Fault::none(), Fault::none()));

    chain.execute().unwrap_err();
    assert_eq!(
        log.events(),
        [
            "before []",
            "after [] -> []",
            "error [] callable declares 2 error outputs, at most one is allowed",
        ]
    );
}

#[test]
fn panicking_hooks_are_contained() {
    let log = EventLog::new();
    let (first, second) = (log.clone(), log.clone());

    let mut chain = Chain::new();
    chain
        .before(|_| panic!("before hook"))
        .before(move |_| first.record("sibling before"))
        .after(|_, _| panic!("after hook"))
        .on_error(|_, _| panic!("error hook"))
        .on_error(move |_, _| second.record("sibling error"))
        .then(boom);

    let err = chain.execute().unwrap_err();

    assert_eq!(err.kind().to_string(), "boom");
    assert_eq!(log.events(), ["sibling before", "sibling error"]);
}

#[test]
fn empty_hook_entries_are_skipped() {
    let log = EventLog::new();
    let seen = log.clone();

    let mut chain = Chain::new();
    chain
        .before_hooks([
            None,
            Some(Box::new(move |args: &[Value]| seen.record(show(args))) as BeforeHook),
        ])
        .after_hooks([None])
        .error_hooks([None, None])
        .then(seven)
        .then(boom);

    chain.execute().unwrap_err();

    assert_eq!(chain.hook_count(HookKind::Before), 2);
    assert_eq!(chain.hook_count(HookKind::Error), 2);
    assert_eq!(log.events(), ["[]", "[7]"]);
}

#[test]
fn hooks_cannot_alter_arguments() {
    let mut chain = Chain::new();
    chain
        .before(|args| {
            let mut copy = args.to_vec();
            copy.clear();
            assert!(copy.is_empty());
        })
        .then(seven)
        .then(render);

    assert_eq!(chain.execute().unwrap(), [Value::Str("7".into())]);
}
