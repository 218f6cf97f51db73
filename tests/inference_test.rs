mod helpers;

use chainer::engine::{
    InferenceDriver, InferenceError, InferenceLimits, Outcome, RuleKind, Signal, UnclassifiedReason,
};
use chainer::store::SqliteStore;
use helpers::{insert_knowledge_with_code, insert_raw_rule, insert_rule, seed_chain, test_db};

#[test]
fn chain_fires_twice_in_one_pass() {
    let conn = test_db();
    seed_chain(&conn);
    let store = SqliteStore::new(&conn);

    let run = InferenceDriver::new(&store, &store).run("1+2+4").unwrap();
    assert_eq!(run.passes, 1);
    assert_eq!(run.trace[0].signal, Signal::FiredTerminal);
    assert_eq!(run.final_memory.tokens(), &["5"]);

    let knowledge = run.outcome.knowledge().unwrap();
    assert_eq!(knowledge.code, 5);
    assert_eq!(knowledge.name, "tiger");
}

#[test]
fn partial_chain_is_unclassified_with_sentinel() {
    let conn = test_db();
    seed_chain(&conn);
    let store = SqliteStore::new(&conn);

    let run = InferenceDriver::new(&store, &store).run("1+2").unwrap();
    assert_eq!(run.passes, 2);
    assert_eq!(run.trace[0].after.tokens(), &["3"]);
    match run.outcome {
        Outcome::Unclassified {
            reason,
            code,
            classification,
        } => {
            assert_eq!(reason, UnclassifiedReason::NoMatch);
            assert_eq!(code, -1);
            assert_eq!(classification, -1);
        }
        other => panic!("expected unclassified, got {other:?}"),
    }
}

#[test]
fn inference_is_repeatable() {
    let conn = test_db();
    seed_chain(&conn);
    let store = SqliteStore::new(&conn);
    let driver = InferenceDriver::new(&store, &store);

    for input in ["1+2+4", "1+2", "4", "x+y"] {
        assert_eq!(driver.infer(input).unwrap(), driver.infer(input).unwrap());
    }
}

#[test]
fn multi_step_classification() {
    let conn = test_db();
    insert_rule(&conn, "has-hair", 1, RuleKind::Intermediate, "1=20");
    insert_rule(&conn, "eats-meat", 2, RuleKind::Intermediate, "20+9=21");
    insert_rule(&conn, "tawny-carnivore", 3, RuleKind::Terminal, "21+12=30");
    insert_knowledge_with_code(&conn, 30, "cheetah", 1);
    let store = SqliteStore::new(&conn);

    let outcome = InferenceDriver::new(&store, &store).infer("1+9+12").unwrap();
    assert_eq!(outcome.knowledge().map(|k| k.name.as_str()), Some("cheetah"));
}

#[test]
fn rules_run_in_position_order_not_insertion_order() {
    let conn = test_db();
    insert_rule(&conn, "second", 2, RuleKind::Terminal, "7=8");
    insert_rule(&conn, "first", 1, RuleKind::Terminal, "7=9");
    insert_knowledge_with_code(&conn, 8, "from-second", 0);
    insert_knowledge_with_code(&conn, 9, "from-first", 0);
    let store = SqliteStore::new(&conn);

    let outcome = InferenceDriver::new(&store, &store).infer("7").unwrap();
    assert_eq!(outcome.knowledge().unwrap().name, "from-first");
}

#[test]
fn terminal_overwritten_by_later_intermediate_in_same_pass() {
    let conn = test_db();
    insert_rule(&conn, "terminal-first", 1, RuleKind::Terminal, "1=2");
    insert_rule(&conn, "intermediate-after", 2, RuleKind::Intermediate, "2=3");
    insert_knowledge_with_code(&conn, 2, "would-have-matched", 0);
    let store = SqliteStore::new(&conn);

    let run = InferenceDriver::new(&store, &store).run("1").unwrap();
    assert_eq!(run.trace[0].signal, Signal::FiredIntermediate);
    assert_eq!(run.passes, 2);
    assert_eq!(run.outcome, Outcome::no_match());
}

#[test]
fn duplicate_input_tokens_are_overcounted() {
    let conn = test_db();
    insert_rule(&conn, "sole", 1, RuleKind::Terminal, "a=1");
    insert_knowledge_with_code(&conn, 1, "one", 0);
    let store = SqliteStore::new(&conn);
    let driver = InferenceDriver::new(&store, &store);

    // Two "a" tokens count twice against a one-token antecedent: no firing.
    assert_eq!(driver.infer("a+a").unwrap(), Outcome::no_match());
    assert!(driver.infer("a").unwrap().is_classified());
}

#[test]
fn duplicate_tokens_satisfy_a_missing_antecedent_token() {
    let conn = test_db();
    insert_rule(&conn, "pair", 1, RuleKind::Terminal, "a+c=1");
    insert_knowledge_with_code(&conn, 1, "one", 0);
    let store = SqliteStore::new(&conn);

    let run = InferenceDriver::new(&store, &store).run("a+a").unwrap();
    assert!(run.outcome.is_classified());
    assert_eq!(run.final_memory.tokens(), &["1"]);
}

#[test]
fn malformed_rule_does_not_abort_inference() {
    let conn = test_db();
    seed_chain(&conn);
    insert_raw_rule(&conn, "broken", 0, 1, "1+2");
    insert_raw_rule(&conn, "empty-left", 0, 0, "=9");
    let store = SqliteStore::new(&conn);

    let run = InferenceDriver::new(&store, &store).run("1+2+4").unwrap();
    assert!(run.outcome.is_classified());
    assert_eq!(run.rejected_rules.len(), 2);
}

#[test]
fn terminal_token_without_knowledge_is_record_not_found() {
    let conn = test_db();
    insert_rule(&conn, "to-unknown", 1, RuleKind::Terminal, "1=404");
    let store = SqliteStore::new(&conn);

    match InferenceDriver::new(&store, &store).infer("1").unwrap() {
        Outcome::Unclassified { reason, .. } => assert_eq!(
            reason,
            UnclassifiedReason::RecordNotFound {
                token: "404".into()
            }
        ),
        other => panic!("expected unclassified, got {other:?}"),
    }
}

#[test]
fn cycle_fails_as_non_terminating() {
    let conn = test_db();
    insert_rule(&conn, "forth", 1, RuleKind::Intermediate, "a=b");
    insert_rule(&conn, "back", 2, RuleKind::Intermediate, "b=a");
    let store = SqliteStore::new(&conn);

    let err = InferenceDriver::new(&store, &store)
        .with_limits(InferenceLimits {
            max_passes: 25,
            deadline: None,
        })
        .infer("a")
        .unwrap_err();
    assert_eq!(err, InferenceError::NonTerminating { passes: 25 });
}

#[test]
fn empty_rule_table_is_unclassified() {
    let conn = test_db();
    let store = SqliteStore::new(&conn);
    assert_eq!(
        InferenceDriver::new(&store, &store).infer("1+2").unwrap(),
        Outcome::no_match()
    );
}

#[test]
fn missing_tables_surface_as_storage_unavailable() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    let store = SqliteStore::new(&conn);
    let err = InferenceDriver::new(&store, &store).infer("1").unwrap_err();
    assert!(matches!(err, InferenceError::StorageUnavailable(_)));
}
