//! End-to-end evaluation scenarios.
//!
//! Each scenario parses a Makefile, dates its files through an in-memory
//! clock, and records the actions the engine runs. Every scenario is checked
//! under both strategies.

use pmake::engine::{Engine, EngineError, Strategy};
use pmake::makefile;
use rstest::rstest;
use test_support::{FakeTimes, RecordingRunner};

const APP: &str = "\
app : main.o util.o
\tcc -o app main.o util.o
\tstrip app
";

#[rstest]
fn newer_objects_rebuild_app_once_in_order(
    #[values(Strategy::Sequential, Strategy::Parallel)] strategy: Strategy,
) {
    let graph = makefile::from_str(APP).expect("parse");
    let times = FakeTimes::new()
        .with("app", 1)
        .with("main.o", 2)
        .with("util.o", 2);
    let runner = RecordingRunner::new();
    Engine::new(&graph, &runner, &times)
        .evaluate(None, strategy)
        .expect("build app");
    assert_eq!(
        runner.commands(),
        ["cc -o app main.o util.o", "strip app"]
    );
}

#[rstest]
fn missing_app_is_built_from_existing_objects(
    #[values(Strategy::Sequential, Strategy::Parallel)] strategy: Strategy,
) {
    let graph = makefile::from_str(APP).expect("parse");
    let times = FakeTimes::new().with("main.o", 2).with("util.o", 2);
    let runner = RecordingRunner::new();
    Engine::new(&graph, &runner, &times)
        .evaluate(Some("app"), strategy)
        .expect("build app");
    assert_eq!(runner.count("cc -o app main.o util.o"), 1);
    assert_eq!(runner.count("strip app"), 1);
}

#[rstest]
fn app_newer_than_objects_is_left_alone(
    #[values(Strategy::Sequential, Strategy::Parallel)] strategy: Strategy,
) {
    let graph = makefile::from_str(APP).expect("parse");
    let times = FakeTimes::new()
        .with("app", 5)
        .with("main.o", 2)
        .with("util.o", 5);
    let runner = RecordingRunner::new();
    Engine::new(&graph, &runner, &times)
        .evaluate(None, strategy)
        .expect("nothing to do");
    assert!(runner.commands().is_empty());
}

#[rstest]
fn clean_runs_regardless_of_other_timestamps(
    #[values(Strategy::Sequential, Strategy::Parallel)] strategy: Strategy,
) {
    let src = format!("{APP}clean :\n\trm -f app\n");
    let graph = makefile::from_str(&src).expect("parse");
    let times = FakeTimes::new()
        .with("app", 9)
        .with("main.o", 1)
        .with("util.o", 1);
    let runner = RecordingRunner::new();
    Engine::new(&graph, &runner, &times)
        .evaluate(Some("clean"), strategy)
        .expect("clean");
    assert_eq!(runner.commands(), ["rm -f app"]);
}

/// `common` is only ever named as a prerequisite, so it has no actions of its
/// own; the parents echo it so the number of evaluations is visible.
const DIAMOND: &str = "\
top : a b
\tlink top
a : common
\tuse common a
b : common
\tuse common b
";

#[rstest]
fn diamond_evaluates_shared_prerequisite_once_per_path(
    #[values(Strategy::Sequential, Strategy::Parallel)] strategy: Strategy,
) {
    let graph = makefile::from_str(&format!("{DIAMOND}common :\n\tgen common\n"))
        .expect("parse");
    let runner = RecordingRunner::new();
    Engine::new(&graph, &runner, &FakeTimes::new())
        .evaluate(None, strategy)
        .expect("build diamond");
    assert_eq!(runner.count("gen common"), 2);
    assert_eq!(runner.count("link top"), 1);
    assert_eq!(runner.commands().last().map(String::as_str), Some("link top"));
}

#[rstest]
fn diamond_order_is_deterministic_when_sequential() {
    let graph = makefile::from_str(&format!("{DIAMOND}common :\n\tgen common\n"))
        .expect("parse");
    let runner = RecordingRunner::new();
    Engine::new(&graph, &runner, &FakeTimes::new())
        .evaluate(None, Strategy::Sequential)
        .expect("build diamond");
    assert_eq!(
        runner.commands(),
        [
            "gen common",
            "use common a",
            "gen common",
            "use common b",
            "link top"
        ]
    );
}

#[rstest]
fn diamond_with_undeclared_common_still_builds(
    #[values(Strategy::Sequential, Strategy::Parallel)] strategy: Strategy,
) {
    let graph = makefile::from_str(DIAMOND).expect("parse");
    let times = FakeTimes::new().with("common", 3);
    let runner = RecordingRunner::new();
    Engine::new(&graph, &runner, &times)
        .evaluate(None, strategy)
        .expect("build diamond");
    assert_eq!(runner.count("use common a"), 1);
    assert_eq!(runner.count("use common b"), 1);
    assert_eq!(runner.count("link top"), 1);
}

#[rstest]
fn unknown_target_fails_before_any_action(
    #[values(Strategy::Sequential, Strategy::Parallel)] strategy: Strategy,
) {
    let graph = makefile::from_str(APP).expect("parse");
    let runner = RecordingRunner::new();
    let err = Engine::new(&graph, &runner, &FakeTimes::new())
        .evaluate(Some("install"), strategy)
        .expect_err("unknown target");
    assert!(matches!(err, EngineError::UnknownTarget { ref name } if name == "install"));
    assert_eq!(err.to_string(), "unknown target `install`");
    assert!(runner.commands().is_empty());
}
