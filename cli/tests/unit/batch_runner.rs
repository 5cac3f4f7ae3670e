//! Batch runs across several fake instances.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use bootstrap_cli::application::{
    BatchSummary, ExecSinks, RemoteCommandRunner, RunnerConfig, run_batch,
};
use bootstrap_cli::output::LinePrefixWriter;
use bootstrap_common::ExitOutcome;

use crate::helpers::{AlreadyCancelled, CancelAtOnce, FakeProvider, NoWait, Script, SharedBuf, sinks, target};

fn runner() -> Arc<RemoteCommandRunner<NoWait>> {
    Arc::new(RemoteCommandRunner::new(RunnerConfig::default(), NoWait))
}

#[tokio::test]
async fn test_results_come_back_in_target_order() {
    let provider = Arc::new(
        FakeProvider::default()
            .with("10.0.0.1", Script::exits(0, &["one\n"]))
            .with("10.0.0.2", Script::exits(3, &["two\n"]))
            .with("10.0.0.3", Script::exits(0, &[])),
    );
    let targets = vec![
        target("i-0000000a=10.0.0.1"),
        target("i-0000000b=10.0.0.2"),
        target("i-0000000c=10.0.0.3"),
    ];
    let out = SharedBuf::default();
    let err = SharedBuf::default();

    let results = run_batch(targets, provider, runner(), |_| sinks(&out, &err)).await;

    let ids: Vec<_> = results.iter().map(|r| r.instance.id.as_str()).collect();
    assert_eq!(ids, ["i-0000000a", "i-0000000b", "i-0000000c"]);
    assert_eq!(results[0].outcome, ExitOutcome::exited(0));
    assert_eq!(results[1].outcome, ExitOutcome::exited(3));
    assert_eq!(results[2].outcome, ExitOutcome::exited(0));
}

#[tokio::test]
async fn test_unreachable_instance_does_not_affect_the_others() {
    let provider = Arc::new(FakeProvider::default().with("10.0.0.1", Script::exits(0, &["ok\n"])));
    let targets = vec![target("i-0000000a=10.0.0.1"), target("i-0000000b=10.0.0.9")];
    let out = SharedBuf::default();
    let err = SharedBuf::default();

    let results = run_batch(targets, provider, runner(), |_| sinks(&out, &err)).await;

    assert_eq!(results[0].outcome, ExitOutcome::exited(0));
    assert_eq!(results[1].outcome, ExitOutcome::NoSession);
    assert_eq!(results[1].exit_status(), None);
    let summary = BatchSummary::from_results(&results);
    assert_eq!(summary.passed, 1);
    assert_eq!(summary.incomplete, 1);
    assert!(!summary.all_passed());
}

#[tokio::test]
async fn test_channel_failure_is_reported_as_transport_failure() {
    let provider = Arc::new(FakeProvider::default().with(
        "10.0.0.1",
        Script {
            fail_connect: true,
            ..Script::default()
        },
    ));
    let out = SharedBuf::default();
    let err = SharedBuf::default();

    let results = run_batch(
        vec![target("i-0000000a=10.0.0.1")],
        provider,
        runner(),
        |_| sinks(&out, &err),
    )
    .await;

    assert_eq!(results[0].outcome, ExitOutcome::TransportFailed);
    assert!(out.contents().is_empty());
}

#[tokio::test]
async fn test_cancellation_ends_runs_that_never_close() {
    let provider = Arc::new(FakeProvider::default().with(
        "10.0.0.1",
        Script {
            stdout: vec!["partial\n"],
            never_close: true,
            ..Script::default()
        },
    ));
    let runner = Arc::new(RemoteCommandRunner::new(RunnerConfig::default(), CancelAtOnce));
    let out = SharedBuf::default();
    let err = SharedBuf::default();

    let results = run_batch(
        vec![target("i-0000000a=10.0.0.1")],
        provider,
        runner,
        |_| sinks(&out, &err),
    )
    .await;

    assert_eq!(results[0].outcome, ExitOutcome::Cancelled);
    assert_eq!(out.contents(), "partial\n");
}

#[tokio::test]
async fn test_cancelled_batch_connects_to_nothing() {
    let provider = Arc::new(
        FakeProvider::default()
            .with("10.0.0.1", Script::exits(0, &["should not run\n"]))
            .with("10.0.0.2", Script::exits(0, &["should not run\n"])),
    );
    let runner = Arc::new(RemoteCommandRunner::new(RunnerConfig::default(), AlreadyCancelled));
    let targets = vec![target("i-0000000a=10.0.0.1"), target("i-0000000b=10.0.0.2")];
    let out = SharedBuf::default();
    let err = SharedBuf::default();

    let results = run_batch(targets, Arc::clone(&provider), runner, |_| sinks(&out, &err)).await;

    assert!(results.iter().all(|r| r.outcome == ExitOutcome::Cancelled));
    assert_eq!(provider.opened(), 0);
    assert!(out.contents().is_empty());
}

#[tokio::test]
async fn test_framed_sinks_label_every_line_with_its_instance() {
    let provider = Arc::new(
        FakeProvider::default()
            .with(
                "10.0.0.1",
                Script {
                    stdout: vec!["Linux a 6.1", ".0\nsecond\n"],
                    stderr: "warn a\n",
                    ..Script::default()
                },
            )
            .with("10.0.0.2", Script::exits(0, &["Linux b\n"])),
    );
    let targets = vec![target("i-0000000a=10.0.0.1"), target("i-0000000b=10.0.0.2")];
    let out = SharedBuf::default();
    let err = SharedBuf::default();

    let results = run_batch(targets, provider, runner(), |t| {
        let prefix = format!("[{}] ", t.instance.id);
        ExecSinks {
            stdout: Box::new(LinePrefixWriter::new(prefix.clone(), out.clone())),
            stderr: Box::new(LinePrefixWriter::new(prefix, err.clone())),
        }
    })
    .await;

    assert!(BatchSummary::from_results(&results).all_passed());
    let stdout = out.contents();
    assert!(stdout.contains("[i-0000000a] Linux a 6.1.0\n"), "got: {stdout}");
    assert!(stdout.contains("[i-0000000a] second\n"), "got: {stdout}");
    assert!(stdout.contains("[i-0000000b] Linux b\n"), "got: {stdout}");
    assert_eq!(stdout.lines().count(), 3);
    assert_eq!(err.contents(), "[i-0000000a] warn a\n");
}

#[tokio::test]
async fn test_empty_batch_returns_no_results() {
    let out = SharedBuf::default();
    let err = SharedBuf::default();
    let results = run_batch(
        Vec::new(),
        Arc::new(FakeProvider::default()),
        runner(),
        |_| sinks(&out, &err),
    )
    .await;
    assert!(results.is_empty());
}
