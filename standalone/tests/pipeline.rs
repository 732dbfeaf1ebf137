use std::io::Write;

use common::error::Phase;
use common::source::FileSource;
use common::{
    MappedPair, PipelineConfig, PipelineError, RankedEntry, ReducedPair, ShuffleGroup, Token,
    Workload,
};
use standalone::rank::top_n;
use standalone::Pipeline;

const SENTENCE: &str = "the cat sat on the mat the cat ran";

fn word_count(pool_size: usize, n: usize) -> Pipeline {
    Pipeline::word_count(PipelineConfig::new(pool_size, n)).unwrap()
}

#[tokio::test]
async fn sentence_top_three() {
    let pipeline = word_count(4, 3);
    let counts = pipeline.run(SENTENCE).await.unwrap();
    let ranked = top_n(&counts, 3);

    assert_eq!(
        ranked,
        vec![
            RankedEntry::new("the", 3),
            RankedEntry::new("cat", 2),
            RankedEntry::new("sat", 1),
        ]
    );
}

#[tokio::test]
async fn single_word() {
    let pipeline = word_count(8, 10);
    let counts = pipeline.run("hello").await.unwrap();

    assert_eq!(counts.len(), 1);
    assert_eq!(counts.get("hello"), Some(&1));
    assert_eq!(top_n(&counts, 10), vec![RankedEntry::new("hello", 1)]);
}

#[tokio::test]
async fn whitespace_only_is_empty() {
    let pipeline = word_count(3, 10);
    let counts = pipeline.run(" \n\t  ").await.unwrap();
    assert!(counts.is_empty());
    assert!(top_n(&counts, 10).is_empty());
}

#[tokio::test]
async fn more_workers_than_tokens() {
    let sequential = word_count(1, 10).run(SENTENCE).await.unwrap();
    let wide = word_count(64, 10).run(SENTENCE).await.unwrap();
    assert_eq!(sequential, wide);
    assert!(sequential.iter().eq(wide.iter()));
}

#[tokio::test]
async fn large_text_counts_add_up() {
    let text = "alpha beta gamma beta alpha alpha\n".repeat(5_000);
    let counts = word_count(6, 3).run(&text).await.unwrap();

    assert_eq!(counts.get("alpha"), Some(&15_000));
    assert_eq!(counts.get("beta"), Some(&10_000));
    assert_eq!(counts.get("gamma"), Some(&5_000));
    assert_eq!(counts.values().sum::<u64>(), 30_000);
}

#[tokio::test]
async fn runs_from_a_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{SENTENCE}\n{SENTENCE}").unwrap();

    let pipeline = word_count(2, 2);
    let counts = pipeline
        .run_source(&FileSource::new(file.path()))
        .await
        .unwrap();
    assert_eq!(
        pipeline.rank(&counts),
        vec![RankedEntry::new("the", 6), RankedEntry::new("cat", 4)]
    );
}

#[tokio::test]
async fn missing_file_stops_before_any_phase() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = word_count(2, 10);

    let err = pipeline
        .run_source(&FileSource::new(dir.path().join("nope.txt")))
        .await
        .unwrap_err();
    assert!(err.is_input_unavailable());
}

fn map_refuses_mat(token: Token) -> MappedPair {
    if token.as_str() == "mat" {
        panic!("refusing to map `mat`");
    }
    workload::wc::map(token)
}

#[tokio::test]
async fn map_fault_aborts_the_run() {
    let workload = Workload {
        map_fn: map_refuses_mat,
        ..workload::word_count()
    };
    let pipeline = Pipeline::new(PipelineConfig::new(3, 10), workload).unwrap();

    let err = pipeline.run(SENTENCE).await.unwrap_err();
    match err {
        PipelineError::WorkerFault { phase, reason } => {
            assert_eq!(phase, Phase::Map);
            assert!(reason.contains("refusing to map"), "{reason}");
        }
        other => panic!("expected a worker fault, got {other:?}"),
    }
}

fn reduce_refuses_the(group: ShuffleGroup) -> ReducedPair {
    if group.key == "the" {
        panic!("refusing to reduce `the`");
    }
    workload::wc::reduce(group)
}

#[tokio::test]
async fn reduce_fault_aborts_the_run() {
    let workload = Workload {
        reduce_fn: reduce_refuses_the,
        ..workload::word_count()
    };
    let pipeline = Pipeline::new(PipelineConfig::new(3, 10), workload).unwrap();

    let err = pipeline.run(SENTENCE).await.unwrap_err();
    match err {
        PipelineError::WorkerFault { phase, reason } => {
            assert_eq!(phase, Phase::Reduce);
            assert!(reason.contains("refusing to reduce"), "{reason}");
        }
        other => panic!("expected a worker fault, got {other:?}"),
    }
}

#[tokio::test]
async fn cancelled_run_returns_nothing() {
    let pipeline = word_count(2, 10);
    pipeline.cancellation_token().cancel();

    let err = pipeline.run(SENTENCE).await.unwrap_err();
    assert!(matches!(err, PipelineError::Cancelled { .. }));
}
