//! Round-trip behaviour of the SQLite memo cache.

use std::sync::atomic::{AtomicUsize, Ordering};

use storage::{CacheError, MemoCache};
use test_utils::temp_cache_dir;

#[derive(Debug)]
#[allow(dead_code)]
enum TestError {
    Cache(CacheError),
    Upstream(&'static str),
}

impl From<CacheError> for TestError {
    fn from(err: CacheError) -> Self {
        TestError::Cache(err)
    }
}

async fn counted(
    calls: &AtomicUsize,
    value: Option<Vec<f64>>,
) -> Result<Option<Vec<f64>>, CacheError> {
    calls.fetch_add(1, Ordering::SeqCst);
    Ok(value)
}

#[tokio::test]
async fn test_identical_arguments_compute_once() {
    let dir = temp_cache_dir();
    let cache = MemoCache::open(dir.path(), "observes").await.unwrap();
    let calls = AtomicUsize::new(0);
    let args = ("kanagawa", "2024-04-01T09:00:00+09:00", 13);

    let first = cache
        .get_or_compute(&args, || counted(&calls, Some(vec![0.03, 0.04])))
        .await
        .unwrap();
    let second = cache
        .get_or_compute(&args, || counted(&calls, Some(vec![9.0])))
        .await
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(first, Some(vec![0.03, 0.04]));
    assert_eq!(second, first);

    let stats = cache.stats().await;
    assert_eq!((stats.hits, stats.misses, stats.stores), (1, 1, 1));
}

#[tokio::test]
async fn test_different_arguments_store_separately() {
    let dir = temp_cache_dir();
    let cache = MemoCache::open(dir.path(), "observes").await.unwrap();
    let calls = AtomicUsize::new(0);

    let a = cache
        .get_or_compute(&("kanagawa", 12), || counted(&calls, Some(vec![1.0])))
        .await
        .unwrap();
    let b = cache
        .get_or_compute(&("kanagawa", 13), || counted(&calls, Some(vec![2.0])))
        .await
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(a, Some(vec![1.0]));
    assert_eq!(b, Some(vec![2.0]));
    assert_eq!(cache.len().await.unwrap(), 2);
    assert!(cache.contains(&("kanagawa", 12)).await.unwrap());
    assert!(!cache.contains(&("kanagawa", 14)).await.unwrap());
}

#[tokio::test]
async fn test_none_is_not_stored() {
    let dir = temp_cache_dir();
    let cache = MemoCache::open(dir.path(), "observes").await.unwrap();
    let calls = AtomicUsize::new(0);
    let args = ("nowhere", 13);

    let first = cache
        .get_or_compute(&args, || counted(&calls, None))
        .await
        .unwrap();
    assert_eq!(first, None);
    assert!(cache.is_empty().await.unwrap());

    // The next identical call retries and can now succeed.
    let second = cache
        .get_or_compute(&args, || counted(&calls, Some(vec![5.0])))
        .await
        .unwrap();
    assert_eq!(second, Some(vec![5.0]));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(cache.len().await.unwrap(), 1);
}

#[tokio::test]
async fn test_entries_survive_reopen() {
    let dir = temp_cache_dir();
    let calls = AtomicUsize::new(0);
    let args = ("kanagawa", "2024-04-01T09:00:00+09:00");

    {
        let cache = MemoCache::open(dir.path(), "observes").await.unwrap();
        cache
            .get_or_compute(&args, || counted(&calls, Some(vec![1.5, 2.5])))
            .await
            .unwrap();
    }

    let reopened = MemoCache::open(dir.path(), "observes").await.unwrap();
    let value = reopened
        .get_or_compute(&args, || counted(&calls, Some(vec![0.0])))
        .await
        .unwrap();

    assert_eq!(value, Some(vec![1.5, 2.5]));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(reopened.path(), dir.path().join("observes.sqlite"));
}

#[tokio::test]
async fn test_failure_propagates_uncached() {
    let dir = temp_cache_dir();
    let cache = MemoCache::open(dir.path(), "observes").await.unwrap();
    let args = ("kanagawa", 13);

    let result: Result<Option<Vec<f64>>, TestError> = cache
        .get_or_compute(&args, || async { Err(TestError::Upstream("retrieval timed out")) })
        .await;
    assert!(matches!(result, Err(TestError::Upstream(_))));
    assert!(!cache.contains(&args).await.unwrap());

    let retried: Option<Vec<f64>> = cache
        .get_or_compute(&args, || async { Ok::<_, TestError>(Some(vec![3.0])) })
        .await
        .unwrap();
    assert_eq!(retried, Some(vec![3.0]));
}

#[tokio::test]
async fn test_basenames_are_isolated() {
    let dir = temp_cache_dir();
    let observes = MemoCache::open(dir.path(), "observes").await.unwrap();
    let forecasts = MemoCache::open(dir.path(), "forecasts").await.unwrap();
    let calls = AtomicUsize::new(0);
    let args = ("kanagawa", 13);

    observes
        .get_or_compute(&args, || counted(&calls, Some(vec![1.0])))
        .await
        .unwrap();
    let other = forecasts
        .get_or_compute(&args, || counted(&calls, Some(vec![2.0])))
        .await
        .unwrap();

    assert_eq!(other, Some(vec![2.0]));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(observes.len().await.unwrap(), 1);
    assert_eq!(forecasts.len().await.unwrap(), 1);
}

#[tokio::test]
async fn test_put_get_and_clear() {
    let dir = temp_cache_dir();
    let cache = MemoCache::open(dir.path(), "observes").await.unwrap();

    cache.put(&("a", 1), &vec![1.0, 2.0]).await.unwrap();
    let value: Option<Vec<f64>> = cache.get(&("a", 1)).await.unwrap();
    assert_eq!(value, Some(vec![1.0, 2.0]));
    let missing: Option<Vec<f64>> = cache.get(&("a", 2)).await.unwrap();
    assert_eq!(missing, None);

    assert_eq!(cache.clear().await.unwrap(), 1);
    assert!(cache.is_empty().await.unwrap());
}

#[tokio::test]
async fn test_unavailable_store_is_an_error() {
    let dir = temp_cache_dir();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"occupied").unwrap();

    let err = MemoCache::open(&blocker, "observes").await.unwrap_err();
    assert!(matches!(err, CacheError::Io(_)));

    let err = MemoCache::open(dir.path(), "../escape").await.unwrap_err();
    assert!(matches!(err, CacheError::InvalidBasename(_)));
}
