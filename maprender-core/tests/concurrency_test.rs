use maprender_core::cache::VectorCache;
use maprender_core::paint::stroke_paint;
use maprender_core::style::StrokeStyle;
use maprender_core::symbol::MemorySymbolCache;
use maprender_core::vg::kurbo::BezPath;
use maprender_core::vg::peniko::Color;
use maprender_core::viewport::Viewport;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

type Line = Vec<(f64, f64)>;

const THREADS: usize = 8;

fn new_cache(capacity: usize) -> VectorCache<Line> {
    VectorCache::new(Arc::new(MemorySymbolCache::new()), capacity).unwrap()
}

fn slow_path(line: &Line, builds: &AtomicUsize) -> BezPath {
    builds.fetch_add(1, Ordering::SeqCst);
    thread::sleep(Duration::from_millis(5));

    let mut path = BezPath::new();
    if let Some(&(x, y)) = line.first() {
        path.move_to((x, y));
    }
    path
}

#[test]
fn test_racing_misses_build_once() {
    let cache = new_cache(100);
    let view = Viewport::new(0.0, 0.0, 1.0, 0.0, 256.0, 256.0);
    let line: Arc<Line> = Arc::new(vec![(1.0, 1.0), (2.0, 2.0)]);
    let builds = AtomicUsize::new(0);
    let barrier = Barrier::new(THREADS);

    let paths: Vec<Arc<BezPath>> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    cache.get_or_create_path(&view, &line, 1.0, |line, _, _| slow_path(line, &builds))
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    assert_eq!(builds.load(Ordering::SeqCst), 1);
    assert!(paths.iter().all(|path| Arc::ptr_eq(path, &paths[0])));

    let stats = cache.stats().paths;
    assert_eq!(stats.len, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, (THREADS - 1) as u64);
}

#[test]
fn test_racing_paint_misses_build_once() {
    let cache = new_cache(100);
    let style = Arc::new(StrokeStyle::new(Color::from_rgb8(0, 128, 0), 1.0));
    let builds = AtomicUsize::new(0);
    let barrier = Barrier::new(THREADS);

    thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                barrier.wait();
                cache.get_or_create_stroke_paint(Some(&style), 1.0, |style, opacity| {
                    builds.fetch_add(1, Ordering::SeqCst);
                    thread::sleep(Duration::from_millis(5));
                    stroke_paint(style, opacity)
                });
            });
        }
    });

    assert_eq!(builds.load(Ordering::SeqCst), 1);
    assert_eq!(cache.stats().stroke_paints.len, 1);
}

#[test]
fn test_contended_bounded_store_stays_consistent() {
    const CAPACITY: usize = 16;
    const ROUNDS: usize = 200;

    let cache = new_cache(CAPACITY);
    let lines: Vec<Arc<Line>> = (0..64).map(|i| Arc::new(vec![(i as f64, 0.0)])).collect();
    let builds = AtomicUsize::new(0);

    thread::scope(|s| {
        for worker in 0..THREADS {
            let (cache, lines, builds) = (&cache, &lines, &builds);
            s.spawn(move || {
                for round in 0..ROUNDS {
                    let line = &lines[(worker * 7 + round * 13) % lines.len()];
                    let view = Viewport::new((round % 3) as f64, 0.0, 1.0, 0.0, 64.0, 64.0);
                    let path = cache.get_or_create_path(&view, line, 1.0, |line, _, _| {
                        builds.fetch_add(1, Ordering::Relaxed);
                        let mut path = BezPath::new();
                        path.move_to(line[0]);
                        path
                    });
                    assert_eq!(path.elements().len(), 1);

                    cache.get_or_create_rect(&view, Viewport::to_extent);
                }
            });
        }
    });

    let stats = cache.stats();
    let lookups = (THREADS * ROUNDS) as u64;

    assert!(stats.paths.len <= CAPACITY);
    assert_eq!(stats.paths.hits + stats.paths.misses, lookups);
    assert_eq!(stats.paths.misses, builds.load(Ordering::Relaxed) as u64);
    assert_eq!(
        stats.paths.evictions,
        stats.paths.misses - stats.paths.len as u64
    );
    assert_eq!(stats.viewports.len, 1);
}

#[test]
fn test_panicking_builder_leaves_cache_usable() {
    let cache = new_cache(10);
    let view = Viewport::new(0.0, 0.0, 1.0, 0.0, 32.0, 32.0);
    let line: Arc<Line> = Arc::new(vec![(3.0, 4.0)]);

    thread::scope(|s| {
        let handle = s.spawn(|| {
            cache.get_or_create_path(&view, &line, 1.0, |_, _, _| -> BezPath {
                panic!("builder blew up")
            })
        });
        assert!(handle.join().is_err());
    });

    let builds = AtomicUsize::new(0);
    cache.get_or_create_path(&view, &line, 1.0, |line, _, _| slow_path(line, &builds));
    cache.get_or_create_path(&view, &line, 1.0, |line, _, _| slow_path(line, &builds));

    assert_eq!(builds.load(Ordering::SeqCst), 1);
    assert_eq!(cache.stats().paths.len, 1);
}

struct Native {
    releases: Arc<AtomicUsize>,
}

impl Drop for Native {
    fn drop(&mut self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_racing_misses_release_once() {
    let cache: VectorCache<Line, Native, Native> =
        VectorCache::new(Arc::new(MemorySymbolCache::new()), 100).unwrap();
    let view = Viewport::new(0.0, 0.0, 1.0, 0.0, 256.0, 256.0);
    let line: Arc<Line> = Arc::new(vec![(1.0, 1.0)]);
    let builds = AtomicUsize::new(0);
    let releases = Arc::new(AtomicUsize::new(0));
    let barrier = Barrier::new(THREADS);

    thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                barrier.wait();
                let path = cache.get_or_create_path(&view, &line, 1.0, |_, _, _| {
                    builds.fetch_add(1, Ordering::SeqCst);
                    thread::sleep(Duration::from_millis(5));
                    Native {
                        releases: releases.clone(),
                    }
                });
                drop(path);
            });
        }
    });

    assert_eq!(builds.load(Ordering::SeqCst), 1);
    assert_eq!(releases.load(Ordering::SeqCst), 0);

    drop(cache);
    assert_eq!(releases.load(Ordering::SeqCst), 1);
}
