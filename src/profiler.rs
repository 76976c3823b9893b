//! Lightweight search profiling using thread-local counters
//!
//! Counters are accumulated per thread without contention and merged into
//! global atomics with `merge_thread_local`. Enable with the environment
//! variable PACMAN_PROFILE=1 or `[profiling] enabled = true` in Pacman.toml.

use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

thread_local! {
    static APPLY_MOVE_TIME: RefCell<u64> = const { RefCell::new(0) };
    static APPLY_MOVE_COUNT: RefCell<usize> = const { RefCell::new(0) };

    static EVAL_TIME: RefCell<u64> = const { RefCell::new(0) };
    static EVAL_COUNT: RefCell<usize> = const { RefCell::new(0) };

    static SHORTEST_PATH_TIME: RefCell<u64> = const { RefCell::new(0) };
    static SHORTEST_PATH_COUNT: RefCell<usize> = const { RefCell::new(0) };

    static SEARCH_NODES: RefCell<usize> = const { RefCell::new(0) };
    static SEARCH_CUTOFFS: RefCell<usize> = const { RefCell::new(0) };
}

static FORCE_ENABLED: AtomicBool = AtomicBool::new(false);
static ENV_ENABLED: OnceLock<bool> = OnceLock::new();

static GLOBAL_APPLY_MOVE_TIME: AtomicU64 = AtomicU64::new(0);
static GLOBAL_APPLY_MOVE_COUNT: AtomicUsize = AtomicUsize::new(0);
static GLOBAL_EVAL_TIME: AtomicU64 = AtomicU64::new(0);
static GLOBAL_EVAL_COUNT: AtomicUsize = AtomicUsize::new(0);
static GLOBAL_SHORTEST_PATH_TIME: AtomicU64 = AtomicU64::new(0);
static GLOBAL_SHORTEST_PATH_COUNT: AtomicUsize = AtomicUsize::new(0);
static GLOBAL_SEARCH_NODES: AtomicUsize = AtomicUsize::new(0);
static GLOBAL_SEARCH_CUTOFFS: AtomicUsize = AtomicUsize::new(0);

#[inline]
pub fn is_profiling_enabled() -> bool {
    FORCE_ENABLED.load(Ordering::Relaxed)
        || *ENV_ENABLED.get_or_init(|| std::env::var("PACMAN_PROFILE").is_ok())
}

/// Turns profiling on regardless of the environment
pub fn enable() {
    FORCE_ENABLED.store(true, Ordering::Relaxed);
}

pub struct ProfileGuard {
    start: Instant,
    category: &'static str,
}

impl ProfileGuard {
    pub fn new(category: &'static str) -> Option<Self> {
        if is_profiling_enabled() {
            Some(ProfileGuard {
                start: Instant::now(),
                category,
            })
        } else {
            None
        }
    }
}

impl Drop for ProfileGuard {
    fn drop(&mut self) {
        let elapsed_ns = self.start.elapsed().as_nanos() as u64;

        match self.category {
            "apply_move" => {
                APPLY_MOVE_TIME.with(|t| *t.borrow_mut() += elapsed_ns);
                APPLY_MOVE_COUNT.with(|c| *c.borrow_mut() += 1);
            }
            "eval" => {
                EVAL_TIME.with(|t| *t.borrow_mut() += elapsed_ns);
                EVAL_COUNT.with(|c| *c.borrow_mut() += 1);
            }
            "shortest_path" => {
                SHORTEST_PATH_TIME.with(|t| *t.borrow_mut() += elapsed_ns);
                SHORTEST_PATH_COUNT.with(|c| *c.borrow_mut() += 1);
            }
            _ => {}
        }
    }
}

#[inline]
pub fn record_search_node() {
    if is_profiling_enabled() {
        SEARCH_NODES.with(|c| *c.borrow_mut() += 1);
    }
}

#[inline]
pub fn record_cutoff() {
    if is_profiling_enabled() {
        SEARCH_CUTOFFS.with(|c| *c.borrow_mut() += 1);
    }
}

fn drain_time(cell: &'static std::thread::LocalKey<RefCell<u64>>, global: &AtomicU64) {
    cell.with(|t| {
        global.fetch_add(*t.borrow(), Ordering::Relaxed);
        *t.borrow_mut() = 0;
    });
}

fn drain_count(cell: &'static std::thread::LocalKey<RefCell<usize>>, global: &AtomicUsize) {
    cell.with(|c| {
        global.fetch_add(*c.borrow(), Ordering::Relaxed);
        *c.borrow_mut() = 0;
    });
}

/// Moves the calling thread's counters into the global totals
pub fn merge_thread_local() {
    if !is_profiling_enabled() {
        return;
    }

    drain_time(&APPLY_MOVE_TIME, &GLOBAL_APPLY_MOVE_TIME);
    drain_count(&APPLY_MOVE_COUNT, &GLOBAL_APPLY_MOVE_COUNT);
    drain_time(&EVAL_TIME, &GLOBAL_EVAL_TIME);
    drain_count(&EVAL_COUNT, &GLOBAL_EVAL_COUNT);
    drain_time(&SHORTEST_PATH_TIME, &GLOBAL_SHORTEST_PATH_TIME);
    drain_count(&SHORTEST_PATH_COUNT, &GLOBAL_SHORTEST_PATH_COUNT);
    drain_count(&SEARCH_NODES, &GLOBAL_SEARCH_NODES);
    drain_count(&SEARCH_CUTOFFS, &GLOBAL_SEARCH_CUTOFFS);
}

/// Global totals merged so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileTotals {
    pub apply_move_ns: u64,
    pub apply_move_calls: usize,
    pub eval_ns: u64,
    pub eval_calls: usize,
    pub shortest_path_ns: u64,
    pub shortest_path_calls: usize,
    pub search_nodes: usize,
    pub search_cutoffs: usize,
}

pub fn totals() -> ProfileTotals {
    ProfileTotals {
        apply_move_ns: GLOBAL_APPLY_MOVE_TIME.load(Ordering::Relaxed),
        apply_move_calls: GLOBAL_APPLY_MOVE_COUNT.load(Ordering::Relaxed),
        eval_ns: GLOBAL_EVAL_TIME.load(Ordering::Relaxed),
        eval_calls: GLOBAL_EVAL_COUNT.load(Ordering::Relaxed),
        shortest_path_ns: GLOBAL_SHORTEST_PATH_TIME.load(Ordering::Relaxed),
        shortest_path_calls: GLOBAL_SHORTEST_PATH_COUNT.load(Ordering::Relaxed),
        search_nodes: GLOBAL_SEARCH_NODES.load(Ordering::Relaxed),
        search_cutoffs: GLOBAL_SEARCH_CUTOFFS.load(Ordering::Relaxed),
    }
}

fn pct(part: u64, whole: u64) -> f64 {
    if whole > 0 {
        100.0 * part as f64 / whole as f64
    } else {
        0.0
    }
}

fn avg_us(time_ns: u64, calls: usize) -> f64 {
    if calls > 0 {
        time_ns as f64 / (calls * 1000) as f64
    } else {
        0.0
    }
}

pub fn print_report(total_time_ms: u64) {
    if !is_profiling_enabled() {
        return;
    }

    let total_ns = total_time_ms * 1_000_000;
    let t = totals();

    eprintln!("\n═══════════════════════════════════════════════════════════");
    eprintln!("                 PERFORMANCE PROFILE");
    eprintln!("═══════════════════════════════════════════════════════════");
    eprintln!("Total Time: {}ms\n", total_time_ms);

    eprintln!("Transitions:");
    eprintln!(
        "  Time:     {:.2}ms ({:.1}%)",
        t.apply_move_ns as f64 / 1_000_000.0,
        pct(t.apply_move_ns, total_ns)
    );
    eprintln!("  Calls:    {}", t.apply_move_calls);
    eprintln!("  Avg:      {:.2}µs/call\n", avg_us(t.apply_move_ns, t.apply_move_calls));

    eprintln!("Evaluation:");
    eprintln!(
        "  Total Time:      {:.2}ms ({:.1}%)",
        t.eval_ns as f64 / 1_000_000.0,
        pct(t.eval_ns, total_ns)
    );
    eprintln!("  Calls:           {}", t.eval_calls);
    eprintln!(
        "  Shortest Path:   {:.2}ms ({:.1}% of eval) - {} calls, {:.2}µs avg\n",
        t.shortest_path_ns as f64 / 1_000_000.0,
        pct(t.shortest_path_ns, t.eval_ns),
        t.shortest_path_calls,
        avg_us(t.shortest_path_ns, t.shortest_path_calls)
    );

    let cutoff_rate = if t.search_nodes > 0 {
        100.0 * t.search_cutoffs as f64 / t.search_nodes as f64
    } else {
        0.0
    };
    eprintln!("Search:");
    eprintln!("  Nodes:      {}", t.search_nodes);
    eprintln!("  Cutoffs:    {} ({:.1}% of nodes)\n", t.search_cutoffs, cutoff_rate);

    eprintln!("═══════════════════════════════════════════════════════════\n");
}

pub fn reset() {
    GLOBAL_APPLY_MOVE_TIME.store(0, Ordering::Relaxed);
    GLOBAL_APPLY_MOVE_COUNT.store(0, Ordering::Relaxed);
    GLOBAL_EVAL_TIME.store(0, Ordering::Relaxed);
    GLOBAL_EVAL_COUNT.store(0, Ordering::Relaxed);
    GLOBAL_SHORTEST_PATH_TIME.store(0, Ordering::Relaxed);
    GLOBAL_SHORTEST_PATH_COUNT.store(0, Ordering::Relaxed);
    GLOBAL_SEARCH_NODES.store(0, Ordering::Relaxed);
    GLOBAL_SEARCH_CUTOFFS.store(0, Ordering::Relaxed);
}

#[macro_export]
macro_rules! profile {
    ($category:expr, $code:block) => {{
        let _guard = $crate::profiler::ProfileGuard::new($category);
        $code
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_merge_into_totals() {
        enable();
        reset();

        {
            let _g = ProfileGuard::new("eval");
        }
        record_search_node();
        record_search_node();
        record_cutoff();
        merge_thread_local();

        let t = totals();
        // other tests may run concurrently with profiling on, so only lower bounds hold
        assert!(t.eval_calls >= 1);
        assert!(t.search_nodes >= 2);
        assert!(t.search_cutoffs >= 1);
    }
}
