//! Spy functions: randomized callables that record every invocation.
//!
//! Each sample drawn from [`arb_spy_fn`] owns a fresh [`CallLog`] and a random
//! function. The returned [`SpyFn`] appends one [`Spied`] entry per call, in
//! the order calls are issued, and hands back the (possibly mapped) result.

use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace};

use crate::func::{RandomFn, func};
use crate::generator::Generator;
use crate::spying::{Sample, SpyingArbitrary};

/// A single recorded invocation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Spied<I, A> {
    /// The arguments the spy was called with
    pub args: I,
    /// The raw sampled result, before any result mapping
    pub result: A,
}

/// Something a [`Reset`] can empty
pub trait Truncate: Send + Sync {
    /// Drop every entry
    fn truncate(&self);
}

type LogCell<I, A> = Mutex<Vec<Spied<I, A>>>;

impl<I: Send, A: Send> Truncate for LogCell<I, A> {
    fn truncate(&self) {
        self.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

/// Handle on the call log of one spy sample
///
/// Clones share the same cell, so the log held by a test observes every call
/// made through the matching [`SpyFn`].
pub struct CallLog<I, A> {
    cell: Arc<LogCell<I, A>>,
}

impl<I, A> CallLog<I, A> {
    pub(crate) fn new() -> Self {
        Self {
            cell: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn entries_guard(&self) -> MutexGuard<'_, Vec<Spied<I, A>>> {
        self.cell.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an entry, returning its index
    pub(crate) fn push(&self, entry: Spied<I, A>) -> usize {
        let mut entries = self.entries_guard();
        entries.push(entry);
        entries.len() - 1
    }

    /// Number of recorded calls
    pub fn len(&self) -> usize {
        self.entries_guard().len()
    }

    /// Whether no call has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries_guard().is_empty()
    }
}

impl<I: Clone, A: Clone> CallLog<I, A> {
    /// Snapshot of every recorded call, oldest first
    pub fn entries(&self) -> Vec<Spied<I, A>> {
        self.entries_guard().clone()
    }

    /// The `index`-th recorded call
    pub fn get(&self, index: usize) -> Option<Spied<I, A>> {
        self.entries_guard().get(index).cloned()
    }

    /// Most recent call
    pub fn last(&self) -> Option<Spied<I, A>> {
        self.entries_guard().last().cloned()
    }

    /// Arguments of every call, in call order
    pub fn args(&self) -> Vec<I> {
        self.entries_guard().iter().map(|e| e.args.clone()).collect()
    }

    /// Raw results of every call, in call order
    pub fn results(&self) -> Vec<A> {
        self.entries_guard()
            .iter()
            .map(|e| e.result.clone())
            .collect()
    }
}

impl<I: Send + 'static, A: Send + 'static> CallLog<I, A> {
    /// Reset handle truncating this log
    pub(crate) fn truncator(&self) -> Arc<dyn Truncate> {
        self.cell.clone()
    }
}

impl<I, A> Clone for CallLog<I, A> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<I: fmt::Debug, A: fmt::Debug> fmt::Debug for CallLog<I, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries_guard().iter()).finish()
    }
}

/// The reset procedure of a sample: every log reachable from it
#[derive(Clone, Default)]
pub struct Reset {
    handles: Vec<Arc<dyn Truncate>>,
}

impl Reset {
    /// A reset that touches nothing
    pub fn noop() -> Self {
        Self::default()
    }

    /// A reset for a single log
    pub fn of(handle: Arc<dyn Truncate>) -> Self {
        Self {
            handles: vec![handle],
        }
    }

    /// Reset both `self` and `other`
    pub fn merge(mut self, other: Reset) -> Self {
        self.handles.extend(other.handles);
        self
    }

    /// Truncate every log. Running twice has the same effect as once.
    pub fn run(&self) {
        for handle in &self.handles {
            handle.truncate();
        }
        debug!(logs = self.handles.len(), "reset call logs");
    }

    /// Number of logs covered
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether this reset covers no logs
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl fmt::Debug for Reset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reset")
            .field("logs", &self.handles.len())
            .finish()
    }
}

/// A recording spy over argument tuples `I`
///
/// `A` is the raw sampled result stored in the log; `B` is what callers see.
pub struct SpyFn<I, A, B = A> {
    log: CallLog<I, A>,
    func: RandomFn<I, A>,
    map: Arc<dyn Fn(A) -> B + Send + Sync>,
}

impl<I, A, B> SpyFn<I, A, B>
where
    I: Hash,
    A: Clone,
{
    /// Invoke the spy
    pub fn call(&self, args: I) -> B {
        let result = self.func.call(&args);
        let index = self.log.push(Spied {
            args,
            result: result.clone(),
        });
        trace!(call = index, seed = self.func.seed(), "spy invoked");
        (self.map)(result)
    }
}

impl<I, A, B> SpyFn<I, A, B> {
    /// The log this spy writes to
    pub fn log(&self) -> &CallLog<I, A> {
        &self.log
    }
}

impl<I, A, B> Clone for SpyFn<I, A, B> {
    fn clone(&self) -> Self {
        Self {
            log: self.log.clone(),
            func: self.func.clone(),
            map: Arc::clone(&self.map),
        }
    }
}

impl<I, A, B> fmt::Debug for SpyFn<I, A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpyFn")
            .field("seed", &self.func.seed())
            .field("calls", &self.log.entries_guard().len())
            .finish()
    }
}

/// Generate spies returning values drawn from `values`
///
/// ```rust
/// use spyglass::{arb_spy_fn, int_range, to_arbitrary, create_seeded_rng, Generator, GeneratorConfig};
///
/// let spies = to_arbitrary(arb_spy_fn::<(i32,), _>(int_range(0, 9)));
/// let mut rng = create_seeded_rng(1);
/// let (log, spy) = spies.generate(&mut rng, &GeneratorConfig::default());
///
/// let first = spy.call((7,));
/// assert_eq!(spy.call((7,)), first);
/// assert_eq!(log.args(), vec![(7,), (7,)]);
/// ```
pub fn arb_spy_fn<I, A>(
    values: impl Generator<Value = A> + Send + Sync + 'static,
) -> SpyingArbitrary<CallLog<I, A>, SpyFn<I, A>>
where
    I: Hash + Send + 'static,
    A: Clone + Send + 'static,
{
    arb_spy_fn_with::<I, A, A>(values, |result| result)
}

/// Generate spies whose sampled results go through `result_map` before being
/// returned; the log keeps the raw sample
pub fn arb_spy_fn_with<I, A, B>(
    values: impl Generator<Value = A> + Send + Sync + 'static,
    result_map: impl Fn(A) -> B + Send + Sync + 'static,
) -> SpyingArbitrary<CallLog<I, A>, SpyFn<I, A, B>>
where
    I: Hash + Send + 'static,
    A: Clone + Send + 'static,
    B: 'static,
{
    let map: Arc<dyn Fn(A) -> B + Send + Sync> = Arc::new(result_map);
    let samples = func::<I, _>(values).map(move |func| {
        let log = CallLog::new();
        Sample {
            reset: Reset::of(log.truncator()),
            log: log.clone(),
            value: SpyFn {
                log,
                func,
                map: Arc::clone(&map),
            },
        }
    });
    SpyingArbitrary::new(samples)
}
