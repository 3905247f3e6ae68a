//! Asynchronous spies that settle with a randomly chosen outcome.

use std::future::Future;
use std::hash::Hash;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::generator::Generator;
use crate::outcome::Outcome;
use crate::primitives::{MaybeWeighted, one_of, weighted};
use crate::spy::{CallLog, SpyFn, arb_spy_fn_with};
use crate::spying::SpyingArbitrary;

/// The pending operation returned by an async spy
///
/// The outcome is fixed when the spy is called. The first poll yields
/// `Pending` and wakes the task; the next one settles.
#[derive(Debug)]
pub struct Settle<A, E> {
    outcome: Option<Outcome<E, A>>,
    polled: bool,
}

impl<A, E> Settle<A, E> {
    /// A pending operation that will settle with `outcome`
    pub fn new(outcome: Outcome<E, A>) -> Self {
        Self {
            outcome: Some(outcome),
            polled: false,
        }
    }
}

impl<A, E> Unpin for Settle<A, E> {}

impl<A, E> Future for Settle<A, E> {
    type Output = Result<A, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if !self.polled {
            self.polled = true;
            cx.waker().wake_by_ref();
            return Poll::Pending;
        }
        match self.outcome.take() {
            Some(outcome) => Poll::Ready(outcome.into_result()),
            None => panic!("Settle polled after completion"),
        }
    }
}

/// A spy returning [`Settle`] futures while logging the [`Outcome`] it chose
pub type AsyncSpyFn<I, E, A> = SpyFn<I, Outcome<E, A>, Settle<A, E>>;

/// Generate async spies that reject with values from `on_failure` or resolve
/// with values from `on_success`
///
/// Either side may be a plain generator (weight 1) or a
/// [`Weighted`](crate::Weighted) one; a zero weight rules that side out.
pub fn arb_spy_async_fn<I, F, S>(
    on_failure: F,
    on_success: S,
) -> SpyingArbitrary<CallLog<I, Outcome<F::Value, S::Value>>, AsyncSpyFn<I, F::Value, S::Value>>
where
    I: Hash + Send + 'static,
    F: MaybeWeighted,
    S: MaybeWeighted,
    F::Value: Clone + Send + 'static,
    S::Value: Clone + Send + 'static,
{
    let failure = on_failure.into_weighted();
    let success = on_success.into_weighted();
    let outcomes = one_of(vec![
        weighted(
            failure.weight,
            failure.generator.map(Outcome::Failure).boxed(),
        ),
        weighted(
            success.weight,
            success.generator.map(Outcome::Success).boxed(),
        ),
    ]);
    arb_spy_fn_with::<I, _, _>(outcomes, Settle::new)
}
