//! Stateful primitive operators.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::rolling::RollingList;
use crate::transformer::{Pipeline, Transformer};

/// Passes every input through unchanged.
pub struct Identity<T> {
    marker: PhantomData<fn(T) -> T>,
}

impl<T> Clone for Identity<T> {
    fn clone(&self) -> Self {
        identity()
    }
}

/// Creates a transformer that emits its input unchanged. Lookback 0.
pub fn identity<T>() -> Identity<T> {
    Identity {
        marker: PhantomData,
    }
}

impl<T> Transformer for Identity<T> {
    type Input = T;
    type Output = T;
    type Pipeline = Identity<T>;

    fn lookback(&self) -> usize {
        0
    }

    fn init(&self) -> Self::Pipeline {
        identity()
    }
}

impl<T> Pipeline for Identity<T> {
    type Input = T;
    type Output = T;

    fn push(&mut self, input: T) -> Option<T> {
        Some(input)
    }
}

/// Applies a function to every input.
pub struct Map<F, I> {
    f: F,
    marker: PhantomData<fn(I)>,
}

impl<F: Clone, I> Clone for Map<F, I> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            marker: PhantomData,
        }
    }
}

/// Creates a per-item transform. Lookback 0.
pub fn map<I, O, F>(f: F) -> Map<F, I>
where
    F: FnMut(I) -> O + Clone,
{
    Map {
        f,
        marker: PhantomData,
    }
}

impl<F, I, O> Transformer for Map<F, I>
where
    F: FnMut(I) -> O + Clone,
{
    type Input = I;
    type Output = O;
    type Pipeline = MapPipeline<F, I>;

    fn lookback(&self) -> usize {
        0
    }

    fn init(&self) -> Self::Pipeline {
        MapPipeline {
            f: self.f.clone(),
            marker: PhantomData,
        }
    }
}

/// Realized form of [`Map`].
pub struct MapPipeline<F, I> {
    f: F,
    marker: PhantomData<fn(I)>,
}

impl<F, I, O> Pipeline for MapPipeline<F, I>
where
    F: FnMut(I) -> O,
{
    type Input = I;
    type Output = O;

    fn push(&mut self, input: I) -> Option<O> {
        Some((self.f)(input))
    }
}

/// Applies a function to every input together with its 0-based tick index.
pub struct MapIndexed<F, I> {
    f: F,
    marker: PhantomData<fn(I)>,
}

impl<F: Clone, I> Clone for MapIndexed<F, I> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            marker: PhantomData,
        }
    }
}

/// Creates a per-item transform that also receives the tick index. Lookback 0.
pub fn map_indexed<I, O, F>(f: F) -> MapIndexed<F, I>
where
    F: FnMut(I, usize) -> O + Clone,
{
    MapIndexed {
        f,
        marker: PhantomData,
    }
}

impl<F, I, O> Transformer for MapIndexed<F, I>
where
    F: FnMut(I, usize) -> O + Clone,
{
    type Input = I;
    type Output = O;
    type Pipeline = MapIndexedPipeline<F, I>;

    fn lookback(&self) -> usize {
        0
    }

    fn init(&self) -> Self::Pipeline {
        MapIndexedPipeline {
            f: self.f.clone(),
            index: 0,
            marker: PhantomData,
        }
    }
}

/// Realized form of [`MapIndexed`].
pub struct MapIndexedPipeline<F, I> {
    f: F,
    index: usize,
    marker: PhantomData<fn(I)>,
}

impl<F, I, O> Pipeline for MapIndexedPipeline<F, I>
where
    F: FnMut(I, usize) -> O,
{
    type Input = I;
    type Output = O;

    fn push(&mut self, input: I) -> Option<O> {
        let output = (self.f)(input, self.index);
        self.index += 1;
        Some(output)
    }
}

/// Folds inputs into an accumulator and emits the accumulator after every input.
pub struct Scan<F, I, S> {
    f: F,
    initial: S,
    marker: PhantomData<fn(I)>,
}

impl<F: Clone, I, S: Clone> Clone for Scan<F, I, S> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            initial: self.initial.clone(),
            marker: PhantomData,
        }
    }
}

/// Creates a running fold. `f(accumulator, input, index)` returns the next accumulator,
/// which is also the output for that tick. Lookback 0.
pub fn scan<I, S, F>(f: F, initial: S) -> Scan<F, I, S>
where
    F: FnMut(&S, I, usize) -> S + Clone,
    S: Clone,
{
    Scan {
        f,
        initial,
        marker: PhantomData,
    }
}

impl<F, I, S> Transformer for Scan<F, I, S>
where
    F: FnMut(&S, I, usize) -> S + Clone,
    S: Clone,
{
    type Input = I;
    type Output = S;
    type Pipeline = ScanPipeline<F, I, S>;

    fn lookback(&self) -> usize {
        0
    }

    fn init(&self) -> Self::Pipeline {
        ScanPipeline {
            f: self.f.clone(),
            state: self.initial.clone(),
            index: 0,
            marker: PhantomData,
        }
    }
}

/// Realized form of [`Scan`].
pub struct ScanPipeline<F, I, S> {
    f: F,
    state: S,
    index: usize,
    marker: PhantomData<fn(I)>,
}

impl<F, I, S> Pipeline for ScanPipeline<F, I, S>
where
    F: FnMut(&S, I, usize) -> S,
    S: Clone,
{
    type Input = I;
    type Output = S;

    fn push(&mut self, input: I) -> Option<S> {
        self.state = (self.f)(&self.state, input, self.index);
        self.index += 1;
        Some(self.state.clone())
    }
}

/// Drops the first `count` inputs.
pub struct Skip<T> {
    count: usize,
    marker: PhantomData<fn(T) -> T>,
}

impl<T> Clone for Skip<T> {
    fn clone(&self) -> Self {
        skip(self.count)
    }
}

/// Creates a transformer suppressing the first `count` inputs. Lookback `count`.
pub fn skip<T>(count: usize) -> Skip<T> {
    Skip {
        count,
        marker: PhantomData,
    }
}

impl<T> Transformer for Skip<T> {
    type Input = T;
    type Output = T;
    type Pipeline = SkipPipeline<T>;

    fn lookback(&self) -> usize {
        self.count
    }

    fn init(&self) -> Self::Pipeline {
        SkipPipeline {
            remaining: self.count,
            marker: PhantomData,
        }
    }
}

/// Realized form of [`Skip`].
pub struct SkipPipeline<T> {
    remaining: usize,
    marker: PhantomData<fn(T) -> T>,
}

impl<T> Pipeline for SkipPipeline<T> {
    type Input = T;
    type Output = T;

    fn push(&mut self, input: T) -> Option<T> {
        if self.remaining > 0 {
            self.remaining -= 1;
            None
        } else {
            Some(input)
        }
    }
}

/// Delays inputs by a fixed number of ticks.
#[derive(Debug, Clone)]
pub struct Lag<T> {
    period: usize,
    default: Option<T>,
}

/// Emits the input from `period` ticks ago; nothing during warm-up. Lookback `period`.
///
/// # Panics
///
/// Panics if `period` is zero.
pub fn lag<T: Clone>(period: usize) -> Lag<T> {
    assert!(period > 0, "lag period must be at least 1");
    Lag {
        period,
        default: None,
    }
}

/// Emits the input from `period` ticks ago, or `default` for the first `period` ticks.
/// Lookback 0.
///
/// # Panics
///
/// Panics if `period` is zero.
pub fn lag_or<T: Clone>(period: usize, default: T) -> Lag<T> {
    assert!(period > 0, "lag period must be at least 1");
    Lag {
        period,
        default: Some(default),
    }
}

impl<T: Clone> Transformer for Lag<T> {
    type Input = T;
    type Output = T;
    type Pipeline = LagPipeline<T>;

    fn lookback(&self) -> usize {
        if self.default.is_some() {
            0
        } else {
            self.period
        }
    }

    fn init(&self) -> Self::Pipeline {
        LagPipeline {
            window: RollingList::new(self.period),
            default: self.default.clone(),
        }
    }
}

/// Realized form of [`Lag`].
#[derive(Debug)]
pub struct LagPipeline<T> {
    window: RollingList<T>,
    default: Option<T>,
}

impl<T: Clone> Pipeline for LagPipeline<T> {
    type Input = T;
    type Output = T;

    fn push(&mut self, input: T) -> Option<T> {
        self.window.push(input).or_else(|| self.default.clone())
    }
}

/// Pairs every input with the input from a fixed number of ticks ago.
#[derive(Debug, Clone)]
pub struct ForkWithLag<T> {
    period: usize,
    default: Option<T>,
}

/// Emits `(current, delayed)` pairs once `period` inputs have been seen.
/// Lookback `period`.
///
/// # Panics
///
/// Panics if `period` is zero.
pub fn fork_with_lag<T: Clone>(period: usize) -> ForkWithLag<T> {
    assert!(period > 0, "fork_with_lag period must be at least 1");
    ForkWithLag {
        period,
        default: None,
    }
}

/// Emits `(current, delayed)` pairs from the first tick, substituting `default` for
/// the delayed value during the first `period` ticks. Lookback 0.
///
/// # Panics
///
/// Panics if `period` is zero.
pub fn fork_with_lag_or<T: Clone>(period: usize, default: T) -> ForkWithLag<T> {
    assert!(period > 0, "fork_with_lag period must be at least 1");
    ForkWithLag {
        period,
        default: Some(default),
    }
}

impl<T: Clone> Transformer for ForkWithLag<T> {
    type Input = T;
    type Output = (T, T);
    type Pipeline = ForkWithLagPipeline<T>;

    fn lookback(&self) -> usize {
        if self.default.is_some() {
            0
        } else {
            self.period
        }
    }

    fn init(&self) -> Self::Pipeline {
        ForkWithLagPipeline {
            window: RollingList::new(self.period),
            default: self.default.clone(),
        }
    }
}

/// Realized form of [`ForkWithLag`].
#[derive(Debug)]
pub struct ForkWithLagPipeline<T> {
    window: RollingList<T>,
    default: Option<T>,
}

impl<T: Clone> Pipeline for ForkWithLagPipeline<T> {
    type Input = T;
    type Output = (T, T);

    fn push(&mut self, input: T) -> Option<(T, T)> {
        let delayed = self
            .window
            .push(input.clone())
            .or_else(|| self.default.clone())?;
        Some((input, delayed))
    }
}

/// Applies a function to every input and the input preceding it.
pub struct MapWithLast<F, T, O> {
    f: F,
    first: Option<O>,
    marker: PhantomData<fn(T)>,
}

impl<F: Clone, T, O: Clone> Clone for MapWithLast<F, T, O> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            first: self.first.clone(),
            marker: PhantomData,
        }
    }
}

/// Emits `f(current, previous)` from the second input onwards. Lookback 1.
pub fn map_with_last<T, O, F>(f: F) -> MapWithLast<F, T, O>
where
    F: FnMut(&T, &T) -> O + Clone,
{
    MapWithLast {
        f,
        first: None,
        marker: PhantomData,
    }
}

/// Emits `first` for the first input and `f(current, previous)` afterwards. Lookback 0.
pub fn map_with_last_or<T, O, F>(f: F, first: O) -> MapWithLast<F, T, O>
where
    F: FnMut(&T, &T) -> O + Clone,
{
    MapWithLast {
        f,
        first: Some(first),
        marker: PhantomData,
    }
}

impl<F, T, O> Transformer for MapWithLast<F, T, O>
where
    F: FnMut(&T, &T) -> O + Clone,
    O: Clone,
{
    type Input = T;
    type Output = O;
    type Pipeline = MapWithLastPipeline<F, T, O>;

    fn lookback(&self) -> usize {
        if self.first.is_some() {
            0
        } else {
            1
        }
    }

    fn init(&self) -> Self::Pipeline {
        MapWithLastPipeline {
            f: self.f.clone(),
            first: self.first.clone(),
            previous: None,
        }
    }
}

/// Realized form of [`MapWithLast`].
pub struct MapWithLastPipeline<F, T, O> {
    f: F,
    first: Option<O>,
    previous: Option<T>,
}

impl<F, T, O> Pipeline for MapWithLastPipeline<F, T, O>
where
    F: FnMut(&T, &T) -> O,
    O: Clone,
{
    type Input = T;
    type Output = O;

    fn push(&mut self, input: T) -> Option<O> {
        let output = match &self.previous {
            Some(previous) => Some((self.f)(&input, previous)),
            None => self.first.clone(),
        };
        self.previous = Some(input);
        output
    }
}

/// Shared snapshot of the most recent inputs emitted by [`mem_all`].
pub type Window<T> = Arc<RollingList<T>>;

/// Exposes the window of recent inputs to downstream operators.
#[derive(Debug)]
pub struct MemAll<T> {
    period: usize,
    full_only: bool,
    marker: PhantomData<fn(T)>,
}

impl<T> Clone for MemAll<T> {
    fn clone(&self) -> Self {
        Self {
            period: self.period,
            full_only: self.full_only,
            marker: PhantomData,
        }
    }
}

/// Emits the window of the last `period` inputs after every push. Lookback 0.
///
/// The storage is only copied when a downstream stage still holds the previous
/// snapshot by the time the next input arrives.
///
/// # Panics
///
/// Panics if `period` is zero.
pub fn mem_all<T: Clone>(period: usize) -> MemAll<T> {
    assert!(period > 0, "mem_all period must be at least 1");
    MemAll {
        period,
        full_only: false,
        marker: PhantomData,
    }
}

/// Like [`mem_all`] but withholds output until the window is full.
/// Lookback `period - 1`.
///
/// # Panics
///
/// Panics if `period` is zero.
pub fn mem_all_full<T: Clone>(period: usize) -> MemAll<T> {
    assert!(period > 0, "mem_all period must be at least 1");
    MemAll {
        period,
        full_only: true,
        marker: PhantomData,
    }
}

impl<T: Clone> Transformer for MemAll<T> {
    type Input = T;
    type Output = Window<T>;
    type Pipeline = MemAllPipeline<T>;

    fn lookback(&self) -> usize {
        if self.full_only {
            self.period - 1
        } else {
            0
        }
    }

    fn init(&self) -> Self::Pipeline {
        MemAllPipeline {
            window: Arc::new(RollingList::new(self.period)),
            full_only: self.full_only,
        }
    }
}

/// Realized form of [`MemAll`].
#[derive(Debug)]
pub struct MemAllPipeline<T> {
    window: Window<T>,
    full_only: bool,
}

impl<T: Clone> Pipeline for MemAllPipeline<T> {
    type Input = T;
    type Output = Window<T>;

    fn push(&mut self, input: T) -> Option<Window<T>> {
        Arc::make_mut(&mut self.window).push(input);
        if self.full_only && !self.window.is_full() {
            return None;
        }
        Some(Arc::clone(&self.window))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_threads_accumulator_and_index() {
        let running = scan(|sum: &i32, value: i32, index| sum + value * index as i32, 0);
        assert_eq!(running.run([5, 5, 5, 5]), vec![0, 5, 15, 30]);
    }

    #[test]
    fn map_indexed_counts_from_zero() {
        let indexed = map_indexed(|value: char, index| (index, value));
        assert_eq!(indexed.run(['a', 'b']), vec![(0, 'a'), (1, 'b')]);
    }

    #[test]
    fn lag_without_default_waits() {
        let lagged = lag(3);
        assert_eq!(lagged.lookback(), 3);
        let mut pipeline = lagged.init();
        let outputs: Vec<_> = [10, 20, 30, 40, 50]
            .into_iter()
            .map(|value| pipeline.push(value))
            .collect();
        assert_eq!(outputs, vec![None, None, None, Some(10), Some(20)]);
    }

    #[test]
    fn lag_with_default_emits_immediately() {
        let lagged = lag_or(3, 0);
        assert_eq!(lagged.lookback(), 0);
        assert_eq!(lagged.run([10, 20, 30, 40, 50]), vec![0, 0, 0, 10, 20]);
    }

    #[test]
    fn lag_of_one_delays_single_tick() {
        assert_eq!(lag(1).run([1, 2, 3]), vec![1, 2]);
    }

    #[test]
    #[should_panic(expected = "at least 1")]
    fn lag_rejects_zero_period() {
        lag::<u8>(0);
    }

    #[test]
    fn fork_with_lag_pairs_current_and_delayed() {
        assert_eq!(fork_with_lag(2).run([1, 2, 3, 4]), vec![(3, 1), (4, 2)]);
        assert_eq!(
            fork_with_lag_or(2, 0).run([1, 2, 3]),
            vec![(1, 0), (2, 0), (3, 1)]
        );
    }

    #[test]
    fn map_with_last_respects_first_result() {
        let diff = map_with_last(|current: &i32, previous: &i32| current - previous);
        assert_eq!(diff.lookback(), 1);
        assert_eq!(diff.run([1, 4, 9]), vec![3, 5]);

        let seeded = map_with_last_or(|current: &i32, previous: &i32| current - previous, 0);
        assert_eq!(seeded.lookback(), 0);
        assert_eq!(seeded.run([1, 4, 9]), vec![0, 3, 5]);
    }

    #[test]
    fn mem_all_full_waits_for_window() {
        let memory = mem_all_full(3);
        assert_eq!(memory.lookback(), 2);
        let sums: Vec<i32> = memory
            .run([1, 2, 3, 4])
            .iter()
            .map(|window| window.iter().sum())
            .collect();
        assert_eq!(sums, vec![6, 9]);
    }

    #[test]
    fn mem_all_snapshots_are_stable() {
        let mut pipeline = mem_all(2).init();
        let first = pipeline.push(1).unwrap();
        let second = pipeline.push(2).unwrap();
        let third = pipeline.push(3).unwrap();
        assert_eq!(*first.get(0), 1);
        assert_eq!(first.len(), 1);
        assert_eq!(*second.get(0), 2);
        assert_eq!(*third.get(0), 3);
        assert_eq!(*third.get(1), 2);
    }

    #[test]
    fn skip_passes_remaining_values() {
        assert_eq!(skip(2).run(["a", "b", "c"]), vec!["c"]);
    }
}
