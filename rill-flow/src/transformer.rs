//! The transformer abstraction and sequential composition.

use crate::boxed::BoxTransformer;

/// A realized pipeline instance that owns all of its mutable state.
///
/// Every push produces at most one output. `None` means the pipeline absorbed the
/// input without emitting anything (warm-up, or a value withheld by composition).
pub trait Pipeline {
    /// Type of values accepted by [`Pipeline::push`].
    type Input;
    /// Type of values emitted by [`Pipeline::push`].
    type Output;

    /// Feeds one input and runs the pipeline to completion for that input.
    fn push(&mut self, input: Self::Input) -> Option<Self::Output>;
}

impl<P> Pipeline for Box<P>
where
    P: Pipeline + ?Sized,
{
    type Input = P::Input;
    type Output = P::Output;

    fn push(&mut self, input: Self::Input) -> Option<Self::Output> {
        (**self).push(input)
    }
}

/// A composable, lookback-annotated factory of [`Pipeline`] instances.
///
/// Transformers are immutable descriptions. All state is created by [`Transformer::init`],
/// so every realization starts from scratch and never shares state with another one.
pub trait Transformer {
    /// Type of values consumed by realized pipelines.
    type Input;
    /// Type of values produced by realized pipelines.
    type Output;
    /// Concrete pipeline produced by [`Transformer::init`].
    type Pipeline: Pipeline<Input = Self::Input, Output = Self::Output>;

    /// Number of leading inputs absorbed before the first output is produced.
    fn lookback(&self) -> usize;

    /// Realizes a fresh pipeline instance.
    fn init(&self) -> Self::Pipeline;

    /// Chains `next` after `self`, feeding every output of `self` into `next`.
    fn pipe<B>(self, next: B) -> Pipe<Self, B>
    where
        Self: Sized,
        B: Transformer<Input = Self::Output>,
    {
        Pipe::new(self, next)
    }

    /// Erases the concrete type so heterogeneous transformers can share a collection.
    fn boxed(self) -> BoxTransformer<Self::Input, Self::Output>
    where
        Self: Sized + Clone + 'static,
        Self::Pipeline: 'static,
    {
        BoxTransformer::new(self)
    }

    /// Realizes a fresh pipeline, feeds it every input and collects the outputs in order.
    fn run<I>(&self, inputs: I) -> Vec<Self::Output>
    where
        I: IntoIterator<Item = Self::Input>,
    {
        let mut pipeline = self.init();
        inputs
            .into_iter()
            .filter_map(|input| pipeline.push(input))
            .collect()
    }
}

/// Sequential composition of two transformers.
#[derive(Debug, Clone)]
pub struct Pipe<First, Second> {
    first: First,
    second: Second,
}

impl<First, Second> Pipe<First, Second> {
    /// Creates a new piped transformer.
    pub fn new(first: First, second: Second) -> Self {
        Self { first, second }
    }
}

impl<First, Second> Transformer for Pipe<First, Second>
where
    First: Transformer,
    Second: Transformer<Input = First::Output>,
{
    type Input = First::Input;
    type Output = Second::Output;
    type Pipeline = Piped<First::Pipeline, Second::Pipeline>;

    fn lookback(&self) -> usize {
        self.first.lookback() + self.second.lookback()
    }

    fn init(&self) -> Self::Pipeline {
        Piped {
            first: self.first.init(),
            second: self.second.init(),
        }
    }
}

/// Realized form of [`Pipe`].
#[derive(Debug)]
pub struct Piped<First, Second> {
    first: First,
    second: Second,
}

impl<First, Second> Pipeline for Piped<First, Second>
where
    First: Pipeline,
    Second: Pipeline<Input = First::Output>,
{
    type Input = First::Input;
    type Output = Second::Output;

    fn push(&mut self, input: Self::Input) -> Option<Self::Output> {
        let intermediate = self.first.push(input)?;
        self.second.push(intermediate)
    }
}

/// Chains `first` and `second`. Equivalent to `first.pipe(second)`.
pub fn pipe<First, Second>(first: First, second: Second) -> Pipe<First, Second>
where
    First: Transformer,
    Second: Transformer<Input = First::Output>,
{
    Pipe::new(first, second)
}

/// Chains any number of transformers left to right.
///
/// `pipe!(a, b, c)` expands to `a.pipe(b).pipe(c)`; the lookback of the result is the
/// sum of every stage's lookback.
#[macro_export]
macro_rules! pipe {
    ($first:expr $(, $rest:expr)* $(,)?) => {{
        let piped = $first;
        $(let piped = $crate::Transformer::pipe(piped, $rest);)*
        piped
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{map, skip};

    #[test]
    fn lookback_adds_across_stages() {
        let chained = pipe(skip::<i32>(2), skip(3));
        assert_eq!(chained.lookback(), 5);
        let outputs = chained.run(1..=8);
        assert_eq!(outputs, vec![6, 7, 8]);
    }

    #[test]
    fn macro_chains_left_to_right() {
        let chained = crate::pipe!(
            map(|x: i32| x + 1),
            skip(1),
            map(|x: i32| x * 10),
        );
        assert_eq!(chained.lookback(), 1);
        assert_eq!(chained.run([1, 2, 3]), vec![30, 40]);
    }

    #[test]
    fn matches_manual_feeding() {
        let first = skip::<i32>(1).pipe(map(|x: i32| x * 2));
        let second = map(|x: i32| x - 1);
        let staged = second.run(first.run(0..6));
        let composed = first.pipe(second).run(0..6);
        assert_eq!(staged, composed);
    }
}
