//! Fan-out routing and parallel composition.
//!
//! A fork broadcasts every upstream value to a set of branches, each realized with its
//! own state, and combines their outputs for that tick into one aggregate. The
//! synchronized forms ([`fork`], [`list_fork`], [`map_fork`]) hold the aggregate back
//! until the slowest branch has finished warming up; the fast forms ([`fast_fork`],
//! [`fast_list_fork`]) emit partially filled aggregates from the first tick.

use std::collections::BTreeMap;

use crate::transformer::{Pipeline, Transformer};

/// A set of branch transformers sharing one input stream.
///
/// Implemented for tuples of two to five transformers, for `Vec`s and for `BTreeMap`s
/// of transformers.
pub trait Branches {
    /// Input shared by every branch.
    type Input;
    /// Realized branches.
    type Router: Router<Input = Self::Input>;

    /// Number of branches.
    fn len(&self) -> usize;

    /// Largest lookback among the branches.
    fn lookback(&self) -> usize;

    /// Realizes every branch.
    fn init(&self) -> Self::Router;
}

/// Realized branches that receive every upstream value.
pub trait Router {
    /// Input broadcast to every branch.
    type Input;
    /// Aggregate once every branch has produced a value.
    type Output;
    /// Per-tick slots, `None` where a branch produced nothing.
    type Partial;

    /// Pushes `input` into every branch and collects what each one emitted.
    fn broadcast(&mut self, input: Self::Input) -> Self::Partial;

    /// Converts filled slots into the aggregate, or reports the first empty slot.
    fn settle(&self, partial: Self::Partial) -> Result<Self::Output, usize>;
}

macro_rules! tuple_branches {
    ($($T:ident => $idx:tt),+) => {
        impl<In, $($T),+> Branches for ($($T,)+)
        where
            In: Clone,
            $($T: Transformer<Input = In>,)+
        {
            type Input = In;
            type Router = ($(<$T as Transformer>::Pipeline,)+);

            fn len(&self) -> usize {
                [$(stringify!($T)),+].len()
            }

            fn lookback(&self) -> usize {
                let mut lookback = 0usize;
                $(lookback = lookback.max(self.$idx.lookback());)+
                lookback
            }

            fn init(&self) -> Self::Router {
                ($(self.$idx.init(),)+)
            }
        }

        impl<In, $($T),+> Router for ($($T,)+)
        where
            In: Clone,
            $($T: Pipeline<Input = In>,)+
        {
            type Input = In;
            type Output = ($(<$T as Pipeline>::Output,)+);
            type Partial = ($(Option<<$T as Pipeline>::Output>,)+);

            fn broadcast(&mut self, input: In) -> Self::Partial {
                ($(self.$idx.push(input.clone()),)+)
            }

            fn settle(&self, partial: Self::Partial) -> Result<Self::Output, usize> {
                Ok(($(partial.$idx.ok_or($idx as usize)?,)+))
            }
        }
    };
}

tuple_branches!(A => 0, B => 1);
tuple_branches!(A => 0, B => 1, C => 2);
tuple_branches!(A => 0, B => 1, C => 2, D => 3);
tuple_branches!(A => 0, B => 1, C => 2, D => 3, E => 4);

impl<S> Branches for Vec<S>
where
    S: Transformer,
    S::Input: Clone,
{
    type Input = S::Input;
    type Router = Vec<S::Pipeline>;

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn lookback(&self) -> usize {
        self.iter().map(Transformer::lookback).max().unwrap_or(0)
    }

    fn init(&self) -> Self::Router {
        self.iter().map(Transformer::init).collect()
    }
}

impl<P> Router for Vec<P>
where
    P: Pipeline,
    P::Input: Clone,
{
    type Input = P::Input;
    type Output = Vec<P::Output>;
    type Partial = Vec<Option<P::Output>>;

    fn broadcast(&mut self, input: Self::Input) -> Self::Partial {
        self.iter_mut()
            .map(|branch| branch.push(input.clone()))
            .collect()
    }

    fn settle(&self, partial: Self::Partial) -> Result<Self::Output, usize> {
        partial
            .into_iter()
            .enumerate()
            .map(|(branch, slot)| slot.ok_or(branch))
            .collect()
    }
}

impl<K, S> Branches for BTreeMap<K, S>
where
    K: Ord + Clone,
    S: Transformer,
    S::Input: Clone,
{
    type Input = S::Input;
    type Router = KeyedRouter<K, S::Pipeline>;

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn lookback(&self) -> usize {
        self.values().map(Transformer::lookback).max().unwrap_or(0)
    }

    fn init(&self) -> Self::Router {
        KeyedRouter {
            keys: self.keys().cloned().collect(),
            branches: self.values().map(Transformer::init).collect(),
        }
    }
}

/// Realized branches of a [`map_fork`], aggregated into a map keyed by branch name.
pub struct KeyedRouter<K, P> {
    keys: Vec<K>,
    branches: Vec<P>,
}

impl<K, P> Router for KeyedRouter<K, P>
where
    K: Ord + Clone,
    P: Pipeline,
    P::Input: Clone,
{
    type Input = P::Input;
    type Output = BTreeMap<K, P::Output>;
    type Partial = Vec<Option<P::Output>>;

    fn broadcast(&mut self, input: Self::Input) -> Self::Partial {
        self.branches.broadcast(input)
    }

    fn settle(&self, partial: Self::Partial) -> Result<Self::Output, usize> {
        self.keys
            .iter()
            .cloned()
            .zip(partial)
            .enumerate()
            .map(|(branch, (key, slot))| slot.map(|value| (key, value)).ok_or(branch))
            .collect()
    }
}

/// Counts upstream ticks until a lookback has been absorbed.
#[derive(Debug, Clone)]
struct Gate {
    lookback: usize,
    absorbed: usize,
}

impl Gate {
    fn new(lookback: usize) -> Self {
        Self {
            lookback,
            absorbed: 0,
        }
    }

    /// Records one tick and reports whether the gate is open for it.
    fn advance(&mut self) -> bool {
        if self.absorbed < self.lookback {
            self.absorbed += 1;
            false
        } else {
            true
        }
    }
}

/// Synchronized parallel composition. See [`fork`].
#[derive(Debug, Clone)]
pub struct Fork<B> {
    branches: B,
}

/// Runs every branch of a tuple on the same input and emits a tuple of their outputs.
///
/// The lookback is the largest branch lookback `L`. The first `L` ticks produce
/// nothing; every later tick produces exactly one tuple whose members all come from
/// that tick. Outputs emitted by faster branches during warm-up are discarded.
///
/// # Panics
///
/// Panics if `branches` is an empty collection. A realized fork panics if a branch
/// produces nothing on a tick after warm-up, which means that branch understated
/// its lookback.
pub fn fork<B: Branches>(branches: B) -> Fork<B> {
    assert!(branches.len() > 0, "fork requires at least one branch");
    Fork { branches }
}

/// Synchronized fork over a list of same-typed branches, emitting a `Vec` per tick.
///
/// # Panics
///
/// Panics if `branches` is empty.
pub fn list_fork<S>(branches: Vec<S>) -> Fork<Vec<S>>
where
    Vec<S>: Branches,
{
    assert!(!branches.is_empty(), "list_fork requires at least one branch");
    Fork { branches }
}

/// Synchronized fork over named branches, emitting a `BTreeMap` per tick.
///
/// # Panics
///
/// Panics if `branches` is empty.
pub fn map_fork<K, S, I>(branches: I) -> Fork<BTreeMap<K, S>>
where
    I: IntoIterator<Item = (K, S)>,
    BTreeMap<K, S>: Branches,
    K: Ord,
{
    let branches: BTreeMap<K, S> = branches.into_iter().collect();
    assert!(!branches.is_empty(), "map_fork requires at least one branch");
    Fork { branches }
}

impl<B: Branches> Transformer for Fork<B> {
    type Input = B::Input;
    type Output = <B::Router as Router>::Output;
    type Pipeline = ForkPipeline<B::Router>;

    fn lookback(&self) -> usize {
        self.branches.lookback()
    }

    fn init(&self) -> Self::Pipeline {
        ForkPipeline {
            router: self.branches.init(),
            gate: Gate::new(self.branches.lookback()),
        }
    }
}

/// Realized form of [`Fork`].
pub struct ForkPipeline<R> {
    router: R,
    gate: Gate,
}

impl<R: Router> Pipeline for ForkPipeline<R> {
    type Input = R::Input;
    type Output = R::Output;

    fn push(&mut self, input: Self::Input) -> Option<Self::Output> {
        let partial = self.router.broadcast(input);
        if !self.gate.advance() {
            return None;
        }
        match self.router.settle(partial) {
            Ok(aggregate) => Some(aggregate),
            Err(branch) => panic!(
                "fork branch {branch} emitted nothing after the fork lookback of {} ticks",
                self.gate.lookback
            ),
        }
    }
}

/// Unsynchronized parallel composition. See [`fast_fork`].
#[derive(Debug, Clone)]
pub struct FastFork<B> {
    branches: B,
}

/// Runs every branch of a tuple on the same input and emits a tuple of `Option`s on
/// every tick, `None` where a branch is still warming up. Lookback 0.
///
/// # Panics
///
/// Panics if `branches` is an empty collection.
pub fn fast_fork<B: Branches>(branches: B) -> FastFork<B> {
    assert!(branches.len() > 0, "fast_fork requires at least one branch");
    FastFork { branches }
}

/// Unsynchronized fork over a list of same-typed branches. Lookback 0.
///
/// # Panics
///
/// Panics if `branches` is empty.
pub fn fast_list_fork<S>(branches: Vec<S>) -> FastFork<Vec<S>>
where
    Vec<S>: Branches,
{
    assert!(
        !branches.is_empty(),
        "fast_list_fork requires at least one branch"
    );
    FastFork { branches }
}

impl<B: Branches> Transformer for FastFork<B> {
    type Input = B::Input;
    type Output = <B::Router as Router>::Partial;
    type Pipeline = FastForkPipeline<B::Router>;

    fn lookback(&self) -> usize {
        0
    }

    fn init(&self) -> Self::Pipeline {
        FastForkPipeline {
            router: self.branches.init(),
        }
    }
}

/// Realized form of [`FastFork`].
pub struct FastForkPipeline<R> {
    router: R,
}

impl<R: Router> Pipeline for FastForkPipeline<R> {
    type Input = R::Input;
    type Output = R::Partial;

    fn push(&mut self, input: Self::Input) -> Option<Self::Output> {
        Some(self.router.broadcast(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{identity, lag, map, skip};

    #[test]
    fn waits_for_slowest_branch() {
        let forked = fork((skip::<u32>(2), skip::<u32>(5)));
        assert_eq!(forked.lookback(), 5);
        let mut pipeline = forked.init();
        for tick in 1..=5 {
            assert_eq!(pipeline.push(tick), None, "tick {tick}");
        }
        assert_eq!(pipeline.push(6), Some((6, 6)));
        assert_eq!(pipeline.push(7), Some((7, 7)));
    }

    #[test]
    fn aggregates_come_from_the_same_tick() {
        let forked = fork((identity::<i32>(), lag::<i32>(2), map(|x: i32| x * x)));
        assert_eq!(
            forked.run([1, 2, 3, 4]),
            vec![(3, 1, 9), (4, 2, 16)]
        );
    }

    #[test]
    fn map_fork_keys_outputs() {
        let forked = map_fork([("now", skip::<i32>(0)), ("later", skip(1))]);
        let outputs = forked.run([7, 8]);
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0]["now"], 8);
        assert_eq!(outputs[0]["later"], 8);
    }

    #[test]
    fn fast_fork_exposes_warm_up() {
        let forked = fast_fork((identity::<i32>(), skip(1)));
        assert_eq!(forked.lookback(), 0);
        assert_eq!(
            forked.run([1, 2]),
            vec![(Some(1), None), (Some(2), Some(2))]
        );
    }

    #[test]
    fn fast_list_fork_keeps_branch_order() {
        let forked = fast_list_fork(vec![skip::<i32>(1), skip(0)]);
        assert_eq!(
            forked.run([1, 2]),
            vec![vec![None, Some(1)], vec![Some(2), Some(2)]]
        );
    }

    #[test]
    #[should_panic(expected = "at least one branch")]
    fn list_fork_rejects_empty_branches() {
        list_fork(Vec::<Skip>::new());
    }

    type Skip = crate::Skip<u8>;

    #[test]
    #[should_panic(expected = "fork requires at least one branch")]
    fn fork_rejects_empty_list() {
        fork(Vec::<Skip>::new());
    }

    #[test]
    #[should_panic(expected = "fork requires at least one branch")]
    fn fork_rejects_empty_map() {
        fork(BTreeMap::<&str, Skip>::new());
    }

    #[test]
    #[should_panic(expected = "map_fork requires at least one branch")]
    fn map_fork_rejects_empty_branches() {
        map_fork(Vec::<(&str, Skip)>::new());
    }

    #[test]
    #[should_panic(expected = "fast_fork requires at least one branch")]
    fn fast_fork_rejects_empty_list() {
        fast_fork(Vec::<Skip>::new());
    }

    #[test]
    fn tuple_forks_report_the_failing_branch() {
        let mut router = (skip::<u8>(0).init(), skip::<u8>(1).init());
        let partial = router.broadcast(4);
        assert_eq!(router.settle(partial), Err(1));
        let partial = router.broadcast(5);
        assert_eq!(router.settle(partial), Ok((5, 5)));
        assert_eq!((identity::<u8>(), identity::<u8>(), identity::<u8>()).len(), 3);
    }

    #[test]
    #[should_panic(expected = "emitted nothing")]
    fn understated_lookback_is_a_contract_violation() {
        let forked = fork((identity::<u8>(), EveryOther));
        forked.run([1, 2, 3]);
    }

    /// Emits on every second tick while declaring no warm-up.
    #[derive(Clone)]
    struct EveryOther;

    struct EveryOtherPipeline {
        tick: usize,
    }

    impl Transformer for EveryOther {
        type Input = u8;
        type Output = u8;
        type Pipeline = EveryOtherPipeline;

        fn lookback(&self) -> usize {
            0
        }

        fn init(&self) -> EveryOtherPipeline {
            EveryOtherPipeline { tick: 0 }
        }
    }

    impl Pipeline for EveryOtherPipeline {
        type Input = u8;
        type Output = u8;

        fn push(&mut self, input: u8) -> Option<u8> {
            self.tick += 1;
            (self.tick % 2 == 0).then_some(input)
        }
    }
}
