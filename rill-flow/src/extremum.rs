//! Sliding-window extremum tracking.
//!
//! A tracker keeps the dominant item of the last `period` inputs together with its
//! absolute index. While the candidate stays inside the window each tick costs one
//! comparison; once it expires the whole window is rescanned from the oldest item.
//! Monotonic inputs whose extremum keeps sitting at the oldest slot therefore rescan
//! on every tick.

use std::marker::PhantomData;

use tracing::trace;

use crate::rolling::RollingList;
use crate::transformer::{Pipeline, Transformer};

/// Realized tracker shared by `MatchItem` and `MatchDistance`.
#[derive(Debug)]
pub(crate) struct ExtremumTracker<T, M> {
    window: RollingList<T>,
    matcher: M,
    candidate: Option<usize>,
}

impl<T, M> ExtremumTracker<T, M>
where
    T: Clone,
    M: FnMut(&T, &T) -> bool,
{
    fn new(period: usize, matcher: M) -> Self {
        Self {
            window: RollingList::new(period),
            matcher,
            candidate: None,
        }
    }

    /// Pushes `input` and returns the absolute index of the dominant item once the
    /// window is full.
    fn push(&mut self, input: T) -> Option<usize> {
        self.window.push(input);
        if !self.window.is_full() {
            return None;
        }
        let index = self.window.len() - 1;
        let trail = self.window.window_start();
        let best = match self.candidate {
            Some(candidate) if candidate >= trail => {
                let current = self.window.get_absolute(candidate);
                let latest = self.window.get_absolute(index);
                if (self.matcher)(current, latest) {
                    index
                } else {
                    candidate
                }
            }
            expired => {
                trace!(
                    period = self.window.capacity(),
                    index,
                    expired = ?expired,
                    "rescanning extremum window"
                );
                self.rescan(trail, index)
            }
        };
        self.candidate = Some(best);
        Some(best)
    }

    fn rescan(&mut self, trail: usize, index: usize) -> usize {
        let mut best = trail;
        for position in trail + 1..=index {
            let current = self.window.get_absolute(best);
            let item = self.window.get_absolute(position);
            if (self.matcher)(current, item) {
                best = position;
            }
        }
        best
    }

    fn value(&self, index: usize) -> T {
        self.window.get_absolute(index).clone()
    }
}

/// Emits the dominant item of a sliding window. See [`match_item`].
pub struct MatchItem<T, M> {
    period: usize,
    matcher: M,
    marker: PhantomData<fn(T) -> T>,
}

impl<T, M: Clone> Clone for MatchItem<T, M> {
    fn clone(&self) -> Self {
        Self {
            period: self.period,
            matcher: self.matcher.clone(),
            marker: PhantomData,
        }
    }
}

/// Emits, per tick, the dominant item among the last `period` inputs.
/// Lookback `period - 1`.
///
/// `matcher(current, next)` returns `true` when `next` should replace the current
/// candidate. Use a non-strict comparison (`>=` for a maximum) so that ties go to
/// the most recent item.
///
/// # Panics
///
/// Panics if `period` is zero.
pub fn match_item<T, M>(period: usize, matcher: M) -> MatchItem<T, M>
where
    T: Clone,
    M: FnMut(&T, &T) -> bool + Clone,
{
    assert!(period > 0, "match_item period must be at least 1");
    MatchItem {
        period,
        matcher,
        marker: PhantomData,
    }
}

impl<T, M> Transformer for MatchItem<T, M>
where
    T: Clone,
    M: FnMut(&T, &T) -> bool + Clone,
{
    type Input = T;
    type Output = T;
    type Pipeline = MatchItemPipeline<T, M>;

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn init(&self) -> Self::Pipeline {
        MatchItemPipeline {
            tracker: ExtremumTracker::new(self.period, self.matcher.clone()),
        }
    }
}

/// Realized form of [`MatchItem`].
#[derive(Debug)]
pub struct MatchItemPipeline<T, M> {
    tracker: ExtremumTracker<T, M>,
}

impl<T, M> Pipeline for MatchItemPipeline<T, M>
where
    T: Clone,
    M: FnMut(&T, &T) -> bool,
{
    type Input = T;
    type Output = T;

    fn push(&mut self, input: T) -> Option<T> {
        let best = self.tracker.push(input)?;
        Some(self.tracker.value(best))
    }
}

/// Emits how many ticks ago the dominant item arrived. See [`match_distance`].
pub struct MatchDistance<T, M> {
    period: usize,
    matcher: M,
    marker: PhantomData<fn(T)>,
}

impl<T, M: Clone> Clone for MatchDistance<T, M> {
    fn clone(&self) -> Self {
        Self {
            period: self.period,
            matcher: self.matcher.clone(),
            marker: PhantomData,
        }
    }
}

/// Emits, per tick, the distance between the current tick and the dominant item among
/// the last `period` inputs: `0` when the newest item dominates, at most `period - 1`.
/// Lookback `period - 1`.
///
/// # Panics
///
/// Panics if `period` is zero.
pub fn match_distance<T, M>(period: usize, matcher: M) -> MatchDistance<T, M>
where
    T: Clone,
    M: FnMut(&T, &T) -> bool + Clone,
{
    assert!(period > 0, "match_distance period must be at least 1");
    MatchDistance {
        period,
        matcher,
        marker: PhantomData,
    }
}

impl<T, M> Transformer for MatchDistance<T, M>
where
    T: Clone,
    M: FnMut(&T, &T) -> bool + Clone,
{
    type Input = T;
    type Output = usize;
    type Pipeline = MatchDistancePipeline<T, M>;

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn init(&self) -> Self::Pipeline {
        MatchDistancePipeline {
            tracker: ExtremumTracker::new(self.period, self.matcher.clone()),
        }
    }
}

/// Realized form of [`MatchDistance`].
#[derive(Debug)]
pub struct MatchDistancePipeline<T, M> {
    tracker: ExtremumTracker<T, M>,
}

impl<T, M> Pipeline for MatchDistancePipeline<T, M>
where
    T: Clone,
    M: FnMut(&T, &T) -> bool,
{
    type Input = T;
    type Output = usize;

    fn push(&mut self, input: T) -> Option<usize> {
        let best = self.tracker.push(input)?;
        Some(self.tracker.window.len() - 1 - best)
    }
}
