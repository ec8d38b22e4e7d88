//! Type-erased transformers for heterogeneous collections.

use std::fmt;

use crate::transformer::{Pipeline, Transformer};

/// A realized pipeline behind a trait object.
pub type BoxPipeline<I, O> = Box<dyn Pipeline<Input = I, Output = O>>;

trait ErasedTransformer<I, O> {
    fn lookback(&self) -> usize;
    fn init_boxed(&self) -> BoxPipeline<I, O>;
    fn clone_boxed(&self) -> Box<dyn ErasedTransformer<I, O>>;
}

impl<T> ErasedTransformer<T::Input, T::Output> for T
where
    T: Transformer + Clone + 'static,
    T::Pipeline: 'static,
{
    fn lookback(&self) -> usize {
        Transformer::lookback(self)
    }

    fn init_boxed(&self) -> BoxPipeline<T::Input, T::Output> {
        Box::new(self.init())
    }

    fn clone_boxed(&self) -> Box<dyn ErasedTransformer<T::Input, T::Output>> {
        Box::new(self.clone())
    }
}

/// A transformer whose concrete type has been erased.
///
/// Composition stays generic by default; boxing is for branches of different concrete
/// types feeding one [`list_fork`](crate::list_fork) or for transformers assembled from
/// configuration at runtime.
pub struct BoxTransformer<I, O> {
    inner: Box<dyn ErasedTransformer<I, O>>,
}

impl<I, O> BoxTransformer<I, O> {
    /// Boxes a concrete transformer.
    pub fn new<T>(transformer: T) -> Self
    where
        T: Transformer<Input = I, Output = O> + Clone + 'static,
        T::Pipeline: 'static,
    {
        Self {
            inner: Box::new(transformer),
        }
    }
}

impl<I, O> Clone for BoxTransformer<I, O> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone_boxed(),
        }
    }
}

impl<I, O> fmt::Debug for BoxTransformer<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxTransformer")
            .field("lookback", &self.inner.lookback())
            .finish_non_exhaustive()
    }
}

impl<I, O> Transformer for BoxTransformer<I, O> {
    type Input = I;
    type Output = O;
    type Pipeline = BoxPipeline<I, O>;

    fn lookback(&self) -> usize {
        self.inner.lookback()
    }

    fn init(&self) -> Self::Pipeline {
        self.inner.init_boxed()
    }
}
