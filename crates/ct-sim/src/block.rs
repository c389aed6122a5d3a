//! Block factories and the step functions they produce.

use std::fmt;
use std::sync::Arc;

use ct_core::SignalId;

use crate::error::SimResult;

/// Advances a block by one step: `(inputs, t, dt) -> output`.
///
/// The closure owns the block's private state (integrator sums, state
/// vectors, delay lines).
pub type StepFn = Box<dyn FnMut(&Inputs<'_>, f64, f64) -> SimResult<f64> + Send>;

type CreateFn = dyn Fn() -> SimResult<StepFn> + Send + Sync;

/// Read-only view of a block's input signals during one step.
///
/// Values are the ones of the previous step; outputs computed in the current
/// step become visible only after every block has run.
#[derive(Clone, Copy)]
pub struct Inputs<'a> {
    values: &'a [f64],
    ids: &'a [SignalId],
}

impl<'a> Inputs<'a> {
    pub(crate) fn new(values: &'a [f64], ids: &'a [SignalId]) -> Self {
        Self { values, ids }
    }

    /// Value of input `i`.
    ///
    /// The arity check in [`System::initialize`](crate::System::initialize)
    /// guarantees `i < len()` for every index a built-in block reads.
    pub fn get(&self, i: usize) -> f64 {
        self.values[self.ids[i].index()]
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.ids.iter().map(|id| self.values[id.index()])
    }
}

/// Recipe for a block: a display name, the number of inputs, and a
/// constructor for fresh step functions.
///
/// A factory can be reused; every call to the constructor starts with new
/// state.
#[derive(Clone)]
pub struct BlockFactory {
    name: String,
    arity: usize,
    create: Arc<CreateFn>,
}

impl BlockFactory {
    pub fn new<F>(name: impl Into<String>, arity: usize, create: F) -> Self
    where
        F: Fn() -> SimResult<StepFn> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity,
            create: Arc::new(create),
        }
    }

    /// Factory for a stateless block computing its output from the inputs.
    pub fn stateless<F>(name: impl Into<String>, arity: usize, f: F) -> Self
    where
        F: Fn(&Inputs<'_>) -> f64 + Send + Sync + Clone + 'static,
    {
        Self::new(name, arity, move || {
            let f = f.clone();
            Ok(step(move |inputs, _, _| Ok(f(inputs))))
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn create(&self) -> SimResult<StepFn> {
        (self.create)()
    }
}

impl fmt::Debug for BlockFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockFactory")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Box a closure as a [`StepFn`].
pub fn step<F>(f: F) -> StepFn
where
    F: FnMut(&Inputs<'_>, f64, f64) -> SimResult<f64> + Send + 'static,
{
    Box::new(f)
}
