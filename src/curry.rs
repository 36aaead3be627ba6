use std::fmt;
use std::rc::Rc;

use itertools::Itertools;
use tracing::{debug, trace};

use crate::error::{CurryError, Result};
use crate::function::{Body, FixedArity, IntoFunction};

/// What to do with arguments beyond a function's arity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Excess {
    /// Reject the call with [`CurryError::ArityMismatch`].
    #[default]
    Fail,
    /// Drop the surplus and call the function with the first arguments.
    Truncate,
}

/// A function waiting for the rest of its arguments.
///
/// Calling it never changes it: every call that does not complete the
/// function yields a fresh `Curried` holding the combined arguments, so a
/// partial application can be reused for any number of branches.
pub struct Curried<'f, A, R> {
    body: Body<'f, A, R>,
    arity: usize,
    supplied: Rc<[A]>,
    excess: Excess,
}

/// Outcome of calling a [`Curried`].
pub enum Step<'f, A, R> {
    /// Fewer arguments than the arity have been collected.
    Partial(Curried<'f, A, R>),
    /// The function ran. `arity` and `excess` are those of the entity that
    /// produced `value`, for judging any further arguments.
    Complete {
        value: R,
        arity: usize,
        excess: Excess,
    },
}

/// Wraps `function` with no arguments supplied yet.
///
/// Fails with [`CurryError::UnsupportedArity`] when the function has no fixed
/// arity.
pub fn curry<'f, A, R, M>(function: impl IntoFunction<'f, A, R, M>) -> Result<Curried<'f, A, R>> {
    let function = function.into_function();
    let Some(arity) = function.arity else {
        debug!("refusing to curry a function without a fixed arity");
        return Err(CurryError::UnsupportedArity);
    };
    trace!(arity, "currying function");
    Ok(Curried::from_body(function.body, arity))
}

/// Wraps `function` with `initial` arguments already supplied.
///
/// When `initial` covers the whole arity the function runs immediately.
pub fn curry_with<'f, A, R, M, I>(
    function: impl IntoFunction<'f, A, R, M>,
    initial: I,
) -> Result<Step<'f, A, R>>
where
    A: Clone,
    I: IntoIterator<Item = A>,
{
    curry(function)?.call(initial)
}

impl<'f, A, R> Curried<'f, A, R> {
    fn from_body(body: Body<'f, A, R>, arity: usize) -> Self {
        Self {
            body,
            arity,
            supplied: Vec::new().into(),
            excess: Excess::default(),
        }
    }

    /// Wraps a function whose arity is known from its type. Never fails.
    pub fn fixed<M, F: FixedArity<'f, A, R, M>>(function: F) -> Self {
        Self::from_body(function.into_function().body, F::ARITY)
    }

    pub fn with_excess(mut self, excess: Excess) -> Self {
        self.excess = excess;
        self
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Arguments collected so far, in order.
    pub fn supplied(&self) -> &[A] {
        &self.supplied
    }

    pub fn remaining(&self) -> usize {
        self.arity - self.supplied.len()
    }

    pub fn excess(&self) -> Excess {
        self.excess
    }
}

impl<'f, A: Clone, R> Curried<'f, A, R> {
    /// Supplies a batch of arguments.
    ///
    /// Completes the function once the arity is reached; otherwise returns a
    /// new partial application and leaves `self` as it was.
    pub fn call<I: IntoIterator<Item = A>>(&self, batch: I) -> Result<Step<'f, A, R>> {
        let mut combined = self.supplied.iter().cloned().chain(batch).collect_vec();
        let supplied = combined.len();
        if supplied > self.arity {
            match self.excess {
                Excess::Fail => {
                    debug!(arity = self.arity, supplied, "too many arguments");
                    return Err(CurryError::ArityMismatch {
                        arity: self.arity,
                        supplied,
                    });
                }
                Excess::Truncate => {
                    debug!(arity = self.arity, supplied, "dropping surplus arguments");
                    combined.truncate(self.arity);
                }
            }
        }

        if combined.len() == self.arity {
            trace!(arity = self.arity, "invoking curried function");
            return Ok(Step::Complete {
                value: (self.body)(combined),
                arity: self.arity,
                excess: self.excess,
            });
        }

        trace!(arity = self.arity, supplied, "partial application");
        Ok(Step::Partial(Self {
            body: Rc::clone(&self.body),
            arity: self.arity,
            supplied: combined.into(),
            excess: self.excess,
        }))
    }

    /// Supplies several batches in order, as chained [`Step::call`]s would.
    /// With no batches at all the result is `self`, still partial.
    pub fn apply<B, I>(&self, batches: B) -> Result<Step<'f, A, R>>
    where
        B: IntoIterator<Item = I>,
        I: IntoIterator<Item = A>,
    {
        batches
            .into_iter()
            .try_fold(Step::Partial(self.clone()), |step, batch| step.call(batch))
    }
}

impl<A, R> Clone for Curried<'_, A, R> {
    fn clone(&self) -> Self {
        Self {
            body: Rc::clone(&self.body),
            arity: self.arity,
            supplied: Rc::clone(&self.supplied),
            excess: self.excess,
        }
    }
}

impl<A, R> fmt::Debug for Curried<'_, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Curried")
            .field("arity", &self.arity)
            .field("supplied", &self.supplied.len())
            .field("excess", &self.excess)
            .finish_non_exhaustive()
    }
}

impl<'f, A: Clone, R> Step<'f, A, R> {
    /// Continues a chain of calls.
    ///
    /// On a completed step every further argument is surplus: an empty batch
    /// keeps the value, a non-empty one follows the excess policy.
    pub fn call<I: IntoIterator<Item = A>>(self, batch: I) -> Result<Self> {
        match self {
            Step::Partial(curried) => curried.call(batch),
            Step::Complete {
                value,
                arity,
                excess,
            } => {
                let surplus = batch.into_iter().count();
                if surplus > 0 && excess == Excess::Fail {
                    debug!(arity, surplus, "arguments supplied after completion");
                    return Err(CurryError::ArityMismatch {
                        arity,
                        supplied: arity + surplus,
                    });
                }
                Ok(Step::Complete {
                    value,
                    arity,
                    excess,
                })
            }
        }
    }
}

impl<'f, A, R> Step<'f, A, R> {
    pub fn is_complete(&self) -> bool {
        matches!(self, Step::Complete { .. })
    }

    pub fn complete(self) -> Option<R> {
        match self {
            Step::Complete { value, .. } => Some(value),
            Step::Partial(_) => None,
        }
    }

    pub fn partial(self) -> Option<Curried<'f, A, R>> {
        match self {
            Step::Partial(curried) => Some(curried),
            Step::Complete { .. } => None,
        }
    }

    /// The value if the function ran, otherwise the partial application.
    pub fn into_result(self) -> std::result::Result<R, Curried<'f, A, R>> {
        match self {
            Step::Complete { value, .. } => Ok(value),
            Step::Partial(curried) => Err(curried),
        }
    }
}

impl<A, R: fmt::Debug> fmt::Debug for Step<'_, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Partial(curried) => f.debug_tuple("Partial").field(curried).finish(),
            Step::Complete { value, .. } => f.debug_tuple("Complete").field(value).finish(),
        }
    }
}
