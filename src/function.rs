//! How a callable declares its arity.
//!
//! Closures and `fn` items taking up to eight arguments of one type report
//! their arity from their own type. Functions over a whole argument vector
//! have no arity of their own: wrap them in [`WithArity`] to state it, or in
//! [`Variadic`] to mark it as unknown.

use std::fmt;
use std::rc::Rc;

/// Shared entry point of a curried function, called with exactly `arity`
/// arguments.
pub(crate) type Body<'f, A, R> = Rc<dyn Fn(Vec<A>) -> R + 'f>;

/// A callable together with its declared arity, `None` when the arity is not
/// fixed.
pub struct Function<'f, A, R> {
    pub(crate) arity: Option<usize>,
    pub(crate) body: Body<'f, A, R>,
}

impl<'f, A, R> Function<'f, A, R> {
    fn new(arity: Option<usize>, body: impl Fn(Vec<A>) -> R + 'f) -> Self {
        Self {
            arity,
            body: Rc::new(body),
        }
    }

    pub fn arity(&self) -> Option<usize> {
        self.arity
    }
}

impl<A, R> fmt::Debug for Function<'_, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

mod sealed {
    pub trait Sealed<A, Marker> {}
}

/// Conversion of a callable into a [`Function`].
///
/// `Marker` only tells the blanket implementations for different closure
/// arities apart; callers never name it. Sealed: the implementations here are
/// the only ones.
pub trait IntoFunction<'f, A, R, Marker>: sealed::Sealed<A, Marker> {
    fn into_function(self) -> Function<'f, A, R>;
}

/// Callables whose arity is known from their type. Sealed, like
/// [`IntoFunction`].
pub trait FixedArity<'f, A, R, Marker>: IntoFunction<'f, A, R, Marker> {
    const ARITY: usize;
}

/// A function over the whole argument vector, with its arity stated
/// explicitly.
///
/// ```
/// use arity_curry::{curry, WithArity};
///
/// let sum = curry(WithArity(4, |args: Vec<u32>| args.iter().sum::<u32>())).unwrap();
/// assert_eq!(sum.apply([vec![1, 2], vec![3, 4]]).unwrap().complete(), Some(10));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct WithArity<F>(pub usize, pub F);

/// A function over the whole argument vector that accepts any number of
/// arguments. It cannot be curried: there is no point at which to call it.
#[derive(Clone, Copy, Debug)]
pub struct Variadic<F>(pub F);

#[doc(hidden)]
#[derive(Debug)]
pub enum Explicit {}

#[doc(hidden)]
#[derive(Debug)]
pub enum Unknown {}

impl<A, F> sealed::Sealed<A, Explicit> for WithArity<F> {}

impl<A, F> sealed::Sealed<A, Unknown> for Variadic<F> {}

impl<'f, A, R, F> IntoFunction<'f, A, R, Explicit> for WithArity<F>
where
    F: Fn(Vec<A>) -> R + 'f,
{
    fn into_function(self) -> Function<'f, A, R> {
        let WithArity(arity, function) = self;
        Function::new(Some(arity), function)
    }
}

impl<'f, A, R, F> IntoFunction<'f, A, R, Unknown> for Variadic<F>
where
    F: Fn(Vec<A>) -> R + 'f,
{
    fn into_function(self) -> Function<'f, A, R> {
        Function::new(None, self.0)
    }
}

macro_rules! impl_fixed_arity {
    (@arg $arg:ident) => { A };
    ($arity:literal => $($arg:ident)*) => {
        impl<A, R, F> sealed::Sealed<A, fn($(impl_fixed_arity!(@arg $arg)),*) -> R> for F
        where
            F: Fn($(impl_fixed_arity!(@arg $arg)),*) -> R,
        {
        }

        impl<'f, A, R, F> IntoFunction<'f, A, R, fn($(impl_fixed_arity!(@arg $arg)),*) -> R> for F
        where
            F: Fn($(impl_fixed_arity!(@arg $arg)),*) -> R + 'f,
        {
            fn into_function(self) -> Function<'f, A, R> {
                Function::new(Some($arity), move |args: Vec<A>| {
                    match <[A; $arity]>::try_from(args) {
                        Ok([$($arg),*]) => (self)($($arg),*),
                        Err(args) => unreachable!(
                            "{} argument(s) collected for a function of arity {}",
                            args.len(),
                            $arity
                        ),
                    }
                })
            }
        }

        impl<'f, A, R, F> FixedArity<'f, A, R, fn($(impl_fixed_arity!(@arg $arg)),*) -> R> for F
        where
            F: Fn($(impl_fixed_arity!(@arg $arg)),*) -> R + 'f,
        {
            const ARITY: usize = $arity;
        }
    };
}

impl_fixed_arity!(0 =>);
impl_fixed_arity!(1 => a);
impl_fixed_arity!(2 => a b);
impl_fixed_arity!(3 => a b c);
impl_fixed_arity!(4 => a b c d);
impl_fixed_arity!(5 => a b c d e);
impl_fixed_arity!(6 => a b c d e f);
impl_fixed_arity!(7 => a b c d e f g);
impl_fixed_arity!(8 => a b c d e f g h);
