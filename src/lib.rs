//! Curry functions by arity.
//!
//! A curried function collects its arguments over any number of calls, each
//! supplying a batch of zero or more, and runs once it has as many as it
//! declares.
//!
//! ```
//! use arity_curry::curry_with;
//!
//! fn add(x: i32, y: i32, z: i32) -> i32 {
//!     x + y + z
//! }
//!
//! let add_four_to = curry_with(add, [4])?.partial().unwrap();
//! assert_eq!(add_four_to.call([5, 5])?.complete(), Some(14));
//! assert_eq!(add_four_to.call([4])?.call([2])?.complete(), Some(10));
//! # Ok::<(), arity_curry::CurryError>(())
//! ```
//!
//! The [`curried`] attribute does the wrapping at the definition site:
//!
//! ```
//! #[arity_curry::curried]
//! fn add(x: i32, y: i32, z: i32) -> i32 {
//!     x + y + z
//! }
//!
//! let add_three_to = add().call([3])?;
//! assert_eq!(add_three_to.call([10])?.call([10])?.complete(), Some(23));
//! # Ok::<(), arity_curry::CurryError>(())
//! ```

mod curry;
mod error;
mod function;

pub use arity_curry_macros::curried;

pub use crate::curry::{curry, curry_with, Curried, Excess, Step};
pub use crate::error::{CurryError, Result};
pub use crate::function::{FixedArity, Function, IntoFunction, Variadic, WithArity};
