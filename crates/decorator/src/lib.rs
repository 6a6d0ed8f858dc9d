//! A single wrapping primitive that can be attached to functions and methods alike
//!
//! A library author writes the wrapping logic once, as a [`WrapCallback`], and turns it into a
//! [`Decorator`] with [`create_decorator`]. Consumers then pick whichever shape suits them:
//!
//! - attach it to a method, with or without params, and get a [`MethodSite`] that replaces the
//!   method and builds one wrapper per receiver
//! - wrap a plain function directly, `decorator.wrap(f, params)`
//! - capture params first and wrap later, `decorator.with_params(params).wrap(f)`
//! - layer several decorators with a [`stack::DecoratorStack`]
//!
//! Single-threaded by design: decorators, sites and invocations are `!Send`.
//!
//! # Example
//!
//! ```
//! use micro_decorator::invoke::{invoke_fn, method_fn, Invoke};
//! use micro_decorator::receiver::{Receiver, ReceiverMarker};
//! use micro_decorator::create_decorator;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! // counts the calls made on each receiver
//! let counted = create_decorator(|inv: Invoke<(i32,), i32>, params: &[i32]| {
//!     let limit = params.first().copied().unwrap_or(i32::MAX);
//!     let calls = Cell::new(0);
//!     Some(Invoke::new(move |args| {
//!         calls.set(calls.get() + 1);
//!         if calls.get() > limit { -1 } else { inv.call(args) }
//!     }))
//! });
//!
//! struct Doubler {
//!     marker: ReceiverMarker,
//! }
//!
//! impl Receiver for Doubler {
//!     fn marker(&self) -> &ReceiverMarker {
//!         &self.marker
//!     }
//! }
//!
//! let double = counted.with_params([2]).decorate_method(method_fn(|_d: &Rc<Doubler>, (x,): (i32,)| x * 2));
//!
//! let doubler = Rc::new(Doubler { marker: ReceiverMarker::new() });
//! assert_eq!(double.call(&doubler, (1,)), 2);
//! assert_eq!(double.call(&doubler, (2,)), 4);
//! assert_eq!(double.call(&doubler, (3,)), -1);
//!
//! // functions are wrapped without memoization
//! let add = counted.wrap(invoke_fn(|x: i32| x + 1), []);
//! assert_eq!(add.call((1,)), 2);
//! ```

mod cache;
mod callback;
mod curried;
mod decorator;
mod error;
mod site;

pub mod invoke;
pub mod receiver;
pub mod stack;

pub use cache::MemoCache;
pub use callback::WrapCallback;
pub use curried::Curried;
pub use decorator::create_decorator;
pub use decorator::Attachment;
pub use decorator::CallShape;
pub use decorator::Decorated;
pub use decorator::Decorator;
pub use decorator::DecoratorBuilder;
pub use error::DecoratorBuildError;
pub use site::MethodSite;
