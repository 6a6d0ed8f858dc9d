//! Layering several decorators over one function or method.
//!
//! Layers apply in the order they are added: the first one wraps the original, each following one
//! wraps the result. On methods every layer is its own attachment site, so each layer's callback
//! still runs once per receiver.
//!
//! ```
//! use micro_decorator::invoke::{invoke_fn, Invoke};
//! use micro_decorator::stack::DecoratorStack;
//! use micro_decorator::create_decorator;
//!
//! let double = create_decorator(|inv: Invoke<(i32,), i32>, _params: &[i32]| {
//!     Some(Invoke::new(move |args| inv.call(args) * 2))
//! });
//! let plus = create_decorator(|inv: Invoke<(i32,), i32>, params: &[i32]| {
//!     let n: i32 = params.iter().sum();
//!     Some(Invoke::new(move |args| inv.call(args) + n))
//! });
//!
//! let stack = DecoratorStack::<(i32,), i32, i32>::new().layer(double).layer(plus.with_params([1]));
//! let stacked = stack.wrap(invoke_fn(|x: i32| x));
//! assert_eq!(stacked.call((5,)), 11);
//! ```

use crate::curried::Curried;
use crate::invoke::{Invoke, Method};
use crate::receiver::Receiver;
use std::fmt;
use std::rc::Rc;
use tracing::trace;

pub struct DecoratorStack<Args, Out, P> {
    layers: Vec<Curried<Args, Out, P>>,
}

impl<Args, Out, P> DecoratorStack<Args, Out, P> {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Adds an outer layer. A bare [`Decorator`](crate::Decorator) is added without params.
    #[must_use]
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: Into<Curried<Args, Out, P>>,
    {
        self.layers.push(layer.into());
        self
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Wraps `f` with every layer, an empty stack returns `f` itself.
    pub fn wrap(&self, f: Invoke<Args, Out>) -> Invoke<Args, Out> {
        self.layers.iter().fold(f, |inner, layer| layer.wrap(inner))
    }

    /// Attaches every layer to `method`, the innermost first.
    pub fn decorate_method<T>(&self, method: Method<Rc<T>, Args, Out>) -> Method<Rc<T>, Args, Out>
    where
        T: Receiver + 'static,
        Args: 'static,
        Out: 'static,
        P: 'static,
    {
        trace!(layers = self.layers.len(), "stack decorators on method");
        self.layers.iter().fold(method, |inner, layer| layer.decorate_method(inner).into_method())
    }
}

impl<Args, Out, P> Default for DecoratorStack<Args, Out, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args, Out, P> Clone for DecoratorStack<Args, Out, P> {
    fn clone(&self) -> Self {
        Self { layers: self.layers.clone() }
    }
}

impl<Args, Out, P: fmt::Debug> fmt::Debug for DecoratorStack<Args, Out, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoratorStack").field("layers", &self.layers).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::DecoratorStack;
    use crate::create_decorator;
    use crate::invoke::{invoke_fn, method_fn, Invoke};
    use crate::receiver::ReceiverMarker;
    use crate::Decorator;
    use std::cell::Cell;
    use std::rc::Rc;

    fn tag(label: &'static str, built: Rc<Cell<u32>>) -> Decorator<(), String, ()> {
        create_decorator(move |inv: Invoke<(), String>, _params: &[()]| {
            built.set(built.get() + 1);
            Some(Invoke::new(move |args| format!("{label}({})", inv.call(args))))
        })
    }

    #[test]
    fn test_empty_stack_keeps_function() {
        let stack: DecoratorStack<(), String, ()> = DecoratorStack::default();
        let original = invoke_fn(|| "x".to_string());

        assert!(stack.is_empty());
        assert!(Invoke::ptr_eq(&stack.wrap(original.clone()), &original));
    }

    #[test]
    fn test_layers_wrap_in_order() {
        let built = Rc::new(Cell::new(0));
        let stack = DecoratorStack::<(), String, ()>::new().layer(tag("a", Rc::clone(&built))).layer(tag("b", Rc::clone(&built)));
        assert_eq!(stack.len(), 2);

        let wrapped = stack.wrap(invoke_fn(|| "x".to_string()));
        assert_eq!(wrapped.call(()), "b(a(x))");
        assert_eq!(built.get(), 2);
    }

    #[test]
    fn test_method_layers_memoize_per_receiver() {
        let built = Rc::new(Cell::new(0));
        let stack = DecoratorStack::<(), String, ()>::new().layer(tag("a", Rc::clone(&built))).layer(tag("b", Rc::clone(&built)));

        let method = stack.decorate_method(method_fn(|_r: &Rc<ReceiverMarker>, (): ()| "m".to_string()));
        let first = Rc::new(ReceiverMarker::new());
        let second = Rc::new(ReceiverMarker::new());

        for _ in 0..3 {
            assert_eq!(method.call(&first, ()), "b(a(m))");
            assert_eq!(method.call(&second, ()), "b(a(m))");
        }
        assert_eq!(built.get(), 4);
    }

    #[test]
    fn test_params_reach_their_layer() {
        let repeat = create_decorator(|inv: Invoke<(), String>, params: &[usize]| {
            let times = params.iter().product::<usize>();
            Some(Invoke::new(move |args| inv.call(args).repeat(times)))
        });

        let stack = DecoratorStack::new().layer(repeat.with_params([2])).layer(repeat.with_params([3]));
        assert_eq!(stack.wrap(invoke_fn(|| "ab".to_string())).call(()), "ab".repeat(6));
    }
}
