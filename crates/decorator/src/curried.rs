use crate::decorator::{CallShape, Decorator};
use crate::invoke::{Invoke, Method};
use crate::receiver::Receiver;
use crate::site::MethodSite;
use std::fmt;
use std::rc::Rc;

/// A decorator with its params already captured, see [`Decorator::with_params`].
///
/// A `Curried` can be reused: every [`decorate_method`](Curried::decorate_method) creates a new
/// site with its own cache, and every [`wrap`](Curried::wrap) runs the callback again.
pub struct Curried<Args, Out, P> {
    decorator: Decorator<Args, Out, P>,
    params: Rc<[P]>,
}

impl<Args, Out, P> Curried<Args, Out, P> {
    pub(crate) fn new(decorator: Decorator<Args, Out, P>, params: Vec<P>) -> Self {
        Self { decorator, params: Rc::from(params) }
    }

    pub fn params(&self) -> &[P] {
        &self.params
    }

    /// Same as [`Decorator::wrap`] with the captured params.
    pub fn wrap(&self, f: Invoke<Args, Out>) -> Invoke<Args, Out> {
        self.decorator.wrap_function(f, &self.params, CallShape::CurriedFunction)
    }

    /// Attaches to `method`, the callback receives the captured params.
    pub fn decorate_method<T>(&self, method: Method<Rc<T>, Args, Out>) -> MethodSite<T, Args, Out, P>
    where
        T: Receiver + 'static,
        Args: 'static,
        Out: 'static,
    {
        self.decorator.attach_method(method, Rc::clone(&self.params), CallShape::ParameterizedMethod)
    }
}

impl<Args, Out, P> From<Decorator<Args, Out, P>> for Curried<Args, Out, P> {
    fn from(decorator: Decorator<Args, Out, P>) -> Self {
        Self::new(decorator, Vec::new())
    }
}

impl<Args, Out, P> Clone for Curried<Args, Out, P> {
    fn clone(&self) -> Self {
        Self { decorator: self.decorator.clone(), params: Rc::clone(&self.params) }
    }
}

impl<Args, Out, P: fmt::Debug> fmt::Debug for Curried<Args, Out, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Curried").field("decorator", &self.decorator).field("params", &&*self.params).finish()
    }
}
