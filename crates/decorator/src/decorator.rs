//! The decorator factory and its dispatcher.
//!
//! A [`Decorator`] is created once from a [`WrapCallback`] and can then be attached in any of the
//! supported calling shapes:
//!
//! | shape | call |
//! |---|---|
//! | bare method | [`Decorator::decorate_method`] |
//! | parameterized method | [`Decorator::with_params`] then [`Curried::decorate_method`] |
//! | direct function | [`Decorator::wrap`] |
//! | curried function | [`Decorator::with_params`] then [`Curried::wrap`] |
//!
//! [`Decorator::apply`] accepts the same shapes as an explicit [`Attachment`].

use crate::callback::WrapCallback;
use crate::curried::Curried;
use crate::error::DecoratorBuildError;
use crate::invoke::{Invoke, Method};
use crate::receiver::Receiver;
use crate::site::MethodSite;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace};

const DEFAULT_NAME: &str = "decorator";

/// Creates a decorator from the given wrapping callback. Nothing is invoked until it is attached.
pub fn create_decorator<Args, Out, P, F>(callback: F) -> Decorator<Args, Out, P>
where
    F: Fn(Invoke<Args, Out>, &[P]) -> Option<Invoke<Args, Out>> + 'static,
{
    Decorator::new(callback)
}

/// How a decorator was attached.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CallShape {
    /// attached to a method without params
    BareMethod,
    /// attached to a method with (possibly empty) params
    ParameterizedMethod,
    /// wrapping a function directly, params given alongside the function
    Function,
    /// wrapping a function through [`Decorator::with_params`]
    CurriedFunction,
}

impl CallShape {
    pub fn is_method(self) -> bool {
        matches!(self, CallShape::BareMethod | CallShape::ParameterizedMethod)
    }
}

/// An explicit attachment request for [`Decorator::apply`].
pub enum Attachment<T, Args, Out, P> {
    Method(Method<Rc<T>, Args, Out>),
    ParameterizedMethod(Method<Rc<T>, Args, Out>, Vec<P>),
    Function(Invoke<Args, Out>, Vec<P>),
}

impl<T, Args, Out, P> Attachment<T, Args, Out, P> {
    pub fn shape(&self) -> CallShape {
        match self {
            Attachment::Method(_) => CallShape::BareMethod,
            Attachment::ParameterizedMethod(..) => CallShape::ParameterizedMethod,
            Attachment::Function(..) => CallShape::Function,
        }
    }
}

impl<T, Args, Out, P> fmt::Debug for Attachment<T, Args, Out, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Attachment").field(&self.shape()).finish()
    }
}

/// The outcome of [`Decorator::apply`].
pub enum Decorated<T, Args, Out, P> {
    /// a memoizing replacement for the attached method
    Method(MethodSite<T, Args, Out, P>),
    /// the callback's replacement, or the original function
    Function(Invoke<Args, Out>),
}

impl<T, Args, Out, P> Decorated<T, Args, Out, P> {
    pub fn into_method(self) -> Option<MethodSite<T, Args, Out, P>> {
        match self {
            Decorated::Method(site) => Some(site),
            Decorated::Function(_) => None,
        }
    }

    pub fn into_function(self) -> Option<Invoke<Args, Out>> {
        match self {
            Decorated::Method(_) => None,
            Decorated::Function(invoke) => Some(invoke),
        }
    }
}

impl<T, Args, Out, P: fmt::Debug> fmt::Debug for Decorated<T, Args, Out, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decorated::Method(site) => f.debug_tuple("Method").field(site).finish(),
            Decorated::Function(invoke) => f.debug_tuple("Function").field(invoke).finish(),
        }
    }
}

/// A reusable wrapping primitive, created from a [`WrapCallback`].
pub struct Decorator<Args, Out, P = ()> {
    name: Rc<str>,
    callback: Rc<dyn WrapCallback<Args, Out, P>>,
}

impl<Args, Out, P> Decorator<Args, Out, P> {
    pub fn new<C>(callback: C) -> Self
    where
        C: WrapCallback<Args, Out, P> + 'static,
    {
        Self { name: Rc::from(DEFAULT_NAME), callback: Rc::new(callback) }
    }

    pub fn builder() -> DecoratorBuilder<Args, Out, P> {
        DecoratorBuilder::new()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wraps `f` right away with the given params. No memoization takes place: every call runs
    /// the callback once.
    pub fn wrap<I>(&self, f: Invoke<Args, Out>, params: I) -> Invoke<Args, Out>
    where
        I: IntoIterator<Item = P>,
    {
        let params: Vec<P> = params.into_iter().collect();
        self.wrap_function(f, &params, CallShape::Function)
    }

    /// Captures `params` for a later [`Curried::wrap`] or [`Curried::decorate_method`].
    pub fn with_params<I>(&self, params: I) -> Curried<Args, Out, P>
    where
        I: IntoIterator<Item = P>,
    {
        Curried::new(self.clone(), params.into_iter().collect())
    }

    /// Attaches to `method` without params. The returned site replaces the method.
    pub fn decorate_method<T>(&self, method: Method<Rc<T>, Args, Out>) -> MethodSite<T, Args, Out, P>
    where
        T: Receiver + 'static,
        Args: 'static,
        Out: 'static,
    {
        self.attach_method(method, Rc::from(Vec::new()), CallShape::BareMethod)
    }

    pub fn apply<T>(&self, attachment: Attachment<T, Args, Out, P>) -> Decorated<T, Args, Out, P>
    where
        T: Receiver + 'static,
        Args: 'static,
        Out: 'static,
    {
        let shape = attachment.shape();
        match attachment {
            Attachment::Method(method) => Decorated::Method(self.attach_method(method, Rc::from(Vec::new()), shape)),
            Attachment::ParameterizedMethod(method, params) => {
                Decorated::Method(self.attach_method(method, Rc::from(params), shape))
            }
            Attachment::Function(f, params) => Decorated::Function(self.wrap_function(f, &params, shape)),
        }
    }

    pub(crate) fn attach_method<T>(
        &self,
        method: Method<Rc<T>, Args, Out>,
        params: Rc<[P]>,
        shape: CallShape,
    ) -> MethodSite<T, Args, Out, P>
    where
        T: Receiver + 'static,
        Args: 'static,
        Out: 'static,
    {
        trace!(decorator = %self.name, shape = ?shape, params = params.len(), "attach to method");
        MethodSite::new(self.clone(), method, params, shape)
    }

    pub(crate) fn wrap_function(&self, f: Invoke<Args, Out>, params: &[P], shape: CallShape) -> Invoke<Args, Out> {
        match self.callback.wrap(f.clone(), params) {
            Some(replacement) => {
                debug!(decorator = %self.name, shape = ?shape, params = params.len(), "function replaced");
                replacement
            }
            None => {
                debug!(decorator = %self.name, shape = ?shape, params = params.len(), "function kept");
                f
            }
        }
    }

    pub(crate) fn callback(&self) -> &dyn WrapCallback<Args, Out, P> {
        &*self.callback
    }
}

impl<Args, Out, P> Clone for Decorator<Args, Out, P> {
    fn clone(&self) -> Self {
        Self { name: Rc::clone(&self.name), callback: Rc::clone(&self.callback) }
    }
}

impl<Args, Out, P> fmt::Debug for Decorator<Args, Out, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decorator").field("name", &self.name).finish_non_exhaustive()
    }
}

pub struct DecoratorBuilder<Args, Out, P> {
    name: Option<String>,
    callback: Option<Rc<dyn WrapCallback<Args, Out, P>>>,
}

impl<Args, Out, P> DecoratorBuilder<Args, Out, P> {
    fn new() -> Self {
        Self { name: None, callback: None }
    }

    /// The name reported in log events, defaults to `"decorator"`.
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn callback<C>(mut self, callback: C) -> Self
    where
        C: WrapCallback<Args, Out, P> + 'static,
    {
        self.callback = Some(Rc::new(callback));
        self
    }

    pub fn build(self) -> Result<Decorator<Args, Out, P>, DecoratorBuildError> {
        let callback = self.callback.ok_or(DecoratorBuildError::MissingCallback)?;
        let name = match self.name {
            Some(name) if name.trim().is_empty() => return Err(DecoratorBuildError::invalid_name("name is blank")),
            Some(name) => Rc::from(name),
            None => Rc::from(DEFAULT_NAME),
        };
        Ok(Decorator { name, callback })
    }
}

impl<Args, Out, P> fmt::Debug for DecoratorBuilder<Args, Out, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoratorBuilder")
            .field("name", &self.name)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}
