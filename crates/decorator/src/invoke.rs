use std::fmt;
use std::rc::Rc;

/// A type-erased, cheaply cloneable invocation.
///
/// `Args` is a tuple holding the call-time positional arguments, they are forwarded untouched.
pub struct Invoke<Args, Out> {
    f: Rc<dyn Fn(Args) -> Out>,
}

impl<Args, Out> Invoke<Args, Out> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Args) -> Out + 'static,
    {
        Self { f: Rc::new(f) }
    }

    #[inline]
    pub fn call(&self, args: Args) -> Out {
        (self.f)(args)
    }

    /// Returns `true` if both handles point at the same underlying closure.
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Rc::ptr_eq(&this.f, &other.f)
    }
}

impl<Args, Out> Clone for Invoke<Args, Out> {
    fn clone(&self) -> Self {
        Self { f: Rc::clone(&self.f) }
    }
}

impl<Args, Out> fmt::Debug for Invoke<Args, Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invoke").field("ptr", &Rc::as_ptr(&self.f).cast::<()>()).finish()
    }
}

/// The original method of an attachment site, called with the receiver it is bound to.
pub struct Method<R, Args, Out> {
    f: Rc<dyn Fn(&R, Args) -> Out>,
}

impl<R, Args, Out> Method<R, Args, Out> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&R, Args) -> Out + 'static,
    {
        Self { f: Rc::new(f) }
    }

    #[inline]
    pub fn call(&self, receiver: &R, args: Args) -> Out {
        (self.f)(receiver, args)
    }
}

impl<R, Args, Out> Clone for Method<R, Args, Out> {
    fn clone(&self) -> Self {
        Self { f: Rc::clone(&self.f) }
    }
}

impl<R, Args, Out> fmt::Debug for Method<R, Args, Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method").field("ptr", &Rc::as_ptr(&self.f).cast::<()>()).finish()
    }
}

pub fn method_fn<R, Args, Out, F>(f: F) -> Method<R, Args, Out>
where
    F: Fn(&R, Args) -> Out + 'static,
{
    Method::new(f)
}

/// Represents a plain function whose positional parameters are packed into the tuple `Args`
pub trait Callable<Args> {
    type Output;
    fn call_with(&self, args: Args) -> Self::Output;
}

/// impl `Fn` for `Callable`, From 0 parameters to 12 parameters
///
/// for example, it will impl Fn(A, B) like this:
///```ignore
/// impl<Func, O, A, B> Callable<(A, B)> for Func
///    where
///        Func: Fn(A, B) -> O,
/// {
///    type Output = O;
///
///    #[inline]
///    #[allow(non_snake_case)]
///    fn call_with(&self, (A, B): (A, B)) -> Self::Output {
///        (self)(A, B)
///    }
/// }
///```
macro_rules! impl_callable_for_fn ({ $($param:ident)* } => {
    impl<Func, O, $($param,)*> Callable<($($param,)*)> for Func
    where
        Func: Fn($($param),*) -> O,
    {
        type Output = O;

        #[inline]
        #[allow(non_snake_case, reason = "type parameters double as tuple bindings")]
        fn call_with(&self, ($($param,)*): ($($param,)*)) -> Self::Output {
            (self)($($param,)*)
        }
    }
});

impl_callable_for_fn! {}
impl_callable_for_fn! { A }
impl_callable_for_fn! { A B }
impl_callable_for_fn! { A B C }
impl_callable_for_fn! { A B C D }
impl_callable_for_fn! { A B C D E }
impl_callable_for_fn! { A B C D E F }
impl_callable_for_fn! { A B C D E F G }
impl_callable_for_fn! { A B C D E F G H }
impl_callable_for_fn! { A B C D E F G H I }
impl_callable_for_fn! { A B C D E F G H I J }
impl_callable_for_fn! { A B C D E F G H I J K }
impl_callable_for_fn! { A B C D E F G H I J K L }

/// Erase a plain function of any arity (up to 12) into an [`Invoke`].
pub fn invoke_fn<F, Args>(f: F) -> Invoke<Args, F::Output>
where
    F: Callable<Args> + 'static,
{
    Invoke::new(move |args| f.call_with(args))
}
