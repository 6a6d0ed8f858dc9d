use crate::invoke::Invoke;

/// The wrapping logic a [`Decorator`](crate::Decorator) is created from.
///
/// `original` calls the wrapped function, or the wrapped method with its receiver already bound.
/// `params` are the extra params given at attachment time. Returning `None` keeps the original.
pub trait WrapCallback<Args, Out, P> {
    fn wrap(&self, original: Invoke<Args, Out>, params: &[P]) -> Option<Invoke<Args, Out>>;
}

impl<F, Args, Out, P> WrapCallback<Args, Out, P> for F
where
    F: Fn(Invoke<Args, Out>, &[P]) -> Option<Invoke<Args, Out>>,
{
    #[inline]
    fn wrap(&self, original: Invoke<Args, Out>, params: &[P]) -> Option<Invoke<Args, Out>> {
        (self)(original, params)
    }
}
