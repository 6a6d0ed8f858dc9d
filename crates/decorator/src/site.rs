use crate::cache::MemoCache;
use crate::decorator::{CallShape, Decorator};
use crate::invoke::{Invoke, Method};
use crate::receiver::{Receiver, ReceiverId};
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, trace};

/// One attachment of a decorator to a method. The site stands in for the original method.
///
/// Receivers are shared objects, `Rc<T>`. The wrapping callback runs once per receiver: the first
/// call on a receiver builds its wrapper from the original method bound to that very object,
/// later calls reuse it. The binding is weak, cached wrappers do not keep their receiver alive.
///
/// If the callback returns `None` the bound original itself is memoized, i.e. the method is left
/// unchanged for that receiver.
///
/// # Panics
///
/// Calling the bound original handed to the callback after its receiver was dropped panics. Calls
/// made through [`MethodSite::call`] always have a live receiver.
///
/// ```
/// use micro_decorator::invoke::{method_fn, Invoke};
/// use micro_decorator::receiver::ReceiverMarker;
/// use micro_decorator::create_decorator;
/// use std::rc::Rc;
///
/// let plus_one = create_decorator(|inv: Invoke<(), i32>, _params: &[()]| {
///     Some(Invoke::new(move |args| inv.call(args) + 1))
/// });
///
/// let five = plus_one.decorate_method(method_fn(|_recv: &Rc<ReceiverMarker>, (): ()| 5));
///
/// let receiver = Rc::new(ReceiverMarker::new());
/// assert_eq!(five.call(&receiver, ()), 6);
/// assert_eq!(five.call(&receiver, ()), 6);
/// ```
pub struct MethodSite<T, Args, Out, P> {
    decorator: Decorator<Args, Out, P>,
    method: Method<Rc<T>, Args, Out>,
    params: Rc<[P]>,
    shape: CallShape,
    cache: MemoCache<Args, Out>,
}

impl<T, Args, Out, P> MethodSite<T, Args, Out, P>
where
    T: Receiver + 'static,
    Args: 'static,
    Out: 'static,
{
    pub(crate) fn new(
        decorator: Decorator<Args, Out, P>,
        method: Method<Rc<T>, Args, Out>,
        params: Rc<[P]>,
        shape: CallShape,
    ) -> Self {
        Self { decorator, method, params, shape, cache: MemoCache::new() }
    }

    /// Calls the decorated method on `receiver`.
    pub fn call(&self, receiver: &Rc<T>, args: Args) -> Out {
        let id = receiver.marker().id();

        let wrapper = match self.cache.get(id) {
            Some(wrapper) => {
                trace!(decorator = self.decorator.name(), receiver = %id, "memoized wrapper hit");
                wrapper
            }
            None => self.materialize(receiver, id),
        };

        wrapper.call(args)
    }

    fn materialize(&self, receiver: &Rc<T>, id: ReceiverId) -> Invoke<Args, Out> {
        let bound = bind(&self.method, Rc::downgrade(receiver), id);

        let wrapper = match self.decorator.callback().wrap(bound.clone(), &self.params) {
            Some(replacement) => replacement,
            None => {
                debug!(decorator = self.decorator.name(), receiver = %id, "callback kept the original method");
                bound
            }
        };

        debug!(
            decorator = self.decorator.name(),
            shape = ?self.shape,
            receiver = %id,
            params = self.params.len(),
            "memoized wrapper for receiver"
        );
        self.cache.insert_if_absent(id, wrapper)
    }

    /// Consumes the site into a plain [`Method`], so another decorator can be attached on top.
    pub fn into_method(self) -> Method<Rc<T>, Args, Out>
    where
        P: 'static,
    {
        let site = Rc::new(self);
        Method::new(move |receiver: &Rc<T>, args| site.call(receiver, args))
    }
}

fn bind<T, Args, Out>(method: &Method<Rc<T>, Args, Out>, receiver: Weak<T>, id: ReceiverId) -> Invoke<Args, Out>
where
    T: 'static,
    Args: 'static,
    Out: 'static,
{
    let method = method.clone();
    Invoke::new(move |args| match receiver.upgrade() {
        Some(receiver) => method.call(&receiver, args),
        None => panic!("receiver {id} was dropped, its bound method can no longer be called"),
    })
}

impl<T, Args, Out, P> MethodSite<T, Args, Out, P> {
    pub fn shape(&self) -> CallShape {
        self.shape
    }

    pub fn params(&self) -> &[P] {
        &self.params
    }

    pub fn decorator(&self) -> &Decorator<Args, Out, P> {
        &self.decorator
    }

    /// Returns `true` once a wrapper has been memoized for `receiver`. Never assigns an id.
    pub fn is_cached<R: Receiver + ?Sized>(&self, receiver: &R) -> bool {
        receiver.marker().peek().is_some_and(|id| self.cache.contains(id))
    }

    /// Ids of all receivers with a memoized wrapper, in assignment order.
    pub fn cached_receivers(&self) -> Vec<ReceiverId> {
        self.cache.receivers()
    }
}

impl<T, Args, Out, P: fmt::Debug> fmt::Debug for MethodSite<T, Args, Out, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodSite")
            .field("decorator", &self.decorator)
            .field("shape", &self.shape)
            .field("params", &&*self.params)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use crate::create_decorator;
    use crate::invoke::{method_fn, Invoke};
    use crate::receiver::{Receiver, ReceiverMarker};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Debug, Default)]
    struct Greeter {
        marker: ReceiverMarker,
        greeting: String,
    }

    impl Receiver for Greeter {
        fn marker(&self) -> &ReceiverMarker {
            &self.marker
        }
    }

    fn greeter(greeting: &str) -> Rc<Greeter> {
        Rc::new(Greeter { marker: ReceiverMarker::new(), greeting: greeting.to_string() })
    }

    #[test]
    fn test_callback_runs_once_per_receiver() {
        let built = Rc::new(Cell::new(0));
        let counter = Rc::clone(&built);
        let shout = create_decorator(move |inv: Invoke<(String,), String>, _params: &[()]| {
            counter.set(counter.get() + 1);
            Some(Invoke::new(move |args| inv.call(args).to_uppercase()))
        });

        let site = shout.decorate_method(method_fn(|g: &Rc<Greeter>, (name,): (String,)| format!("{} {name}", g.greeting)));

        let hello = greeter("hello");
        let hi = greeter("hi");
        assert!(!site.is_cached(&hello));

        for _ in 0..3 {
            assert_eq!(site.call(&hello, ("bob".into(),)), "HELLO BOB");
        }
        assert_eq!(built.get(), 1);
        assert!(site.is_cached(&hello));
        assert!(!site.is_cached(&hi));

        assert_eq!(site.call(&hi, ("amy".into(),)), "HI AMY");
        assert_eq!(built.get(), 2);
        assert_eq!(site.cached_receivers(), vec![hello.marker().id(), hi.marker().id()]);
    }

    #[test]
    fn test_none_falls_back_to_original_method() {
        let built = Rc::new(Cell::new(0));
        let counter = Rc::clone(&built);
        let observe = create_decorator(move |_inv: Invoke<(), String>, _params: &[()]| {
            counter.set(counter.get() + 1);
            None
        });

        let site = observe.decorate_method(method_fn(|g: &Rc<Greeter>, (): ()| g.greeting.clone()));
        let hello = greeter("hello");

        assert_eq!(site.call(&hello, ()), "hello");
        assert_eq!(site.call(&hello, ()), "hello");
        assert_eq!(built.get(), 1);
    }

    #[test]
    fn test_per_receiver_state_survives_calls() {
        let counting = create_decorator(|inv: Invoke<(), String>, _params: &[()]| {
            let calls = Cell::new(0);
            Some(Invoke::new(move |args| {
                calls.set(calls.get() + 1);
                format!("{} #{}", inv.call(args), calls.get())
            }))
        });

        let site = counting.decorate_method(method_fn(|g: &Rc<Greeter>, (): ()| g.greeting.clone()));
        let a = greeter("a");
        let b = greeter("b");

        assert_eq!(site.call(&a, ()), "a #1");
        assert_eq!(site.call(&a, ()), "a #2");
        assert_eq!(site.call(&b, ()), "b #1");
        assert_eq!(site.call(&a, ()), "a #3");
    }

    #[test]
    fn test_sites_do_not_share_caches() {
        let built = Rc::new(Cell::new(0));
        let counter = Rc::clone(&built);
        let identity = create_decorator(move |inv: Invoke<(), usize>, _params: &[()]| {
            counter.set(counter.get() + 1);
            Some(inv)
        });

        let len = identity.decorate_method(method_fn(|g: &Rc<Greeter>, (): ()| g.greeting.len()));
        let double_len = identity.decorate_method(method_fn(|g: &Rc<Greeter>, (): ()| g.greeting.len() * 2));

        let hello = greeter("hello");
        assert_eq!(len.call(&hello, ()), 5);
        assert_eq!(double_len.call(&hello, ()), 10);
        assert_eq!(len.call(&hello, ()), 5);
        assert_eq!(built.get(), 2);
    }

    #[test]
    fn test_stacked_sites() {
        let plus = create_decorator(|inv: Invoke<(), i32>, params: &[i32]| {
            let offset = params.first().copied().unwrap_or(1);
            Some(Invoke::new(move |args| inv.call(args) + offset))
        });
        let times_ten = create_decorator(|inv: Invoke<(), i32>, _params: &[i32]| {
            Some(Invoke::new(move |args| inv.call(args) * 10))
        });

        let inner = plus.with_params([2]).decorate_method(method_fn(|_g: &Rc<Greeter>, (): ()| 1));
        let outer = times_ten.decorate_method(inner.into_method());

        assert_eq!(outer.call(&greeter("x"), ()), 30);
    }

    struct Tally {
        marker: ReceiverMarker,
        base: Cell<i32>,
        hits: Cell<i32>,
    }

    impl Receiver for Tally {
        fn marker(&self) -> &ReceiverMarker {
            &self.marker
        }
    }

    fn tally(base: i32) -> Rc<Tally> {
        Rc::new(Tally { marker: ReceiverMarker::new(), base: Cell::new(base), hits: Cell::new(0) })
    }

    #[test]
    fn test_bound_method_sees_receiver_changes() {
        let identity = create_decorator(|inv: Invoke<(), i32>, _params: &[()]| Some(inv));
        let site = identity.decorate_method(method_fn(|t: &Rc<Tally>, (): ()| {
            t.hits.set(t.hits.get() + 1);
            t.base.get() + t.hits.get()
        }));

        let counter = tally(0);
        assert_eq!(site.call(&counter, ()), 1);
        assert_eq!(site.call(&counter, ()), 2);
        assert_eq!(counter.hits.get(), 2);

        counter.base.set(100);
        assert_eq!(site.call(&counter, ()), 103);
        assert_eq!(counter.hits.get(), 3);
    }

    #[test]
    fn test_cached_wrapper_does_not_keep_receiver_alive() {
        let identity = create_decorator(|inv: Invoke<(), i32>, _params: &[()]| Some(inv));
        let site = identity.decorate_method(method_fn(|t: &Rc<Tally>, (): ()| t.base.get()));

        let counter = tally(7);
        let weak = Rc::downgrade(&counter);
        assert_eq!(site.call(&counter, ()), 7);
        assert_eq!(Rc::strong_count(&counter), 1);

        drop(counter);
        assert!(weak.upgrade().is_none());
        assert_eq!(site.cached_receivers().len(), 1);
    }

    #[test]
    #[should_panic(expected = "was dropped")]
    fn test_retained_original_panics_after_receiver_dropped() {
        let retained = Rc::new(RefCell::new(None));
        let slot = Rc::clone(&retained);
        let keep = create_decorator(move |inv: Invoke<(), i32>, _params: &[()]| {
            *slot.borrow_mut() = Some(inv);
            None
        });
        let site = keep.decorate_method(method_fn(|t: &Rc<Tally>, (): ()| t.base.get()));

        let counter = tally(1);
        site.call(&counter, ());
        drop(counter);

        let original = retained.borrow_mut().take().unwrap();
        original.call(());
    }
}
