use micro_decorator::invoke::{invoke_fn, method_fn, Invoke};
use micro_decorator::receiver::{Receiver, ReceiverMarker};
use micro_decorator::{create_decorator, Decorator, MethodSite};
use std::cell::Cell;
use std::rc::Rc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Allows `params[0]` calls per receiver, later calls return `None`.
fn rate_limit() -> Decorator<(String,), Option<String>, usize> {
    create_decorator(|inv: Invoke<(String,), Option<String>>, params: &[usize]| {
        let budget = params.first().copied().unwrap_or(1);
        let used = Cell::new(0);
        Some(Invoke::new(move |args| {
            if used.get() >= budget {
                warn!(budget, "rate limited");
                return None;
            }
            used.set(used.get() + 1);
            inv.call(args)
        }))
    })
}

thread_local! {
    static SEND: MethodSite<Mailer, (String,), Option<String>, usize> =
        rate_limit().with_params([2]).decorate_method(method_fn(Mailer::send_unlimited));
}

struct Mailer {
    marker: ReceiverMarker,
    from: &'static str,
}

impl Receiver for Mailer {
    fn marker(&self) -> &ReceiverMarker {
        &self.marker
    }
}

impl Mailer {
    fn new(from: &'static str) -> Rc<Self> {
        Rc::new(Mailer { marker: ReceiverMarker::new(), from })
    }

    fn send_unlimited(self: &Rc<Self>, (to,): (String,)) -> Option<String> {
        Some(format!("{} -> {to}", self.from))
    }

    fn send(self: &Rc<Self>, to: &str) -> Option<String> {
        SEND.with(|site| site.call(self, (to.to_string(),)))
    }
}

fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let alice = Mailer::new("alice");
    let bob = Mailer::new("bob");

    for to in ["carol", "dave", "erin"] {
        info!(sent = ?alice.send(to), "alice");
        info!(sent = ?bob.send(to), "bob");
    }

    let echo = rate_limit().wrap(invoke_fn(|s: String| Some(s)), [1]);
    info!(first = ?echo.call(("ping".into(),)), second = ?echo.call(("ping".into(),)), "plain function");
}
