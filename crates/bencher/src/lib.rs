use micro_decorator::receiver::{Receiver, ReceiverMarker};
use std::rc::Rc;

#[derive(Debug, Copy, Clone)]
pub struct BenchCase {
    name: &'static str,
    group: BenchGroup,
    receivers: usize,
}

impl BenchCase {
    pub fn new(name: &'static str, group: BenchGroup, receivers: usize) -> Self {
        Self { name, group, receivers }
    }

    pub fn small(name: &'static str, receivers: usize) -> Self {
        Self::new(name, BenchGroup::Small, receivers)
    }

    pub fn large(name: &'static str, receivers: usize) -> Self {
        Self::new(name, BenchGroup::Large, receivers)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> BenchGroup {
        self.group
    }

    pub fn receivers(&self) -> usize {
        self.receivers
    }

    /// Fresh receivers, none of them has been assigned an id yet.
    pub fn make_receivers(&self) -> Vec<Rc<BenchReceiver>> {
        (0..self.receivers).map(|i| Rc::new(BenchReceiver::new(i as u64))).collect()
    }
}

#[derive(Clone, Copy, Debug)]
pub enum BenchGroup {
    Small,
    Large,
}

#[derive(Debug)]
pub struct BenchReceiver {
    marker: ReceiverMarker,
    seed: u64,
}

impl BenchReceiver {
    pub fn new(seed: u64) -> Self {
        Self { marker: ReceiverMarker::new(), seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Receiver for BenchReceiver {
    fn marker(&self) -> &ReceiverMarker {
        &self.marker
    }
}
