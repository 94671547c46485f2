//! One-shot readiness notification.
//!
//! Effects that need their elements laid out subscribe here instead of
//! polling on a timer.

type Callback = Box<dyn FnOnce()>;

#[derive(Default)]
pub struct ReadySignal {
    ready: bool,
    waiting: Vec<Callback>,
}

impl ReadySignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Runs `f` on [`ReadySignal::notify`], or right away if that already
    /// happened.
    pub fn subscribe(&mut self, f: impl FnOnce() + 'static) {
        if self.ready {
            f();
        } else {
            self.waiting.push(Box::new(f));
        }
    }

    /// Marks the signal ready and runs waiting subscribers in order. Returns
    /// how many ran; later calls run nothing.
    pub fn notify(&mut self) -> usize {
        if self.ready {
            return 0;
        }
        self.ready = true;
        let waiting = std::mem::take(&mut self.waiting);
        let n = waiting.len();
        for f in waiting {
            f();
        }
        n
    }
}

impl std::fmt::Debug for ReadySignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadySignal")
            .field("ready", &self.ready)
            .field("waiting", &self.waiting.len())
            .finish()
    }
}
