use std::{
    sync::Arc,
    task::{Context, Poll},
    thread::{self, Thread},
};

use futures_task::{waker_ref, ArcWake};

struct ThreadNotify {
    thread: Thread,
}

impl ArcWake for ThreadNotify {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.thread.unpark();
    }
}

/// Polls `step` on the current thread until it is ready, parking while the
/// producer waits on something outside the generator.
///
/// Unlike `futures_executor::block_on` this may be nested, so a producer
/// body can build and drive another generator synchronously.
pub(crate) fn block_on_step<R>(mut step: impl FnMut(&mut Context<'_>) -> Poll<R>) -> R {
    let notify = Arc::new(ThreadNotify {
        thread: thread::current(),
    });
    let waker = waker_ref(&notify);
    let mut cx = Context::from_waker(&waker);
    loop {
        if let Poll::Ready(out) = step(&mut cx) {
            return out;
        }
        thread::park();
    }
}
