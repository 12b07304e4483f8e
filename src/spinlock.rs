// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
A reader/writer spinlock.

On the wasm main thread we can't block on a mutex, so the global logger list
is guarded by this instead.  Critical sections must stay tiny: cloning a
`Vec<Arc<_>>` or pushing onto it.
*/

use std::cell::UnsafeCell;
use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering::{Acquire, Relaxed, Release};

const UNLOCKED: u8 = 0;
// up to 254 readers, or one writer
const WRITER: u8 = u8::MAX;

pub(crate) struct Spinlock<T> {
    state: AtomicU8,
    data: UnsafeCell<T>,
}

unsafe impl<T: Send> Send for Spinlock<T> {}
unsafe impl<T: Send + Sync> Sync for Spinlock<T> {}

/// Releases the lock on drop, so a panicking closure cannot wedge it.
struct Unlock<'a> {
    state: &'a AtomicU8,
    writer: bool,
}

impl Drop for Unlock<'_> {
    fn drop(&mut self) {
        if self.writer {
            self.state.store(UNLOCKED, Release);
        } else {
            self.state.fetch_sub(1, Release);
        }
    }
}

impl<T> Spinlock<T> {
    pub(crate) const fn new(data: T) -> Self {
        Spinlock {
            state: AtomicU8::new(UNLOCKED),
            data: UnsafeCell::new(data),
        }
    }

    fn lock_write(&self) -> Unlock<'_> {
        while self
            .state
            .compare_exchange_weak(UNLOCKED, WRITER, Acquire, Relaxed)
            .is_err()
        {
            std::hint::spin_loop();
        }
        Unlock {
            state: &self.state,
            writer: true,
        }
    }

    fn lock_read(&self) -> Unlock<'_> {
        while self
            .state
            .fetch_update(Acquire, Relaxed, |v| (v < WRITER - 1).then_some(v + 1))
            .is_err()
        {
            std::hint::spin_loop();
        }
        Unlock {
            state: &self.state,
            writer: false,
        }
    }

    pub(crate) fn write<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let _unlock = self.lock_write();
        // SAFETY: the writer state excludes every other reader and writer.
        unsafe { f(&mut *self.data.get()) }
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let _unlock = self.lock_read();
        // SAFETY: while readers are counted no writer can enter.
        unsafe { f(&*self.data.get()) }
    }
}

#[cfg(test)]
mod tests {
    use super::Spinlock;
    use std::sync::Arc;

    #[test]
    fn concurrent_writers_do_not_lose_updates() {
        let lock = Arc::new(Spinlock::new(0u32));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let lock = lock.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        lock.write(|v| *v += 1);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(lock.read(|v| *v), 4000);
    }

    #[test]
    fn panic_in_closure_releases_lock() {
        let lock = Spinlock::new(1u8);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            lock.write(|_| panic!("inside"));
        }));
        assert!(result.is_err());
        assert_eq!(lock.read(|v| *v), 1);
    }
}
