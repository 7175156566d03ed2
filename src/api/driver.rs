//! Frame scheduler for a shared animator
//!
//! A [`FrameDriver`] runs one background thread that sleeps for the frame
//! interval and then ticks the animator. The epoch is captured when a frame
//! is scheduled and checked again under the animator lock when it is
//! delivered, so `start` and `cancel` (which take the same lock) are atomic
//! with respect to ticks and no frame of a retired epoch is ever delivered.

use crate::api::animator::RouteAnimator;
use log::{debug, info};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Animator shared between the caller and the frame driver
pub type SharedAnimator = Arc<Mutex<RouteAnimator>>;

/// Lock the animator, recovering it if a callback panicked while it was held
pub fn lock_animator(animator: &Mutex<RouteAnimator>) -> MutexGuard<'_, RouteAnimator> {
    animator.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Background thread delivering ticks at a fixed interval
pub struct FrameDriver {
    stop_flag: Arc<AtomicBool>,
    frames_delivered: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
    frame_interval: Duration,
}

impl FrameDriver {
    /// Start ticking `animator` every `frame_interval_ms`
    ///
    /// Ticks are timed with the animator's own clock, so start times and
    /// tick times always come from the same timeline.
    pub fn spawn(animator: SharedAnimator, frame_interval_ms: u32) -> Self {
        let clock = Arc::clone(lock_animator(&animator).clock());
        let frame_interval = Duration::from_millis(u64::from(frame_interval_ms.max(1)));
        let stop_flag = Arc::new(AtomicBool::new(false));
        let frames_delivered = Arc::new(AtomicU64::new(0));

        let stop = Arc::clone(&stop_flag);
        let frames = Arc::clone(&frames_delivered);
        let handle = thread::spawn(move || {
            let mut scheduled = lock_animator(&animator).current_epoch();
            while !stop.load(Ordering::SeqCst) {
                clock.sleep(frame_interval);
                if stop.load(Ordering::SeqCst) {
                    break;
                }

                let mut guard = lock_animator(&animator);
                if let Some(epoch) = scheduled {
                    if guard.on_tick_for(epoch, clock.now_millis()) {
                        frames.fetch_add(1, Ordering::SeqCst);
                    }
                }
                scheduled = guard.current_epoch();
            }
            debug!("Frame driver thread exiting");
        });

        info!("Frame driver started at {} ms per frame", frame_interval.as_millis());
        Self {
            stop_flag,
            frames_delivered,
            handle: Some(handle),
            frame_interval,
        }
    }

    /// Ticks that reached a running epoch
    pub fn frames_delivered(&self) -> u64 {
        self.frames_delivered.load(Ordering::SeqCst)
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Stop the thread and wait for it to exit
    pub fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Frame driver thread panicked");
            }
        }
    }
}

impl Drop for FrameDriver {
    fn drop(&mut self) {
        self.stop();
    }
}
