use std::thread;
use std::time::Duration;

use platylog::{log_debug, log_error, log_fatal, log_info, log_trace, log_warning, Logger};

const WORKERS: usize = 4;
const JOBS_PER_WORKER: usize = 5;

fn run_worker(id: usize) {
    for job in 0..JOBS_PER_WORKER {
        log_trace!("worker {} picked job {}", id, job);
        if job % 3 == 2 {
            log_warning!("worker {} job {} is slow", id, job);
        }
        thread::sleep(Duration::from_millis(5));
        log_debug!("worker {} finished job {}", id, job);
    }
}

fn main() {
    // Reads app_config.toml from the working directory, defaults if absent
    Logger::init();
    log_info!("demo starting with {} workers", WORKERS);

    let handles: Vec<_> = (0..WORKERS)
        .map(|id| thread::spawn(move || run_worker(id)))
        .collect();

    for (id, handle) in handles.into_iter().enumerate() {
        if handle.join().is_err() {
            log_error!("worker {} panicked", id);
        }
    }

    log_fatal!("demo done, session file at {}", Logger::engine().session_path().display());
}
