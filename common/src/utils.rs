use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use bzip2::read::BzDecoder;
use log::{debug, info};

/// Simple timer for logging task duration.
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Create a new Timer.
    pub fn new() -> Self {
        Timer {
            start: Instant::now(),
        }
    }

    /// Log the time since the timer was last reset, then reset the timer.
    pub fn finish(&mut self, task: &str) {
        info!("{} done in {:.2} seconds", task, self.elapsed_secs());
        self.reset();
    }

    pub fn elapsed_secs(&self) -> f64 {
        let elapsed = self.start.elapsed();
        elapsed.as_secs() as f64 + f64::from(elapsed.subsec_millis()) / 1000.0
    }

    /// Reset the timer.
    pub fn reset(&mut self) {
        self.start = Instant::now();
    }
}

impl Default for Timer {
    fn default() -> Self {
        Timer::new()
    }
}

pub type InputReader = Box<dyn BufRead + Send>;

/// Whether `path` names a bzip2 file.
pub fn is_bzip<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .map(|ext| ext == "bz2")
        .unwrap_or(false)
}

/// Open a feed for reading, decompressing `.bz2` files on the fly.
pub fn open_input<P: AsRef<Path>>(path: P) -> io::Result<InputReader> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let buf = BufReader::with_capacity(8192 * 4, file);
    if is_bzip(path) {
        debug!("Opening {:?} as bzip2", path);
        Ok(Box::new(BufReader::with_capacity(
            8192 * 16,
            BzDecoder::new(buf),
        )))
    } else {
        Ok(Box::new(buf))
    }
}
