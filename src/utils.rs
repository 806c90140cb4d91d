use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

pub type OutputWriter = BufWriter<Box<dyn Write + Send>>;

/// Try to create a new BufWriter with the given buffer size wrapped in a
/// mutex, writing to `out_path` or to stdout when no path is given.
///
/// # Arguments
/// * `out_path` - Output path
/// * `buf_size` - Buffer size for BufWriter
pub fn mutex_bufwriter<P: AsRef<Path>>(
    out_path: Option<P>,
    buf_size: usize,
) -> io::Result<Mutex<OutputWriter>> {
    let writer: Box<dyn Write + Send> = match out_path {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout()),
    };
    let writer = if buf_size == 0 {
        BufWriter::new(writer)
    } else {
        BufWriter::with_capacity(buf_size, writer)
    };
    Ok(Mutex::new(writer))
}
