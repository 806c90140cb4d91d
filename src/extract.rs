use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{debug, warn};
use pbr::ProgressBar;
use rayon::prelude::*;

use atom::{Category, CategoryIterator};
use common::utils::open_input;

use crate::writer::CategoryWriter;

/// Collect the categories of one feed file.
///
/// Reading stops at the first malformed element; the categories read before
/// it are kept.
pub fn feed_to_categories<P: AsRef<Path>>(path: P) -> io::Result<Vec<Category>> {
    let path = path.as_ref();
    let reader = open_input(path)?;
    let mut categories = vec![];
    for category in CategoryIterator::new(reader) {
        match category {
            Ok(category) => categories.push(category),
            Err(err) => {
                warn!("Skipping the rest of {:?}: {}", path, err);
                break;
            }
        }
    }
    debug!("Read {} categories from {:?}", categories.len(), path);
    Ok(categories)
}

/// Extract categories from each feed in parallel and write them using the
/// specified CategoryWriter.
///
/// Returns the number of categories written.
pub fn extract_with_writer<P, W>(
    _category_writer: P,
    feeds: &[PathBuf],
    writer: &Mutex<W>,
) -> io::Result<usize>
where
    P: CategoryWriter,
    W: Write + Send,
{
    let pbar = Mutex::new(ProgressBar::on(io::stderr(), feeds.len() as u64));

    let counts = feeds
        .par_iter()
        .map(|feed| -> io::Result<usize> {
            let categories = feed_to_categories(feed)?;
            {
                let w = &mut *writer
                    .lock()
                    .map_err(|_| io::Error::new(io::ErrorKind::Other, "output writer poisoned"))?;
                for category in &categories {
                    P::write(category, w)?;
                }
            }
            if let Ok(mut prog_bar) = pbar.lock() {
                prog_bar.inc();
            }
            Ok(categories.len())
        })
        .collect::<io::Result<Vec<_>>>()?;

    if let Ok(mut prog_bar) = pbar.into_inner() {
        prog_bar.finish();
    }
    Ok(counts.into_iter().sum())
}
