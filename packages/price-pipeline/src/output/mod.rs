//! Output files of a successful run.
//!
//! Files are staged as `<name>.tmp` and renamed into place together, so a
//! reader never sees a half-written file or a partial set.

pub mod csv;

use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::OutputResult;
use crate::report::ChartDataset;
use crate::types::PipelineResult;

pub use self::csv::{
    read_priced_rows, render_listings, render_priced_records, PricedRow, TIMESTAMP_FORMAT,
};

/// Where the files for one site land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub listings: PathBuf,
    pub prices: PathBuf,
    pub chart: PathBuf,
}

impl OutputPaths {
    /// `<dir>/<site>_listings.csv`, `<dir>/<site>_prices.csv`, `<dir>/<site>_chart.json`.
    pub fn for_site(dir: impl AsRef<Path>, site: &str) -> Self {
        let dir = dir.as_ref();
        Self {
            listings: dir.join(format!("{site}_listings.csv")),
            prices: dir.join(format!("{site}_prices.csv")),
            chart: dir.join(format!("{site}_chart.json")),
        }
    }
}

/// Write the listing snapshot, the converted prices and the chart dataset.
///
/// All three are rendered to `.tmp` files first and renamed only once every
/// render succeeded. On any failure no file from this call is left behind.
pub fn write_outputs(
    paths: &OutputPaths,
    result: &PipelineResult,
    chart: &ChartDataset,
) -> OutputResult<()> {
    let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(3);
    let rendered = (|| -> OutputResult<()> {
        staged.push((
            stage(&paths.listings, |w| render_listings(w, result))?,
            paths.listings.as_path(),
        ));
        staged.push((
            stage(&paths.prices, |w| render_priced_records(w, result))?,
            paths.prices.as_path(),
        ));
        staged.push((stage(&paths.chart, |w| render_json(w, chart))?, paths.chart.as_path()));
        Ok(())
    })();

    if let Err(e) = rendered {
        for (tmp, _) in &staged {
            let _ = fs::remove_file(tmp);
        }
        return Err(e);
    }

    commit(&staged)?;
    info!(
        listings = %paths.listings.display(),
        prices = %paths.prices.display(),
        chart = %paths.chart.display(),
        records = result.len(),
        "Output files written"
    );
    Ok(())
}

fn render_json<W: Write, T: Serialize>(mut writer: W, value: &T) -> OutputResult<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

/// Render into `<path>.tmp` and return the tmp path. Removes it on failure.
fn stage<F>(path: &Path, render: F) -> OutputResult<PathBuf>
where
    F: FnOnce(&mut fs::File) -> OutputResult<()>,
{
    let tmp = tmp_path(path);
    let written = (|| -> OutputResult<()> {
        let mut file = fs::File::create(&tmp)?;
        render(&mut file)?;
        file.sync_all()?;
        Ok(())
    })();

    match written {
        Ok(()) => Ok(tmp),
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            Err(e)
        }
    }
}

/// Rename every staged file into place. If one rename fails, files already
/// renamed by this call and the remaining tmp files are removed.
fn commit(staged: &[(PathBuf, &Path)]) -> OutputResult<()> {
    for (index, (tmp, target)) in staged.iter().enumerate() {
        if let Err(e) = fs::rename(tmp, target) {
            warn!(target = %target.display(), error = %e, "Output rename failed, rolling back");
            for (_, done) in &staged[..index] {
                let _ = fs::remove_file(done);
            }
            for (pending, _) in &staged[index..] {
                let _ = fs::remove_file(pending);
            }
            return Err(e.into());
        }
    }
    Ok(())
}
