//! Job runner: sweep, wake transform and CSV output.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use tlwall::calculator::ImpedanceCalculator;
use tlwall::io::{write_spectrum_csv, write_sweep_csv, write_wake_csv};
use tlwall::wake::WakeTransform;
use tlwall::yokoya::ShapeCorrector;

use crate::config::Job;

/// What a run produced.
#[derive(Debug)]
pub struct RunSummary {
    /// Files written, in creation order.
    pub files: Vec<PathBuf>,
    /// Number of (frequency, mode) samples that failed.
    pub failures: usize,
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    Ok(BufWriter::new(file))
}

/// Runs a validated job and writes its results below `out_dir`.
pub fn run_job(job: &Job, out_dir: &Path) -> Result<RunSummary> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let corrector = match &job.table {
        Some(table) => ShapeCorrector::with_table(job.shape, table),
        None => ShapeCorrector::new(job.shape),
    };
    let calc = ImpedanceCalculator::with_corrector(&job.wall, corrector);
    let result = calc.sweep(&job.grid, &job.modes)?;

    let failures = result.failures();
    for f in &failures {
        log::warn!("omega = {:e} rad/s, {}: {}", f.omega, f.mode, f.error);
    }

    let mut files = Vec::new();
    let path = out_dir.join("impedance.csv");
    write_sweep_csv(create(&path)?, &result)?;
    files.push(path);

    let transform = job
        .wake
        .as_ref()
        .map(|w| WakeTransform::new(w.config))
        .transpose()?;

    for &mode in &job.modes {
        for &plane in mode.planes() {
            let spectrum = match result.spectrum(mode, plane) {
                Ok(s) => s,
                Err(e) => {
                    log::warn!("skipping {mode} {plane}: {e}");
                    continue;
                }
            };
            let stem = format!("m{}_{plane}", mode.index());
            let path = out_dir.join(format!("impedance_{stem}.csv"));
            write_spectrum_csv(create(&path)?, &spectrum)?;
            files.push(path);

            if let (Some(transform), Some(wake_job)) = (&transform, &job.wake) {
                let wake = transform
                    .impedance_to_wake(&spectrum.two_sided()?, &wake_job.times)
                    .with_context(|| format!("wake of {mode} {plane}"))?;
                let path = out_dir.join(format!("wake_{stem}.csv"));
                write_wake_csv(create(&path)?, &wake)?;
                files.push(path);
            }
        }
    }

    Ok(RunSummary {
        files,
        failures: failures.len(),
    })
}
