//! CSV export of smoothed noise / signal spectra.

use crate::Result;
use sismo_analysis::SpectrumResult;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write `frequency,noise,signal,masked` rows from the smoothed spectra.
///
/// Masked points that failed the signal-to-noise test are left empty.
pub fn write_spectra_csv<W: Write>(
    mut writer: W,
    noise: &SpectrumResult,
    signal: &SpectrumResult,
    masked: &[Option<f64>],
) -> Result<()> {
    writeln!(writer, "frequency,noise,signal,masked")?;
    let rows = noise
        .smoothed
        .freqs
        .iter()
        .zip(&noise.smoothed.amps)
        .zip(&signal.smoothed.amps)
        .zip(masked);
    for (((freq, n), s), m) in rows {
        match m {
            Some(m) => writeln!(writer, "{freq},{n},{s},{m}")?,
            None => writeln!(writer, "{freq},{n},{s},")?,
        }
    }
    writer.flush()?;
    Ok(())
}

/// [`write_spectra_csv`] to a file, creating or truncating it.
pub fn export_spectra_csv<P: AsRef<Path>>(
    path: P,
    noise: &SpectrumResult,
    signal: &SpectrumResult,
    masked: &[Option<f64>],
) -> Result<()> {
    let file = BufWriter::new(File::create(path)?);
    write_spectra_csv(file, noise, signal, masked)
}
