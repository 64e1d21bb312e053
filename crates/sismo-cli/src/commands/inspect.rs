//! Display record header details and peak ground motion.

use clap::Args;
use sismo_analysis::ground_motion_peaks;
use sismo_core::validate_waveform;
use sismo_io::read_record;

/// Display record information.
#[derive(Args)]
pub struct InspectArgs {
    /// Path to the text record
    pub file: std::path::PathBuf,
}

/// Run the inspect command.
pub fn run(args: InspectArgs) -> anyhow::Result<()> {
    let waveform = read_record(&args.file)?;
    let Some(first) = waveform.first() else {
        anyhow::bail!("{} holds no channels", args.file.display());
    };

    let components: Vec<&str> = waveform.iter().map(|c| c.component.as_str()).collect();

    println!("File:          {}", args.file.display());
    println!("Station:       {}", first.station);
    println!("Start:         {}", first.start_time.format("%Y-%m-%d %H:%M:%S%.f"));
    println!("Sampling Rate: {} Hz", first.sampling_rate);
    println!("Samples:       {}", first.npts());
    println!("Components:    {}", components.join(" "));
    println!("Duration:      {:.3}s", waveform.duration());
    if let Some(id) = waveform.record_id() {
        println!("Record ID:     {id}");
    }

    match validate_waveform(&waveform) {
        Ok(()) => println!("Validation:    ok"),
        Err(err) => {
            println!("Validation:    {err}");
            return Ok(());
        }
    }

    println!("\nPeaks (record units):");
    for channel in &waveform {
        let peaks = ground_motion_peaks(&channel.samples, channel.delta())?;
        println!(
            "  {:<4} PGA {:.4e}  PGV {:.4e}  PGD {:.4e}",
            channel.component, peaks.pga, peaks.pgv, peaks.pgd
        );
    }

    Ok(())
}
