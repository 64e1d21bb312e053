//! Default configuration output.

use clap::Args;
use sismo_config::PipelineConfig;
use std::path::PathBuf;

/// Print or write the default pipeline configuration.
#[derive(Args)]
pub struct ConfigArgs {
    /// Write the configuration here instead of printing it
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Leading TOML comment for the printed defaults.
const FREQ_MAX_NOTE: &str = "\
# filter.freq_max must not exceed a record's duration in seconds.
# With the default of 100 Hz, records shorter than 100 s are skipped.
";

/// Default configuration as commented TOML.
fn render_default() -> anyhow::Result<String> {
    Ok(format!("{FREQ_MAX_NOTE}\n{}", PipelineConfig::default().to_toml()?))
}

/// Run the config command.
pub fn run(args: ConfigArgs) -> anyhow::Result<()> {
    match args.output {
        Some(path) => {
            PipelineConfig::default().save(&path)?;
            println!("Wrote default configuration to {}", path.display());
        }
        None => print!("{}", render_default()?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printed_defaults_warn_about_freq_max_and_still_parse() {
        let text = render_default().unwrap();
        assert!(text.starts_with("# filter.freq_max"));
        assert!(text.contains("shorter than 100 s"));
        assert_eq!(PipelineConfig::from_toml(&text).unwrap(), PipelineConfig::default());
    }
}
