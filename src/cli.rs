use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Map script to play
    pub script: PathBuf,
    /// Countries GeoJSON (NAME / ADMIN / NAME_LONG properties)
    #[arg(long)]
    pub countries: Option<PathBuf>,
    /// Sub-region GeoJSON (name / admin properties)
    #[arg(long, requires = "countries")]
    pub regions: Option<PathBuf>,
    /// JSON file overriding palette, aliases, effects or settle times
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Only parse and validate; print the commands as JSON
    #[arg(long)]
    pub check: bool,
}
