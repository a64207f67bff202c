//! Command-line argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

/// Gather open-source intelligence about a domain
///
/// Looks up IP, WHOIS, geolocation, tech stack, robots.txt, sitemap and
/// more, caches the result under the output directory, and renders a
/// static HTML report.
#[derive(Parser, Debug)]
#[command(name = "dossier")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Domain or URL to gather intelligence about
    pub url: String,

    /// Existing directory to store reports in (defaults to ./output)
    pub output_dir: Option<PathBuf>,

    /// Print the gathered document as JSON to stdout
    #[arg(long)]
    pub json: bool,

    /// Do not open the HTML report in the browser
    #[arg(long)]
    pub no_open: bool,

    /// Increase verbosity (repeat for debug output)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
