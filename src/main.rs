use anyhow::Result;
use clap::Parser;
use launcher_icon_gen::{
    density::DensityTable,
    icon_gen::{self, Options, DEFAULT_COLOR, DEFAULT_TEXT},
    logger,
};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(
    name = "launcher-icon-gen",
    about = "Generate procedural Android launcher icons for every mipmap density"
)]
struct Args {
    /// Root directory; icons go under android/app/src/main/res inside it.
    #[clap(short, long, value_name = "DIR", default_value = ".")]
    output: PathBuf,

    /// Text drawn in the middle of the icon
    #[clap(long, default_value = DEFAULT_TEXT)]
    text: String,

    /// Glyph color (CSS color format)
    #[clap(long, default_value = DEFAULT_COLOR)]
    color: String,

    /// TrueType font to draw with instead of looking up arial.ttf
    #[clap(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// JSON file with [{"folder": ..., "size": ...}] entries replacing the default densities
    #[clap(long, value_name = "FILE")]
    densities: Option<PathBuf>,

    /// Clip ic_launcher_round.png to a circle
    #[clap(long)]
    round_mask: bool,

    /// Print debug logging to stderr
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init(args.verbose);

    let densities = match &args.densities {
        Some(path) => DensityTable::load(path)?,
        None => DensityTable::default(),
    };

    let opts = Options {
        output: args.output,
        text: args.text,
        color: args.color,
        font: args.font,
        densities,
        round_mask: args.round_mask,
    };

    icon_gen::generate_launcher_icons(&opts)?;
    Ok(())
}
