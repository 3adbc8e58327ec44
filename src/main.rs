mod cli;
mod io;
mod logging;
mod outside;
mod pipeline;
mod result;
mod types;

use clap::Parser;
use miette::{miette, Result};
use tracing::Level;

use crate::{
    cli::Args,
    io::default_output_dir,
    logging::init_logging,
    outside::{Ffmpeg, Ytdl},
    pipeline::Pipeline,
    types::ClipRequest,
};

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_logging(level)?;

    // Validate everything before touching the network
    let output = args.output.unwrap_or_else(default_output_dir);
    let request = ClipRequest::new(&args.url, args.start, args.end, args.format, output)?;

    let (downloader, transformer) = load_external_components()?;

    let target = Pipeline::new(&downloader, &transformer).run(&request)?;

    // The one line meant for scripts: the final path on stdout
    println!("{}", target.display());
    Ok(())
}

/// Load the external components
fn load_external_components() -> Result<(Ytdl, Ffmpeg)> {
    // Construct the handles concurrently as executing an external program
    // is not instantaneous
    let ytdl_thread = std::thread::spawn(Ytdl::new);
    let ffmpeg_thread = std::thread::spawn(Ffmpeg::new);

    let ytdl = ytdl_thread
        .join()
        .map_err(|_| miette!("Could not join thread"))??;
    let ffmpeg = ffmpeg_thread
        .join()
        .map_err(|_| miette!("Could not join thread"))??;

    Ok((ytdl, ffmpeg))
}
