//! CLI companion for the door invitation.

mod commands;
mod logging;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "invite",
    about = "Door invitation toolkit: prepare assets and rehearse the page flow",
    version,
    propagate_version = true
)]
struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split one door artwork into the four door and text images
    Split {
        /// Source image
        input: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "data")]
        output: PathBuf,

        /// Share of the height taken by the bottom text band (0.1 to 0.5)
        #[arg(long, default_value = "0.3")]
        text_ratio: f64,
    },

    /// List every image the invitation preloads
    Manifest {
        /// Number of flipbook pages
        #[arg(short, long, default_value = "13")]
        pages: u32,
    },

    /// Verify every manifest image exists
    Check {
        /// Directory the page is served from
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Number of flipbook pages
        #[arg(short, long, default_value = "13")]
        pages: u32,
    },

    /// Run the page flow headless on a virtual clock
    Simulate {
        /// Viewport width
        #[arg(long, default_value = "390")]
        width: f64,

        /// Viewport height
        #[arg(long, default_value = "844")]
        height: f64,

        /// Stop the clock at this time (ms)
        #[arg(short, long, default_value = "5000")]
        until: u64,

        /// Comma-separated steps, e.g. "@4500:tap,@5000:next,@5200:page:7"
        #[arg(short, long)]
        script: Option<String>,

        /// Pretend the turn library is loaded
        #[arg(long)]
        library: bool,

        /// TOML file overriding the default timings
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the full event log
        #[arg(long)]
        events: bool,

        /// Print a JSON summary instead of tables
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Split {
            input,
            output,
            text_ratio,
        } => commands::split::run(&input, &output, text_ratio),
        Commands::Manifest { pages } => commands::manifest::run(pages),
        Commands::Check { dir, pages } => commands::check::run(&dir, pages),
        Commands::Simulate {
            width,
            height,
            until,
            script,
            library,
            config,
            events,
            json,
        } => commands::simulate::run(&commands::simulate::Options {
            width,
            height,
            until,
            script: script.as_deref(),
            library,
            config: config.as_deref(),
            events,
            json,
        }),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
