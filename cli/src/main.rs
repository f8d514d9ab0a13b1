use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use calypso::dump::{dump_tag, Feedback};
use calypso::pcsc::Context;
use calypso::Iso7816;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum Error {
    #[error("Error occurred on communicating with the reader: {0}")]
    Pcsc(#[from] calypso::pcsc::Error),

    #[error("Couldn't dump the card: {0}")]
    Dump(#[from] calypso::dump::Error),

    #[error("Couldn't write the dump: {0}")]
    Io(#[from] io::Error),

    #[error("Couldn't serialize the dump: {0}")]
    Json(#[from] serde_json::Error),
}

type Result<T> = std::result::Result<T, Error>;

/// Dump the readable files of a Calypso transit card as JSON.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Path to write the dump to, instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

struct ConsoleFeedback;

impl Feedback for ConsoleFeedback {
    fn update_status_text(&mut self, text: &str) {
        eprintln!("{text}");
    }

    fn update_progress_bar(&mut self, current: usize, total: usize) {
        eprint!("\r[{:>2}/{total}]", current + 1);

        if current + 1 == total {
            eprintln!();
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let ctx = Context::try_new()?;
    let device = ctx.open()?;
    let card = device.connect(ctx)?;

    let tag_id = card.tag_id()?;
    info!("Tag UID: {}", hex::encode(&tag_id));

    let protocol = Iso7816::<_, ()>::new(Box::new(card));
    let dump = dump_tag(&protocol, (), tag_id, &mut ConsoleFeedback)?;

    match args.output {
        Some(path) => serde_json::to_writer_pretty(File::create(path)?, &dump)?,
        None => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &dump)?;
            writeln!(stdout)?;
        }
    }

    Ok(())
}
