use clap::Parser;
use history_replay::replay::{HistoryEventStream, ReplayError, ReplayHistory};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(
    name = "replay-dump",
    about = "Decode a recorded navigation history into replay events (one JSON line each)"
)]
struct Args {
    /// Path to the history JSON file
    #[arg(long)]
    history: PathBuf,

    /// Events requested per read call
    #[arg(
        long,
        default_value_t = 64,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    batch: usize,

    /// Stop after this many decoded events
    #[arg(long)]
    limit: Option<usize>,

    /// Parse the whole file up front instead of streaming it
    #[arg(long)]
    in_memory: bool,

    /// Reject events nested deeper than this many containers
    #[arg(long)]
    max_depth: Option<usize>,
}

#[derive(Debug, Default)]
struct Summary {
    events: usize,
    batches: usize,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(summary) => {
            println!(
                "replay_dump events={} batches={}",
                summary.events, summary.batches
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(history = %args.history.display(), %err, "回放解码失败");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<Summary, ReplayError> {
    let limit = args.limit.unwrap_or(usize::MAX);
    if args.in_memory {
        let raw = fs::read_to_string(&args.history)?;
        let history = ReplayHistory::from_json_str(&raw)?;
        info!(events = history.len(), "已加载完整记录");
        // 内存文档每次 read 都从头解码，只能一次读完
        dump(configure(HistoryEventStream::from_document(history), args), limit, limit)
    } else {
        let stream = configure(HistoryEventStream::open(&args.history)?, args);
        dump(stream, args.batch, limit)
    }
}

fn configure<R: BufRead>(stream: HistoryEventStream<R>, args: &Args) -> HistoryEventStream<R> {
    match args.max_depth {
        Some(depth) => stream.with_max_depth(depth),
        None => stream,
    }
}

fn dump<R: BufRead>(
    mut stream: HistoryEventStream<R>,
    batch: usize,
    limit: usize,
) -> Result<Summary, ReplayError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut summary = Summary::default();

    loop {
        let want = batch.min(limit.saturating_sub(summary.events));
        if want == 0 {
            break;
        }
        let events = stream.read(want)?;
        summary.batches += 1;
        for event in &events {
            serde_json::to_writer(&mut out, event).map_err(io::Error::from)?;
            writeln!(out)?;
        }
        summary.events += events.len();
        // 不足一批说明事件已读完
        if events.len() < want {
            break;
        }
    }
    out.flush()?;
    Ok(summary)
}
