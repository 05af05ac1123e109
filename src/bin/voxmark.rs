use std::{
    io::{BufRead as _, Read as _, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "voxmark", version)]
struct Cli {
    /// Log per-node rendering details.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render markup to audio, one line at a time (requires `ffmpeg` on PATH).
    Say(SayArgs),
    /// Print the normalized composition tree without rendering.
    Tree(TreeArgs),
}

#[derive(Parser, Debug)]
struct SayArgs {
    /// JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Audio file to write to.
    #[arg(long, default_value = "audio.wav")]
    out: PathBuf,

    /// Read all of standard input as one markup document, render it once and exit.
    #[arg(long)]
    stdin: bool,

    /// Speaker for text before the first `name:` switch.
    #[arg(long)]
    speaker: Option<String>,

    /// Render sibling nodes concurrently.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for --parallel.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct TreeArgs {
    /// JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Speaker for text before the first `name:` switch.
    #[arg(long)]
    speaker: Option<String>,

    /// Markup to compose; read from standard input when omitted.
    text: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Say(args) => cmd_say(args),
        Command::Tree(args) => cmd_tree(args),
    }
}

fn load_config(path: Option<&Path>, speaker: Option<String>) -> anyhow::Result<voxmark::Config> {
    let mut cfg = match path {
        Some(p) => voxmark::Config::from_path(p)?,
        None => voxmark::Config::default(),
    };
    if let Some(s) = speaker {
        cfg.default_speaker = s;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn read_stdin_document() -> anyhow::Result<String> {
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("read markup from stdin")?;
    Ok(text.replace('\n', " "))
}

fn cmd_say(args: SayArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(args.config.as_deref(), args.speaker)?;
    cfg.parallel |= args.parallel;
    if args.threads.is_some() {
        cfg.threads = args.threads;
    }
    let synth = voxmark::Synthesizer::from_config(cfg)?;

    if args.stdin {
        let text = read_stdin_document()?;
        return say_one(&synth, &text, &args.out);
    }

    let stdin = std::io::stdin();
    let mut line = String::new();
    loop {
        eprintln!("{}", "-".repeat(50));
        std::io::stderr().flush().ok();
        line.clear();
        if stdin.lock().read_line(&mut line).context("read markup line")? == 0 {
            return Ok(());
        }
        let text = line.trim_end_matches(['\n', '\r']);
        if text.is_empty() {
            continue;
        }
        if let Err(e) = say_one(&synth, text, &args.out) {
            tracing::error!("{e:#}");
        }
    }
}

fn say_one(synth: &voxmark::Synthesizer, text: &str, out: &Path) -> anyhow::Result<()> {
    match synth
        .render_to(text, out)
        .with_context(|| format!("render to '{}'", out.display()))?
    {
        Some(path) => eprintln!("wrote {}", path.display()),
        None => eprintln!("no audio produced"),
    }
    Ok(())
}

fn cmd_tree(args: TreeArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref(), args.speaker)?;
    let text = match args.text {
        Some(t) => t,
        None => read_stdin_document()?,
    };
    let root = voxmark::compose_named(&text, &cfg.default_speaker, &cfg.scratch_dir);
    print!("{root}");
    Ok(())
}
