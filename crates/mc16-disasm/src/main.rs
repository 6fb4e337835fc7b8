use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mc16_asm::disasm::fmt_decoded;
use mc16_asm::{Decoder, Mc16Decoder};

use mc16_disasm::model::{load_raw_bin, read_word, Image};

#[derive(Parser, Debug)]
#[command(author, version, about = "MC16 disassembler CLI", long_about=None)]
struct Cli {
    /// Load address (in words) for the image
    #[arg(long, default_value_t = 0u16)]
    base: u16,
    /// Skip N bytes at start of file before loading
    #[arg(long, default_value_t = 0usize)]
    skip: usize,
    /// Input binary path
    #[arg(value_name = "BINFILE")]
    input: PathBuf,
    /// Limit bytes loaded (default: to EOF after --skip)
    #[arg(long)]
    len: Option<usize>,
    /// Subcommand
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List loaded segments
    Sections,
    /// Disassemble a word range [start, end)
    Range {
        /// Start address (hex or dec)
        start: String,
        /// End address (hex or dec, exclusive)
        end: String,
        /// Show raw instruction words
        #[arg(long)]
        show_words: bool,
        /// Output format: text or json
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Import labels from JSON ({ "NAME": addr }) as written by mc16-as
        #[arg(long, value_name = "FILE")]
        labels_in: Option<PathBuf>,
        /// Write output to file instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
struct LineOut {
    addr: u16,
    word: u16,
    label: Option<String>,
    text: String,
}

fn parse_u16(s: &str) -> Result<u16> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Ok(u16::from_str_radix(hex, 16)?)
    } else {
        Ok(s.parse::<u16>()?)
    }
}

fn load_labels(path: &Path) -> HashMap<u16, String> {
    let table: BTreeMap<String, u16> = match std::fs::read_to_string(path)
        .map_err(anyhow::Error::from)
        .and_then(|txt| Ok(serde_json::from_str(&txt)?))
    {
        Ok(t) => t,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring label file");
            return HashMap::new();
        }
    };
    // first name wins when several labels share an address
    let mut by_addr = HashMap::new();
    for (name, addr) in table {
        by_addr.entry(addr).or_insert(name);
    }
    by_addr
}

fn disasm_range(img: &Image, start: u16, end: u16, labels: &HashMap<u16, String>) -> Vec<LineOut> {
    let dec = Mc16Decoder::new();
    let mut out = Vec::new();
    for addr in start..end {
        let Some(word) = read_word(img, addr) else { break };
        let text = match dec.decode(word) {
            Some(d) => fmt_decoded(&d),
            None => format!(".word {:#06x}", word as u16),
        };
        out.push(LineOut { addr, word: word as u16, label: labels.get(&addr).cloned(), text });
    }
    out
}

fn render_text(lines: &[LineOut], show_words: bool) -> String {
    let mut buf = String::new();
    for l in lines {
        if let Some(lbl) = &l.label {
            let _ = writeln!(buf, "{:#06x} <{lbl}>:", l.addr);
        }
        if show_words {
            let _ = writeln!(buf, "  {:#06x}: {:04x}  {}", l.addr, l.word, l.text);
        } else {
            let _ = writeln!(buf, "  {:#06x}: {}", l.addr, l.text);
        }
    }
    buf
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let img = load_raw_bin(&cli.input, cli.base, cli.skip, cli.len)?;

    match cli.cmd {
        Command::Sections => {
            println!("{:<10} {:<8} {:<8} {:<6}", "name", "start", "end", "words");
            for s in &img.segments {
                let end = s.base as usize + s.words.len();
                println!("{:<10} {:#06x}   {end:#06x}   {:<6}", s.name, s.base, s.words.len());
            }
        }
        Command::Range { start, end, show_words, format, labels_in, out } => {
            let start = parse_u16(&start)?;
            let end = parse_u16(&end)?;
            anyhow::ensure!(end >= start, "end must be >= start");
            let labels = labels_in.as_deref().map(load_labels).unwrap_or_default();

            let lines = disasm_range(&img, start, end, &labels);
            info!(count = lines.len(), "disassembled {start:#06x}..{end:#06x}");
            let buf = match format {
                OutputFormat::Text => render_text(&lines, show_words),
                OutputFormat::Json => serde_json::to_string_pretty(&lines)?,
            };
            if let Some(path) = out { std::fs::write(path, buf)?; } else { print!("{}", buf); }
        }
    }

    Ok(())
}
