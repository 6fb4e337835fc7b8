use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use mc16_asm::{assemble, MachineWord};

#[derive(Parser, Debug)]
#[command(author, version, about = "Assembler for the MC16 multi-cycle processor")]
struct Opts {
    /// Input assembly file (one instruction per line, optional `label:` prefix)
    #[arg(value_name = "SRCFILE")]
    input: PathBuf,
    /// Output file
    #[arg(short, long)]
    output: PathBuf,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Bin)]
    format: OutputFormat,
    /// Seed the label table from JSON ({ "NAME": addr })
    #[arg(long, value_name = "FILE")]
    labels_in: Option<PathBuf>,
    /// Export the label table to JSON
    #[arg(long, value_name = "FILE")]
    labels_out: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutputFormat {
    /// Little-endian 16-bit words
    Bin,
    /// One hex word per line
    Hex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Line {
    no: usize,
    label: Option<String>,
    tokens: Vec<String>,
}

fn parse_line(no: usize, text: &str) -> Line {
    let code = text.split(['#', ';']).next().unwrap_or("");
    let mut tokens: Vec<String> = code
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    let label = match tokens.first() {
        Some(t) if t.ends_with(':') => {
            let name = tokens.remove(0);
            Some(name.trim_end_matches(':').to_string())
        }
        _ => None,
    };
    Line { no, label, tokens }
}

/// Pass 1: every label names the index of the next instruction.
fn collect_labels(lines: &[Line], labels: &mut BTreeMap<String, u16>) -> Result<()> {
    let mut index: usize = 0;
    for line in lines {
        if let Some(name) = &line.label {
            anyhow::ensure!(!name.is_empty(), "line {}: empty label", line.no);
            let addr = u16::try_from(index)
                .map_err(|_| anyhow!("line {}: label {} past end of address space", line.no, name))?;
            if labels.insert(name.clone(), addr).is_some() {
                bail!("line {}: label {} defined twice", line.no, name);
            }
        }
        if !line.tokens.is_empty() {
            index += 1;
        }
    }
    Ok(())
}

fn assemble_lines(lines: &[Line], labels: &BTreeMap<String, u16>) -> Result<Vec<MachineWord>> {
    let mut words = Vec::new();
    for line in lines.iter().filter(|l| !l.tokens.is_empty()) {
        let word = assemble(line.tokens.as_slice(), labels, words.len())
            .with_context(|| format!("line {}", line.no))?;
        debug!(line = line.no, tokens = ?line.tokens, word = %format!("{:#06x}", word as u16), "encoded");
        words.push(word);
    }
    Ok(words)
}

fn load_labels(path: &Path) -> BTreeMap<String, u16> {
    match fs::read_to_string(path) {
        Ok(txt) => serde_json::from_str(&txt).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "ignoring malformed label file");
            BTreeMap::new()
        }),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read label file");
            BTreeMap::new()
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();
    let src = fs::read_to_string(&opts.input)
        .with_context(|| format!("reading {}", opts.input.display()))?;
    let lines: Vec<Line> = src
        .lines()
        .enumerate()
        .map(|(i, l)| parse_line(i + 1, l))
        .collect();

    let mut labels = opts.labels_in.as_deref().map(load_labels).unwrap_or_default();
    collect_labels(&lines, &mut labels)?;
    let words = assemble_lines(&lines, &labels)?;

    let out = match opts.format {
        OutputFormat::Bin => words.iter().flat_map(|w| w.to_le_bytes()).collect::<Vec<u8>>(),
        OutputFormat::Hex => words
            .iter()
            .map(|w| format!("{:04x}\n", *w as u16))
            .collect::<String>()
            .into_bytes(),
    };
    fs::write(&opts.output, out).with_context(|| format!("writing {}", opts.output.display()))?;
    if let Some(path) = &opts.labels_out {
        fs::write(path, serde_json::to_string_pretty(&labels)?)?;
    }
    info!(words = words.len(), labels = labels.len(), "assembled {}", opts.input.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Vec<Line> {
        src.lines().enumerate().map(|(i, l)| parse_line(i + 1, l)).collect()
    }

    #[test]
    fn splits_on_commas_and_strips_comments() {
        let l = parse_line(3, "loop: branch R1, done ; exit");
        assert_eq!(l.label.as_deref(), Some("loop"));
        assert_eq!(l.tokens, vec!["branch", "R1", "done"]);
        assert!(parse_line(1, "# only a comment").tokens.is_empty());
    }

    #[test]
    fn labels_point_at_next_instruction() {
        let lines = parse("start:\n  load 10\nnext: add R1\n\nend: jump start\n");
        let mut labels = BTreeMap::new();
        collect_labels(&lines, &mut labels).unwrap();
        assert_eq!(labels["start"], 0);
        assert_eq!(labels["next"], 1);
        assert_eq!(labels["end"], 2);
        let words = assemble_lines(&lines, &labels).unwrap();
        assert_eq!(words.len(), 3);
        assert_eq!(words[2] as u16, 0x2000);
    }

    #[test]
    fn duplicate_label_is_rejected() {
        let lines = parse("a: nop\na: nop\n");
        let mut labels = BTreeMap::new();
        let err = collect_labels(&lines, &mut labels).unwrap_err();
        assert!(err.to_string().contains("defined twice"));
    }

    #[test]
    fn encode_error_names_the_line() {
        let lines = parse("nop\nfoo R1\n");
        let err = assemble_lines(&lines, &BTreeMap::new()).unwrap_err();
        assert_eq!(err.to_string(), "line 2");
        assert!(format!("{err:#}").contains("Invalid instruction: foo"));
    }
}
