use anyhow::Result;
use std::path::Path;

use mc16_asm::MachineWord;

/// Contiguous run of instruction words. Addresses count words, not bytes,
/// matching the instruction indices labels resolve to.
#[derive(Debug, Clone)]
pub struct Segment {
    pub name: String,
    pub base: u16,
    pub words: Vec<MachineWord>,
}

#[derive(Debug, Clone)]
pub struct Image {
    pub segments: Vec<Segment>,
}

/// Loads a raw little-endian word image. `skip` and `len` count bytes.
pub fn load_raw_bin(path: &Path, base: u16, skip: usize, len: Option<usize>) -> Result<Image> {
    let file = std::fs::read(path)?;
    anyhow::ensure!(skip <= file.len(), "--skip exceeds file size");
    let mut payload = &file[skip..];
    if let Some(lim) = len {
        anyhow::ensure!(lim <= payload.len(), "--len exceeds remaining file size after skip");
        payload = &payload[..lim];
    }
    anyhow::ensure!(payload.len() % 2 == 0, "image holds a partial word ({} bytes)", payload.len());
    anyhow::ensure!(
        payload.len() / 2 <= (u16::MAX - base) as usize + 1,
        "image does not fit the 16-bit address space at base {base:#06x}"
    );
    let words = payload
        .chunks_exact(2)
        .map(|c| MachineWord::from_le_bytes([c[0], c[1]]))
        .collect();
    let seg = Segment { name: "segment0".into(), base, words };
    Ok(Image { segments: vec![seg] })
}

pub fn read_word(img: &Image, addr: u16) -> Option<MachineWord> {
    img.segments.iter().find_map(|s| {
        let off = addr.checked_sub(s.base)? as usize;
        s.words.get(off).copied()
    })
}
