use anyhow::{Context, Result, bail};
use std::io::{Read, Write};
use std::path::Path;

use crate::models::{Draw, PICK_COUNT};

/// Load every draw from a history file, oldest first.
///
/// Each line holds either the six numbers, or a round identifier followed by
/// the six numbers, comma separated. Blank lines are ignored.
pub fn load_history(path: &Path) -> Result<Vec<Draw>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Cannot open history {:?}", path))?;
    parse_history(file).with_context(|| format!("Invalid history {:?}", path))
}

pub fn parse_history<R: Read>(reader: R) -> Result<Vec<Draw>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut draws = Vec::new();
    for (idx, record_result) in reader.records().enumerate() {
        let record = record_result.with_context(|| format!("Read error at record {}", idx + 1))?;
        let line = record.position().map_or(idx as u64 + 1, |p| p.line());
        if record.iter().all(str::is_empty) {
            continue;
        }
        let draw = parse_record(&record).with_context(|| format!("Line {}", line))?;
        draws.push(draw);
    }
    Ok(draws)
}

fn parse_record(record: &csv::StringRecord) -> Result<Draw> {
    let fields: Vec<&str> = record.iter().collect();
    let (round, numbers) = match fields.len() {
        PICK_COUNT => (None, &fields[..]),
        n if n == PICK_COUNT + 1 => {
            let round = fields[0]
                .parse::<u32>()
                .with_context(|| format!("Cannot parse round '{}'", fields[0]))?;
            (Some(round), &fields[1..])
        }
        n => bail!("Expected {} or {} columns, got {}", PICK_COUNT, PICK_COUNT + 1, n),
    };

    let mut parsed = [0u8; PICK_COUNT];
    for (slot, raw) in parsed.iter_mut().zip(numbers) {
        *slot = raw
            .parse::<u8>()
            .with_context(|| format!("Cannot parse number '{}'", raw))?;
    }
    Draw::new(round, parsed)
}

/// Round identifier of the most recent draw, if the history carries rounds.
pub fn last_round(draws: &[Draw]) -> Option<u32> {
    draws.last().and_then(|d| d.round)
}

/// Append one draw to the end of the history file.
pub fn append_draw(path: &Path, draw: &Draw) -> Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Cannot open history {:?} for append", path))?;
    let numbers = draw
        .numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let line = match draw.round {
        Some(round) => format!("{},{}", round, numbers),
        None => numbers,
    };
    writeln!(file, "{}", line).context("Append failed")?;
    Ok(())
}
