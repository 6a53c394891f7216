use std::io;
use std::path::Path;
use csv::Writer;

use crate::error::Result;
use crate::policy::Episode;

/// Writes one CSV row per episode: `episode,steps,score,outcome`.
pub fn write_episodes<P: AsRef<Path>>(path: P, episodes: &[Episode]) -> Result<()> {
    let wtr = Writer::from_path(path)?;
    write_records(wtr, episodes)
}

pub fn write_episodes_to<W: io::Write>(writer: W, episodes: &[Episode]) -> Result<()> {
    write_records(Writer::from_writer(writer), episodes)
}

fn write_records<W: io::Write>(mut wtr: Writer<W>, episodes: &[Episode]) -> Result<()> {
    wtr.write_record(&["episode", "steps", "score", "outcome"])?;
    for (i, episode) in episodes.iter().enumerate() {
        wtr.write_record(&[
            i.to_string(),
            episode.steps.to_string(),
            episode.score.to_string(),
            episode.outcome.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
