use std::collections::BTreeMap;
use std::fs::File;
use std::io;
use std::path::Path;

use log::info;

use crate::extractor::ProfessorRecord;

/// Full run output: institution name mapped to its professors, in listing
/// order. Written exactly once, at the end of the run.
pub type ResultDocument = BTreeMap<String, Vec<ProfessorRecord>>;

pub fn write_document(path: &Path, document: &ResultDocument) -> io::Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, document).map_err(io::Error::from)?;
    info!(
        "Wrote {} schools ({} professors) to {:?}",
        document.len(),
        document.values().map(Vec::len).sum::<usize>(),
        path
    );
    Ok(())
}

pub fn read_document(path: &Path) -> io::Result<ResultDocument> {
    let file = File::open(path)?;
    serde_json::from_reader(file).map_err(io::Error::from)
}
