use crate::evaluation::Snapshot;
use std::fs::File;
use std::io::{Error, Write};
use std::path::Path;

pub enum CurveFormat {
    Csv,
    Tsv,
    Json,
}
pub struct LearningCurve {
    entries: Vec<Snapshot>,
}

impl LearningCurve {
    pub fn push(&mut self, snapshot: Snapshot) {
        self.entries.push(snapshot)
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn latest(&self) -> Option<Snapshot> {
        self.entries.last().cloned()
    }

    pub fn entries(&self) -> &[Snapshot] {
        &self.entries
    }

    pub fn export<P: AsRef<Path>>(&self, path: P, fmt: CurveFormat) -> Result<(), Error> {
        match fmt {
            CurveFormat::Csv => self.export_with_delimiter(path, ','),
            CurveFormat::Tsv => self.export_with_delimiter(path, '\t'),
            CurveFormat::Json => self.export_json(path),
        }
    }

    fn export_with_delimiter<P: AsRef<Path>>(&self, path: P, delimiter: char) -> Result<(), Error> {
        let mut w = File::create(path)?;
        writeln!(
            w,
            "instances_seen{d}accuracy{d}kappa{d}ram_hours{d}seconds",
            d = delimiter
        )?;
        for s in &self.entries {
            writeln!(
                w,
                "{}{d}{:.12}{d}{:.12}{d}{:.12}{d}{:.6}",
                s.instances_seen,
                s.accuracy,
                s.kappa,
                s.ram_hours,
                s.seconds,
                d = delimiter
            )?;
        }
        Ok(())
    }

    fn export_json<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let mut w = File::create(path)?;
        writeln!(w, "[")?;
        for (i, s) in self.entries.iter().enumerate() {
            writeln!(
                w,
                "  {{\"instances_seen\":{},\"accuracy\":{},\"kappa\":{},\"ram_hours\":{},\"seconds\":{}}}{}",
                s.instances_seen,
                s.accuracy,
                s.kappa,
                s.ram_hours,
                s.seconds,
                if i + 1 == self.entries.len() { "" } else { "," }
            )?;
        }
        writeln!(w, "]")?;
        Ok(())
    }
}

impl Default for LearningCurve {
    fn default() -> Self {
        Self { entries: vec![] }
    }
}
