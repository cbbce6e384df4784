use crate::game::rally::RallyRecord;

#[derive(Debug, thiserror::Error)]
pub enum RallyLogError {
    #[error("rally log io: {0}")]
    Io(#[from] std::io::Error),
    #[error("rally log csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("rally log is not open")]
    Closed,
}

/// Destination for finished rallies.
pub trait RallySink: Send + Sync {
    fn record(&mut self, record: &RallyRecord) -> Result<(), RallyLogError>;
}

/// Keeps records in memory; used headless and in tests.
#[derive(Debug, Default)]
pub struct MemoryRallySink {
    pub records: Vec<RallyRecord>,
}

impl RallySink for MemoryRallySink {
    fn record(&mut self, record: &RallyRecord) -> Result<(), RallyLogError> {
        self.records.push(record.clone());
        Ok(())
    }
}
