// Log parsing and analysis engine.
//
// parse: text buffer -> ordered entries (parser + assemble)
// analyze: entries -> summary (analysis)
// filter: entries -> selected, ordered page for display

pub mod analysis;
pub mod assemble;
pub mod error;
pub mod filter;
pub mod parser;

pub use analysis::{analyze, analyze_with, AnalysisOptions, ErrorGroup, LogAnalysis, TimeBucket, TimeRange};
pub use assemble::{CancellationSignal, EntryAssembler, Never};
pub use error::{EngineError, EngineResult};
pub use filter::{paginate, EntryQuery, FilterError, Page, SortOrder};
pub use parser::metrics::ParseStats;
pub use parser::{LineParser, LogEntry, LogLevel};

/// Parse a whole buffer into entries. Total: never fails on text.
pub fn parse(buffer: &str) -> Vec<LogEntry> {
    let parser = LineParser::default();
    EntryAssembler::new(&parser).assemble(buffer).0
}

/// Parse raw bytes; fails only when they are not UTF-8 text.
pub fn parse_bytes(bytes: &[u8]) -> EngineResult<Vec<LogEntry>> {
    let text = std::str::from_utf8(bytes).map_err(|e| EngineError::NotText(e.valid_up_to()))?;
    Ok(parse(text))
}

/// Parse with a cancellation signal, also returning scan counters.
pub fn parse_with<S>(buffer: &str, signal: &S) -> EngineResult<(Vec<LogEntry>, ParseStats)>
where
    S: CancellationSignal + ?Sized,
{
    let parser = LineParser::default();
    EntryAssembler::new(&parser).assemble_with(buffer, signal)
}
