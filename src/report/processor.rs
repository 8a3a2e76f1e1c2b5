//! Processing entry point.
//!
//! A [`Processor`] drives split → decode → aggregate → render for every record
//! of a stream, writing one verdict line (or verbose block) per record. It
//! owns the category tally for its lifetime.

use crate::aggregate::CategoryTally;
use crate::audit;
use crate::core::{Record, RecordSplitter, ReportResult, ScanResult};
use crate::report::config::ProcessOptions;
use crate::report::verbose;
use crate::report::verdict::Verdict;

use std::io::{BufRead, Read, Write};

/// Counters for one processing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Records read from the input.
    pub records: usize,

    /// Records whose body could not be decoded.
    pub rejected: usize,
}

impl RunSummary {
    fn add(&mut self, verdict: &Verdict) {
        self.records += 1;
        if !verdict.is_scored() {
            self.rejected += 1;
        }
    }
}

/// Turns scan response records into verdicts.
///
/// # Example
///
/// ```rust
/// use varist_ha::{ProcessOptions, Processor};
///
/// let log = "msgid=1234:\n{}\nmsgid=1235:\nnot json\n";
/// let mut out = Vec::new();
///
/// let mut processor = Processor::new();
/// let summary = processor
///     .process_stream(log.as_bytes(), &mut out, &ProcessOptions::default())
///     .unwrap();
///
/// assert_eq!(summary.records, 2);
/// assert_eq!(
///     String::from_utf8(out).unwrap(),
///     "Varist-RC=0 Rating=\"\" Result=HA-CLEAN Detections=none\n\
///      Varist-RC=1 Rating=UNKNOWN Result=ParseError Detections=\n"
/// );
/// ```
#[derive(Debug, Default)]
pub struct Processor {
    tally: CategoryTally,
}

impl Processor {
    /// Creates a processor with an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes every record of a response log.
    ///
    /// Records are handled in input order. An undecodable record produces a
    /// failure verdict and processing continues.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Io`](crate::core::ReportError::Io) if reading the
    /// input or writing the output fails. Output already written stays written.
    pub fn process_stream<R: BufRead, W: Write>(
        &mut self,
        reader: R,
        out: &mut W,
        options: &ProcessOptions,
    ) -> ReportResult<RunSummary> {
        let mut summary = RunSummary::default();

        for record in RecordSplitter::new(reader) {
            let record = record?;
            let verdict = self.process_record(&record, out, options)?;
            summary.add(&verdict);
        }

        out.flush()?;
        audit::emit_run_completed(&summary);
        Ok(summary)
    }

    /// Processes a single response body under an out-of-band identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Io`](crate::core::ReportError::Io) if reading the
    /// body or writing the output fails.
    pub fn process_response<R: Read, W: Write>(
        &mut self,
        mut reader: R,
        msg_id: &str,
        out: &mut W,
        options: &ProcessOptions,
    ) -> ReportResult<Verdict> {
        let mut body = Vec::new();
        reader.read_to_end(&mut body)?;

        let record = Record::new(msg_id, String::from_utf8_lossy(&body));
        let verdict = self.process_record(&record, out, options)?;
        out.flush()?;
        Ok(verdict)
    }

    /// Decodes, tallies, and renders one record.
    ///
    /// The returned verdict is the compact one even in verbose mode, where
    /// only failure verdicts are printed.
    ///
    /// # Errors
    ///
    /// Only write failures are returned; decode failures become
    /// [`Verdict::parse_error`].
    pub fn process_record<W: Write>(
        &mut self,
        record: &Record,
        out: &mut W,
        options: &ProcessOptions,
    ) -> ReportResult<Verdict> {
        tracing::debug!(
            msg_id = %record.identifier,
            body_len = record.raw_body.len(),
            "Processing record"
        );

        let scan = match ScanResult::from_json(&record.raw_body) {
            Ok(scan) => scan,
            Err(err) => {
                audit::emit_record_rejected(&record.identifier, &err, record.raw_body.len());
                let verdict = Verdict::parse_error();
                writeln!(out, "{}", verdict)?;
                return Ok(verdict);
            }
        };

        self.tally.record_tree(&scan.root_object);
        let verdict = Verdict::from_scan(&scan);

        if options.verbose {
            verbose::write_scan(out, &record.identifier, &scan, options.min_rating)?;
        } else {
            writeln!(out, "{}", verdict)?;
        }

        audit::emit_record_processed(&record.identifier, &scan, &verdict);
        Ok(verdict)
    }

    /// Returns the categories counted so far.
    pub fn tally(&self) -> &CategoryTally {
        &self.tally
    }

    /// Writes the accumulated category counts.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Io`](crate::core::ReportError::Io) if writing fails.
    pub fn write_category_counts<W: Write>(&self, out: &mut W) -> ReportResult<()> {
        verbose::write_category_counts(out, &self.tally)?;
        out.flush()?;
        Ok(())
    }
}
