//! One analyze-log-report cycle for a single mail.

use crate::analyzer::response_log::ResponseLog;
use crate::analyzer::traits::Analyzer;
use crate::core::error::sanitize;
use crate::core::{ClientError, ReportError};
use crate::report::{ProcessOptions, Processor, Verdict};

use std::io::Write;
use thiserror::Error;

/// Parameters handed over by the MTA for one mail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanRequest {
    /// Connecting client address.
    pub sender_ip: String,

    /// Envelope sender.
    pub mail_from: String,

    /// Message identifier, used as the record identifier.
    pub msg_id: String,

    /// Path of the spooled file the analyzer should scan.
    pub scan_file: String,
}

impl ScanRequest {
    /// Returns `true` if every parameter is present.
    pub fn is_complete(&self) -> bool {
        [&self.sender_ip, &self.mail_from, &self.msg_id, &self.scan_file]
            .iter()
            .all(|value| !value.is_empty())
    }
}

/// Why a scan cycle produced no score.
#[derive(Debug, Error)]
pub enum ScanFailure {
    /// A required request parameter was empty.
    #[error("missing scan parameters")]
    MissingParameters,

    /// Talking to the analyzer or the response log failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Rendering the response failed.
    #[error("processing failed: {0}")]
    Processing(#[from] ReportError),
}

impl ScanFailure {
    /// Returns the failure verdict reported to the mail filter.
    pub fn verdict(&self) -> Verdict {
        match self {
            Self::MissingParameters => Verdict::failed("MissingParameters"),
            Self::Client(err) => Verdict::failed(err.verdict_reason()),
            Self::Processing(err) => {
                Verdict::failed(format!("ProcessingError:{}", sanitize(&err.to_string())))
            }
        }
    }
}

/// Fetches the analysis for `request`, appends it to `log`, and renders it.
///
/// The response is logged before it is decoded, so undecodable responses are
/// kept for inspection. A decode failure is not a [`ScanFailure`]: it yields
/// the usual `ParseError` verdict on `out`.
///
/// # Errors
///
/// Returns a [`ScanFailure`] whose [`verdict`](ScanFailure::verdict) the
/// caller prints instead of a scored verdict.
pub async fn scan_and_report<A, W>(
    analyzer: &A,
    log: &ResponseLog,
    request: &ScanRequest,
    processor: &mut Processor,
    out: &mut W,
    options: &ProcessOptions,
) -> Result<Verdict, ScanFailure>
where
    A: Analyzer + ?Sized,
    W: Write,
{
    if !request.is_complete() {
        return Err(ScanFailure::MissingParameters);
    }

    tracing::info!(
        analyzer = analyzer.name(),
        msg_id = %request.msg_id,
        sender_ip = %request.sender_ip,
        mail_from = %request.mail_from,
        "Submitting mail for analysis"
    );

    let body = analyzer.analyze(&request.scan_file).await?;
    log.append(&request.msg_id, &body)?;

    let verdict = processor.process_response(body.as_slice(), &request.msg_id, out, options)?;
    Ok(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::mock::{MockAnalyzer, MockResponse};
    use std::fs;
    use tempfile::TempDir;

    fn request() -> ScanRequest {
        ScanRequest {
            sender_ip: "192.0.2.10".into(),
            mail_from: "alice@example.org".into(),
            msg_id: "1qX2-0004".into(),
            scan_file: "/spool/1qX2-0004.eml".into(),
        }
    }

    #[tokio::test]
    async fn test_scan_and_report_logs_and_renders() {
        let temp_dir = TempDir::new().unwrap();
        let log = ResponseLog::new(temp_dir.path().join("response.log"));
        let body = r#"{"SummaryDescription": {"RatingFlag": "suspicious"},
            "RootObject": {"Rating": 62.5}}"#;
        let analyzer = MockAnalyzer::with_body(body.as_bytes().to_vec());

        let mut processor = Processor::new();
        let mut out = Vec::new();
        let verdict = scan_and_report(
            &analyzer,
            &log,
            &request(),
            &mut processor,
            &mut out,
            &ProcessOptions::default(),
        )
        .await
        .unwrap();

        assert!(verdict.is_scored());
        assert_eq!(analyzer.requests(), vec!["/spool/1qX2-0004.eml".to_string()]);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Varist-RC=0 Rating=\"suspicious\" Result=62 Detections=none\n"
        );
        assert_eq!(
            fs::read_to_string(log.path()).unwrap(),
            format!("msgid=1qX2-0004:\n{}\n", body)
        );
    }

    #[tokio::test]
    async fn test_missing_parameters_skip_analyzer() {
        let temp_dir = TempDir::new().unwrap();
        let log = ResponseLog::new(temp_dir.path().join("response.log"));
        let analyzer = MockAnalyzer::with_body(b"{}".to_vec());
        let incomplete = ScanRequest {
            mail_from: String::new(),
            ..request()
        };

        let err = scan_and_report(
            &analyzer,
            &log,
            &incomplete,
            &mut Processor::new(),
            &mut Vec::new(),
            &ProcessOptions::default(),
        )
        .await
        .unwrap_err();

        assert_eq!(
            err.verdict().to_string(),
            "Varist-RC=1 Rating=UNKNOWN Result=MissingParameters Detections="
        );
        assert_eq!(analyzer.call_count(), 0);
        assert!(!log.path().exists());
    }

    #[tokio::test]
    async fn test_http_status_failure_is_not_logged() {
        let temp_dir = TempDir::new().unwrap();
        let log = ResponseLog::new(temp_dir.path().join("response.log"));
        let analyzer =
            MockAnalyzer::with_response(MockResponse::Status("503 Service Unavailable".into()));

        let err = scan_and_report(
            &analyzer,
            &log,
            &request(),
            &mut Processor::new(),
            &mut Vec::new(),
            &ProcessOptions::default(),
        )
        .await
        .unwrap_err();

        assert_eq!(
            err.verdict().to_string(),
            "Varist-RC=1 Rating=UNKNOWN Result=HTTPStatus:503 Service Unavailable Detections="
        );
        assert!(!log.path().exists());
    }

    #[tokio::test]
    async fn test_undecodable_response_is_logged_and_reported() {
        let temp_dir = TempDir::new().unwrap();
        let log = ResponseLog::new(temp_dir.path().join("response.log"));
        let analyzer = MockAnalyzer::with_body(b"<html>bad gateway</html>".to_vec());

        let mut out = Vec::new();
        let verdict = scan_and_report(
            &analyzer,
            &log,
            &request(),
            &mut Processor::new(),
            &mut out,
            &ProcessOptions::default(),
        )
        .await
        .unwrap();

        assert!(!verdict.is_scored());
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Varist-RC=1 Rating=UNKNOWN Result=ParseError Detections=\n"
        );
        assert!(fs::read_to_string(log.path()).unwrap().contains("bad gateway"));
    }

    #[test]
    fn test_processing_failure_verdict_is_single_line() {
        let err = ScanFailure::Processing(ReportError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "pipe\nclosed",
        )));
        assert_eq!(
            err.verdict().to_string(),
            "Varist-RC=1 Rating=UNKNOWN Result=ProcessingError:I/O error: pipe closed Detections="
        );
    }
}
