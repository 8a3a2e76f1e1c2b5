//! Human-readable trace output.

use crate::aggregate::{CategoryTally, PreOrder};
use crate::core::{IndicatorCategory, ObjectNode, ScanResult};

use std::io::{self, Write};

/// Writes the verbose block for one decoded record.
///
/// The document header is always written. The root and each descendant are
/// printed only if their own rating is at least `min_rating`; skipped nodes
/// are still descended into.
pub fn write_scan<W: Write>(
    out: &mut W,
    identifier: &str,
    scan: &ScanResult,
    min_rating: f64,
) -> io::Result<()> {
    let root = &scan.root_object;

    writeln!(out, "=== msgid: {} ===", identifier)?;
    writeln!(out, "File: {}", scan.file_name)?;
    writeln!(out, "Scan result: {}", scan.result)?;
    writeln!(
        out,
        "Scan time: {} ms ({:.2} s)",
        scan.scan_time,
        scan.scan_time_secs()
    )?;
    writeln!(out, "Description: {}", scan.summary_description.description)?;
    writeln!(out, "RatingFlag: {}", scan.summary_description.rating_flag)?;
    writeln!(out, "RootObject rating: {:.2}", root.rating)?;

    if root.rating >= min_rating {
        write_node(out, "RootObject", root)?;
    }

    for node in PreOrder::forest(&root.children) {
        if node.rating >= min_rating {
            write_node(out, "Object", node)?;
        }
    }

    Ok(())
}

fn write_node<W: Write>(out: &mut W, label: &str, node: &ObjectNode) -> io::Result<()> {
    writeln!(
        out,
        "{}: {} (Type: {}, Rating: {:.2})",
        label, node.name, node.object_type, node.rating
    )?;
    write_indicators(out, &node.indicator_categories)
}

fn write_indicators<W: Write>(out: &mut W, categories: &[IndicatorCategory]) -> io::Result<()> {
    for category in categories {
        writeln!(out, "  - Category: {}", category.category)?;
        for indicator in &category.indicators {
            writeln!(
                out,
                "  - Indicator: {} ({})",
                indicator.description, indicator.item
            )?;
        }
    }
    Ok(())
}

/// Writes the accumulated category counts. Order is unspecified.
pub fn write_category_counts<W: Write>(out: &mut W, tally: &CategoryTally) -> io::Result<()> {
    writeln!(out, "Category counts:")?;
    for (name, count) in tally.iter() {
        writeln!(out, "  {}: {}", name, count)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Indicator;

    fn render(scan: &ScanResult, min_rating: f64) -> String {
        let mut out = Vec::new();
        write_scan(&mut out, "42", scan, min_rating).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn sample_scan() -> ScanResult {
        let mut scan = ScanResult {
            file_name: "mail.eml".into(),
            result: "finished".into(),
            scan_time: 1534,
            ..ScanResult::default()
        };
        scan.summary_description.description = "Malware found".into();
        scan.summary_description.rating_flag = "malicious".into();
        scan.root_object = ObjectNode::new("mail.eml")
            .with_object_type("EML")
            .with_rating(5.0)
            .with_category(
                IndicatorCategory::new("Info")
                    .with_indicator(Indicator::new("hdr", "").with_description("Odd header")),
            )
            .with_child(
                ObjectNode::new("archive.zip")
                    .with_object_type("ZIP")
                    .with_rating(1.0)
                    .with_child(
                        ObjectNode::new("payload.exe")
                            .with_object_type("PE")
                            .with_rating(100.0)
                            .with_category(
                                IndicatorCategory::new("Detected").with_indicator(
                                    Indicator::new("Trojan.X", "sample")
                                        .with_description("Known malware"),
                                ),
                            ),
                    ),
            );
        scan
    }

    #[test]
    fn test_verbose_prints_everything_at_zero_threshold() {
        let text = render(&sample_scan(), 0.0);
        let expected = "\
=== msgid: 42 ===
File: mail.eml
Scan result: finished
Scan time: 1534 ms (1.53 s)
Description: Malware found
RatingFlag: malicious
RootObject rating: 5.00
RootObject: mail.eml (Type: EML, Rating: 5.00)
  - Category: Info
  - Indicator: Odd header (hdr)
Object: archive.zip (Type: ZIP, Rating: 1.00)
Object: payload.exe (Type: PE, Rating: 100.00)
  - Category: Detected
  - Indicator: Known malware (Trojan.X)
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_verbose_threshold_skips_but_descends() {
        let text = render(&sample_scan(), 50.0);
        assert!(text.contains("RootObject rating: 5.00"));
        assert!(!text.contains("RootObject: mail.eml"));
        assert!(!text.contains("archive.zip"));
        assert!(text.contains("Object: payload.exe (Type: PE, Rating: 100.00)"));
        assert!(text.contains("  - Indicator: Known malware (Trojan.X)"));
    }

    #[test]
    fn test_category_counts() {
        let mut tally = CategoryTally::new();
        tally.record_tree(&sample_scan().root_object);

        let mut out = Vec::new();
        write_category_counts(&mut out, &tally).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("Category counts:\n"));
        assert!(text.contains("  Info: 1\n"));
        assert!(text.contains("  Detected: 1\n"));
        assert_eq!(text.lines().count(), 3);
    }
}
