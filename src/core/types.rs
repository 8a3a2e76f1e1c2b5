//! Scan document model.
//!
//! These types mirror the JSON document the hybrid analyzer returns for one
//! scanned mail. Decoding is deliberately lenient: every field has a default,
//! explicit `null` decodes to that default, and unknown fields are ignored.
//! Only malformed JSON or a type mismatch is rejected.

use crate::core::error::ReportResult;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Every key the model reads, as the analyzer spells it.
const FIELD_NAMES: &[&str] = &[
    "Attachments",
    "Category",
    "CompressionRatio",
    "Content",
    "ContentMode",
    "ContentType",
    "Description",
    "FileName",
    "FilesContained",
    "From",
    "Id",
    "IndicatorCategories",
    "Indicators",
    "Info",
    "Item",
    "MailHeader",
    "MailInfo",
    "Message-ID",
    "MetaData",
    "Name",
    "NotScanned",
    "Objects",
    "ObjectSize",
    "ObjectType",
    "OriginalSize",
    "ParentId",
    "Rating",
    "RatingFlag",
    "Received",
    "RootObject",
    "ScanResult",
    "ScanTime",
    "Sha256",
    "Subject",
    "SummaryDescription",
    "TimeStamp",
    "To",
    "UnpackedSize",
];

/// Rewrites object keys to their canonical spelling, ignoring ASCII case.
///
/// A key repeated under different spellings keeps the value visited last.
/// Unknown keys are left alone. Depth is bounded by the JSON parser's
/// recursion limit.
fn canonicalize_keys(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, mut child) in std::mem::take(map) {
                canonicalize_keys(&mut child);
                let key = FIELD_NAMES
                    .iter()
                    .find(|name| name.eq_ignore_ascii_case(&key))
                    .map_or(key, |name| name.to_string());
                map.insert(key, child);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(canonicalize_keys),
        _ => {}
    }
}

/// Decodes `null` as the type's default value.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Top-level decoded scan document for one record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ScanResult {
    /// Name of the scanned file.
    #[serde(deserialize_with = "nullable")]
    pub file_name: String,

    /// SHA-256 of the scanned content.
    #[serde(deserialize_with = "nullable")]
    pub sha256: String,

    /// Overall scan result string reported by the engine.
    #[serde(rename = "ScanResult", deserialize_with = "nullable")]
    pub result: String,

    /// Scan duration in milliseconds.
    #[serde(deserialize_with = "nullable")]
    pub scan_time: i64,

    /// Engine timestamp, passed through verbatim.
    #[serde(deserialize_with = "nullable")]
    pub time_stamp: String,

    /// Human summary and rating flag.
    #[serde(deserialize_with = "nullable")]
    pub summary_description: SummaryDescription,

    /// Root of the object tree. Always present after decoding.
    #[serde(deserialize_with = "nullable")]
    pub root_object: ObjectNode,
}

impl ScanResult {
    /// Decodes a scan document from raw JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Decode`](crate::core::ReportError::Decode) if the
    /// text is not JSON or a field has the wrong type.
    pub fn from_json(text: &str) -> ReportResult<Self> {
        let mut value: Value = serde_json::from_str(text)?;
        canonicalize_keys(&mut value);
        Ok(Self::deserialize(value)?)
    }

    /// Returns the scan time in seconds.
    pub fn scan_time_secs(&self) -> f64 {
        self.scan_time as f64 / 1000.0
    }

    /// Returns the rating flag from the summary description.
    pub fn rating_flag(&self) -> &str {
        &self.summary_description.rating_flag
    }
}

/// Summary block of a scan document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct SummaryDescription {
    /// Free-text summary.
    #[serde(deserialize_with = "nullable")]
    pub description: String,

    /// Human rating flag, e.g. `"clean"` or `"malicious"`.
    #[serde(deserialize_with = "nullable")]
    pub rating_flag: String,
}

/// One node of the scanned-content tree: the mail itself, an attachment, or
/// content extracted from an attachment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ObjectNode {
    /// Display name of the object.
    #[serde(deserialize_with = "nullable")]
    pub name: String,

    /// Engine-assigned identifier.
    #[serde(deserialize_with = "nullable")]
    pub id: i64,

    /// Identifier of the parent object.
    #[serde(deserialize_with = "nullable")]
    pub parent_id: i64,

    /// SHA-256 of the object content.
    #[serde(deserialize_with = "nullable")]
    pub sha256: String,

    /// Object type as reported by the engine. Not validated.
    #[serde(deserialize_with = "nullable")]
    pub object_type: String,

    /// Object size in bytes. Not validated.
    #[serde(deserialize_with = "nullable")]
    pub object_size: i64,

    /// Severity rating of this node alone.
    #[serde(deserialize_with = "nullable")]
    pub rating: f64,

    /// Mail and content metadata, if the engine supplied any.
    pub meta_data: Option<MetaData>,

    /// Indicator categories attached to this node, in document order.
    #[serde(deserialize_with = "nullable")]
    pub indicator_categories: Vec<IndicatorCategory>,

    /// Child objects, in document order.
    #[serde(rename = "Objects", deserialize_with = "nullable")]
    pub children: Vec<ObjectNode>,
}

impl ObjectNode {
    /// Creates an empty node with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the object type.
    pub fn with_object_type(mut self, object_type: impl Into<String>) -> Self {
        self.object_type = object_type.into();
        self
    }

    /// Sets the rating.
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    /// Adds an indicator category.
    pub fn with_category(mut self, category: IndicatorCategory) -> Self {
        self.indicator_categories.push(category);
        self
    }

    /// Adds a child object.
    pub fn with_child(mut self, child: ObjectNode) -> Self {
        self.children.push(child);
        self
    }
}

/// A named group of indicators, e.g. `"Detected"` or `"Suspicious"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct IndicatorCategory {
    /// Category name.
    #[serde(deserialize_with = "nullable")]
    pub category: String,

    /// Indicators in document order.
    #[serde(deserialize_with = "nullable")]
    pub indicators: Vec<Indicator>,
}

impl IndicatorCategory {
    /// Category name that marks confirmed detections.
    pub const DETECTED: &'static str = "Detected";

    /// Creates an empty category.
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            indicators: Vec::new(),
        }
    }

    /// Adds an indicator.
    pub fn with_indicator(mut self, indicator: Indicator) -> Self {
        self.indicators.push(indicator);
        self
    }

    /// Returns `true` if this is the `"Detected"` category.
    pub fn is_detected(&self) -> bool {
        self.category == Self::DETECTED
    }
}

/// One detection or heuristic signal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Indicator {
    /// Signal identifier, e.g. a signature name.
    #[serde(deserialize_with = "nullable")]
    pub item: String,

    /// Extra information; may be empty.
    #[serde(deserialize_with = "nullable")]
    pub info: String,

    /// Human-readable description.
    #[serde(deserialize_with = "nullable")]
    pub description: String,

    /// Rating contribution of this signal.
    #[serde(deserialize_with = "nullable")]
    pub rating: f64,
}

impl Indicator {
    /// Creates an indicator with the given item and info.
    pub fn new(item: impl Into<String>, info: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            info: info.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the rating.
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }
}

/// Metadata attached to an object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct MetaData {
    /// Mail envelope information, present on mail objects.
    pub mail_info: Option<MailInfo>,

    /// Content descriptors for extracted parts.
    #[serde(deserialize_with = "nullable")]
    pub content: Vec<Content>,

    /// Number of files contained in an archive.
    #[serde(deserialize_with = "nullable")]
    pub files_contained: i64,
}

/// Mail information block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct MailInfo {
    /// Selected mail headers.
    #[serde(deserialize_with = "nullable")]
    pub mail_header: MailHeader,

    /// Number of attachments.
    #[serde(deserialize_with = "nullable")]
    pub attachments: i64,
}

/// Selected mail headers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct MailHeader {
    /// `From` header.
    #[serde(deserialize_with = "nullable")]
    pub from: String,

    /// `Message-ID` header.
    #[serde(rename = "Message-ID", deserialize_with = "nullable")]
    pub message_id: String,

    /// `Received` headers, top first.
    #[serde(deserialize_with = "nullable")]
    pub received: Vec<String>,

    /// `Subject` header.
    #[serde(deserialize_with = "nullable")]
    pub subject: String,

    /// `To` recipients.
    #[serde(deserialize_with = "nullable")]
    pub to: Vec<String>,
}

/// Descriptor of one extracted content part.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Content {
    /// Content part identifier.
    #[serde(deserialize_with = "nullable")]
    pub id: i64,

    /// Detected content type.
    #[serde(deserialize_with = "nullable")]
    pub content_type: String,

    /// Part name.
    #[serde(deserialize_with = "nullable")]
    pub name: String,

    /// Size before unpacking.
    #[serde(deserialize_with = "nullable")]
    pub original_size: i64,

    /// Size after unpacking.
    #[serde(deserialize_with = "nullable")]
    pub unpacked_size: i64,

    /// Unpacked to original size ratio.
    #[serde(deserialize_with = "nullable")]
    pub compression_ratio: f64,

    /// Engine content mode.
    #[serde(deserialize_with = "nullable")]
    pub content_mode: String,

    /// Reason the part was not scanned, if any.
    #[serde(deserialize_with = "nullable")]
    pub not_scanned: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_defaults() {
        let result = ScanResult::from_json("{}").unwrap();
        assert_eq!(result, ScanResult::default());
        assert_eq!(result.rating_flag(), "");
        assert!(result.root_object.children.is_empty());
        assert_eq!(result.root_object.rating, 0.0);
    }

    #[test]
    fn test_nulls_decode_as_defaults() {
        let json = r#"{
            "FileName": null,
            "ScanTime": null,
            "RootObject": {"Name": "mail", "Objects": null, "IndicatorCategories": null}
        }"#;
        let result = ScanResult::from_json(json).unwrap();
        assert_eq!(result.file_name, "");
        assert_eq!(result.scan_time, 0);
        assert_eq!(result.root_object.name, "mail");
        assert!(result.root_object.children.is_empty());
    }

    #[test]
    fn test_decode_nested_tree_and_metadata() {
        let json = r#"{
            "FileName": "mail.eml",
            "ScanResult": "finished",
            "ScanTime": 1534,
            "SummaryDescription": {"Description": "Malware found", "RatingFlag": "malicious"},
            "Unexpected": [1, 2, 3],
            "RootObject": {
                "Name": "mail.eml",
                "ObjectType": "EML",
                "Rating": 10,
                "MetaData": {
                    "MailInfo": {
                        "MailHeader": {
                            "From": "a@example.org",
                            "Message-ID": "<x@y>",
                            "To": ["b@example.org"]
                        },
                        "Attachments": 1
                    }
                },
                "Objects": [{
                    "Name": "invoice.zip",
                    "Id": 2,
                    "ParentId": 1,
                    "ObjectSize": -1,
                    "ObjectType": "ZIP",
                    "Rating": 95.5,
                    "IndicatorCategories": [{
                        "Category": "Detected",
                        "Indicators": [{
                            "Item": "Trojan.X",
                            "Info": "sample",
                            "Description": "Known malware",
                            "Rating": 100
                        }]
                    }]
                }]
            }
        }"#;
        let result = ScanResult::from_json(json).unwrap();
        assert_eq!(result.result, "finished");
        assert_eq!(result.rating_flag(), "malicious");
        assert!((result.scan_time_secs() - 1.534).abs() < f64::EPSILON);

        let header = &result
            .root_object
            .meta_data
            .as_ref()
            .unwrap()
            .mail_info
            .as_ref()
            .unwrap()
            .mail_header;
        assert_eq!(header.message_id, "<x@y>");
        assert_eq!(header.to, vec!["b@example.org".to_string()]);

        let child = &result.root_object.children[0];
        assert_eq!(child.object_size, -1);
        assert_eq!(child.rating, 95.5);
        assert!(child.indicator_categories[0].is_detected());
        assert_eq!(child.indicator_categories[0].indicators[0].item, "Trojan.X");
    }

    #[test]
    fn test_repeated_key_keeps_last_value() {
        let json = r#"{"RootObject": {"Rating": 10, "Rating": 30}}"#;
        let result = ScanResult::from_json(json).unwrap();
        assert_eq!(result.root_object.rating, 30.0);

        let json = r#"{"FileName": "a.eml", "SummaryDescription": {"RatingFlag": "clean"},
            "FileName": "b.eml", "SummaryDescription": {"RatingFlag": "malicious"}}"#;
        let result = ScanResult::from_json(json).unwrap();
        assert_eq!(result.file_name, "b.eml");
        assert_eq!(result.rating_flag(), "malicious");
    }

    #[test]
    fn test_field_names_match_case_insensitively() {
        let json = r#"{
            "fileName": "mail.eml",
            "SCANTIME": 20,
            "rootObject": {
                "rating": 30,
                "objects": [{
                    "name": "a.exe",
                    "indicatorCategories": [{
                        "category": "Detected",
                        "indicators": [{"item": "Trojan.X", "info": "a.exe"}]
                    }],
                    "metaData": {"mailInfo": {"mailHeader": {"message-id": "<x@y>"}}}
                }]
            }
        }"#;
        let result = ScanResult::from_json(json).unwrap();

        assert_eq!(result.file_name, "mail.eml");
        assert_eq!(result.scan_time, 20);
        assert_eq!(result.root_object.rating, 30.0);

        let child = &result.root_object.children[0];
        assert_eq!(child.name, "a.exe");
        assert!(child.indicator_categories[0].is_detected());
        assert_eq!(child.indicator_categories[0].indicators[0].item, "Trojan.X");
        let meta = child.meta_data.as_ref().unwrap();
        let header = &meta.mail_info.as_ref().unwrap().mail_header;
        assert_eq!(header.message_id, "<x@y>");
    }

    #[test]
    fn test_keys_below_unknown_fields_are_canonicalized() {
        let mut value: Value =
            serde_json::from_str(r#"{"rating": 1, "Extra": {"objects": []}}"#).unwrap();
        canonicalize_keys(&mut value);
        assert_eq!(value["Rating"], 1);
        assert!(value["Extra"]["Objects"].is_array());
        assert!(value.get("rating").is_none());
    }

    #[test]
    fn test_decode_rejects_malformed_input() {
        assert!(ScanResult::from_json("not json").is_err());
        assert!(ScanResult::from_json("").is_err());
        assert!(ScanResult::from_json(r#"{"ScanTime": "slow"}"#).is_err());
        assert!(ScanResult::from_json(r#"{"RootObject": {"Rating": "high"}}"#).is_err());
    }
}
