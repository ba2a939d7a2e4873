//! Bundle persistence: JSON documents and the binary container.
//!
//! Binary layout:
//!
//! ```text
//! offset  size  field
//! 0       8     magic "CROPBNDL"
//! 8       1     format version
//! 9       4     payload length (u32, little-endian)
//! 13      n     postcard-encoded BundleDocument
//! ```

use crate::bundle::ModelBundle;
use crate::classifier::ClassifierModel;
use crate::decoder::LabelDecoder;
use crate::encoder::StageEncoder;
use crate::error::{FormatError, LoadFailure};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Magic bytes at the start of a binary bundle.
pub const MAGIC: &[u8; 8] = b"CROPBNDL";

/// Current binary format version.
pub const FORMAT_VERSION: u8 = 1;

/// Size of the binary header in bytes.
pub const HEADER_SIZE: usize = 13;

// =============================================================================
// DOCUMENT
// =============================================================================

/// Serialized shape of a bundle.
///
/// Field names follow the artifact dictionary written by the training
/// process: `model`, `label_encoder`, `mlb`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleDocument {
    pub model: ClassifierModel,
    pub label_encoder: StageEncoder,
    pub mlb: LabelDecoder,
}

impl TryFrom<BundleDocument> for ModelBundle {
    type Error = crate::error::BundleError;

    fn try_from(doc: BundleDocument) -> Result<Self, Self::Error> {
        ModelBundle::new(doc.model, doc.label_encoder, doc.mlb)
    }
}

impl From<ModelBundle> for BundleDocument {
    fn from(bundle: ModelBundle) -> Self {
        let (model, label_encoder, mlb) = bundle.into_parts();
        Self {
            model,
            label_encoder,
            mlb,
        }
    }
}

// =============================================================================
// FORMAT DETECTION
// =============================================================================

/// Encoding of a bundle file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleFormat {
    Json,
    Binary,
}

impl BundleFormat {
    /// Parse a user-supplied format name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "binary" | "bin" | "bundle" => Some(Self::Binary),
            _ => None,
        }
    }
}

impl fmt::Display for BundleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Binary => f.write_str("binary"),
        }
    }
}

/// Pick the encoding from file content: binary if the magic matches.
#[must_use]
pub fn detect_format(bytes: &[u8]) -> BundleFormat {
    if bytes.starts_with(MAGIC) {
        BundleFormat::Binary
    } else {
        BundleFormat::Json
    }
}

// =============================================================================
// ENCODE / DECODE
// =============================================================================

/// Encode a document in the given format.
pub fn encode_document(doc: &BundleDocument, format: BundleFormat) -> Result<Vec<u8>, FormatError> {
    match format {
        BundleFormat::Json => Ok(serde_json::to_vec_pretty(doc)?),
        BundleFormat::Binary => {
            let payload = postcard::to_allocvec(doc)?;
            let len = u32::try_from(payload.len()).map_err(|_| {
                FormatError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "bundle payload exceeds 4 GiB",
                ))
            })?;

            let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
            out.extend_from_slice(MAGIC);
            out.push(FORMAT_VERSION);
            out.extend_from_slice(&len.to_le_bytes());
            out.extend_from_slice(&payload);
            Ok(out)
        }
    }
}

/// Decode a document, detecting the format from content.
pub fn decode_document(bytes: &[u8]) -> Result<(BundleFormat, BundleDocument), FormatError> {
    match detect_format(bytes) {
        BundleFormat::Json => Ok((BundleFormat::Json, serde_json::from_slice(bytes)?)),
        BundleFormat::Binary => Ok((BundleFormat::Binary, decode_binary(bytes)?)),
    }
}

fn decode_binary(bytes: &[u8]) -> Result<BundleDocument, FormatError> {
    let header = bytes.get(..HEADER_SIZE).ok_or(FormatError::Truncated {
        expected: HEADER_SIZE,
        actual: bytes.len(),
    })?;

    if &header[..MAGIC.len()] != MAGIC {
        return Err(FormatError::BadMagic);
    }

    let version = header[MAGIC.len()];
    if version > FORMAT_VERSION || version == 0 {
        return Err(FormatError::UnsupportedVersion {
            found: version,
            supported: FORMAT_VERSION,
        });
    }

    let mut len_bytes = [0u8; 4];
    len_bytes.copy_from_slice(&header[MAGIC.len() + 1..HEADER_SIZE]);
    let payload_len = u32::from_le_bytes(len_bytes) as usize;

    let payload = &bytes[HEADER_SIZE..];
    if payload.len() < payload_len {
        return Err(FormatError::Truncated {
            expected: HEADER_SIZE + payload_len,
            actual: bytes.len(),
        });
    }

    Ok(postcard::from_bytes(&payload[..payload_len])?)
}

/// Encode a validated bundle.
pub fn encode_bundle(bundle: &ModelBundle, format: BundleFormat) -> Result<Vec<u8>, FormatError> {
    encode_document(&BundleDocument::from(bundle.clone()), format)
}

/// Decode and validate a bundle.
pub fn decode_bundle(bytes: &[u8]) -> Result<(BundleFormat, ModelBundle), LoadFailure> {
    let (format, doc) = decode_document(bytes)?;
    Ok((format, ModelBundle::try_from(doc)?))
}

/// Read and validate a bundle file.
pub fn read_bundle(path: &Path) -> Result<(BundleFormat, ModelBundle), LoadFailure> {
    let bytes = std::fs::read(path).map_err(FormatError::from)?;
    decode_bundle(&bytes)
}

/// Write a bundle file in the given format.
pub fn write_bundle(path: &Path, bundle: &ModelBundle, format: BundleFormat) -> Result<(), FormatError> {
    let bytes = encode_bundle(bundle, format)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::bundle::tests::sample_bundle;
    use crate::error::BundleError;

    const SAMPLE_JSON: &str = r#"{
        "model": {"table": {"rows": [[1, 0], [0, 1]]}},
        "label_encoder": {"classes": [20, 10]},
        "mlb": {"classes": ["leaf blight", "stem rust"]}
    }"#;

    #[test]
    fn decodes_json_document() {
        let (format, bundle) = decode_bundle(SAMPLE_JSON.as_bytes()).unwrap();
        assert_eq!(format, BundleFormat::Json);
        assert_eq!(bundle.stages(), &[10, 20]);
        assert_eq!(bundle.predict(20).unwrap(), vec!["stem rust"]);
    }

    #[test]
    fn binary_and_json_predict_alike() {
        let bundle = sample_bundle();
        let json = encode_bundle(&bundle, BundleFormat::Json).unwrap();
        let binary = encode_bundle(&bundle, BundleFormat::Binary).unwrap();

        assert_eq!(detect_format(&binary), BundleFormat::Binary);
        assert_eq!(detect_format(&json), BundleFormat::Json);

        let (_, from_json) = decode_bundle(&json).unwrap();
        let (_, from_binary) = decode_bundle(&binary).unwrap();
        for stage in bundle.stages() {
            assert_eq!(
                from_json.predict(*stage).unwrap(),
                from_binary.predict(*stage).unwrap()
            );
        }
    }

    #[test]
    fn binary_header_layout() {
        let binary = encode_bundle(&sample_bundle(), BundleFormat::Binary).unwrap();
        assert_eq!(&binary[..8], MAGIC);
        assert_eq!(binary[8], FORMAT_VERSION);
        let len = u32::from_le_bytes([binary[9], binary[10], binary[11], binary[12]]) as usize;
        assert_eq!(binary.len(), HEADER_SIZE + len);
    }

    #[test]
    fn truncated_binary_is_rejected() {
        let binary = encode_bundle(&sample_bundle(), BundleFormat::Binary).unwrap();
        let cut = &binary[..binary.len() - 3];
        assert!(matches!(
            decode_document(cut),
            Err(FormatError::Truncated { .. })
        ));
        assert!(matches!(
            decode_document(&binary[..10]),
            Err(FormatError::Truncated { .. })
        ));
    }

    #[test]
    fn future_version_is_rejected() {
        let mut binary = encode_bundle(&sample_bundle(), BundleFormat::Binary).unwrap();
        binary[8] = FORMAT_VERSION + 1;
        assert!(matches!(
            decode_document(&binary),
            Err(FormatError::UnsupportedVersion { found: 2, .. })
        ));
    }

    #[test]
    fn garbage_is_a_json_error() {
        assert!(matches!(
            decode_document(b"not a bundle"),
            Err(FormatError::Json(_))
        ));
    }

    #[test]
    fn inconsistent_document_fails_validation() {
        let json = r#"{
            "model": {"table": {"rows": [[1, 0, 0]]}},
            "label_encoder": {"classes": [1]},
            "mlb": {"classes": ["a", "b"]}
        }"#;
        assert!(matches!(
            decode_bundle(json.as_bytes()),
            Err(LoadFailure::Bundle(BundleError::OutputWidthMismatch { .. }))
        ));
    }

    #[test]
    fn format_names() {
        assert_eq!(BundleFormat::from_name("JSON"), Some(BundleFormat::Json));
        assert_eq!(BundleFormat::from_name("bin"), Some(BundleFormat::Binary));
        assert_eq!(BundleFormat::from_name("pickle"), None);
        assert_eq!(BundleFormat::Binary.to_string(), "binary");
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maize.bundle");
        write_bundle(&path, &sample_bundle(), BundleFormat::Binary).unwrap();
        let (format, bundle) = read_bundle(&path).unwrap();
        assert_eq!(format, BundleFormat::Binary);
        assert_eq!(bundle, sample_bundle());
    }
}
