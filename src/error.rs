//! Structured error types for xlgrid.

/// All errors that can occur while reading a workbook or driving the viewer.
#[derive(Debug, thiserror::Error)]
pub enum XlgridError {
    /// XML parsing error from quick-xml.
    #[error("XML parsing: {0}")]
    Xml(#[from] quick_xml::Error),

    /// ZIP archive error.
    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// General parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// JSON (de)serialization of view state or layout descriptors.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, XlgridError>;

impl From<String> for XlgridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for XlgridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<XlgridError> for wasm_bindgen::JsValue {
    fn from(e: XlgridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
