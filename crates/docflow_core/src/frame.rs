/// One decoded update-channel frame.
///
/// Frames are deliberately a single record with all-optional fields rather
/// than a closed variant type: a frame may simultaneously carry a log entry,
/// the terminal response, and a file completion, and each applicable folding
/// rule is applied independently.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateFrame {
    /// Discriminant (`call_log`, `final_response`, or anything else).
    pub kind: Option<String>,
    /// Originating backend service for log frames.
    pub service: Option<String>,
    /// Log text or final response text, depending on `kind`.
    pub message: Option<String>,
    /// Log severity tag (`info`, `success`, `error`).
    pub log_type: Option<String>,
    /// Output filename for file-completion frames.
    pub file_name: Option<String>,
    /// File status tag (`done`, `error`, or other).
    pub status: Option<String>,
    /// Server-relative download path for file-completion frames.
    pub download_url: Option<String>,
}
