use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// User-visible message about an item the pipeline skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// 1-based position of the item in the feed
    pub position: usize,
    pub item_title: String,
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn warning(position: usize, item_title: &str, message: impl Into<String>) -> Self {
        Self {
            position,
            item_title: item_title.to_string(),
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(position: usize, item_title: &str, message: impl Into<String>) -> Self {
        Self {
            position,
            item_title: item_title.to_string(),
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Format: "({position}) {marker} {message}"
    pub fn format(&self) -> String {
        let marker = match self.level {
            NoticeLevel::Warning => "warning:",
            NoticeLevel::Error => "error:",
        };
        format!("({}) {} {}", self.position, marker, self.message)
    }
}
