use serde::Serialize;

/// Default name of the numeric property that holds the sequence number.
pub const DEFAULT_SEQUENCE_PROPERTY: &str = "순번";

/// Default name of the title property that is left blank on every new page.
pub const DEFAULT_TITLE_PROPERTY: &str = "구매자";

/// Upper bound on the number of pages a single request may create.
pub const MAX_PAGES_PER_REQUEST: u32 = 100;

/// A request to append `count` pages to a database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePages {
    pub database_id: String,
    pub title_property: String,
    pub count: u32,
}

/// A single page to be created.
///
/// The title is always written empty; only the sequence value varies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDraft {
    pub title_property: String,
    pub sequence_property: String,
    pub sequence: i64,
}

/// Outcome of a page-creation request, serialized as the response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreationResult {
    pub success: bool,
    pub message: String,
    /// First sequence number assigned by this request.
    #[serde(rename = "next_number", skip_serializing_if = "Option::is_none")]
    pub start_number: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

impl CreationResult {
    pub fn created(start_number: i64, count: u32) -> Self {
        Self {
            success: true,
            message: format!("Created {count} page(s) starting at sequence {start_number}"),
            start_number: Some(start_number),
            count: Some(count),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            start_number: None,
            count: None,
        }
    }
}
