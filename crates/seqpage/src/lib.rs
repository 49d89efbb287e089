//! # `seqpage`: sequentially-numbered Notion pages
//!
//! Appends pages to a Notion database while keeping a numeric "sequence"
//! property gap-free: the current maximum is read, and new pages continue
//! from it. The title property of each new page is left blank.
//!
//! ## Module Overview
//!
//! - [`service`] - [`PageCreator`], the read-then-write sequence logic.
//! - [`store`] - the [`SequenceStore`] trait the service runs against.
//! - [`notion`] - [`NotionClient`], the store backed by the Notion REST API.
//! - [`memory`] - [`MemoryStore`], an in-process store for tests and dry runs.
//!
//! ## Example
//!
//! ```no_run
//! use seqpage::{CreatePages, NotionClient, PageCreator};
//! use std::sync::Arc;
//!
//! # async fn run() {
//! let creator = PageCreator::new(Arc::new(NotionClient::new("secret_...")));
//! let result = creator
//!     .create_pages(&CreatePages {
//!         database_id: "0123456789abcdef0123456789abcdef".to_string(),
//!         title_property: "Name".to_string(),
//!         count: 3,
//!     })
//!     .await;
//! println!("{}", result.message);
//! # }
//! ```

mod error;
pub mod memory;
pub mod notion;
pub mod service;
pub mod store;
mod types;

pub use error::{Error, Result};
pub use memory::MemoryStore;
pub use notion::NotionClient;
pub use service::PageCreator;
pub use store::SequenceStore;
pub use types::{
    CreatePages, CreationResult, DEFAULT_SEQUENCE_PROPERTY, DEFAULT_TITLE_PROPERTY,
    MAX_PAGES_PER_REQUEST, PageDraft,
};
