//! Domain models for shared documents and users

mod document;
mod timestamp;
mod user;

pub use document::{Document, DocumentId, DocumentLists};
pub use user::{Recipient, UploadReceipt, User};
