pub mod document;
pub mod image;

pub use document::AoiDocument;
