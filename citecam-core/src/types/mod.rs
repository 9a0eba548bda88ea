//! Core types shared by the lookup, storage and pipeline layers

mod citation;
mod identifier;
mod notice;
mod record;

pub use citation::{Citation, PendingIdentifier};
pub use identifier::{Isbn, ISBN13_LEN};
pub use notice::{Notice, NoticeKind};
pub use record::{extract_year, BibliographicRecord};
