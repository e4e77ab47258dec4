//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application.

pub mod check;
pub mod entry;
pub mod reference;
pub mod report;
pub mod tag;

pub use check::{
    CheckDetail, CheckError, CheckFilter, CheckRepository, CheckWithMove, SettleCheck,
    SettledCheck,
};
pub use entry::{Actor, CreatedEntry, EntryDetail, EntryError, EntryFilter, EntryRepository};
pub use reference::{
    CreateContactInput, CreateMoneySourceInput, ReferenceError, ReferenceRepository,
};
pub use report::{ReportError, ReportRepository};
pub use tag::{CreateTagInput, TagError, TagRepository};
