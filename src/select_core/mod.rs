pub mod cli;
pub mod config;
pub mod convert;
pub mod database;
pub mod driver;
pub mod error;
pub mod materialize;
pub mod prompt;
pub mod record;
pub mod selector;
pub mod sync;

pub use cli::{Cli, ListFormat, TransferMode};
pub use config::{Action, Config, TransferOptions, Verbosity};
pub use convert::{Converter, ImageMagick};
pub use database::Database;
pub use driver::{list_records, select_records, transfer_records};
pub use error::SelectError;
pub use materialize::{MaterializeReport, Materializer};
pub use prompt::{Prompt, StdinPrompt};
pub use record::FileRecord;
pub use selector::{SelectionQuery, select};
