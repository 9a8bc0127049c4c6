#[macro_use]
extern crate log;

mod db;
pub use db::DatabaseHandler;

mod checkpoint;
pub use checkpoint::LAST_SYNC_KEY;
