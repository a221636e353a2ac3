pub mod calendar;
pub mod chat;
pub mod dashboard;
pub mod finance;
pub mod habit;
pub mod routine;
pub mod settings;
pub mod storage;
pub mod task;

pub use calendar::*;
pub use chat::*;
pub use dashboard::*;
pub use finance::*;
pub use habit::*;
pub use routine::*;
pub use settings::*;
pub use storage::*;
pub use task::*;
