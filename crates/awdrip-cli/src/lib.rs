//! Library side of the `awdrip` binary: batch orchestration, archiving,
//! reports and logging setup.

pub mod archive;
pub mod logging;
pub mod pipeline;
pub mod types;
