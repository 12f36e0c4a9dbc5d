//! Seams for behaviour that touches the outside world
//!
//! - [`CommandRunner`]: run external programs (DNS cache flush)

pub mod command_runner;

pub use command_runner::{CommandRunner, SystemCommandRunner};
