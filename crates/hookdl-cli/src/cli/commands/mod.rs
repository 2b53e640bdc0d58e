//! CLI command handlers, one per file.

mod check;
mod install;
mod integrity;
mod platform;
mod run;

pub use check::run_check;
pub use install::run_install;
pub use integrity::run_integrity;
pub use platform::run_platform;
pub use run::run_program;
