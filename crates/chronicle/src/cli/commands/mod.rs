//! CLI commands

mod generate;
mod init;
mod next_version;
mod validate;

pub use generate::GenerateCommand;
pub use init::InitCommand;
pub use next_version::NextVersionCommand;
pub use validate::ValidateCommand;
