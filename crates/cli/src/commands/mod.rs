//! CLI Commands

pub mod check;
pub mod export;
pub mod init;
pub mod list;
pub mod show;

pub use check::CheckCommand;
pub use export::ExportCommand;
pub use init::InitCommand;
pub use list::ListCommand;
pub use show::ShowCommand;
