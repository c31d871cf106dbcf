//! Built-in tools
//!
//! Each tool is a thin wrapper over a third-party crate or OS facility,
//! declaring its schema through a registration entry and returning the
//! uniform result envelope. Credentials are read from the environment by the
//! tool that needs them; the registry never sees them.

pub mod browser;
pub mod database;
pub mod files;
pub mod http;
pub mod search;
pub mod system;

pub use browser::OpenBrowserTool;
pub use database::SqliteQueryTool;
pub use files::{FileListTool, FileReadTool, FileWriteTool};
pub use http::{DownloadFileTool, HttpRequestTool};
pub use search::WebSearchTool;
pub use system::SystemInfoTool;

use crate::error::Result;
use crate::registry::ToolRegistry;

/// Register every built-in tool.
///
/// This is the explicit, ordered registration pass run by the composition
/// root; the order here is the order tools appear in every listing.
pub fn register_builtins(registry: &ToolRegistry) -> Result<()> {
    registry.register(WebSearchTool::registration())?;
    registry.register(HttpRequestTool::registration())?;
    registry.register(DownloadFileTool::registration())?;
    registry.register(FileListTool::registration())?;
    registry.register(FileReadTool::registration())?;
    registry.register(FileWriteTool::registration())?;
    registry.register(SystemInfoTool::registration())?;
    registry.register(SqliteQueryTool::registration())?;
    registry.register(OpenBrowserTool::registration())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_builtins_registers_all_tools() {
        let registry = ToolRegistry::new();
        register_builtins(&registry).unwrap();

        let names = registry.tool_names();
        assert_eq!(names.len(), 9);
        assert_eq!(names[0], "web_search");
        assert!(names.contains(&"sqlite_query".to_string()));
        assert!(names.contains(&"open_browser".to_string()));
    }

    #[test]
    fn test_double_registration_fails() {
        let registry = ToolRegistry::new();
        register_builtins(&registry).unwrap();
        assert!(register_builtins(&registry).is_err());
    }
}
