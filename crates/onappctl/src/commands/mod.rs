//! Command implementations

pub mod profile;
pub mod resources;
pub mod transactions;
pub mod wait;

use onapp_core::Client;

use crate::cli::OutputFormat;
use crate::connection::ConnectionManager;
use crate::error::Result as CliResult;
use crate::output;

/// What every API command needs from the global flags
pub struct CommandContext<'a> {
    pub conn_mgr: &'a ConnectionManager,
    pub profile: Option<&'a str>,
    pub output: OutputFormat,
    pub query: Option<&'a str>,
}

impl CommandContext<'_> {
    pub fn client(&self) -> CliResult<Client> {
        self.conn_mgr.create_client(self.profile)
    }

    /// Concrete format for this invocation; `auto` means a table unless a query asks for data
    pub fn format(&self) -> output::OutputFormat {
        match self.output {
            OutputFormat::Json => output::OutputFormat::Json,
            OutputFormat::Yaml => output::OutputFormat::Yaml,
            OutputFormat::Table => output::OutputFormat::Table,
            OutputFormat::Auto if self.query.is_some() => output::OutputFormat::Json,
            OutputFormat::Auto => output::OutputFormat::Table,
        }
    }

    /// Human-oriented output without a query
    pub fn is_plain_table(&self) -> bool {
        self.format() == output::OutputFormat::Table && self.query.is_none()
    }
}
