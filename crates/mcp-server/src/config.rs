use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;
use std::path::PathBuf;

/// Filesystem tool server speaking MCP over stdio
#[derive(Debug, Clone, Parser)]
#[command(name = "fsmcp-server")]
#[command(about = "Filesystem tool server speaking MCP over stdio", long_about = None)]
#[command(version)]
pub struct ServerConfig {
    /// Directory relative tool paths resolve against (not a sandbox)
    #[arg(long, env = "FSMCP_WORKING_DIR")]
    pub working_dir: Option<PathBuf>,

    /// Log filter for stderr output; RUST_LOG takes precedence when set
    #[arg(long, env = "FSMCP_LOG", default_value = "warn")]
    pub log_level: String,
}

impl ServerConfig {
    /// Configure logging to stderr only (stdout is for MCP protocol).
    pub fn init_logging(&self) {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(self.log_level.as_str()),
        )
        .target(env_logger::Target::Stderr)
        .init();
    }

    pub fn apply_working_dir(&self) -> Result<()> {
        if let Some(dir) = &self.working_dir {
            std::env::set_current_dir(dir)
                .with_context(|| format!("Failed to enter working directory {}", dir.display()))?;
            log::info!("Serving relative paths from {}", dir.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_parse() {
        let config = ServerConfig::try_parse_from([
            "fsmcp-server",
            "--working-dir",
            "/srv/files",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(config.working_dir, Some(PathBuf::from("/srv/files")));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(ServerConfig::try_parse_from(["fsmcp-server", "--root", "/"]).is_err());
    }

    #[test]
    fn missing_working_dir_fails_with_context() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let config = ServerConfig {
            working_dir: Some(tmp.path().join("absent")),
            log_level: "warn".to_string(),
        };
        let err = config.apply_working_dir().unwrap_err();
        assert!(format!("{err:#}").contains("Failed to enter working directory"));
    }
}
