//! `catwalk init`: write a default configuration file.

use std::path::PathBuf;

use crate::{
    cli::{GlobalArgs, InitArgs},
    config::{AppConfig, LOCAL_CONFIG_FILE},
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

pub fn execute(args: InitArgs, global: GlobalArgs, output: OutputManager) -> CliResult<()> {
    let config_path = target_path(&args, &global);

    if config_path.exists() && !args.force {
        output.warning(&format!(
            "Config already exists at {}  (use --force to overwrite)",
            config_path.display(),
        ))?;
        return Ok(());
    }

    let toml = toml::to_string_pretty(&AppConfig::default()).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise default config: {e}"),
        source: Some(Box::new(e)),
    })?;

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_cli_context(|| {
            format!("Failed to create config directory '{}'", parent.display())
        })?;
    }

    std::fs::write(&config_path, &toml)
        .with_cli_context(|| format!("Failed to write config to '{}'", config_path.display()))?;

    output.success(&format!(
        "Configuration created at {}",
        config_path.display(),
    ))?;

    Ok(())
}

/// `--config` wins, then `--local`, then the platform config directory.
fn target_path(args: &InitArgs, global: &GlobalArgs) -> PathBuf {
    if let Some(path) = &global.config {
        return path.clone();
    }
    if args.local {
        return PathBuf::from(LOCAL_CONFIG_FILE);
    }
    AppConfig::global_config_path().unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    fn global(config: Option<&str>) -> GlobalArgs {
        GlobalArgs {
            verbose: 0,
            quiet: true,
            no_color: true,
            config: config.map(PathBuf::from),
            output_format: OutputFormat::Plain,
        }
    }

    #[test]
    fn explicit_config_path_wins() {
        let args = InitArgs {
            local: true,
            force: false,
        };
        assert_eq!(
            target_path(&args, &global(Some("/tmp/catwalk.toml"))),
            PathBuf::from("/tmp/catwalk.toml")
        );
    }

    #[test]
    fn local_flag_targets_current_directory() {
        let args = InitArgs {
            local: true,
            force: false,
        };
        assert_eq!(target_path(&args, &global(None)), PathBuf::from(LOCAL_CONFIG_FILE));
    }
}
