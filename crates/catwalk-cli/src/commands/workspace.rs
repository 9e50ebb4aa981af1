//! Shared plumbing for the commands: reading documents from disk and wiring
//! the core services from configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use catwalk_adapters::{
    AccountWishlists, DefaultFieldVisitorFactory, FixtureStreamHandler, InMemoryTasticStore,
    InMemoryWishlistApi, LimitTrimOptimizer, TasticDefinitionLoader,
};
use catwalk_core::{
    domain::{ActionDispatchTable, ActionOverrides, Context},
    prelude::*,
};

use crate::{
    cli::ContextArgs,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
};

/// Read and deserialise a JSON document.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    if !path.is_file() {
        return Err(CliError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let raw = fs::read_to_string(path)
        .with_cli_context(|| format!("Failed to read '{}'", path.display()))?;
    serde_json::from_str(&raw).map_err(|source| CliError::InvalidDocument {
        path: path.to_path_buf(),
        source,
    })
}

/// [`read_json`] for optional inputs; absent means the type's default.
pub fn read_json_or_default<T: DeserializeOwned + Default>(path: Option<&Path>) -> CliResult<T> {
    path.map(read_json).transpose().map(Option::unwrap_or_default)
}

/// Tastic field data keyed by tastic id.
pub fn read_field_data(path: Option<&Path>) -> CliResult<Map<String, Value>> {
    read_json_or_default(path)
}

/// The request context: the context document if given, else the configured
/// defaults, with `--locale` applied last.
pub fn load_context(args: &ContextArgs, config: &AppConfig) -> CliResult<Context> {
    let mut context = match &args.context {
        Some(path) => read_json(path)?,
        None => config.context.to_context(),
    };
    if let Some(locale) = &args.locale {
        context.locale = locale.clone();
    }
    Ok(context)
}

/// Services wired from configuration, shared by the document commands.
pub struct Workspace {
    store: Arc<InMemoryTasticStore>,
    tastics_dir: PathBuf,
    fixtures_dir: PathBuf,
    action_overrides: Option<PathBuf>,
    node_schema: Option<ConfigurationSchema>,
    debug: bool,
}

impl Workspace {
    /// Load tastic definitions and locate fixtures.
    ///
    /// A missing tastics directory leaves the store empty; every tastic on a
    /// page is then skipped during analysis and completion.
    pub fn open(config: &AppConfig, config_file: Option<&Path>) -> CliResult<Self> {
        let tastics_dir = config.resolve_path(&config.paths.tastics_dir, config_file);
        let fixtures_dir = config.resolve_path(&config.paths.fixtures_dir, config_file);
        let action_overrides = config
            .paths
            .action_overrides
            .as_deref()
            .map(|path| config.resolve_path(path, config_file));
        let node_schema = config
            .paths
            .node_schema
            .as_deref()
            .map(|path| read_json(&config.resolve_path(path, config_file)))
            .transpose()?;

        let store = Arc::new(InMemoryTasticStore::new());
        if tastics_dir.is_dir() {
            let loaded = TasticDefinitionLoader::new(&tastics_dir)
                .load_into(store.as_ref())
                .with_cli_context(|| "loading tastic definitions")?;
            info!(count = loaded, dir = %tastics_dir.display(), "Loaded tastic definitions");
        } else {
            warn!(dir = %tastics_dir.display(), "Tastics directory not found; no definitions loaded");
        }

        Ok(Self {
            store,
            tastics_dir,
            fixtures_dir,
            action_overrides,
            node_schema,
            debug: config.stream.debug,
        })
    }

    /// Force debug failure payloads on top of `stream.debug`.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug |= debug;
        self
    }

    pub fn store(&self) -> &InMemoryTasticStore {
        &self.store
    }

    pub fn tastics_dir(&self) -> &Path {
        &self.tastics_dir
    }

    /// Built-in handlers plus one fixture handler per fixture found.
    /// Fixtures replace built-in handlers of the same stream type.
    pub fn handler_registry(&self) -> CliResult<StreamHandlerRegistry> {
        let mut registry = StreamHandlerRegistry::new()
            .with_handler(Arc::new(AccountWishlists::new(Arc::new(InMemoryWishlistApi::new()))));

        if self.fixtures_dir.is_dir() {
            let handlers = FixtureStreamHandler::discover(&self.fixtures_dir).with_cli_context(|| {
                format!("Failed to scan fixtures in '{}'", self.fixtures_dir.display())
            })?;
            for handler in handlers {
                registry.register(Arc::new(handler));
            }
        } else {
            debug!(dir = %self.fixtures_dir.display(), "No fixtures directory");
        }

        debug!(stream_types = ?registry.stream_types(), "Stream handlers registered");
        Ok(registry)
    }

    pub fn stream_service(&self) -> CliResult<StreamService> {
        Ok(StreamService::new(self.handler_registry()?, self.store.clone())
            .with_optimizer(Arc::new(LimitTrimOptimizer::new()))
            .with_debug(self.debug))
    }

    pub fn completion_service(&self) -> PageDataCompletionService {
        let service = PageDataCompletionService::new(
            self.store.clone(),
            Arc::new(DefaultFieldVisitorFactory::new()),
        );
        match &self.node_schema {
            Some(schema) => service.with_node_schema(schema.clone()),
            None => service,
        }
    }

    pub fn page_view_service(&self) -> CliResult<PageViewService> {
        Ok(PageViewService::new(
            self.completion_service(),
            self.stream_service()?,
        ))
    }

    /// The action dispatch table from `paths.action_overrides`; empty when
    /// none is configured.
    pub fn action_table(&self) -> CliResult<ActionDispatchTable> {
        let overrides: ActionOverrides = read_json_or_default(self.action_overrides.as_deref())?;
        ActionDispatchTable::from_overrides(&overrides)
            .map_err(|e| CliError::Core(e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(root: &Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.paths.tastics_dir = root.join("tastics");
        config.paths.fixtures_dir = root.join("fixtures");
        config
    }

    #[test]
    fn read_json_reports_missing_and_invalid_files() {
        let dir = TempDir::new().unwrap();
        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ nope").unwrap();

        assert!(matches!(
            read_json::<Value>(&dir.path().join("absent.json")),
            Err(CliError::FileNotFound { .. })
        ));
        assert!(matches!(
            read_json::<Value>(&broken),
            Err(CliError::InvalidDocument { .. })
        ));
    }

    #[test]
    fn locale_flag_overrides_configured_context() {
        let args = ContextArgs {
            context: None,
            locale: Some("de_DE".into()),
        };

        let context = load_context(&args, &AppConfig::default()).unwrap();

        assert_eq!(context.locale, "de_DE");
        assert_eq!(context.project.default_language, "en_GB");
    }

    #[test]
    fn missing_directories_give_an_empty_workspace() {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::open(&config_in(dir.path()), None).unwrap();

        assert!(workspace.store().is_empty());
        let registry = workspace.handler_registry().unwrap();
        assert_eq!(registry.stream_types(), vec!["account-wishlists"]);
        assert!(workspace.action_table().unwrap().is_empty());
    }

    #[test]
    fn fixtures_register_handlers() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("fixtures")).unwrap();
        fs::write(dir.path().join("fixtures/product-list.json"), "[]").unwrap();

        let workspace = Workspace::open(&config_in(dir.path()), None).unwrap();

        assert!(workspace.handler_registry().unwrap().contains("product-list"));
    }
}
