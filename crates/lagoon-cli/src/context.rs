use anyhow::Context as _;
use lagoon_core::action_log::{ActionLogs, FileActionLog, TracingActionLog};
use lagoon_core::config::AssistConfig;
use lagoon_core::executor::Executor;
use lagoon_core::ops::{Operations, Session};
use lagoon_core::paths;
use std::path::{Path, PathBuf};

/// Global flags shared by every subcommand.
pub struct Globals {
    pub home: Option<PathBuf>,
    pub instance: Option<String>,
    pub project: Option<String>,
    pub lagoon_bin: Option<String>,
    pub git_bin: Option<String>,
    pub json: bool,
}

/// Everything a command needs: resolved config, session selection and the
/// executor that all Lagoon/git invocations go through.
pub struct Context {
    pub home: PathBuf,
    pub config: AssistConfig,
    pub session: Session,
    pub json: bool,
    executor: Executor,
}

impl Context {
    /// Resolution order for each setting: flag / env var, then
    /// `~/.lagoon-assist/config.yaml`, then the built-in default.
    pub fn load(globals: Globals) -> anyhow::Result<Self> {
        let home = match globals.home {
            Some(h) => h,
            None => paths::home_dir()?,
        };
        let mut config = AssistConfig::load(&home).context("failed to load config")?;
        if let Some(bin) = globals.lagoon_bin {
            config.lagoon_binary = bin;
        }
        if let Some(bin) = globals.git_bin {
            config.git_binary = bin;
        }

        let session = Session::new(
            globals.instance.or_else(|| config.default_instance.clone()),
            globals.project.or_else(|| config.default_project.clone()),
        );

        let mut logs = ActionLogs::new().push(TracingActionLog);
        if config.file_logging {
            logs = logs.push(FileActionLog::new(config.log_dir(&home)));
        }

        Ok(Self {
            home,
            config,
            session,
            json: globals.json,
            executor: Executor::with_log(logs),
        })
    }

    pub fn ops(&self) -> Operations<'_> {
        Operations::new(&self.executor)
            .with_binaries(&self.config.lagoon_binary, &self.config.git_binary)
    }

    pub fn lagoon_config_path(&self) -> PathBuf {
        self.config.lagoon_config_path(&self.home)
    }

    pub fn expand(&self, path: &Path) -> PathBuf {
        match path.to_str() {
            Some(s) => paths::expand_tilde(s, &self.home),
            None => path.to_path_buf(),
        }
    }
}
