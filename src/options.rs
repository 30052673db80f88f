use std::path::Path;

use serde::Deserialize;

use crate::env::Environment;

/// Extensions that mark `argv[1]` as a script run by an interpreter, in which
/// case the script, not the interpreter, names the application.
pub const SCRIPT_EXTENSIONS: &[&str] = &["js", "mjs", "cjs", "ts", "py", "rb", "pl", "lua", "sh"];

pub const UNKNOWN_APP_NAME: &str = "unknown";

const DEFAULT_DIR_MODE: u32 = 0o755;

/// Caller-supplied options. Every field left as `None` is filled in from the
/// environment by [`ResolverOptions::settle`].
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverOptions {
    pub app_name: Option<String>,
    pub data_dir_mode: Option<u32>,
    pub data_dir_auto_create: Option<bool>,
    pub data_dir_auto_remove: Option<bool>,
}

impl ResolverOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    pub fn data_dir_mode(mut self, mode: u32) -> Self {
        self.data_dir_mode = Some(mode);
        self
    }

    pub fn data_dir_auto_create(mut self, enabled: bool) -> Self {
        self.data_dir_auto_create = Some(enabled);
        self
    }

    pub fn data_dir_auto_remove(mut self, enabled: bool) -> Self {
        self.data_dir_auto_remove = Some(enabled);
        self
    }

    /// Merge these overrides over the defaults derived from `env`.
    pub fn settle(&self, env: &impl Environment) -> Settings {
        Settings {
            app_name: self
                .app_name
                .clone()
                .unwrap_or_else(|| default_app_name(env)),
            data_dir_mode: self
                .data_dir_mode
                .unwrap_or_else(|| default_dir_mode(env.umask())),
            data_dir_auto_create: self.data_dir_auto_create.unwrap_or(true),
            data_dir_auto_remove: self.data_dir_auto_remove.unwrap_or(true),
        }
    }
}

/// The options a resolve call actually runs with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub app_name: String,
    pub data_dir_mode: u32,
    pub data_dir_auto_create: bool,
    pub data_dir_auto_remove: bool,
}

/// Host-supplied name, else the stem of a script passed as `argv[1]`, else
/// [`UNKNOWN_APP_NAME`].
pub fn default_app_name(env: &impl Environment) -> String {
    if let Some(name) = env.host_app_name() {
        return name;
    }
    env.args()
        .get(1)
        .and_then(|arg| script_stem(Path::new(arg)))
        .unwrap_or_else(|| UNKNOWN_APP_NAME.to_string())
}

fn script_stem(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?;
    if !SCRIPT_EXTENSIONS.contains(&ext) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    Some(stem.to_string())
}

/// `0755` minus whatever the umask takes away.
pub fn default_dir_mode(umask: u32) -> u32 {
    DEFAULT_DIR_MODE & !umask
}
