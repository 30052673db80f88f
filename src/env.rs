use std::collections::HashMap;
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
#[cfg(unix)]
use std::sync::{Mutex, PoisonError};

/// The platform families that pick a different data directory base.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    /// Linux, the BSDs and everything else that follows the XDG layout.
    Xdg,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Xdg
        }
    }
}

/// Everything the resolver reads from the outside world, except the
/// filesystem itself.
pub trait Environment {
    fn var_os(&self, key: &str) -> Option<OsString>;

    /// The OS query for the current user's home, used when neither
    /// `USERPROFILE` nor `HOME` is set.
    fn os_home_dir(&self) -> Option<PathBuf>;

    fn current_dir(&self) -> io::Result<PathBuf>;

    fn platform(&self) -> Platform;

    /// Process arguments, including `argv[0]`.
    fn args(&self) -> Vec<OsString>;

    fn umask(&self) -> u32;

    /// Name supplied by an embedding host that knows its own application name.
    fn host_app_name(&self) -> Option<String> {
        None
    }

    /// Like [`Environment::var_os`], but treats an empty value as unset.
    fn non_empty_var(&self, key: &str) -> Option<OsString> {
        self.var_os(key).filter(|v| !v.is_empty())
    }
}

/// The real process environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var_os(&self, key: &str) -> Option<OsString> {
        std::env::var_os(key)
    }

    fn os_home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        std::env::current_dir()
    }

    fn platform(&self) -> Platform {
        Platform::current()
    }

    fn args(&self) -> Vec<OsString> {
        std::env::args_os().collect()
    }

    fn umask(&self) -> u32 {
        process_umask()
    }
}

#[cfg(target_os = "linux")]
fn process_umask() -> u32 {
    std::fs::read_to_string("/proc/self/status")
        .ok()
        .and_then(|status| umask_from_status(&status))
        .unwrap_or_else(swap_umask)
}

#[cfg(all(unix, not(target_os = "linux")))]
fn process_umask() -> u32 {
    swap_umask()
}

/// Parse the `Umask:` line of `/proc/<pid>/status` (Linux 4.7+).
#[cfg(any(target_os = "linux", test))]
fn umask_from_status(status: &str) -> Option<u32> {
    let value = status.lines().find_map(|line| line.strip_prefix("Umask:"))?;
    u32::from_str_radix(value.trim(), 8).ok()
}

#[cfg(unix)]
static UMASK_LOCK: Mutex<()> = Mutex::new(());

/// umask(2) has no read-only form: set a value, then put the old one back.
/// The lock keeps concurrent readers from restoring each other's probe value.
#[cfg(unix)]
fn swap_umask() -> u32 {
    let _guard = UMASK_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let old = unsafe { libc::umask(0o022) };
    unsafe { libc::umask(old) };
    old as u32
}

#[cfg(not(unix))]
fn process_umask() -> u32 {
    0
}

/// An environment with every input fixed up front. Useful for embedders that
/// already know their paths, and for exercising each platform branch without
/// touching the real process state.
#[derive(Clone, Debug)]
pub struct FixedEnv {
    vars: HashMap<String, OsString>,
    os_home_dir: Option<PathBuf>,
    current_dir: PathBuf,
    platform: Platform,
    args: Vec<OsString>,
    umask: u32,
    host_app_name: Option<String>,
}

impl FixedEnv {
    pub fn new(platform: Platform) -> Self {
        Self {
            vars: HashMap::new(),
            os_home_dir: None,
            current_dir: PathBuf::from("/"),
            platform,
            args: Vec::new(),
            umask: 0o022,
            host_app_name: None,
        }
    }

    pub fn with_var(mut self, key: &str, value: impl Into<OsString>) -> Self {
        self.vars.insert(key.to_string(), value.into());
        self
    }

    pub fn with_os_home(mut self, path: impl Into<PathBuf>) -> Self {
        self.os_home_dir = Some(path.into());
        self
    }

    pub fn with_cwd(mut self, path: impl Into<PathBuf>) -> Self {
        self.current_dir = path.into();
        self
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_umask(mut self, umask: u32) -> Self {
        self.umask = umask;
        self
    }

    pub fn with_host_app_name(mut self, name: &str) -> Self {
        self.host_app_name = Some(name.to_string());
        self
    }
}

impl Environment for FixedEnv {
    fn var_os(&self, key: &str) -> Option<OsString> {
        self.vars.get(key).cloned()
    }

    fn os_home_dir(&self) -> Option<PathBuf> {
        self.os_home_dir.clone()
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        Ok(self.current_dir.clone())
    }

    fn platform(&self) -> Platform {
        self.platform
    }

    fn args(&self) -> Vec<OsString> {
        self.args.clone()
    }

    fn umask(&self) -> u32 {
        self.umask
    }

    fn host_app_name(&self) -> Option<String> {
        self.host_app_name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_var_counts_as_unset() {
        let env = FixedEnv::new(Platform::Xdg)
            .with_var("HOME", "")
            .with_var("XDG_CONFIG_HOME", "/cfg");
        assert!(env.var_os("HOME").is_some());
        assert!(env.non_empty_var("HOME").is_none());
        assert_eq!(env.non_empty_var("XDG_CONFIG_HOME"), Some("/cfg".into()));
    }

    #[test]
    fn parses_umask_from_proc_status() {
        let status = "Name:\tsyspath\nUmask:\t0027\nState:\tR (running)\n";
        assert_eq!(umask_from_status(status), Some(0o027));
        assert_eq!(umask_from_status("Name:\tsyspath\n"), None);
    }

    #[cfg(unix)]
    #[test]
    fn concurrent_umask_reads_keep_the_original() {
        let original = process_umask();

        for read in [process_umask as fn() -> u32, swap_umask] {
            let readers: Vec<_> = (0..8)
                .map(|_| {
                    std::thread::spawn(move || (0..200).map(|_| read()).collect::<Vec<_>>())
                })
                .collect();
            for reader in readers {
                assert!(reader.join().unwrap().iter().all(|mask| *mask == original));
            }
        }

        assert_eq!(process_umask(), original);
        assert_eq!(swap_umask(), original);
    }
}
