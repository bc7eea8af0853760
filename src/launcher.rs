//! §4.1b Launcher — spawns a local browser child process and exposes the
//! `Start`/`Wait`/`Shutdown`/`Port` surface named in §6. The driver itself
//! only ever speaks to an already-running browser through `Transport`;
//! this is the optional convenience that gets one running.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use tokio::process::{Child, Command};

use crate::error::{CdpError, Result};

/// Flags named in §6: `remote-debugging-port`, `user-data-dir`,
/// `headless`, `no-sandbox`, `no-first-run`, `proxy-server`,
/// `window-size`, `user-agent`.
#[derive(Debug, Clone)]
pub struct LauncherConfig {
    pub executable: Option<PathBuf>,
    pub port: u16,
    pub user_data_dir: Option<PathBuf>,
    pub headless: bool,
    pub sandbox: bool,
    pub no_first_run: bool,
    pub proxy_server: Option<String>,
    pub window_size: Option<(u32, u32)>,
    pub user_agent: Option<String>,
    pub extra_args: Vec<String>,
    pub process_envs: Option<HashMap<String, String>>,
    /// How long `start` waits for the debugging port to become
    /// connectable before giving up.
    pub startup_timeout: Duration,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            executable: None,
            port: 0,
            user_data_dir: None,
            headless: true,
            sandbox: true,
            no_first_run: true,
            proxy_server: None,
            window_size: None,
            user_agent: None,
            extra_args: Vec::new(),
            process_envs: None,
            startup_timeout: Duration::from_secs(20),
        }
    }
}

impl LauncherConfig {
    fn args(&self, port: u16) -> Vec<String> {
        let mut args = vec![format!("--remote-debugging-port={port}")];
        if let Some(dir) = &self.user_data_dir {
            args.push(format!("--user-data-dir={}", dir.display()));
        }
        if self.headless {
            args.push("--headless=new".to_string());
        }
        if !self.sandbox {
            args.push("--no-sandbox".to_string());
        }
        if self.no_first_run {
            args.push("--no-first-run".to_string());
        }
        if let Some(proxy) = &self.proxy_server {
            args.push(format!("--proxy-server={proxy}"));
        }
        if let Some((w, h)) = self.window_size {
            args.push(format!("--window-size={w},{h}"));
        }
        if let Some(ua) = &self.user_agent {
            args.push(format!("--user-agent={ua}"));
        }
        args.extend(self.extra_args.iter().cloned());
        args
    }
}

/// A running (or not-yet-started) browser child process.
pub struct Launcher {
    config: LauncherConfig,
    child: Option<Child>,
    port: u16,
}

impl Launcher {
    pub fn new(config: LauncherConfig) -> Self {
        let port = config.port;
        Self { config, child: None, port }
    }

    /// Spawns the child process and waits until the debugging port is
    /// accepting connections (or `startup_timeout` elapses).
    pub async fn start(&mut self) -> Result<()> {
        let executable = match &self.config.executable {
            Some(path) => path.clone(),
            None => default_executable().map_err(CdpError::Launch)?,
        };
        let port = if self.config.port == 0 { pick_free_port()? } else { self.config.port };
        self.port = port;

        let mut cmd = Command::new(executable);
        cmd.args(self.config.args(port));
        cmd.kill_on_drop(true);
        if let Some(envs) = &self.config.process_envs {
            cmd.envs(envs);
        }
        let child = cmd.spawn().map_err(CdpError::Io)?;
        self.child = Some(child);

        let deadline = tokio::time::Instant::now() + self.config.startup_timeout;
        loop {
            if tokio::net::TcpStream::connect(("127.0.0.1", port)).await.is_ok() {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(CdpError::Timeout("LauncherStart", self.config.startup_timeout));
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }

    /// Blocks until the child process exits on its own.
    pub async fn wait(&mut self) -> Result<std::process::ExitStatus> {
        let child = self.child.as_mut().ok_or(CdpError::InvalidTarget)?;
        child.wait().await.map_err(CdpError::Io)
    }

    /// Kills the child process if still running.
    pub async fn shutdown(&mut self) -> Result<()> {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill().await;
        }
        Ok(())
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// The `http://127.0.0.1:<port>` endpoint URL the core connects
    /// through (§6 "a factory that returns an endpoint URL").
    pub fn endpoint_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }
}

fn pick_free_port() -> Result<u16> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").map_err(CdpError::Io)?;
    Ok(listener.local_addr().map_err(CdpError::Io)?.port())
}

/// Locates a Chrome/Chromium executable: the `CHROME` environment
/// variable first, then a fixed list of common binary names on `PATH`,
/// then (on macOS) the standard app bundle location.
pub fn default_executable() -> std::result::Result<PathBuf, String> {
    if let Ok(path) = std::env::var("CHROME") {
        if std::path::Path::new(&path).exists() {
            return Ok(path.into());
        }
    }

    for app in &["google-chrome-stable", "chromium", "chromium-browser", "chrome", "chrome-browser"] {
        if let Ok(path) = which::which(app) {
            return Ok(path);
        }
    }

    #[cfg(target_os = "macos")]
    {
        let default_paths = &["/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"][..];
        for path in default_paths {
            if std::path::Path::new(path).exists() {
                return Ok(path.into());
            }
        }
    }

    #[cfg(windows)]
    {
        for key_path in &[
            r"SOFTWARE\Microsoft\Windows\CurrentVersion\App Paths\chrome.exe",
            r"SOFTWARE\WOW6432Node\Microsoft\Windows\CurrentVersion\App Paths\chrome.exe",
        ] {
            if let Ok(key) = winreg::RegKey::predef(winreg::enums::HKEY_LOCAL_MACHINE).open_subkey(key_path) {
                if let Ok(path) = key.get_value::<String, _>("") {
                    if std::path::Path::new(&path).exists() {
                        return Ok(path.into());
                    }
                }
            }
        }
    }

    Err("could not auto-detect a chrome executable".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_include_requested_flags() {
        let config = LauncherConfig {
            sandbox: false,
            window_size: Some((1280, 720)),
            user_agent: Some("test-agent".to_string()),
            ..LauncherConfig::default()
        };
        let args = config.args(9222);
        assert!(args.contains(&"--remote-debugging-port=9222".to_string()));
        assert!(args.contains(&"--no-sandbox".to_string()));
        assert!(args.contains(&"--window-size=1280,720".to_string()));
        assert!(args.contains(&"--user-agent=test-agent".to_string()));
    }

    #[test]
    fn headless_flag_defaults_on() {
        let config = LauncherConfig::default();
        assert!(config.args(9222).contains(&"--headless=new".to_string()));
    }
}
