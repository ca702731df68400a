//! Remote plugin discovery and execution
//!
//! Plugins are discovered from:
//! 1. `.c4/plugins/` directory
//! 2. PATH (executables starting with "c4-remote-")

use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use anyhow::{Context, Result};

use super::protocol::{PluginManifest, PluginRequest, PluginResponse};

/// Executable name prefix of remote plugins
pub const PLUGIN_PREFIX: &str = "c4-remote-";

/// Information about a discovered plugin
#[derive(Debug, Clone)]
pub struct PluginInfo {
    /// Executable name, including the prefix
    pub name: String,

    /// Path to the plugin executable
    pub path: PathBuf,

    /// Plugin manifest (loaded on demand)
    pub manifest: Option<PluginManifest>,
}

/// Plugin loader and executor
#[derive(Debug, Default)]
pub struct PluginLoader {
    plugins: HashMap<String, PluginInfo>,

    /// Searched before PATH
    plugin_dirs: Vec<PathBuf>,

    /// Skip PATH entirely
    local_only: bool,
}

impl PluginLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// A loader that ignores PATH and only searches added directories
    pub fn local_only() -> Self {
        Self {
            local_only: true,
            ..Self::default()
        }
    }

    /// Adds a plugin directory to search
    pub fn add_plugin_dir(&mut self, dir: impl Into<PathBuf>) {
        self.plugin_dirs.push(dir.into());
    }

    /// Discovers all available plugins
    ///
    /// Project directories are scanned first, so a project-local plugin
    /// shadows one of the same name on PATH.
    pub fn discover(&mut self) -> Result<()> {
        self.plugins.clear();

        for dir in self.plugin_dirs.clone() {
            self.scan_directory(&dir);
        }

        if !self.local_only {
            if let Some(path_var) = std::env::var_os("PATH") {
                for dir in std::env::split_paths(&path_var) {
                    self.scan_directory(&dir);
                }
            }
        }

        log::debug!(plugins = self.plugins.len(); "discovered remote plugins");
        Ok(())
    }

    fn scan_directory(&mut self, dir: &Path) {
        // Unreadable directories are skipped
        let Ok(entries) = std::fs::read_dir(dir) else {
            return;
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let name = name.trim_end_matches(".exe").to_string();

            if name.starts_with(PLUGIN_PREFIX)
                && name.len() > PLUGIN_PREFIX.len()
                && is_executable(&path)
            {
                // First found wins
                self.plugins.entry(name.clone()).or_insert(PluginInfo {
                    name,
                    path,
                    manifest: None,
                });
            }
        }
    }

    /// Lists all discovered plugins, sorted by name
    pub fn list(&self) -> Vec<&PluginInfo> {
        let mut plugins: Vec<&PluginInfo> = self.plugins.values().collect();
        plugins.sort_by(|a, b| a.name.cmp(&b.name));
        plugins
    }

    /// Gets a plugin by its short name ("structurizr") or executable name
    pub fn get(&self, name: &str) -> Option<&PluginInfo> {
        self.plugins
            .get(name)
            .or_else(|| self.plugins.get(&executable_name(name)))
    }

    /// Gets the manifest for a plugin (loads if needed)
    pub fn get_manifest(&mut self, name: &str) -> Result<Option<PluginManifest>> {
        let key = match self.get(name) {
            Some(info) => info.name.clone(),
            None => return Ok(None),
        };
        let Some(info) = self.plugins.get_mut(&key) else {
            return Ok(None);
        };
        if info.manifest.is_none() {
            info.manifest = Some(load_manifest(&info.path)?);
        }
        Ok(info.manifest.clone())
    }

    /// Executes a plugin request
    pub fn execute(&self, name: &str, request: &PluginRequest) -> Result<PluginResponse> {
        let info = self
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Plugin not found: {}", executable_name(name)))?;

        log::debug!(
            plugin = info.name.as_str(),
            operation = request.operation.as_str();
            "executing remote plugin"
        );

        let mut child = Command::new(&info.path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to spawn plugin: {}", info.path.display()))?;

        let written = write_request(&mut child, request);

        // Collects stdout and stderr and reaps the child on every path
        let output = child
            .wait_with_output()
            .with_context(|| format!("Failed to wait for plugin {}", info.name))?;
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            anyhow::bail!(
                "Plugin {} exited with {}: {}",
                info.name,
                output.status,
                stderr.trim()
            );
        }
        written?;
        if !stderr.trim().is_empty() {
            log::debug!(plugin = info.name.as_str(); "plugin stderr: {}", stderr.trim());
        }

        let response_line = output
            .stdout
            .as_slice()
            .lines()
            .next()
            .ok_or_else(|| anyhow::anyhow!("No response from plugin {}", info.name))?
            .context("Failed to read plugin response")?;

        serde_json::from_str(&response_line).context("Failed to parse plugin response")
    }

    /// Tests plugin connectivity
    pub fn test(&self, name: &str) -> Result<bool> {
        let request = PluginRequest::test();
        let response = self.execute(name, &request)?;
        Ok(response.success)
    }
}

/// Writes one request line, closing stdin so the plugin sees EOF
fn write_request(child: &mut Child, request: &PluginRequest) -> Result<()> {
    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| anyhow::anyhow!("Failed to open plugin stdin"))?;
    let request_json = serde_json::to_string(request).context("Failed to serialize request")?;
    writeln!(stdin, "{}", request_json).context("Failed to write to plugin")
}

/// Returns the executable name for a short plugin name
pub fn executable_name(name: &str) -> String {
    if name.starts_with(PLUGIN_PREFIX) {
        name.to_string()
    } else {
        format!("{}{}", PLUGIN_PREFIX, name)
    }
}

fn load_manifest(path: &Path) -> Result<PluginManifest> {
    let output = Command::new(path)
        .arg("--manifest")
        .output()
        .with_context(|| format!("Failed to execute plugin: {}", path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("Plugin returned error: {}", stderr.trim());
    }

    serde_json::from_slice(&output.stdout).context("Failed to parse plugin manifest")
}

fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(meta) = path.metadata() {
            return meta.is_file() && meta.permissions().mode() & 0o111 != 0;
        }
    }

    #[cfg(windows)]
    {
        if let Some(ext) = path.extension() {
            return ext == "exe" || ext == "bat" || ext == "cmd";
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn new_loader_is_empty() {
        let loader = PluginLoader::new();
        assert!(loader.list().is_empty());
    }

    #[test]
    fn discover_empty_dir() {
        let dir = TempDir::new().unwrap();
        let mut loader = PluginLoader::local_only();
        loader.add_plugin_dir(dir.path());
        loader.discover().unwrap();

        assert!(loader.list().is_empty());
    }

    #[test]
    fn executable_name_adds_prefix_once() {
        assert_eq!(executable_name("structurizr"), "c4-remote-structurizr");
        assert_eq!(executable_name("c4-remote-structurizr"), "c4-remote-structurizr");
    }

    #[test]
    fn unknown_plugin_fails_to_execute() {
        let loader = PluginLoader::local_only();
        let request = PluginRequest::test();

        let err = loader.execute("nonexistent", &request).unwrap_err();
        assert!(err.to_string().contains("c4-remote-nonexistent"));
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
            let path = dir.join(name);
            fs::write(&path, body).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        const ECHO_PLUGIN: &str = r#"#!/bin/sh
if [ "$1" = "--manifest" ]; then
  echo '{"name":"c4-remote-echo","version":"0.1.0","description":"Echo","operations":["test"]}'
  exit 0
fi
read line
echo '{"success":true,"data":{"ok":true}}'
"#;

        #[test]
        fn discovers_only_prefixed_executables() {
            let dir = TempDir::new().unwrap();
            write_script(dir.path(), "c4-remote-echo", ECHO_PLUGIN);
            write_script(dir.path(), "other-tool", ECHO_PLUGIN);
            fs::write(dir.path().join("c4-remote-readonly"), "").unwrap();

            let mut loader = PluginLoader::local_only();
            loader.add_plugin_dir(dir.path());
            loader.discover().unwrap();

            let names: Vec<&str> = loader.list().iter().map(|p| p.name.as_str()).collect();
            assert_eq!(names, vec!["c4-remote-echo"]);
            assert!(loader.get("echo").is_some());
        }

        #[test]
        fn manifest_and_test_round_trip_through_the_process() {
            let dir = TempDir::new().unwrap();
            write_script(dir.path(), "c4-remote-echo", ECHO_PLUGIN);

            let mut loader = PluginLoader::local_only();
            loader.add_plugin_dir(dir.path());
            loader.discover().unwrap();

            let manifest = loader.get_manifest("echo").unwrap().unwrap();
            assert_eq!(manifest.version, "0.1.0");
            assert!(manifest.supports("test"));
            assert!(loader.test("echo").unwrap());
        }

        #[test]
        fn silent_plugin_is_an_error() {
            let dir = TempDir::new().unwrap();
            write_script(dir.path(), "c4-remote-mute", "#!/bin/sh\nread line\n");

            let mut loader = PluginLoader::local_only();
            loader.add_plugin_dir(dir.path());
            loader.discover().unwrap();

            let err = loader.test("mute").unwrap_err();
            assert!(err.to_string().contains("No response"));
        }

        #[test]
        fn failing_plugin_reports_exit_status_and_stderr() {
            let dir = TempDir::new().unwrap();
            write_script(
                dir.path(),
                "c4-remote-broken",
                "#!/bin/sh\nread line\necho 'token expired' >&2\nexit 3\n",
            );

            let mut loader = PluginLoader::local_only();
            loader.add_plugin_dir(dir.path());
            loader.discover().unwrap();

            let err = loader.test("broken").unwrap_err().to_string();
            assert!(err.contains("c4-remote-broken"));
            assert!(err.contains('3'));
            assert!(err.contains("token expired"));
        }

        #[test]
        fn garbled_response_is_an_error_after_exit() {
            let dir = TempDir::new().unwrap();
            write_script(
                dir.path(),
                "c4-remote-garbled",
                "#!/bin/sh\nread line\necho 'not json'\n",
            );

            let mut loader = PluginLoader::local_only();
            loader.add_plugin_dir(dir.path());
            loader.discover().unwrap();

            let err = loader.test("garbled").unwrap_err();
            assert!(format!("{:#}", err).contains("Failed to parse plugin response"));
        }
    }
}
