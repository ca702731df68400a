//! Plugin remote: delegates get/put to a `c4-remote-<name>` executable

use anyhow::{Context, Result};
use serde_json::Value;

use super::loader::{executable_name, PluginLoader};
use super::protocol::PluginRequest;
use super::WorkspaceRemote;

/// A remote backed by an external plugin process
#[derive(Debug)]
pub struct PluginRemote {
    name: String,
    plugin: String,
    loader: PluginLoader,
}

impl PluginRemote {
    /// Binds to `plugin`, which must already be discovered by `loader`
    pub fn new(name: impl Into<String>, plugin: &str, loader: PluginLoader) -> Result<Self> {
        let info = loader.get(plugin).ok_or_else(|| {
            anyhow::anyhow!(
                "Plugin not found: {}. Install it on PATH or in .c4/plugins/",
                executable_name(plugin)
            )
        })?;
        let plugin = info.name.clone();

        Ok(Self {
            name: name.into(),
            plugin,
            loader,
        })
    }

    /// Executable name of the bound plugin
    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    fn call(&self, request: PluginRequest) -> Result<Option<Value>> {
        self.loader
            .execute(&self.plugin, &request)?
            .into_result(&request.operation)
    }
}

impl WorkspaceRemote for PluginRemote {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_workspace(&self, workspace_id: i64) -> Result<Option<String>> {
        let data = self.call(PluginRequest::get(workspace_id))?;

        // Plugins may answer with the document itself or with its text
        Ok(data.map(|value| match value {
            Value::String(text) => text,
            other => other.to_string(),
        }))
    }

    fn put_workspace(&self, workspace_id: i64, json: &str) -> Result<()> {
        let workspace: Value =
            serde_json::from_str(json).context("Workspace to push is not valid JSON")?;
        self.call(PluginRequest::put(workspace_id, workspace))?;
        Ok(())
    }

    fn test(&self) -> Result<bool> {
        self.loader.test(&self.plugin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_plugin_is_rejected() {
        let err = PluginRemote::new("cloud", "nope", PluginLoader::local_only()).unwrap_err();
        assert!(err.to_string().contains("c4-remote-nope"));
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use std::path::Path;
        use tempfile::TempDir;

        /// Stores the last pushed workspace next to itself
        fn install_file_plugin(dir: &Path) {
            let store = dir.join("stored.json");
            let script = format!(
                r#"#!/bin/sh
read line
case "$line" in
  *'"operation":"put"'*)
    echo "$line" > '{store}'
    echo '{{"success":true}}'
    ;;
  *'"operation":"get"'*)
    if [ -f '{store}' ]; then
      echo '{{"success":true,"data":{{"name":"Stored"}}}}'
    else
      echo '{{"success":true,"data":null}}'
    fi
    ;;
  *)
    echo '{{"success":false,"error":"unsupported"}}'
    ;;
esac
"#,
                store = store.display()
            );
            let path = dir.join("c4-remote-file");
            fs::write(&path, script).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }

        fn remote(dir: &Path) -> PluginRemote {
            let mut loader = PluginLoader::local_only();
            loader.add_plugin_dir(dir);
            loader.discover().unwrap();
            PluginRemote::new("cloud", "file", loader).unwrap()
        }

        #[test]
        fn get_put_through_plugin() {
            let dir = TempDir::new().unwrap();
            install_file_plugin(dir.path());
            let remote = remote(dir.path());

            assert_eq!(remote.plugin(), "c4-remote-file");
            assert!(remote.get_workspace(5).unwrap().is_none());

            remote.put_workspace(5, r#"{"name":"Bank"}"#).unwrap();
            let sent = fs::read_to_string(dir.path().join("stored.json")).unwrap();
            assert!(sent.contains(r#""workspace_id":5"#));
            assert!(sent.contains(r#""name":"Bank""#));

            let fetched = remote.get_workspace(5).unwrap().unwrap();
            assert_eq!(fetched, r#"{"name":"Stored"}"#);
        }

        #[test]
        fn unsupported_test_reports_false() {
            let dir = TempDir::new().unwrap();
            install_file_plugin(dir.path());
            let remote = remote(dir.path());

            assert!(!remote.test().unwrap());
        }

        #[test]
        fn invalid_json_is_not_sent() {
            let dir = TempDir::new().unwrap();
            install_file_plugin(dir.path());
            let remote = remote(dir.path());

            assert!(remote.put_workspace(5, "{ nope").is_err());
            assert!(!dir.path().join("stored.json").exists());
        }
    }
}
