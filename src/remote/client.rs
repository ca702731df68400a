//! Push and pull against a remote

use anyhow::{Context, Result};
use chrono::Utc;

use super::state::{fingerprint, SyncState, SyncStateStore};
use super::WorkspaceRemote;
use crate::domain::Workspace;
use crate::exchange;

/// Result of a push
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushOutcome {
    /// False when the remote already had this content
    pub pushed: bool,

    /// Views that took layout from the remote copy
    pub merged_views: usize,

    pub fingerprint: String,
}

/// Moves one workspace between the project and a remote
pub struct SyncClient<'a> {
    remote: &'a dyn WorkspaceRemote,
    state: SyncStateStore,
    workspace_id: i64,
    merge_from_remote: bool,
}

impl<'a> SyncClient<'a> {
    pub fn new(remote: &'a dyn WorkspaceRemote, state: SyncStateStore, workspace_id: i64) -> Self {
        Self {
            remote,
            state,
            workspace_id,
            merge_from_remote: true,
        }
    }

    /// Whether to copy layout from the remote copy before pushing
    pub fn merge_from_remote(mut self, merge: bool) -> Self {
        self.merge_from_remote = merge;
        self
    }

    /// Pushes `workspace`, merging remote layout into it first
    ///
    /// The workspace is modified in place (id, merged layout and, when
    /// pushed, the modification stamp) so the caller can save it locally.
    pub fn push(&self, workspace: &mut Workspace, force: bool) -> Result<PushOutcome> {
        workspace.id = Some(self.workspace_id);

        let merged_views = if self.merge_from_remote {
            self.merge_layout(workspace)?
        } else {
            0
        };

        let mut doc = exchange::serialize(workspace);
        let fingerprint = fingerprint(&doc)?;
        let mut state = self.state.load()?;

        if !force && state.fingerprint.as_deref() == Some(fingerprint.as_str()) {
            log::info!(
                remote = self.remote.name(),
                workspace_id = self.workspace_id;
                "remote is up to date, skipping push"
            );
            return Ok(PushOutcome {
                pushed: false,
                merged_views,
                fingerprint,
            });
        }

        let now = Utc::now();
        doc.last_modified_date = Some(now);
        let json = serde_json::to_string(&doc).context("Failed to serialize workspace")?;
        self.remote
            .put_workspace(self.workspace_id, &json)
            .with_context(|| format!("Failed to push to remote '{}'", self.remote.name()))?;
        workspace.last_modified = Some(now);

        state.fingerprint = Some(fingerprint.clone());
        state.last_pushed_at = Some(now);
        self.state.save(&state)?;

        log::info!(
            remote = self.remote.name(),
            workspace_id = self.workspace_id,
            merged_views = merged_views;
            "pushed workspace"
        );

        Ok(PushOutcome {
            pushed: true,
            merged_views,
            fingerprint,
        })
    }

    fn merge_layout(&self, workspace: &mut Workspace) -> Result<usize> {
        let Some(json) = self.remote.get_workspace(self.workspace_id)? else {
            return Ok(0);
        };

        match exchange::from_json(&json) {
            Ok(remote_copy) => Ok(workspace.copy_layout_information_from(&remote_copy)),
            Err(e) => {
                // The remote copy gets replaced anyway; only its layout is lost
                log::warn!(
                    remote = self.remote.name(),
                    error:% = e;
                    "remote copy is unreadable, layout not merged"
                );
                Ok(0)
            }
        }
    }

    /// Fetches and hydrates the remote copy
    pub fn pull(&self) -> Result<Workspace> {
        let json = self
            .remote
            .get_workspace(self.workspace_id)
            .with_context(|| format!("Failed to pull from remote '{}'", self.remote.name()))?
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Remote '{}' has no workspace {}",
                    self.remote.name(),
                    self.workspace_id
                )
            })?;

        let doc = exchange::parse_document(&json)
            .with_context(|| format!("Remote '{}' sent an invalid document", self.remote.name()))?;
        let fingerprint = fingerprint(&doc)?;
        let workspace = exchange::hydrate(doc)
            .with_context(|| format!("Remote '{}' sent an invalid workspace", self.remote.name()))?;

        let mut state = self.state.load()?;
        state.fingerprint = Some(fingerprint);
        state.last_pulled_at = Some(Utc::now());
        self.state.save(&state)?;

        log::info!(
            remote = self.remote.name(),
            elements = workspace.model.element_count();
            "pulled workspace"
        );
        Ok(workspace)
    }

    /// Returns what was last exchanged with the remote
    pub fn status(&self) -> Result<SyncState> {
        self.state.load()
    }
}
