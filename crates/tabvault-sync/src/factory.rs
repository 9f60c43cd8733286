//! Remote adapter construction
//!
//! The orchestrator never builds HTTP clients itself; it asks a factory
//! for a [`RemoteStore`] bound to one target's persisted credential and
//! pointer. Tests substitute the factory to sync against fakes.

use tabvault_core::{
    domain::{Credential, RemoteTarget, SyncTargetConfig},
    ports::RemoteStore,
};
use tabvault_remote::{GistClient, GistHost, WebDavClient};

/// Builds a remote adapter for one target, or `None` when the persisted
/// credential is missing or does not fit the target.
pub trait RemoteStoreFactory: Send + Sync {
    fn build(&self, target: &RemoteTarget, config: &SyncTargetConfig) -> Option<Box<dyn RemoteStore>>;
}

/// Production factory over the gist and WebDAV adapters
#[derive(Debug, Default)]
pub struct DefaultRemoteFactory;

impl RemoteStoreFactory for DefaultRemoteFactory {
    fn build(
        &self,
        target: &RemoteTarget,
        config: &SyncTargetConfig,
    ) -> Option<Box<dyn RemoteStore>> {
        if !config.has_usable_credential() {
            return None;
        }
        match (target, config.credential.as_ref()?) {
            (RemoteTarget::GithubGist, Credential::AccessToken(token)) => Some(Box::new(
                GistClient::new(GistHost::GitHub, token, config.remote_pointer.clone()),
            )),
            (RemoteTarget::GiteeGist, Credential::AccessToken(token)) => Some(Box::new(
                GistClient::new(GistHost::Gitee, token, config.remote_pointer.clone()),
            )),
            (
                RemoteTarget::WebDav(_),
                Credential::WebDav {
                    url,
                    username,
                    password,
                },
            ) => Some(Box::new(WebDavClient::new(url, username, password))),
            // Credential shape does not fit the target.
            _ => None,
        }
    }
}
