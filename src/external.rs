//! External dispatch of diverted navigations.
//!
//! [`Navigator`] is the one place where a navigation request is decided:
//! it asks the [`NavigationPolicy`] and, when the answer is
//! [`NavigationDecision::DivertExternal`], hands the URL to an
//! [`ExternalHandler`]. Dispatch is fire-and-forget.

use std::cell::RefCell;
use std::io;
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};
use url::Url;

use crate::policy::{NavigationDecision, NavigationPolicy};

/// Something that can show a URL outside of the webview.
pub trait ExternalHandler {
    fn open(&self, url: &str);
}

/// Opens URLs with the operating system's default handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl SystemBrowser {
    fn command(url: &str) -> Command {
        #[cfg(target_os = "windows")]
        let command = {
            let mut c = Command::new("rundll32");
            c.args(["url.dll,FileProtocolHandler", url]);
            c
        };
        #[cfg(target_os = "macos")]
        let command = {
            let mut c = Command::new("open");
            c.arg(url);
            c
        };
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        let command = {
            let mut c = Command::new("xdg-open");
            c.arg(url);
            c
        };
        command
    }
}

/// Spawns `command` detached from the shell's stdio. The child is waited on
/// from a short-lived thread so it never lingers as a zombie.
fn spawn_detached(mut command: Command) -> io::Result<JoinHandle<Option<ExitStatus>>> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    thread::Builder::new()
        .name("url-opener-reaper".into())
        .spawn(move || match child.wait() {
            Ok(status) => {
                debug!(%status, "URL opener exited");
                Some(status)
            }
            Err(error) => {
                warn!(%error, "Failed to wait for the URL opener");
                None
            }
        })
}

impl ExternalHandler for SystemBrowser {
    fn open(&self, url: &str) {
        match spawn_detached(Self::command(url)) {
            Ok(_reaper) => info!(url, "Opened in the system browser"),
            Err(error) => warn!(url, %error, "Failed to launch the system URL handler"),
        }
    }
}

/// Routes navigation requests: keeps them in the webview or diverts them.
pub struct Navigator {
    policy: NavigationPolicy,
    handler: Box<dyn ExternalHandler>,
    /// URL loaded programmatically at startup. Its first request bypasses
    /// the policy, the same way a direct load never reaches the hook.
    initial_load: RefCell<Option<String>>,
}

impl Navigator {
    pub fn new(policy: NavigationPolicy, handler: Box<dyn ExternalHandler>) -> Self {
        Self {
            policy,
            handler,
            initial_load: RefCell::new(None),
        }
    }

    /// Marks `url` as the shell's own startup load.
    pub fn expect_initial_load(&self, url: &Url) {
        *self.initial_load.borrow_mut() = Some(url.as_str().to_owned());
    }

    pub fn policy(&self) -> &NavigationPolicy {
        &self.policy
    }

    /// Drops the startup bypass once the webview has committed a first URL,
    /// whether or not that load went through [`Navigator::route`].
    pub fn settle_initial_load(&self) {
        self.initial_load.borrow_mut().take();
    }

    /// Decides a navigation request. On `DivertExternal` the URL has
    /// already been handed to the external handler when this returns.
    ///
    /// Only the very first routed request may use the startup bypass.
    pub fn route(&self, url: &str) -> NavigationDecision {
        if self.initial_load.borrow_mut().take().as_deref() == Some(url) {
            debug!(url, "Initial load, policy bypassed");
            return NavigationDecision::KeepInternal;
        }
        self.apply_policy(url)
    }

    /// Decides the first real navigation of a page opened with
    /// `target="_blank"` or `window.open`. Popups never get a window of
    /// their own: internal pages replace the main webview's page.
    pub fn route_popup(&self, url: &str) -> PopupRoute {
        if url == "about:blank" {
            return PopupRoute::Pending;
        }
        match self.apply_policy(url) {
            NavigationDecision::KeepInternal => PopupRoute::LoadInMain,
            NavigationDecision::DivertExternal => PopupRoute::Diverted,
        }
    }

    fn apply_policy(&self, url: &str) -> NavigationDecision {
        let decision = self.policy.decide(url);
        match decision {
            NavigationDecision::KeepInternal => debug!(url, "Navigation kept in webview"),
            NavigationDecision::DivertExternal => {
                info!(url, host = self.policy.internal_host(), "Navigation diverted");
                self.handler.open(url);
            }
        }
        decision
    }
}

/// Where a popup's navigation ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupRoute {
    /// Still on `about:blank`; wait for the real URL.
    Pending,
    /// Load the URL in the main webview and close the popup.
    LoadInMain,
    /// Already handed to the external handler; close the popup.
    Diverted,
}
