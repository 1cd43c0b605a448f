use crate::widget::{ChatboxWidget, Mountable};
use kuchiki::NodeRef;
use kuchiki::traits::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Element id the standalone preview mounts into.
pub const DEFAULT_MOUNT_ID: &str = "app";
/// Default 22 for testing, not a real project.
pub const DEFAULT_PROJECT_ID: i64 = 22;

#[derive(Debug, Error)]
pub enum MountError {
    #[error("mount element #{0} not found")]
    TargetMissing(String),
    #[error("html manipulation failed: {0}")]
    Html(String),
}

/// Configuration handed to the bootstrap by the caller. `project_id` is
/// passed through as-is when absent; downstream consumers handle the gap.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BootstrapOptions {
    pub project_id: Option<i64>,
    pub token: Option<String>,
}

impl BootstrapOptions {
    /// Builds the context injected into the widget. A missing token becomes
    /// an explicit `None` here and an explicit `null` on the wire, never a
    /// missing key.
    pub fn into_context(self) -> WidgetContext {
        WidgetContext {
            project_id: self.project_id,
            token: self.token,
        }
    }
}

/// Context injected into the mounted widget, serialized under the two keys
/// the in-browser chatbox code reads.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetContext {
    pub project_id: Option<i64>,
    pub token: Option<String>,
}

/// A parsed host page the widget gets mounted into.
pub struct HostDocument {
    root: NodeRef,
}

impl HostDocument {
    pub fn parse(html: &str) -> Self {
        Self {
            root: kuchiki::parse_html().one(html),
        }
    }

    /// Hands out a mount handle for the element with `element_id`. The handle
    /// is not validated here; a missing element surfaces from the mount call.
    pub fn mount_point(&self, element_id: &str) -> MountPoint {
        MountPoint {
            root: self.root.clone(),
            element_id: element_id.to_string(),
        }
    }

    pub fn to_html(&self) -> String {
        self.root.to_string()
    }
}

/// Caller-owned handle to one element of a [`HostDocument`]. Cloning the
/// underlying `NodeRef` shares the tree, so mounting through the handle
/// mutates the originating document.
pub struct MountPoint {
    root: NodeRef,
    element_id: String,
}

impl MountPoint {
    /// Replaces the children of the target element with `html`. A second
    /// attach on the same handle is a fresh mount attempt that discards the
    /// previous one.
    pub fn attach(&self, html: &str) -> Result<(), MountError> {
        let selector = format!("#{}", self.element_id);
        let mut nodes = self
            .root
            .select(&selector)
            .map_err(|e| MountError::Html(format!("query selector {selector} failed: {e:?}")))?;
        let Some(node_data) = nodes.next() else {
            return Err(MountError::TargetMissing(self.element_id.clone()));
        };
        let node = node_data.as_node();
        let existing: Vec<_> = node.children().collect();
        for child in existing {
            child.detach();
        }

        // Parse the widget markup wrapped to ensure valid HTML structure.
        let wrapper_html = format!("<div id=\"__chatbox_mount_wrapper\">{html}</div>");
        let fragment_doc = kuchiki::parse_html().one(wrapper_html);
        let mut frag_nodes = fragment_doc
            .select("#__chatbox_mount_wrapper")
            .map_err(|e| MountError::Html(format!("select wrapper failed: {e:?}")))?;
        if let Some(wrapper) = frag_nodes.next() {
            let children: Vec<_> = wrapper.as_node().children().collect();
            for child in children {
                node.append(child);
            }
        }
        Ok(())
    }
}

/// Instantiates the chatbox widget, injects the project/token context, and
/// attaches the rendered output at `target`. Fire-once; mount failures
/// propagate to the caller untouched.
pub fn create_chatbox_app(target: &MountPoint, options: BootstrapOptions) -> Result<(), MountError> {
    let widget = ChatboxWidget::new();
    let ctx = options.into_context();
    widget.mount(&ctx, target)
}

/// Parses a shell page, bootstraps the chatbox into `mount_id`, and
/// serializes the mounted document back to HTML.
pub fn bootstrap_into_shell(
    shell: &str,
    mount_id: &str,
    options: BootstrapOptions,
) -> Result<String, MountError> {
    let document = HostDocument::parse(shell);
    let target = document.mount_point(mount_id);
    create_chatbox_app(&target, options)?;
    Ok(document.to_html())
}
