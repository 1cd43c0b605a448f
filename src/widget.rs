use crate::embed::{MountError, MountPoint, WidgetContext};
use uuid::Uuid;

/// The "mount to element" contract the embed bootstrap consumes. The chat UI
/// behind it is an opaque collaborator; all the bootstrap requires is that
/// the unit accepts the injected context and attaches itself to a target.
pub trait Mountable {
    fn mount(&self, ctx: &WidgetContext, target: &MountPoint) -> Result<(), MountError>;
}

/// Root unit of the chatbox UI. One instance per bootstrap call.
pub struct ChatboxWidget {
    instance_id: Uuid,
}

impl ChatboxWidget {
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4(),
        }
    }

    /// Container markup plus the context payload the in-browser chatbox
    /// code reads on load. Token is always a concrete value or an explicit
    /// `null`, never a missing key.
    fn render(&self, ctx: &WidgetContext) -> Result<String, MountError> {
        let payload = serde_json::to_string(ctx).map_err(|e| MountError::Html(e.to_string()))?;
        // The payload sits inside a script element; a `<` in token text
        // could otherwise terminate it early. `\u003c` is the same JSON string.
        let payload = payload.replace('<', "\\u003c");
        Ok(format!(
            "<div class=\"chatbox-root\" data-instance=\"{id}\">\
             <script type=\"application/json\" class=\"chatbox-context\">{payload}</script>\
             <div class=\"chatbox-frame\"></div>\
             </div>",
            id = self.instance_id,
        ))
    }
}

impl Default for ChatboxWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl Mountable for ChatboxWidget {
    fn mount(&self, ctx: &WidgetContext, target: &MountPoint) -> Result<(), MountError> {
        let html = self.render(ctx)?;
        target.attach(&html)?;
        tracing::debug!(
            instance = %self.instance_id,
            project_id = ?ctx.project_id,
            has_token = ctx.token.is_some(),
            "chatbox mounted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_widget_gets_its_own_instance_id() {
        let a = ChatboxWidget::new();
        let b = ChatboxWidget::new();
        assert_ne!(a.instance_id, b.instance_id);
    }

    #[test]
    fn render_embeds_context_under_the_expected_keys() {
        let widget = ChatboxWidget::new();
        let html = widget
            .render(&WidgetContext {
                project_id: Some(7),
                token: Some("abc".to_string()),
            })
            .unwrap();
        assert!(html.contains("chatbox-context"));
        assert!(html.contains("{\"projectId\":7,\"token\":\"abc\"}"));
    }

    #[test]
    fn token_cannot_break_out_of_the_context_script() {
        let widget = ChatboxWidget::new();
        let html = widget
            .render(&WidgetContext {
                project_id: Some(7),
                token: Some("</script><img src=x onerror=alert(1)>".to_string()),
            })
            .unwrap();
        assert!(!html.contains("</script><img"));
        assert!(html.contains("\\u003c/script>\\u003cimg"));
    }
}
