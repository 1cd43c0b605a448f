pub fn embed_script() -> String {
    r#"// Chatbox embed loader (lightweight stub until full build pipeline is added)
(function(global) {
  const version = "0.1.0";

  // Embedding contract: the host page locates its own mount element and
  // calls this with { project_id, token }. Token defaults to null.
  function createChatboxApp(targetElement, options = {}) {
    if (!targetElement) {
      console.warn("Chatbox: mount target is missing");
      return null;
    }
    const params = new URLSearchParams();
    if (options.project_id !== undefined && options.project_id !== null) {
      params.set("project_id", options.project_id);
    }
    const token = options.token ?? null;
    if (token !== null) {
      params.set("token", token);
    }
    const frame = document.createElement("iframe");
    frame.src = (options.widgetUrl || "/widget") + "?" + params.toString();
    frame.style.border = "0";
    frame.style.width = options.width || "100%";
    frame.style.height = options.height || "480px";
    frame.setAttribute("title", "chatbox");
    targetElement.appendChild(frame);
    return frame;
  }

  global.createChatboxApp = createChatboxApp;
  global.Chatbox = { version, createChatboxApp };
})(window);
"#
    .to_string()
}
