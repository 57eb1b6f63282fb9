use serde::{Deserialize, Serialize};
use tower_sessions::Session;

const FLASH_KEY: &str = "toasts";

const TOAST_STYLES: &str = r#"<style id="toast-styles">
  .toast-stack {
    position: fixed;
    bottom: 20px;
    right: 20px;
    z-index: 10000;
    display: flex;
    flex-direction: column-reverse;
    gap: 8px;
  }
  .global-toast {
    padding: 12px 16px;
    border-radius: 8px;
    font-size: 14px;
    font-weight: 500;
    max-width: 300px;
    box-shadow: 0 4px 12px rgba(0,0,0,0.15);
    animation: slideInUp 0.3s ease-out;
  }
  .global-toast-success { background: #10b981; color: white; }
  .global-toast-error { background: #ef4444; color: white; }
  .global-toast-info { background: #3b82f6; color: white; }
  @keyframes slideInUp {
    from { transform: translateY(20px); opacity: 0; }
    to { transform: translateY(0); opacity: 1; }
  }
  @media (max-width: 480px) {
    .toast-stack { bottom: 16px; right: 16px; left: 16px; }
    .global-toast { max-width: none; }
  }
</style>"#;

const DISMISS_SCRIPT: &str = r#"<script>
  document.querySelectorAll('.global-toast').forEach(function (toast) {
    setTimeout(function () { toast.remove(); }, Number(toast.dataset.dismissMs));
  });
</script>"#;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    fn css_class(self) -> &'static str {
        match self {
            ToastKind::Success => "global-toast-success",
            ToastKind::Error => "global-toast-error",
            ToastKind::Info => "global-toast-info",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn new(kind: ToastKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }
}

/// Keeps a toast in the cookie session until the next rendered page.
pub async fn flash(
    session: &Session,
    kind: ToastKind,
    message: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    let mut pending: Vec<Toast> = session.get(FLASH_KEY).await?.unwrap_or_default();
    pending.push(Toast::new(kind, message));
    session.insert(FLASH_KEY, pending).await
}

/// Removes and returns every flashed toast.
pub async fn take_flashed(session: &Session) -> Result<Vec<Toast>, tower_sessions::session::Error> {
    Ok(session.remove::<Vec<Toast>>(FLASH_KEY).await?.unwrap_or_default())
}

/// Collects the toasts of one rendered page.
pub struct ToastNotifier {
    dismiss_after_ms: u64,
    styles_injected: bool,
    shown: usize,
    html: String,
    toasts: String,
}

impl ToastNotifier {
    pub fn new(dismiss_after_ms: u64) -> Self {
        Self {
            dismiss_after_ms,
            styles_injected: false,
            shown: 0,
            html: String::new(),
            toasts: String::new(),
        }
    }

    pub fn show_toast(&mut self, kind: ToastKind, message: &str) {
        if !self.styles_injected {
            self.html.push_str(TOAST_STYLES);
            self.styles_injected = true;
        }
        self.shown += 1;
        self.toasts.push_str(&format!(
            r#"<div id="global-toast-{}" class="global-toast {}" data-dismiss-ms="{}">{}</div>"#,
            self.shown,
            kind.css_class(),
            self.dismiss_after_ms,
            html_escape::encode_text(message),
        ));
    }

    pub fn extend(&mut self, toasts: impl IntoIterator<Item = Toast>) {
        for toast in toasts {
            self.show_toast(toast.kind, &toast.message);
        }
    }

    /// Styles, then every toast inside one fixed stack so they never overlap.
    pub fn render(mut self) -> String {
        if self.shown > 0 {
            self.html.push_str(r#"<div class="toast-stack" id="toast-stack">"#);
            self.html.push_str(&self.toasts);
            self.html.push_str("</div>");
            self.html.push_str(DISMISS_SCRIPT);
        }
        self.html
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn styles_are_injected_once() {
        let mut notifier = ToastNotifier::new(3000);
        notifier.show_toast(ToastKind::Success, "Service added successfully!");
        notifier.show_toast(ToastKind::Error, "Service title is required");
        let html = notifier.render();

        assert_eq!(html.matches(r#"id="toast-styles""#).count(), 1);
        assert!(html.contains(r#"class="global-toast global-toast-success""#));
        assert!(html.contains(r#"class="global-toast global-toast-error""#));
        assert!(html.contains(r#"data-dismiss-ms="3000""#));
        assert_eq!(html.matches("<script>").count(), 1);
    }

    #[test]
    fn toasts_share_one_stack() {
        let mut notifier = ToastNotifier::new(3000);
        for i in 0..4 {
            notifier.show_toast(ToastKind::Info, &format!("toast {i}"));
        }
        let html = notifier.render();

        assert_eq!(html.matches(r#"class="toast-stack""#).count(), 1);
        assert!(!html.contains("margin-bottom"));
        let start = html.find(r#"id="toast-stack""#).unwrap();
        let end = start + html[start..].find("<script>").unwrap();
        let stack = &html[start..end];
        assert_eq!(stack.matches(r#"class="global-toast "#).count(), 4);
        assert!(stack.contains(r#"id="global-toast-4""#));
    }

    #[test]
    fn empty_page_gets_nothing() {
        assert!(ToastNotifier::new(3000).render().is_empty());
    }

    #[test]
    fn messages_are_escaped() {
        let mut notifier = ToastNotifier::new(3000);
        notifier.show_toast(ToastKind::Info, "<b>hi</b>");
        assert!(notifier.render().contains("&lt;b&gt;hi&lt;/b&gt;"));
    }
}
