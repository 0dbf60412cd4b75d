//! Chat widget embed, kept apart from the signup workflow.
//!
//! The landing page embeds a third-party chat bubble by defining a global
//! config object and injecting one deferred script. [`SnippetLoader`] renders
//! that snippet to any writer, once. Tests use `NoopLoader`, which does nothing.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::WaitlistError;

/// DOM id of the injected script; used to avoid loading it twice.
pub const SCRIPT_ID: &str = "dify-script";
pub const DEFAULT_SCRIPT_URL: &str = "https://udify.app/embed.min.js";

/// Chat widget settings, read from the `[chat_widget]` config table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatWidget {
    /// Public embed token of the chatbot.
    #[serde(default)]
    pub token: String,

    #[serde(default = "default_script_url")]
    pub script_url: String,

    /// Value passed to the bot as its `platform` input.
    #[serde(default)]
    pub platform: Option<String>,
}

fn default_script_url() -> String {
    DEFAULT_SCRIPT_URL.to_string()
}

impl Default for ChatWidget {
    fn default() -> Self {
        Self {
            token: String::new(),
            script_url: default_script_url(),
            platform: None,
        }
    }
}

impl ChatWidget {
    pub fn is_configured(&self) -> bool {
        !self.token.trim().is_empty()
    }

    /// HTML that defines the bot config and injects the deferred script.
    pub fn snippet(&self) -> Result<String, WaitlistError> {
        let mut config = serde_json::json!({ "token": self.token });
        if let Some(platform) = &self.platform {
            config["inputs"] = serde_json::json!({ "platform": platform });
        }
        // `<` would let a value close the inline script early.
        let config = serde_json::to_string_pretty(&config)?.replace('<', "\\u003c");
        let src = escape_attr(&self.script_url);

        Ok(format!(
            "<script>\n  window.difyChatbotConfig = {config};\n</script>\n\
             <script id=\"{SCRIPT_ID}\" src=\"{src}\" defer></script>\n"
        ))
    }
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Loaded,
    AlreadyLoaded,
    Skipped,
}

/// Something that puts the chat widget on the page.
pub trait WidgetLoader {
    fn load(&mut self, widget: &ChatWidget) -> Result<LoadStatus, WaitlistError>;
}

/// Writes the embed snippet to `out` the first time it is asked to.
pub struct SnippetLoader<W: Write> {
    out: W,
    loaded: bool,
}

impl<W: Write> SnippetLoader<W> {
    pub fn new(out: W) -> Self {
        Self { out, loaded: false }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> WidgetLoader for SnippetLoader<W> {
    fn load(&mut self, widget: &ChatWidget) -> Result<LoadStatus, WaitlistError> {
        if self.loaded {
            return Ok(LoadStatus::AlreadyLoaded);
        }
        if !widget.is_configured() {
            tracing::warn!("chat widget token not configured, skipping embed");
            return Ok(LoadStatus::Skipped);
        }
        self.out.write_all(widget.snippet()?.as_bytes())?;
        self.out.flush()?;
        self.loaded = true;
        tracing::debug!(script = %widget.script_url, "chat widget embedded");
        Ok(LoadStatus::Loaded)
    }
}

/// Test double: never loads anything.
#[cfg(test)]
pub struct NoopLoader;

#[cfg(test)]
impl WidgetLoader for NoopLoader {
    fn load(&mut self, _widget: &ChatWidget) -> Result<LoadStatus, WaitlistError> {
        Ok(LoadStatus::Skipped)
    }
}
