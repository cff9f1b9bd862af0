use serde::{Deserialize, Serialize};

/// A browser tab as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: i64,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub window_id: Option<i64>,
}

impl Tab {
    pub fn new(id: i64, url: &str) -> Self {
        Self {
            id,
            url: Some(url.to_string()),
            active: true,
            window_id: None,
        }
    }

    pub fn in_window(mut self, window_id: i64) -> Self {
        self.window_id = Some(window_id);
        self
    }
}

/// Loading status carried by tab update notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabStatus {
    Loading,
    Complete,
    Unloaded,
}
