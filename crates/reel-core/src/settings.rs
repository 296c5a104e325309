//! Site-wide settings: a singleton record stored under a fixed key.

use serde::{Deserialize, Serialize};

/// Document key of the singleton settings record.
pub const SETTINGS_KEY: &str = "default";

/// Hero video served until an administrator picks one.
pub const DEFAULT_HERO_VIDEO_URL: &str =
  "https://videos.pexels.com/video-files/3121459/3121459-hd_1920_1080_25fps.mp4";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
  pub hero_video_url: String,
}

impl Default for SiteSettings {
  fn default() -> Self {
    Self { hero_video_url: DEFAULT_HERO_VIDEO_URL.to_owned() }
  }
}

/// Merge-semantics update: absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub hero_video_url: Option<String>,
}

impl SettingsPatch {
  pub fn apply(self, settings: &mut SiteSettings) {
    if let Some(url) = self.hero_video_url {
      settings.hero_video_url = url;
    }
  }
}
