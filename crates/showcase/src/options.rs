//! View options shared by the grid and detail views.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use vitrine_core::DEFAULT_MANIFEST_PATH;

/// Options for hosting previews and rendering views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShowcaseOptions {
    /// Manifest location relative to the published root.
    pub manifest_path: String,
    /// Stylesheet linked from component host documents.
    pub stylesheet_href: String,
    /// `lang` of generated documents.
    pub lang: String,
    /// Extension of template includes (`twig` gives `button.twig`).
    pub template_extension: String,
    /// Page ids hidden from the grid (the showcase's own pages).
    pub excluded_pages: Vec<String>,
    /// Device preset selected when the detail view opens.
    pub default_device: Device,
}

impl Default for ShowcaseOptions {
    fn default() -> Self {
        Self {
            manifest_path: DEFAULT_MANIFEST_PATH.to_string(),
            stylesheet_href: "/assets/css/style.css".to_string(),
            lang: "en".to_string(),
            template_extension: vitrine_core::DEFAULT_TEMPLATE_EXTENSION.to_string(),
            excluded_pages: vec![
                "index".to_string(),
                "page-showcase".to_string(),
                "landing-variant".to_string(),
            ],
            default_device: Device::Mobile,
        }
    }
}

impl ShowcaseOptions {
    /// Whether a page is one of the showcase's own pages.
    pub fn is_excluded_page(&self, id: &str) -> bool {
        self.excluded_pages.iter().any(|excluded| excluded == id)
    }
}

/// Preview viewport preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    /// Narrow viewport.
    #[default]
    Mobile,
    /// Medium viewport.
    Tablet,
    /// Full width.
    Desktop,
}

impl Device {
    /// Every preset in toolbar order.
    pub const ALL: [Device; 3] = [Device::Mobile, Device::Tablet, Device::Desktop];

    /// Lowercase name used in classes and `data-device`.
    pub fn as_str(self) -> &'static str {
        match self {
            Device::Mobile => "mobile",
            Device::Tablet => "tablet",
            Device::Desktop => "desktop",
        }
    }

    /// Class list of the preview container for this preset.
    pub fn preview_class(self) -> String {
        format!("page-showcase__preview page-showcase__preview--{}", self.as_str())
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Device {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Device::ALL
            .into_iter()
            .find(|device| device.as_str() == s)
            .ok_or_else(|| format!("unknown device '{s}'"))
    }
}
