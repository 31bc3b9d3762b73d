use serde::Serialize;

/// Element id of the book's theme switcher popup.
pub const SWITCHER_ID: &str = "theme-list";

/// Class carried by the switcher entries; their element id is the theme name.
pub const SWITCH_CLASS: &str = "theme";

/// The widget only distinguishes two looks: its stock light theme and the
/// transparent dark one that blends into the book's dark backgrounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetTheme {
    Light,
    TransparentDark,
}

impl WidgetTheme {
    /// Map a book theme name onto a widget theme. Only the light and rust
    /// variants read as light pages; every other theme gets the dark widget.
    pub fn from_theme_name(name: &str) -> Self {
        if name.contains("light") || name.contains("rust") {
            WidgetTheme::Light
        } else {
            WidgetTheme::TransparentDark
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WidgetTheme::Light => "light",
            WidgetTheme::TransparentDark => "transparent_dark",
        }
    }
}

/// The active theme is a class on the root element, e.g. `light js`.
pub fn page_theme_name(document: &web_sys::Document) -> String {
    document
        .document_element()
        .map(|root| root.class_name())
        .unwrap_or_default()
}
