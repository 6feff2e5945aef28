//! Resource type classification for the `as` attribute.

use std::fmt;
use std::path::Path;

/// Preload destination derived from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Script,
    Style,
    Font,
    Image,
}

impl ResourceType {
    /// Classify an output file name by extension.
    ///
    /// Returns `None` for anything unrecognized; such files still get a
    /// preload tag, just without `as`.
    pub fn classify(file_name: &str) -> Option<Self> {
        // Query strings / fragments from hashed output names don't count.
        let path = file_name.split(['?', '#']).next().unwrap_or(file_name);
        let ext = Path::new(path).extension()?.to_str()?;
        match ext {
            "js" => Some(Self::Script),
            "css" => Some(Self::Style),
            "woff" | "woff2" | "ttf" | "otf" => Some(Self::Font),
            "gif" | "jpeg" | "png" | "svg" => Some(Self::Image),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Script => "script",
            Self::Style => "style",
            Self::Font => "font",
            Self::Image => "image",
        }
    }

    /// Font preloads are always fetched in CORS mode.
    #[inline]
    pub const fn requires_cors(self) -> bool {
        matches!(self, Self::Font)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
