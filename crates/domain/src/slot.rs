// crates/domain/src/slot.rs

//! Fixed registry of theme asset slots.
//!
//! Each slot has a declared type, the file it is stored under and the raw
//! value an empty theme starts with. `logo` and `mobileLogo` are derived
//! slots: they are never authored, only computed.

use crate::asset::AssetType;

pub const HEADER: &str = "header";
pub const FOOTER: &str = "footer";
pub const VARIABLES: &str = "variables";
pub const FONTS: &str = "fonts";
pub const SCRIPTS: &str = "scripts";
pub const STYLES: &str = "styles";
pub const JAVASCRIPT: &str = "javascript";
pub const LOGO: &str = "logo";
pub const MOBILE_LOGO: &str = "mobileLogo";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub name: &'static str,
    pub asset_type: AssetType,
    pub file: &'static str,
    pub default_raw: &'static str,
}

impl Slot {
    /// Types an asset may have and still occupy this slot.
    ///
    /// Twig may stand in for HTML and NEON for JSON.
    pub fn compatible_types(&self) -> &'static [AssetType] {
        compatible_with(self.asset_type)
    }

    pub fn accepts(&self, t: AssetType) -> bool {
        self.compatible_types().contains(&t)
    }
}

fn compatible_with(declared: AssetType) -> &'static [AssetType] {
    match declared {
        AssetType::Html | AssetType::Twig => &[AssetType::Twig, AssetType::Html],
        AssetType::Json | AssetType::Neon => &[AssetType::Neon, AssetType::Json],
        AssetType::Css => &[AssetType::Css],
        AssetType::Js => &[AssetType::Js],
        AssetType::Image => &[AssetType::Image],
    }
}

pub const SLOTS: [Slot; 7] = [
    Slot {
        name: HEADER,
        asset_type: AssetType::Html,
        file: "header.html",
        default_raw: "",
    },
    Slot {
        name: FOOTER,
        asset_type: AssetType::Html,
        file: "footer.html",
        default_raw: "",
    },
    Slot {
        name: VARIABLES,
        asset_type: AssetType::Json,
        file: "variables.json",
        default_raw: "{}",
    },
    Slot {
        name: FONTS,
        asset_type: AssetType::Json,
        file: "fonts.json",
        default_raw: "[]",
    },
    Slot {
        name: SCRIPTS,
        asset_type: AssetType::Json,
        file: "scripts.json",
        default_raw: "[]",
    },
    Slot {
        name: STYLES,
        asset_type: AssetType::Css,
        file: "styles.css",
        default_raw: "",
    },
    Slot {
        name: JAVASCRIPT,
        asset_type: AssetType::Js,
        file: "javascript.js",
        default_raw: "",
    },
];

const LOGO_SLOTS: [Slot; 2] = [
    Slot {
        name: LOGO,
        asset_type: AssetType::Image,
        file: "",
        default_raw: "",
    },
    Slot {
        name: MOBILE_LOGO,
        asset_type: AssetType::Image,
        file: "",
        default_raw: "",
    },
];

/// Look up one of the seven authored slots.
pub fn slot(name: &str) -> Option<&'static Slot> {
    SLOTS.iter().find(|s| s.name == name)
}

/// Look up any slot that constrains asset types, derived ones included.
pub fn constrained_slot(name: &str) -> Option<&'static Slot> {
    slot(name).or_else(|| LOGO_SLOTS.iter().find(|s| s.name == name))
}
