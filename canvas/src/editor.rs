//! Caption/style editor drafts.
//!
//! A `StyleDraft` is staged from an item when the editor opens and is only
//! ever mutated by the editor controls. Saving diffs it against the item so the
//! resulting `ItemPatch` carries just the fields the user actually changed.

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;

use crate::color::{Rgb, Rgba};
use crate::consts::DEFAULT_OPACITY_PERCENT;
use crate::doc::{BoardItem, ItemId, ItemPatch, TextAlign};

/// Staged caption and style edits for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDraft {
    pub text: String,
    pub is_bold: bool,
    pub text_align: TextAlign,
    pub text_color: Rgb,
    pub background: Rgb,
    /// Background opacity, 0–100.
    pub opacity_percent: u8,
}

impl StyleDraft {
    /// Stage a draft from the item's current caption and style.
    ///
    /// Unreadable stored colors show as white text on 70% black. `diff`
    /// measures edits against this same staging, so such a color is only
    /// overwritten when the user picks a different one.
    #[must_use]
    pub fn from_item(item: &BoardItem) -> Self {
        let text_color = Rgba::parse_css(&item.text_color).map_or(Rgb::WHITE, |c| c.rgb);
        let (background, opacity_percent) = match Rgba::parse_css(&item.background_color) {
            Some(c) => (c.rgb, c.opacity_percent()),
            None => (Rgb::BLACK, DEFAULT_OPACITY_PERCENT),
        };
        Self {
            text: item.caption().to_owned(),
            is_bold: item.is_bold,
            text_align: item.text_align,
            text_color,
            background,
            opacity_percent,
        }
    }

    /// Background composed with its opacity.
    #[must_use]
    pub fn background_rgba(&self) -> Rgba {
        Rgba::from_opacity_percent(self.background, self.opacity_percent)
    }

    /// Style portion of the draft, without the caption text.
    #[must_use]
    pub fn style(&self) -> CaptionStyle {
        CaptionStyle {
            text_color: self.text_color,
            background: self.background_rgba(),
            is_bold: self.is_bold,
            text_align: self.text_align,
        }
    }

    /// Patch containing only the fields the user changed since `item` was staged.
    #[must_use]
    pub fn diff(&self, item: &BoardItem) -> ItemPatch {
        let staged = Self::from_item(item);
        let mut patch = ItemPatch::default();
        if self.text != staged.text {
            patch.text = Some(self.text.clone());
        }
        if self.is_bold != staged.is_bold {
            patch.is_bold = Some(self.is_bold);
        }
        if self.text_align != staged.text_align {
            patch.text_align = Some(self.text_align);
        }
        if self.text_color != staged.text_color {
            patch.text_color = Some(self.text_color.to_hex());
        }
        if (self.background, self.opacity_percent) != (staged.background, staged.opacity_percent) {
            patch.background_color = Some(self.background_rgba().to_css());
        }
        patch
    }
}

/// Caption styling applied in bulk by "apply style to all".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptionStyle {
    pub text_color: Rgb,
    pub background: Rgba,
    pub is_bold: bool,
    pub text_align: TextAlign,
}

impl CaptionStyle {
    /// Patch writing every style field (caption text untouched).
    #[must_use]
    pub fn patch(&self) -> ItemPatch {
        ItemPatch {
            text_color: Some(self.text_color.to_hex()),
            background_color: Some(self.background.to_css()),
            is_bold: Some(self.is_bold),
            text_align: Some(self.text_align),
            ..ItemPatch::default()
        }
    }
}

/// Editor open on one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSession {
    pub item_id: ItemId,
    pub draft: StyleDraft,
}
