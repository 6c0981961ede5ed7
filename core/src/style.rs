use core::fmt;

use crate::*;

/// CSS color literal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color(&'static str);

impl Color {
    pub const BLACK: Self = Self("#000");
    pub const GREY: Self = Self("#bbb");
    pub const WHITE: Self = Self("#fff");

    pub const fn css(self) -> &'static str {
        self.0
    }

    /// Text color for an adjacency count.
    pub const fn for_count(count: u8) -> Self {
        match count {
            1 => Self("#00d"),
            2 => Self("#0b0"),
            3 => Self("#d00"),
            4 => Self("#d0d"),
            5 => Self("#da0"),
            _ => Self::BLACK,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Marker painted in the middle of a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Label {
    Flag,
    Mine,
    Count(u8),
}

impl Label {
    pub const fn color(self) -> Color {
        match self {
            Self::Count(count) => Color::for_count(count),
            Self::Flag | Self::Mine => Color::BLACK,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag => f.write_str("F"),
            Self::Mine => f.write_str("\u{1F4A3}"),
            Self::Count(count) => write!(f, "{count}"),
        }
    }
}

/// Everything the renderer needs to paint one cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellStyle {
    pub fill: Color,
    pub border: Color,
    pub label: Option<Label>,
}

impl CellStyle {
    /// Unopened cell, also used for the initial board outline.
    pub const HIDDEN: Self = Self {
        fill: Color::GREY,
        border: Color::BLACK,
        label: None,
    };

    pub const fn for_view(view: TileView) -> Self {
        match view {
            TileView::Hidden => Self::HIDDEN,
            TileView::Flagged => Self {
                label: Some(Label::Flag),
                ..Self::HIDDEN
            },
            TileView::Mine => Self::revealed(Some(Label::Mine)),
            TileView::Revealed(0) => Self::revealed(None),
            TileView::Revealed(count) => Self::revealed(Some(Label::Count(count))),
        }
    }

    const fn revealed(label: Option<Label>) -> Self {
        Self {
            fill: Color::WHITE,
            border: Color::BLACK,
            label,
        }
    }
}

impl Default for CellStyle {
    fn default() -> Self {
        Self::HIDDEN
    }
}

impl From<TileView> for CellStyle {
    fn from(view: TileView) -> Self {
        Self::for_view(view)
    }
}
