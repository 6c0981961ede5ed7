use anyhow::Context;
use hexsweeper_core::{Coord, GameConfig};
use web_sys::HtmlInputElement;

use crate::utils::*;

/// Initial board settings, overriding the values the page ships with.
#[derive(clap::Args, Debug, Clone, Default, PartialEq)]
pub(crate) struct SettingsArgs {
    /// Board width in cells
    #[arg(long)]
    width: Option<Coord>,

    /// Board height in cells
    #[arg(long)]
    height: Option<Coord>,

    /// Percentage of cells holding a mine
    #[arg(long)]
    density: Option<f64>,
}

/// The width, height and density inputs next to the board.
#[derive(Clone, Debug)]
pub(crate) struct SettingsForm {
    width: HtmlInputElement,
    height: HtmlInputElement,
    density: HtmlInputElement,
}

impl SettingsForm {
    pub(crate) const WIDTH_ID: &'static str = "width";
    pub(crate) const HEIGHT_ID: &'static str = "height";
    pub(crate) const DENSITY_ID: &'static str = "density";

    pub(crate) fn find() -> anyhow::Result<Self> {
        Ok(Self {
            width: element_by_id(Self::WIDTH_ID)?,
            height: element_by_id(Self::HEIGHT_ID)?,
            density: element_by_id(Self::DENSITY_ID)?,
        })
    }

    pub(crate) fn apply_args(&self, args: &SettingsArgs) {
        if let Some(width) = args.width {
            self.width.set_value(&width.to_string());
        }
        if let Some(height) = args.height {
            self.height.set_value(&height.to_string());
        }
        if let Some(density) = args.density {
            self.density.set_value(&density.to_string());
        }
    }

    pub(crate) fn inputs(&self) -> [&HtmlInputElement; 3] {
        [&self.width, &self.height, &self.density]
    }

    pub(crate) fn read(&self) -> anyhow::Result<GameConfig> {
        parse_config(&self.width.value(), &self.height.value(), &self.density.value())
    }
}

/// Builds a config from raw input text, density given in percent.
pub(crate) fn parse_config(width: &str, height: &str, density: &str) -> anyhow::Result<GameConfig> {
    let width: Coord = width
        .trim()
        .parse()
        .with_context(|| format!("Invalid width {width:?}"))?;
    let height: Coord = height
        .trim()
        .parse()
        .with_context(|| format!("Invalid height {height:?}"))?;
    let percent: f64 = density
        .trim()
        .parse()
        .with_context(|| format!("Invalid density {density:?}"))?;

    GameConfig::new((width, height), percent / 100.0)
        .with_context(|| format!("Cannot build a {width}x{height} board at {percent}%"))
}
