use clap::Parser;
use wasm_bindgen::prelude::*;

mod canvas;
mod game;
mod input;
mod settings;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    #[command(flatten)]
    settings: settings::SettingsArgs,
}

#[wasm_bindgen(start)]
pub fn run_app() {
    use gloo::utils::window;

    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let location_hash = window().location().hash().unwrap_or_default();

    let args = Args::try_parse_from(location_hash.split(['#', '&'])).unwrap_or_else(|err| {
        gloo::console::error!(format!("Ignoring location hash: {err}"));
        Args::parse_from([""])
    });
    if let Some(log_level) = args.verbose.log_level() {
        if let Err(err) = console_log::init_with_level(log_level) {
            gloo::console::error!(format!("Error initializing logger: {err}"));
        }
    }
    log::debug!("seed: {:?}", args.seed);

    match game::GameView::mount(args.seed, &args.settings) {
        Ok(_) => log::debug!("App started"),
        Err(err) => log::error!("Could not start: {err:#}"),
    }
}
