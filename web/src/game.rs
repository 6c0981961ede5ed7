use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use hexsweeper_core::{
    Board, Coord2, GameConfig, HexLayout, RevealOutcome, paint_board, paint_cells,
};
use wasm_bindgen::JsCast;
use web_sys::{
    Element, HtmlCanvasElement, HtmlElement, HtmlInputElement, KeyboardEvent, MouseEvent,
};

use crate::canvas::HexCanvas;
use crate::input::*;
use crate::settings::{SettingsArgs, SettingsForm};
use crate::utils::*;

const BOARD_ID: &str = "board";
const RESTART_ID: &str = "restart";
const FLAGS_ID: &str = "numFlags";
const MINES_ID: &str = "numMines";

/// End-of-game message shown over the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Banner {
    Boom,
    Winner,
}

impl Banner {
    const fn for_outcome(outcome: RevealOutcome) -> Option<Self> {
        match outcome {
            RevealOutcome::HitMine => Some(Self::Boom),
            RevealOutcome::Won => Some(Self::Winner),
            RevealOutcome::NoChange | RevealOutcome::Revealed => None,
        }
    }

    const fn class(self) -> &'static str {
        match self {
            Self::Boom => "boom",
            Self::Winner => "winner",
        }
    }

    const fn text(self) -> &'static str {
        match self {
            Self::Boom => "BOOM",
            Self::Winner => "WINNER",
        }
    }
}

/// One running game. Restarting replaces it instead of resetting it.
#[derive(Debug)]
struct GameSession {
    board: Board,
    canvas: HexCanvas,
}

#[derive(Debug)]
pub(crate) struct GameView {
    root: HtmlElement,
    canvas_element: HtmlCanvasElement,
    flags_counter: Element,
    mines_counter: Element,
    settings: SettingsForm,
    fixed_seed: Option<u64>,
    banner: Option<Element>,
    session: Option<GameSession>,
}

impl GameView {
    /// Builds the view inside the page, wires its events and starts the first game.
    pub(crate) fn mount(
        fixed_seed: Option<u64>,
        args: &SettingsArgs,
    ) -> anyhow::Result<Rc<RefCell<Self>>> {
        let root: HtmlElement = element_by_id(BOARD_ID)?;
        let canvas_element: HtmlCanvasElement = gloo::utils::document()
            .create_element("canvas")
            .map_err(js_error)?
            .dyn_into()
            .map_err(|_| anyhow::anyhow!("Created element is not a canvas"))?;
        root.append_child(&canvas_element).map_err(js_error)?;

        let settings = SettingsForm::find()?;
        settings.apply_args(args);

        let view = Rc::new(RefCell::new(Self {
            root,
            canvas_element,
            flags_counter: element_by_id(FLAGS_ID)?,
            mines_counter: element_by_id(MINES_ID)?,
            settings,
            fixed_seed,
            banner: None,
            session: None,
        }));

        Self::attach_listeners(&view)?;
        view.borrow_mut().restart();
        Ok(view)
    }

    fn attach_listeners(view: &Rc<RefCell<Self>>) -> anyhow::Result<()> {
        let canvas_element = view.borrow().canvas_element.clone();

        // right clicks flag, so the context menu must not show up
        EventListener::new(&canvas_element, "contextmenu", |event| {
            event.prevent_default();
        })
        .forget();

        {
            let view = view.clone();
            EventListener::new(&canvas_element, "pointerdown", move |event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let (px, py) = (f64::from(event.offset_x()), f64::from(event.offset_y()));
                view.borrow_mut()
                    .on_pointer_down(px, py, PointerAction::from_event(event));
            })
            .forget();
        }

        {
            let restart_button: HtmlElement = element_by_id(RESTART_ID)?;
            let view = view.clone();
            EventListener::new(&restart_button, "click", move |_| {
                view.borrow_mut().restart();
            })
            .forget();
        }

        let inputs: Vec<HtmlInputElement> = view
            .borrow()
            .settings
            .inputs()
            .into_iter()
            .cloned()
            .collect();
        for input in inputs {
            let view = view.clone();
            EventListener::new(&input, "keypress", move |event| {
                if event
                    .dyn_ref::<KeyboardEvent>()
                    .is_some_and(|event| is_key(event, SUBMIT_KEY))
                {
                    view.borrow_mut().restart();
                }
            })
            .forget();
        }

        {
            let view = view.clone();
            EventListener::new(&gloo::utils::window(), "keydown", move |event| {
                let typing = event
                    .target()
                    .is_some_and(|target| target.has_type::<HtmlInputElement>());
                if typing {
                    return;
                }
                if event
                    .dyn_ref::<KeyboardEvent>()
                    .is_some_and(|event| is_key(event, RESTART_KEY))
                {
                    view.borrow_mut().restart();
                }
            })
            .forget();
        }

        Ok(())
    }

    /// Starts a fresh game from the current settings inputs.
    pub(crate) fn restart(&mut self) {
        let config = match self.settings.read() {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Not restarting: {err:#}");
                return;
            }
        };
        let seed = self.fixed_seed.unwrap_or_else(js_random_seed);

        if let Err(err) = self.start(config, seed) {
            log::error!("Could not start a new game: {err:#}");
        }
    }

    fn start(&mut self, config: GameConfig, seed: u64) -> anyhow::Result<()> {
        let container_width = f64::from(self.root.offset_width());
        let container_height = f64::from(self.root.offset_height());
        let layout = HexLayout::fit(config.size, (container_width, container_height))?;
        let board = Board::new(config, seed)?;

        let mut canvas = HexCanvas::new(self.canvas_element.clone(), layout)?;
        paint_board(&board, &layout, &mut canvas);
        self.canvas_element
            .style()
            .set_property("margin-left", &format!("{}px", layout.margin_left(container_width)))
            .map_err(js_error)?;

        log::info!(
            "New game: {}x{}, {} mines, seed {}",
            config.size.0,
            config.size.1,
            board.num_mines(),
            seed
        );
        self.session = Some(GameSession { board, canvas });
        self.clear_banner();
        self.update_counters();
        Ok(())
    }

    fn on_pointer_down(&mut self, px: f64, py: f64, action: PointerAction) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if session.board.is_finished() {
            return;
        }
        let Some(coords) = session.canvas.layout().pixel_to_cell(px, py) else {
            log::trace!("Pointer at ({px}, {py}) is off the board");
            return;
        };

        match action {
            PointerAction::Reveal => self.reveal(coords),
            PointerAction::Flag => self.flag(coords),
        }
    }

    fn reveal(&mut self, coords: Coord2) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let reveal = match session.board.reveal(coords) {
            Ok(reveal) => reveal,
            Err(err) => {
                log::warn!("Reveal at {:?} failed: {}", coords, err);
                return;
            }
        };
        log::debug!("reveal {:?}: {:?}", coords, reveal.outcome);
        paint_cells(&session.board, &reveal.updated, &mut session.canvas);

        if let Some(banner) = Banner::for_outcome(reveal.outcome) {
            self.show_banner(banner);
        }
        self.update_counters();
    }

    fn flag(&mut self, coords: Coord2) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.board.toggle_flag(coords) {
            Ok(outcome) if outcome.has_update() => {
                log::debug!("flag {:?}: {:?}", coords, outcome);
                paint_cells(&session.board, &[coords], &mut session.canvas);
                self.update_counters();
            }
            Ok(_) => {}
            Err(err) => log::warn!("Flag at {:?} failed: {}", coords, err),
        }
    }

    fn update_counters(&self) {
        let (flags, mines) = self
            .session
            .as_ref()
            .map_or((0, 0), |session| (session.board.num_flags(), session.board.num_mines()));
        self.flags_counter.set_text_content(Some(&flags.to_string()));
        self.mines_counter.set_text_content(Some(&mines.to_string()));
    }

    fn show_banner(&mut self, banner: Banner) {
        self.clear_banner();
        let element = match gloo::utils::document().create_element("div") {
            Ok(element) => element,
            Err(err) => {
                log::error!("Could not create banner: {:?}", err);
                return;
            }
        };
        element.set_class_name(banner.class());
        element.set_text_content(Some(banner.text()));
        if let Err(err) = self.root.append_child(&element) {
            log::error!("Could not show banner: {:?}", err);
            return;
        }
        self.banner = Some(element);
    }

    fn clear_banner(&mut self) {
        if let Some(banner) = self.banner.take() {
            banner.remove();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banners_follow_terminal_outcomes() {
        assert_eq!(Banner::for_outcome(RevealOutcome::HitMine), Some(Banner::Boom));
        assert_eq!(Banner::for_outcome(RevealOutcome::Won), Some(Banner::Winner));
        assert_eq!(Banner::for_outcome(RevealOutcome::Revealed), None);
        assert_eq!(Banner::for_outcome(RevealOutcome::NoChange), None);
    }

    #[test]
    fn banner_text_matches_class() {
        assert_eq!((Banner::Boom.class(), Banner::Boom.text()), ("boom", "BOOM"));
        assert_eq!((Banner::Winner.class(), Banner::Winner.text()), ("winner", "WINNER"));
    }
}
