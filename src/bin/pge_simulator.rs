//=========================================================================
// PGE Simulator
//
// Desktop demo: a title screen that starts a small dodge game.
//
// Controls:
//   Title:  Up = backlight, Select = play, Back = quit
//   Game:   hold Up/Down to move, Select or Back = quit to title
//
// Logging is configured through RUST_LOG, e.g.
//   RUST_LOG=pge=debug,platform=info cargo run --bin pge-simulator
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::info;

//=== Internal Dependencies ===============================================

use pge_engine::prelude::*;

//=== Constants ===========================================================

const BACKGROUND: ResourceId = ResourceId(1);

const PLAYER_X: i16 = 10;
const PLAYER_SIZE: i16 = 12;
const PLAYER_SPEED: i16 = 3;

const OBSTACLE_WIDTH: i16 = 10;
const OBSTACLE_HEIGHT: i16 = 30;
const OBSTACLE_SPEED: i16 = 4;
const SPAWN_EVERY: u64 = 20;

//=== Dodge ===============================================================

/// Game state shared by the render, logic and click handlers.
#[derive(Debug)]
struct Dodge {
    player_y: i16,
    obstacles: Vec<GRect>,
    seed: u32,
    frames: u64,
    quit: bool,
}

impl Dodge {
    fn new(seed: u32) -> Self {
        Self {
            player_y: (SCREEN_BOUNDS.size.h - PLAYER_SIZE) / 2,
            obstacles: Vec::new(),
            seed,
            frames: 0,
            quit: false,
        }
    }

    fn player(&self) -> GRect {
        GRect::new(PLAYER_X, self.player_y, PLAYER_SIZE, PLAYER_SIZE)
    }

    fn next_random(&mut self) -> u32 {
        self.seed = self.seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        self.seed >> 16
    }

    /// Advances one frame. Returns `false` once the game is over.
    fn step(&mut self, up: bool, down: bool) -> bool {
        let max_y = SCREEN_BOUNDS.size.h - PLAYER_SIZE;
        if up {
            self.player_y = (self.player_y - PLAYER_SPEED).max(0);
        }
        if down {
            self.player_y = (self.player_y + PLAYER_SPEED).min(max_y);
        }

        for obstacle in &mut self.obstacles {
            obstacle.origin.x -= OBSTACLE_SPEED;
        }
        self.obstacles.retain(|o| o.origin.x + o.size.w > 0);

        if self.frames % SPAWN_EVERY == 0 {
            let range = (SCREEN_BOUNDS.size.h - OBSTACLE_HEIGHT) as u32;
            let y = (self.next_random() % range) as i16;
            self.obstacles
                .push(GRect::new(SCREEN_BOUNDS.size.w, y, OBSTACLE_WIDTH, OBSTACLE_HEIGHT));
        }
        self.frames += 1;

        let player = self.player();
        !self.quit && !self.obstacles.iter().any(|o| o.intersects(&player))
    }

    fn draw(&self, canvas: &mut Canvas) {
        canvas.set_fill_color(GColor::Black);
        canvas.fill_rect(canvas.bounds());

        canvas.set_fill_color(GColor::White);
        canvas.fill_rect(self.player());
        for obstacle in &self.obstacles {
            canvas.fill_rect(*obstacle);
        }

        let score = format!("{}", self.frames);
        canvas.draw_text(
            &score,
            SystemFont::Gothic18Bold,
            GRect::new(0, 0, SCREEN_BOUNDS.size.w - 4, 20),
            TextAlignment::Right,
        );
    }

    fn on_click(&mut self, button: ButtonId) {
        if matches!(button, ButtonId::Select | ButtonId::Back) {
            self.quit = true;
        }
    }
}

//=== Session =============================================================

/// A running game: its window and the engine drawing into it.
struct Session {
    window: WindowId,
    engine: ComponentId,
    state: Rc<RefCell<Dodge>>,
}

fn start_game(runtime: &mut Runtime<SimHost>) -> Session {
    let window = runtime.host_mut().create_window(true);
    runtime.host_mut().push_window(window, true);

    let seed = runtime.host().now().subsec_nanos() | 1;
    let state = Rc::new(RefCell::new(Dodge::new(seed)));

    let render_state = state.clone();
    let logic_state = state.clone();
    let click_state = state.clone();
    let engine = runtime.begin(
        EngineBuilder::<SimHost>::new()
            .on_render(move |canvas: &mut Canvas| render_state.borrow().draw(canvas))
            .on_logic(move |frame| {
                let up = frame.button_state(ButtonId::Up);
                let down = frame.button_state(ButtonId::Down);
                if !logic_state.borrow_mut().step(up, down) {
                    frame.finish();
                }
            })
            .on_click(move |button| click_state.borrow_mut().on_click(button)),
        window,
    );

    // Back goes to the game, not to the window stack.
    let clicks = ButtonId::TRACKED
        .into_iter()
        .fold(ClickConfig::new().single(ButtonId::Back), |config, button| {
            config.raw(button).single(button)
        });
    runtime.host_mut().subscribe_clicks(window, clicks);

    info!(target: "pge::demo", "Game started");
    Session {
        window,
        engine,
        state,
    }
}

fn end_game(runtime: &mut Runtime<SimHost>, session: Session) {
    info!(
        target: "pge::demo",
        "Game over, score {}",
        session.state.borrow().frames
    );

    let host = runtime.host_mut();
    if host.top_window() == Some(session.window) {
        host.pop_window(true);
    }
    host.destroy_window(session.window);
}

//=== Entry Point =========================================================

fn main() -> Result<(), PlatformError> {
    env_logger::init();

    let mut host = SimHost::new();
    host.register_resource(BACKGROUND);
    let mut runtime = Runtime::new(host);

    let play = Rc::new(Cell::new(false));
    let request = play.clone();
    let title = TitleScreen::new("Dodge", GColor::White, BACKGROUND, move |button| {
        if button == ButtonId::Select {
            request.set(true);
        }
    });
    runtime.push_title(title, true);

    let mut session: Option<Session> = None;
    let app = DesktopApp::new(runtime, DesktopConfig::default()).with_hook(move |runtime| {
        if play.replace(false) && session.is_none() {
            session = Some(start_game(runtime));
        }

        if session.as_ref().is_some_and(|s| !runtime.contains(s.engine)) {
            if let Some(finished) = session.take() {
                end_game(runtime, finished);
            }
        }
    });

    run_desktop(app)
}

//=========================================================================
// Unit Tests
//=========================================================================
