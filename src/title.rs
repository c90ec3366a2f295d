//=========================================================================
// Title Screen
//=========================================================================
//
// Full-screen title window shown before a game starts.
//
// Layout (window bounds w × h):
//   background  bitmap  (0, 0, w, h)
//   "LIGHT >"   text    (0, 20, w, 30)    right, Gothic 18 bold
//   title       text    (10, 40, w-20, 60) center, word wrap, Gothic 24 bold
//
// Clicks: Up toggles the backlight, Select and Down go to the click
// callback. The screen owns its window; once unloaded it destroys its
// layers and its window and reports itself finished.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::fmt;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::input::{ButtonEvent, ButtonId};
use crate::core::runtime::{Component, Dispatch};
use crate::platform::geometry::{GColor, GRect};
use crate::platform::{
    ClickConfig, Host, HostEvent, LayerId, ResourceId, SystemFont, TextAlignment, TextLayer,
    TextOverflow, WindowId,
};

//=== Constants ===========================================================

/// Title storage size in bytes including the terminator; titles keep at
/// most `TITLE_LENGTH_MAX - 1` bytes of UTF-8.
pub const TITLE_LENGTH_MAX: usize = 32;

const LIGHT_LABEL: &str = "LIGHT >";

/// Receives Select and Down clicks.
pub type TitleClickHandler = Box<dyn FnMut(ButtonId)>;

//=== TitleScreen =========================================================

pub struct TitleScreen {
    title: String,
    color: GColor,
    background: ResourceId,
    on_click: TitleClickHandler,

    window: Option<WindowId>,
    layers: Vec<LayerId>,
    light_on: bool,
    finished: bool,
}

impl TitleScreen {
    /// Creates a title screen. Nothing is shown until [`push`](Self::push).
    pub fn new<F>(title: &str, color: GColor, background: ResourceId, on_click: F) -> Self
    where
        F: FnMut(ButtonId) + 'static,
    {
        Self {
            title: bounded_title(title),
            color,
            background,
            on_click: Box::new(on_click),
            window: None,
            layers: Vec::with_capacity(3),
            light_on: false,
            finished: false,
        }
    }

    //--- Window Stack -----------------------------------------------------

    /// Shows the screen, creating its window on first use.
    pub fn push<H: Host>(&mut self, host: &mut H, animated: bool) {
        if self.finished {
            warn!(target: "pge::title", "Title screen already unloaded, push ignored");
            return;
        }

        let window = match self.window {
            Some(window) => window,
            None => {
                let window = host.create_window(true);
                let clicks = ClickConfig::new()
                    .single(ButtonId::Select)
                    .single(ButtonId::Up)
                    .single(ButtonId::Down);
                host.subscribe_clicks(window, clicks);
                self.window = Some(window);
                window
            }
        };

        host.push_window(window, animated);
        info!(target: "pge::title", "Title screen \"{}\" pushed", self.title);
    }

    /// Pops the screen if it is the top window.
    ///
    /// Returns `false` if another window is on top.
    pub fn pop<H: Host>(&mut self, host: &mut H, animated: bool) -> bool {
        match self.window {
            Some(window) if host.top_window() == Some(window) => {
                host.pop_window(animated);
                true
            }
            _ => {
                debug!(target: "pge::title", "Title screen not on top, pop ignored");
                false
            }
        }
    }

    //--- Window Handlers --------------------------------------------------

    fn load<H: Host>(&mut self, host: &mut H, window: WindowId) {
        let bounds = host.window_bounds(window);
        let width = bounds.size.w;

        match host.create_bitmap_layer(window, GRect::new(0, 0, width, bounds.size.h), self.background) {
            Ok(layer) => self.layers.push(layer),
            Err(err) => warn!(target: "pge::title", "Background unavailable: {}", err),
        }

        let title = TextLayer {
            frame: GRect::new(10, 40, width.saturating_sub(20), 60),
            text: self.title.clone(),
            color: self.color,
            background: GColor::Clear,
            alignment: TextAlignment::Center,
            overflow: TextOverflow::WordWrap,
            font: SystemFont::Gothic24Bold,
        };
        self.layers.push(host.create_text_layer(window, title));

        let light = TextLayer {
            frame: GRect::new(0, 20, width, 30),
            text: LIGHT_LABEL.to_owned(),
            color: self.color,
            background: GColor::Clear,
            alignment: TextAlignment::Right,
            overflow: TextOverflow::default(),
            font: SystemFont::Gothic18Bold,
        };
        self.layers.push(host.create_text_layer(window, light));
    }

    fn unload<H: Host>(&mut self, host: &mut H, window: WindowId) {
        for layer in self.layers.drain(..) {
            host.destroy_layer(layer);
        }
        host.unsubscribe_clicks(window);
        host.destroy_window(window);

        self.window = None;
        self.finished = true;
        info!(target: "pge::title", "Title screen \"{}\" unloaded", self.title);
    }

    fn on_click<H: Host>(&mut self, host: &mut H, button: ButtonId) {
        match button {
            ButtonId::Up => {
                self.light_on = !self.light_on;
                host.set_backlight(self.light_on);
            }
            ButtonId::Select | ButtonId::Down => (self.on_click)(button),
            ButtonId::Back => {}
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn window(&self) -> Option<WindowId> {
        self.window
    }

    pub fn light_on(&self) -> bool {
        self.light_on
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Keeps at most `TITLE_LENGTH_MAX - 1` bytes, cut on a char boundary.
fn bounded_title(title: &str) -> String {
    let mut end = title.len().min(TITLE_LENGTH_MAX - 1);
    while !title.is_char_boundary(end) {
        end -= 1;
    }
    title[..end].to_owned()
}

//--- Trait Implementations -----------------------------------------------

impl<H: Host + 'static> Component<H> for TitleScreen {
    fn handle_event(&mut self, host: &mut H, event: &HostEvent) -> Dispatch {
        let Some(own) = self.window else {
            return Dispatch::Ignored;
        };

        match *event {
            HostEvent::WindowLoad(window) if window == own => self.load(host, window),
            HostEvent::WindowUnload(window) if window == own => self.unload(host, window),
            HostEvent::Button {
                window,
                event: ButtonEvent::Clicked(button),
            } if window == own => self.on_click(host, button),
            _ => return Dispatch::Ignored,
        }
        Dispatch::Handled
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl fmt::Debug for TitleScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TitleScreen")
            .field("title", &self.title)
            .field("window", &self.window)
            .field("layers", &self.layers)
            .field("light_on", &self.light_on)
            .field("finished", &self.finished)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::sim::SimHost;
    use crate::platform::{LayerService, WindowService};
    use std::cell::RefCell;
    use std::rc::Rc;

    const BACKGROUND: ResourceId = ResourceId(7);

    //--- Test Helpers -----------------------------------------------------

    fn pump(host: &mut SimHost, screen: &mut TitleScreen) {
        while let Some(event) = host.poll_event() {
            Component::<SimHost>::handle_event(screen, host, &event);
        }
    }

    fn pushed_screen(title: &str) -> (SimHost, TitleScreen, Rc<RefCell<Vec<ButtonId>>>) {
        let mut host = SimHost::new();
        host.register_resource(BACKGROUND);

        let clicks = Rc::new(RefCell::new(Vec::new()));
        let sink = clicks.clone();
        let mut screen = TitleScreen::new(title, GColor::White, BACKGROUND, move |button| {
            sink.borrow_mut().push(button)
        });
        screen.push(&mut host, true);
        pump(&mut host, &mut screen);
        (host, screen, clicks)
    }

    fn text_of(host: &SimHost, layer: LayerId) -> Option<&TextLayer> {
        host.text_layer(layer)
    }

    //=====================================================================
    // Title Tests
    //=====================================================================

    #[test]
    fn short_title_is_kept() {
        assert_eq!(bounded_title("Dodge"), "Dodge");
    }

    #[test]
    fn long_title_is_truncated() {
        let long = "a".repeat(40);
        assert_eq!(bounded_title(&long).len(), TITLE_LENGTH_MAX - 1);
    }

    #[test]
    fn multibyte_title_is_bounded_in_bytes() {
        let long = "é".repeat(40);
        let bounded = bounded_title(&long);
        assert!(bounded.len() < TITLE_LENGTH_MAX);
        assert_eq!(bounded, "é".repeat(15));

        let screen = TitleScreen::new(&long, GColor::White, ResourceId(1), |_| {});
        assert!(screen.title().len() < TITLE_LENGTH_MAX);
    }

    #[test]
    fn cut_backs_off_to_char_boundary() {
        let title = format!("{}€", "a".repeat(29));
        assert_eq!(bounded_title(&title), "a".repeat(29));
    }

    //=====================================================================
    // Lifecycle Tests
    //=====================================================================

    #[test]
    fn push_creates_fullscreen_window_with_clicks() {
        let (host, screen, _) = pushed_screen("Dodge");
        let window = screen.window().expect("window created");

        assert_eq!(host.window_stack(), &[window]);
        assert_eq!(host.window_bounds(window), crate::platform::geometry::SCREEN_BOUNDS);

        let clicks = host.click_config(window).expect("clicks subscribed");
        assert!(clicks.wants_single(ButtonId::Select));
        assert!(clicks.wants_single(ButtonId::Up));
        assert!(clicks.wants_single(ButtonId::Down));
        assert!(!clicks.wants_raw(ButtonId::Up));
    }

    #[test]
    fn load_builds_layout() {
        let (host, screen, _) = pushed_screen("Dodge");
        let window = screen.window().expect("window created");
        let layers = host.layers_on(window);
        assert_eq!(layers.len(), 3);

        assert_eq!(host.bitmap_resource(layers[0]), Some(BACKGROUND));
        assert_eq!(host.layer_frame(layers[0]), Some(GRect::new(0, 0, 144, 168)));

        let title = text_of(&host, layers[1]).expect("title layer");
        assert_eq!(title.text, "Dodge");
        assert_eq!(title.frame, GRect::new(10, 40, 124, 60));
        assert_eq!(title.alignment, TextAlignment::Center);
        assert_eq!(title.overflow, TextOverflow::WordWrap);
        assert_eq!(title.font, SystemFont::Gothic24Bold);
        assert_eq!(title.color, GColor::White);
        assert_eq!(title.background, GColor::Clear);

        let light = text_of(&host, layers[2]).expect("light layer");
        assert_eq!(light.text, LIGHT_LABEL);
        assert_eq!(light.frame, GRect::new(0, 20, 144, 30));
        assert_eq!(light.alignment, TextAlignment::Right);
        assert_eq!(light.font, SystemFont::Gothic18Bold);
    }

    #[test]
    fn missing_background_still_loads_text() {
        let mut host = SimHost::new();
        let mut screen = TitleScreen::new("Dodge", GColor::Black, ResourceId(99), |_| {});
        screen.push(&mut host, false);
        pump(&mut host, &mut screen);

        let window = screen.window().expect("window created");
        assert_eq!(host.layers_on(window).len(), 2);
    }

    #[test]
    fn pop_unloads_and_destroys_everything() {
        let (mut host, mut screen, _) = pushed_screen("Dodge");
        let window = screen.window().expect("window created");
        let layers = host.layers_on(window).to_vec();

        assert!(screen.pop(&mut host, true));
        pump(&mut host, &mut screen);

        assert!(screen.is_finished());
        assert!(!host.window_exists(window));
        assert!(layers.iter().all(|layer| !host.layer_exists(*layer)));
        assert!(host.window_stack().is_empty());
    }

    #[test]
    fn pop_is_ignored_when_covered() {
        let (mut host, mut screen, _) = pushed_screen("Dodge");
        let game = host.create_window(true);
        host.push_window(game, false);

        assert!(!screen.pop(&mut host, false));
        assert_eq!(host.top_window(), Some(game));
    }

    #[test]
    fn back_click_pops_and_finishes() {
        let (mut host, mut screen, _) = pushed_screen("Dodge");
        host.click(ButtonId::Back);
        pump(&mut host, &mut screen);
        assert!(screen.is_finished());
    }

    #[test]
    fn push_after_unload_is_ignored() {
        let (mut host, mut screen, _) = pushed_screen("Dodge");
        screen.pop(&mut host, false);
        pump(&mut host, &mut screen);

        screen.push(&mut host, false);
        assert!(host.window_stack().is_empty());
    }

    //=====================================================================
    // Click Tests
    //=====================================================================

    #[test]
    fn up_toggles_backlight() {
        let (mut host, mut screen, clicks) = pushed_screen("Dodge");

        host.click(ButtonId::Up);
        pump(&mut host, &mut screen);
        assert!(host.backlight());
        assert!(screen.light_on());

        host.click(ButtonId::Up);
        pump(&mut host, &mut screen);
        assert!(!host.backlight());
        assert!(clicks.borrow().is_empty());
    }

    #[test]
    fn select_and_down_reach_callback() {
        let (mut host, mut screen, clicks) = pushed_screen("Dodge");

        host.click(ButtonId::Select);
        host.click(ButtonId::Down);
        pump(&mut host, &mut screen);

        assert_eq!(*clicks.borrow(), vec![ButtonId::Select, ButtonId::Down]);
    }

    #[test]
    fn independent_screens_do_not_share_state() {
        let mut host = SimHost::new();
        let mut first = TitleScreen::new("One", GColor::White, BACKGROUND, |_| {});
        let mut second = TitleScreen::new("Two", GColor::Black, BACKGROUND, |_| {});

        first.push(&mut host, false);
        second.push(&mut host, false);

        assert_ne!(first.window(), second.window());
        assert_eq!(first.title(), "One");
        assert_eq!(second.title(), "Two");
    }
}
