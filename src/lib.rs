//=========================================================================
// PGE Engine: Library Root
//
// Fixed-rate game loop helper for a 144×168 smartwatch.
//
// Responsibilities:
// - Run a render/logic cycle at a fixed frame period (`Engine`)
// - Track held buttons from raw press/release events
// - Show a title screen before a game starts (`TitleScreen`)
// - Abstract the watch OS behind host service traits (`platform`)
//
// Typical usage:
// ```no_run
// use pge_engine::prelude::*;
//
// let mut runtime = Runtime::new(SimHost::new());
// let window = runtime.host_mut().create_window(true);
// runtime.host_mut().push_window(window, false);
//
// runtime.begin(
//     EngineBuilder::new()
//         .on_render(|canvas: &mut Canvas| canvas.fill_rect(canvas.bounds()))
//         .on_logic(|frame| {
//             if frame.button_state(ButtonId::Select) {
//                 frame.finish();
//             }
//         })
//         .on_click(|_| {}),
//     window,
// );
//
// run_desktop(DesktopApp::new(runtime, DesktopConfig::default()))?;
// # Ok::<(), PlatformError>(())
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the host-independent pieces: input tracking, frame
// scheduling and the component runtime.
//
// `platform` defines the host contract plus the simulated and desktop
// hosts.
//
pub mod core;
pub mod engine;
pub mod platform;
pub mod prelude;
pub mod title;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder};
pub use title::TitleScreen;
