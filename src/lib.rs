#![cfg(target_arch = "wasm32")]
use instant::Instant;
use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

mod constants;
mod dom;
mod frame;
mod input;
mod layout;
mod mount;
mod render;

thread_local! {
    static APP: RefCell<Option<mount::App>> = const { RefCell::new(None) };
}

fn tick_app() {
    APP.with(|app| {
        if let Ok(mut app) = app.try_borrow_mut() {
            if let Some(app) = app.as_mut() {
                app.tick(Instant::now());
            }
        }
    });
}

// Page teardown. Registered once for the page's lifetime.
fn wire_pagehide() {
    static WIRED: AtomicBool = AtomicBool::new(false);
    if WIRED.swap(true, Ordering::SeqCst) {
        return;
    }
    let Some(window) = web::window() else {
        return;
    };
    let closure = Closure::wrap(Box::new(move || {
        unmount();
    }) as Box<dyn FnMut()>);
    _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
    closure.forget();
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("scroll-web starting");
    wire_pagehide();
    mount();
    Ok(())
}

/// Build the stage from the current markup, replacing any mounted one.
/// Failure leaves the page static.
#[wasm_bindgen]
pub fn mount() {
    unmount();
    let app = match mount::App::mount() {
        Ok(app) => app,
        Err(e) => {
            log::error!("mount error: {:?}", e);
            return;
        }
    };
    APP.with(|slot| *slot.borrow_mut() = Some(app));
    let frame_loop = frame::start_loop(tick_app);
    APP.with(|slot| {
        if let Some(app) = slot.borrow_mut().as_mut() {
            app.frame_loop = Some(frame_loop);
        }
    });
}

/// Detach every listener and restore the page's own styles. Safe to call
/// when nothing is mounted.
#[wasm_bindgen]
pub fn unmount() {
    let app = APP.with(|slot| slot.try_borrow_mut().ok().and_then(|mut a| a.take()));
    drop(app);
}

/// Programmatic scroll to a virtual offset in pixels.
#[wasm_bindgen]
pub fn scroll_to(offset: f32) -> bool {
    APP.with(|slot| {
        slot.try_borrow()
            .ok()
            .and_then(|a| a.as_ref().map(|app| app.scroll_to(offset)))
            .unwrap_or(false)
    })
}
