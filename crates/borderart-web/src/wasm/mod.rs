mod gl;
mod logging;
mod platform;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use borderart::{pick_start, ArtConfig, Engine, EngineSettings, Instant, Rgb, Style, Theme};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    MediaQueryList, Window,
};

use self::gl::describe;
use self::platform::WebPlatform;
use crate::styling::{parse_surface_id, root_margin, seed_from_unit, SURFACE_ID_ATTRIBUTE};

type SharedEngine = Rc<RefCell<Engine<WebPlatform>>>;

thread_local! {
    static INSTANCE: RefCell<Option<BorderArt>> = const { RefCell::new(None) };
}

/// Handle returned to JavaScript. Every operation is a method on it.
#[wasm_bindgen]
#[derive(Clone)]
pub struct BorderArt {
    engine: SharedEngine,
}

/// Builds surfaces from the current document and starts the frame loop.
///
/// `config_toml` overrides the bundled configuration. Calling `init` again
/// returns the existing handle.
#[wasm_bindgen]
pub fn init(config_toml: Option<String>) -> Result<BorderArt, JsValue> {
    logging::install();

    if let Some(existing) = INSTANCE.with(|slot| slot.borrow().clone()) {
        tracing::debug!("border art already running");
        return Ok(existing);
    }

    let config = match config_toml {
        Some(source) => ArtConfig::from_toml_str(&source),
        None => ArtConfig::bundled(),
    }
    .map_err(|err| JsValue::from_str(&err.to_string()))?;
    let settings =
        EngineSettings::from_config(&config).map_err(|err| JsValue::from_str(&err.to_string()))?;

    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;

    let start = pick_start(&settings, seed_from_unit(js_sys::Math::random()));
    let margin = settings.visibility_margin_px;
    let platform = WebPlatform::new(window.clone(), document.clone(), &settings);
    let engine: SharedEngine = Rc::new(RefCell::new(Engine::new(
        platform,
        settings,
        start,
        Instant::now(),
    )));

    let weak = Rc::downgrade(&engine);
    let observer = visibility_observer(weak.clone(), margin)?;
    let frame = frame_loop(&window, weak.clone());
    engine.borrow_mut().platform_mut().install(observer, frame);
    let dark_query = engine.borrow().platform().dark_query().cloned();
    listen_for_host_signals(&window, &document, dark_query.as_ref(), weak)?;

    engine.borrow_mut().init(Instant::now());

    let handle = BorderArt { engine };
    INSTANCE.with(|slot| *slot.borrow_mut() = Some(handle.clone()));
    Ok(handle)
}

#[wasm_bindgen]
impl BorderArt {
    /// Crossfades to the style with the given key. Unknown keys are logged
    /// and ignored.
    #[wasm_bindgen(js_name = switchStyle)]
    pub fn switch_style(&self, name: &str) {
        self.with_engine(|engine| {
            if let Err(err) = engine.switch_style_named(name, Instant::now()) {
                tracing::warn!(error = %err, "style switch ignored");
            }
        });
    }

    #[wasm_bindgen(js_name = changeColor)]
    pub fn change_color(&self, r: u8, g: u8, b: u8) {
        self.with_engine(|engine| {
            engine.change_color(Rgb::from_bytes([r, g, b]), Instant::now());
        });
    }

    /// Fades to a palette color by name. Returns `false` for unknown names.
    #[wasm_bindgen(js_name = changeColorNamed)]
    pub fn change_color_named(&self, name: &str) -> bool {
        let mut known = false;
        self.with_engine(|engine| match engine.change_color_named(name, Instant::now()) {
            Ok(_) => known = true,
            Err(err) => tracing::warn!(error = %err, "color change ignored"),
        });
        known
    }

    /// Accepts `auto`, `light` or `dark`.
    #[wasm_bindgen(js_name = switchTheme)]
    pub fn switch_theme(&self, name: &str) {
        match name.parse::<Theme>() {
            Ok(theme) => self.with_engine(|engine| engine.switch_theme(theme)),
            Err(err) => tracing::warn!(error = %err, "theme switch ignored"),
        }
    }

    pub fn resize(&self) {
        self.with_engine(|engine| engine.request_resize());
    }

    /// Rediscovers border containers, e.g. after the page content changed.
    pub fn rebuild(&self) {
        self.with_engine(|engine| engine.rebuild_surfaces());
    }

    #[wasm_bindgen(js_name = activeStyle)]
    pub fn active_style(&self) -> String {
        self.engine
            .try_borrow()
            .map(|engine| engine.active_style().key().to_string())
            .unwrap_or_default()
    }

    #[wasm_bindgen(js_name = styleKeys)]
    pub fn style_keys() -> js_sys::Array {
        Style::ALL
            .iter()
            .map(|style| JsValue::from_str(style.key()))
            .collect()
    }
}

impl BorderArt {
    fn with_engine(&self, apply: impl FnOnce(&mut Engine<WebPlatform>)) {
        match self.engine.try_borrow_mut() {
            Ok(mut engine) => apply(&mut engine),
            Err(_) => tracing::warn!("border art busy; call dropped"),
        }
    }
}

fn visibility_observer(
    engine: Weak<RefCell<Engine<WebPlatform>>>,
    margin_px: u32,
) -> Result<IntersectionObserver, JsValue> {
    let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
        move |entries: js_sys::Array, _observer: IntersectionObserver| {
            let Some(engine) = engine.upgrade() else {
                return;
            };
            let Ok(mut engine) = engine.try_borrow_mut() else {
                tracing::debug!("engine busy; visibility update dropped");
                return;
            };
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                let id = entry
                    .target()
                    .get_attribute(SURFACE_ID_ATTRIBUTE)
                    .and_then(|raw| parse_surface_id(&raw));
                if let Some(id) = id {
                    engine.set_surface_visible(id, entry.is_intersecting());
                }
            }
        },
    );

    let options = IntersectionObserverInit::new();
    options.set_root_margin(&root_margin(margin_px));
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
    // The observer lives for the rest of the page.
    callback.forget();
    Ok(observer)
}

/// Creates the animation-frame callback. The engine reschedules it from every
/// tick through [`WebPlatform`].
fn frame_loop(window: &Window, engine: Weak<RefCell<Engine<WebPlatform>>>) -> js_sys::Function {
    let retry: Rc<RefCell<Option<js_sys::Function>>> = Rc::new(RefCell::new(None));
    let slot = Rc::clone(&retry);
    let window = window.clone();
    let callback = Closure::<dyn FnMut(f64)>::new(move |_timestamp: f64| {
        let Some(engine) = engine.upgrade() else {
            return;
        };
        let busy = match engine.try_borrow_mut() {
            Ok(mut engine) => {
                engine.tick(Instant::now());
                false
            }
            Err(_) => true,
        };
        if busy {
            // Keep the loop alive even though this frame was skipped.
            if let Some(callback) = slot.borrow().as_ref() {
                if let Err(err) = window.request_animation_frame(callback) {
                    tracing::error!(error = %describe(&err), "requestAnimationFrame failed");
                }
            }
        }
    });
    let function: js_sys::Function = callback.as_ref().unchecked_ref::<js_sys::Function>().clone();
    *retry.borrow_mut() = Some(function.clone());
    callback.forget();
    function
}

fn listen_for_host_signals(
    window: &Window,
    document: &Document,
    dark_query: Option<&MediaQueryList>,
    engine: Weak<RefCell<Engine<WebPlatform>>>,
) -> Result<(), JsValue> {
    if let Some(query) = dark_query {
        let engine = engine.clone();
        let scheme = Closure::<dyn FnMut()>::new(move || {
            if let Some(engine) = engine.upgrade() {
                if let Ok(mut engine) = engine.try_borrow_mut() {
                    engine.color_scheme_changed();
                }
            }
        });
        query.add_event_listener_with_callback("change", scheme.as_ref().unchecked_ref())?;
        scheme.forget();
    }

    let visibility = {
        let engine = engine.clone();
        let document = document.clone();
        Closure::<dyn FnMut()>::new(move || {
            if let Some(engine) = engine.upgrade() {
                if let Ok(mut engine) = engine.try_borrow_mut() {
                    engine.set_page_visible(!document.hidden());
                }
            }
        })
    };
    document.add_event_listener_with_callback(
        "visibilitychange",
        visibility.as_ref().unchecked_ref(),
    )?;
    visibility.forget();

    let resize = Closure::<dyn FnMut()>::new(move || {
        if let Some(engine) = engine.upgrade() {
            if let Ok(mut engine) = engine.try_borrow_mut() {
                engine.request_resize();
            }
        }
    });
    window.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())?;
    resize.forget();
    Ok(())
}
