use borderart::color::css_rgb;
use borderart::{
    Attachment, ChromePalette, ColorSelection, EngineSettings, LinkColors, Platform, Region,
    Style, SurfaceId, Theme,
};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlCanvasElement, HtmlElement, IntersectionObserver, MediaQueryList,
    Storage, Window,
};

use super::gl::{describe, WebGlSurface};
use crate::styling::{
    canvas_css, segment_style, swatch_style, CONTENT_READY_CLASS, SURFACE_ID_ATTRIBUTE,
};

const HUD_ID: &str = "border-art-customize";
const COLOR_NAME_ID: &str = "selected-color-name";

/// Browser host: DOM discovery, observation, scheduling and persistence.
pub struct WebPlatform {
    window: Window,
    document: Document,
    top_id: String,
    bottom_id: String,
    border_class: String,
    storage_key: String,
    dark_query: Option<MediaQueryList>,
    observer: Option<IntersectionObserver>,
    frame_callback: Option<js_sys::Function>,
}

impl WebPlatform {
    pub fn new(window: Window, document: Document, settings: &EngineSettings) -> Self {
        let dark_query = window
            .match_media("(prefers-color-scheme: dark)")
            .ok()
            .flatten();
        Self {
            window,
            document,
            top_id: settings.containers.top.clone(),
            bottom_id: settings.containers.bottom.clone(),
            border_class: settings.containers.border_class.clone(),
            storage_key: settings.theme_storage_key.clone(),
            dark_query,
            observer: None,
            frame_callback: None,
        }
    }

    /// Hooks created after the engine exists, since both call back into it.
    pub fn install(&mut self, observer: IntersectionObserver, frame_callback: js_sys::Function) {
        self.observer = Some(observer);
        self.frame_callback = Some(frame_callback);
    }

    pub fn dark_query(&self) -> Option<&MediaQueryList> {
        self.dark_query.as_ref()
    }

    fn attach(&self, region: Region, container: &Element) -> Attachment<WebGlSurface> {
        let surface = self
            .create_canvas(region, container)
            .map_err(|err| describe(&err))
            .and_then(|canvas| WebGlSurface::new(canvas).map_err(|err| err.to_string()));
        match surface {
            Ok(surface) => Attachment::new(region, Some(surface)),
            Err(error) => {
                tracing::warn!(region = %region, error = %error, "no webgl context for region");
                Attachment::new(region, None)
            }
        }
    }

    fn create_canvas(
        &self,
        region: Region,
        container: &Element,
    ) -> Result<HtmlCanvasElement, JsValue> {
        container.set_inner_html("");
        if let Some(container) = container.dyn_ref::<HtmlElement>() {
            container.style().set_property("background", "none")?;
        }
        let canvas = self
            .document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(JsValue::from)?;
        canvas.set_id(&region.canvas_id());
        canvas.style().set_css_text(canvas_css(region));
        container.append_child(&canvas)?;
        Ok(canvas)
    }

    fn storage(&self) -> Option<Storage> {
        self.window.local_storage().ok().flatten()
    }

    fn root(&self) -> Option<HtmlElement> {
        self.document
            .document_element()
            .and_then(|root| root.dyn_into::<HtmlElement>().ok())
    }

    fn for_each(&self, scope: Option<&Element>, selector: &str, mut apply: impl FnMut(&HtmlElement)) {
        let found = match scope {
            Some(scope) => scope.query_selector_all(selector),
            None => self.document.query_selector_all(selector),
        };
        let list = match found {
            Ok(list) => list,
            Err(err) => {
                tracing::debug!(selector, error = %describe(&err), "selector failed");
                return;
            }
        };
        for index in 0..list.length() {
            if let Some(element) = list
                .item(index)
                .and_then(|node| node.dyn_into::<HtmlElement>().ok())
            {
                apply(&element);
            }
        }
    }

    fn restyle_hud(&self, theme: Theme, chrome: &ChromePalette) {
        let Some(hud) = self
            .document
            .get_element_by_id(HUD_ID)
            .and_then(|hud| hud.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };
        let scope: &Element = &hud;
        set_styles(
            &hud,
            &[
                ("background", chrome.panel_background),
                ("border", chrome.panel_border),
            ],
        );
        if let Some(text) = self
            .document
            .get_element_by_id("customize-button-text")
            .and_then(|text| text.dyn_into::<HtmlElement>().ok())
        {
            set_styles(&text, &[("color", chrome.text)]);
        }
        self.for_each(Some(scope), ".hud-label", |label| {
            if label.id() != COLOR_NAME_ID {
                set_styles(label, &[("color", chrome.text)]);
            }
        });
        self.for_each(Some(scope), ".hud-segmented-control", |control| {
            set_styles(control, &[("background", chrome.segment_track)]);
        });
        self.for_each(Some(scope), "#customize-close", |close| {
            set_styles(
                close,
                &[("color", chrome.text), ("background", chrome.close_background)],
            );
        });
        self.for_each(None, ".theme-segment", |segment| {
            let active = segment.get_attribute("data-theme").as_deref() == Some(theme.key());
            apply_segment(segment, active, chrome);
        });
    }
}

impl Platform for WebPlatform {
    type Context = WebGlSurface;

    fn attach_surfaces(&mut self) -> Vec<Attachment<WebGlSurface>> {
        let mut attachments = Vec::new();
        for (region, id) in [(Region::Top, &self.top_id), (Region::Bottom, &self.bottom_id)] {
            match self.document.get_element_by_id(id) {
                Some(container) => attachments.push(self.attach(region, &container)),
                None => tracing::debug!(container = %id, "container not on this page"),
            }
        }

        let selector = format!(".{}", self.border_class);
        match self.document.query_selector_all(&selector) {
            Ok(list) => {
                for index in 0..list.length() {
                    let Some(border) = list
                        .item(index)
                        .and_then(|node| node.dyn_into::<Element>().ok())
                    else {
                        continue;
                    };
                    attachments.push(self.attach(Region::Edge(index as usize), &border));
                }
            }
            Err(err) => {
                tracing::warn!(selector = %selector, error = %describe(&err), "border lookup failed");
            }
        }
        attachments
    }

    fn observe(&mut self, id: SurfaceId, context: &WebGlSurface) {
        let canvas = context.canvas();
        if let Err(err) = canvas.set_attribute(SURFACE_ID_ATTRIBUTE, &id.0.to_string()) {
            tracing::warn!(surface = %id, error = %describe(&err), "failed to tag canvas");
            return;
        }
        match &self.observer {
            Some(observer) => observer.observe(canvas),
            None => tracing::warn!(surface = %id, "visibility observer missing"),
        }
    }

    fn disconnect_observer(&mut self) {
        if let Some(observer) = &self.observer {
            observer.disconnect();
        }
    }

    fn request_frame(&mut self) {
        let Some(callback) = &self.frame_callback else {
            return;
        };
        if let Err(err) = self.window.request_animation_frame(callback) {
            tracing::error!(error = %describe(&err), "requestAnimationFrame failed");
        }
    }

    fn page_visible(&self) -> bool {
        !self.document.hidden()
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.window.device_pixel_ratio()
    }

    fn prefers_dark(&self) -> bool {
        self.dark_query
            .as_ref()
            .map(MediaQueryList::matches)
            .unwrap_or(false)
    }

    fn load_theme(&self) -> Option<Theme> {
        let raw = self.storage()?.get_item(&self.storage_key).ok().flatten()?;
        match raw.parse() {
            Ok(theme) => Some(theme),
            Err(err) => {
                tracing::warn!(error = %err, "ignoring stored theme");
                None
            }
        }
    }

    fn store_theme(&mut self, theme: Theme) {
        let Some(storage) = self.storage() else {
            tracing::debug!("local storage unavailable; theme not persisted");
            return;
        };
        if let Err(err) = storage.set_item(&self.storage_key, theme.key()) {
            tracing::warn!(error = %describe(&err), "failed to persist theme");
        }
    }

    fn apply_theme(&mut self, theme: Theme, chrome: &ChromePalette) {
        if let Some(root) = self.root() {
            if let Err(err) = root.set_attribute("data-theme", theme.key()) {
                tracing::warn!(error = %describe(&err), "failed to set data-theme");
            }
        }
        self.restyle_hud(theme, chrome);
    }

    fn apply_link_colors(&mut self, colors: &LinkColors) {
        let Some(root) = self.root() else {
            return;
        };
        let style = root.style();
        for (name, value) in colors.css_variables() {
            if let Err(err) = style.set_property(name, &value) {
                tracing::debug!(property = name, error = %describe(&err), "failed to set link color");
            }
        }
    }

    fn style_activated(&mut self, style: Style, chrome: &ChromePalette) {
        self.for_each(None, ".pattern-segment", |segment| {
            let active = segment.get_attribute("data-style-key").as_deref() == Some(style.key());
            apply_segment(segment, active, chrome);
        });
    }

    fn color_selected(&mut self, selection: &ColorSelection<'_>) {
        if let (Some(entry), Some(label)) = (
            selection.entry,
            self.document
                .get_element_by_id(COLOR_NAME_ID)
                .and_then(|label| label.dyn_into::<HtmlElement>().ok()),
        ) {
            let color = css_rgb(entry.color);
            label.set_text_content(Some(&entry.name));
            set_styles(&label, &[("color", color.as_str())]);
        }

        self.for_each(None, ".color-swatch", |swatch| {
            let index = swatch
                .get_attribute("data-color-index")
                .and_then(|raw| raw.trim().parse::<usize>().ok());
            let active = index.is_some() && index == selection.index;
            let (shadow, transform) = swatch_style(active);
            set_styles(swatch, &[("box-shadow", shadow), ("transform", transform)]);
        });
    }

    fn content_ready(&mut self) {
        let Some(root) = self.document.document_element() else {
            return;
        };
        if let Err(err) = root.class_list().add_1(CONTENT_READY_CLASS) {
            tracing::debug!(error = %describe(&err), "failed to mark content ready");
        }
    }
}

fn apply_segment(segment: &HtmlElement, active: bool, chrome: &ChromePalette) {
    let style = segment_style(active, chrome);
    set_styles(
        segment,
        &[
            ("color", style.color),
            ("background", style.background),
            ("box-shadow", style.box_shadow),
        ],
    );
}

fn set_styles(element: &HtmlElement, properties: &[(&str, &str)]) {
    let style = element.style();
    for (name, value) in properties {
        if let Err(err) = style.set_property(name, value) {
            tracing::debug!(property = *name, error = %describe(&err), "failed to set style");
        }
    }
}
