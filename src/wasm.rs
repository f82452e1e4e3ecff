//! Browser bindings.
//!
//! ```javascript
//! import init, { SheetViewer } from 'xlgrid';
//! await init();
//! const viewer = new SheetViewer();
//! input.onchange = async () => {
//!   await viewer.load_file(input.files[0]);
//!   viewer.render_into(container);
//! };
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Promise, Uint8Array};
use log::LevelFilter;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::{Element, File};

use crate::grid::LayoutDescriptor;
use crate::html;
use crate::logging;
use crate::view::{ReadOutcome, ViewController};

/// Sheet viewer bound to one host page.
#[wasm_bindgen]
pub struct SheetViewer {
    controller: Rc<RefCell<ViewController>>,
}

impl Default for SheetViewer {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl SheetViewer {
    #[wasm_bindgen(constructor)]
    pub fn new() -> SheetViewer {
        logging::init(LevelFilter::Info);
        SheetViewer {
            controller: Rc::new(RefCell::new(ViewController::new())),
        }
    }

    /// Read a user-selected file and load it.
    ///
    /// Resolves to `true` when the file was applied, `false` when a later
    /// `load_file` call superseded it, even if reading it failed. Rejects
    /// with the read or parse error for the current file; the previous sheet
    /// stays on screen.
    pub fn load_file(&self, file: File) -> Promise {
        let controller = Rc::clone(&self.controller);
        let ticket = controller.borrow_mut().begin_file_read();
        log::debug!("Reading \"{}\" ({} bytes)", file.name(), file.size());

        future_to_promise(async move {
            let buffer = JsFuture::from(file.array_buffer()).await;
            if !controller.borrow().is_current(ticket) {
                log::debug!("Discarding superseded read of \"{}\"", file.name());
                return Ok(JsValue::from_bool(false));
            }
            let buffer = buffer?;
            let bytes = Uint8Array::new(&buffer).to_vec();
            let outcome = controller.borrow_mut().complete_file_read(ticket, &bytes)?;
            Ok(JsValue::from_bool(outcome == ReadOutcome::Applied))
        })
    }

    /// Load workbook bytes synchronously.
    pub fn load_bytes(&self, data: &[u8]) -> Result<(), JsValue> {
        let mut controller = self.controller.borrow_mut();
        let ticket = controller.begin_file_read();
        controller.complete_file_read(ticket, data)?;
        Ok(())
    }

    pub fn select_sheet(&self, name: &str) -> Result<(), JsValue> {
        self.controller.borrow_mut().select_sheet(name)?;
        Ok(())
    }

    /// Set the layout from `{ headerRow, labelCol, dataStartCol }`; missing
    /// fields keep their defaults.
    pub fn set_layout(&self, layout: JsValue) -> Result<(), JsValue> {
        let layout: LayoutDescriptor = serde_wasm_bindgen::from_value(layout)?;
        self.controller.borrow_mut().set_layout(layout);
        Ok(())
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.controller.borrow().state().sheet_names.clone()
    }

    /// Current view state as a plain JS object.
    pub fn state(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(self.controller.borrow().state())?)
    }

    pub fn render_html(&self) -> String {
        html::render(self.controller.borrow().state())
    }

    pub fn render_into(&self, element: &Element) {
        element.set_inner_html(&self.render_html());
    }
}
