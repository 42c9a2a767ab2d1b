use wasm_bindgen::prelude::*;

use crate::app::App;
use crate::config::AppConfig;
use crate::logging::init_logging;

/// Browser-facing handle owned by the JS host.
#[wasm_bindgen]
pub struct WebOthello {
    app: App,
}

#[wasm_bindgen]
impl WebOthello {
    /// `config` may be `undefined`/`null` or a partial `{ cellSize, logLevel }`.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WebOthello, JsError> {
        let config: AppConfig = if config.is_undefined() || config.is_null() {
            AppConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        config.validate()?;
        init_logging(config.level_filter()?);

        Ok(Self {
            app: App::new(config),
        })
    }

    #[wasm_bindgen(js_name = canvasSize)]
    pub fn canvas_size(&self) -> u32 {
        self.app.config().canvas_size()
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        self.app.pointer_down(x, y)
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.app.pointer_move(x, y)
    }

    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self) -> bool {
        self.app.key_down()
    }

    /// Draw commands of the current frame.
    pub fn frame(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(self.app.frame())?)
    }

    pub fn state(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.app.state().to_snapshot())?)
    }

    /// Final result, or `null` while the game is running.
    pub fn result(&self) -> Result<JsValue, JsError> {
        let state = self.app.state();
        if !state.is_over() {
            return Ok(JsValue::NULL);
        }
        Ok(serde_wasm_bindgen::to_value(&state.to_result())?)
    }

    #[wasm_bindgen(js_name = legalMoves)]
    pub fn legal_moves(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.app.state().legal_moves())?)
    }
}
