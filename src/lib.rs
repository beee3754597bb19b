#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod evaluator;
pub mod field;
pub mod iso;

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

use config::{DomainOptions, EngineConfig, GradientOptions, GradientPointOptions, SurfaceOptions};
use error::EngineResult;
use evaluator::{DomainReport, GradientAtPoint, GradientField, SurfaceResult};

pub use error::EngineError;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {}

#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
#[wasm_bindgen]
pub async fn initialize_parallel(worker_count: Option<u32>) -> Result<(), JsError> {
    let threads = worker_count
        .map(|count| count.max(1) as usize)
        .or_else(|| {
            std::thread::available_parallelism()
                .map(|value| value.get())
                .ok()
        })
        .unwrap_or(1);

    wasm_bindgen_rayon::init_thread_pool(threads)
        .await
        .map_err(|err| JsError::new(&format!("kon rayon threadpool niet initialiseren: {err}")))
}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

/// Publiek toegangspunt voor JS.
///
/// De engine bewaart alleen haar configuratie; elke aanroep bouwt zijn eigen
/// grids en mesh op en geeft het resultaat als JS-object terug.
#[wasm_bindgen]
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

#[wasm_bindgen]
impl Engine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Engine {
        Engine::from_config(EngineConfig::default())
    }

    /// Maakt een engine met eigen standaardopties. Ontbrekende velden krijgen
    /// de ingebouwde defaults.
    #[wasm_bindgen]
    pub fn with_config(config: JsValue) -> Result<Engine, JsValue> {
        let config: EngineConfig = options_from_js(config, EngineConfig::default())?;
        Ok(Engine::from_config(config))
    }

    /// Evalueer een expressie als oppervlak: een hoogteveld wanneer z niet
    /// voorkomt, anders een isooppervlak.
    #[wasm_bindgen]
    pub fn evaluate_surface(&self, expression: &str, options: JsValue) -> Result<JsValue, JsValue> {
        let options = options_from_js(options, self.config.surface)?;
        let result = self.surface(expression, &options).map_err(to_js_error)?;
        to_js(&result)
    }

    /// Bemonster het gradiëntveld van f(x, y).
    #[wasm_bindgen]
    pub fn evaluate_gradient_field(
        &self,
        expression: &str,
        options: JsValue,
    ) -> Result<JsValue, JsValue> {
        let options = options_from_js(options, self.config.gradient)?;
        let result = self
            .gradient_field(expression, &options)
            .map_err(to_js_error)?;
        to_js(&result)
    }

    /// Schat domein en bereik van f(x, y).
    #[wasm_bindgen]
    pub fn analyze_domain(&self, expression: &str, options: JsValue) -> Result<JsValue, JsValue> {
        let options = options_from_js(options, self.config.domain)?;
        let result = self.domain(expression, &options).map_err(to_js_error)?;
        to_js(&result)
    }

    /// Gradiënt van f(x, y) in het punt `{x0, y0}`.
    #[wasm_bindgen]
    pub fn gradient_at(&self, expression: &str, options: JsValue) -> Result<JsValue, JsValue> {
        let options = options_from_js(options, GradientPointOptions::default())?;
        let result = self.gradient_at_point(expression, &options).map_err(to_js_error)?;
        to_js(&result)
    }
}

impl Engine {
    #[must_use]
    pub fn from_config(config: EngineConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn surface(&self, expression: &str, options: &SurfaceOptions) -> EngineResult<SurfaceResult> {
        let field = evaluator::parse_expression(expression)?;
        debug_log!("evaluate_surface `{}`", field.source());
        evaluator::evaluate_surface(&field, options)
    }

    pub fn gradient_field(
        &self,
        expression: &str,
        options: &GradientOptions,
    ) -> EngineResult<GradientField> {
        let field = evaluator::parse_expression(expression)?;
        debug_log!("evaluate_gradient_field `{}`", field.source());
        evaluator::evaluate_gradient_field_numeric(&field, options)
    }

    pub fn domain(&self, expression: &str, options: &DomainOptions) -> EngineResult<DomainReport> {
        let field = evaluator::parse_expression(expression)?;
        evaluator::analyze_domain(&field, options)
    }

    pub fn gradient_at_point(
        &self,
        expression: &str,
        options: &GradientPointOptions,
    ) -> EngineResult<GradientAtPoint> {
        let field = evaluator::parse_expression(expression)?;
        evaluator::gradient_at_numeric(&field, options)
    }
}

/// `undefined`/`null` geeft `fallback`, anders wordt het object gedeserialiseerd.
fn options_from_js<T: DeserializeOwned>(value: JsValue, fallback: T) -> Result<T, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(fallback);
    }
    serde_wasm_bindgen::from_value(value).map_err(to_js_error)
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value.serialize(&serializer).map_err(to_js_error)
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}
