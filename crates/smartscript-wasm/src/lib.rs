//! WASM bindings for the SmartScript front end.
//!
//! Exposes parsing, reconstruction and checking to JavaScript via wasm-bindgen.
//! Parse failures are thrown as JS errors carrying the parser's message.

use smartscript_parser::{Document, ParseError, Parser};
use wasm_bindgen::prelude::*;

fn parse_document(source: &str) -> Result<Document, ParseError> {
    Parser::parse(source)
}

fn reconstruct_source(source: &str) -> Result<String, ParseError> {
    let doc = parse_document(source)?;
    Ok(smartscript_codegen::reconstruct(&doc))
}

/// Parse SmartScript source and return the AST as a plain JS object.
///
/// The object mirrors the arena: `{ nodes: [...] }`, where node 0 is the
/// document root and children are referenced by index.
/// Throws a JS error if parsing fails.
#[wasm_bindgen]
pub fn parse(source: &str) -> Result<JsValue, JsError> {
    let doc = parse_document(source).map_err(|e| JsError::new(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&doc).map_err(|e| JsError::new(&e.to_string()))
}

/// Parse SmartScript source and return its canonical reconstruction.
#[wasm_bindgen]
pub fn reconstruct(source: &str) -> Result<String, JsError> {
    reconstruct_source(source).map_err(|e| JsError::new(&e.to_string()))
}

/// Check SmartScript source without throwing.
///
/// Returns `{ ok: true, error: null }` or `{ ok: false, error: "<message>" }`.
#[wasm_bindgen]
pub fn check(source: &str) -> Result<JsValue, JsError> {
    let (ok, error) = match parse_document(source) {
        Ok(_) => (JsValue::TRUE, JsValue::NULL),
        Err(e) => (JsValue::FALSE, JsValue::from_str(&e.to_string())),
    };

    let js_obj = js_sys::Object::new();
    js_sys::Reflect::set(&js_obj, &"ok".into(), &ok)
        .map_err(|_| JsError::new("Failed to set ok property"))?;
    js_sys::Reflect::set(&js_obj, &"error".into(), &error)
        .map_err(|_| JsError::new("Failed to set error property"))?;

    Ok(js_obj.into())
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
