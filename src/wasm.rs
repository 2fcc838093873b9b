//! Browser bindings for renderers that derive DNA client-side

use crate::dna::UniverseDna;
use crate::fragments::FragmentLayout;
use crate::seed::Seed;
use wasm_bindgen::prelude::*;

/// DNA of `seed` as a JSON string
#[wasm_bindgen(js_name = generateUniverse)]
pub fn generate_universe(seed: &str) -> Result<String, JsError> {
    Ok(serde_json::to_string(&UniverseDna::from_seed(seed))?)
}

/// Fragment layout of `seed` as a JSON string
#[wasm_bindgen(js_name = generateFragments)]
pub fn generate_fragments(seed: &str) -> Result<String, JsError> {
    Ok(serde_json::to_string(&FragmentLayout::generate(seed))?)
}

/// Ephemeral seed for when the session endpoint cannot be reached
#[wasm_bindgen(js_name = localSeed)]
pub fn local_seed() -> String {
    Seed::local().to_string()
}
