use wasm_bindgen::{JsCast, JsValue};

/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}

/// JavaScript exceptions carry no Rust error type, keep their debug rendering.
pub(crate) fn js_error(value: JsValue) -> anyhow::Error {
    anyhow::anyhow!("{:?}", value)
}

/// Looks up `id` in the document and casts it to the expected element type.
pub(crate) fn element_by_id<T: JsCast>(id: &str) -> anyhow::Result<T> {
    gloo::utils::document()
        .get_element_by_id(id)
        .ok_or_else(|| anyhow::anyhow!("Could not find id=\"{id}\" element"))?
        .dyn_into::<T>()
        .map_err(|_| anyhow::anyhow!("Element id=\"{id}\" has an unexpected type"))
}
