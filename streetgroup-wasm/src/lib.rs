use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;

/// JS handle over a street collection. The last grouping is cached and
/// dropped whenever records or settings change.
#[wasm_bindgen]
pub struct StreetNetwork {
    pub(crate) inner: streetgroup::StreetNetwork,
    pub(crate) last: Option<streetgroup::GroupingOutput>,
}

impl StreetNetwork {
    pub fn rs_new() -> StreetNetwork { StreetNetwork { inner: streetgroup::StreetNetwork::new(), last: None } }

    pub(crate) fn grouped(&mut self) -> Result<&streetgroup::GroupingOutput, streetgroup::StreetError> {
        let out = match self.last.take() {
            Some(out) => out,
            None => self.inner.group()?,
        };
        Ok(self.last.insert(out))
    }
}
