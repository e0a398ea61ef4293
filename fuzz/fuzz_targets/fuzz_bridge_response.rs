//! Fuzz target: bridge response handling
//!
//! Decodes arbitrary bytes as a `BridgeResponse` and runs the accessors
//! the matrix controller relies on.  Invariants checked:
//! - No panics under any byte sequence
//! - `into_result` is `Ok` exactly when the status is `ok`
//!
//! cargo fuzz run fuzz_bridge_response

#![no_main]

use cortex_matrix::bridge::{BridgeResponse, ResponseStatus};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(response) = serde_json::from_slice::<BridgeResponse>(data) else {
        return;
    };
    let _ = response.str_field("sprite_id");
    let ok = response.status == ResponseStatus::Ok;
    assert_eq!(response.into_result().is_ok(), ok);
});
