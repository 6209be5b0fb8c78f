use crate::*;

mod corruption_tests;

// -------------------- Helpers --------------------

pub(crate) const HEADER: &[u8] = b"DOVECOT-CONFIG\t1.0\n";

/// Big-endian encoding of a size field.
pub(crate) fn be(n: u64) -> [u8; 8] {
    n.to_be_bytes()
}

/// Rejects the filter `F` the way the event filter parser does; accepts
/// everything else.
pub(crate) fn reject_f(filter: &str) -> Result<(), String> {
    if filter == "F" {
        Err("event filter: syntax error".to_string())
    } else {
        Ok(())
    }
}

/// Decodes `data`, expects failure, and returns the rendered message.
pub(crate) fn decode_err(data: &[u8]) -> String {
    match decode(data, &reject_f) {
        Ok(doc) => panic!("decode unexpectedly succeeded: {:?}", doc),
        Err(e) => e.to_string(),
    }
}

#[track_caller]
pub(crate) fn assert_decode_err(data: &[u8], expected: &str) {
    let msg = decode_err(data);
    assert!(
        msg.contains(expected),
        "error {:?} does not contain {:?}",
        msg,
        expected
    );
}
