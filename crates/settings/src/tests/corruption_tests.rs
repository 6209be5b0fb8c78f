use super::*;

// -------------------- Header --------------------

#[test]
fn header_single_byte() {
    assert_decode_err(b"D", "File header doesn't begin with DOVECOT-CONFIG line");
}

#[test]
fn header_tag_without_version() {
    assert_decode_err(
        b"DOVECOT-CONFIG\t",
        "File header doesn't begin with DOVECOT-CONFIG line",
    );
}

#[test]
fn header_without_newline() {
    assert_decode_err(
        b"DOVECOT-CONFIG\t1.0",
        "File header doesn't begin with DOVECOT-CONFIG line",
    );
}

#[test]
fn header_wrong_tag() {
    assert_decode_err(b"PIGEONHOLE-CONFIG\t1.0\n", "doesn't begin with");
    assert_decode_err(b"DOVECOT-CONFIG 1.0\n", "doesn't begin with");
}

#[test]
fn header_newline_too_far_away() {
    let mut data = b"DOVECOT-CONFIG\t".to_vec();
    data.extend(std::iter::repeat(b'1').take(MAX_HEADER_LINE));
    data.push(b'\n');
    assert_decode_err(&data, "doesn't begin with");
}

#[test]
fn header_unsupported_version() {
    assert_decode_err(
        b"DOVECOT-CONFIG\t2.3\n",
        "Unsupported config file version '2.3'",
    );
    assert_eq!(
        decode(b"DOVECOT-CONFIG\t2.3\n", &AcceptAll),
        Err(DecodeError::UnsupportedVersion {
            version: "2.3".to_string()
        })
    );
}

// -------------------- Full size --------------------

#[test]
fn full_size_truncated() {
    let data = [HEADER, &[0u8; 4]].concat();
    assert_decode_err(&data, "Area too small when reading size of 'full size'");
}

#[test]
fn full_size_larger_than_file() {
    // full file size = 1, but file is still truncated
    let data = [HEADER, &be(1)].concat();
    assert_decode_err(&data, "Full size mismatch");
}

#[test]
fn full_size_smaller_than_file() {
    let data = [HEADER, &be(0), &[0u8]].concat();
    assert_decode_err(&data, "Full size mismatch");
}

// -------------------- Block size & name --------------------

#[test]
fn block_size_truncated() {
    // full size is 7 bytes, so the 8-byte block size can't fit
    let data = [HEADER, &be(7), &[0u8; 7]].concat();
    assert_decode_err(&data, "Area too small when reading size of 'block size'");
}

#[test]
fn block_size_zero() {
    let data = [HEADER, &be(8), &be(0)].concat();
    assert_decode_err(&data, "'block name' points outside area");
}

#[test]
fn block_size_past_full_size() {
    let data = [HEADER, &be(8), &be(1)].concat();
    assert_decode_err(&data, "'block size' points outside are");
}

#[test]
fn block_size_huge() {
    let data = [HEADER, &be(8), &be(u64::MAX)].concat();
    assert_decode_err(&data, "'block size' points outside area");
}

#[test]
fn block_name_not_nul_terminated() {
    let data = [HEADER, &be(10), &be(1), b"N", b"\0"].concat();
    assert_decode_err(&data, "Settings block doesn't end with NUL at offset");
}

// -------------------- Base settings segment --------------------

#[test]
fn base_settings_size_truncated() {
    let data = [HEADER, &be(17), &be(9), b"N\0", &[0u8; 7]].concat();
    assert_decode_err(
        &data,
        "Area too small when reading size of 'base settings size'",
    );
}

#[test]
fn base_settings_size_zero() {
    let data = [HEADER, &be(18), &be(10), b"N\0", &be(0)].concat();
    assert_decode_err(&data, "'base settings error' points outside area");
}

#[test]
fn base_settings_error_not_nul_terminated() {
    let data = [HEADER, &be(20), &be(12), b"N\0", &be(1), b"E", b"\0"].concat();
    assert_decode_err(&data, "'base settings error' points outside area");
}

#[test]
fn base_settings_size_past_block() {
    let data = [HEADER, &be(19), &be(11), b"N\0", &be(2), b"\0"].concat();
    assert_decode_err(&data, "'base settings size' points outside area");
}

#[test]
fn base_settings_size_huge() {
    let data = [HEADER, &be(19), &be(11), b"N\0", &be(u64::MAX), b"\0"].concat();
    assert_decode_err(&data, "'base settings size' points outside area");
}

// -------------------- Filter segment --------------------

#[test]
fn filter_settings_size_truncated() {
    let data = [HEADER, &be(26), &be(18), b"N\0", &be(1), b"\0", &[0u8; 7]].concat();
    assert_decode_err(
        &data,
        "Area too small when reading size of 'filter settings size'",
    );
}

#[test]
fn filter_settings_size_zero() {
    let data = [HEADER, &be(27), &be(19), b"N\0", &be(1), b"\0", &be(0)].concat();
    assert_decode_err(&data, "'filter string' points outside area");
}

#[test]
fn filter_settings_size_huge() {
    let data = [
        HEADER, &be(28), &be(20), b"N\0", &be(1), b"\0", &be(u64::MAX), b"\0",
    ]
    .concat();
    assert_decode_err(&data, "'filter settings size' points outside area");
}

#[test]
fn filter_string_not_nul_terminated() {
    let data = [
        HEADER, &be(29), &be(21), b"N\0", &be(1), b"\0", &be(1), b"F", b"\0",
    ]
    .concat();
    assert_decode_err(&data, "'filter string' points outside area");
}

#[test]
fn filter_error_missing() {
    let data = [HEADER, &be(29), &be(21), b"N\0", &be(1), b"\0", &be(2), b"F\0"].concat();
    assert_decode_err(&data, "'filter settings error' points outside area");
}

#[test]
fn filter_error_not_nul_terminated() {
    let data = [
        HEADER, &be(31), &be(23), b"N\0", &be(1), b"\0", &be(3), b"F\0", b"E", b"\0",
    ]
    .concat();
    assert_decode_err(&data, "'filter settings error' points outside area");
}

#[test]
fn invalid_filter_string() {
    let data = [
        HEADER, &be(30), &be(22), b"N\0", &be(1), b"\0", &be(3), b"F\0", b"\0",
    ]
    .concat();
    assert_decode_err(
        &data,
        "Received invalid filter 'F': event filter: syntax error",
    );
}

#[test]
fn non_utf8_filter_is_invalid() {
    let data = BlobWriter::new()
        .block("N", "", &b"\xffprotocol=imap"[..], "")
        .to_bytes()
        .unwrap();
    assert_decode_err(&data, "Received invalid filter");
}

// -------------------- Trailing bytes --------------------

#[test]
fn unused_bytes_in_block() {
    let data = [
        HEADER, &be(30), &be(22), b"N\0", &be(1), b"\0", &be(2), b"\0\0", b"\0",
    ]
    .concat();
    let err = decode(&data, &AcceptAll).unwrap_err();
    assert_eq!(err.field(), Some("block size"));
    assert!(err.to_string().contains("1 unused bytes at the end of 'block size'"));
}

#[test]
fn unused_bytes_in_filter_segment() {
    let data = [
        HEADER, &be(30), &be(22), b"N\0", &be(1), b"\0", &be(3), b"\0\0\0",
    ]
    .concat();
    assert_decode_err(&data, "unused bytes at the end of 'filter settings size'");
}

// -------------------- Duplicates --------------------

#[test]
fn duplicate_block_name() {
    let data = [
        HEADER,
        &be(39),
        &be(21),
        b"N\0",
        &be(1),
        b"\0",
        &be(2),
        b"\0",
        b"\0",
        &be(2), // 2nd block size
        b"N\0", // 2nd block name
    ]
    .concat();
    assert_decode_err(&data, "Duplicate block name 'N'");
}

#[test]
fn duplicate_block_name_with_identical_blocks() {
    let data = BlobWriter::new()
        .block("N", "", "", "")
        .block("N", "", "", "")
        .to_bytes()
        .unwrap();
    assert_decode_err(&data, "Duplicate block name 'N'");
}

#[test]
fn duplicate_block_name_with_different_blocks() {
    let data = BlobWriter::new()
        .block("", "", "protocol=imap", "")
        .block("other", "", "", "")
        .block("", "bad setting", "", "")
        .to_bytes()
        .unwrap();
    assert_decode_err(&data, "Duplicate block name ''");
}

#[test]
fn first_error_wins() {
    // The second block is both a duplicate and broken later on; the
    // duplicate is noticed first.
    let data = [
        HEADER,
        &be(39),
        &be(21),
        b"N\0",
        &be(1),
        b"\0",
        &be(2),
        b"\0",
        b"\0",
        &be(2),
        b"N\0",
    ]
    .concat();
    let err = decode(&data, &AcceptAll).unwrap_err();
    assert!(matches!(err, DecodeError::DuplicateBlockName { ref name } if name == "N"));
}

#[test]
fn every_truncation_fails_cleanly() {
    let data = BlobWriter::new()
        .block("imap", "", "protocol=imap", "")
        .block("pop3", "unknown setting", "protocol=pop3", "")
        .to_bytes()
        .unwrap();
    for len in 0..data.len() {
        assert!(
            decode(&data[..len], &AcceptAll).is_err(),
            "truncated to {} bytes decoded",
            len
        );
    }
}
