//! Test fixtures shared across module tests

/// Build a minimal little-endian TIFF stream carrying a DateTime and a
/// Model ASCII tag in IFD0
///
/// The layout is the smallest structure the EXIF reader accepts: header,
/// one IFD with two entries, then the out-of-line ASCII values. Both
/// strings must be longer than 4 bytes so they are stored by offset.
pub fn minimal_tiff(datetime: &str, model: &str) -> Vec<u8> {
    let mut model_bytes = model.as_bytes().to_vec();
    model_bytes.push(0);
    let model_count = model_bytes.len() as u32;
    if model_bytes.len() % 2 != 0 {
        // Keep the following value word-aligned
        model_bytes.push(0);
    }

    let mut datetime_bytes = datetime.as_bytes().to_vec();
    datetime_bytes.push(0);
    let datetime_count = datetime_bytes.len() as u32;

    assert!(model_count > 4 && datetime_count > 4);

    // Header (8) + entry count (2) + 2 entries (24) + next-IFD offset (4)
    let data_start: u32 = 38;
    let model_offset = data_start;
    let datetime_offset = data_start + model_bytes.len() as u32;

    let mut buf = Vec::new();
    buf.extend_from_slice(b"II");
    buf.extend_from_slice(&42u16.to_le_bytes());
    buf.extend_from_slice(&8u32.to_le_bytes());

    buf.extend_from_slice(&2u16.to_le_bytes());
    // Model (0x0110), ASCII
    buf.extend_from_slice(&0x0110u16.to_le_bytes());
    buf.extend_from_slice(&2u16.to_le_bytes());
    buf.extend_from_slice(&model_count.to_le_bytes());
    buf.extend_from_slice(&model_offset.to_le_bytes());
    // DateTime (0x0132), ASCII
    buf.extend_from_slice(&0x0132u16.to_le_bytes());
    buf.extend_from_slice(&2u16.to_le_bytes());
    buf.extend_from_slice(&datetime_count.to_le_bytes());
    buf.extend_from_slice(&datetime_offset.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes());

    buf.extend_from_slice(&model_bytes);
    buf.extend_from_slice(&datetime_bytes);
    buf
}
