use serde::de::Error;

pub(crate) const fn expecting_prefixed_hex_or_bytes(human_readable: bool) -> &'static str {
    if human_readable {
        "a string of hexadecimal digits prefixed with 0x"
    } else {
        "a byte array"
    }
}

pub(crate) fn strip_hex_prefix<E: Error>(string: &str) -> Result<&str, E> {
    string
        .strip_prefix("0x")
        .ok_or_else(|| E::custom("string does not have hexadecimal prefix"))
}

pub(crate) fn decode_prefixed_hex<E: Error>(string: &str) -> Result<Vec<u8>, E> {
    let digits = strip_hex_prefix(string)?;
    const_hex::decode(digits).map_err(E::custom)
}

pub(crate) fn encode_prefixed_hex(bytes: impl AsRef<[u8]>) -> String {
    const_hex::encode_prefixed(bytes)
}
