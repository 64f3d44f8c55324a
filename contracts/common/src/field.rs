//! BN254 scalar-field helpers over 32-byte big-endian encodings.

/// Order of the BN254 scalar field (the `P` every commitment is reduced by),
/// big-endian.
///
/// 21888242871839275222246405745257275088548364400416034343698204186575808495617
pub const BN254_SCALAR_MODULUS: [u8; 32] = [
    0x30, 0x64, 0x4e, 0x72, 0xe1, 0x31, 0xa0, 0x29, 0xb8, 0x50, 0x45, 0xb6, 0x81, 0x81, 0x58,
    0x5d, 0x28, 0x33, 0xe8, 0x48, 0x79, 0xb9, 0x70, 0x91, 0x43, 0xe1, 0xf5, 0x93, 0xf0, 0x00,
    0x00, 0x01,
];

/// Returns `true` when `value` is strictly below `modulus` (both big-endian).
pub fn is_below(value: &[u8; 32], modulus: &[u8; 32]) -> bool {
    for i in 0..32 {
        if value[i] != modulus[i] {
            return value[i] < modulus[i];
        }
    }
    false
}

/// Returns `true` when `value` is the canonical encoding of a scalar, i.e. `< P`.
///
/// Non-canonical encodings alias a reduced value, so accepting them would let
/// the same commitment be recorded twice under different bytes.
pub fn is_canonical_scalar(value: &[u8; 32]) -> bool {
    is_below(value, &BN254_SCALAR_MODULUS)
}
