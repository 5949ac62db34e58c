/// XORs `target` in place against the leading bytes of `mask`.
///
/// The mask must cover the target; address obfuscation always masks with the
/// magic cookie or the cookie plus transaction id, both at least as long as
/// the field being masked.
pub fn xor_byte_range(target: &mut [u8], mask: &[u8]) {
    std::debug_assert!(
        target.len() <= mask.len(),
        "XOR mask shorter than target. Target: {}, mask: {}.",
        target.len(),
        mask.len()
    );

    for (byte, mask_byte) in target.iter_mut().zip(mask.iter()) {
        *byte ^= *mask_byte;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masking_twice_restores_the_input() {
        let mask = [0x21, 0x12, 0xa4, 0x42];
        let mut bytes = [0xc0, 0x00, 0x02, 0x01];

        xor_byte_range(&mut bytes, &mask);
        assert_eq!(bytes, [0xe1, 0x12, 0xa6, 0x43]);

        xor_byte_range(&mut bytes, &mask);
        assert_eq!(bytes, [0xc0, 0x00, 0x02, 0x01]);
    }

    #[test]
    fn shorter_targets_use_the_mask_prefix() {
        let mask = [0x21, 0x12, 0xa4, 0x42];
        let mut port = [0x80, 0x55];

        xor_byte_range(&mut port, &mask);
        assert_eq!(port, [0xa1, 0x47]);
    }
}
