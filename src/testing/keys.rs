use std::collections::HashMap;

pub const KEY_A_PRIVATE: &str = include_str!("../../test_data/keys/key-a.private.pem");
pub const KEY_A_PUBLIC: &str = include_str!("../../test_data/keys/key-a.public.pem");
pub const KEY_B_PRIVATE: &str = include_str!("../../test_data/keys/key-b.private.pem");
pub const KEY_B_PUBLIC: &str = include_str!("../../test_data/keys/key-b.public.pem");
pub const EC_PRIVATE: &str = include_str!("../../test_data/keys/ec.private.pem");
pub const EC_PUBLIC: &str = include_str!("../../test_data/keys/ec.public.pem");

pub fn pem_map(entries: &[(&str, &str)]) -> HashMap<String, Vec<u8>> {
    entries
        .iter()
        .map(|(key_id, pem)| (key_id.to_string(), pem.as_bytes().to_vec()))
        .collect()
}
