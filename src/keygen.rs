use rand::{thread_rng, Rng};

/// Length of a generated paste id.
pub const KEY_LEN: usize = 8;

/// Source of paste ids.
///
/// Generated ids are only expected to be unique; the store's primary key is
/// what actually enforces it.
pub trait KeyGenerator: Send + Sync + 'static {
    fn generate(&self) -> String;
}

/// Generates 32 random bits as 8 lowercase hex characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct HexKeys;

impl KeyGenerator for HexKeys {
    fn generate(&self) -> String {
        let bits: u32 = thread_rng().gen();
        format!("{bits:08x}")
    }
}
