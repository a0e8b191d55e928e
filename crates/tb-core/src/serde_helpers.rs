//! Shared serde default functions.

pub fn default_true() -> bool {
    true
}

pub fn default_status() -> u16 {
    200
}
