//! CLI command implementations

pub(crate) mod apply;
pub(crate) mod common;
pub(crate) mod constants;
pub(crate) mod export;
pub(crate) mod import;
pub(crate) mod ls;
pub(crate) mod plan;
pub(crate) mod resolve;
pub(crate) mod rm;
pub(crate) mod serve;
pub(crate) mod validate;
