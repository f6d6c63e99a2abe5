pub mod aacgm;
pub mod aacgm_errors;
pub mod constants;
pub mod dispatcher;
pub mod env_state;
pub mod flags;
pub mod geodesy;
pub mod igrf;
pub mod inputs;
pub mod mlt;
pub mod subsolar;
pub mod time;
pub mod transform;
pub mod validation;
