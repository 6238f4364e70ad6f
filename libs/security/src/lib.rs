//! HMAC-SHA256 signing/verification and constant-time bearer-token
//! comparison for webhook delivery in the AdCP sales agent.

pub mod hmac_sig;

pub use hmac_sig::{bearer_matches, sign, verify, SignatureError};
