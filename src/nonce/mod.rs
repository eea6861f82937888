pub mod detector;

pub use detector::{NonceReuseDetector, NonceScan, SignatureRow};
