pub mod crop_encoder;
pub mod preview;
