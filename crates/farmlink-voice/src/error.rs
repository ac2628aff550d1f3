use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("Speech recognition is not supported on this platform")]
    Unsupported,

    #[error("Recognition engine error: {0}")]
    Engine(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
