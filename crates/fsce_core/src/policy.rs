use serde::Deserialize;

/// What the render loop does after a frame fails.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FrameErrorPolicy {
    /// Report the failure and keep ticking.
    #[default]
    Continue,
    /// Report the failure and leave the loop.
    Stop,
}
