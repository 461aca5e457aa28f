pub mod config;
pub mod logging;
pub mod preferences;

pub mod detect;
pub mod fetch;
pub mod intercept;
pub mod locator;
pub mod media_type;
pub mod playback;

#[cfg(test)]
pub(crate) mod test_support;
