use std::time::Duration;

use reqwest::{Client, ClientBuilder, Error};

/// Stable product token sent with every outbound request.
pub const APP_USER_AGENT: &str = concat!("ArtVenture/", env!("CARGO_PKG_VERSION"));

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub fn apply_default_user_agent(builder: ClientBuilder) -> ClientBuilder {
    builder.user_agent(APP_USER_AGENT)
}

/// Client for the hosted backends. Only a connect timeout is set: uploads and
/// record writes are allowed to take as long as they need.
pub fn build_http_client(builder: ClientBuilder) -> Result<Client, Error> {
    apply_default_user_agent(builder)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
}
